use std::time::Instant;

use tonic::Status;
use tracing::Span;

/// 初始化统一日志系统（全局）。
///
/// - 默认使用 `RUST_LOG` 控制日志级别；
/// - 若未设置 `RUST_LOG`，使用 `default_directive`；
/// - 输出格式为文本。
pub fn init_logging(default_directive: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    // 多次调用时避免 panic（测试/多入口场景）
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 每次出站 RPC 的日志对象：携带 request_id、endpoint、host，用 Span 贯穿整个调用。
#[derive(Clone, Debug)]
pub struct RpcLog {
    span: Span,
    started_at: Instant,
}

impl RpcLog {
    pub fn new(endpoint: &'static str, host: &str) -> Self {
        let request_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!(
            "shapes_rpc",
            request_id = %request_id,
            endpoint = endpoint,
            host = host,
            interceptors = tracing::field::Empty
        );

        Self {
            span,
            started_at: Instant::now(),
        }
    }

    /// 记录本次调用实际使用的拦截器。
    pub fn with_interceptors(self, names: &[&str]) -> Self {
        self.span
            .record("interceptors", &tracing::field::debug(names));
        self
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }

    pub fn finish_ok(&self) {
        let ms = self.started_at.elapsed().as_millis();
        tracing::info!(parent: &self.span, elapsed_ms = ms, "rpc finished: ok");
    }

    pub fn finish_err(&self, status: &Status) {
        let ms = self.started_at.elapsed().as_millis();
        tracing::warn!(
            parent: &self.span,
            elapsed_ms = ms,
            grpc_code = ?status.code(),
            grpc_message = status.message(),
            "rpc finished: err"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_twice_does_not_panic() {
        init_logging("debug");
        init_logging("info");
    }

    #[test]
    fn rpc_log_finishes_without_subscriber_state() {
        let log = RpcLog::new("hello", "grpc.example.io").with_interceptors(&["api-key"]);
        {
            let _guard = log.enter();
        }
        log.finish_ok();
        log.finish_err(&Status::unavailable("down"));
    }
}
