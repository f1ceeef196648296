use std::fmt;
use std::sync::Arc;

use tonic::metadata::{AsciiMetadataKey, AsciiMetadataValue};

use super::chain::{ClientInterceptor, InterceptorContext};
use super::part::{Promise, RequestPart};
use crate::error::{ConfigError, ConfigResult};

/// tonic 发请求时会剥掉或自己写入的 header，以及 HTTP/2 禁止的连接级 header。
const RESERVED_HEADERS: &[&str] = &[
    "content-type",
    "te",
    "user-agent",
    "host",
    "connection",
    "keep-alive",
    "proxy-connection",
    "transfer-encoding",
    "upgrade",
];

/// `grpc-` 前缀由 gRPC 协议保留（grpc-status、grpc-timeout 等）。
fn is_reserved(header_name: &str) -> bool {
    let lower = header_name.to_ascii_lowercase();
    lower.starts_with("grpc-") || RESERVED_HEADERS.contains(&lower.as_str())
}

/// 固定的 (header 名, header 值) 对，客户端初始化时构造，之后不再改变。
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    header_name: String,
    value: String,
}

impl Credential {
    /// header 名必须是合法的 ascii gRPC metadata key（不能是 `-bin` 结尾，也不能是保留 header），
    /// 值必须是合法的 ascii 值。
    pub fn new(header_name: impl Into<String>, value: impl Into<String>) -> ConfigResult<Self> {
        let header_name = header_name.into();
        let value = value.into();

        if header_name.is_empty()
            || is_reserved(&header_name)
            || AsciiMetadataKey::from_bytes(header_name.as_bytes()).is_err()
        {
            return Err(ConfigError::InvalidHeaderName(header_name));
        }
        if AsciiMetadataValue::try_from(value.as_str()).is_err() {
            return Err(ConfigError::InvalidHeaderValue(header_name));
        }

        Ok(Self { header_name, value })
    }

    pub fn header_name(&self) -> &str {
        &self.header_name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

// 日志里不能出现密钥本身
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("header_name", &self.header_name)
            .field("value", &"<redacted>")
            .finish()
    }
}

/// 在 metadata 阶段追加一条固定 header 的拦截器，其它阶段原样转发。
#[derive(Debug, Clone)]
pub struct CredentialInterceptor {
    name: &'static str,
    credential: Arc<Credential>,
}

impl CredentialInterceptor {
    pub fn new(name: &'static str, credential: Arc<Credential>) -> Self {
        Self { name, credential }
    }

    pub fn api_key(credential: Arc<Credential>) -> Self {
        Self::new("api-key", credential)
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}

impl<M> ClientInterceptor<M> for CredentialInterceptor {
    fn name(&self) -> &str {
        self.name
    }

    fn send(
        &self,
        part: RequestPart<M>,
        promise: Option<Promise>,
        context: &mut InterceptorContext<'_, M>,
    ) {
        match part {
            // 每次调用开始时发送的请求头
            RequestPart::Metadata(mut metadata) => {
                metadata.add(self.credential.header_name(), self.credential.value());
                tracing::trace!(
                    interceptor = self.name,
                    header = self.credential.header_name(),
                    "credential header added"
                );
                context.send(RequestPart::Metadata(metadata), promise);
            }
            // 消息和流结束与凭证无关
            other @ (RequestPart::Message(_) | RequestPart::End) => context.send(other, promise),
        }
    }
}
