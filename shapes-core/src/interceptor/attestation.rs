use std::sync::Arc;

use super::chain::ClientInterceptor;

/// 移动端证明（attestation）服务的接入点。
///
/// 具体怎么拿 token、是否缓存、失败是否重试都由实现方决定，这里只要求它能为指定 host
/// 产出一个满足同样拦截器约定的实例，放在凭证拦截器之后。
pub trait Attestation: Send + Sync {
    fn interceptor<M: 'static>(&self, host: &str) -> Arc<dyn ClientInterceptor<M>>;
}

/// 没有配置 attestation 时使用的占位类型，无法被构造。
#[derive(Debug, Clone, Copy)]
pub enum NoAttestation {}

impl Attestation for NoAttestation {
    fn interceptor<M: 'static>(&self, _host: &str) -> Arc<dyn ClientInterceptor<M>> {
        match *self {}
    }
}
