use std::sync::Arc;

use shapes_core::{Attestation, ClientInterceptor, ConfigError, Credential, CredentialInterceptor};

pub const DEFAULT_ATTESTATION_HEADER: &str = "Approov-Token";

/// 使用预先签发的 attestation token 的最简实现。
///
/// token 的获取、刷新都在外部完成；这里只负责在 metadata 阶段把它放进请求头。
/// token 不区分 host，factory 只为自己配置的 host 构造拦截器，`host` 仅用于日志。
#[derive(Debug, Clone)]
pub struct TokenAttestation {
    token: Arc<Credential>,
}

impl TokenAttestation {
    pub fn new(header_name: impl Into<String>, token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = Credential::new(header_name, token)?;
        Ok(Self {
            token: Arc::new(token),
        })
    }

    pub fn header_name(&self) -> &str {
        self.token.header_name()
    }
}

impl Attestation for TokenAttestation {
    fn interceptor<M: 'static>(&self, host: &str) -> Arc<dyn ClientInterceptor<M>> {
        tracing::debug!(host, header = self.token.header_name(), "attestation token interceptor created");
        Arc::new(CredentialInterceptor::new("attestation", self.token.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapes_core::interceptor::OutboundRequest;
    use shapes_core::{InterceptorChain, Metadata, RequestPart};

    #[test]
    fn token_is_added_under_configured_header() {
        let attestation = TokenAttestation::new(DEFAULT_ATTESTATION_HEADER, "token-abc").unwrap();
        let chain: InterceptorChain<()> =
            [attestation.interceptor::<()>("grpc.example.io")].into_iter().collect();

        let mut outbound = OutboundRequest::default();
        chain.send(RequestPart::Metadata(Metadata::new()), None, &mut outbound);

        assert_eq!(chain.names(), vec!["attestation"]);
        assert_eq!(outbound.metadata.unwrap().get("approov-token"), Some("token-abc"));
    }

    #[test]
    fn same_token_for_any_host() {
        let attestation = TokenAttestation::new("X-Attest", "token-abc").unwrap();

        for host in ["grpc.example.io", "127.0.0.1"] {
            let chain: InterceptorChain<()> = [attestation.interceptor::<()>(host)].into_iter().collect();
            let mut outbound = OutboundRequest::default();
            chain.send(RequestPart::Metadata(Metadata::new()), None, &mut outbound);

            let md = outbound.metadata.unwrap();
            assert_eq!(md.iter().collect::<Vec<_>>(), vec![("X-Attest", "token-abc")]);
        }
        assert_eq!(attestation.header_name(), "X-Attest");
    }

    #[test]
    fn invalid_token_is_a_config_error() {
        let err = TokenAttestation::new(DEFAULT_ATTESTATION_HEADER, "bad\ttoken\n").unwrap_err();
        assert_eq!(err, ConfigError::InvalidHeaderValue(DEFAULT_ATTESTATION_HEADER.to_string()));
    }
}
