use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::attestation::Attestation;
use super::chain::InterceptorChain;
use super::credential::{Credential, CredentialInterceptor};
use crate::error::{ConfigError, ConfigResult};

/// 单个 endpoint 的保护策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectionPolicy {
    /// 不加任何拦截器。
    Unprotected,
    /// 只加 API key。
    ApiKeyOnly,
    /// API key 之后再加 attestation token。
    ApiKeyPlusAttestation,
}

impl ProtectionPolicy {
    pub fn requires_attestation(self) -> bool {
        matches!(self, ProtectionPolicy::ApiKeyPlusAttestation)
    }

    /// 按策略构造 endpoint 的拦截器链。
    ///
    /// `Unprotected` 得到的是空链，而不是一个什么都不做的拦截器。
    pub fn build_chain<M: 'static, A: Attestation>(
        self,
        endpoint: &'static str,
        host: &str,
        credential: &Arc<Credential>,
        attestation: Option<&A>,
    ) -> ConfigResult<InterceptorChain<M>> {
        let mut chain = InterceptorChain::empty();
        match self {
            ProtectionPolicy::Unprotected => {}
            ProtectionPolicy::ApiKeyOnly => {
                chain.push(Arc::new(CredentialInterceptor::api_key(credential.clone())));
            }
            ProtectionPolicy::ApiKeyPlusAttestation => {
                let attestation = attestation.ok_or(ConfigError::AttestationUnavailable { endpoint })?;
                chain.push(Arc::new(CredentialInterceptor::api_key(credential.clone())));
                chain.push(attestation.interceptor(host));
            }
        }
        tracing::debug!(endpoint, policy = ?self, interceptors = ?chain, "interceptor chain resolved");
        Ok(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interceptor::NoAttestation;

    fn credential() -> Arc<Credential> {
        Arc::new(Credential::new("Api-Key", "secret123").unwrap())
    }

    #[test]
    fn unprotected_builds_empty_chain() {
        let chain = ProtectionPolicy::Unprotected
            .build_chain::<String, NoAttestation>("hello", "grpc.example.io", &credential(), None)
            .unwrap();
        assert!(chain.is_empty());
    }

    #[test]
    fn api_key_only_builds_single_interceptor() {
        let chain = ProtectionPolicy::ApiKeyOnly
            .build_chain::<String, NoAttestation>("shape", "grpc.example.io", &credential(), None)
            .unwrap();
        assert_eq!(chain.names(), vec!["api-key"]);
    }

    #[test]
    fn attestation_policy_without_provider_fails() {
        let err = ProtectionPolicy::ApiKeyPlusAttestation
            .build_chain::<String, NoAttestation>("approovShape", "grpc.example.io", &credential(), None)
            .unwrap_err();
        assert_eq!(err, ConfigError::AttestationUnavailable { endpoint: "approovShape" });
    }

    #[test]
    fn policy_names_in_config_files() {
        use serde::de::IntoDeserializer;
        use serde::de::value::{Error, StrDeserializer};

        let de: StrDeserializer<'_, Error> = "api_key_plus_attestation".into_deserializer();
        let policy = ProtectionPolicy::deserialize(de).unwrap();

        assert_eq!(policy, ProtectionPolicy::ApiKeyPlusAttestation);
        assert!(policy.requires_attestation());
        assert!(!ProtectionPolicy::ApiKeyOnly.requires_attestation());
    }
}
