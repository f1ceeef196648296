//! Shape 服务的拦截器工厂
use std::sync::Arc;

use shapes_core::{Attestation, ConfigError, Credential, InterceptorChain, NoAttestation};

use crate::endpoint::{Endpoint, EndpointPolicies};
use crate::pb::{ApproovShapeRequest, HelloRequest, ShapeRequest};

/// 为 Shape 服务的每个方法提供各自的拦截器链。
///
/// 所有链在构造时按 [`EndpointPolicies`] 一次性解析好，之后每次访问返回同一批拦截器实例。
#[derive(Debug, Clone)]
pub struct ShapeInterceptorFactory {
    /// 需要附加凭证的 host/domain
    host: String,
    credential: Arc<Credential>,
    hello: InterceptorChain<HelloRequest>,
    shape: InterceptorChain<ShapeRequest>,
    approov_shape: InterceptorChain<ApproovShapeRequest>,
}

impl ShapeInterceptorFactory {
    /// 使用默认策略（hello 不保护，其余带 API key）。
    ///
    /// * `host` - 需要附加凭证的 host/domain
    /// * `api_key_header_name` - 放 API key 的 header 名
    /// * `api_key` - API key 本身
    pub fn new(
        host: impl Into<String>,
        api_key_header_name: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let credential = Credential::new(api_key_header_name, api_key)?;
        Self::with_policies(host, credential, EndpointPolicies::default())
    }

    /// 自定义策略，但不接入 attestation。策略里要求 attestation 的 endpoint 会导致构造失败。
    pub fn with_policies(
        host: impl Into<String>,
        credential: Credential,
        policies: EndpointPolicies,
    ) -> Result<Self, ConfigError> {
        Self::build::<NoAttestation>(host.into(), credential, policies, None)
    }

    /// 自定义策略并接入 attestation 提供方。
    pub fn with_attestation<A: Attestation>(
        host: impl Into<String>,
        credential: Credential,
        policies: EndpointPolicies,
        attestation: &A,
    ) -> Result<Self, ConfigError> {
        Self::build(host.into(), credential, policies, Some(attestation))
    }

    fn build<A: Attestation>(
        host: String,
        credential: Credential,
        policies: EndpointPolicies,
        attestation: Option<&A>,
    ) -> Result<Self, ConfigError> {
        let credential = Arc::new(credential);

        let hello = policies.policy(Endpoint::Hello).build_chain(
            Endpoint::Hello.as_str(),
            &host,
            &credential,
            attestation,
        )?;
        let shape = policies.policy(Endpoint::Shape).build_chain(
            Endpoint::Shape.as_str(),
            &host,
            &credential,
            attestation,
        )?;
        let approov_shape = policies.policy(Endpoint::ApproovShape).build_chain(
            Endpoint::ApproovShape.as_str(),
            &host,
            &credential,
            attestation,
        )?;

        Ok(Self {
            host,
            credential,
            hello,
            shape,
            approov_shape,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// `hello` 使用的拦截器。
    pub fn hello_interceptors(&self) -> InterceptorChain<HelloRequest> {
        self.hello.clone()
    }

    /// `shape` 使用的拦截器。
    pub fn shape_interceptors(&self) -> InterceptorChain<ShapeRequest> {
        self.shape.clone()
    }

    /// `approovShape` 使用的拦截器。
    pub fn approov_shape_interceptors(&self) -> InterceptorChain<ApproovShapeRequest> {
        self.approov_shape.clone()
    }
}
