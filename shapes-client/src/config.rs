//! 客户端配置
use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shapes_core::Credential;

use crate::attestation::{DEFAULT_ATTESTATION_HEADER, TokenAttestation};
use crate::endpoint::EndpointPolicies;
use crate::error::{ClientError, ClientResult};
use crate::interceptors::ShapeInterceptorFactory;

/// 连接 shapes 服务所需的配置项。
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// 服务 host，同时也是凭证作用的 domain
    pub host: String,
    pub port: u16,
    /// 关闭时使用明文 http/2（本地调试）
    pub tls: bool,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    pub api_key_header_name: String,
    pub api_key: String,
    pub attestation: Option<AttestationConfig>,
    pub policies: EndpointPolicies,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttestationConfig {
    pub header_name: String,
    pub token: String,
}

const REDACTED: &str = "<redacted>";

// api key 和 token 不能出现在日志里
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("tls", &self.tls)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_key_header_name", &self.api_key_header_name)
            .field("api_key", &REDACTED)
            .field("attestation", &self.attestation)
            .field("policies", &self.policies)
            .finish()
    }
}

impl fmt::Debug for AttestationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttestationConfig")
            .field("header_name", &self.header_name)
            .field("token", &REDACTED)
            .finish()
    }
}

impl Default for AttestationConfig {
    fn default() -> Self {
        Self {
            header_name: DEFAULT_ATTESTATION_HEADER.to_string(),
            token: String::new(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "grpc.shapes.approov.io".to_string(),
            port: 50051,
            tls: true,
            connect_timeout_secs: 10,
            timeout_secs: 30,
            api_key_header_name: "Api-Key".to_string(),
            // grpc.shapes.approov.io:50051 的公开演示 key
            api_key: "yXClypapWNHIifHUWmBIyPFAm".to_string(),
            attestation: None,
            policies: EndpointPolicies::default(),
        }
    }
}

impl ClientConfig {
    pub const CONFY_APP_NAME: &'static str = "shapes";
    pub const CONFY_CONFIG_NAME: &'static str = "client";

    /// 从用户配置目录加载，文件不存在时写入默认配置。
    pub fn load() -> ClientResult<Self> {
        confy::load::<Self>(Self::CONFY_APP_NAME, Self::CONFY_CONFIG_NAME)
            .map_err(|e| ClientError::ConfigFile(format!("{e}")))
    }

    pub fn load_path(path: impl AsRef<Path>) -> ClientResult<Self> {
        confy::load_path::<Self>(path).map_err(|e| ClientError::ConfigFile(format!("{e}")))
    }

    /// 合并逻辑：将 override 应用到 self 上
    pub fn merge(&mut self, other: ClientConfigOverride) {
        if let Some(value) = other.host {
            self.host = value;
        }
        if let Some(value) = other.port {
            self.port = value;
        }
        if let Some(value) = other.tls {
            self.tls = value;
        }
        if let Some(value) = other.api_key_header_name {
            self.api_key_header_name = value;
        }
        if let Some(value) = other.api_key {
            self.api_key = value;
        }
        if let Some(token) = other.attestation_token {
            let attestation = self.attestation.get_or_insert_with(AttestationConfig::default);
            attestation.token = token;
        }
    }

    pub fn endpoint_uri(&self) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        format!("{scheme}://{}:{}", self.host, self.port)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// 按配置构造拦截器工厂。配置了 attestation token 时接入 [`TokenAttestation`]。
    pub fn interceptor_factory(&self) -> ClientResult<ShapeInterceptorFactory> {
        let credential = Credential::new(&self.api_key_header_name, &self.api_key)?;
        let factory = match &self.attestation {
            Some(attestation) if !attestation.token.is_empty() => {
                let attestation = TokenAttestation::new(&attestation.header_name, &attestation.token)?;
                ShapeInterceptorFactory::with_attestation(&self.host, credential, self.policies, &attestation)?
            }
            _ => ShapeInterceptorFactory::with_policies(&self.host, credential, self.policies)?,
        };
        Ok(factory)
    }
}

/// 命令行上临时覆盖的配置项。
#[derive(Debug, Clone, Default)]
pub struct ClientConfigOverride {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub tls: Option<bool>,
    pub api_key_header_name: Option<String>,
    pub api_key: Option<String>,
    pub attestation_token: Option<String>,
}
