use serde::{Deserialize, Serialize};
use shapes_core::ProtectionPolicy;

/// Shape 服务上的远程方法。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Hello,
    Shape,
    ApproovShape,
}

impl Endpoint {
    pub const ALL: [Endpoint; 3] = [Endpoint::Hello, Endpoint::Shape, Endpoint::ApproovShape];

    pub fn as_str(self) -> &'static str {
        match self {
            Endpoint::Hello => "hello",
            Endpoint::Shape => "shape",
            Endpoint::ApproovShape => "approovShape",
        }
    }
}

/// 每个 endpoint 的保护策略。
///
/// 默认值和 demo 发布时一致：hello 不保护，shape 和 approovShape 只带 API key。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointPolicies {
    pub hello: ProtectionPolicy,
    pub shape: ProtectionPolicy,
    pub approov_shape: ProtectionPolicy,
}

impl Default for EndpointPolicies {
    fn default() -> Self {
        Self {
            hello: ProtectionPolicy::Unprotected,
            shape: ProtectionPolicy::ApiKeyOnly,
            approov_shape: ProtectionPolicy::ApiKeyOnly,
        }
    }
}

impl EndpointPolicies {
    pub fn policy(&self, endpoint: Endpoint) -> ProtectionPolicy {
        match endpoint {
            Endpoint::Hello => self.hello,
            Endpoint::Shape => self.shape,
            Endpoint::ApproovShape => self.approov_shape,
        }
    }

    pub fn requires_attestation(&self) -> bool {
        Endpoint::ALL
            .iter()
            .any(|e| self.policy(*e).requires_attestation())
    }
}
