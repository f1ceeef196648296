//! 统一的错误处理
use thiserror::Error;
use tonic::Status;

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 构造拦截器时的配置错误，只会在客户端初始化阶段出现。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid metadata header name: {0:?}")]
    InvalidHeaderName(String),

    #[error("Invalid metadata value for header {0:?}")]
    InvalidHeaderValue(String),

    #[error("Endpoint `{endpoint}` requires attestation but no attestation provider is configured")]
    AttestationUnavailable { endpoint: &'static str },
}

/// 拦截器链在驱动一次 unary 调用时发现的异常。
///
/// 内置拦截器不会触发这些错误，它们只用来兜住第三方拦截器违反转发约定的情况。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("interceptor chain dropped the metadata part")]
    MetadataDropped,

    #[error("interceptor chain delivered {0} metadata parts, expected one")]
    MetadataRepeated(usize),

    #[error("interceptor chain delivered a {0} part out of order")]
    PartOutOfOrder(&'static str),

    #[error("interceptor chain removed or rewrote existing metadata")]
    MetadataRewritten,

    #[error("unary call expects exactly one message, chain produced {0}")]
    MessageCount(usize),

    #[error("interceptor chain did not deliver end of stream")]
    StreamNotEnded,

    #[error("metadata entry {0:?} is not valid ascii grpc metadata")]
    InvalidMetadata(String),
}

// 拦截器链的错误对调用方来说都是客户端内部错误
impl From<ChainError> for Status {
    fn from(err: ChainError) -> Self {
        Status::internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_error_maps_to_internal_status() {
        let status: Status = ChainError::MessageCount(2).into();
        assert_eq!(status.code(), tonic::Code::Internal);
        assert!(status.message().contains("exactly one message"));
    }

    #[test]
    fn attestation_error_names_endpoint() {
        let err = ConfigError::AttestationUnavailable { endpoint: "approovShape" };
        assert!(err.to_string().contains("`approovShape`"));
    }
}
