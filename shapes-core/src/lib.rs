pub mod error;
pub mod interceptor;
pub mod logging;

pub use error::{ChainError, ConfigError};
pub use interceptor::{
    Attestation, ClientInterceptor, Credential, CredentialInterceptor, InterceptorChain,
    InterceptorContext, Metadata, NoAttestation, Promise, ProtectionPolicy, RequestPart,
    Transport,
};
