//! 客户端请求拦截器
//!
//! 一次 RPC 的出站请求被拆成三个阶段（[`RequestPart`]）：metadata、message、end。
//! 每个拦截器拿到当前阶段后可以修改它，再通过 [`InterceptorContext`] 交给下一个拦截器，
//! 链尾是真正的传输层（[`Transport`]）。
mod attestation;
mod chain;
mod credential;
mod metadata;
mod part;
mod policy;

pub use attestation::{Attestation, NoAttestation};
pub use chain::{ClientInterceptor, InterceptorChain, InterceptorContext, OutboundRequest, Transport};
pub use credential::{Credential, CredentialInterceptor};
pub use metadata::Metadata;
pub use part::{Promise, RequestPart};
pub use policy::ProtectionPolicy;
