// 将通过 build.rs 生成到 OUT_DIR 的 protobuf 模块引入并导出
pub mod pb {
    include!(concat!(env!("OUT_DIR"), "/shapes.rs"));
}

pub mod attestation;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod interceptors;

pub use client::ShapesClient;
pub use config::{ClientConfig, ClientConfigOverride};
pub use endpoint::{Endpoint, EndpointPolicies};
pub use error::{ClientError, ClientResult};
pub use interceptors::ShapeInterceptorFactory;

#[cfg(test)]
mod test;
