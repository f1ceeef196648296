use shapes_core::InterceptorChain;
use shapes_core::logging::RpcLog;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint as TonicEndpoint};
use tonic::{Request, Response, Status};

use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::{ClientError, ClientResult};
use crate::interceptors::ShapeInterceptorFactory;
use crate::pb::shape_client::ShapeClient;
use crate::pb::{ApproovShapeRequest, HelloReply, HelloRequest, ShapeReply, ShapeRequest};

/// Shape 服务客户端：每个方法调用前先经过该方法自己的拦截器链。
#[derive(Debug, Clone)]
pub struct ShapesClient {
    inner: ShapeClient<Channel>,
    interceptors: ShapeInterceptorFactory,
}

impl ShapesClient {
    /// 按配置打开 channel。`tls = true` 时使用系统根证书并以 host 作为 SNI。
    pub async fn connect(config: &ClientConfig, interceptors: ShapeInterceptorFactory) -> ClientResult<Self> {
        let mut endpoint = TonicEndpoint::from_shared(config.endpoint_uri())
            .map_err(|e| ClientError::InvalidUri(format!("{}: {e}", config.endpoint_uri())))?
            .connect_timeout(config.connect_timeout())
            .timeout(config.timeout());
        if config.tls {
            let tls = ClientTlsConfig::new()
                .with_native_roots()
                .domain_name(config.host.clone());
            endpoint = endpoint.tls_config(tls)?;
        }

        tracing::debug!(uri = %config.endpoint_uri(), tls = config.tls, "connecting to shapes service");
        let channel = endpoint.connect().await?;
        Ok(Self::new(channel, interceptors))
    }

    pub fn new(channel: Channel, interceptors: ShapeInterceptorFactory) -> Self {
        Self {
            inner: ShapeClient::new(channel),
            interceptors,
        }
    }

    // 不需要保护的 hello
    pub async fn hello(&mut self) -> ClientResult<HelloReply> {
        let chain = self.interceptors.hello_interceptors();
        let (log, request) = prepare(Endpoint::Hello, self.interceptors.host(), &chain, HelloRequest {})?;
        finish(log, self.inner.hello(request).await)
    }

    // 需要 API key 的 shape
    pub async fn shape(&mut self) -> ClientResult<ShapeReply> {
        let chain = self.interceptors.shape_interceptors();
        let (log, request) = prepare(Endpoint::Shape, self.interceptors.host(), &chain, ShapeRequest {})?;
        finish(log, self.inner.shape(request).await)
    }

    // 需要 API key 和 attestation 的 approovShape
    pub async fn approov_shape(&mut self) -> ClientResult<ShapeReply> {
        let chain = self.interceptors.approov_shape_interceptors();
        let (log, request) = prepare(
            Endpoint::ApproovShape,
            self.interceptors.host(),
            &chain,
            ApproovShapeRequest {},
        )?;
        finish(log, self.inner.approov_shape(request).await)
    }
}

/// 让请求穿过 endpoint 的拦截器链，得到交给 stub 的 tonic 请求。
fn prepare<M>(
    endpoint: Endpoint,
    host: &str,
    chain: &InterceptorChain<M>,
    message: M,
) -> ClientResult<(RpcLog, Request<M>)> {
    let log = RpcLog::new(endpoint.as_str(), host).with_interceptors(&chain.names());
    let request = {
        let _guard = log.enter();
        chain.prepare_unary(Request::new(message))?
    };
    Ok((log, request))
}

fn finish<R>(log: RpcLog, result: Result<Response<R>, Status>) -> ClientResult<R> {
    match result {
        Ok(rsp) => {
            log.finish_ok();
            Ok(rsp.into_inner())
        }
        Err(status) => {
            log.finish_err(&status);
            Err(status.into())
        }
    }
}
