
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio_stream::wrappers::TcpListenerStream;
use tonic::metadata::MetadataMap;
use tonic::transport::Server;
use tonic::{Request, Response, Status};

use crate::ClientConfig;
use crate::pb::shape_server::{Shape, ShapeServer};
use crate::pb::{ApproovShapeRequest, HelloReply, HelloRequest, ShapeReply, ShapeRequest};

pub const TEST_API_KEY: &str = "secret123";
pub const TEST_TOKEN: &str = "token-abc";

/// 记录每次调用收到的 metadata，并按 demo 服务的规则校验 API key / token。
#[derive(Clone, Default)]
pub struct RecordingShapes {
    pub seen: Arc<Mutex<Vec<(&'static str, MetadataMap)>>>,
}

impl RecordingShapes {
    fn record<T>(&self, method: &'static str, request: &Request<T>) {
        self.seen
            .lock()
            .unwrap()
            .push((method, request.metadata().clone()));
    }

    pub fn calls(&self) -> Vec<(&'static str, MetadataMap)> {
        self.seen.lock().unwrap().clone()
    }
}

fn require<T>(request: &Request<T>, header: &str, expected: &str) -> Result<(), Status> {
    match request.metadata().get(header).and_then(|v| v.to_str().ok()) {
        Some(v) if v == expected => Ok(()),
        Some(_) => Err(Status::permission_denied(format!("wrong {header}"))),
        None => Err(Status::unauthenticated(format!("missing {header}"))),
    }
}

#[tonic::async_trait]
impl Shape for RecordingShapes {
    async fn hello(&self, request: Request<HelloRequest>) -> Result<Response<HelloReply>, Status> {
        self.record("hello", &request);
        Ok(Response::new(HelloReply {
            message: "Hello, World!".to_string(),
        }))
    }

    async fn shape(&self, request: Request<ShapeRequest>) -> Result<Response<ShapeReply>, Status> {
        self.record("shape", &request);
        require(&request, "api-key", TEST_API_KEY)?;
        Ok(Response::new(ShapeReply {
            message: "Circle".to_string(),
        }))
    }

    async fn approov_shape(
        &self,
        request: Request<ApproovShapeRequest>,
    ) -> Result<Response<ShapeReply>, Status> {
        self.record("approovShape", &request);
        require(&request, "api-key", TEST_API_KEY)?;
        require(&request, "approov-token", TEST_TOKEN)?;
        Ok(Response::new(ShapeReply {
            message: "triangle".to_string(),
        }))
    }
}

/// 在 127.0.0.1 的随机端口上启动服务，返回监听地址。
pub async fn spawn_server(service: RecordingShapes) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        Server::builder()
            .add_service(ShapeServer::new(service))
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });
    addr
}

/// 指向本地测试服务的明文配置。
pub fn local_config(addr: SocketAddr) -> ClientConfig {
    ClientConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
        tls: false,
        api_key: TEST_API_KEY.to_string(),
        ..ClientConfig::default()
    }
}
