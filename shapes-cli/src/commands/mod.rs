mod hello;
mod shape;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use shapes_client::{ClientConfig, ClientConfigOverride, ClientResult, ShapesClient};

#[derive(Parser)]
#[command(name = "shapes")]
#[command(about = "Command line client for the Approov shapes demo service", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub async fn handle(&self) -> Result<()> {
        let config = self.global.load_config()?;
        match &self.command {
            Commands::Hello(hello_cli) => hello_cli.handle(&config).await,
            Commands::Shape(shape_cli) => shape_cli.handle(&config).await,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// 检查与服务的连通性（不需要任何凭证）
    Hello(hello::HelloCli),
    /// 获取一个形状，验证 app 身份
    Shape(shape::ShapeCli),
}

/// 覆盖配置文件的全局参数
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// 配置文件路径，缺省使用用户配置目录下的 shapes/client.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[arg(long, global = true)]
    pub host: Option<String>,
    #[arg(long, global = true)]
    pub port: Option<u16>,
    /// 使用明文 http/2 而不是 TLS
    #[arg(long, global = true)]
    pub plaintext: bool,
    #[arg(long, global = true)]
    pub api_key_header: Option<String>,
    #[arg(long, global = true)]
    pub api_key: Option<String>,
    /// 预先签发的 attestation token
    #[arg(long, global = true)]
    pub attestation_token: Option<String>,
}

impl GlobalArgs {
    fn to_override(&self) -> ClientConfigOverride {
        ClientConfigOverride {
            host: self.host.clone(),
            port: self.port,
            tls: self.plaintext.then_some(false),
            api_key_header_name: self.api_key_header.clone(),
            api_key: self.api_key.clone(),
            attestation_token: self.attestation_token.clone(),
        }
    }

    pub fn load_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::load_path(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ClientConfig::load()?,
        };
        config.merge(self.to_override());
        tracing::debug!(uri = %config.endpoint_uri(), "configuration loaded");
        Ok(config)
    }
}

/// 按配置建立客户端。拦截器配置错误在这里就会暴露出来。
async fn connect(config: &ClientConfig) -> ClientResult<ShapesClient> {
    let interceptors = config.interceptor_factory()?;
    ShapesClient::connect(config, interceptors).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_map_to_override() {
        let cli = Cli::parse_from([
            "shapes",
            "shape",
            "--approov",
            "--host",
            "127.0.0.1",
            "--port",
            "6000",
            "--plaintext",
            "--api-key",
            "secret123",
            "--attestation-token",
            "token-abc",
        ]);

        let over = cli.global.to_override();
        assert_eq!(over.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(over.port, Some(6000));
        assert_eq!(over.tls, Some(false));
        assert_eq!(over.api_key.as_deref(), Some("secret123"));
        assert_eq!(over.attestation_token.as_deref(), Some("token-abc"));
        assert!(over.api_key_header_name.is_none());
        assert!(matches!(cli.command, Commands::Shape(ref s) if s.approov));
    }

    #[test]
    fn missing_flags_keep_config_values() {
        let cli = Cli::parse_from(["shapes", "hello"]);

        let mut config = ClientConfig::default();
        config.merge(cli.global.to_override());

        assert_eq!(config, ClientConfig::default());
    }
}
