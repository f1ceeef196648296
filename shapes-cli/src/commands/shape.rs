use anyhow::Result;
use clap::Parser;
use console::style;
use shapes_client::pb::ShapeReply;
use shapes_client::{ClientConfig, ClientResult};

use crate::outcome::Outcome;

#[derive(Parser)]
pub struct ShapeCli {
    /// 调用受 attestation 保护的 approovShape
    #[arg(long)]
    pub approov: bool,
}

impl ShapeCli {
    pub async fn handle(&self, config: &ClientConfig) -> Result<()> {
        println!("{}", style("Checking app authenticity...").cyan());

        let result = tokio::spawn(call(config.clone(), self.approov)).await?;

        println!("{}", Outcome::from_shape(result));
        Ok(())
    }
}

async fn call(config: ClientConfig, approov: bool) -> ClientResult<ShapeReply> {
    let mut client = super::connect(&config).await?;
    if approov {
        client.approov_shape().await
    } else {
        client.shape().await
    }
}
