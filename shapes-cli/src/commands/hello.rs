use anyhow::Result;
use clap::Parser;
use console::style;
use shapes_client::pb::HelloReply;
use shapes_client::{ClientConfig, ClientResult};

use crate::outcome::Outcome;

#[derive(Parser)]
pub struct HelloCli;

impl HelloCli {
    pub async fn handle(&self, config: &ClientConfig) -> Result<()> {
        println!("{}", style("Checking connectivity...").cyan());

        let result = tokio::spawn(call(config.clone())).await?;

        println!("{}", Outcome::from_hello(result));
        Ok(())
    }
}

async fn call(config: ClientConfig) -> ClientResult<HelloReply> {
    let mut client = super::connect(&config).await?;
    client.hello().await
}
