use anyhow::Result;
use kai::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
