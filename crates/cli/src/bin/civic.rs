use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    civic_cli::main_entry().await
}
