use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    conceptmap_cli::main_entry().await
}
