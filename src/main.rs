#[tokio::main]
async fn main() -> anyhow::Result<()> {
    consign_pilot::cli::run().await
}
