#[tokio::main]
async fn main() -> anyhow::Result<()> {
    product_services::cli::run().await
}
