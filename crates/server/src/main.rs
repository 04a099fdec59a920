#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ragwright_server::start().await
}
