#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = schoolhub::run().await {
        eprintln!("schoolhub fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
