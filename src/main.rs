#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = pdfquiz_rust::run().await {
        eprintln!("pdfquiz-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
