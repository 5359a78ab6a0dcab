use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    autoppia_affine::cli::app::run().await
}
