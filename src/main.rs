use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    gemini_chat::run().await
}
