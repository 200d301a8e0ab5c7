use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::Settings;
use crate::providers::gemini::GeminiGateway;
use crate::render::Renderer;
use crate::session::ChatSession;

pub async fn run(settings: &Settings) -> Result<()> {
    let gateway = GeminiGateway::new(settings)?;
    let mut session = ChatSession::new(gateway);
    let renderer = Renderer::new();

    println!("\nWelcome to Gemini Chat!");
    println!("model: {}", settings.model_name);
    println!("Type 'exit' to end the conversation, '/history' to review it, or Ctrl+C to quit.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        renderer.print_user_prompt();

        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read stdin")?,
            _ = tokio::signal::ctrl_c() => {
                println!("\nChat session terminated.");
                return Ok(());
            }
        };
        let Some(input) = line else {
            break;
        };

        let prompt = input.trim();
        if prompt.is_empty() {
            continue;
        }
        if prompt.eq_ignore_ascii_case("exit") {
            println!("\nGoodbye!");
            break;
        }
        if prompt.eq_ignore_ascii_case("/history") {
            renderer.print_history(&session.history());
            continue;
        }

        let reply = session.send(prompt).await?;
        renderer.print_assistant(&reply);
    }

    Ok(())
}
