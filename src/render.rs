use std::io::Write;

use termimad::MadSkin;

use crate::model::Turn;

/// Console output for the chat REPL.
///
/// Assistant replies are rendered as markdown through termimad; if the
/// rendered form comes out unusable the raw text is printed instead.
pub struct Renderer {
    skin: MadSkin,
}

impl Renderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold
            .set_fg(termimad::crossterm::style::Color::Green);
        skin.inline_code
            .set_fg(termimad::crossterm::style::Color::Yellow);
        Self { skin }
    }

    pub fn print_user_prompt(&self) {
        print!("{} ", console::style("You:").cyan().bold());
        let _ = std::io::stdout().flush();
    }

    pub fn print_assistant(&self, markdown: &str) {
        println!("\n{}", console::style("Gemini:").green().bold());
        println!("{}", self.render(markdown));
    }

    pub fn print_history(&self, turns: &[Turn]) {
        if turns.is_empty() {
            println!("(history is empty)\n");
            return;
        }

        for (idx, turn) in turns.iter().enumerate() {
            println!("[{}] {}: {}", idx, turn.role.as_str(), turn.content);
        }
        println!();
    }

    fn render(&self, markdown: &str) -> String {
        let rendered = self.skin.text(markdown, None).to_string();
        if rendered.trim().is_empty() && !markdown.trim().is_empty() {
            return markdown.to_string();
        }
        rendered
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
