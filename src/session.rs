use tracing::debug;

use crate::error::ChatError;
use crate::gateway::ChatGateway;
use crate::model::Turn;

/// One conversation with the model.
///
/// Owns the transcript exclusively; nothing else mutates it. The CLI keeps
/// one session for the whole run, the web layer builds a fresh one per
/// request.
pub struct ChatSession<G> {
    gateway: G,
    transcript: Vec<Turn>,
}

impl<G: ChatGateway> ChatSession<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            transcript: Vec::new(),
        }
    }

    /// Forward `text` to the model and return its reply.
    ///
    /// On success the user turn and the assistant turn are appended to the
    /// transcript, in that order. A failed call leaves the transcript
    /// unchanged.
    pub async fn send(&mut self, text: &str) -> Result<String, ChatError> {
        let mut outgoing = self.transcript.clone();
        outgoing.push(Turn::user(text));

        let reply = self.gateway.send(&outgoing).await?;

        self.transcript.push(Turn::user(text));
        self.transcript.push(Turn::assistant(reply.clone()));
        debug!(transcript_len = self.transcript.len(), "recorded exchange");
        Ok(reply)
    }

    /// A detached snapshot of the transcript.
    pub fn history(&self) -> Vec<Turn> {
        self.transcript.clone()
    }
}
