use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::ChatError;
use crate::model::Turn;

pub type GatewayFuture<'a> = Pin<Box<dyn Future<Output = Result<String, ChatError>> + Send + 'a>>;

/// Narrow capability interface over the remote conversational endpoint.
///
/// The transcript slice carries the whole conversation so far, newest turn
/// last; implementations return the assistant's reply text. Keeping the
/// surface this small lets the vendor backend be swapped (or stubbed in
/// tests) without touching any caller.
pub trait ChatGateway: Send + Sync {
    fn send<'a>(&'a self, turns: &'a [Turn]) -> GatewayFuture<'a>;
}

impl<G: ChatGateway + ?Sized> ChatGateway for Arc<G> {
    fn send<'a>(&'a self, turns: &'a [Turn]) -> GatewayFuture<'a> {
        (**self).send(turns)
    }
}
