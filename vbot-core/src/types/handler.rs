use async_trait::async_trait;

use super::{message::Message, response::HandlerResponse};
use crate::error::Result;

/// A link in the handler chain.
///
/// For each message the chain calls every `before` in order (any `false` vetoes
/// the message), then `handle` in order until one returns a terminal response,
/// then every `after` in reverse order with that response. All three phases
/// default to pass-through, so a handler overrides only what it needs.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Name used in chain logs. Defaults to the implementing type's path.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    async fn before(&self, _message: &Message) -> Result<bool> {
        Ok(true)
    }

    async fn handle(&self, _message: &Message) -> Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }

    async fn after(&self, _message: &Message, _response: &HandlerResponse) -> Result<()> {
        Ok(())
    }
}
