//! Ordered list of [`Handler`]s run in three phases per message.
//!
//! `before` runs front to back and may veto; `handle` runs front to back until a
//! terminal response; `after` runs back to front and sees that response.

use std::sync::Arc;
use tracing::{debug, info, instrument};
use vbot_core::{Handler, HandlerResponse, Message, Result};

#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Handler names in chain order.
    pub fn names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Runs one message through the chain and returns the final response.
    ///
    /// A veto in `before` returns [`HandlerResponse::Stop`] without running any
    /// `handle` or `after`. If no handler is terminal the result is `Continue`.
    /// The first error from any phase aborts the run.
    #[instrument(skip_all, fields(user_id = message.user.id, message_id = %message.id))]
    pub async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if let Some(vetoed_by) = self.run_before(message).await? {
            info!(handler = vetoed_by, "message vetoed");
            return Ok(HandlerResponse::Stop);
        }
        let response = self.run_handle(message).await?;
        self.run_after(message, &response).await?;
        debug!(response = %response, "chain finished");
        Ok(response)
    }

    /// Returns the name of the vetoing handler, if any.
    async fn run_before(&self, message: &Message) -> Result<Option<&'static str>> {
        for handler in &self.handlers {
            if !handler.before(message).await? {
                return Ok(Some(handler.name()));
            }
        }
        Ok(None)
    }

    async fn run_handle(&self, message: &Message) -> Result<HandlerResponse> {
        for handler in &self.handlers {
            let response = handler.handle(message).await?;
            debug!(handler = handler.name(), response = %response, "handle");
            if response.is_terminal() {
                return Ok(response);
            }
        }
        Ok(HandlerResponse::Continue)
    }

    async fn run_after(&self, message: &Message, response: &HandlerResponse) -> Result<()> {
        for handler in self.handlers.iter().rev() {
            handler.after(message, response).await?;
        }
        Ok(())
    }
}
