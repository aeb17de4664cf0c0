use crate::{
    error::TempoError,
    message::{NumberToken, SkillRequest, TokenSpan},
};
use async_trait::async_trait;

/// Transport trait — delivers utterances and publishes responses.
///
/// Every transport (MQTT bridge, console, test double) implements this
/// trait to feed requests into the skill and carry answers back out.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Human-readable transport name.
    fn name(&self) -> &str;

    /// Start listening for inbound utterances.
    /// Returns a receiver that yields skill requests.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<SkillRequest>, TempoError>;

    /// Publish a response to a destination. `broadcast` routes to every
    /// listening output instead of a single reply destination.
    async fn publish(&self, text: &str, destination: &str, broadcast: bool)
        -> Result<(), TempoError>;

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), TempoError> {
        Ok(())
    }
}

/// Analyzer trait — the text-analysis unit the skill consumes.
///
/// The contract only guarantees explicit numeral-plus-unit patterns and
/// explicit digit-group clock times; richer phrasings yield nothing.
pub trait Analyzer: Send + Sync {
    /// All (number, following word) pairs in the text, in text order.
    fn extract_numbers(&self, text: &str) -> Vec<NumberToken>;

    /// All raw spans tagged as numeric or time-entity, in text order.
    fn extract_time_spans(&self, text: &str) -> Vec<TokenSpan>;
}
