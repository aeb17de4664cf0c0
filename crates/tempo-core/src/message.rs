use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An inbound utterance routed to the skill by a transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillRequest {
    pub id: Uuid,
    /// Raw utterance text.
    pub text: String,
    /// Destination identifier the response must be published to.
    pub output_topic: String,
    /// Room or zone the utterance originated from, when the transport knows it.
    #[serde(default)]
    pub room: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl SkillRequest {
    /// Build a request with a fresh id and the current timestamp.
    pub fn new(text: &str, output_topic: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.to_string(),
            output_topic: output_topic.to_string(),
            room: None,
            timestamp: Utc::now(),
        }
    }
}

/// A number found in an utterance, paired with the word that follows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberToken {
    pub value: u32,
    /// The word immediately after the number, lowercased ("minutes", "oclock").
    pub next_word: String,
}

/// How a raw token span was tagged by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanTag {
    /// A bare digit group ("730", "10").
    Num,
    /// A time-entity phrase ("7 o'clock", "noon").
    Time,
}

/// A raw text span tagged as numeric or time-entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSpan {
    pub text: String,
    pub tag: SpanTag,
}

impl TokenSpan {
    pub fn num(text: &str) -> Self {
        Self {
            text: text.to_string(),
            tag: SpanTag::Num,
        }
    }

    pub fn time(text: &str) -> Self {
        Self {
            text: text.to_string(),
            tag: SpanTag::Time,
        }
    }
}
