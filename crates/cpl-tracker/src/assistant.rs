//! Hand-off to the conversational assistant.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

/// A synthetic user message plus the skill variables that travel with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundMessage {
    pub text: String,
    pub skill_variables: Map<String, Value>,
}

#[async_trait]
pub trait Assistant: Send + Sync {
    async fn send(&self, message: &OutboundMessage) -> Result<()>;
}
