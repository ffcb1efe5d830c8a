//! Grounded retrieval port
//!
//! Natural-language lookups for networks without a structured API. The
//! answer is JSON text constrained by a schema, plus the web sources the
//! service grounded it on.

use async_trait::async_trait;
use domain::GroundingSource;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// A schema-constrained retrieval request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalQuery {
    pub system_instruction: Option<String>,
    pub prompt: String,
    /// Allow the service to search the web before answering
    pub grounded: bool,
    /// JSON schema the answer must follow
    pub schema: serde_json::Value,
}

/// Raw answer of a retrieval request
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RetrievalAnswer {
    /// Generated JSON text, not yet validated
    pub text: String,
    /// Grounding citations in the order returned
    pub citations: Vec<GroundingSource>,
}

/// Port for natural-language retrieval
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GroundedRetrievalPort: Send + Sync {
    /// Run one retrieval request
    async fn retrieve(&self, query: RetrievalQuery) -> Result<RetrievalAnswer, ApplicationError>;
}
