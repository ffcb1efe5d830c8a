//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod gemini_retrieval_adapter;
mod irail_adapter;

pub use gemini_retrieval_adapter::GeminiRetrievalAdapter;
pub use irail_adapter::IRailAdapter;
