//! AI Core - Grounded retrieval engine
//!
//! Provides abstractions for schema-constrained, search-grounded text
//! generation, with a Gemini `generateContent` implementation. Responses carry
//! the generated text together with the web citations the model grounded on.

pub mod config;
pub mod error;
pub mod gemini;
pub mod ports;

pub use config::InferenceConfig;
pub use error::InferenceError;
pub use gemini::GeminiInferenceEngine;
pub use ports::{Citation, InferenceEngine, InferenceRequest, InferenceResponse};
