//! Verity Reasoner Layer
//!
//! External reasoning for claims the corpus cannot answer.
//!
//! # Architecture
//!
//! Each model is an [`LlmProvider`](verity_domain::traits::LlmProvider) bound
//! to one model name. A [`ModelChain`] holds providers tagged with a
//! priority and implements [`Reasoner`](verity_domain::traits::Reasoner):
//! rate limits and blocked responses move on to the next model, every other
//! failure ends the attempt.
//!
//! # Providers
//!
//! - `MockProvider`: scripted replies for testing
//! - `GeminiProvider`: Gemini `generateContent` REST API
//!
//! # Examples
//!
//! ```
//! use verity_domain::traits::Reasoner;
//! use verity_domain::{ReasonerOutcome, ReasoningRequest};
//! use verity_reasoner::{MockProvider, ModelChain};
//!
//! let reply = r#"{"verdict": "false", "confidence": 0.9, "explanation": "No such scheme"}"#;
//! let chain = ModelChain::new()
//!     .with_provider(0, Box::new(MockProvider::rate_limited("gemini-2.5-pro")))
//!     .with_provider(1, Box::new(MockProvider::new("gemini-2.0-flash", reply)));
//!
//! match chain.reason(&ReasoningRequest::new("Free laptops for all students", "en")) {
//!     ReasonerOutcome::Verdict(v) => assert_eq!(v.model_used, "gemini-2.0-flash"),
//!     other => panic!("{:?}", other),
//! }
//! ```

#![warn(missing_docs)]

pub mod chain;
pub mod config;
pub mod error;
pub mod gemini;
pub mod mock;
pub mod parser;
pub mod prompt;

pub use chain::{DynProvider, ModelChain};
pub use config::{ModelSpec, ReasonerConfig};
pub use error::{LlmError, ParseError};
pub use gemini::GeminiProvider;
pub use mock::MockProvider;
pub use parser::parse_reasoner_response;
pub use prompt::PromptBuilder;
