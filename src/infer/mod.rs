//! Schema inference
//!
//! External collaborator that turns a free-text situation description into
//! a form schema. Providers are pluggable; the service layer guarantees a
//! usable schema by substituting the locale-aware fallback whenever the
//! provider fails or returns something the validator cannot compile.

mod provider;
mod service;
mod types;

pub use provider::{DisabledProvider, InferenceProvider, OpenAiProvider};
pub use service::InferenceService;
pub use types::InferenceError;
