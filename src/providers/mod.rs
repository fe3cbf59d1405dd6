//! Provider abstraction layer for the generative model
//!
//! Handlers talk to a [`CompletionProvider`]; Gemini is the production implementation.
mod completion;
mod gemini;

pub use completion::CompletionProvider;
pub use gemini::GeminiCompletionProvider;
