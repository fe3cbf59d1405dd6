//! Grammar Bot - AI grammar checking and smart text assistant backend
//!
//! Relays text selected in the browser extension to a generative model through a
//! fixed set of prompt templates, and shapes the model's reply for the extension.

pub mod assistant;
pub mod config;
pub mod error;
pub mod features;
pub mod prompts;
pub mod providers;
pub mod server;
pub mod types;

pub use error::{Error, Result};
pub use types::*;

pub use assistant::Assistant;
pub use config::Config;
pub use providers::{CompletionProvider, GeminiCompletionProvider};
pub use server::{AppState, router};
