//! Language model clients for Mindnote.
//!
//! A [`LanguageModelClient`] turns a prompt and a sampling temperature into
//! generated text. Backend failures come back as [`ProviderError`] values so
//! callers can abort cleanly instead of receiving error text as output.
//!
//! # Example
//!
//! ```rust,ignore
//! use mindnote_providers::{LanguageModelClient, OpenAIChatClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenAIChatClient::from_env()?;
//!     let text = client.generate("Say something kind.", 0.7).await?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```

mod error;

#[cfg(feature = "openai")]
pub mod openai;

pub use error::{ProviderError, Result};

#[cfg(feature = "openai")]
pub use openai::OpenAIChatClient;

use async_trait::async_trait;

/// A backend that generates text from a prompt.
#[async_trait]
pub trait LanguageModelClient: Send + Sync {
    /// Get client name.
    fn name(&self) -> &str;

    /// Generate one completion for `prompt` at `temperature`.
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String>;
}
