//! Text-generation collaborator for the barista kiosk.
//!
//! Sends a customer name and a variety seed to a language model together
//! with a fixed behavioral prompt, and parses the reply strictly into a
//! [`MisspellResult`](barista_types::MisspellResult). Any transport failure
//! or shape deviation is a [`GenerationError`]; nothing is coerced.

pub mod error;
pub mod generator;
pub mod parse;
pub mod prompt;

pub use error::GenerationError;
pub use generator::{AnthropicGenerator, GeneratorConfig, MisspellGenerator};
pub use parse::parse_misspelling;
pub use prompt::{user_message, SYSTEM_PROMPT};
