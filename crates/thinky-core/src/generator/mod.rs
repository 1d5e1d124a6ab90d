//! Generator adapter interface for the external text-generation service.
//!
//! This module defines the [`Generator`] trait that every backend
//! implements, the [`GenerationError`] taxonomy, and the concrete
//! backends.
//!
//! # Architecture
//!
//! ```text
//! Agent (mood / schedule / nutrition)
//!     |
//!     | prompt: String
//!     v
//! Arc<dyn Generator> --generate(prompt)--> ClaudeCodeGenerator | CommandGenerator
//!     |                                            |
//!     | response text                              v
//!     v                                      subprocess (claude, ollama, ...)
//! extract_json(text) -> JSON object
//! ```

pub mod claude_code;
pub mod command;
pub mod settings;
pub mod trait_def;
pub mod types;

// Re-export the primary public API at the module level.
pub use claude_code::ClaudeCodeGenerator;
pub use command::CommandGenerator;
pub use settings::{GeneratorKind, GeneratorSettings, build_generator};
pub use trait_def::Generator;
pub use types::{GenerationError, StreamEvent};
