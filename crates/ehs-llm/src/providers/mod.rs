//! Generation service implementations.

pub mod gemini;

pub use gemini::GeminiProvider;
