//! Provider wire formats.

pub mod gemini;
