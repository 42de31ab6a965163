//! # LLDM Traits
//!
//! The seam between item generation and whatever model produces the text.

use crate::ForgeResult;

/// Turns a prompt into free text.
///
/// Implemented by [`super::GeminiClient`] for real requests; tests supply scripted
/// replies.
pub trait TextGenerator {
    /// Sends the prompt and returns the raw reply.
    fn generate(&self, prompt: &str) -> ForgeResult<String>;
}

impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    fn generate(&self, prompt: &str) -> ForgeResult<String> {
        (**self).generate(prompt)
    }
}

impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    fn generate(&self, prompt: &str) -> ForgeResult<String> {
        (**self).generate(prompt)
    }
}
