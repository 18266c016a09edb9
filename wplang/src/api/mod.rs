//! Translation API client.
//!
//! - `record`: [`TranslationRecord`] and tolerant response parsing
//! - `client`: the [`TranslationApi`] seam and its HTTP implementation

mod client;
mod record;

pub use client::{HttpTranslationApi, TranslationApi};
pub use record::{parse_translations, TranslationRecord};
