//! Language-specific extractor implementations and their registry.

pub mod generic;
mod move_lang;
mod rust_lang;

pub use move_lang::MoveExtractor;
pub use rust_lang::RustExtractor;

use super::{Language, LanguageExtractor};
use once_cell::sync::Lazy;

/// Static storage for the Rust extractor.
static RUST_EXTRACTOR: Lazy<RustExtractor> = Lazy::new(RustExtractor::new);

/// Static storage for the Move extractor.
static MOVE_EXTRACTOR: Lazy<MoveExtractor> = Lazy::new(MoveExtractor::new);

/// All registered extractors, in lookup order.
static REGISTRY: Lazy<Vec<&'static dyn LanguageExtractor>> = Lazy::new(|| {
    vec![
        &*RUST_EXTRACTOR as &'static dyn LanguageExtractor,
        &*MOVE_EXTRACTOR as &'static dyn LanguageExtractor,
    ]
});

/// All registered extractors.
pub fn extractors() -> &'static [&'static dyn LanguageExtractor] {
    &REGISTRY
}

/// Get the extractor for a language.
pub fn get_extractor(language: Language) -> &'static dyn LanguageExtractor {
    match language {
        Language::Rust => &*RUST_EXTRACTOR,
        Language::Move => &*MOVE_EXTRACTOR,
    }
}

/// Get an extractor for the given file extension (without dot).
///
/// Returns None if no extractor handles the extension.
pub fn get_extractor_for_extension(ext: &str) -> Option<&'static dyn LanguageExtractor> {
    extractors()
        .iter()
        .copied()
        .find(|e| e.handles_extension(ext))
}

/// Get all registered file extensions.
pub fn registered_extensions() -> Vec<&'static str> {
    extractors()
        .iter()
        .flat_map(|e| e.file_extensions().iter().copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_extension() {
        assert_eq!(
            get_extractor_for_extension("rs").map(|e| e.language()),
            Some(Language::Rust)
        );
        assert_eq!(
            get_extractor_for_extension("move").map(|e| e.language()),
            Some(Language::Move)
        );
        assert!(get_extractor_for_extension("py").is_none());
    }

    #[test]
    fn test_every_language_registered() {
        for language in Language::ALL {
            assert_eq!(get_extractor(language).language(), language);
        }
        assert_eq!(registered_extensions(), vec!["rs", "move"]);
    }
}
