//! Filename normalization for URL/filesystem-safe tokens.
//!
//! Default metadata file names are derived from the uploaded name; export
//! names must always carry a recognized image extension.

use crate::utils::formats::{is_recognized_extension, OutputFormat};

/// Normalizes arbitrary text into a URL/filename-safe token.
///
/// Lowercases, converts whitespace runs to single hyphens, strips everything
/// outside `[a-z0-9._-]`, collapses hyphen runs and trims edge hyphens.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_hyphen = false;

    for ch in text.to_lowercase().chars() {
        let mapped = if ch.is_whitespace() { '-' } else { ch };
        match mapped {
            'a'..='z' | '0'..='9' | '.' | '_' => {
                out.push(mapped);
                last_hyphen = false;
            }
            '-' => {
                if !last_hyphen && !out.is_empty() {
                    out.push('-');
                }
                last_hyphen = true;
            }
            // Anything else (punctuation, emoji, non-latin) is dropped
            _ => {}
        }
    }

    out.trim_matches('-').to_string()
}

/// Derives the default `fileName` metadata for an upload: the slug of the
/// original name without its extension. Falls back to `"image"` when the
/// name slugs to nothing.
pub fn default_file_name(original_name: &str) -> String {
    let stem = match original_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && is_recognized_extension(ext) => stem,
        _ => original_name,
    };

    let slug = slugify(stem);
    if slug.is_empty() {
        "image".to_string()
    } else {
        slug
    }
}

/// Returns `name` guaranteed to end in a recognized image extension,
/// appending the format's primary extension when missing or unrecognized.
pub fn export_file_name(name: &str, format: OutputFormat) -> String {
    let base = if name.trim().is_empty() { "image" } else { name };

    if let Some((stem, ext)) = base.rsplit_once('.') {
        if !stem.is_empty() && is_recognized_extension(ext) {
            return base.to_string();
        }
    }

    format!("{}.{}", base, format.primary_extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates_whitespace() {
        assert_eq!(slugify("My Holiday Photo"), "my-holiday-photo");
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(slugify("a   b\t c"), "a-b-c");
    }

    #[test]
    fn strips_unsafe_characters() {
        assert_eq!(slugify("café & crème.jpg"), "caf-crme.jpg");
        assert_eq!(slugify("shot(1)!"), "shot1");
    }

    #[test]
    fn trims_edge_hyphens() {
        assert_eq!(slugify("  padded  "), "padded");
        assert_eq!(slugify("--dashes--"), "dashes");
    }

    #[test]
    fn default_name_drops_known_extension() {
        assert_eq!(default_file_name("My Photo.JPG"), "my-photo");
        assert_eq!(default_file_name("beach sunset.webp"), "beach-sunset");
    }

    #[test]
    fn default_name_keeps_unknown_extension_as_text() {
        assert_eq!(default_file_name("archive.tar"), "archive.tar");
    }

    #[test]
    fn default_name_falls_back_when_empty() {
        assert_eq!(default_file_name(""), "image");
        assert_eq!(default_file_name("🙂🙂"), "image");
    }

    #[test]
    fn export_name_appends_missing_extension() {
        assert_eq!(export_file_name("hero-shot", OutputFormat::Jpeg), "hero-shot.jpg");
        assert_eq!(export_file_name("logo", OutputFormat::Png), "logo.png");
    }

    #[test]
    fn export_name_keeps_existing_recognized_extension() {
        assert_eq!(export_file_name("hero.jpeg", OutputFormat::WebP), "hero.jpeg");
    }

    #[test]
    fn export_name_handles_empty_input() {
        assert_eq!(export_file_name("", OutputFormat::Jpeg), "image.jpg");
    }
}
