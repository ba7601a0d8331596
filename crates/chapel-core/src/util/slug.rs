//! Slug generation for event titles.
//!
//! ## Summary
//! Produces lowercase, hyphen-separated ASCII slugs used in public schedule
//! URLs. Titles are decomposed (NFD) and combining marks dropped, so that
//! "Reunión de Oración" and "Reunion de Oracion" share a slug.

use icu::normalizer::DecomposingNormalizerBorrowed;
use icu::properties::CodePointMapData;
use icu::properties::props::GeneralCategory;

/// Latin letters with no canonical decomposition, spelled out in ASCII.
fn transliterate(c: char) -> Option<&'static str> {
    match c {
        'ł' => Some("l"),
        'ø' => Some("o"),
        'đ' => Some("d"),
        'ı' => Some("i"),
        'œ' => Some("oe"),
        'æ' => Some("ae"),
        'ß' => Some("ss"),
        'þ' => Some("th"),
        _ => None,
    }
}

/// Lowercases `title` and reduces accented letters to their ASCII base.
fn fold_to_ascii(title: &str) -> String {
    let lowered = title.to_lowercase();
    let decomposed = DecomposingNormalizerBorrowed::new_nfd().normalize(&lowered);
    let categories = CodePointMapData::<GeneralCategory>::new();

    let mut folded = String::with_capacity(decomposed.len());
    for c in decomposed.chars() {
        if categories.get(c) == GeneralCategory::NonspacingMark {
            continue;
        }
        match transliterate(c) {
            Some(ascii) => folded.push_str(ascii),
            None => folded.push(c),
        }
    }
    folded
}

/// Generate a URL-safe slug from an event title.
///
/// Examples:
/// - "Sunday Service" -> "sunday-service"
/// - "Reunión de Oración" -> "reunion-de-oracion"
/// - "Youth & Young Adults" -> "youth-young-adults"
#[must_use]
pub fn generate_slug(title: &str) -> String {
    let slug = fold_to_ascii(title)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    // A bare uuid slug would be ambiguous with id lookups
    if uuid::Uuid::parse_str(&slug).is_ok() {
        format!("event-{slug}")
    } else {
        slug
    }
}
