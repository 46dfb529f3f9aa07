use uuid::Uuid;
use crate::listing::types::{ItemAttributes, ListingText, TitleTone};

/// Keyword used when the tone contributes none.
pub const FALLBACK_KEYWORD: &str = "stylish";

/// Placeholder score attached to every generated text.
pub const PLACEHOLDER_QUALITY_SCORE: f64 = 0.9;

/// Generate one title/description pair per tone keyword.
///
/// Unrecognized tones fall back to [`FALLBACK_KEYWORD`], so the result is
/// never empty. The raw tone string is echoed on every result.
pub fn generate_titles(attributes: &ItemAttributes, tone: &str) -> Vec<ListingText> {
    let keywords: &[&str] = match TitleTone::parse(tone) {
        Some(tone) => tone.keywords(),
        None => &[FALLBACK_KEYWORD],
    };

    keywords
        .iter()
        .map(|keyword| ListingText {
            id: Uuid::new_v4(),
            title: compose_title(attributes, keyword),
            description: compose_description(attributes, keyword),
            tone: tone.to_string(),
            quality_score: PLACEHOLDER_QUALITY_SCORE,
        })
        .collect()
}

fn compose_title(attributes: &ItemAttributes, keyword: &str) -> String {
    format!(
        "{} {} {} {}",
        attributes.brand, attributes.material, attributes.size, keyword
    )
    .trim()
    .to_string()
}

fn compose_description(attributes: &ItemAttributes, keyword: &str) -> String {
    format!(
        "{} {} in size {}. Condition: {}. Features {}. {}. Ready to ship from UK.",
        attributes.brand,
        attributes.material,
        attributes.size,
        attributes.condition,
        keyword,
        item_specifics(attributes),
    )
}

/// `name: value` pairs for every aspect that has a value.
fn item_specifics(attributes: &ItemAttributes) -> String {
    attributes
        .aspects
        .iter()
        .filter(|aspect| !aspect.value.is_empty())
        .map(|aspect| format!("{}: {}", aspect.name, aspect.value))
        .collect::<Vec<_>>()
        .join(", ")
}
