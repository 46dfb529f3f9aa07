use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Style selector for generated titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleTone {
    Seo,
    Concise,
    Vintage,
}

impl TitleTone {
    pub fn parse(tone: &str) -> Option<Self> {
        match tone {
            "seo" => Some(TitleTone::Seo),
            "concise" => Some(TitleTone::Concise),
            "vintage" => Some(TitleTone::Vintage),
            _ => None,
        }
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            TitleTone::Seo => &["premium", "authentic", "fast shipping"],
            TitleTone::Concise => &["ready to ship"],
            TitleTone::Vintage => &["retro", "heritage"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aspect {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub options: Vec<String>,
}

/// Structured attributes of the item being listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemAttributes {
    pub brand: String,
    pub size: String,
    pub material: String,
    pub condition: String,
    #[serde(default)]
    pub aspects: Vec<Aspect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingText {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub tone: String,
    pub quality_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_parse() {
        assert_eq!(TitleTone::parse("seo"), Some(TitleTone::Seo));
        assert_eq!(TitleTone::parse("vintage"), Some(TitleTone::Vintage));
        assert_eq!(TitleTone::parse("SEO"), None);
        assert_eq!(TitleTone::parse("playful"), None);
    }

    #[test]
    fn test_aspect_deserializes_with_defaults() {
        let aspect: Aspect = serde_json::from_value(serde_json::json!({
            "id": "00000000-0000-0000-0000-000000000001",
            "name": "Size",
            "isRequired": true
        }))
        .unwrap();

        assert!(aspect.is_required);
        assert!(aspect.value.is_empty());
        assert!(aspect.options.is_empty());
    }
}
