use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder the detector state shows when a detection gave no usable tag.
pub const UNKNOWN: &str = "Unknown";

/// Short language code such as `en` or `fr`, stored trimmed and lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct LanguageTag(String);

impl LanguageTag {
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self(tag.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LanguageTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for LanguageTag {
    fn from(tag: String) -> Self {
        Self::new(tag)
    }
}

impl From<LanguageTag> for String {
    fn from(tag: LanguageTag) -> Self {
        tag.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageOption {
    pub tag: LanguageTag,
    pub name: String,
}

impl LanguageOption {
    pub fn new(tag: impl Into<LanguageTag>, name: impl Into<String>) -> Self {
        Self { tag: tag.into(), name: name.into() }
    }
}

/// The fixed set of languages translate and summarize accept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageSet {
    options: Vec<LanguageOption>,
}

impl LanguageSet {
    /// Builds a set, dropping repeated tags (first one wins).
    pub fn new(options: impl IntoIterator<Item = LanguageOption>) -> Self {
        let mut deduped: Vec<LanguageOption> = Vec::new();
        for option in options {
            if option.tag.as_str().is_empty() || deduped.iter().any(|o| o.tag == option.tag) {
                continue;
            }
            deduped.push(option);
        }
        Self { options: deduped }
    }

    /// Parses `en:English,fr:French`. A bare tag uses itself as display name.
    pub fn parse(raw: &str) -> Option<Self> {
        let options = raw
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| match entry.split_once(':') {
                Some((tag, name)) => LanguageOption::new(tag, name.trim()),
                None => LanguageOption::new(entry, entry),
            });
        let set = Self::new(options);
        if set.is_empty() { None } else { Some(set) }
    }

    pub fn contains(&self, tag: &str) -> bool {
        let tag = LanguageTag::new(tag);
        self.options.iter().any(|o| o.tag == tag)
    }

    pub fn display_name(&self, tag: &str) -> Option<&str> {
        let tag = LanguageTag::new(tag);
        self.options.iter().find(|o| o.tag == tag).map(|o| o.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &LanguageOption> {
        self.options.iter()
    }

    pub fn first(&self) -> Option<&LanguageTag> {
        self.options.first().map(|o| &o.tag)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl Default for LanguageSet {
    fn default() -> Self {
        Self::new([
            LanguageOption::new("en", "English"),
            LanguageOption::new("fr", "French"),
            LanguageOption::new("ru", "Russian"),
            LanguageOption::new("es", "Spanish"),
            LanguageOption::new("pt", "Portuguese"),
        ])
    }
}

/// Conversation-level result of the most recently completed detection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetectedLanguage {
    /// Nothing detected yet.
    #[default]
    Pending,
    Unknown,
    Detected(LanguageTag),
}

impl DetectedLanguage {
    /// Reads the top candidate's tag; an empty or undetermined tag is `Unknown`.
    pub fn from_candidate(language: Option<&str>) -> Self {
        match language.map(str::trim) {
            None | Some("") => Self::Unknown,
            Some(tag) if tag.eq_ignore_ascii_case(UNKNOWN) || tag.eq_ignore_ascii_case("und") => {
                Self::Unknown
            }
            Some(tag) => Self::Detected(LanguageTag::new(tag)),
        }
    }

    pub fn tag(&self) -> Option<&LanguageTag> {
        match self {
            Self::Detected(tag) => Some(tag),
            _ => None,
        }
    }
}

impl fmt::Display for DetectedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Detecting..."),
            Self::Unknown => write!(f, "{}", UNKNOWN),
            Self::Detected(tag) => write!(f, "{}", tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_has_five_languages() {
        let set = LanguageSet::default();
        assert_eq!(set.len(), 5);
        assert!(set.contains("fr"));
        assert!(set.contains(" PT "));
        assert!(!set.contains("de"));
        assert!(!set.contains(UNKNOWN));
        assert_eq!(set.display_name("ru"), Some("Russian"));
    }

    #[test]
    fn parse_language_list() {
        let set = LanguageSet::parse("en:English, de:German,ja,en:Duplicate").unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.display_name("en"), Some("English"));
        assert_eq!(set.display_name("ja"), Some("ja"));
        assert!(LanguageSet::parse(" , ").is_none());
    }

    #[test]
    fn detected_language_from_candidate() {
        assert_eq!(DetectedLanguage::from_candidate(None), DetectedLanguage::Unknown);
        assert_eq!(DetectedLanguage::from_candidate(Some("und")), DetectedLanguage::Unknown);
        assert_eq!(
            DetectedLanguage::from_candidate(Some("FR")),
            DetectedLanguage::Detected(LanguageTag::new("fr"))
        );
        assert_eq!(DetectedLanguage::default().to_string(), "Detecting...");
    }
}
