//! Language tags in canonical `code-region` form

use crate::errors::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display};
use std::str::FromStr;

static LANGUAGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<code>[a-z]{2,})(?:-(?P<region>[a-z]{2,}))?$")
        .unwrap_or_else(|e| unreachable!("language pattern is a valid regex: {e}"))
});

/// A language tag made of a primary code and a region.
///
/// When the region is omitted it defaults to the code, so `en` and `en-en`
/// are the same language. Equality, hashing and serialization all go through
/// the canonical [`Language::id`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Language {
    code: String,
    region: String,
}

impl Language {
    /// Parse a tag such as `en`, `en-US` or `pt-br` (case-insensitive)
    pub fn parse(value: &str) -> Result<Self> {
        let lowered = value.trim().to_lowercase();
        let captures = LANGUAGE_PATTERN
            .captures(&lowered)
            .ok_or_else(|| Error::invalid_language(value))?;

        let code = captures["code"].to_string();
        let region = captures
            .name("region")
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| code.clone());

        Ok(Self { code, region })
    }

    /// Primary language code (`en` in `en-us`)
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Region code (`us` in `en-us`)
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Canonical `code-region` identifier
    pub fn id(&self) -> String {
        format!("{}-{}", self.code, self.region)
    }

    /// Same code with a different region.
    ///
    /// The region must be two or more ASCII letters, like one in a parsed tag.
    pub fn with_region(&self, region: &str) -> Result<Self> {
        Self::parse(&format!("{}-{}", self.code, region.trim()))
    }

    /// Same code with the region reset to the code (`en-us` becomes `en-en`)
    pub fn plain(&self) -> Self {
        Self {
            code: self.code.clone(),
            region: self.code.clone(),
        }
    }

    /// True when the region merely repeats the code (`en-en`)
    pub fn is_region_same(&self) -> bool {
        self.code == self.region
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.code, self.region)
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Language {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Language {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.id())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        let cases = [
            ("en-en", "en", "en", true),
            ("en", "en", "en", true),
            ("en-US", "en", "us", false),
            ("  FR ", "fr", "fr", true),
        ];

        for (input, code, region, same) in cases {
            let lang = Language::parse(input).unwrap();
            assert_eq!(lang.code(), code, "code of {input}");
            assert_eq!(lang.region(), region, "region of {input}");
            assert_eq!(lang.is_region_same(), same, "region-same of {input}");
        }
    }

    #[test]
    fn test_identity_is_canonical_id() {
        assert_eq!(Language::parse("en").unwrap(), Language::parse("EN-en").unwrap());
        assert_ne!(Language::parse("en").unwrap(), Language::parse("en-us").unwrap());
        assert_eq!(Language::parse("de-AT").unwrap().id(), "de-at");
        assert_eq!(Language::parse("de-AT").unwrap().to_string(), "de-at");
    }

    #[test]
    fn test_rejects_malformed_tags() {
        for input in ["", "e", "en_US", "en-u", "en-us-x", "12"] {
            assert!(
                matches!(Language::parse(input), Err(Error::InvalidLanguage { .. })),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_with_region() {
        let lang = Language::parse("en-us").unwrap();
        let plain = lang.plain();
        assert_eq!(plain.id(), "en-en");
        assert!(plain.is_region_same());
        assert_eq!(lang.with_region("GB").unwrap().id(), "en-gb");
        assert_eq!(lang.with_region("en").unwrap(), plain);
    }

    #[test]
    fn test_with_region_rejects_non_letters() {
        let lang = Language::parse("en").unwrap();
        for region in ["../x", "x/y", "", "u", "us-east", "u s", "x.json"] {
            assert!(
                matches!(lang.with_region(region), Err(Error::InvalidLanguage { .. })),
                "{region:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_serde_as_id_string() {
        let lang = Language::parse("pt-BR").unwrap();
        let json = serde_json::to_string(&lang).unwrap();
        assert_eq!(json, "\"pt-br\"");
        let back: Language = serde_json::from_str(&json).unwrap();
        assert_eq!(back, lang);
        assert!(serde_json::from_str::<Language>("\"not a tag\"").is_err());
    }
}
