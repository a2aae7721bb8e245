//! Language preference lists

use lexis_core::Language;

/// Language tags from an HTTP `Accept-Language` header, best first.
///
/// Entries are ordered by their `q` weight (1 when absent); entries with
/// equal weight keep header order. Malformed weights count as 0.
pub fn parse_accept_language(header: &str) -> Vec<String> {
    let mut weighted: Vec<(String, f32)> = header
        .split(',')
        .map(|segment| segment.replace(' ', ""))
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.split_once(";q=") {
            Some((tag, q)) => (tag.to_string(), q.parse().unwrap_or(0.0)),
            None => (segment, 1.0),
        })
        .collect();

    weighted.sort_by(|a, b| b.1.total_cmp(&a.1));
    weighted.into_iter().map(|(tag, _)| tag).collect()
}

/// The order languages are tried in.
///
/// Each parseable tag is kept in order. A regional tag (`en-us`) is followed
/// by its plain form (`en-en`) unless the plain form was listed itself. The
/// fallback always comes last. Duplicates are dropped; invalid tags are
/// skipped with a warning.
pub fn expand_preferences<S: AsRef<str>>(preferences: &[S], fallback: &Language) -> Vec<Language> {
    let listed: Vec<Language> = preferences
        .iter()
        .filter_map(|tag| match Language::parse(tag.as_ref()) {
            Ok(language) => Some(language),
            Err(e) => {
                tracing::warn!(tag = %tag.as_ref(), error = %e, "Ignoring language preference");
                None
            }
        })
        .collect();

    let mut expanded: Vec<Language> = Vec::with_capacity(listed.len() * 2 + 1);
    let mut push = |language: Language| {
        if !expanded.contains(&language) {
            expanded.push(language);
        }
    };

    for language in &listed {
        push(language.clone());
        let plain = language.plain();
        if !listed.contains(&plain) {
            push(plain);
        }
    }
    push(fallback.clone());

    expanded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(languages: &[Language]) -> Vec<String> {
        languages.iter().map(Language::id).collect()
    }

    #[test]
    fn test_parse_accept_language() {
        assert_eq!(
            parse_accept_language("de-DE,de;q=0.9, en;q=0.8,fr"),
            vec!["de-DE", "fr", "de", "en"]
        );
        assert_eq!(
            parse_accept_language("en;q=0.5, es;q=0.5"),
            vec!["en", "es"]
        );
        assert!(parse_accept_language("").is_empty());
        assert_eq!(parse_accept_language("en;q=abc,de"), vec!["de", "en"]);
    }

    #[test]
    fn test_expand_adds_plain_variant_and_fallback() {
        let fallback = Language::parse("en").unwrap();
        let expanded = expand_preferences(&["es", "en-US"], &fallback);
        assert_eq!(ids(&expanded), vec!["es-es", "en-us", "en-en"]);
    }

    #[test]
    fn test_expand_keeps_listed_plain_form_in_place() {
        let fallback = Language::parse("fr").unwrap();
        let expanded = expand_preferences(&["de-at", "en", "de"], &fallback);
        assert_eq!(ids(&expanded), vec!["de-at", "en-en", "de-de", "fr-fr"]);
    }

    #[test]
    fn test_expand_skips_invalid_and_duplicate_tags() {
        let fallback = Language::parse("en").unwrap();
        let expanded = expand_preferences(&["*", "pt-br", "PT-BR", "x"], &fallback);
        assert_eq!(ids(&expanded), vec!["pt-br", "pt-pt", "en-en"]);

        let only_fallback = expand_preferences::<&str>(&[], &fallback);
        assert_eq!(ids(&only_fallback), vec!["en-en"]);
    }
}
