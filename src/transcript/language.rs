//! Language fallback resolution for caption fetching.

/// Fallback language pool, in priority order.
const FALLBACK_LANGUAGES: [&str; 12] = [
    "en", "ko", "ja", "es", "fr", "de", "zh", "pt", "ru", "it", "ar", "hi",
];

/// Static channel-country to language mapping.
const COUNTRY_LANGUAGES: [(&str, &str); 29] = [
    ("KR", "ko"),
    ("JP", "ja"),
    ("US", "en"),
    ("GB", "en"),
    ("AU", "en"),
    ("CA", "en"),
    ("NZ", "en"),
    ("IE", "en"),
    ("ES", "es"),
    ("MX", "es"),
    ("AR", "es"),
    ("CO", "es"),
    ("CL", "es"),
    ("FR", "fr"),
    ("BE", "fr"),
    ("DE", "de"),
    ("AT", "de"),
    ("CH", "de"),
    ("CN", "zh"),
    ("TW", "zh"),
    ("HK", "zh"),
    ("BR", "pt"),
    ("PT", "pt"),
    ("RU", "ru"),
    ("IT", "it"),
    ("SA", "ar"),
    ("EG", "ar"),
    ("AE", "ar"),
    ("IN", "hi"),
];

/// Produces the ordered candidate language list for a fetch.
///
/// Pure; the result is never empty and contains no duplicates.
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageResolver;

impl LanguageResolver {
    pub fn new() -> Self {
        Self
    }

    /// Build the candidate list.
    ///
    /// A requested language goes first, then the fallback pool with that
    /// language removed. Without a request, a channel-country hint (if it
    /// maps to a language) seeds the first attempt; otherwise the pool is
    /// used as-is.
    pub fn resolve(
        &self,
        requested: Option<&str>,
        country_hint: Option<&str>,
    ) -> Vec<String> {
        let seed = match requested {
            Some(lang) => Some(lang.to_string()),
            None => country_hint.and_then(Self::language_for_country),
        };

        match seed {
            Some(first) => {
                let mut candidates = vec![first.clone()];
                candidates.extend(
                    FALLBACK_LANGUAGES
                        .iter()
                        .filter(|l| **l != first)
                        .map(|l| l.to_string()),
                );
                candidates
            }
            None => FALLBACK_LANGUAGES.iter().map(|l| l.to_string()).collect(),
        }
    }

    /// Map a two-letter country code to a language code.
    pub fn language_for_country(country: &str) -> Option<String> {
        let code = country.to_uppercase();
        COUNTRY_LANGUAGES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, lang)| lang.to_string())
    }
}
