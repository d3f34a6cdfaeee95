//! Checks applied to user-facing schema descriptions.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Anything outside printable ASCII in the basic multilingual plane:
/// full-width Latin, CJK ideographs and CJK punctuation.
static BIG_SYMBOL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x{007F}-\x{FFFF}]").expect("Invalid big symbol regex"));

/// Punctuation that must not be preceded by a space.
const TIGHT_PUNCTUATION: [char; 6] = [',', '.', ';', ':', '?', '!'];

/// Return the first big symbol found in `s`.
pub fn contains_big_symbol(s: &str) -> Option<&str> {
    BIG_SYMBOL.find(s).map(|m| m.as_str())
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DescriptionError {
    #[error("description for {key:?} is missing")]
    Missing { key: String },

    #[error("there is space on the left of description {key:?}: {description:?}")]
    LeadingSpace { key: String, description: String },

    #[error("there is space on the right of description {key:?}: {description:?}")]
    TrailingSpace { key: String, description: String },

    #[error("there is no ending charset (. or :) on the description {key:?}: {description:?}")]
    MissingTerminator { key: String, description: String },

    #[error("there is unexpected symbol {symbol:?} on the description {key:?}: {description:?}")]
    BigSymbol {
        key: String,
        symbol: String,
        description: String,
    },

    #[error("there is space before {punctuation:?} on the description {key:?}: {description:?}")]
    SpaceBeforePunctuation {
        key: String,
        punctuation: char,
        description: String,
    },
}

impl DescriptionError {
    pub fn key(&self) -> &str {
        match self {
            DescriptionError::Missing { key }
            | DescriptionError::LeadingSpace { key, .. }
            | DescriptionError::TrailingSpace { key, .. }
            | DescriptionError::MissingTerminator { key, .. }
            | DescriptionError::BigSymbol { key, .. }
            | DescriptionError::SpaceBeforePunctuation { key, .. } => key,
        }
    }
}

/// Validate a single description. `key` names the field in error messages.
///
/// An empty description passes here; callers that require one check for
/// [`DescriptionError::Missing`] themselves.
pub fn check_description(key: &str, description: &str) -> Result<(), DescriptionError> {
    if description.is_empty() {
        return Ok(());
    }

    let owned = || (key.to_string(), description.to_string());

    if description.trim_start() != description {
        let (key, description) = owned();
        return Err(DescriptionError::LeadingSpace { key, description });
    }
    if description.trim_end() != description {
        let (key, description) = owned();
        return Err(DescriptionError::TrailingSpace { key, description });
    }
    if !description.ends_with(['.', ':']) {
        let (key, description) = owned();
        return Err(DescriptionError::MissingTerminator { key, description });
    }
    if let Some(symbol) = contains_big_symbol(description) {
        let (key, description) = owned();
        return Err(DescriptionError::BigSymbol {
            key,
            symbol: symbol.to_string(),
            description,
        });
    }
    if let Some(punctuation) = TIGHT_PUNCTUATION
        .iter()
        .copied()
        .find(|p| description.contains(&format!(" {}", p)))
    {
        let (key, description) = owned();
        return Err(DescriptionError::SpaceBeforePunctuation {
            key,
            punctuation,
            description,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_big_symbols() {
        for c in "中国人繁體字ａｂｃＡＢＣ～！＠＃￥％…".chars() {
            let s = c.to_string();
            assert_eq!(contains_big_symbol(&s), Some(s.as_str()), "{:?}", c);
        }
    }

    #[test]
    fn test_ascii_is_not_big() {
        let ascii = "abcXYZ019 ~!@#$%^&*()_+-=[]{}|;':\",./<>?`\t\n\r";
        for c in ascii.chars() {
            assert_eq!(contains_big_symbol(&c.to_string()), None, "{:?}", c);
        }
    }

    #[test]
    fn test_first_match_returned() {
        assert_eq!(contains_big_symbol("Name，of。"), Some("，"));
        assert_eq!(contains_big_symbol("plain."), None);
        assert_eq!(contains_big_symbol("\u{7F}"), Some("\u{7F}"));
        assert_eq!(contains_big_symbol("\u{1F600}"), None);
    }

    #[test]
    fn test_valid_descriptions() {
        assert!(check_description("name", "Name of a launch configuration.").is_ok());
        assert!(check_description("tags", "Valid values:").is_ok());
        assert!(check_description("empty", "").is_ok());
    }

    #[test]
    fn test_rejected_descriptions() {
        assert!(matches!(
            check_description("k", " Leading."),
            Err(DescriptionError::LeadingSpace { .. })
        ));
        assert!(matches!(
            check_description("k", "Trailing. "),
            Err(DescriptionError::TrailingSpace { .. })
        ));
        assert!(matches!(
            check_description("k", "No terminator"),
            Err(DescriptionError::MissingTerminator { .. })
        ));
        assert_eq!(
            check_description("k", "实例名称."),
            Err(DescriptionError::BigSymbol {
                key: "k".to_string(),
                symbol: "实".to_string(),
                description: "实例名称.".to_string(),
            })
        );
        let err = check_description("k", "Either a , or b.").unwrap_err();
        assert!(matches!(
            err,
            DescriptionError::SpaceBeforePunctuation { punctuation: ',', .. }
        ));
        assert_eq!(err.key(), "k");
    }
}
