// src/checker/rules.rs
// =============================================================================
// Checks we can do on a link without touching the network.
//
// The rules run in this order and the first one that applies wins:
// 1. empty link                                   -> rejected
// 2. mailto:, /, #, %{ (interpolation placeholder) -> fine, nothing to fetch
// 3. not http:// or https://                      -> rejected
// 4. a character outside the URI character set    -> rejected (spaces!)
// 5. anything else                                -> needs an HTTP check
// =============================================================================

use serde::{Deserialize, Serialize};

/// Prefixes of links that are accepted without a network check.
///
/// `%{` is an interpolation placeholder: the application fills in the URL
/// itself, so there is nothing to check at translation time.
const EXEMPT_PREFIXES: [&str; 4] = ["mailto:", "/", "#", "%{"];

const FETCHABLE_SCHEMES: [&str; 2] = ["http://", "https://"];

/// Why a link was rejected before any request was made
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    Empty,
    UnsupportedScheme,
    InvalidCharacter { character: char },
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::Empty => f.write_str("empty link"),
            RejectReason::UnsupportedScheme => f.write_str("not an http(s) link"),
            RejectReason::InvalidCharacter { character } => {
                write!(f, "invalid character {:?}", character)
            }
        }
    }
}

/// The outcome of the local rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalVerdict {
    /// Accepted without a network check
    Exempt,
    /// Rejected before any request was made
    Rejected(RejectReason),
    /// Looks like a valid http(s) URL, has to be fetched
    NeedsFetch,
}

/// Applies the local rules to `link`.
pub fn classify(link: &str) -> LocalVerdict {
    if link.is_empty() {
        return LocalVerdict::Rejected(RejectReason::Empty);
    }

    if EXEMPT_PREFIXES.iter().any(|prefix| link.starts_with(prefix)) {
        return LocalVerdict::Exempt;
    }

    if !FETCHABLE_SCHEMES.iter().any(|scheme| link.starts_with(scheme)) {
        return LocalVerdict::Rejected(RejectReason::UnsupportedScheme);
    }

    if let Some(character) = link.chars().find(|c| !is_uri_char(*c)) {
        return LocalVerdict::Rejected(RejectReason::InvalidCharacter { character });
    }

    LocalVerdict::NeedsFetch
}

// A-Z a-z 0-9 and _.~!*'();:@&=+$,/?#[]%-
// Whitespace is not in the set: a space in a link is almost always a typo.
fn is_uri_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "_.~!*'();:@&=+$,/?#[]%-".contains(c)
}
