//! Country key normalization.
//!
//! Free-form country names (from operators or the geolocation lookup) are
//! turned into one canonical inventory key:
//! 1) base transform: trim, lower-case, whitespace runs -> '_';
//! 2) alias table: known multi-spelling countries collapse to a fixed key and
//!    a fixed display name (e.g. every Saudi spelling -> "SA" / "Saudi Arabia").
//!
//! Everything here is pure. Bucket lookup/merging lives in `inventory`.

use crate::error::StoreError;

/// Result of canonicalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCountry {
    pub key: String,
    /// Some(..) when the alias table dictates the display name.
    pub display_name: Option<&'static str>,
}

struct Alias {
    key: &'static str,
    display: &'static str,
    /// Matched against both the base key and its folded form.
    spellings: &'static [&'static str],
    /// Any base key containing this fragment resolves to the alias.
    fragment: Option<&'static str>,
}

const ALIASES: &[Alias] = &[
    Alias {
        key: "SA",
        display: "Saudi Arabia",
        spellings: &[
            "sa",
            "ksa",
            "saudi",
            "saudi_arabia",
            "saudiarabia",
            "kingdomofsaudiarabia",
        ],
        fragment: Some("saudi"),
    },
    Alias {
        key: "united_arab_emirates",
        display: "United Arab Emirates",
        spellings: &["uae", "unitedarabemirates"],
        fragment: None,
    },
    Alias {
        key: "united_states",
        display: "United States",
        spellings: &["us", "usa", "unitedstates", "unitedstatesofamerica"],
        fragment: None,
    },
    Alias {
        key: "united_kingdom",
        display: "United Kingdom",
        spellings: &["uk", "gb", "unitedkingdom", "greatbritain"],
        fragment: None,
    },
];

/// Base transform only: trim, lower-case, whitespace -> '_'.
pub fn base_key(name: &str) -> String {
    name.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Case/underscore-insensitive form used to compare keys.
pub fn fold(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Map a free-form country name to its canonical key.
///
/// Rejects names without a single alphanumeric character.
pub fn canonicalize(name: &str) -> Result<CanonicalCountry, StoreError> {
    let base = base_key(name);
    if !base.chars().any(char::is_alphanumeric) {
        return Err(StoreError::MalformedCountryName(name.to_string()));
    }
    let folded = fold(&base);

    for a in ALIASES {
        let hit = a
            .spellings
            .iter()
            .any(|s| *s == base || *s == folded)
            || a.fragment.map(|f| base.contains(f)).unwrap_or(false);
        if hit {
            return Ok(CanonicalCountry {
                key: a.key.to_string(),
                display_name: Some(a.display),
            });
        }
    }

    Ok(CanonicalCountry {
        key: base,
        display_name: None,
    })
}

/// Identity of the logical country behind an (existing) key: the folded
/// canonical key, or the folded raw key if it cannot be canonicalized.
pub fn identity(key: &str) -> String {
    match canonicalize(key) {
        Ok(c) => fold(&c.key),
        Err(_) => fold(key),
    }
}

/// Do two stored keys denote the same logical country?
pub fn same_country(a: &str, b: &str) -> bool {
    fold(a) == fold(b) || identity(a) == identity(b)
}
