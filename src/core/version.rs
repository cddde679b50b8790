//! Version suffixes on artifact kind names
//!
//! Artifact kinds may carry a version in the tail of their name, e.g.
//! `GccV2`, `GccV1V0V3` or `GccVgitVabc123V`. Two grammars are recognized
//! on the remainder left after a prefix match:
//!
//! - `v<major>[v<minor>[v<micro>]]` - numeric, digits optional per component
//! - `vgit v<hash> v` - a git revision
//!
//! The separator letter is case-insensitive. Anything else is
//! [`Version::Null`].

use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

use regex::{Match, Regex};

/// A version parsed from a kind-name suffix
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Version {
    /// `v<major>[v<minor>[v<micro>]]`, missing components are zero
    Numeric { major: u64, minor: u64, micro: u64 },
    /// `vgit v<hash> v`
    Git { hash: String },
    /// No recognizable version
    Null,
}

impl Version {
    /// Numeric version with the given components
    pub fn numeric(major: u64, minor: u64, micro: u64) -> Self {
        Self::Numeric {
            major,
            minor,
            micro,
        }
    }

    /// Git-hash version
    pub fn git(hash: impl Into<String>) -> Self {
        Self::Git { hash: hash.into() }
    }

    /// Whether this is the "no version" sentinel
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric versions as semver, for ordering
    pub fn as_semver(&self) -> Option<semver::Version> {
        match self {
            Self::Numeric {
                major,
                minor,
                micro,
            } => Some(semver::Version::new(*major, *minor, *micro)),
            Self::Git { .. } | Self::Null => None,
        }
    }

    /// Compare two versions; only numeric versions are ordered
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        Some(self.as_semver()?.cmp(&other.as_semver()?))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric {
                major,
                minor,
                micro,
            } => write!(f, "{major}.{minor}.{micro}"),
            Self::Git { hash } => write!(f, "git-{hash}"),
            Self::Null => write!(f, "-"),
        }
    }
}

fn numeric_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^v(\d*)(?:v(\d*)(?:v(\d*))?)?$")
            .expect("Invalid numeric version pattern")
    })
}

fn git_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^v\s*git\s*v\s*([0-9a-z]+)\s*v$").expect("Invalid git version pattern")
    })
}

fn component(m: Option<Match<'_>>) -> Option<u64> {
    match m.map(|m| m.as_str()) {
        None | Some("") => Some(0),
        Some(digits) => digits.parse().ok(),
    }
}

/// Parse a version out of a kind-name suffix
///
/// # Examples
/// ```
/// use crazy_build::core::version::{get_version, Version};
///
/// assert_eq!(get_version("V2"), Version::numeric(2, 0, 0));
/// assert_eq!(get_version("Vgit Vabc123 V"), Version::git("abc123"));
/// assert_eq!(get_version("ser"), Version::Null);
/// ```
pub fn get_version(suffix: &str) -> Version {
    if let Some(caps) = git_pattern().captures(suffix) {
        return Version::git(&caps[1]);
    }

    let Some(caps) = numeric_pattern().captures(suffix) else {
        return Version::Null;
    };

    match (
        component(caps.get(1)),
        component(caps.get(2)),
        component(caps.get(3)),
    ) {
        (Some(major), Some(minor), Some(micro)) => Version::numeric(major, minor, micro),
        // a component too large for u64
        _ => Version::Null,
    }
}

/// Match a bare query against an artifact kind
///
/// The comparison is a case-insensitive prefix match. An empty remainder is
/// an exact kind match and yields [`Version::Null`]; a non-empty remainder
/// only counts when it parses as a version. Returns `None` on no match.
pub fn match_kind(query: &str, kind: &str) -> Option<Version> {
    let query = query.to_lowercase();
    let kind = kind.to_lowercase();
    let remainder = kind.strip_prefix(&query)?;

    if remainder.is_empty() {
        return Some(Version::Null);
    }

    let version = get_version(remainder);
    (!version.is_null()).then_some(version)
}

/// Split a kind name into its base name and version suffix
///
/// The first split point whose remainder parses as a git version, or as a
/// numeric version with at least one digit, wins. `GccV1V2` splits into
/// `("Gcc", 1.2.0)` while `Dev` stays whole. Kinds without a version return
/// the whole name and [`Version::Null`].
pub fn split_kind(kind: &str) -> (&str, Version) {
    for (index, _) in kind.char_indices().skip(1) {
        let suffix = &kind[index..];
        match get_version(suffix) {
            Version::Null => {}
            Version::Numeric { .. } if !suffix.bytes().any(|b| b.is_ascii_digit()) => {}
            version => return (&kind[..index], version),
        }
    }
    (kind, Version::Null)
}
