//! Version parsing and range matching.
//!
//! Versions are [`semver::Version`] values, parsed leniently: missing numeric
//! components default to zero, so `1` and `1.0` both mean `1.0.0`.
//!
//! Ranges use interval notation:
//! - `1.0` means "at least 1.0" (inclusive lower bound, no upper bound)
//! - `[1.0]` means exactly 1.0
//! - `[1.0,2.0)`, `(1.0,]`, `(,2.0]` are bounded on one or both sides
//! - an empty string or `*` matches every version

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use miette::Diagnostic;
use thiserror::Error;

pub use semver::Version;

/// Failure to parse a version or a version range.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum VersionError {
    #[error("invalid version `{input}`: {reason}")]
    InvalidVersion { input: String, reason: String },

    #[error("invalid version range `{input}`: {reason}")]
    #[diagnostic(help("Use `1.0`, `[1.0]`, `[1.0,2.0)` or `*`"))]
    InvalidRange { input: String, reason: String },
}

/// Parse a version, padding missing minor/patch components with zeros.
pub fn parse_version(input: &str) -> Result<Version, VersionError> {
    let s = input.trim();
    let split = s.find(|c: char| c == '-' || c == '+').unwrap_or(s.len());
    let (numbers, suffix) = s.split_at(split);

    let mut parts: Vec<&str> = numbers.split('.').collect();
    if numbers.is_empty() || parts.len() > 3 {
        return Err(VersionError::InvalidVersion {
            input: input.to_string(),
            reason: "expected one to three numeric components".to_string(),
        });
    }
    while parts.len() < 3 {
        parts.push("0");
    }

    Version::parse(&format!("{}{suffix}", parts.join("."))).map_err(|e| {
        VersionError::InvalidVersion {
            input: input.to_string(),
            reason: e.to_string(),
        }
    })
}

/// A version range expression.
///
/// `None` on either side means that side is unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionRange {
    pub lower: Option<Bound>,
    pub upper: Option<Bound>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bound {
    pub version: Version,
    pub inclusive: bool,
}

impl VersionRange {
    /// The range every version satisfies.
    pub fn all() -> Self {
        Self::default()
    }

    /// `version` or anything newer.
    pub fn at_least(version: Version) -> Self {
        Self {
            lower: Some(Bound {
                version,
                inclusive: true,
            }),
            upper: None,
        }
    }

    /// Exactly `version`.
    pub fn exact(version: Version) -> Self {
        Self {
            lower: Some(Bound {
                version: version.clone(),
                inclusive: true,
            }),
            upper: Some(Bound {
                version,
                inclusive: true,
            }),
        }
    }

    pub fn is_all(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }

    /// Parse a range expression.
    pub fn parse(spec: &str) -> Result<Self, VersionError> {
        let s = spec.trim();
        if s.is_empty() || s == "*" {
            return Ok(Self::all());
        }
        if !s.starts_with('[') && !s.starts_with('(') {
            return parse_version(s)
                .map(Self::at_least)
                .map_err(|e| range_error(spec, &e.to_string()));
        }
        if s.len() < 2 || !(s.ends_with(']') || s.ends_with(')')) {
            return Err(range_error(spec, "missing closing `]` or `)`"));
        }

        let open_inclusive = s.starts_with('[');
        let close_inclusive = s.ends_with(']');
        let inner = &s[1..s.len() - 1];

        let range = if let Some((lower, upper)) = inner.split_once(',') {
            Self {
                lower: parse_bound(spec, lower, open_inclusive)?,
                upper: parse_bound(spec, upper, close_inclusive)?,
            }
        } else {
            // Exact version: [1.0] means exactly 1.0
            if !open_inclusive || !close_inclusive {
                return Err(range_error(spec, "an exact version must use `[` and `]`"));
            }
            let version =
                parse_version(inner).map_err(|e| range_error(spec, &e.to_string()))?;
            Self::exact(version)
        };

        if let (Some(lower), Some(upper)) = (&range.lower, &range.upper) {
            let empty = match lower.version.cmp(&upper.version) {
                Ordering::Greater => true,
                Ordering::Equal => !(lower.inclusive && upper.inclusive),
                Ordering::Less => false,
            };
            if empty {
                return Err(range_error(spec, "no version can satisfy this range"));
            }
        }

        Ok(range)
    }

    /// Check if a version satisfies this range.
    pub fn contains(&self, version: &Version) -> bool {
        if let Some(ref lower) = self.lower {
            let cmp = version.cmp(&lower.version);
            if lower.inclusive {
                if cmp == Ordering::Less {
                    return false;
                }
            } else if cmp != Ordering::Greater {
                return false;
            }
        }
        if let Some(ref upper) = self.upper {
            let cmp = version.cmp(&upper.version);
            if upper.inclusive {
                if cmp == Ordering::Greater {
                    return false;
                }
            } else if cmp != Ordering::Less {
                return false;
            }
        }
        true
    }
}

fn parse_bound(spec: &str, text: &str, inclusive: bool) -> Result<Option<Bound>, VersionError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let version = parse_version(text).map_err(|e| range_error(spec, &e.to_string()))?;
    Ok(Some(Bound { version, inclusive }))
}

fn range_error(spec: &str, reason: &str) -> VersionError {
    VersionError::InvalidRange {
        input: spec.to_string(),
        reason: reason.to_string(),
    }
}

impl FromStr for VersionRange {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.lower, &self.upper) {
            (None, None) => f.write_str("*"),
            (Some(lower), None) if lower.inclusive => write!(f, "{}", lower.version),
            (Some(lower), Some(upper))
                if lower.inclusive && upper.inclusive && lower.version == upper.version =>
            {
                write!(f, "[{}]", lower.version)
            }
            (lower, upper) => {
                match lower {
                    Some(b) => write!(f, "{}{}", if b.inclusive { '[' } else { '(' }, b.version)?,
                    None => f.write_str("(")?,
                }
                f.write_str(",")?;
                match upper {
                    Some(b) => write!(f, "{}{}", b.version, if b.inclusive { ']' } else { ')' }),
                    None => f.write_str(")"),
                }
            }
        }
    }
}
