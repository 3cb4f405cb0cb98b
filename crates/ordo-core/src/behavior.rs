//! Version-selection policies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which version the resolver prefers among otherwise valid choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyBehavior {
    /// Drop every dependency edge; only the targets are resolved.
    Ignore,
    #[default]
    Lowest,
    /// Lowest major and minor, highest patch.
    HighestPatch,
    /// Lowest major, highest minor and patch.
    HighestMinor,
    Highest,
}

impl DependencyBehavior {
    pub const ALL: [DependencyBehavior; 5] = [
        Self::Ignore,
        Self::Lowest,
        Self::HighestPatch,
        Self::HighestMinor,
        Self::Highest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Lowest => "lowest",
            Self::HighestPatch => "highest-patch",
            Self::HighestMinor => "highest-minor",
            Self::Highest => "highest",
        }
    }
}

impl fmt::Display for DependencyBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DependencyBehavior {
    type Err = String;

    /// Accepts `highest-minor`, `highest_minor` and `HighestMinor` alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|b| b.as_str().replace('-', "") == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown dependency behavior `{s}` (expected one of: ignore, lowest, highest-patch, highest-minor, highest)"
                )
            })
    }
}
