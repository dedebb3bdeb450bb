//! Domain types for dependency importance analysis.
//!
//! This module contains the core vocabulary shared by every stage of the
//! pipeline: package names, the dependency kinds Debian declares, and the
//! totally ordered strength those kinds collapse to.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Name of a Debian package, the unique key across all maps
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageName(pub String);

impl PackageName {
    /// Create a new package name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the name as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name with any architecture qualifier dropped.
    ///
    /// apt prints foreign-architecture packages as `libc6:i386`, while
    /// control stanzas and relationship fields use the bare `libc6`. Every
    /// map is keyed on the bare name.
    #[must_use]
    pub fn without_arch(&self) -> PackageName {
        self.0
            .split_once(':')
            .map_or_else(|| self.clone(), |(base, _)| Self::new(base))
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PackageName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PackageName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Strength of a dependency edge, and the importance level of a package.
///
/// Variants are declared weakest first so the derived `Ord` gives
/// `Suggested < Recommended < Required`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyStrength {
    /// Nice to have, listed in `Suggests`
    Suggested,

    /// Installed by default, listed in `Recommends`
    Recommended,

    /// Mandatory, listed in `Depends` or `Pre-Depends`
    Required,
}

impl DependencyStrength {
    /// All strengths, weakest first.
    pub const ALL: [DependencyStrength; 3] = [
        DependencyStrength::Suggested,
        DependencyStrength::Recommended,
        DependencyStrength::Required,
    ];

    /// Strength that flows through an edge of strength `edge` out of a
    /// package at this level.
    ///
    /// A chain is only as strong as its weakest link.
    #[must_use]
    pub fn through(self, edge: DependencyStrength) -> DependencyStrength {
        self.min(edge)
    }
}

impl fmt::Display for DependencyStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DependencyStrength::Suggested => "suggested",
            DependencyStrength::Recommended => "recommended",
            DependencyStrength::Required => "required",
        };
        write!(f, "{s}")
    }
}

/// Relationship field of a Debian control stanza that declares dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyKind {
    /// Must be fully installed before this package is unpacked
    PreDepends,

    /// Must be installed for this package to be configured
    Depends,

    /// Installed alongside unless explicitly declined
    Recommends,

    /// Only offered to the user
    Suggests,
}

impl DependencyKind {
    /// Every recognized kind, in the order the map builder queries them.
    pub const ALL: [DependencyKind; 4] = [
        DependencyKind::Depends,
        DependencyKind::PreDepends,
        DependencyKind::Recommends,
        DependencyKind::Suggests,
    ];

    /// Strength of an edge declared through this kind.
    #[must_use]
    pub fn strength(self) -> DependencyStrength {
        match self {
            DependencyKind::PreDepends | DependencyKind::Depends => DependencyStrength::Required,
            DependencyKind::Recommends => DependencyStrength::Recommended,
            DependencyKind::Suggests => DependencyStrength::Suggested,
        }
    }

    /// Field name as written in a control stanza.
    #[must_use]
    pub fn field_name(self) -> &'static str {
        match self {
            DependencyKind::PreDepends => "Pre-Depends",
            DependencyKind::Depends => "Depends",
            DependencyKind::Recommends => "Recommends",
            DependencyKind::Suggests => "Suggests",
        }
    }

    /// Look up a kind by its control field name (case-insensitive).
    #[must_use]
    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.field_name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.field_name())
    }
}

/// One dependency entry: any of the candidates satisfies it
pub type AlternativeGroup = Vec<PackageName>;

/// Resolved importance level of every package reachable from the roots
pub type LevelMap = BTreeMap<PackageName, DependencyStrength>;
