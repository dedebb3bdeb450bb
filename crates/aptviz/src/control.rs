//! Parser for Debian control data.
//!
//! Handles the two layers aptviz needs:
//!
//! - **Stanzas**: `Field: value` paragraphs separated by blank lines, with
//!   continuation lines starting with whitespace (the format of
//!   `apt-cache show`, `Packages` indices and `/var/lib/dpkg/status`)
//! - **Relationship fields**: `a (>= 1.0) | b:any, c [amd64] <!nocheck>`,
//!   reduced to alternative groups of bare package names
//!
//! Version constraints, architecture qualifiers and restrictions are dropped:
//! only membership in the known package set matters downstream.

use crate::domain::{AlternativeGroup, DependencyKind, PackageName};
use std::collections::HashMap;

/// One paragraph of control data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stanza {
    fields: Vec<(String, String)>,
}

impl Stanza {
    /// Value of `name` (case-insensitive), continuation lines joined by `\n`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Number of fields in the stanza.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the stanza has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Split control data into stanzas.
///
/// Comment lines (`#`) are ignored. A line without a colon that is not a
/// continuation is skipped with a warning.
#[must_use]
pub fn parse_stanzas(text: &str) -> Vec<Stanza> {
    let mut stanzas = Vec::new();
    let mut current = Stanza::default();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                stanzas.push(std::mem::take(&mut current));
            }
            continue;
        }
        if line.starts_with('#') {
            continue;
        }

        if line.starts_with(' ') || line.starts_with('\t') {
            // Continuation of the previous field
            if let Some((_, value)) = current.fields.last_mut() {
                value.push('\n');
                value.push_str(line.trim());
            }
            continue;
        }

        if let Some((name, value)) = line.split_once(':') {
            let field = (name.trim().to_string(), value.trim().to_string());
            current.fields.push(field);
        } else {
            tracing::warn!(
                line_number = index + 1,
                line = %line,
                "Ignoring malformed control line"
            );
        }
    }

    if !current.is_empty() {
        stanzas.push(current);
    }

    stanzas
}

/// Parse a relationship field into alternative groups.
///
/// ```
/// use aptviz::control::parse_relationships;
///
/// let groups = parse_relationships("libc6 (>= 2.34), python3:any | python3-minimal");
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[1][0].as_str(), "python3");
/// ```
#[must_use]
pub fn parse_relationships(value: &str) -> Vec<AlternativeGroup> {
    value
        .split(',')
        .map(|entry| {
            entry
                .split('|')
                .filter_map(parse_alternative)
                .collect::<AlternativeGroup>()
        })
        .filter(|group| !group.is_empty())
        .collect()
}

/// Extract the package name from one alternative, e.g. `python3:any (>= 3.11)`.
fn parse_alternative(text: &str) -> Option<PackageName> {
    let text = text.trim();
    let end = text
        .find(|c: char| c.is_whitespace() || matches!(c, '(' | '[' | '<'))
        .unwrap_or(text.len());
    let name = text[..end].split(':').next().unwrap_or_default();

    if name.is_empty() {
        None
    } else {
        Some(PackageName::new(name))
    }
}

/// Dependency declarations of one package version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    /// Package name
    pub name: PackageName,
    /// Version string, if the stanza carries one
    pub version: Option<String>,
    /// Alternative groups per dependency kind
    pub relations: HashMap<DependencyKind, Vec<AlternativeGroup>>,
}

impl PackageRecord {
    /// Build a record from a stanza; `None` without a `Package` field.
    #[must_use]
    pub fn from_stanza(stanza: &Stanza) -> Option<Self> {
        let name = stanza.get("Package")?.trim();
        if name.is_empty() {
            return None;
        }

        let relations = DependencyKind::ALL
            .into_iter()
            .filter_map(|kind| {
                stanza
                    .get(kind.field_name())
                    .map(|value| (kind, parse_relationships(value)))
            })
            .collect();

        Some(Self {
            name: PackageName::new(name),
            version: stanza.get("Version").map(str::to_string),
            relations,
        })
    }

    /// Alternative groups declared under `kind` (empty if none).
    #[must_use]
    pub fn dependencies(&self, kind: DependencyKind) -> &[AlternativeGroup] {
        self.relations.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SHOW_OUTPUT: &str = "\
Package: python3-pip
Version: 23.0.1+dfsg-1
Architecture: all
Depends: ca-certificates, python3-setuptools, python3-wheel, python3:any
Recommends: build-essential, python3-dev (>= 3.2)
Description: Python package installer
 pip is the Python package installer.
 .
 It integrates with virtualenv.

Package: python3-wheel
Version: 0.38.4-2
Depends: python3:any
";

    fn group(names: &[&str]) -> AlternativeGroup {
        names.iter().map(|n| PackageName::from(*n)).collect()
    }

    #[test]
    fn stanzas_are_split_on_blank_lines() {
        let stanzas = parse_stanzas(SHOW_OUTPUT);
        assert_eq!(stanzas.len(), 2);
        assert_eq!(stanzas[0].get("package"), Some("python3-pip"));
        assert_eq!(stanzas[1].get("Version"), Some("0.38.4-2"));
    }

    #[test]
    fn continuation_lines_are_joined() {
        let stanzas = parse_stanzas(SHOW_OUTPUT);
        let description = stanzas[0].get("Description").unwrap();
        assert!(description.starts_with("Python package installer\npip is"));
    }

    #[test]
    fn comments_and_garbage_are_ignored() {
        let stanzas = parse_stanzas("# generated\nPackage: a\nnot a field\nDepends: b\n");
        assert_eq!(stanzas.len(), 1);
        assert_eq!(stanzas[0].len(), 2);
    }

    #[rstest]
    #[case::simple("a, b", vec![group(&["a"]), group(&["b"])])]
    #[case::alternatives("a | b, c", vec![group(&["a", "b"]), group(&["c"])])]
    #[case::versions("libc6 (>= 2.34), z (>= 1:1.2)", vec![group(&["libc6"]), group(&["z"])])]
    #[case::arch_qualifier("python3:any", vec![group(&["python3"])])]
    #[case::restrictions("gcc [amd64] <!nocheck>", vec![group(&["gcc"])])]
    #[case::tight_parens("foo(>=1)", vec![group(&["foo"])])]
    #[case::empty("", vec![])]
    #[case::trailing_comma("a,", vec![group(&["a"])])]
    fn relationships(#[case] field: &str, #[case] expected: Vec<AlternativeGroup>) {
        assert_eq!(parse_relationships(field), expected);
    }

    #[test]
    fn multiline_relationship_field() {
        let stanzas = parse_stanzas("Package: x\nDepends: a,\n b | c,\n d\n");
        let record = PackageRecord::from_stanza(&stanzas[0]).unwrap();
        assert_eq!(
            record.dependencies(DependencyKind::Depends),
            &[group(&["a"]), group(&["b", "c"]), group(&["d"])]
        );
    }

    #[test]
    fn record_collects_every_kind() {
        let stanzas = parse_stanzas(SHOW_OUTPUT);
        let record = PackageRecord::from_stanza(&stanzas[0]).unwrap();

        assert_eq!(record.name, PackageName::from("python3-pip"));
        assert_eq!(record.version.as_deref(), Some("23.0.1+dfsg-1"));
        assert_eq!(record.dependencies(DependencyKind::Depends).len(), 4);
        assert_eq!(
            record.dependencies(DependencyKind::Recommends),
            &[group(&["build-essential"]), group(&["python3-dev"])]
        );
        assert!(record.dependencies(DependencyKind::Suggests).is_empty());
    }

    #[test]
    fn stanza_without_package_is_not_a_record() {
        let stanzas = parse_stanzas("Source: foo\nVersion: 1\n");
        assert!(PackageRecord::from_stanza(&stanzas[0]).is_none());
    }
}
