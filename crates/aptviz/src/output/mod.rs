//! Terminal output for the CLI.
//!
//! The graph description itself goes to stdout or a file; this module prints
//! the human-oriented run summary (on stderr, so it never mixes with DOT).
//!
//! Submodules:
//! - [`color`]: Color and styling helpers (semantic colors, level icons)

pub mod color;

use crate::domain::DependencyStrength;
use crate::pipeline::RunReport;
use std::env;
use std::io::{self, Write};

pub use color::{error, info, success, warning};

use color::{bold, colorize_level, dimmed, level_icon};

/// Maximum skipped lines listed individually in the summary.
const MAX_LISTED_WARNINGS: usize = 10;

// ============================================================================
// Output Configuration
// ============================================================================

/// Configuration for output formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use ASCII-only icons instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new `OutputConfig` with explicit values.
    #[must_use]
    pub fn new(use_ascii: bool, use_colors: bool) -> Self {
        Self {
            use_ascii,
            use_colors,
        }
    }

    /// Create an `OutputConfig` by reading from environment variables.
    ///
    /// Reads:
    /// - `APTVIZ_ASCII`: Set to "1" or "true" for ASCII-only icons (default: false)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `APTVIZ_COLOR`: Set to "0" or "false" to disable colors (default: true)
    #[must_use]
    pub fn from_env() -> Self {
        let use_ascii = match env::var("APTVIZ_ASCII") {
            Ok(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Ok(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Ok(v) => {
                tracing::warn!(
                    env_var = "APTVIZ_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            Err(_) => false,
        };

        // Respect NO_COLOR standard (https://no-color.org/)
        let use_colors = env::var("NO_COLOR").is_err()
            && env::var("APTVIZ_COLOR")
                .map_or(true, |v| v != "0" && !v.eq_ignore_ascii_case("false"));

        Self {
            use_ascii,
            use_colors,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            use_ascii: false,
            use_colors: true,
        }
    }
}

// ============================================================================
// Run Summary
// ============================================================================

/// Print the run summary to stderr.
///
/// # Errors
///
/// Returns an error if stderr cannot be written.
pub fn print_summary(report: &RunReport) -> io::Result<()> {
    let stderr = io::stderr();
    let mut handle = stderr.lock();
    write_summary(&mut handle, report, &OutputConfig::from_env())
}

/// Write the run summary.
///
/// ```text
/// aptviz: 1 root, 42 known packages, 57 edges
///   ● required     30
///   ■ recommended   9
///   ⯃ suggested     3
///   ! skipped 1 installer line
///     line 7: expected 5 whitespace-separated fields, found 6 ("Inst ...")
///   ~ 1 dependency cycle
///     perl -> perl-modules-5.36
/// ```
///
/// # Errors
///
/// Returns any error from writing to `w`.
pub fn write_summary<W: Write>(
    w: &mut W,
    report: &RunReport,
    config: &OutputConfig,
) -> io::Result<()> {
    let roots = report.roots.len();
    writeln!(
        w,
        "{}: {} {}, {} known packages, {} edges",
        bold("aptviz", config),
        roots,
        if roots == 1 { "root" } else { "roots" },
        report.discovery.known.len(),
        report.description.edges.len()
    )?;

    for (level, count) in report.level_counts() {
        write_level_line(w, level, count, config)?;
    }

    let skipped = report.skipped_lines();
    if !skipped.is_empty() {
        let noun = if skipped.len() == 1 { "line" } else { "lines" };
        writeln!(
            w,
            "  {} skipped {} installer {noun}",
            warning("!", config),
            skipped.len()
        )?;
        for warning_line in skipped.iter().take(MAX_LISTED_WARNINGS) {
            writeln!(w, "    {}", dimmed(&warning_line.to_string(), config))?;
        }
        if skipped.len() > MAX_LISTED_WARNINGS {
            let more = format!("... and {} more", skipped.len() - MAX_LISTED_WARNINGS);
            writeln!(w, "    {}", dimmed(&more, config))?;
        }
    }

    let cycles = report.cycles();
    if !cycles.is_empty() {
        let noun = if cycles.len() == 1 { "cycle" } else { "cycles" };
        writeln!(
            w,
            "  {} {} dependency {noun}",
            warning("~", config),
            cycles.len()
        )?;
        for cycle in &cycles {
            let members: Vec<&str> = cycle.iter().map(|name| name.as_str()).collect();
            writeln!(w, "    {}", dimmed(&members.join(" -> "), config))?;
        }
    }

    Ok(())
}

fn write_level_line<W: Write>(
    w: &mut W,
    level: DependencyStrength,
    count: usize,
    config: &OutputConfig,
) -> io::Result<()> {
    let icon = colorize_level(level_icon(level, config), level, config);
    let name = colorize_level(&format!("{:<12}", level.to_string()), level, config);
    writeln!(w, "  {icon} {name}{count:>4}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryDatabase;
    use crate::discovery::StaticInstaller;
    use crate::domain::PackageName;
    use crate::pipeline::Pipeline;

    fn report(plan: &str, packages: &str, roots: &[&str]) -> RunReport {
        let installer = StaticInstaller::new(plan);
        let db = InMemoryDatabase::from_control_text(packages);
        let roots: Vec<PackageName> = roots.iter().map(|r| PackageName::from(*r)).collect();
        Pipeline::new(&installer, &db).run(&roots).unwrap()
    }

    fn summary_text(report: &RunReport) -> String {
        let mut buf = Vec::new();
        write_summary(&mut buf, report, &OutputConfig::new(true, false)).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn summary_lists_counts_per_level() {
        let report = report(
            "Inst b (1 x [all])\nInst c (1 x [all])\n",
            "Package: a\nDepends: b\nRecommends: c\n\nPackage: b\n\nPackage: c\n",
            &["a"],
        );
        let text = summary_text(&report);

        let header = "aptviz: 1 root, 3 known packages, 2 edges\n";
        assert!(text.starts_with(header));
        assert!(text.contains("  o required       2\n"));
        assert!(text.contains("  # recommended    1\n"));
        assert!(text.contains("  * suggested      0\n"));
        assert!(!text.contains("skipped"));
    }

    #[test]
    fn summary_reports_skipped_lines_and_cycles() {
        let report = report(
            "Inst b (1 x [all])\nInst broken\n",
            "Package: a\nDepends: b\n\nPackage: b\nDepends: a\n",
            &["a"],
        );
        let text = summary_text(&report);

        assert!(text.contains("! skipped 1 installer line\n"));
        assert!(text.contains("line 2:"));
        assert!(text.contains("~ 1 dependency cycle\n"));
        assert!(text.contains("a -> b"));
    }

    #[test]
    fn default_config_uses_unicode_and_colors() {
        let config = OutputConfig::default();
        assert!(!config.use_ascii);
        assert!(config.use_colors);
    }
}
