//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Required:     green   (mandatory packages)
//!   - Recommended:  yellow  (installed by default)
//!   - Suggested:    dimmed  (optional extras)
//!   - Warning:      yellow  (skipped installer lines, cycles)
//!   - Error:        red
//!   - Info:         cyan    (package names, paths)
//!   - Emphasis:     bold    (headers, counts)

use crate::domain::DependencyStrength;
use colored::Colorize;

use super::OutputConfig;

/// Apply semantic "success" color (green) to text.
#[must_use]
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "error" color (red) to text.
#[must_use]
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().bold().to_string()
}

/// Apply semantic "warning" color (yellow) to text.
#[must_use]
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Apply semantic "info" color (cyan) to text.
#[must_use]
pub fn info(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.cyan().to_string()
}

/// Apply dimmed style to text.
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Apply bold style to text.
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}

/// Icon echoing the node shape of a level, with ASCII fallback.
pub(crate) fn level_icon(level: DependencyStrength, config: &OutputConfig) -> &'static str {
    if config.use_ascii {
        match level {
            DependencyStrength::Required => "o",
            DependencyStrength::Recommended => "#",
            DependencyStrength::Suggested => "*",
        }
    } else {
        match level {
            DependencyStrength::Required => "●",
            DependencyStrength::Recommended => "■",
            DependencyStrength::Suggested => "⯃",
        }
    }
}

/// Apply color to text based on importance level.
pub(crate) fn colorize_level(
    text: &str,
    level: DependencyStrength,
    config: &OutputConfig,
) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    match level {
        DependencyStrength::Required => text.green().to_string(),
        DependencyStrength::Recommended => text.yellow().to_string(),
        DependencyStrength::Suggested => text.dimmed().to_string(),
    }
}
