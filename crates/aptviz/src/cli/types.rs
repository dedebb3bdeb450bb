//! CLI-specific value types that map onto library types.

use clap::ValueEnum;

use crate::viewer::OutputFormat;

/// Output format argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Graphviz DOT
    Dot,
    /// JSON
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Dot => OutputFormat::Dot,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}
