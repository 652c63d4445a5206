//! `[output]` section: how results reach the terminal

use consensus_domain::OutputFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Format used when `--output` is not given
    pub format: Option<OutputFormat>,
    /// ANSI colors in human-readable output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

impl FileOutputConfig {
    /// Command-line choice first, then this section, then the winner-only view.
    pub fn resolve_format(&self, cli_choice: Option<OutputFormat>) -> OutputFormat {
        cli_choice.or(self.format).unwrap_or_default()
    }
}
