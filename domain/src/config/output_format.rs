//! Output format value object

use serde::{Deserialize, Serialize};

/// How a consensus result is rendered for the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Every response, every critique and the standings
    Full,
    /// Only the winning answer (default)
    #[default]
    Winner,
    /// Machine-readable JSON
    Json,
}
