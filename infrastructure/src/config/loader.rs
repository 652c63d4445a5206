//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;
use tracing::warn;

/// Prefix for structured environment overrides, e.g.
/// `LLM_CONSENSUS_ORCHESTRATION__MAX_ITERATIONS=5`
pub const ENV_PREFIX: &str = "LLM_CONSENSUS_";

const PROJECT_CONFIG_FILES: [&str; 2] = ["consensus.toml", ".consensus.toml"];

/// Comma-separated model lists honoured for compatibility with older setups
const LEGACY_MODEL_VARS: [(&str, &str); 3] = [
    ("OLLAMA_MODELS", "providers.ollama.models"),
    ("OPENROUTER_MODELS", "providers.openrouter.models"),
    ("BEDROCK_MODELS", "providers.bedrock.models"),
];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `LLM_CONSENSUS_*` environment variables
    /// 2. Legacy variables (`OLLAMA_MODELS`, `MAX_ITERATIONS`, ...)
    /// 3. Explicit config path (if provided)
    /// 4. Project root: `./consensus.toml` or `./.consensus.toml`
    /// 5. Global: `~/.config/llm-consensus/config.toml`
    /// 6. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Self::file_figment(config_path);
        figment = Self::merge_legacy_env(figment, |name| std::env::var(name).ok());
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn file_figment(config_path: Option<&PathBuf>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment
    }

    /// Merge the legacy plain environment variables read through `lookup`.
    ///
    /// Unparseable numbers are skipped with a warning rather than failing
    /// the whole load.
    fn merge_legacy_env(mut figment: Figment, lookup: impl Fn(&str) -> Option<String>) -> Figment {
        for (var, key) in LEGACY_MODEL_VARS {
            if let Some(value) = lookup(var) {
                figment = figment.merge(Serialized::default(key, split_list(&value)));
            }
        }

        if let Some(value) = lookup("MAX_ITERATIONS") {
            match value.trim().parse::<usize>() {
                Ok(n) => {
                    figment = figment.merge(Serialized::default("orchestration.max_iterations", n))
                }
                Err(_) => warn!("Ignoring MAX_ITERATIONS={:?}: not a number", value),
            }
        }

        if let Some(value) = lookup("CONSENSUS_THRESHOLD") {
            match value.trim().parse::<f64>() {
                Ok(t) => {
                    figment =
                        figment.merge(Serialized::default("orchestration.consensus_threshold", t))
                }
                Err(_) => warn!("Ignoring CONSENSUS_THRESHOLD={:?}: not a number", value),
            }
        }

        figment
    }

    /// Get the global config file path
    ///
    /// Returns `<config dir>/llm-consensus/config.toml`
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("llm-consensus").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources() {
        println!("Configuration sources (in priority order):");

        println!("  [     ] Env:     {}* variables", ENV_PREFIX);

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./consensus.toml or ./.consensus.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

/// Split a comma-separated list, dropping blanks.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn with_legacy(vars: &[(&str, &str)]) -> FileConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));
        ConfigLoader::merge_legacy_env(figment, |name| vars.get(name).cloned())
            .extract()
            .unwrap()
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert!(config.providers.ollama.models.is_empty());
        assert_eq!(config.orchestration.max_iterations, 3);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("llm-consensus"));
    }

    #[test]
    fn test_legacy_model_lists() {
        let config = with_legacy(&[
            ("OLLAMA_MODELS", "llama3.1, mistral,"),
            ("OPENROUTER_MODELS", "openai/gpt-4o"),
        ]);
        assert_eq!(config.providers.ollama.models, vec!["llama3.1", "mistral"]);
        assert_eq!(config.providers.openrouter.models, vec!["openai/gpt-4o"]);
        assert!(config.providers.bedrock.models.is_empty());
        // Sibling keys keep their defaults
        assert_eq!(config.providers.ollama.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_legacy_orchestration_values() {
        let config = with_legacy(&[("MAX_ITERATIONS", "5"), ("CONSENSUS_THRESHOLD", "0.6")]);
        assert_eq!(config.orchestration.max_iterations, 5);
        assert_eq!(config.orchestration.consensus_threshold, 0.6);
    }

    #[test]
    fn test_legacy_invalid_number_is_ignored() {
        let config = with_legacy(&[("MAX_ITERATIONS", "many")]);
        assert_eq!(config.orchestration.max_iterations, 3);
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[orchestration]\nconsensus_threshold = 0.9").unwrap();

        let config: FileConfig = Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Toml::file(file.path()))
            .extract()
            .unwrap();
        assert_eq!(config.orchestration.consensus_threshold, 0.9);
        assert_eq!(config.orchestration.max_iterations, 3);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" a ,b,, c "), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }
}
