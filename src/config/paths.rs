//! Settings file location

use std::path::PathBuf;

/// Environment variable naming an explicit settings file
pub const CONFIG_PATH_VAR: &str = "REJESTR_MCP_CONFIG";

/// Per-user directory holding `config.toml`, e.g. `~/.config/rejestr-mcp`
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(crate::NAME))
}

/// Settings file to read when no `--config` flag is given
pub fn config_path() -> Option<PathBuf> {
    config_path_with(|key| std::env::var(key).ok())
}

/// Resolve the settings file from an arbitrary variable lookup.
///
/// A blank `REJESTR_MCP_CONFIG` counts as unset.
pub fn config_path_with<F>(lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(CONFIG_PATH_VAR)
        .filter(|path| !path.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| config_dir().map(|dir| dir.join("config.toml")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let path = config_path_with(|key| {
            (key == CONFIG_PATH_VAR).then(|| "/etc/rejestr/settings.json".to_string())
        });
        assert_eq!(path, Some(PathBuf::from("/etc/rejestr/settings.json")));
    }

    #[test]
    fn test_blank_path_falls_back_to_config_dir() {
        let path = config_path_with(|_| Some("  ".to_string()));
        assert_eq!(path, config_dir().map(|dir| dir.join("config.toml")));
        if let Some(path) = path {
            assert!(path.ends_with("rejestr-mcp/config.toml"));
        }
    }
}
