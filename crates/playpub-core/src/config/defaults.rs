//! Default configuration values

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "playpub.yaml";

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "playpub.toml";

/// Alternative configuration file name
pub const ALT_CONFIG_FILE: &str = ".playpub.yaml";

/// Track used when none is configured
pub const DEFAULT_TRACK: &str = "internal";

/// Highest in-app update priority accepted by Play
pub const MAX_UPDATE_PRIORITY: i32 = 5;

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".playpub.toml",
        ALT_CONFIG_FILE,
    ]
}
