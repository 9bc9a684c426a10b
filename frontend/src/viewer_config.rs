use shared::ViewerConfig;

const VIEWER_TOML: &str = include_str!("../viewer.toml");

/// Settings embedded at build time. A broken file falls back to defaults.
pub fn load() -> ViewerConfig {
    parse_or_default(VIEWER_TOML)
}

fn parse_or_default(source: &str) -> ViewerConfig {
    ViewerConfig::from_toml_str(source).unwrap_or_else(|error| {
        log::error!("invalid viewer.toml, using defaults: {}", error);
        ViewerConfig::default()
    })
}
