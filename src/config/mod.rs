use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::Metric;
use crate::layers::{RenderMode, StyleOverrides};

fn default_width() -> u32 {
    1024
}
fn default_height() -> u32 {
    768
}
fn default_verbose() -> bool {
    false
}

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    /// GeoJSON FeatureCollection path or URL
    #[serde(default)]
    pub geojson: Option<String>,
    /// Dataset paths or URLs, earlier entries win on conflicting keys
    #[serde(default)]
    pub datasets: Vec<String>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub mode: Option<RenderMode>,
    /// Metric the population mode colors by
    #[serde(default)]
    pub metric: Option<Metric>,
    #[serde(default)]
    pub fit_bounds: Option<bool>,
    /// Region short name to hover in the snapshot
    #[serde(default)]
    pub hover: Option<String>,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub style: Option<StyleOverrides>,
    #[serde(default)]
    pub fetch: Option<FetchConfig>,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

/// HTTP settings for remote GeoJSON and datasets
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FetchConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl FileConfig {
    /// First config file found on the search path that parses
    pub fn load() -> Option<Self> {
        let config_paths = get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    /// Load an explicitly named config file
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        if !path.exists() {
            anyhow::bail!("Config file not found: {:?}", path);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents).context("Failed to parse config file")
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("choromap.toml"));
    paths.push(PathBuf::from(".choromap.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("choromap").join("config.toml"));
        paths.push(config_dir.join("choromap.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".choromap.toml"));
        paths.push(home.join(".config").join("choromap").join("config.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Color;

    #[test]
    fn test_parse_full_config() {
        let config: FileConfig = toml::from_str(
            r##"
            geojson = "seoul.geojson"
            datasets = ["pop.json", "https://example.com/extra.json"]
            mode = "recommendation"
            metric = "residentPopulation"
            hover = "Samseong-dong"
            width = 800

            [style]
            stroke_color = "#000000"
            fill_opacity = 0.3
            settle_fallback_ms = 0

            [fetch]
            max_retries = 5
            "##,
        )
        .unwrap();

        assert_eq!(config.geojson.as_deref(), Some("seoul.geojson"));
        assert_eq!(config.datasets.len(), 2);
        assert_eq!(config.mode, Some(RenderMode::Recommendation));
        assert_eq!(config.metric, Some(Metric::ResidentPopulation));
        assert_eq!(config.width, 800);
        assert_eq!(config.height, 768);

        let style = config.style.unwrap();
        assert_eq!(style.stroke_color, Some(Color::rgb(0, 0, 0)));
        assert_eq!(style.fill_opacity, Some(0.3));

        let fetch = config.fetch.unwrap();
        assert_eq!(fetch.max_retries, 5);
        assert_eq!(fetch.timeout_secs, 30);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert!(config.datasets.is_empty());
        assert_eq!(config.mode, None);
        assert!(!config.verbose);
        assert_eq!((config.width, config.height), (1024, 768));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("choromap.toml");
        std::fs::write(&path, "verbose = true\n").unwrap();
        assert!(FileConfig::from_path(&path).unwrap().verbose);

        let missing = dir.path().join("nope.toml");
        assert!(FileConfig::from_path(&missing).is_err());
    }

    #[test]
    fn test_config_paths_start_local() {
        let paths = get_config_paths();
        assert_eq!(paths[0], PathBuf::from("choromap.toml"));
        assert_eq!(paths[1], PathBuf::from(".choromap.toml"));
    }
}
