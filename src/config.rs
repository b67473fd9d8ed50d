use std::path::Path;

use anyhow::{Context, Result};
use config as cfg;
use serde::Deserialize;

use crate::options::{ParserKind, QuoteStyle};

#[derive(Debug, Default, Deserialize, Clone)]
pub struct TransformConfig {
    pub parser: Option<ParserKind>,
    pub quote: Option<QuoteStyle>,
    pub skip_import_detection: Option<bool>,
    pub extensions: Option<Vec<String>>,
    pub ignore: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Clone)]
struct RootConfig {
    pub transform: Option<TransformConfig>,
}

pub struct LoadedConfig {
    pub cfg: TransformConfig,
}

pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(p) = explicit {
        return load_from_path(Some(p));
    }
    let cwd = std::env::current_dir()?;
    let candidates = [
        "mockshift.toml",
        "mockshift.yaml",
        "mockshift.yml",
        "mockshift.json",
    ];
    for name in &candidates {
        let path = cwd.join(name);
        if path.is_file() {
            return load_from_path(Some(&path));
        }
    }
    load_from_path(None)
}

fn load_from_path(path: Option<&Path>) -> Result<LoadedConfig> {
    let mut builder = cfg::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(cfg::File::from(path));
    }
    // MOCKSHIFT_TRANSFORM__PARSER=ts
    let builder = builder.add_source(
        cfg::Environment::with_prefix("MOCKSHIFT")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("transform.extensions")
            .with_list_parse_key("transform.ignore")
            .try_parsing(true),
    );
    let origin = path.map_or_else(|| "environment".to_string(), |p| p.display().to_string());
    let conf = builder
        .build()
        .with_context(|| format!("failed to load config from {origin}"))?;
    let root = conf
        .try_deserialize::<RootConfig>()
        .with_context(|| format!("failed to parse config at {origin}"))?;
    Ok(LoadedConfig {
        cfg: root.transform.unwrap_or_default(),
    })
}
