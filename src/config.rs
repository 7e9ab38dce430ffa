use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding the database files, relative to the store root
pub const DATABASES_DIR: &str = "databases";

/// File stem of the article store
pub const ARTICLES_DB: &str = "reuters";

/// File stem of the price store
pub const PRICES_DB: &str = "daily";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MarketDbConfig {
    pub root: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("marketdb.toml")
}

/// `<root>/databases/<name>.db`
pub fn database_path_in(root: &Path, name: &str) -> PathBuf {
    root.join(DATABASES_DIR).join(format!("{name}.db"))
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<MarketDbConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: MarketDbConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

/// Store root: explicit flag, then config file, then the working directory
pub fn resolve_root(flag: Option<PathBuf>, config: Option<&MarketDbConfig>) -> PathBuf {
    flag.or_else(|| config.and_then(|c| c.root.as_ref()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn ensure_db_dir(db_path: &Path) -> std::io::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
