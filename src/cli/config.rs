use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::config::{config, AppConfig};
use crate::session::FileSessionStorage;
use crate::Backoffice;

/// `BACKOFFICE_CONFIG_DIR`, else `~/.config/impronta/backoffice`. Created on first use.
pub fn get_config_dir(app_config: &AppConfig) -> anyhow::Result<PathBuf> {
    let config_dir = match &app_config.session.config_dir {
        Some(dir) => dir.clone(),
        None => {
            let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
            PathBuf::from(home).join(".config").join("impronta").join("backoffice")
        }
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// Wire a `Backoffice` whose session survives between invocations.
pub fn build_app() -> anyhow::Result<Backoffice> {
    let app_config = config();
    let dir = get_config_dir(app_config)?;
    let storage = FileSessionStorage::new(&dir, &app_config.session.storage_key);
    debug!("Session file: {}", storage.path().display());

    Ok(Backoffice::new(app_config, Box::new(storage))?)
}
