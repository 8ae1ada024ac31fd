//! Init command implementation

use crate::config::Config;
use crate::error::{Error, Result};
use crate::meta::MetaDb;
use std::path::PathBuf;
use tracing::info;

/// Write a starter config and create the metadata database
pub async fn cmd_init(base_dir: Option<PathBuf>, force: bool) -> Result<Config> {
    let mut config = Config::default();
    let base = base_dir.unwrap_or_else(Config::default_base_dir);

    config.paths.config_file = base.join("config.toml");
    config.paths.db_file = base.join("metadata.db");
    config.paths.base_dir = base;

    if config.paths.config_file.exists() && !force {
        return Err(Error::Config(format!(
            "Already initialized at {} (use --force to overwrite)",
            config.paths.config_file.display()
        )));
    }

    config.save()?;

    let db = MetaDb::connect(&config.paths.db_file).await?;
    db.init_schema().await?;

    info!("Initialized botforge at {:?}", config.paths.base_dir);
    Ok(config)
}

/// Print init results to console
pub fn print_init(config: &Config) {
    println!("Initialized botforge");
    println!("  Config:   {}", config.paths.config_file.display());
    println!("  Database: {}", config.paths.db_file.display());
    println!(
        "  Embedding: {} ({} dims)",
        config.embedding.backend, config.embedding.dimension
    );
    println!("  Index:     {}", config.index.backend);
}
