use std::path::Path;

use anyhow::{bail, Result};

use curveplay_core::AppConfig;

/// Print the resolved configuration, or write the defaults with `init`
pub fn run(config: &AppConfig, path: &Path, init: bool) -> Result<()> {
    if init {
        if path.exists() {
            bail!("{} already exists; remove it first to reset", path.display());
        }
        AppConfig::default().save_to(path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    config.validate()?;
    println!("# {}", path.display());
    print!("{}", config.to_toml()?);
    Ok(())
}
