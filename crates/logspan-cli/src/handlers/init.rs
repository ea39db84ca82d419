use std::path::Path;

use anyhow::{Result, bail};

use crate::config::Config;

pub fn handle(explicit_path: Option<&Path>, force: bool) -> Result<()> {
    let path = match explicit_path {
        Some(path) => path.to_path_buf(),
        None => Config::default_path()?,
    };

    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    Config::default().save_to(&path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
