use crate::config::{self, SubcueConfig, CONFIG_FILE_NAME};
use crate::error::{SubcueError, SubcueResult};
use colored::*;
use std::path::{Path, PathBuf};

/// Where `init` writes the config: a folder (existing or extension-less)
/// gets `subcue.toml` inside it, anything else is taken as the file name.
pub fn config_path_for(path: &Path) -> PathBuf {
    if path.is_dir() || path.extension().is_none() {
        path.join(CONFIG_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}

/// Write a config file populated with every default. Refuses to overwrite.
pub fn create_config(path: &Path) -> SubcueResult<PathBuf> {
    let config_path = config_path_for(path);
    if config_path.exists() {
        return Err(SubcueError::AlreadyInitialized(config_path));
    }
    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    config::save_config(&config_path, &SubcueConfig::default())?;
    Ok(config_path)
}

/// CLI entry point, delegates to `create_config()`.
pub fn run(path: &Path) -> SubcueResult<()> {
    let config_path = create_config(path)?;

    eprintln!(
        "{} Wrote {}",
        "done:".green().bold(),
        config_path.display()
    );
    eprintln!();
    eprintln!("Next: adjust {}, then run:", "[segmentation]".cyan());
    eprintln!("  subcue generate <words.json or folder>");

    Ok(())
}
