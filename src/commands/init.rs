use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::config::Config;
use crate::fs::work_dir::WorkDir;

/// Initialize the .work/ directory structure and a starter config.
pub fn execute() -> Result<()> {
    let work_dir = WorkDir::from_env()?;
    initialize(&work_dir)?;

    println!("\n{}", "Initialize".bold());
    println!("{}", "─".repeat(40).dimmed());
    println!(
        "  {} Directory structure created {}",
        "✓".green().bold(),
        work_dir.root().display().to_string().dimmed()
    );
    println!(
        "  {} Config written {}",
        "✓".green().bold(),
        "config.toml".dimmed()
    );
    println!(
        "\nAdd the team to {} under {} before sending follow-up emails.",
        "config.toml".bold(),
        "[[recipients.active]]".bold()
    );
    Ok(())
}

/// Create the layout and write the default config.
pub fn initialize(work_dir: &WorkDir) -> Result<()> {
    work_dir.initialize()?;
    write_default_config(&work_dir.config_path())
}

fn write_default_config(path: &Path) -> Result<()> {
    Config::default().save(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_writes_loadable_config() {
        let temp = TempDir::new().unwrap();
        let work_dir = WorkDir::new(temp.path()).unwrap();
        initialize(&work_dir).unwrap();

        let config = Config::load(work_dir.root()).unwrap();
        assert_eq!(config, Config::default());
        assert!(work_dir.timelines_dir().is_dir());
    }
}
