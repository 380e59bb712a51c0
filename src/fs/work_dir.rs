use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that points at a `.work` directory directly.
pub const WORK_DIR_ENV: &str = "DEALFLOW_WORK_DIR";

const SUBDIRS: [&str; 1] = ["timelines"];

pub struct WorkDir {
    root: PathBuf,
}

impl WorkDir {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self> {
        let root = base_path.as_ref().join(".work");
        Ok(Self { root })
    }

    /// Use `DEALFLOW_WORK_DIR` when set, otherwise `<cwd>/.work`.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(WORK_DIR_ENV) {
            Some(path) if !path.is_empty() => Ok(Self {
                root: PathBuf::from(path),
            }),
            _ => {
                let cwd = std::env::current_dir().context("Failed to get current directory")?;
                Self::new(cwd)
            }
        }
    }

    pub fn initialize(&self) -> Result<()> {
        if self.root.exists() {
            bail!("{} already exists", self.root.display());
        }

        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create {}", self.root.display()))?;

        for subdir in &SUBDIRS {
            let path = self.root.join(subdir);
            fs::create_dir(&path)
                .with_context(|| format!("Failed to create {subdir} directory"))?;
        }

        self.create_readme()?;

        Ok(())
    }

    pub fn load(&self) -> Result<()> {
        if !self.root.exists() {
            bail!(
                "{} does not exist. Run 'dealflow init' first.",
                self.root.display()
            );
        }

        self.validate_structure()?;

        Ok(())
    }

    fn validate_structure(&self) -> Result<()> {
        for dir in &SUBDIRS {
            let path = self.root.join(dir);
            if !path.exists() {
                // Auto-create missing directories instead of failing
                fs::create_dir(&path)
                    .with_context(|| format!("Failed to create missing directory: {dir}"))?;
            }
        }

        Ok(())
    }

    fn create_readme(&self) -> Result<()> {
        let readme_content = r#"# dealflow Work Directory

This directory is managed by the dealflow CLI and contains:

- `timelines/` - One pipeline timeline per deal (YAML frontmatter + summary)
- `config.toml` - Optional settings (reminder delay, recipients, log level)

Timeline files are rewritten on every command. Edit them by hand only while
no dealflow command is running.
"#;

        let readme_path = self.root.join("README.md");
        fs::write(readme_path, readme_content).context("Failed to create README.md")?;

        Ok(())
    }

    pub fn timelines_dir(&self) -> PathBuf {
        self.root.join("timelines")
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_creates_layout() {
        let temp = TempDir::new().unwrap();
        let work_dir = WorkDir::new(temp.path()).unwrap();
        work_dir.initialize().unwrap();

        assert!(work_dir.timelines_dir().is_dir());
        assert!(work_dir.root().join("README.md").is_file());
    }

    #[test]
    fn test_initialize_twice_fails() {
        let temp = TempDir::new().unwrap();
        let work_dir = WorkDir::new(temp.path()).unwrap();
        work_dir.initialize().unwrap();
        assert!(work_dir.initialize().is_err());
    }

    #[test]
    fn test_load_requires_init_and_repairs_subdirs() {
        let temp = TempDir::new().unwrap();
        let work_dir = WorkDir::new(temp.path()).unwrap();
        let err = work_dir.load().unwrap_err();
        assert!(err.to_string().contains("dealflow init"));

        work_dir.initialize().unwrap();
        fs::remove_dir(work_dir.timelines_dir()).unwrap();
        work_dir.load().unwrap();
        assert!(work_dir.timelines_dir().is_dir());
    }

    #[test]
    #[serial]
    fn test_from_env_override() {
        let temp = TempDir::new().unwrap();
        let custom = temp.path().join("elsewhere");
        std::env::set_var(WORK_DIR_ENV, &custom);

        let work_dir = WorkDir::from_env().unwrap();
        std::env::remove_var(WORK_DIR_ENV);

        assert_eq!(work_dir.root(), custom.as_path());
    }
}
