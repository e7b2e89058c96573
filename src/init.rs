use std::path::Path;

use anyhow::{Context, bail};
use docqa_core::Config;

/// Render the default configuration as TOML.
pub(crate) fn default_config_toml() -> anyhow::Result<String> {
    toml::to_string_pretty(&Config::default()).context("failed to serialize default config")
}

/// Write the default configuration to `path`.
pub fn run(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let toml_str = default_config_toml()?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, &toml_str)
        .with_context(|| format!("failed to write {}", path.display()))?;

    println!("Config written to {}", path.display());
    println!("Set GOOGLE_API_KEY in your environment or a .env file before asking questions.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_config_that_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/docqa.toml");
        run(&path, false).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: Config = toml::from_str(&written).unwrap();
        assert_eq!(parsed.llm.model, Config::default().llm.model);
        assert_eq!(parsed.video.processing_timeout_secs, 600);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docqa.toml");
        std::fs::write(&path, "# mine").unwrap();

        let err = run(&path, false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine");

        run(&path, true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("[llm]"));
    }
}
