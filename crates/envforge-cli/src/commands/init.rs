use std::path::Path;

use anyhow::{Context, bail};
use envforge_core::config::CONFIG_FILE_NAME;
use envforge_core::{EnvforgeConfig, ProjectPrefix};

pub fn init(path: &str, prefix: &str) -> anyhow::Result<()> {
    let output = write_scaffold(Path::new(path), prefix)?;
    println!("✓ Generated {}", output.display());
    Ok(())
}

fn write_scaffold(dir: &Path, prefix: &str) -> anyhow::Result<std::path::PathBuf> {
    let prefix = ProjectPrefix::parse(prefix)?;
    let output = dir.join(CONFIG_FILE_NAME);
    if output.exists() {
        bail!("{} already exists", output.display());
    }

    let config = EnvforgeConfig::scaffold(prefix);
    std::fs::write(&output, config.to_toml_string()?)
        .with_context(|| format!("writing {}", output.display()))?;
    Ok(output)
}
