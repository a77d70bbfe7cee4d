use anyhow::{Context, Result};
use simplelog::{Config, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::{Path, PathBuf};

pub fn default_log_path() -> PathBuf {
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "apply") {
        proj_dirs.data_dir().join("apply.log")
    } else {
        PathBuf::from("apply.log")
    }
}

// stdout belongs to the terminal UI, so logs go to a file.
pub fn init(path: &Path, level: LevelFilter) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file: {}", path.display()))?;
    WriteLogger::init(level, Config::default(), file).context("Logger already initialized")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_path_names_file() {
        let path = default_log_path();
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("apply.log"));
    }
}
