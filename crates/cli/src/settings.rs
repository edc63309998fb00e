//! Configuration loading
//!
//! Layers, lowest precedence first:
//! 1. built-in defaults (`ScanConfig::default`)
//! 2. TOML file: `--config <path>`, or `capscan.toml` in the platform config dir
//! 3. `CAPSCAN__*` environment variables (`CAPSCAN__SCRIPT__PROGRAM=...`)

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use std::path::PathBuf;

use capscan_core::application::ScanConfig;

const CONFIG_FILE_NAME: &str = "capscan.toml";
const ENV_PREFIX: &str = "CAPSCAN";

/// `capscan.toml` under the user's config directory
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "capscan").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Load and validate the scan configuration
///
/// An explicit `path` must exist; the default path is optional.
pub fn load_config(path: Option<&str>) -> Result<ScanConfig> {
    let mut builder = Config::builder();

    match path {
        Some(path) => {
            let expanded = shellexpand::tilde(path).into_owned();
            builder = builder.add_source(File::new(&expanded, FileFormat::Toml).required(true));
        }
        None => {
            if let Some(default_path) = default_config_path() {
                builder = builder.add_source(
                    File::from(default_path)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("disabled_providers")
            .try_parsing(true),
    );

    let mut scan_config: ScanConfig = builder
        .build()
        .context("Failed to read configuration")?
        .try_deserialize()
        .context("Invalid configuration")?;

    if let Some(script) = scan_config.script.as_mut() {
        script.program = shellexpand::tilde(&script.program).into_owned();
    }

    scan_config.validate()?;
    Ok(scan_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use capscan_core::application::ScanMode;
    use std::io::Write;

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
mode = "concurrent"
probe_timeout_ms = 2500
disabled_providers = ["AzureGuestAgent", "NodeTools"]

[script]
program = "/opt/agent/bin/add-capabilities.sh"
args = ["--quiet"]
"#
        )
        .unwrap();

        let config = load_config(Some(file.path().to_str().unwrap())).unwrap();

        assert_eq!(config.mode, ScanMode::Concurrent);
        assert_eq!(config.probe_timeout_ms, 2500);
        assert!(!config.is_enabled("NodeTools"));
        let script = config.script.unwrap();
        assert_eq!(script.program, "/opt/agent/bin/add-capabilities.sh");
        assert_eq!(script.args, vec!["--quiet".to_string()]);
        assert!(script.timeout_ms > 0);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");

        assert!(load_config(Some(missing.to_str().unwrap())).is_err());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "probe_timeout_ms = 0").unwrap();

        assert!(load_config(Some(file.path().to_str().unwrap())).is_err());
    }
}
