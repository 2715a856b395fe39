use std::path::{Path, PathBuf};

use anyhow::Context;
use toml::{map::Map, Value};

/// Overrides where `Config.toml` and the secrets file are looked up.
pub const CONFIG_DIR_ENV: &str = "ADFORGE_CONFIG_DIR";

pub fn workspace_dir() -> PathBuf {
    let output = std::process::Command::new(env!("CARGO"))
        .arg("locate-project")
        .arg("--workspace")
        .arg("--message-format=plain")
        .output()
        .map(|output| output.stdout)
        .unwrap_or_default();
    let located = std::str::from_utf8(&output).unwrap_or_default().trim();
    match Path::new(located).parent() {
        Some(dir) if !located.is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

pub fn config_dir() -> PathBuf {
    match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => workspace_dir(),
    }
}

pub fn load_config(config_name: &str) -> anyhow::Result<Map<String, Value>> {
    let path = config_dir().join(config_name);
    let config = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    parse_table(&config)
        .with_context(|| format!("failed to parse {}", path.display()))
}

pub fn load_env(secrets_name: &str) -> anyhow::Result<Map<String, Value>> {
    load_config(secrets_name)
}

pub fn parse_table(text: &str) -> anyhow::Result<Map<String, Value>> {
    Ok(toml::from_str::<Map<String, Value>>(text)?)
}

/// Reads an optional string entry, treating blank values as absent.
pub fn secret(secrets: &Map<String, Value>, key: &str) -> Option<String> {
    secrets
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod test {
    use super::{parse_table, secret};

    #[test]
    fn test_secret_skips_blank_values() {
        // Arrange
        let secrets = parse_table(
            r#"
            GATEWAY_API_KEY = "  "
            ACCEPTABLE_API_KEY = "local-key"
            "#,
        )
        .unwrap();

        // Act
        let gateway = secret(&secrets, "GATEWAY_API_KEY");
        let accept = secret(&secrets, "ACCEPTABLE_API_KEY");
        let missing = secret(&secrets, "CONFIG");

        // Assert
        assert_eq!(gateway, None);
        assert_eq!(accept.as_deref(), Some("local-key"));
        assert_eq!(missing, None);
    }
}
