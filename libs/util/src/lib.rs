use std::path::{Path, PathBuf};

use anyhow::Context;
use toml::{map::Map, Value};

/// Root of the cargo workspace, falling back to the current directory when
/// the binary runs outside of cargo (e.g. a deployed container).
pub fn workspace_dir() -> PathBuf {
    let located = std::process::Command::new(env!("CARGO"))
        .arg("locate-project")
        .arg("--workspace")
        .arg("--message-format=plain")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .and_then(|stdout| {
            Path::new(stdout.trim()).parent().map(Path::to_path_buf)
        });

    located
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_default()
}

pub fn load_config(config_name: &str) -> anyhow::Result<Map<String, Value>> {
    let workspace_dir = workspace_dir();
    let config = std::fs::read_to_string(workspace_dir.join(config_name))
        .with_context(|| format!("failed to read {}", config_name))?;

    let config = toml::from_str::<Map<String, Value>>(&config)
        .with_context(|| format!("failed to parse {}", config_name))?;

    Ok(config)
}

pub fn load_env() -> anyhow::Result<Map<String, Value>> {
    let workspace_dir = workspace_dir();
    let secrets = std::fs::read_to_string(workspace_dir.join("Secrets.toml"))
        .context("failed to read Secrets.toml")?;

    toml::from_str::<Map<String, Value>>(&secrets)
        .context("failed to parse Secrets.toml")
}

/// Reads a string value at `section.key`.
pub fn get_str<'a>(
    config: &'a Map<String, Value>,
    section: &str,
    key: &str,
) -> anyhow::Result<&'a str> {
    config
        .get(section)
        .and_then(|section| section.get(key))
        .and_then(Value::as_str)
        .with_context(|| format!("{}.{} was not found", section, key))
}

#[cfg(test)]
mod test {
    use super::get_str;
    use toml::{map::Map, Value};

    #[test]
    fn test_get_str() {
        // Arrange
        let config = toml::from_str::<Map<String, Value>>(
            r#"
            [gemini]
            model = "gemini-2.5-flash"
            "#,
        )
        .unwrap();

        // Act
        let model = get_str(&config, "gemini", "model");
        let missing = get_str(&config, "gemini", "base_url");

        // Assert
        assert_eq!(model.unwrap(), "gemini-2.5-flash");
        assert!(missing.is_err());
    }
}
