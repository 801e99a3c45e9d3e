use std::path::Path;
use std::str::FromStr;

use super::types::AppConfig;
use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "collector.toml";

pub fn load_default() -> Result<AppConfig, ConfigError> {
    load_from(Path::new(DEFAULT_CONFIG_FILE))
}

/// File (or defaults) plus process environment overrides.
pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let mut cfg = read_config_file(path)?;
    apply_env_overrides(&mut cfg, |k| std::env::var(k).ok())?;
    cfg.validate()?;
    Ok(cfg)
}

/// Parse `path` as TOML when it exists, otherwise fall back to defaults.
pub fn read_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<AppConfig>(&s).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("COLLECTOR_BASE_DIR") {
        cfg.paths.base_dir = v.trim().into();
    }
    if let Some(v) = get("COLLECTOR_SCRIPT_TIMEOUT") {
        cfg.execution.script_timeout_secs = parse_env("COLLECTOR_SCRIPT_TIMEOUT", &v)?;
    }
    if let Some(v) = get("COLLECTOR_RETRY_ATTEMPTS") {
        cfg.execution.retry_attempts = parse_env("COLLECTOR_RETRY_ATTEMPTS", &v)?;
    }
    if let Some(v) = get("COLLECTOR_STEP_DELAY") {
        cfg.execution.step_delay_secs = parse_env("COLLECTOR_STEP_DELAY", &v)?;
    }
    Ok(())
}

fn parse_env<T: FromStr>(var: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        var: var.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = read_config_file(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg.steps.len(), 12);
    }

    #[test]
    fn toml_steps_replace_reference_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collector.toml");
        std::fs::write(
            &path,
            r#"
[execution]
script_timeout_secs = 60

[[steps]]
name = "a.R"
output_files = ["a.json"]
critical = true
"#,
        )
        .unwrap();

        let cfg = read_config_file(&path).unwrap();
        assert_eq!(cfg.execution.script_timeout_secs, 60);
        assert_eq!(cfg.execution.retry_attempts, 2);
        assert_eq!(cfg.steps.len(), 1);
        assert!(cfg.steps[0].critical);
        assert_eq!(cfg.steps[0].description, "");
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collector.toml");
        std::fs::write(&path, "[execution\nscript_timeout_secs = ").unwrap();
        assert!(matches!(
            read_config_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn env_overrides_apply_and_blank_values_are_ignored() {
        let mut cfg = AppConfig::default();
        apply_env_overrides(
            &mut cfg,
            env(&[
                ("COLLECTOR_SCRIPT_TIMEOUT", " 45 "),
                ("COLLECTOR_RETRY_ATTEMPTS", "  "),
                ("COLLECTOR_BASE_DIR", "/opt/collector"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.execution.script_timeout_secs, 45);
        assert_eq!(cfg.execution.retry_attempts, 2);
        assert_eq!(cfg.paths.base_dir, std::path::PathBuf::from("/opt/collector"));
    }

    #[test]
    fn unparsable_env_override_is_rejected() {
        let mut cfg = AppConfig::default();
        let err = apply_env_overrides(&mut cfg, env(&[("COLLECTOR_STEP_DELAY", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { ref var, .. } if var == "COLLECTOR_STEP_DELAY"));
    }
}
