//! Configuration loading: optional JSON file, `.env`, then environment overrides.

use std::fs;
use std::path::Path;

use novaapp_types::{AdapterConfig, ConfigError, Credential};

/// Prefix of the numbered credential variables (`NOVAAPP_CREDENTIAL_1`, `_2`, ...).
pub const CREDENTIAL_ENV_PREFIX: &str = "NOVAAPP_CREDENTIAL_";

/// Load and validate the adapter configuration.
///
/// Reads `.env` from the working directory when present, then defers to
/// [`load_config_with`] using the process environment.
pub fn load_config(path: Option<&Path>) -> Result<AdapterConfig, ConfigError> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!("Ignoring unreadable .env file: {}", e);
        }
    }
    load_config_with(path, |key| std::env::var(key).ok())
}

/// Same as [`load_config`] with an injectable environment lookup.
pub fn load_config_with<F>(path: Option<&Path>, env: F) -> Result<AdapterConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => AdapterConfig::default(),
    };

    apply_env_overrides(&mut config, &env)?;
    config.validate_config()?;

    tracing::info!(
        "Loaded configuration: {} credential(s), {} model(s), default model '{}'",
        config.credentials.len(),
        config.model_mapping.len(),
        config.default_model
    );
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<AdapterConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound { path: path.display().to_string() });
    }
    let content = fs::read_to_string(path).map_err(|e| ConfigError::ParseError {
        message: format!("failed to read {}: {}", path.display(), e),
    })?;
    serde_json::from_str(&content).map_err(|e| ConfigError::from_json_error(&e))
}

fn apply_env_overrides<F>(config: &mut AdapterConfig, env: &F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    config.credentials.extend(collect_env_credentials(env));

    if let Some(key) = env("API_MASTER_KEY") {
        config.api_master_key = Some(key);
    }
    if let Some(model) = env("DEFAULT_MODEL") {
        config.default_model = model;
    }
    if let Some(secs) = parse_env_u64(env, "API_REQUEST_TIMEOUT")? {
        config.request_timeout_secs = secs;
    }
    if let Some(secs) = parse_env_u64(env, "POLLING_INTERVAL")? {
        config.polling_interval_secs = secs;
    }
    if let Some(secs) = parse_env_u64(env, "POLLING_TIMEOUT")? {
        config.polling_timeout_secs = secs;
    }
    Ok(())
}

/// Scan `NOVAAPP_CREDENTIAL_1..` until the first missing index.
fn collect_env_credentials<F>(env: &F) -> Vec<Credential>
where
    F: Fn(&str) -> Option<String>,
{
    let mut credentials = Vec::new();
    for i in 1.. {
        let key = format!("{}{}", CREDENTIAL_ENV_PREFIX, i);
        let Some(raw) = env(&key) else { break };
        match Credential::parse(&raw) {
            Some(cred) => credentials.push(cred),
            None => tracing::warn!("Malformed {}, expected 'token|user_id'; skipping", key),
        }
    }
    credentials
}

fn parse_env_u64<F>(env: &F, key: &str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    env(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::invalid(key, format!("'{}' is not a number: {}", raw, e)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_credentials_stop_at_first_gap() {
        let env = env_from(&[
            ("NOVAAPP_CREDENTIAL_1", "t1|u1"),
            ("NOVAAPP_CREDENTIAL_2", "t2|u2"),
            ("NOVAAPP_CREDENTIAL_4", "t4|u4"),
        ]);
        let config = load_config_with(None, env).expect("valid config");
        assert_eq!(config.credentials, vec![Credential::new("t1", "u1"), Credential::new("t2", "u2")]);
    }

    #[test]
    fn test_malformed_credential_is_skipped_not_fatal() {
        let env = env_from(&[
            ("NOVAAPP_CREDENTIAL_1", "garbage"),
            ("NOVAAPP_CREDENTIAL_2", "t2|u2"),
        ]);
        let config = load_config_with(None, env).expect("valid config");
        assert_eq!(config.credentials, vec![Credential::new("t2", "u2")]);
    }

    #[test]
    fn test_no_credentials_is_configuration_error() {
        let err = load_config_with(None, env_from(&[])).expect_err("must fail");
        assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "credentials"));
    }

    #[test]
    fn test_numeric_overrides() {
        let env = env_from(&[
            ("NOVAAPP_CREDENTIAL_1", "t|u"),
            ("POLLING_INTERVAL", "5"),
            ("POLLING_TIMEOUT", "60"),
            ("API_REQUEST_TIMEOUT", "30"),
            ("API_MASTER_KEY", "sk-master"),
        ]);
        let config = load_config_with(None, env).expect("valid config");
        assert_eq!(config.polling_interval_secs, 5);
        assert_eq!(config.polling_timeout_secs, 60);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.effective_api_key(), Some("sk-master"));
    }

    #[test]
    fn test_non_numeric_override_is_rejected() {
        let env = env_from(&[("NOVAAPP_CREDENTIAL_1", "t|u"), ("POLLING_TIMEOUT", "soon")]);
        let err = load_config_with(None, env).expect_err("must fail");
        assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "POLLING_TIMEOUT"));
    }

    #[test]
    fn test_file_then_env_credentials_append() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(
            file,
            r#"{{"credentials":[{{"token":"file-t","user_id":"file-u"}}],"polling_timeout_secs":12}}"#
        )
        .expect("write");

        let env = env_from(&[("NOVAAPP_CREDENTIAL_1", "env-t|env-u")]);
        let config = load_config_with(Some(file.path()), env).expect("valid config");
        assert_eq!(config.credentials.len(), 2);
        assert_eq!(config.credentials[0].token, "file-t");
        assert_eq!(config.credentials[1].token, "env-t");
        assert_eq!(config.polling_timeout_secs, 12);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = load_config_with(Some(Path::new("/nonexistent/novaapp.json")), env_from(&[]))
            .expect_err("must fail");
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, "{{ not json").expect("write");
        let err = load_config_with(Some(file.path()), env_from(&[])).expect_err("must fail");
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }
}
