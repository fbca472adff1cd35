mod config;

pub use config::Config;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Deployment environment variable.
pub const ENV_VAR: &str = "WHOCARES_ENV";

/// Returns `~/.config/whocares[-dev]/` based on WHOCARES_ENV.
///
/// Set WHOCARES_ENV=dev (or development) to use the development data directory.
/// The directory is keyed on the variable alone because the config file lives
/// inside it: with the variable unset this is `~/.config/whocares`, even though
/// [`Config::resolve_environment`] then falls back to development.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let dir = base_dir.join(dir_name(std::env::var(ENV_VAR).ok().as_deref()));

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

fn dir_name(env_var: Option<&str>) -> &'static str {
    match env_var.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("dev" | "development") => "whocares-dev",
        _ => "whocares",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_an_explicit_dev_tag_selects_the_dev_directory() {
        assert_eq!(dir_name(Some("dev")), "whocares-dev");
        assert_eq!(dir_name(Some(" Development ")), "whocares-dev");
        assert_eq!(dir_name(Some("production")), "whocares");
        assert_eq!(dir_name(Some("")), "whocares");
        assert_eq!(dir_name(None), "whocares");
    }

    #[test]
    fn unset_variable_resolves_development_but_keeps_default_directory() {
        let env = Config::default().resolve_environment_with(None).unwrap();
        assert_eq!(env, crate::window::Environment::Development);
        assert_eq!(dir_name(None), "whocares");
    }
}
