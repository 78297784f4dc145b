use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;

use crate::session::FieldMap;
use crate::utils::crypto::generate_secret;

/// Environment variable naming a directory whose `Settings.toml` overrides the local one
pub const SECRETS_DIR_ENV: &str = "STRAPI_AUTH_SECRETS_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BridgeSettings {
    #[serde(default)]
    pub application: ApplicationSettings,
    #[serde(default)]
    pub strapi: StrapiSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub cookies: CookieSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: String,
}

/// Connection to the Strapi identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrapiSettings {
    /// Provider base URL, e.g. `https://cms.example.com`
    pub url: String,
    /// Optional service token sent as a bearer token on registration and reset calls
    #[serde(default)]
    pub token: Option<String>,
    /// Establish a local session after a successful password reset of a confirmed account
    #[serde(default)]
    pub sign_in_after_reset: bool,
    /// Local user field name -> dotted path into the provider user record
    #[serde(default)]
    pub user_fields_map: Option<FieldMap>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    pub session_secret: String,
    /// Static fields merged into every local user by the default session hook
    #[serde(default)]
    pub extra_user_fields: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieSettings {
    pub secure: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: "http://localhost:3000".to_string(),
        }
    }
}

impl Default for StrapiSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:1337".to_string(),
            token: None,
            sign_in_after_reset: false,
            user_fields_map: None,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            session_secret: String::new(), // Will be generated if empty
            extra_user_fields: None,
        }
    }
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            secure: true, // Default to secure cookies
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl BridgeSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Logger initialization fails
    /// - Settings file cannot be read or parsed
    /// - The Strapi base URL is not an absolute http(s) URL
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_env_file();

        let mut settings = Self::load_base_settings()?;
        Self::apply_logging_env_overrides(&mut settings.logging);
        Self::init_logger(&settings.logging)?;
        Self::apply_env_overrides(&mut settings);
        settings.validate()?;

        Ok(settings)
    }

    /// Load base settings from TOML file(s) or use defaults
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading base settings)
    /// 2. Settings.toml in `STRAPI_AUTH_SECRETS_DIR` (if specified and exists)
    /// 3. Settings.toml in current directory (if exists)
    /// 4. Default settings
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file cannot be read or parsed
    fn load_base_settings() -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings = Self::default();

        let default_config_path = std::path::PathBuf::from("Settings.toml");
        if default_config_path.exists() {
            settings = Self::from_file(&default_config_path)?;
            log::info!(
                "Loaded base settings from {}",
                default_config_path.display()
            );
        }

        if let Ok(secrets_dir) = std::env::var(SECRETS_DIR_ENV) {
            let secrets_path = std::path::Path::new(&secrets_dir).join("Settings.toml");
            if secrets_path.exists() {
                settings = Self::from_file(&secrets_path)?;
                log::info!("Overriding settings from {}", secrets_path.display());
            } else {
                log::info!(
                    "{SECRETS_DIR_ENV} set but no Settings.toml found at: {}",
                    secrets_path.display()
                );
            }
        }

        Ok(settings)
    }

    /// Parse a settings file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for this structure
    pub fn from_file(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        let toml_content = fs::read_to_string(path)?;
        Ok(basic_toml::from_str(&toml_content)?)
    }

    /// Check the settings that cannot be defaulted sensibly
    ///
    /// # Errors
    ///
    /// Returns an error if `strapi.url` is not an absolute http or https URL
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        let parsed = url::Url::parse(&self.strapi.url)
            .map_err(|e| format!("Invalid strapi.url '{}': {e}", self.strapi.url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(format!(
                "Invalid strapi.url '{}': unsupported scheme '{}'",
                self.strapi.url,
                parsed.scheme()
            )
            .into());
        }
        Ok(())
    }

    /// Apply environment variable overrides to settings
    pub fn apply_env_overrides(settings: &mut Self) {
        Self::apply_application_env_overrides(&mut settings.application);
        Self::apply_strapi_env_overrides(&mut settings.strapi);
        Self::apply_session_env_overrides(&mut settings.session);
        Self::apply_cookie_env_overrides(&mut settings.cookies);
        Self::apply_logging_env_overrides(&mut settings.logging);
    }

    fn apply_application_env_overrides(app_settings: &mut ApplicationSettings) {
        if let Ok(host) = std::env::var("HOST") {
            app_settings.host = host;
        }
        if let Ok(port_str) = std::env::var("PORT") {
            if let Ok(port) = port_str.parse::<u16>() {
                app_settings.port = port;
            }
        }
        if let Ok(cors_origins) = std::env::var("CORS_ORIGINS") {
            app_settings.cors_origins = cors_origins;
        }
    }

    /// Apply environment overrides for the provider connection
    pub fn apply_strapi_env_overrides(strapi_settings: &mut StrapiSettings) {
        if let Ok(url) = std::env::var("STRAPI_URL") {
            strapi_settings.url = url;
        }
        if let Ok(token) = std::env::var("STRAPI_TOKEN") {
            strapi_settings.token = if token.is_empty() { None } else { Some(token) };
        }
        if let Ok(flag) = std::env::var("SIGN_IN_AFTER_RESET") {
            if let Ok(flag) = flag.parse::<bool>() {
                strapi_settings.sign_in_after_reset = flag;
            }
        }
    }

    /// Apply environment overrides for session settings
    pub fn apply_session_env_overrides(session_settings: &mut SessionSettings) {
        let env_secret_set = std::env::var("SESSION_SECRET").is_ok_and(|secret| {
            if secret.is_empty() {
                false
            } else {
                session_settings.session_secret = secret;
                true
            }
        });

        if !env_secret_set && session_settings.session_secret.is_empty() {
            session_settings.session_secret = generate_secret();
            Self::warn_about_generated_secret();
        }
    }

    fn warn_about_generated_secret() {
        log::warn!("Using auto-generated session secret");
        log::warn!("For production use, set the SESSION_SECRET environment variable or configure session_secret in Settings.toml");
        log::warn!("Issued session cookies will become unreadable on restart unless the secret is configured");
    }

    fn apply_cookie_env_overrides(cookie_settings: &mut CookieSettings) {
        if let Ok(cookie_secure_str) = std::env::var("COOKIE_SECURE") {
            if let Ok(cookie_secure) = cookie_secure_str.parse::<bool>() {
                cookie_settings.secure = cookie_secure;
            }
        }
    }

    fn apply_logging_env_overrides(logging_settings: &mut LoggingSettings) {
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            logging_settings.level = log_level;
        }
    }

    /// Initialize `env_logger` with the configured filter, `RUST_LOG` syntax
    fn init_logger(logging_settings: &LoggingSettings) -> Result<(), log::SetLoggerError> {
        env_logger::Builder::new()
            .parse_filters(&logging_settings.level)
            .try_init()
    }

    /// Load environment variables from .env file
    fn load_env_file() {
        if let Ok(contents) = std::fs::read_to_string(".env") {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    std::env::set_var(key.trim(), value.trim());
                }
            }
        }
    }

    /// Get the bind address for the server
    #[must_use]
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }

    /// Get CORS origins as a vector of strings
    #[must_use]
    pub fn get_cors_origins(&self) -> Vec<String> {
        self.application
            .cors_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}
