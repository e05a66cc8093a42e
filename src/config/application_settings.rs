use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::config_spec::ConfigSpec;
use crate::config::errors::ApplicationError;
use crate::config::{EnvironmentProvider, SystemEnvironment};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://docreview.db?mode=rwc";
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;
pub const DEFAULT_ALLOWED_EXTENSIONS: &str = "pdf,doc,docx,txt,md,xls,xlsx,ppt,pptx";
pub const DEFAULT_SESSION_TTL_HOURS: u64 = 24;

/// Infrastructure and upload settings, loaded once at startup
#[derive(Clone)]
pub struct ApplicationSettings {
    database_url: String,
    server_host: String,
    server_port: u16,
    upload_dir: PathBuf,
    max_upload_bytes: u64,
    allowed_extensions: Vec<String>,
    session_ttl_hours: u64,
}

impl ApplicationSettings {
    pub fn from_env_provider(
        env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    ) -> Result<Self, ApplicationError> {
        let database_url = ConfigSpec::new(env_provider.clone())
            .env_override("DATABASE_URL")
            .default_value(DEFAULT_DATABASE_URL)
            .min_length(1)
            .load()?
            .value;

        let server_host = ConfigSpec::new(env_provider.clone())
            .env_override("HOST")
            .default_value("0.0.0.0")
            .validator(ConfigSpec::validate_host_address)
            .load()?
            .value;

        let port_value = ConfigSpec::new(env_provider.clone())
            .env_override("PORT")
            .default_value("3000")
            .load()?
            .value;
        let server_port = ConfigSpec::parse_port(&port_value, "PORT")?;

        let upload_dir = ConfigSpec::new(env_provider.clone())
            .env_override("UPLOAD_DIR")
            .default_value("uploads")
            .min_length(1)
            .load()?
            .value;

        let max_upload_value = ConfigSpec::new(env_provider.clone())
            .env_override("MAX_UPLOAD_BYTES")
            .default_value(&DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .load()?
            .value;
        let max_upload_bytes = ConfigSpec::parse_positive_u64(&max_upload_value, "MAX_UPLOAD_BYTES")?;

        let extensions_value = ConfigSpec::new(env_provider.clone())
            .env_override("ALLOWED_EXTENSIONS")
            .default_value(DEFAULT_ALLOWED_EXTENSIONS)
            .load()?
            .value;
        let allowed_extensions = ConfigSpec::parse_list(&extensions_value);
        if allowed_extensions.is_empty() {
            return Err(ApplicationError::InvalidSetting {
                setting_name: "ALLOWED_EXTENSIONS".to_string(),
                reason: "At least one extension must be allowed".to_string(),
            });
        }

        let ttl_value = ConfigSpec::new(env_provider)
            .env_override("SESSION_TTL_HOURS")
            .default_value(&DEFAULT_SESSION_TTL_HOURS.to_string())
            .load()?
            .value;
        let session_ttl_hours = ConfigSpec::parse_positive_u64(&ttl_value, "SESSION_TTL_HOURS")?;

        Ok(Self {
            database_url,
            server_host,
            server_port,
            upload_dir: PathBuf::from(upload_dir),
            max_upload_bytes,
            allowed_extensions,
            session_ttl_hours,
        })
    }

    pub fn from_env() -> Result<Self, ApplicationError> {
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    /// Settings with defaults for everything except the database and upload directory
    pub fn new(database_url: &str, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            database_url: database_url.to_string(),
            server_host: "127.0.0.1".to_string(),
            server_port: 3000,
            upload_dir: upload_dir.into(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_extensions: ConfigSpec::parse_list(DEFAULT_ALLOWED_EXTENSIONS),
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: u64) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    pub fn with_session_ttl_hours(mut self, hours: u64) -> Self {
        self.session_ttl_hours = hours;
        self
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    /// Request body limit for the HTTP layer: the file plus 1 MiB of form overhead
    pub fn max_request_bytes(&self) -> usize {
        usize::try_from(self.max_upload_bytes.saturating_add(1024 * 1024)).unwrap_or(usize::MAX)
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    pub fn session_ttl_seconds(&self) -> i64 {
        i64::try_from(self.session_ttl_hours.saturating_mul(3600)).unwrap_or(i64::MAX)
    }
}

impl fmt::Debug for ApplicationSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationSettings")
            .field("database_url", &self.database_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("upload_dir", &self.upload_dir)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("allowed_extensions", &self.allowed_extensions)
            .field("session_ttl_hours", &self.session_ttl_hours)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    fn load(env: MockEnvironment) -> Result<ApplicationSettings, ApplicationError> {
        ApplicationSettings::from_env_provider(Arc::new(env))
    }

    #[test]
    fn test_defaults() {
        let settings = load(MockEnvironment::empty()).unwrap();

        assert_eq!(settings.database_url(), DEFAULT_DATABASE_URL);
        assert_eq!(settings.server_address(), "0.0.0.0:3000");
        assert_eq!(settings.upload_dir(), Path::new("uploads"));
        assert_eq!(settings.max_upload_bytes(), 16_777_216);
        assert_eq!(settings.session_ttl_seconds(), 24 * 3600);
        assert!(settings.allowed_extensions().contains(&"pdf".to_string()));
        assert!(settings.allowed_extensions().contains(&"pptx".to_string()));
    }

    #[test]
    fn test_env_overrides() {
        let env = MockEnvironment::empty().with_vars(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("UPLOAD_DIR", "/var/lib/docreview"),
            ("MAX_UPLOAD_BYTES", "1024"),
            ("ALLOWED_EXTENSIONS", "PDF, txt"),
            ("SESSION_TTL_HOURS", "2"),
        ]);
        let settings = load(env).unwrap();

        assert_eq!(settings.database_url(), "sqlite::memory:");
        assert_eq!(settings.server_address(), "127.0.0.1:8080");
        assert_eq!(settings.upload_dir(), Path::new("/var/lib/docreview"));
        assert_eq!(settings.max_upload_bytes(), 1024);
        assert_eq!(settings.max_request_bytes(), 1024 + 1024 * 1024);
        assert_eq!(settings.allowed_extensions(), &["pdf".to_string(), "txt".to_string()]);
        assert_eq!(settings.session_ttl_seconds(), 7200);
    }

    #[test]
    fn test_invalid_port() {
        let result = load(MockEnvironment::empty().with_var("PORT", "99999"));
        assert!(matches!(result, Err(ApplicationError::ParseError { .. })));
    }

    #[test]
    fn test_zero_upload_limit_rejected() {
        let result = load(MockEnvironment::empty().with_var("MAX_UPLOAD_BYTES", "0"));
        assert!(matches!(result, Err(ApplicationError::InvalidSetting { .. })));
    }

    #[test]
    fn test_empty_extension_list_rejected() {
        let result = load(MockEnvironment::empty().with_var("ALLOWED_EXTENSIONS", " , "));
        match result {
            Err(ApplicationError::InvalidSetting { setting_name, .. }) => {
                assert_eq!(setting_name, "ALLOWED_EXTENSIONS")
            }
            other => panic!("Expected InvalidSetting, got {:?}", other),
        }
    }
}
