use std::path::Path;

use serde::Deserialize;

use crate::error::RegistryError;
use crate::schema::DataFormat;

pub const ENV_REGISTRY_NAME: &str = "GLUE_REGISTRY_NAME";
pub const ENV_REGION: &str = "AWS_REGION";
pub const ENV_ENDPOINT_URL: &str = "GLUE_ENDPOINT_URL";
pub const ENV_SCHEMA_NAME_AVRO: &str = "SCHEMA_NAME_AVRO";
pub const ENV_SCHEMA_NAME_JSON: &str = "SCHEMA_NAME_JSON";

// ═══════════════════════════════════════════════════════════════
//  RegistryConfig
// ═══════════════════════════════════════════════════════════════

/// Root configuration, parsed from TOML and then overridden from env.
///
/// Built once at startup and handed to the registry backend and the
/// commands that need schema names. Precedence: env > file > defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Glue registry name.
    pub registry_name: String,
    /// AWS region of the registry.
    pub region: String,
    /// Endpoint override (LocalStack, VPC endpoint).
    pub endpoint_url: Option<String>,
    pub connect_timeout_ms: Option<u64>,
    pub read_timeout_ms: Option<u64>,
    /// Static credentials. When absent the SDK default chain is used.
    pub credentials: Option<Credentials>,
    /// Schema names used when a command does not name one.
    pub schemas: SchemaNames,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            registry_name: default_registry_name(),
            region: default_region(),
            endpoint_url: None,
            connect_timeout_ms: None,
            read_timeout_ms: None,
            credentials: None,
            schemas: SchemaNames::default(),
        }
    }
}

fn default_registry_name() -> String {
    "glue-schema-registry".into()
}

fn default_region() -> String {
    "us-east-1".into()
}

#[derive(Clone, PartialEq, Deserialize)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    #[serde(default)]
    pub session_token: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SchemaNames {
    pub avro: String,
    pub json: String,
}

impl Default for SchemaNames {
    fn default() -> Self {
        Self {
            avro: "SalesforceAudit".into(),
            json: "SalesAuditJSON".into(),
        }
    }
}

impl SchemaNames {
    pub fn for_format(&self, format: DataFormat) -> Option<&str> {
        match format {
            DataFormat::Avro => Some(&self.avro),
            DataFormat::Json => Some(&self.json),
            DataFormat::Protobuf => None,
        }
    }
}

impl RegistryConfig {
    /// Parse configuration from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, RegistryError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| RegistryError::Config(format!("{}: {e}", path.display())))?;
        Self::parse(&content).map_err(|e| e.with_context(path.display()))
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults.
    /// A file that exists and does not parse is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(self) -> Self {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Empty values are ignored.
    pub fn apply_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_REGISTRY_NAME) {
            self.registry_name = v;
        }
        if let Some(v) = get(ENV_REGION) {
            self.region = v;
        }
        if let Some(v) = get(ENV_ENDPOINT_URL) {
            self.endpoint_url = Some(v);
        }
        if let Some(v) = get(ENV_SCHEMA_NAME_AVRO) {
            self.schemas.avro = v;
        }
        if let Some(v) = get(ENV_SCHEMA_NAME_JSON) {
            self.schemas.json = v;
        }
        self
    }

    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.registry_name.trim().is_empty() {
            return Err(RegistryError::Config("registry_name is required".into()));
        }
        if self.region.trim().is_empty() {
            return Err(RegistryError::Config("region is required".into()));
        }
        if let Some(creds) = &self.credentials
            && (creds.access_key_id.is_empty() || creds.secret_access_key.is_empty())
        {
            return Err(RegistryError::Config(
                "credentials need both access_key_id and secret_access_key".into(),
            ));
        }
        Ok(())
    }

    /// File (optional) → env → validate. The startup entry point.
    pub fn resolve(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let config = Self::load_or_default(path)?.apply_env();
        config.validate()?;
        Ok(config)
    }
}
