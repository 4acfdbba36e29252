//! AWS Glue Schema Registry backend.
//!
//! Thin pass-through over `aws-sdk-glue`: every remote failure becomes
//! [`RegistryError::Unavailable`] carrying the SDK error context. Nothing is
//! cached; each fetch is one `GetSchemaVersion` call.

use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::time::Duration;

use aws_config::BehaviorVersion;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_glue::Client;
use aws_sdk_glue::error::DisplayErrorContext;
use aws_sdk_glue::types::{self as glue, RegistryId, SchemaId, SchemaVersionNumber};

use registry_api::{
    Compatibility, DataFormat, RegisteredVersion, RegistryConfig, RegistryError, SchemaDefinition,
    SchemaInfo, SchemaRegistry, SchemaSummary,
};

const CREDENTIALS_PROVIDER: &str = "registry-config";

// ═══════════════════════════════════════════════════════════════
//  GlueRegistry
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct GlueRegistry {
    client: Client,
    registry_name: String,
}

impl GlueRegistry {
    /// Build an SDK client from `config`.
    ///
    /// Static credentials override the default provider chain; the endpoint
    /// override is applied on the service config so it also works for
    /// LocalStack-style emulators.
    pub async fn connect(config: &RegistryConfig) -> Result<Self, RegistryError> {
        config.validate()?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()));

        if let Some(creds) = &config.credentials {
            let creds = aws_sdk_glue::config::Credentials::new(
                &creds.access_key_id,
                &creds.secret_access_key,
                creds.session_token.clone(),
                None,
                CREDENTIALS_PROVIDER,
            );
            loader = loader.credentials_provider(creds);
        }

        if let Some(timeouts) = timeout_config(config) {
            loader = loader.timeout_config(timeouts);
        }

        let sdk_config = loader.load().await;
        let mut glue_config = aws_sdk_glue::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.endpoint_url {
            glue_config = glue_config.endpoint_url(endpoint);
        }

        tracing::debug!(
            registry = %config.registry_name,
            region = %config.region,
            endpoint = ?config.endpoint_url,
            "glue client configured"
        );
        Ok(Self::from_client(
            Client::from_conf(glue_config.build()),
            config.registry_name.clone(),
        ))
    }

    pub fn from_client(client: Client, registry_name: impl Into<String>) -> Self {
        Self {
            client,
            registry_name: registry_name.into(),
        }
    }

    pub fn registry_name(&self) -> &str {
        &self.registry_name
    }

    fn schema_id(&self, schema_name: &str) -> SchemaId {
        SchemaId::builder()
            .registry_name(&self.registry_name)
            .schema_name(schema_name)
            .build()
    }

    fn registry_id(&self) -> RegistryId {
        RegistryId::builder().registry_name(&self.registry_name).build()
    }

    // ═══════════════════════════════════════════════════════════════
    //  Admin operations
    // ═══════════════════════════════════════════════════════════════

    pub async fn create_schema(
        &self,
        schema_name: &str,
        data_format: DataFormat,
        definition: &str,
        compatibility: Compatibility,
    ) -> Result<SchemaInfo, RegistryError> {
        let out = self
            .client
            .create_schema()
            .registry_id(self.registry_id())
            .schema_name(schema_name)
            .data_format(glue_data_format(data_format))
            .compatibility(glue_compatibility(compatibility))
            .schema_definition(definition)
            .send()
            .await
            .map_err(|e| sdk_error("CreateSchema", schema_name, e))?;

        tracing::info!(
            registry = %self.registry_name,
            schema = %schema_name,
            format = %data_format,
            %compatibility,
            "created schema"
        );
        Ok(SchemaInfo {
            schema_name: out.schema_name().unwrap_or(schema_name).to_string(),
            registry_name: out.registry_name().unwrap_or(&self.registry_name).to_string(),
            data_format: out.data_format().and_then(from_glue_data_format),
            compatibility: out.compatibility().and_then(from_glue_compatibility),
            description: out.description().map(str::to_string),
            latest_version: out.latest_schema_version(),
            status: out.schema_status().map(|s| s.as_str().to_string()),
        })
    }

    pub async fn get_schema(&self, schema_name: &str) -> Result<SchemaInfo, RegistryError> {
        let out = self
            .client
            .get_schema()
            .schema_id(self.schema_id(schema_name))
            .send()
            .await
            .map_err(|e| sdk_error("GetSchema", schema_name, e))?;

        Ok(SchemaInfo {
            schema_name: out.schema_name().unwrap_or(schema_name).to_string(),
            registry_name: out.registry_name().unwrap_or(&self.registry_name).to_string(),
            data_format: out.data_format().and_then(from_glue_data_format),
            compatibility: out.compatibility().and_then(from_glue_compatibility),
            description: out.description().map(str::to_string),
            latest_version: out.latest_schema_version(),
            status: out.schema_status().map(|s| s.as_str().to_string()),
        })
    }

    pub async fn get_schema_version(
        &self,
        schema_name: &str,
        version: i64,
    ) -> Result<SchemaDefinition, RegistryError> {
        self.fetch_version(
            schema_name,
            SchemaVersionNumber::builder().version_number(version).build(),
        )
        .await
    }

    /// All schemas in the registry, following `NextToken` until exhausted.
    pub async fn list_schemas(&self) -> Result<Vec<SchemaSummary>, RegistryError> {
        let mut summaries = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let out = self
                .client
                .list_schemas()
                .registry_id(self.registry_id())
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| sdk_error("ListSchemas", &self.registry_name, e))?;

            summaries.extend(out.schemas().iter().map(|item| SchemaSummary {
                schema_name: item.schema_name().unwrap_or_default().to_string(),
                description: item.description().map(str::to_string),
                status: item.schema_status().map(|s| s.as_str().to_string()),
                updated_time: item.updated_time().map(str::to_string),
            }));

            match out.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }
        tracing::debug!(registry = %self.registry_name, count = summaries.len(), "listed schemas");
        Ok(summaries)
    }

    /// Change the compatibility mode. The current description is re-sent so
    /// the update does not clear it.
    pub async fn update_compatibility(
        &self,
        schema_name: &str,
        compatibility: Compatibility,
    ) -> Result<SchemaInfo, RegistryError> {
        let current = self.get_schema(schema_name).await?;
        self.client
            .update_schema()
            .schema_id(self.schema_id(schema_name))
            .compatibility(glue_compatibility(compatibility))
            .set_description(current.description.clone())
            .send()
            .await
            .map_err(|e| sdk_error("UpdateSchema", schema_name, e))?;

        tracing::info!(
            registry = %self.registry_name,
            schema = %schema_name,
            from = ?current.compatibility,
            to = %compatibility,
            "updated compatibility"
        );
        Ok(SchemaInfo {
            compatibility: Some(compatibility),
            ..current
        })
    }

    pub async fn register_schema_version(
        &self,
        schema_name: &str,
        definition: &str,
    ) -> Result<RegisteredVersion, RegistryError> {
        let out = self
            .client
            .register_schema_version()
            .schema_id(self.schema_id(schema_name))
            .schema_definition(definition)
            .send()
            .await
            .map_err(|e| sdk_error("RegisterSchemaVersion", schema_name, e))?;

        let registered = RegisteredVersion {
            schema_name: schema_name.to_string(),
            version: out.version_number(),
            version_id: out.schema_version_id().map(str::to_string),
            status: out.status().map(|s| s.as_str().to_string()),
        };
        tracing::info!(
            registry = %self.registry_name,
            schema = %schema_name,
            version = ?registered.version,
            status = ?registered.status,
            "registered schema version"
        );
        Ok(registered)
    }

    async fn fetch_version(
        &self,
        schema_name: &str,
        version: SchemaVersionNumber,
    ) -> Result<SchemaDefinition, RegistryError> {
        let out = self
            .client
            .get_schema_version()
            .schema_id(self.schema_id(schema_name))
            .schema_version_number(version)
            .send()
            .await
            .map_err(|e| sdk_error("GetSchemaVersion", schema_name, e))?;

        let definition = out.schema_definition().ok_or_else(|| {
            RegistryError::Unavailable(format!("schema '{schema_name}' returned no definition"))
        })?;
        let data_format = out
            .data_format()
            .and_then(from_glue_data_format)
            .ok_or_else(|| {
                RegistryError::Unavailable(format!(
                    "schema '{schema_name}' has unsupported data format {:?}",
                    out.data_format().map(|f| f.as_str())
                ))
            })?;

        let mut fetched = SchemaDefinition::new(schema_name, data_format, definition);
        if let Some(version) = out.version_number() {
            fetched = fetched.with_version(version);
        }
        Ok(fetched)
    }
}

impl SchemaRegistry for GlueRegistry {
    fn fetch_latest_schema<'a>(
        &'a self,
        schema_name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<SchemaDefinition, RegistryError>> + Send + 'a>> {
        Box::pin(async move {
            let latest = SchemaVersionNumber::builder().latest_version(true).build();
            let fetched = self.fetch_version(schema_name, latest).await?;
            tracing::debug!(
                registry = %self.registry_name,
                schema = %schema_name,
                version = ?fetched.version,
                format = %fetched.data_format,
                "fetched latest schema"
            );
            Ok(fetched)
        })
    }
}

// ═══════════════════════════════════════════════════════════════
//  Conversions
// ═══════════════════════════════════════════════════════════════

fn timeout_config(config: &RegistryConfig) -> Option<TimeoutConfig> {
    if config.connect_timeout_ms.is_none() && config.read_timeout_ms.is_none() {
        return None;
    }
    let mut builder = TimeoutConfig::builder();
    if let Some(ms) = config.connect_timeout_ms {
        builder = builder.connect_timeout(Duration::from_millis(ms));
    }
    if let Some(ms) = config.read_timeout_ms {
        builder = builder.read_timeout(Duration::from_millis(ms));
    }
    Some(builder.build())
}

fn sdk_error<E>(operation: &str, target: &str, err: E) -> RegistryError
where
    E: std::error::Error,
{
    let err = RegistryError::unavailable(format!(
        "{operation} '{target}': {}",
        DisplayErrorContext(&err)
    ));
    tracing::warn!(operation, target, error = %err, "glue call failed");
    err
}

fn glue_data_format(format: DataFormat) -> glue::DataFormat {
    glue::DataFormat::from(format.as_str())
}

fn from_glue_data_format(format: &glue::DataFormat) -> Option<DataFormat> {
    DataFormat::from_str(format.as_str()).ok()
}

fn glue_compatibility(compatibility: Compatibility) -> glue::Compatibility {
    glue::Compatibility::from(compatibility.as_str())
}

fn from_glue_compatibility(compatibility: &glue::Compatibility) -> Option<Compatibility> {
    Compatibility::from_str(compatibility.as_str()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_registry() -> GlueRegistry {
        let config = aws_sdk_glue::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(aws_config::Region::new("us-east-1"))
            .build();
        GlueRegistry::from_client(Client::from_conf(config), "audit-registry")
    }

    #[test]
    fn schema_id_carries_registry_and_name() {
        let registry = offline_registry();
        assert_eq!(registry.registry_name(), "audit-registry");
        let id = registry.schema_id("SalesforceAudit");
        assert_eq!(id.registry_name(), Some("audit-registry"));
        assert_eq!(id.schema_name(), Some("SalesforceAudit"));
        assert_eq!(registry.registry_id().registry_name(), Some("audit-registry"));
    }

    #[test]
    fn data_format_maps_both_ways() {
        for format in [DataFormat::Avro, DataFormat::Json, DataFormat::Protobuf] {
            let glue_format = glue_data_format(format);
            assert_eq!(glue_format.as_str(), format.as_str());
            assert_eq!(from_glue_data_format(&glue_format), Some(format));
        }
        assert_eq!(glue_data_format(DataFormat::Avro), glue::DataFormat::Avro);
    }

    #[test]
    fn compatibility_maps_both_ways() {
        for mode in Compatibility::ALL {
            let glue_mode = glue_compatibility(mode);
            assert_eq!(glue_mode.as_str(), mode.as_str());
            assert_eq!(from_glue_compatibility(&glue_mode), Some(mode));
        }
        assert_eq!(glue_compatibility(Compatibility::BackwardAll), glue::Compatibility::BackwardAll);
    }

    #[test]
    fn unknown_glue_values_map_to_none() {
        assert_eq!(from_glue_data_format(&glue::DataFormat::from("THRIFT")), None);
        assert_eq!(from_glue_compatibility(&glue::Compatibility::from("SOMETIMES")), None);
    }

    #[test]
    fn timeouts_only_when_configured() {
        assert!(timeout_config(&RegistryConfig::default()).is_none());

        let config = RegistryConfig {
            connect_timeout_ms: Some(1500),
            read_timeout_ms: Some(5000),
            ..RegistryConfig::default()
        };
        let timeouts = timeout_config(&config).unwrap();
        assert_eq!(timeouts.connect_timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(timeouts.read_timeout(), Some(Duration::from_millis(5000)));
    }

    #[tokio::test]
    async fn connect_rejects_invalid_config() {
        let config = RegistryConfig {
            registry_name: String::new(),
            ..RegistryConfig::default()
        };
        let err = GlueRegistry::connect(&config).await.unwrap_err();
        assert!(matches!(err, RegistryError::Config(_)));
    }

    #[tokio::test]
    #[ignore = "requires AWS credentials and an existing registry"]
    async fn fetch_latest_from_aws() {
        let config = RegistryConfig::default().apply_env();
        let registry = GlueRegistry::connect(&config).await.unwrap();
        let schema = registry.fetch_latest_schema(&config.schemas.avro).await.unwrap();
        assert_eq!(schema.data_format, DataFormat::Avro);
        assert!(schema.version.is_some());
    }
}
