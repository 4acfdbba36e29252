use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use tokio::sync::RwLock;

use registry_api::{
    Compatibility, DataFormat, RegisteredVersion, RegistryError, SchemaDefinition, SchemaInfo,
    SchemaRegistry, SchemaSummary,
};

// ═══════════════════════════════════════════════════════════════
//  Stored schema
// ═══════════════════════════════════════════════════════════════

struct StoredSchema {
    data_format: DataFormat,
    compatibility: Compatibility,
    description: Option<String>,
    /// Definitions by version; version N lives at index N-1.
    versions: Vec<String>,
}

impl StoredSchema {
    fn latest_version(&self) -> i64 {
        self.versions.len() as i64
    }
}

// ═══════════════════════════════════════════════════════════════
//  MemoryRegistry
// ═══════════════════════════════════════════════════════════════

/// In-process registry with the same surface as the Glue backend.
///
/// For tests and offline runs. Compatibility modes are stored and
/// reported, never enforced.
pub struct MemoryRegistry {
    registry_name: String,
    schemas: RwLock<BTreeMap<String, StoredSchema>>,
}

impl Default for MemoryRegistry {
    fn default() -> Self {
        Self::new("memory-registry")
    }
}

impl MemoryRegistry {
    pub fn new(registry_name: impl Into<String>) -> Self {
        Self {
            registry_name: registry_name.into(),
            schemas: RwLock::new(BTreeMap::new()),
        }
    }

    /// Builder-style setup: add `schema_name` with version 1 = `definition`.
    /// Replaces any schema of the same name.
    pub fn with_schema(
        mut self,
        schema_name: impl Into<String>,
        data_format: DataFormat,
        definition: impl Into<String>,
    ) -> Self {
        self.schemas.get_mut().insert(
            schema_name.into(),
            StoredSchema {
                data_format,
                compatibility: Compatibility::default(),
                description: None,
                versions: vec![definition.into()],
            },
        );
        self
    }

    pub fn registry_name(&self) -> &str {
        &self.registry_name
    }

    pub async fn create_schema(
        &self,
        schema_name: &str,
        data_format: DataFormat,
        definition: &str,
        compatibility: Compatibility,
    ) -> Result<SchemaInfo, RegistryError> {
        let mut schemas = self.schemas.write().await;
        if schemas.contains_key(schema_name) {
            return Err(RegistryError::Unavailable(format!(
                "schema '{schema_name}' already exists in '{}'",
                self.registry_name
            )));
        }
        let stored = StoredSchema {
            data_format,
            compatibility,
            description: None,
            versions: vec![definition.to_string()],
        };
        let info = self.info(schema_name, &stored);
        schemas.insert(schema_name.to_string(), stored);
        tracing::info!(schema = %schema_name, format = %data_format, "created schema");
        Ok(info)
    }

    pub async fn get_schema(&self, schema_name: &str) -> Result<SchemaInfo, RegistryError> {
        let schemas = self.schemas.read().await;
        let stored = self.lookup(&schemas, schema_name)?;
        Ok(self.info(schema_name, stored))
    }

    pub async fn get_schema_version(
        &self,
        schema_name: &str,
        version: i64,
    ) -> Result<SchemaDefinition, RegistryError> {
        let schemas = self.schemas.read().await;
        let stored = self.lookup(&schemas, schema_name)?;
        let definition = version
            .checked_sub(1)
            .and_then(|idx| usize::try_from(idx).ok())
            .and_then(|idx| stored.versions.get(idx))
            .ok_or_else(|| {
                RegistryError::Unavailable(format!(
                    "schema '{schema_name}' has no version {version}"
                ))
            })?;
        Ok(SchemaDefinition::new(schema_name, stored.data_format, definition.as_str())
            .with_version(version))
    }

    pub async fn list_schemas(&self) -> Result<Vec<SchemaSummary>, RegistryError> {
        let schemas = self.schemas.read().await;
        Ok(schemas
            .iter()
            .map(|(name, stored)| SchemaSummary {
                schema_name: name.clone(),
                description: stored.description.clone(),
                status: Some("AVAILABLE".into()),
                updated_time: None,
            })
            .collect())
    }

    pub async fn update_compatibility(
        &self,
        schema_name: &str,
        compatibility: Compatibility,
    ) -> Result<SchemaInfo, RegistryError> {
        let mut schemas = self.schemas.write().await;
        let stored = schemas.get_mut(schema_name).ok_or_else(|| self.not_found(schema_name))?;
        stored.compatibility = compatibility;
        tracing::info!(schema = %schema_name, %compatibility, "updated compatibility");
        Ok(self.info(schema_name, stored))
    }

    pub async fn register_schema_version(
        &self,
        schema_name: &str,
        definition: &str,
    ) -> Result<RegisteredVersion, RegistryError> {
        let mut schemas = self.schemas.write().await;
        let stored = schemas.get_mut(schema_name).ok_or_else(|| self.not_found(schema_name))?;
        stored.versions.push(definition.to_string());
        let version = stored.latest_version();
        tracing::info!(schema = %schema_name, version, "registered schema version");
        Ok(RegisteredVersion {
            schema_name: schema_name.to_string(),
            version: Some(version),
            version_id: Some(format!("{schema_name}:{version}")),
            status: Some("AVAILABLE".into()),
        })
    }

    fn lookup<'m>(
        &self,
        schemas: &'m BTreeMap<String, StoredSchema>,
        schema_name: &str,
    ) -> Result<&'m StoredSchema, RegistryError> {
        schemas.get(schema_name).ok_or_else(|| self.not_found(schema_name))
    }

    fn not_found(&self, schema_name: &str) -> RegistryError {
        RegistryError::Unavailable(format!(
            "schema '{schema_name}' not found in '{}'",
            self.registry_name
        ))
    }

    fn info(&self, schema_name: &str, stored: &StoredSchema) -> SchemaInfo {
        SchemaInfo {
            schema_name: schema_name.to_string(),
            registry_name: self.registry_name.clone(),
            data_format: Some(stored.data_format),
            compatibility: Some(stored.compatibility),
            description: stored.description.clone(),
            latest_version: Some(stored.latest_version()),
            status: Some("AVAILABLE".into()),
        }
    }
}

impl SchemaRegistry for MemoryRegistry {
    fn fetch_latest_schema<'a>(
        &'a self,
        schema_name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<SchemaDefinition, RegistryError>> + Send + 'a>> {
        Box::pin(async move {
            let schemas = self.schemas.read().await;
            let stored = self.lookup(&schemas, schema_name)?;
            let version = stored.latest_version();
            let definition = stored.versions.last().cloned().unwrap_or_default();
            tracing::debug!(schema = %schema_name, version, "fetched latest schema");
            Ok(SchemaDefinition::new(schema_name, stored.data_format, definition)
                .with_version(version))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AVSC: &str = r#"{"type":"record","name":"A","fields":[]}"#;

    #[tokio::test]
    async fn fetch_latest_returns_newest_version() {
        let registry = MemoryRegistry::default().with_schema("Audit", DataFormat::Avro, AVSC);
        registry.register_schema_version("Audit", "v2").await.unwrap();

        let latest = registry.fetch_latest_schema("Audit").await.unwrap();
        assert_eq!(latest.definition, "v2");
        assert_eq!(latest.version, Some(2));
        assert_eq!(latest.data_format, DataFormat::Avro);

        let first = registry.get_schema_version("Audit", 1).await.unwrap();
        assert_eq!(first.definition, AVSC);
    }

    #[test]
    fn default_registry_name() {
        assert_eq!(MemoryRegistry::default().registry_name(), "memory-registry");
    }

    #[tokio::test]
    async fn unknown_schema_is_unavailable() {
        let registry = MemoryRegistry::default();
        let err = registry.fetch_latest_schema("Missing").await.unwrap_err();
        assert!(matches!(err, RegistryError::Unavailable(_)));
        assert!(err.to_string().contains("Missing"));
    }

    #[tokio::test]
    async fn missing_version_is_unavailable() {
        let registry = MemoryRegistry::default().with_schema("Audit", DataFormat::Json, "{}");
        for version in [0, 2, -1] {
            let err = registry.get_schema_version("Audit", version).await.unwrap_err();
            assert!(matches!(err, RegistryError::Unavailable(_)));
        }
    }

    #[tokio::test]
    async fn create_rejects_duplicates() {
        let registry = MemoryRegistry::new("r");
        assert_eq!(registry.registry_name(), "r");
        let info = registry
            .create_schema("Audit", DataFormat::Json, "{}", Compatibility::Full)
            .await
            .unwrap();
        assert_eq!(info.latest_version, Some(1));
        assert_eq!(info.compatibility, Some(Compatibility::Full));
        assert_eq!(info.registry_name, "r");

        let err = registry
            .create_schema("Audit", DataFormat::Json, "{}", Compatibility::Full)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Unavailable(_)));
    }

    #[tokio::test]
    async fn update_compatibility_is_recorded() {
        let registry = MemoryRegistry::default().with_schema("Audit", DataFormat::Avro, AVSC);
        let info = registry.update_compatibility("Audit", Compatibility::None).await.unwrap();
        assert_eq!(info.compatibility, Some(Compatibility::None));
        let info = registry.get_schema("Audit").await.unwrap();
        assert_eq!(info.compatibility, Some(Compatibility::None));
    }

    #[tokio::test]
    async fn list_is_sorted_by_name() {
        let registry = MemoryRegistry::default()
            .with_schema("b", DataFormat::Json, "{}")
            .with_schema("a", DataFormat::Avro, AVSC);
        let names: Vec<_> = registry
            .list_schemas()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.schema_name)
            .collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[tokio::test]
    async fn register_on_unknown_schema_fails() {
        let registry = MemoryRegistry::default();
        assert!(registry.register_schema_version("nope", "{}").await.is_err());
        assert!(registry.update_compatibility("nope", Compatibility::Full).await.is_err());
    }
}
