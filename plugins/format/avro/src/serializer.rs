use std::future::Future;
use std::pin::Pin;

use apache_avro::Schema;
use registry_api::{AuditEvent, AuditSerializer, DataFormat, RegistryError, SchemaRegistry};

use super::convert::{avro_to_event, event_to_avro};

// ═══════════════════════════════════════════════════════════════
//  AvroSerializer
// ═══════════════════════════════════════════════════════════════

/// `AuditEvent ↔ Avro` datum, schema fetched from the registry per call.
///
/// Stateless: one instance can serve any number of schemas and callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvroSerializer;

impl AvroSerializer {
    async fn encode(
        &self,
        registry: &dyn SchemaRegistry,
        schema_name: &str,
        event: &AuditEvent,
    ) -> Result<Vec<u8>, RegistryError> {
        let schema = fetch_schema(registry, schema_name).await?;
        let value = event_to_avro(event, &schema)?;
        let bytes = apache_avro::to_avro_datum(&schema, value)
            .map_err(|e| RegistryError::serialization(format!("avro encode: {e}")))?;
        tracing::debug!(schema = %schema_name, bytes = bytes.len(), "avro encoded");
        Ok(bytes)
    }

    async fn decode(
        &self,
        registry: &dyn SchemaRegistry,
        schema_name: &str,
        data: &[u8],
    ) -> Result<AuditEvent, RegistryError> {
        let schema = fetch_schema(registry, schema_name).await?;
        let mut reader = data;
        let value = apache_avro::from_avro_datum(&schema, &mut reader, None)
            .map_err(|e| RegistryError::serialization(format!("avro decode: {e}")))?;
        if !reader.is_empty() {
            return Err(RegistryError::serialization(format!(
                "avro decode: {} trailing bytes after datum",
                reader.len()
            )));
        }
        avro_to_event(value)
    }
}

async fn fetch_schema(registry: &dyn SchemaRegistry, schema_name: &str) -> Result<Schema, RegistryError> {
    let definition = registry.fetch_latest_schema(schema_name).await?;
    if definition.data_format != DataFormat::Avro {
        tracing::debug!(
            schema = %schema_name,
            format = %definition.data_format,
            "schema is not tagged AVRO, parsing anyway"
        );
    }
    Schema::parse_str(&definition.definition)
        .map_err(|e| RegistryError::serialization(format!("avro: failed to parse schema: {e}")))
}

impl AuditSerializer for AvroSerializer {
    fn serialize<'a>(
        &'a self,
        registry: &'a dyn SchemaRegistry,
        schema_name: &'a str,
        event: &'a AuditEvent,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, RegistryError>> + Send + 'a>> {
        Box::pin(async move {
            self.encode(registry, schema_name, event)
                .await
                .map_err(|e| e.into_serialization().with_context(format!("avro serialize '{schema_name}'")))
        })
    }

    fn deserialize<'a>(
        &'a self,
        registry: &'a dyn SchemaRegistry,
        schema_name: &'a str,
        data: &'a [u8],
    ) -> Pin<Box<dyn Future<Output = Result<AuditEvent, RegistryError>> + Send + 'a>> {
        Box::pin(async move {
            self.decode(registry, schema_name, data)
                .await
                .map_err(|e| e.into_serialization().with_context(format!("avro deserialize '{schema_name}'")))
        })
    }

    fn format(&self) -> DataFormat {
        DataFormat::Avro
    }
}
