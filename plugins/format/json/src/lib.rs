//! JSON text serializer for [`AuditEvent`].
//!
//! The registry schema is fetched on every call (so an unknown name fails
//! the same way as for Avro) but the payload is not validated against it.

use std::future::Future;
use std::pin::Pin;

use serde::Deserialize;

use registry_api::{AuditEvent, AuditSerializer, DataFormat, RegistryError, SchemaRegistry};

/// Output keys are `eventId`, `eventName`, `timestamp`, `eventDetails`, in that order.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl JsonSerializer {
    async fn encode(
        &self,
        registry: &dyn SchemaRegistry,
        schema_name: &str,
        event: &AuditEvent,
    ) -> Result<Vec<u8>, RegistryError> {
        fetch_schema(registry, schema_name).await?;
        let bytes = serde_json::to_vec(event)?;
        tracing::debug!(schema = %schema_name, bytes = bytes.len(), "json encoded");
        Ok(bytes)
    }

    async fn decode(
        &self,
        registry: &dyn SchemaRegistry,
        schema_name: &str,
        data: &[u8],
    ) -> Result<AuditEvent, RegistryError> {
        fetch_schema(registry, schema_name).await?;
        let text = std::str::from_utf8(data)?;
        let value: serde_json::Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(RegistryError::serialization(format!(
                "json: expected object, got {}",
                json_kind(&value)
            )));
        }
        let lenient: LenientEvent = serde_json::from_value(value)?;
        lenient.into_event()
    }
}

async fn fetch_schema(registry: &dyn SchemaRegistry, schema_name: &str) -> Result<(), RegistryError> {
    let definition = registry.fetch_latest_schema(schema_name).await?;
    if definition.data_format != DataFormat::Json {
        tracing::debug!(
            schema = %schema_name,
            format = %definition.data_format,
            "schema is not tagged JSON, continuing"
        );
    }
    Ok(())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Decode side: absent or null keys fall back to `""` / `0`, unknown keys
/// are ignored.
#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LenientEvent {
    event_id: Option<String>,
    event_name: Option<String>,
    timestamp: Option<i64>,
    event_details: Option<String>,
}

impl LenientEvent {
    fn into_event(self) -> Result<AuditEvent, RegistryError> {
        AuditEvent::new(
            self.event_id.unwrap_or_default(),
            self.event_name.unwrap_or_default(),
            self.timestamp.unwrap_or_default(),
            self.event_details.unwrap_or_default(),
        )
    }
}

impl AuditSerializer for JsonSerializer {
    fn serialize<'a>(
        &'a self,
        registry: &'a dyn SchemaRegistry,
        schema_name: &'a str,
        event: &'a AuditEvent,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, RegistryError>> + Send + 'a>> {
        Box::pin(async move {
            self.encode(registry, schema_name, event)
                .await
                .map_err(|e| e.into_serialization().with_context(format!("json serialize '{schema_name}'")))
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
                .map_err(|e| e.into_serialization().with_context(format!("json deserialize '{schema_name}'")))
        })
    }

    fn format(&self) -> DataFormat {
        DataFormat::Json
    }
}
