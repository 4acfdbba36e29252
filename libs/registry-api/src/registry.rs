use std::future::Future;
use std::pin::Pin;

use crate::error::RegistryError;
use crate::record::AuditEvent;
use crate::schema::{DataFormat, SchemaDefinition};

/// Registry access: "give me the current definition for this schema name".
///
/// The only registry call on the serialization path. Implementations must
/// not mutate registry state and report every failure (network, auth,
/// unknown name) as [`RegistryError::Unavailable`].
pub trait SchemaRegistry: Send + Sync {
    fn fetch_latest_schema<'a>(
        &'a self,
        schema_name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<SchemaDefinition, RegistryError>> + Send + 'a>>;
}

/// Serializer contract: `AuditEvent ↔ bytes`, driven by a registry schema.
///
/// Implementations are stateless; each call fetches the schema by name,
/// then encodes or decodes. Every failure (fetch included) surfaces as
/// [`RegistryError::SerializationFailed`] and no partial record is returned.
pub trait AuditSerializer: Send + Sync {
    fn serialize<'a>(
        &'a self,
        registry: &'a dyn SchemaRegistry,
        schema_name: &'a str,
        event: &'a AuditEvent,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, RegistryError>> + Send + 'a>>;

    fn deserialize<'a>(
        &'a self,
        registry: &'a dyn SchemaRegistry,
        schema_name: &'a str,
        data: &'a [u8],
    ) -> Pin<Box<dyn Future<Output = Result<AuditEvent, RegistryError>> + Send + 'a>>;

    /// Wire format produced by this serializer.
    fn format(&self) -> DataFormat;
}

impl<T: SchemaRegistry + ?Sized> SchemaRegistry for std::sync::Arc<T> {
    fn fetch_latest_schema<'a>(
        &'a self,
        schema_name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<SchemaDefinition, RegistryError>> + Send + 'a>> {
        (**self).fetch_latest_schema(schema_name)
    }
}
