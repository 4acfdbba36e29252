pub mod config;
pub mod error;
pub mod record;
pub mod registry;
pub mod schema;

pub use config::{Credentials, RegistryConfig, SchemaNames};
pub use error::RegistryError;
pub use record::AuditEvent;
pub use registry::{AuditSerializer, SchemaRegistry};
pub use schema::{Compatibility, DataFormat, SchemaDefinition, SchemaInfo, SchemaSummary, RegisteredVersion};
