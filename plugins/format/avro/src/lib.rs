//! Avro binary serializer for [`AuditEvent`](registry_api::AuditEvent).
//!
//! Writes one schemaless datum per event: no container header, no schema
//! fingerprint. Readers must fetch the same schema from the registry.

mod convert;
mod serializer;

pub use serializer::AvroSerializer;
