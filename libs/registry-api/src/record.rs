use serde::Serialize;

use crate::error::RegistryError;

// ═══════════════════════════════════════════════════════════════
//  Wire field names
// ═══════════════════════════════════════════════════════════════

pub const FIELD_EVENT_ID: &str = "eventId";
pub const FIELD_EVENT_NAME: &str = "eventName";
pub const FIELD_TIMESTAMP: &str = "timestamp";
pub const FIELD_EVENT_DETAILS: &str = "eventDetails";

// ═══════════════════════════════════════════════════════════════
//  AuditEvent
// ═══════════════════════════════════════════════════════════════

/// Audit event: the single record type carried by both serializers.
///
/// Immutable: fields are private and only readable through accessors.
/// `timestamp >= 0` is checked once in [`AuditEvent::new`]; every decoder
/// goes through the same constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    event_id: String,
    event_name: String,
    /// Milliseconds since epoch.
    timestamp: i64,
    event_details: String,
}

impl AuditEvent {
    pub fn new(
        event_id: impl Into<String>,
        event_name: impl Into<String>,
        timestamp: i64,
        event_details: impl Into<String>,
    ) -> Result<Self, RegistryError> {
        if timestamp < 0 {
            return Err(RegistryError::InvalidRecord(format!(
                "timestamp must be non-negative, got {timestamp}"
            )));
        }
        Ok(Self {
            event_id: event_id.into(),
            event_name: event_name.into(),
            timestamp,
            event_details: event_details.into(),
        })
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn event_details(&self) -> &str {
        &self.event_details
    }
}
