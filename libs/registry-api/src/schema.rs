use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

// ════════════════════════════════════════════════════════════════
//  Data Format
// ════════════════════════════════════════════════════════════════

/// Declared data format of a registry schema (`DataFormat` tag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataFormat {
    Avro,
    Json,
    Protobuf,
}

impl DataFormat {
    /// Tag as the registry spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataFormat::Avro => "AVRO",
            DataFormat::Json => "JSON",
            DataFormat::Protobuf => "PROTOBUF",
        }
    }
}

impl std::fmt::Display for DataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataFormat {
    type Err = RegistryError;

    /// Case-insensitive: `avro`, `AVRO` and `Avro` are the same tag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AVRO" => Ok(DataFormat::Avro),
            "JSON" => Ok(DataFormat::Json),
            "PROTOBUF" => Ok(DataFormat::Protobuf),
            _ => Err(RegistryError::Config(format!("unknown data format '{s}'"))),
        }
    }
}

// ════════════════════════════════════════════════════════════════
//  Compatibility
// ════════════════════════════════════════════════════════════════

/// Registry-side compatibility mode. Recorded and passed through only,
/// never enforced on this side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Compatibility {
    #[default]
    Backward,
    BackwardAll,
    Disabled,
    Forward,
    ForwardAll,
    Full,
    FullAll,
    None,
}

impl Compatibility {
    pub const ALL: [Compatibility; 8] = [
        Compatibility::Backward,
        Compatibility::BackwardAll,
        Compatibility::Disabled,
        Compatibility::Forward,
        Compatibility::ForwardAll,
        Compatibility::Full,
        Compatibility::FullAll,
        Compatibility::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Compatibility::Backward => "BACKWARD",
            Compatibility::BackwardAll => "BACKWARD_ALL",
            Compatibility::Disabled => "DISABLED",
            Compatibility::Forward => "FORWARD",
            Compatibility::ForwardAll => "FORWARD_ALL",
            Compatibility::Full => "FULL",
            Compatibility::FullAll => "FULL_ALL",
            Compatibility::None => "NONE",
        }
    }
}

impl std::fmt::Display for Compatibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Compatibility {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase().replace('-', "_");
        Compatibility::ALL
            .into_iter()
            .find(|c| c.as_str() == upper)
            .ok_or_else(|| RegistryError::Config(format!("unknown compatibility mode '{s}'")))
    }
}

// ════════════════════════════════════════════════════════════════
//  Schema definition & registry views
// ════════════════════════════════════════════════════════════════

/// One schema version as fetched from the registry.
///
/// Transient: fetched per serialize/deserialize call and dropped after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDefinition {
    pub schema_name: String,
    /// Version number, when the backend reports one.
    pub version: Option<i64>,
    pub data_format: DataFormat,
    /// Raw definition text (Avro `.avsc` JSON, JSON Schema, ...).
    pub definition: String,
}

impl SchemaDefinition {
    pub fn new(
        schema_name: impl Into<String>,
        data_format: DataFormat,
        definition: impl Into<String>,
    ) -> Self {
        Self {
            schema_name: schema_name.into(),
            version: None,
            data_format,
            definition: definition.into(),
        }
    }

    pub fn with_version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self
    }
}

/// Schema metadata (`GetSchema` / `CreateSchema` / `UpdateSchema`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaInfo {
    pub schema_name: String,
    pub registry_name: String,
    pub data_format: Option<DataFormat>,
    pub compatibility: Option<Compatibility>,
    pub description: Option<String>,
    pub latest_version: Option<i64>,
    pub status: Option<String>,
}

/// Entry of a schema listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaSummary {
    pub schema_name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub updated_time: Option<String>,
}

/// Result of registering a new schema version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredVersion {
    pub schema_name: String,
    pub version: Option<i64>,
    pub version_id: Option<String>,
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_format_parses_any_case() {
        assert_eq!("avro".parse::<DataFormat>().unwrap(), DataFormat::Avro);
        assert_eq!("JSON".parse::<DataFormat>().unwrap(), DataFormat::Json);
        assert_eq!("Protobuf".parse::<DataFormat>().unwrap(), DataFormat::Protobuf);
        assert!("xml".parse::<DataFormat>().is_err());
    }

    #[test]
    fn compatibility_round_trips_through_str() {
        for mode in Compatibility::ALL {
            assert_eq!(mode.as_str().parse::<Compatibility>().unwrap(), mode);
        }
        assert_eq!("full-all".parse::<Compatibility>().unwrap(), Compatibility::FullAll);
        assert!("SOMETIMES".parse::<Compatibility>().is_err());
    }

    #[test]
    fn compatibility_serde_uses_registry_spelling() {
        let json = serde_json::to_string(&Compatibility::BackwardAll).unwrap();
        assert_eq!(json, "\"BACKWARD_ALL\"");
        let mode: Compatibility = serde_json::from_str("\"NONE\"").unwrap();
        assert_eq!(mode, Compatibility::None);
    }

    #[test]
    fn definition_with_version() {
        let def = SchemaDefinition::new("Audit", DataFormat::Avro, "{}").with_version(3);
        assert_eq!(def.version, Some(3));
        assert_eq!(def.data_format, DataFormat::Avro);
    }
}
