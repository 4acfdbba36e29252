use apache_avro::Schema;
use apache_avro::schema::{RecordField, RecordSchema, SchemaKind};
use apache_avro::types::Value;
use registry_api::record::{FIELD_EVENT_DETAILS, FIELD_EVENT_ID, FIELD_EVENT_NAME, FIELD_TIMESTAMP};
use registry_api::{AuditEvent, RegistryError};

fn record_schema(schema: &Schema) -> Result<&RecordSchema, RegistryError> {
    match schema {
        Schema::Record(record) => Ok(record),
        other => Err(RegistryError::serialization(format!(
            "avro: top-level schema must be a record, got {:?}",
            SchemaKind::from(other)
        ))),
    }
}

// ═══════════════════════════════════════════════════════════════
//  AuditEvent → Avro
// ═══════════════════════════════════════════════════════════════

/// Build a record value in schema field order.
///
/// Mapped fields come from the event; any other schema field is filled from
/// its declared default, resolved against `root` so references to named
/// types declared elsewhere in the schema work.
pub(crate) fn event_to_avro(event: &AuditEvent, root: &Schema) -> Result<Value, RegistryError> {
    let record = record_schema(root)?;
    let mut fields = Vec::with_capacity(record.fields.len());
    for field in &record.fields {
        let value = match field.name.as_str() {
            FIELD_EVENT_ID => string_to_avro(event.event_id(), &field.schema),
            FIELD_EVENT_NAME => string_to_avro(event.event_name(), &field.schema),
            FIELD_TIMESTAMP => long_to_avro(event.timestamp(), &field.schema),
            FIELD_EVENT_DETAILS => string_to_avro(event.event_details(), &field.schema),
            _ => default_to_avro(field, root),
        }
        .map_err(|e| e.with_context(format!("avro: field '{}'", field.name)))?;
        fields.push((field.name.clone(), value));
    }
    Ok(Value::Record(fields))
}

fn string_to_avro(s: &str, schema: &Schema) -> Result<Value, RegistryError> {
    match schema {
        Schema::String => Ok(Value::String(s.to_string())),
        Schema::Union(union_schema) => union_variant(union_schema.variants(), |v| string_to_avro(s, v)),
        other => Err(type_mismatch("string", other)),
    }
}

fn long_to_avro(n: i64, schema: &Schema) -> Result<Value, RegistryError> {
    match schema {
        Schema::Long => Ok(Value::Long(n)),
        Schema::Int => i32::try_from(n)
            .map(Value::Int)
            .map_err(|_| RegistryError::serialization(format!("{n} does not fit an avro int"))),
        Schema::TimestampMillis => Ok(Value::TimestampMillis(n)),
        Schema::TimestampMicros => Ok(Value::TimestampMicros(n)),
        Schema::TimestampNanos => Ok(Value::TimestampNanos(n)),
        Schema::LocalTimestampMillis => Ok(Value::LocalTimestampMillis(n)),
        Schema::LocalTimestampMicros => Ok(Value::LocalTimestampMicros(n)),
        Schema::LocalTimestampNanos => Ok(Value::LocalTimestampNanos(n)),
        Schema::Union(union_schema) => union_variant(union_schema.variants(), |v| long_to_avro(n, v)),
        other => Err(type_mismatch("long", other)),
    }
}

/// First union branch that accepts the value wins.
fn union_variant<F>(variants: &[Schema], convert: F) -> Result<Value, RegistryError>
where
    F: Fn(&Schema) -> Result<Value, RegistryError>,
{
    for (idx, variant) in variants.iter().enumerate() {
        if let Ok(v) = convert(variant) {
            return Ok(Value::Union(idx as u32, Box::new(v)));
        }
    }
    Err(RegistryError::serialization("no union branch accepts the value"))
}

fn default_to_avro(field: &RecordField, root: &Schema) -> Result<Value, RegistryError> {
    let default = field
        .default
        .clone()
        .ok_or_else(|| RegistryError::serialization("not in the audit mapping and has no default"))?;
    Value::from(default)
        .resolve_schemata(&field.schema, vec![root])
        .map_err(|e| RegistryError::serialization(format!("default does not match schema: {e}")))
}

fn type_mismatch(expected: &str, schema: &Schema) -> RegistryError {
    RegistryError::serialization(format!(
        "expected {expected}-compatible schema, got {:?}",
        SchemaKind::from(schema)
    ))
}

// ═══════════════════════════════════════════════════════════════
//  Avro → AuditEvent
// ═══════════════════════════════════════════════════════════════

/// Rebuild an event from a decoded record. All four mapped fields must be
/// present; extra fields are ignored.
pub(crate) fn avro_to_event(value: Value) -> Result<AuditEvent, RegistryError> {
    let fields = match value {
        Value::Record(fields) => fields,
        other => {
            return Err(RegistryError::serialization(format!(
                "avro: expected record datum, got {:?}",
                SchemaKind::from(&other)
            )));
        }
    };

    let mut event_id = None;
    let mut event_name = None;
    let mut timestamp = None;
    let mut event_details = None;

    for (name, value) in fields {
        match name.as_str() {
            FIELD_EVENT_ID => event_id = Some(avro_to_string(value, &name)?),
            FIELD_EVENT_NAME => event_name = Some(avro_to_string(value, &name)?),
            FIELD_TIMESTAMP => timestamp = Some(avro_to_long(value, &name)?),
            FIELD_EVENT_DETAILS => event_details = Some(avro_to_string(value, &name)?),
            _ => {}
        }
    }

    AuditEvent::new(
        required(event_id, FIELD_EVENT_ID)?,
        required(event_name, FIELD_EVENT_NAME)?,
        required(timestamp, FIELD_TIMESTAMP)?,
        required(event_details, FIELD_EVENT_DETAILS)?,
    )
}

fn avro_to_string(value: Value, field: &str) -> Result<String, RegistryError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Union(_, inner) => avro_to_string(*inner, field),
        other => Err(RegistryError::serialization(format!(
            "avro: field '{field}' expected string, got {:?}",
            SchemaKind::from(&other)
        ))),
    }
}

fn avro_to_long(value: Value, field: &str) -> Result<i64, RegistryError> {
    match value {
        Value::Long(n)
        | Value::TimestampMillis(n)
        | Value::TimestampMicros(n)
        | Value::TimestampNanos(n)
        | Value::LocalTimestampMillis(n)
        | Value::LocalTimestampMicros(n)
        | Value::LocalTimestampNanos(n) => Ok(n),
        Value::Int(n) => Ok(i64::from(n)),
        Value::Union(_, inner) => avro_to_long(*inner, field),
        other => Err(RegistryError::serialization(format!(
            "avro: field '{field}' expected long, got {:?}",
            SchemaKind::from(&other)
        ))),
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, RegistryError> {
    value.ok_or_else(|| RegistryError::serialization(format!("avro: record has no field '{field}'")))
}
