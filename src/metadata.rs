use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Identity of the service emitting the records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            name: "gedai".to_string(),
            version: "v1.0.0".to_string(),
        }
    }
}

/// Ownership annotations attached to every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamInfo {
    pub team: String,
    pub contact: String,
    pub handbook: String,
}

impl Default for TeamInfo {
    fn default() -> Self {
        Self {
            team: "team-gedai".to_string(),
            contact: "gedai-contact".to_string(),
            handbook: "http://handbook.io".to_string(),
        }
    }
}

/// Metadata computed once when a logger is built and embedded unchanged
/// into every record it emits.
///
/// Both objects are serialized with sorted keys. `Attributes.time` is the
/// capture instant, not the emission instant.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticFields {
    pub attributes_key: String,
    pub annotations_key: String,
    attributes: Value,
    annotations: Value,
    captured_at: DateTime<Utc>,
}

impl StaticFields {
    pub fn capture(
        attributes_key: impl Into<String>,
        annotations_key: impl Into<String>,
        service: &ServiceInfo,
        team: &TeamInfo,
        extra_attributes: &BTreeMap<String, Value>,
        extra_annotations: &BTreeMap<String, Value>,
    ) -> Self {
        Self::capture_at(
            attributes_key,
            annotations_key,
            service,
            team,
            extra_attributes,
            extra_annotations,
            Utc::now(),
        )
    }

    pub fn capture_at(
        attributes_key: impl Into<String>,
        annotations_key: impl Into<String>,
        service: &ServiceInfo,
        team: &TeamInfo,
        extra_attributes: &BTreeMap<String, Value>,
        extra_annotations: &BTreeMap<String, Value>,
        captured_at: DateTime<Utc>,
    ) -> Self {
        let mut attributes: Map<String, Value> = extra_attributes.clone().into_iter().collect();
        attributes.insert("service.name".into(), Value::String(service.name.clone()));
        attributes.insert("service.version".into(), Value::String(service.version.clone()));
        attributes.insert(
            "time".into(),
            Value::String(captured_at.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        );

        let mut annotations: Map<String, Value> = extra_annotations.clone().into_iter().collect();
        annotations.insert("team".into(), Value::String(team.team.clone()));
        annotations.insert("contact".into(), Value::String(team.contact.clone()));
        annotations.insert("handbook".into(), Value::String(team.handbook.clone()));

        Self {
            attributes_key: attributes_key.into(),
            annotations_key: annotations_key.into(),
            attributes: Value::Object(attributes),
            annotations: Value::Object(annotations),
            captured_at,
        }
    }

    pub fn attributes(&self) -> &Value {
        &self.attributes
    }

    pub fn annotations(&self) -> &Value {
        &self.annotations
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Top-level entries in emission order.
    pub fn entries(&self) -> [(&str, &Value); 2] {
        [
            (self.annotations_key.as_str(), &self.annotations),
            (self.attributes_key.as_str(), &self.attributes),
        ]
    }
}
