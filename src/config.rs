use crate::env;
use crate::error::BuildError;
use crate::level::Level;
use crate::metadata::{ServiceInfo, TeamInfo};
use crate::schema::LogSchema;
use crate::sink::SinkTarget;
use serde_json::Value;
use std::collections::BTreeMap;

/// Everything needed to build a [`Logger`](crate::logger::Logger).
///
/// `LoggerConfig::default()` is the production profile: JSON records with
/// `Severity` / `Body` / `Timestamp` / `Caller` keys, minimum level `INFO`,
/// records on stdout and error records mirrored on stderr, and the
/// `gedai` service attributes and team annotations.
///
/// **Fields**
/// - `schema`: key names, encoders and minimum level.
/// - `service` / `team`: static metadata nested under `attributes_key`
///   and `annotations_key` in every record.
/// - `extra_attributes` / `extra_annotations`: additional static entries.
/// - `output`: destination of every record.
/// - `error_output`: destination of `ERROR`+ records and of write-failure
///   reports.
/// - `add_caller`: whether the call-site is recorded under the caller key.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggerConfig {
    pub schema: LogSchema,
    pub service: ServiceInfo,
    pub team: TeamInfo,
    pub extra_attributes: BTreeMap<String, Value>,
    pub extra_annotations: BTreeMap<String, Value>,
    pub attributes_key: String,
    pub annotations_key: String,
    pub output: SinkTarget,
    pub error_output: SinkTarget,
    pub add_caller: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            schema: LogSchema::default(),
            service: ServiceInfo::default(),
            team: TeamInfo::default(),
            extra_attributes: BTreeMap::new(),
            extra_annotations: BTreeMap::new(),
            attributes_key: "Attributes".to_string(),
            annotations_key: "Annotations".to_string(),
            output: SinkTarget::Stdout,
            error_output: SinkTarget::Stderr,
            add_caller: true,
        }
    }
}

impl LoggerConfig {
    /// Default profile overlaid with the `LOG_*` environment variables
    /// listed in [`crate::env`].
    pub fn from_env() -> Result<Self, BuildError> {
        Self::from_lookup(env::env_var)
    }

    /// Default profile overlaid with values returned by `lookup`, keyed
    /// by the names in [`crate::env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BuildError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(name) = lookup(env::LOG_SERVICE_NAME_ENV) {
            config.service.name = name;
        }
        if let Some(version) = lookup(env::LOG_SERVICE_VERSION_ENV) {
            config.service.version = version;
        }
        if let Some(team) = lookup(env::LOG_TEAM_ENV) {
            config.team.team = team;
        }
        if let Some(contact) = lookup(env::LOG_TEAM_CONTACT_ENV) {
            config.team.contact = contact;
        }
        if let Some(handbook) = lookup(env::LOG_HANDBOOK_URL_ENV) {
            config.team.handbook = handbook;
        }
        if let Some(level) = lookup(env::LOG_LEVEL_ENV) {
            config.schema.minimum_level = level.parse()?;
        }
        if let Some(output) = lookup(env::LOG_OUTPUT_ENV) {
            config.output = SinkTarget::parse(&output)?;
        }
        if let Some(error_output) = lookup(env::LOG_ERROR_OUTPUT_ENV) {
            config.error_output = SinkTarget::parse(&error_output)?;
        }

        Ok(config)
    }

    pub fn with_service(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.service = ServiceInfo { name: name.into(), version: version.into() };
        self
    }

    pub fn with_team(mut self, team: TeamInfo) -> Self {
        self.team = team;
        self
    }

    pub fn with_minimum_level(mut self, level: Level) -> Self {
        self.schema.minimum_level = level;
        self
    }

    pub fn with_outputs(mut self, output: SinkTarget, error_output: SinkTarget) -> Self {
        self.output = output;
        self.error_output = error_output;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_annotations.insert(key.into(), value.into());
        self
    }

    /// Check the record layout: schema keys plus the two static
    /// top-level keys must be non-empty and pairwise distinct.
    pub fn validate(&self) -> Result<(), BuildError> {
        self.schema.validate()?;

        for (role, key) in [
            ("attributes_key", self.attributes_key.as_str()),
            ("annotations_key", self.annotations_key.as_str()),
        ] {
            if key.is_empty() {
                return Err(BuildError::EmptyKey(role));
            }
            if self.schema.is_reserved(key) {
                return Err(BuildError::DuplicateKey(key.to_string()));
            }
        }
        if self.attributes_key == self.annotations_key {
            return Err(BuildError::DuplicateKey(self.attributes_key.clone()));
        }

        Ok(())
    }
}
