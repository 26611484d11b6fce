use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Account resource as exchanged with the API.
///
/// Only `id` and `version` are interpreted by this crate. Everything else is
/// carried as opaque JSON so payloads survive a round trip unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountData {
    pub id: String,
    /// Optimistic-concurrency version; required by [`delete`].
    ///
    /// [`delete`]: crate::AccountApiClient::delete
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisation_id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<JsonValue>,
    /// Server fields not modelled above (`created_on`, `links`, ...).
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl AccountData {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_organisation_id(mut self, organisation_id: impl Into<String>) -> Self {
        self.organisation_id = Some(organisation_id.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_attributes(mut self, attributes: JsonValue) -> Self {
        self.attributes = Some(attributes);
        self
    }
}
