//! API models

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Body sent with a deploy trigger. The endpoint takes the environment from
/// the path, so the body is always the empty object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployTriggerBody {}

/// Deploy status as reported by the backend.
///
/// The backend is loose about types: `1`, `1.0` and `"1"` all mean complete,
/// `0`, `0.0` and `"0"` all mean pending.
#[derive(Debug, Clone, PartialEq)]
pub enum DeployStatus {
    /// The deployment has finished
    Complete,

    /// The deployment is still running
    Pending,

    /// Any other value, kept verbatim
    Unrecognized(Value),
}

impl DeployStatus {
    pub fn from_value(value: Value) -> Self {
        match &value {
            Value::Number(n) if n.as_f64() == Some(1.0) => DeployStatus::Complete,
            Value::Number(n) if n.as_f64() == Some(0.0) => DeployStatus::Pending,
            Value::String(s) if s == "1" => DeployStatus::Complete,
            Value::String(s) if s == "0" => DeployStatus::Pending,
            _ => DeployStatus::Unrecognized(value),
        }
    }

}

impl Default for DeployStatus {
    fn default() -> Self {
        DeployStatus::Unrecognized(Value::Null)
    }
}

impl Serialize for DeployStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DeployStatus::Complete => serializer.serialize_u8(1),
            DeployStatus::Pending => serializer.serialize_u8(0),
            DeployStatus::Unrecognized(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for DeployStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(DeployStatus::from_value(value))
    }
}

/// Response of both the trigger and the status endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeployStatusResponse {
    #[serde(default)]
    pub status: DeployStatus,

    /// Human readable message to surface to the user
    #[serde(default, deserialize_with = "null_as_empty")]
    pub msg: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
