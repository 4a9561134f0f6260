use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueTarget {
    State,
    Action,
}

/// Training objective. Deserializes from a tagged object or one of the names
/// `"policy_gradient"`, `"value"` (state value) and `"action_value"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self", tag = "type", rename_all = "snake_case")]
pub enum ObjectiveConfig {
    PolicyGradient {
        /// Use the likelihood ratio instead of the log-likelihood.
        #[serde(default)]
        ratio_based: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        clipping_value: Option<f32>,
    },
    /// Regression of the state or action value.
    Value { value: ValueTarget },
}

impl ObjectiveConfig {
    pub fn policy_gradient() -> Self {
        return ObjectiveConfig::PolicyGradient {
            ratio_based: false,
            clipping_value: None,
        };
    }

    /// Clipped likelihood-ratio objective.
    pub fn clipped_ratio(clipping_value: f32) -> Self {
        return ObjectiveConfig::PolicyGradient {
            ratio_based: true,
            clipping_value: Some(clipping_value),
        };
    }

    pub fn state_value() -> Self {
        return ObjectiveConfig::Value {
            value: ValueTarget::State,
        };
    }

    pub fn action_value() -> Self {
        return ObjectiveConfig::Value {
            value: ValueTarget::Action,
        };
    }
}

impl Serialize for ObjectiveConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        return ObjectiveConfig::serialize(self, serializer);
    }
}

impl<'de> Deserialize<'de> for ObjectiveConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Name(String),
            #[serde(deserialize_with = "ObjectiveConfig::deserialize")]
            Spec(ObjectiveConfig),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Spec(objective) => Ok(objective),
            Raw::Name(name) => match name.as_str() {
                "policy_gradient" => Ok(ObjectiveConfig::policy_gradient()),
                "value" => Ok(ObjectiveConfig::state_value()),
                "action_value" => Ok(ObjectiveConfig::action_value()),
                _ => Err(de::Error::custom(format!(
                    "unknown objective {name:?}, expected \"policy_gradient\", \"value\" or \"action_value\""
                ))),
            },
        }
    }
}
