use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named state or action components, ordered by name.
pub type SpaceSpecs = BTreeMap<String, TensorSpec>;

/// Named values for every component of a space.
pub type SpaceValues = BTreeMap<String, TensorValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Bool,
    Int,
    #[default]
    Float,
}

/// Description of one state or action component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorSpec {
    #[serde(rename = "type", default)]
    pub dtype: ValueType,
    /// Empty shape means scalar.
    #[serde(default)]
    pub shape: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_values: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f32>,
}

impl TensorSpec {
    pub fn bool(shape: &[usize]) -> Self {
        return Self {
            dtype: ValueType::Bool,
            shape: shape.to_vec(),
            num_values: None,
            min_value: None,
            max_value: None,
        };
    }

    pub fn int(shape: &[usize], num_values: usize) -> Self {
        return Self {
            dtype: ValueType::Int,
            shape: shape.to_vec(),
            num_values: Some(num_values),
            min_value: None,
            max_value: None,
        };
    }

    pub fn float(shape: &[usize]) -> Self {
        return Self {
            dtype: ValueType::Float,
            shape: shape.to_vec(),
            num_values: None,
            min_value: None,
            max_value: None,
        };
    }

    pub fn bounded_float(shape: &[usize], min_value: f32, max_value: f32) -> Self {
        return Self {
            min_value: Some(min_value),
            max_value: Some(max_value),
            ..Self::float(shape)
        };
    }

    /// Number of scalar elements.
    pub fn size(&self) -> usize {
        return self.shape.iter().product();
    }

    /// A float component with both bounds, which policies model with a Beta distribution.
    pub fn is_bounded_float(&self) -> bool {
        return self.dtype == ValueType::Float
            && self.min_value.is_some()
            && self.max_value.is_some();
    }

    /// Checks the description itself, `name` is only used in the message.
    pub fn check(&self, name: &str) -> Result<(), String> {
        if self.shape.iter().any(|dim| *dim == 0) {
            return Err(format!("{name}: shape {:?} has a zero dimension", self.shape));
        }
        match self.dtype {
            ValueType::Int => match self.num_values {
                Some(n) if n > 0 => {}
                _ => return Err(format!("{name}: int type requires num_values > 0")),
            },
            _ => {
                if self.num_values.is_some() {
                    return Err(format!("{name}: num_values only applies to int type"));
                }
            }
        }
        for bound in [self.min_value, self.max_value].into_iter().flatten() {
            if !bound.is_finite() {
                return Err(format!("{name}: bound {bound} is not finite"));
            }
        }
        if let (Some(min), Some(max)) = (self.min_value, self.max_value) {
            if min >= max {
                return Err(format!("{name}: min_value {min} must be below max_value {max}"));
            }
            if !(max - min).is_finite() {
                return Err(format!("{name}: range [{min}, {max}] is too wide"));
            }
        }
        return Ok(());
    }

    /// Checks that `value` has this component's type, size and range.
    pub fn check_value(&self, name: &str, value: &TensorValue) -> Result<(), String> {
        if value.dtype() != self.dtype {
            return Err(format!(
                "{name}: expected {:?} value, got {:?}",
                self.dtype,
                value.dtype()
            ));
        }
        if value.len() != self.size() {
            return Err(format!(
                "{name}: expected {} elements, got {}",
                self.size(),
                value.len()
            ));
        }
        match value {
            TensorValue::Int(values) => {
                let num_values = self.num_values.unwrap_or(0) as i64;
                if let Some(v) = values.iter().find(|v| **v < 0 || **v >= num_values) {
                    return Err(format!("{name}: {v} outside [0, {num_values})"));
                }
            }
            TensorValue::Float(values) => {
                let min = self.min_value.unwrap_or(f32::NEG_INFINITY);
                let max = self.max_value.unwrap_or(f32::INFINITY);
                if let Some(v) = values.iter().find(|v| !v.is_finite() || **v < min || **v > max) {
                    return Err(format!("{name}: {v} outside [{min}, {max}]"));
                }
            }
            TensorValue::Bool(_) => {}
        }
        return Ok(());
    }
}

/// Flattened values of one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TensorValue {
    Bool(Vec<bool>),
    Int(Vec<i64>),
    Float(Vec<f32>),
}

impl TensorValue {
    pub fn dtype(&self) -> ValueType {
        match self {
            TensorValue::Bool(_) => ValueType::Bool,
            TensorValue::Int(_) => ValueType::Int,
            TensorValue::Float(_) => ValueType::Float,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TensorValue::Bool(values) => values.len(),
            TensorValue::Int(values) => values.len(),
            TensorValue::Float(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        return self.len() == 0;
    }
}
