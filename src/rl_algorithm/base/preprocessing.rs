use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Deref;

/// Preprocessing layers keyed by state type, state name or `"reward"`.
pub type PreprocessingConfig = BTreeMap<String, PreprocessingLayers>;

/// Layers applied in order. Deserializes from a single layer or a list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PreprocessingLayers(pub Vec<PreprocessingLayer>);

impl Deref for PreprocessingLayers {
    type Target = [PreprocessingLayer];

    fn deref(&self) -> &Self::Target {
        return &self.0;
    }
}

impl From<Vec<PreprocessingLayer>> for PreprocessingLayers {
    fn from(layers: Vec<PreprocessingLayer>) -> Self {
        return PreprocessingLayers(layers);
    }
}

impl<'de> Deserialize<'de> for PreprocessingLayers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            One(PreprocessingLayer),
            Many(Vec<PreprocessingLayer>),
        }
        match Raw::deserialize(deserializer)? {
            Raw::One(layer) => Ok(PreprocessingLayers(vec![layer])),
            Raw::Many(layers) => Ok(PreprocessingLayers(layers)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PreprocessingLayer {
    Clipping { lower: f32, upper: f32 },
    Deltafier,
    Scale { factor: f32 },
    Sequence { length: usize },
    Standardization,
}
