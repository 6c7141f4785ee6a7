use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{DType, Shape};

/// Layer identifier, meaningful only inside the backend it came from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerName(pub String);

impl LayerName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for LayerName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for LayerName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl PartialEq<str> for LayerName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LayerName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One fully resolved model input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TensorSpec {
    pub name: LayerName,
    pub dtype: DType,
    pub shape: Shape,
}

impl TensorSpec {
    /// Bytes needed to hold one batch of this input.
    pub fn byte_len(&self) -> usize {
        self.shape.numel() * self.dtype.size_in_bytes()
    }
}

/// Uniform I/O description handed to the benchmarking pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModelSpec {
    pub inputs: Vec<TensorSpec>,
    /// `None` when the backend adapter does not discover outputs.
    pub outputs: Option<Vec<LayerName>>,
    pub batch_size: usize,
}
