use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    AdapterConfig, BatchRule, DType, Error, LayerName, ModelHandle, ModelSpec, Result, Shape, TensorSpec,
};

/// The four supported inference-engine object models.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Engine,
    Legacy,
    Graph,
    Interpreter,
}

impl BackendKind {
    pub const ALL: [BackendKind; 4] = [
        BackendKind::Engine,
        BackendKind::Legacy,
        BackendKind::Graph,
        BackendKind::Interpreter,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::Engine => "engine",
            BackendKind::Legacy => "legacy",
            BackendKind::Graph => "graph",
            BackendKind::Interpreter => "interpreter",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "engine" | "openvino" => Ok(BackendKind::Engine),
            "legacy" | "caffe" => Ok(BackendKind::Legacy),
            "graph" | "tensorflow" | "tf" => Ok(BackendKind::Graph),
            "interpreter" | "tflite" => Ok(BackendKind::Interpreter),
            other => Err(Error::config(format!(
                "unsupported backend: {other} (expected engine, legacy, graph or interpreter)"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AdapterCapabilities {
    pub discovers_outputs: bool,
    pub batch_rule: BatchRule,
    pub honors_shape_override: bool,
}

/// Resolves I/O metadata of one backend's models.
///
/// Callers go names, then shapes, then dtypes. Implementations hold nothing
/// but their validated config, so every call is a pure function of
/// `(handle, config)`.
pub trait IoAdapter: Send + Sync {
    fn kind(&self) -> BackendKind;

    fn capabilities(&self) -> AdapterCapabilities;

    fn config(&self) -> &AdapterConfig;

    /// Never empty: a configured override is returned verbatim, and empty
    /// discovery is [`Error::NoInputs`].
    fn input_names(&self, handle: ModelHandle<'_>) -> Result<Vec<LayerName>>;

    /// `Ok(None)` means the backend has no shape for `name`.
    fn input_shape(&self, handle: ModelHandle<'_>, name: &LayerName) -> Result<Option<Shape>>;

    /// `Ok(None)` means the dtype is silently unresolved.
    fn input_dtype(&self, handle: ModelHandle<'_>, name: &LayerName) -> Result<Option<DType>>;

    fn output_names(&self, _handle: ModelHandle<'_>) -> Result<Vec<LayerName>> {
        Err(Error::Unsupported {
            backend: self.kind(),
            operation: "output discovery",
        })
    }

    /// Full pass over the model: absent shapes or dtypes become [`Error::LookupMiss`].
    fn describe(&self, handle: ModelHandle<'_>) -> Result<ModelSpec> {
        let names = self.input_names(handle)?;
        debug!(backend = %self.kind(), inputs = names.len(), "resolved input names");

        let mut inputs = Vec::with_capacity(names.len());
        for name in names {
            let shape = self
                .input_shape(handle, &name)?
                .ok_or_else(|| Error::LookupMiss(name.0.clone()))?;
            let dtype = self
                .input_dtype(handle, &name)?
                .ok_or_else(|| Error::LookupMiss(name.0.clone()))?;
            debug!(layer = %name, %shape, %dtype, "resolved input");
            inputs.push(TensorSpec { name, dtype, shape });
        }

        let outputs = if self.capabilities().discovers_outputs {
            Some(self.output_names(handle)?)
        } else {
            None
        };

        Ok(ModelSpec {
            inputs,
            outputs,
            batch_size: self.config().batch(),
        })
    }
}

/// Returns the error an adapter raises when handed another backend's model.
pub fn handle_mismatch(expected: BackendKind, handle: ModelHandle<'_>) -> Error {
    Error::HandleMismatch {
        expected,
        got: handle.kind(),
    }
}

/// Returns `names` unchanged, or [`Error::NoInputs`] when empty.
pub fn non_empty_inputs(kind: BackendKind, names: Vec<LayerName>) -> Result<Vec<LayerName>> {
    if names.is_empty() {
        return Err(Error::NoInputs(kind));
    }
    Ok(names)
}
