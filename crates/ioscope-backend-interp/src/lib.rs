use std::collections::HashMap;

use ioscope_core::{
    handle_mismatch, non_empty_inputs, resolve_shape, AdapterCapabilities, AdapterConfig,
    BackendKind, BatchRule, DType, Error, Interpreter, IoAdapter, LayerName, ModelHandle, Result,
    Shape, ShapeSpec, TensorDetail,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

const SHAPE_LOOKUP_FAILED: &str =
    "could not get the correct shape. Try setting the input shape manually";

/// Shape overrides as validated at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
enum ShapeOverride {
    /// One shape for every input.
    Global(Vec<usize>),
    /// Names and shapes supplied pairwise.
    PerName(HashMap<LayerName, Vec<usize>>),
}

/// Adapter for interpreters that expose input/output detail records.
pub struct InterpreterAdapter {
    config: AdapterConfig,
    shapes: Option<ShapeOverride>,
}

impl InterpreterAdapter {
    pub fn new(config: AdapterConfig) -> Result<Self> {
        config.validate_shapes()?;
        let shapes = match (config.input_shape_override(), config.input_name_override()) {
            (None, _) => None,
            (Some(_), None) => {
                return Err(Error::config(
                    "input shapes were given without input names; set both",
                ))
            }
            (Some([shape]), Some(_)) => Some(ShapeOverride::Global(shape.clone())),
            (Some(shapes), Some(names)) if shapes.len() == names.len() => Some(
                ShapeOverride::PerName(names.iter().cloned().zip(shapes.iter().cloned()).collect()),
            ),
            (Some(shapes), Some(names)) => {
                return Err(Error::config(format!(
                    "got {} input shapes for {} input names",
                    shapes.len(),
                    names.len()
                )))
            }
        };
        Ok(Self { config, shapes })
    }

    fn interpreter<'a>(&self, handle: ModelHandle<'a>) -> Result<&'a dyn Interpreter> {
        let ModelHandle::Interpreter(interpreter) = handle else {
            return Err(handle_mismatch(BackendKind::Interpreter, handle));
        };
        Ok(interpreter)
    }

    fn override_shape(&self, name: &LayerName) -> Option<&[usize]> {
        match self.shapes.as_ref()? {
            ShapeOverride::Global(shape) => Some(shape.as_slice()),
            ShapeOverride::PerName(map) => map.get(name).map(Vec::as_slice),
        }
    }
}

impl IoAdapter for InterpreterAdapter {
    fn kind(&self) -> BackendKind {
        BackendKind::Interpreter
    }

    fn capabilities(&self) -> AdapterCapabilities {
        AdapterCapabilities {
            discovers_outputs: true,
            batch_rule: BatchRule::Overwrite,
            honors_shape_override: true,
        }
    }

    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn input_names(&self, handle: ModelHandle<'_>) -> Result<Vec<LayerName>> {
        let interpreter = self.interpreter(handle)?;
        if let Some(names) = self.config.input_name_override() {
            return Ok(names.to_vec());
        }
        let names = detail_names(interpreter.input_details());
        debug!(?names, "discovered interpreter inputs");
        non_empty_inputs(BackendKind::Interpreter, names)
    }

    fn input_shape(&self, handle: ModelHandle<'_>, name: &LayerName) -> Result<Option<Shape>> {
        let interpreter = self.interpreter(handle)?;
        let spec = if self.shapes.is_some() {
            let dims = self.override_shape(name).ok_or_else(|| {
                Error::config(format!("no input shape was given for input `{name}`"))
            })?;
            let mut spec = ShapeSpec::known(dims);
            spec.0.insert(0, Some(self.config.batch()));
            spec
        } else {
            find_detail(interpreter.input_details(), name)
                .map(|detail| ShapeSpec(detail.shape.clone()))
                .ok_or_else(|| Error::config(format!("{SHAPE_LOOKUP_FAILED} (layer `{name}`)")))?
        };
        resolve_shape(spec, self.config.batch(), BatchRule::Overwrite).map(Some)
    }

    fn input_dtype(&self, handle: ModelHandle<'_>, name: &LayerName) -> Result<Option<DType>> {
        let interpreter = self.interpreter(handle)?;
        Ok(find_detail(interpreter.input_details(), name)
            .and_then(|detail| DType::from_numpy_name(&detail.dtype)))
    }

    fn output_names(&self, handle: ModelHandle<'_>) -> Result<Vec<LayerName>> {
        let interpreter = self.interpreter(handle)?;
        if let Some(names) = self.config.output_name_override() {
            return Ok(names.to_vec());
        }
        let names = detail_names(interpreter.output_details());
        if names.is_empty() {
            return Err(Error::UnresolvableOutput);
        }
        Ok(names)
    }
}

fn detail_names(details: &[TensorDetail]) -> Vec<LayerName> {
    details
        .iter()
        .map(|detail| LayerName::from(detail.name.as_str()))
        .collect()
}

fn find_detail<'a>(details: &'a [TensorDetail], name: &LayerName) -> Option<&'a TensorDetail> {
    details.iter().find(|detail| detail.name == name.0)
}

/// Interpreter detail records held in memory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpreterSnapshot {
    pub inputs: Vec<TensorDetail>,
    #[serde(default)]
    pub outputs: Vec<TensorDetail>,
}

impl Interpreter for InterpreterSnapshot {
    fn input_details(&self) -> &[TensorDetail] {
        &self.inputs
    }

    fn output_details(&self) -> &[TensorDetail] {
        &self.outputs
    }
}
