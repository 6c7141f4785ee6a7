pub mod outputs;

use ioscope_core::{
    handle_mismatch, non_empty_inputs, resolve_shape, AdapterCapabilities, AdapterConfig,
    BackendKind, BatchRule, DType, Error, GraphDataType, GraphModel, GraphOperation, IoAdapter,
    LayerName, ModelHandle, Result, Shape, ShapeSpec,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use outputs::{consumer_map, discover_outputs, NON_OUTPUT_OPS};

/// Op type of the nodes that anchor input discovery.
pub const PLACEHOLDER_OP: &str = "Placeholder";

const SHAPE_LOOKUP_FAILED: &str =
    "could not get the correct shape. Try setting the input shape manually";

/// Adapter for graph-based models that carry no structured I/O metadata.
pub struct GraphAdapter {
    config: AdapterConfig,
    /// Height, width and channels from the shape override.
    hwc: Option<[usize; 3]>,
}

impl GraphAdapter {
    pub fn new(config: AdapterConfig) -> Result<Self> {
        config.validate_shapes()?;
        let hwc = match config.input_shape_override() {
            None => None,
            Some([shape]) => Some(<[usize; 3]>::try_from(shape.as_slice()).map_err(|_| {
                Error::config(format!(
                    "graph input shape must be [height, width, channels], got {shape:?}"
                ))
            })?),
            Some(shapes) => {
                return Err(Error::config(format!(
                    "graph models take a single input shape, got {}",
                    shapes.len()
                )))
            }
        };
        Ok(Self { config, hwc })
    }

    fn graph<'a>(&self, handle: ModelHandle<'a>) -> Result<&'a dyn GraphModel> {
        let ModelHandle::Graph(graph) = handle else {
            return Err(handle_mismatch(BackendKind::Graph, handle));
        };
        Ok(graph)
    }
}

impl IoAdapter for GraphAdapter {
    fn kind(&self) -> BackendKind {
        BackendKind::Graph
    }

    fn capabilities(&self) -> AdapterCapabilities {
        AdapterCapabilities {
            discovers_outputs: true,
            batch_rule: BatchRule::FillUnknown,
            honors_shape_override: true,
        }
    }

    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn input_names(&self, handle: ModelHandle<'_>) -> Result<Vec<LayerName>> {
        let graph = self.graph(handle)?;
        if let Some(names) = self.config.input_name_override() {
            return Ok(names.to_vec());
        }

        let names: Vec<LayerName> = graph
            .operations()
            .iter()
            .filter(|op| op.op_type == PLACEHOLDER_OP)
            .flat_map(|op| op.outputs.iter())
            .map(|tensor| LayerName::from(tensor.name.as_str()))
            .collect();
        debug!(?names, "discovered placeholder inputs");
        non_empty_inputs(BackendKind::Graph, names)
    }

    fn input_shape(&self, handle: ModelHandle<'_>, name: &LayerName) -> Result<Option<Shape>> {
        let graph = self.graph(handle)?;
        let spec = match self.hwc {
            Some([h, w, c]) => ShapeSpec::known(&[self.config.batch(), h, w, c]),
            None => graph
                .tensor(name.as_str())
                .and_then(|tensor| tensor.dims.clone())
                .map(ShapeSpec)
                .ok_or_else(|| Error::config(format!("{SHAPE_LOOKUP_FAILED} (layer `{name}`)")))?,
        };
        resolve_shape(spec, self.config.batch(), BatchRule::FillUnknown).map(Some)
    }

    fn input_dtype(&self, handle: ModelHandle<'_>, name: &LayerName) -> Result<Option<DType>> {
        let Some(tensor) = self.graph(handle)?.tensor(name.as_str()) else {
            return Ok(None);
        };
        graph_type_to_dtype(tensor.dtype)
            .map(Some)
            .ok_or_else(|| Error::UnsupportedDtype {
                layer: name.0.clone(),
                tag: tensor.dtype.to_string(),
            })
    }

    fn output_names(&self, handle: ModelHandle<'_>) -> Result<Vec<LayerName>> {
        let graph = self.graph(handle)?;
        if let Some(names) = self.config.output_name_override() {
            return Ok(names.to_vec());
        }
        let names = discover_outputs(graph.operations(), &self.config.import_scope)?;
        debug!(?names, "discovered graph outputs");
        Ok(names)
    }
}

pub fn graph_type_to_dtype(ty: GraphDataType) -> Option<DType> {
    match ty {
        GraphDataType::Float => Some(DType::F32),
        GraphDataType::Double => Some(DType::F64),
        GraphDataType::Half => Some(DType::F16),
        GraphDataType::Int8 => Some(DType::I8),
        GraphDataType::Int16 => Some(DType::I16),
        GraphDataType::Int32 => Some(DType::I32),
        GraphDataType::Int64 => Some(DType::I64),
        GraphDataType::Uint8 => Some(DType::U8),
        GraphDataType::Uint16 => Some(DType::U16),
        GraphDataType::Uint32 => Some(DType::U32),
        GraphDataType::Uint64 => Some(DType::U64),
        GraphDataType::Bool => Some(DType::Bool),
        GraphDataType::String | GraphDataType::Bfloat16 => None,
    }
}

/// Graph metadata held in memory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub operations: Vec<GraphOperation>,
}

impl GraphModel for GraphSnapshot {
    fn operations(&self) -> &[GraphOperation] {
        &self.operations
    }
}
