use ioscope_core::{
    handle_mismatch, non_empty_inputs, resolve_shape, AdapterCapabilities, AdapterConfig,
    BackendKind, BatchRule, DType, EngineElementType, EngineModel, EnginePort, Error, IoAdapter,
    LayerName, ModelHandle, Result, Shape, ShapeSpec,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Adapter for engine-native models, which declare a structured input list.
pub struct EngineAdapter {
    config: AdapterConfig,
}

impl EngineAdapter {
    pub fn new(config: AdapterConfig) -> Result<Self> {
        config.validate_shapes()?;
        Ok(Self { config })
    }

    fn model<'a>(&self, handle: ModelHandle<'a>) -> Result<&'a dyn EngineModel> {
        let ModelHandle::Engine(model) = handle else {
            return Err(handle_mismatch(BackendKind::Engine, handle));
        };
        Ok(model)
    }
}

impl IoAdapter for EngineAdapter {
    fn kind(&self) -> BackendKind {
        BackendKind::Engine
    }

    fn capabilities(&self) -> AdapterCapabilities {
        AdapterCapabilities {
            discovers_outputs: false,
            batch_rule: BatchRule::Overwrite,
            honors_shape_override: false,
        }
    }

    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn input_names(&self, handle: ModelHandle<'_>) -> Result<Vec<LayerName>> {
        let model = self.model(handle)?;
        if let Some(names) = self.config.input_name_override() {
            return Ok(names.to_vec());
        }

        let names = model
            .inputs()
            .iter()
            .enumerate()
            .map(|(idx, port)| {
                port.primary_name()
                    .map(LayerName::from)
                    .ok_or_else(|| Error::LookupMiss(format!("<unnamed input #{idx}>")))
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(?names, "discovered engine inputs");
        non_empty_inputs(BackendKind::Engine, names)
    }

    fn input_shape(&self, handle: ModelHandle<'_>, name: &LayerName) -> Result<Option<Shape>> {
        let Some(port) = find_port(self.model(handle)?, name) else {
            return Ok(None);
        };
        let spec = ShapeSpec(port.shape.clone());
        resolve_shape(spec, self.config.batch(), BatchRule::Overwrite).map(Some)
    }

    fn input_dtype(&self, handle: ModelHandle<'_>, name: &LayerName) -> Result<Option<DType>> {
        let Some(port) = find_port(self.model(handle)?, name) else {
            return Ok(None);
        };
        engine_element_to_dtype(port.element_type)
            .map(Some)
            .ok_or_else(|| Error::UnsupportedDtype {
                layer: name.0.clone(),
                tag: port.element_type.to_string(),
            })
    }
}

fn find_port<'a>(model: &'a dyn EngineModel, name: &LayerName) -> Option<&'a EnginePort> {
    model
        .inputs()
        .iter()
        .find(|port| port.primary_name() == Some(name.as_str()))
}

/// Canonical lookup table for engine element types. `None` for types with no
/// canonical counterpart.
pub fn engine_element_to_dtype(ty: EngineElementType) -> Option<DType> {
    match ty {
        EngineElementType::Boolean => Some(DType::Bool),
        EngineElementType::F16 => Some(DType::F16),
        EngineElementType::F32 => Some(DType::F32),
        EngineElementType::F64 => Some(DType::F64),
        EngineElementType::I8 => Some(DType::I8),
        EngineElementType::I16 => Some(DType::I16),
        EngineElementType::I32 => Some(DType::I32),
        EngineElementType::I64 => Some(DType::I64),
        EngineElementType::U8 => Some(DType::U8),
        EngineElementType::U16 => Some(DType::U16),
        EngineElementType::U32 => Some(DType::U32),
        EngineElementType::U64 => Some(DType::U64),
        EngineElementType::Bf16
        | EngineElementType::I4
        | EngineElementType::U1
        | EngineElementType::U4
        | EngineElementType::Dynamic
        | EngineElementType::Undefined => None,
    }
}

/// Engine model metadata held in memory, e.g. read from a manifest.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub inputs: Vec<EnginePort>,
}

impl EngineModel for EngineSnapshot {
    fn inputs(&self) -> &[EnginePort] {
        &self.inputs
    }
}
