use std::collections::BTreeMap;

use ioscope_core::{
    handle_mismatch, non_empty_inputs, resolve_shape, AdapterCapabilities, AdapterConfig,
    BackendKind, BatchRule, Blob, DType, Error, IoAdapter, LayerName, LegacyNet, ModelHandle,
    Result, Shape, ShapeSpec,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Adapter for legacy-framework nets, whose metadata lives in a blob map.
pub struct LegacyAdapter {
    config: AdapterConfig,
}

impl LegacyAdapter {
    pub fn new(config: AdapterConfig) -> Result<Self> {
        config.validate_shapes()?;
        Ok(Self { config })
    }

    fn net<'a>(&self, handle: ModelHandle<'a>) -> Result<&'a dyn LegacyNet> {
        let ModelHandle::Legacy(net) = handle else {
            return Err(handle_mismatch(BackendKind::Legacy, handle));
        };
        Ok(net)
    }

    fn blob<'a>(&self, handle: ModelHandle<'a>, name: &LayerName) -> Result<&'a Blob> {
        self.net(handle)?
            .blob(name.as_str())
            .ok_or_else(|| Error::LookupMiss(name.0.clone()))
    }
}

impl IoAdapter for LegacyAdapter {
    fn kind(&self) -> BackendKind {
        BackendKind::Legacy
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
        let net = self.net(handle)?;
        if let Some(names) = self.config.input_name_override() {
            return Ok(names.to_vec());
        }
        let names: Vec<LayerName> = net.inputs().iter().cloned().map(LayerName).collect();
        debug!(?names, "declared legacy inputs");
        non_empty_inputs(BackendKind::Legacy, names)
    }

    fn input_shape(&self, handle: ModelHandle<'_>, name: &LayerName) -> Result<Option<Shape>> {
        let blob = self.blob(handle, name)?;
        let spec = ShapeSpec::known(&blob.shape);
        resolve_shape(spec, self.config.batch(), BatchRule::Overwrite).map(Some)
    }

    fn input_dtype(&self, handle: ModelHandle<'_>, name: &LayerName) -> Result<Option<DType>> {
        Ok(Some(self.blob(handle, name)?.dtype))
    }
}

/// Legacy net metadata held in memory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacySnapshot {
    pub inputs: Vec<String>,
    #[serde(default)]
    pub blobs: BTreeMap<String, Blob>,
}

impl LegacyNet for LegacySnapshot {
    fn inputs(&self) -> &[String] {
        &self.inputs
    }

    fn blob(&self, name: &str) -> Option<&Blob> {
        self.blobs.get(name)
    }
}
