use ioscope_core::{AdapterConfig, BackendKind, IoAdapter, Result};
use tracing::debug;

use crate::{EngineAdapter, GraphAdapter, InterpreterAdapter, LegacyAdapter};

/// Builds the adapter for `kind`, validating `config` up front.
pub fn adapter_for(kind: BackendKind, config: AdapterConfig) -> Result<Box<dyn IoAdapter>> {
    debug!(backend = %kind, batch = config.batch(), "building adapter");
    let adapter: Box<dyn IoAdapter> = match kind {
        BackendKind::Engine => Box::new(EngineAdapter::new(config)?),
        BackendKind::Legacy => Box::new(LegacyAdapter::new(config)?),
        BackendKind::Graph => Box::new(GraphAdapter::new(config)?),
        BackendKind::Interpreter => Box::new(InterpreterAdapter::new(config)?),
    };
    Ok(adapter)
}
