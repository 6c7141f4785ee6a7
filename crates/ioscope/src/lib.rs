//! Model I/O introspection over four inference-engine object models.
//!
//! Pick an adapter for a backend with [`adapter_for`], then resolve names,
//! shapes and dtypes through the [`IoAdapter`] trait.

pub mod manifest;
pub mod registry;

pub use ioscope_backend_engine::{EngineAdapter, EngineSnapshot};
pub use ioscope_backend_graph::{GraphAdapter, GraphSnapshot};
pub use ioscope_backend_interp::{InterpreterAdapter, InterpreterSnapshot};
pub use ioscope_backend_legacy::{LegacyAdapter, LegacySnapshot};
pub use ioscope_core::*;

pub use manifest::Manifest;
pub use registry::adapter_for;
