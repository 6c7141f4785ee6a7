use ioscope_core::{BackendKind, ModelHandle};
use serde::{Deserialize, Serialize};

use crate::{EngineSnapshot, GraphSnapshot, InterpreterSnapshot, LegacySnapshot};

/// Native metadata of one model, tagged by backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum Manifest {
    Engine(EngineSnapshot),
    Legacy(LegacySnapshot),
    Graph(GraphSnapshot),
    Interpreter(InterpreterSnapshot),
}

impl Manifest {
    pub fn kind(&self) -> BackendKind {
        self.handle().kind()
    }

    pub fn handle(&self) -> ModelHandle<'_> {
        match self {
            Manifest::Engine(model) => ModelHandle::Engine(model),
            Manifest::Legacy(net) => ModelHandle::Legacy(net),
            Manifest::Graph(graph) => ModelHandle::Graph(graph),
            Manifest::Interpreter(interpreter) => ModelHandle::Interpreter(interpreter),
        }
    }
}
