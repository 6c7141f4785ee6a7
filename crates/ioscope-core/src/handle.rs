//! Read-only views of the four native object models.
//!
//! Model loading happens elsewhere; the loader hands us one of these views
//! wrapped in a [`ModelHandle`] and keeps ownership of the model itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{BackendKind, DType};

/// Element type tag of an engine-native port.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineElementType {
    Boolean,
    Bf16,
    F16,
    F32,
    F64,
    I4,
    I8,
    I16,
    I32,
    I64,
    U1,
    U4,
    U8,
    U16,
    U32,
    U64,
    Dynamic,
    Undefined,
}

impl fmt::Display for EngineElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EngineElementType::Boolean => "boolean",
            EngineElementType::Bf16 => "bf16",
            EngineElementType::F16 => "f16",
            EngineElementType::F32 => "f32",
            EngineElementType::F64 => "f64",
            EngineElementType::I4 => "i4",
            EngineElementType::I8 => "i8",
            EngineElementType::I16 => "i16",
            EngineElementType::I32 => "i32",
            EngineElementType::I64 => "i64",
            EngineElementType::U1 => "u1",
            EngineElementType::U4 => "u4",
            EngineElementType::U8 => "u8",
            EngineElementType::U16 => "u16",
            EngineElementType::U32 => "u32",
            EngineElementType::U64 => "u64",
            EngineElementType::Dynamic => "dynamic",
            EngineElementType::Undefined => "undefined",
        };
        f.write_str(s)
    }
}

/// A declared input of an engine-native model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnginePort {
    /// Every tensor name bound to the port; the first one is primary.
    pub names: Vec<String>,
    pub shape: Vec<Option<usize>>,
    pub element_type: EngineElementType,
}

impl EnginePort {
    pub fn primary_name(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }
}

pub trait EngineModel {
    fn inputs(&self) -> &[EnginePort];
}

/// A named data blob of a legacy-framework network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    pub shape: Vec<usize>,
    pub dtype: DType,
}

pub trait LegacyNet {
    /// Input blob names, already canonical.
    fn inputs(&self) -> &[String];
    fn blob(&self, name: &str) -> Option<&Blob>;
}

/// Numeric data type codes used by graph-based models.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum GraphDataType {
    Float = 1,
    Double = 2,
    Int32 = 3,
    Uint8 = 4,
    Int16 = 5,
    Int8 = 6,
    String = 7,
    Int64 = 9,
    Bool = 10,
    Bfloat16 = 14,
    Uint16 = 17,
    Half = 19,
    Uint32 = 22,
    Uint64 = 23,
}

impl fmt::Display for GraphDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self, *self as i32)
    }
}

/// An output tensor of a graph operation. Tensor names look like `op:0`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphTensor {
    pub name: String,
    /// `None` when even the rank is unknown.
    #[serde(default)]
    pub dims: Option<Vec<Option<usize>>>,
    pub dtype: GraphDataType,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphOperation {
    pub name: String,
    pub op_type: String,
    /// Producer references: `node`, `node:1`, or `^node` for control inputs.
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<GraphTensor>,
}

pub trait GraphModel {
    fn operations(&self) -> &[GraphOperation];

    fn tensor(&self, name: &str) -> Option<&GraphTensor> {
        self.operations()
            .iter()
            .flat_map(|op| op.outputs.iter())
            .find(|t| t.name == name)
    }
}

/// An input or output detail record of an interpreter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorDetail {
    pub name: String,
    pub shape: Vec<Option<usize>>,
    /// Numpy-style element type name, e.g. `float32`.
    pub dtype: String,
}

pub trait Interpreter {
    fn input_details(&self) -> &[TensorDetail];
    fn output_details(&self) -> &[TensorDetail];
}

/// Borrowed reference to a loaded model of one backend.
#[derive(Clone, Copy)]
pub enum ModelHandle<'a> {
    Engine(&'a dyn EngineModel),
    Legacy(&'a dyn LegacyNet),
    Graph(&'a dyn GraphModel),
    Interpreter(&'a dyn Interpreter),
}

impl ModelHandle<'_> {
    pub fn kind(&self) -> BackendKind {
        match self {
            ModelHandle::Engine(_) => BackendKind::Engine,
            ModelHandle::Legacy(_) => BackendKind::Legacy,
            ModelHandle::Graph(_) => BackendKind::Graph,
            ModelHandle::Interpreter(_) => BackendKind::Interpreter,
        }
    }
}

impl fmt::Debug for ModelHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModelHandle::{:?}", self.kind())
    }
}
