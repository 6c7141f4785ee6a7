use crate::{BackendKind, ShapeSpec};

/// Everything that can go wrong while resolving model I/O metadata.
///
/// No variant is retried internally. A failed call is terminal for that call and
/// the caller decides what to do with it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// User overrides are incomplete or contradictory, or metadata the caller
    /// must supply by hand could not be found in the model.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A dimension past the batch position is still unknown after the batch rule ran.
    #[error("invalid shape {shape}: {reason}. Try setting the input shape manually")]
    UnresolvableShape { shape: ShapeSpec, reason: String },

    /// Output discovery produced no candidates.
    #[error("output blobs in the graph cannot be found")]
    UnresolvableOutput,

    /// Input discovery produced no names.
    #[error("no input layers found in the {0} model")]
    NoInputs(BackendKind),

    /// A named tensor is absent from backend metadata.
    #[error("layer `{0}` not found in model metadata")]
    LookupMiss(String),

    /// The backend's element type has no canonical counterpart.
    #[error("unsupported element type `{tag}` for layer `{layer}`")]
    UnsupportedDtype { layer: String, tag: String },

    /// An adapter was handed a model handle of another backend.
    #[error("{expected} adapter received a {got} model handle")]
    HandleMismatch { expected: BackendKind, got: BackendKind },

    /// The adapter does not expose the requested operation.
    #[error("{backend} adapter does not support {operation}")]
    Unsupported {
        backend: BackendKind,
        operation: &'static str,
    },
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    pub fn unresolvable_shape(shape: ShapeSpec, reason: impl Into<String>) -> Self {
        Error::UnresolvableShape {
            shape,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
