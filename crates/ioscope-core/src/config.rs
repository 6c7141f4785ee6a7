use std::num::NonZeroUsize;

use crate::{Error, LayerName, Result};

/// Import scope stripped from discovered graph output names by default.
pub const DEFAULT_IMPORT_SCOPE: &str = "import/";

/// User overrides for one adapter. Immutable once the adapter is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdapterConfig {
    pub batch_size: NonZeroUsize,
    pub input_names: Option<Vec<LayerName>>,
    /// Override shapes without the batch dimension.
    pub input_shapes: Option<Vec<Vec<usize>>>,
    pub output_names: Option<Vec<LayerName>>,
    /// Prefix stripped from discovered graph output names; empty disables it.
    pub import_scope: String,
}

impl AdapterConfig {
    pub fn new(batch_size: NonZeroUsize) -> Self {
        Self {
            batch_size,
            input_names: None,
            input_shapes: None,
            output_names: None,
            import_scope: DEFAULT_IMPORT_SCOPE.to_string(),
        }
    }

    /// Same as [`AdapterConfig::new`] but rejects a zero batch size.
    pub fn with_batch(batch_size: usize) -> Result<Self> {
        let batch_size = NonZeroUsize::new(batch_size)
            .ok_or_else(|| Error::config("batch size must be a positive integer"))?;
        Ok(Self::new(batch_size))
    }

    pub fn with_input_names<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<LayerName>,
    {
        self.input_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_input_shapes(mut self, shapes: Vec<Vec<usize>>) -> Self {
        self.input_shapes = Some(shapes);
        self
    }

    pub fn with_output_names<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<LayerName>,
    {
        self.output_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_import_scope(mut self, scope: impl Into<String>) -> Self {
        self.import_scope = scope.into();
        self
    }

    pub fn batch(&self) -> usize {
        self.batch_size.get()
    }

    /// Input name override, treating an empty list as absent.
    pub fn input_name_override(&self) -> Option<&[LayerName]> {
        self.input_names.as_deref().filter(|names| !names.is_empty())
    }

    /// Shape override, treating an empty list as absent.
    pub fn input_shape_override(&self) -> Option<&[Vec<usize>]> {
        self.input_shapes.as_deref().filter(|shapes| !shapes.is_empty())
    }

    pub fn output_name_override(&self) -> Option<&[LayerName]> {
        self.output_names.as_deref().filter(|names| !names.is_empty())
    }

    /// Checks that no override shape carries a zero dimension.
    pub fn validate_shapes(&self) -> Result<()> {
        for shape in self.input_shape_override().unwrap_or_default() {
            if shape.contains(&0) {
                return Err(Error::config(format!(
                    "input shape {shape:?} contains a zero dimension"
                )));
            }
        }
        Ok(())
    }
}
