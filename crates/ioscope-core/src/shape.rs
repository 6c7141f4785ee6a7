use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::{Error, Result};

/// A shape as discovered or overridden: `None` marks an unknown dimension.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeSpec(pub Vec<Option<usize>>);

impl ShapeSpec {
    pub fn known(dims: &[usize]) -> Self {
        Self(dims.iter().copied().map(Some).collect())
    }

    pub fn rank(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<Option<usize>>> for ShapeSpec {
    fn from(dims: Vec<Option<usize>>) -> Self {
        Self(dims)
    }
}

impl fmt::Display for ShapeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, dim) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match dim {
                Some(d) => write!(f, "{d}")?,
                None => f.write_str("?")?,
            }
        }
        f.write_str("]")
    }
}

/// A resolved shape: every dimension known, dimension 0 is the batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Shape(pub SmallVec<[usize; 6]>);

impl Shape {
    pub fn from_slice(d: &[usize]) -> Self {
        Self(d.iter().copied().collect())
    }
    pub fn rank(&self) -> usize {
        self.0.len()
    }
    pub fn numel(&self) -> usize {
        self.0.iter().product::<usize>().max(1)
    }
    pub fn dims(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0.as_slice())
    }
}

/// How the configured batch size lands in dimension 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchRule {
    /// Only an unknown dimension 0 is replaced.
    FillUnknown,
    /// Dimension 0 is always replaced, known or not.
    Overwrite,
}

/// Applies `rule` to dimension 0 and rejects any unknown dimension after it.
pub fn resolve_shape(spec: ShapeSpec, batch: usize, rule: BatchRule) -> Result<Shape> {
    let Some(first) = spec.0.first().copied() else {
        return Err(Error::unresolvable_shape(spec, "shape has no batch dimension"));
    };

    let batch_dim = match (rule, first) {
        (BatchRule::FillUnknown, Some(known)) => known,
        (BatchRule::FillUnknown, None) | (BatchRule::Overwrite, _) => {
            trace!(?first, batch, "writing batch size into dimension 0");
            batch
        }
    };

    if batch_dim == 0 || spec.0[1..].contains(&Some(0)) {
        let mut shown = spec;
        shown.0[0] = Some(batch_dim);
        return Err(Error::unresolvable_shape(shown, "dimensions must be positive"));
    }

    if spec.0[1..].iter().any(Option::is_none) {
        let mut shown = spec;
        shown.0[0] = Some(batch_dim);
        return Err(Error::unresolvable_shape(
            shown,
            "dimensions after the batch position are unknown",
        ));
    }

    let mut dims = SmallVec::with_capacity(spec.rank());
    dims.push(batch_dim);
    dims.extend(spec.0[1..].iter().flatten().copied());
    Ok(Shape(dims))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(dims: &[Option<usize>]) -> ShapeSpec {
        ShapeSpec(dims.to_vec())
    }

    #[test]
    fn fill_unknown_substitutes_missing_batch() {
        let shape = resolve_shape(
            spec(&[None, Some(224), Some(224), Some(3)]),
            1,
            BatchRule::FillUnknown,
        )
        .unwrap();
        assert_eq!(shape.dims(), &[1, 224, 224, 3]);
    }

    #[test]
    fn fill_unknown_keeps_known_batch() {
        let shape = resolve_shape(spec(&[Some(2), Some(8)]), 1, BatchRule::FillUnknown).unwrap();
        assert_eq!(shape.dims(), &[2, 8]);
    }

    #[test]
    fn overwrite_replaces_known_batch() {
        let shape = resolve_shape(
            spec(&[Some(4), Some(224), Some(224), Some(3)]),
            1,
            BatchRule::Overwrite,
        )
        .unwrap();
        assert_eq!(shape.dims(), &[1, 224, 224, 3]);
    }

    #[test]
    fn unknown_trailing_dim_is_rejected_under_both_rules() {
        for rule in [BatchRule::FillUnknown, BatchRule::Overwrite] {
            let err = resolve_shape(spec(&[Some(2), None, Some(224), Some(3)]), 1, rule)
                .unwrap_err();
            assert!(matches!(err, Error::UnresolvableShape { .. }), "{rule:?}: {err}");
        }
    }

    #[test]
    fn zero_dims_are_rejected() {
        let err = resolve_shape(spec(&[None, Some(0), Some(3)]), 1, BatchRule::FillUnknown)
            .unwrap_err();
        assert!(matches!(err, Error::UnresolvableShape { .. }));

        let err = resolve_shape(spec(&[Some(0), Some(3)]), 1, BatchRule::FillUnknown).unwrap_err();
        assert!(matches!(err, Error::UnresolvableShape { .. }));

        let shape = resolve_shape(spec(&[Some(0), Some(3)]), 2, BatchRule::Overwrite).unwrap();
        assert_eq!(shape.dims(), &[2, 3]);
    }

    #[test]
    fn numel_counts_elements() {
        assert_eq!(Shape::from_slice(&[2, 3, 4]).numel(), 24);
    }

    #[test]
    fn empty_shape_is_rejected() {
        let err = resolve_shape(ShapeSpec::default(), 1, BatchRule::Overwrite).unwrap_err();
        assert!(matches!(err, Error::UnresolvableShape { .. }));
    }

    #[test]
    fn error_message_points_at_manual_shape() {
        let err = resolve_shape(spec(&[None, None]), 3, BatchRule::FillUnknown).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("[3, ?]"), "{msg}");
        assert!(msg.contains("input shape manually"), "{msg}");
    }
}
