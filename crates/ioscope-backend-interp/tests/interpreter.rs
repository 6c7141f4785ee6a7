use anyhow::Result;
use ioscope_backend_interp::{InterpreterAdapter, InterpreterSnapshot};
use ioscope_core::{AdapterConfig, DType, Error, IoAdapter, LayerName, ModelHandle, TensorDetail};

fn detail(name: &str, shape: &[Option<usize>], dtype: &str) -> TensorDetail {
    TensorDetail {
        name: name.to_string(),
        shape: shape.to_vec(),
        dtype: dtype.to_string(),
    }
}

fn interpreter() -> InterpreterSnapshot {
    InterpreterSnapshot {
        inputs: vec![
            detail("image", &[Some(4), Some(224), Some(224), Some(3)], "float32"),
            detail("mask", &[Some(1), None], "uint8"),
            detail("embedding", &[Some(1), Some(16)], "complex64"),
        ],
        outputs: vec![detail("scores", &[Some(1), Some(1001)], "float32")],
    }
}

#[test]
fn names_come_from_input_details() -> Result<()> {
    let adapter = InterpreterAdapter::new(AdapterConfig::with_batch(1)?)?;
    let interp = interpreter();
    let names = adapter.input_names(ModelHandle::Interpreter(&interp))?;
    assert_eq!(
        names,
        vec![
            LayerName::from("image"),
            LayerName::from("mask"),
            LayerName::from("embedding")
        ]
    );
    Ok(())
}

#[test]
fn known_batch_is_overwritten() -> Result<()> {
    let adapter = InterpreterAdapter::new(AdapterConfig::with_batch(1)?)?;
    let interp = interpreter();
    let shape = adapter
        .input_shape(ModelHandle::Interpreter(&interp), &"image".into())?
        .expect("shape");
    assert_eq!(shape.dims(), &[1, 224, 224, 3]);
    Ok(())
}

#[test]
fn unknown_trailing_dim_is_unresolvable() -> Result<()> {
    let adapter = InterpreterAdapter::new(AdapterConfig::with_batch(1)?)?;
    let interp = interpreter();
    let err = adapter
        .input_shape(ModelHandle::Interpreter(&interp), &"mask".into())
        .unwrap_err();
    assert!(matches!(err, Error::UnresolvableShape { .. }));
    Ok(())
}

#[test]
fn missing_detail_shape_is_a_configuration_error() -> Result<()> {
    let adapter = InterpreterAdapter::new(AdapterConfig::with_batch(1)?)?;
    let interp = interpreter();
    let err = adapter
        .input_shape(ModelHandle::Interpreter(&interp), &"labels".into())
        .unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
    Ok(())
}

#[test]
fn shapes_without_names_fail_at_construction() -> Result<()> {
    let config = AdapterConfig::with_batch(1)?.with_input_shapes(vec![vec![224, 224, 3]]);
    assert!(matches!(
        InterpreterAdapter::new(config),
        Err(Error::Configuration(_))
    ));
    Ok(())
}

#[test]
fn mismatched_override_counts_fail_at_construction() -> Result<()> {
    let config = AdapterConfig::with_batch(1)?
        .with_input_names(["a", "b", "c"])
        .with_input_shapes(vec![vec![3], vec![4]]);
    assert!(matches!(
        InterpreterAdapter::new(config),
        Err(Error::Configuration(_))
    ));
    Ok(())
}

#[test]
fn per_name_shapes_are_indexed_by_name() -> Result<()> {
    let config = AdapterConfig::with_batch(2)?
        .with_input_names(["image", "mask"])
        .with_input_shapes(vec![vec![96, 96, 3], vec![96]]);
    let adapter = InterpreterAdapter::new(config)?;
    let interp = InterpreterSnapshot::default();
    let handle = ModelHandle::Interpreter(&interp);

    let image = adapter.input_shape(handle, &"image".into())?.expect("shape");
    let mask = adapter.input_shape(handle, &"mask".into())?.expect("shape");
    assert_eq!(image.dims(), &[2, 96, 96, 3]);
    assert_eq!(mask.dims(), &[2, 96]);
    Ok(())
}

#[test]
fn single_shape_applies_to_every_name() -> Result<()> {
    let config = AdapterConfig::with_batch(3)?
        .with_input_names(["left", "right"])
        .with_input_shapes(vec![vec![64, 64, 1]]);
    let adapter = InterpreterAdapter::new(config)?;
    let interp = InterpreterSnapshot::default();
    let handle = ModelHandle::Interpreter(&interp);

    for name in ["left", "right"] {
        let shape = adapter.input_shape(handle, &name.into())?.expect("shape");
        assert_eq!(shape.dims(), &[3, 64, 64, 1]);
    }
    Ok(())
}

#[test]
fn name_override_is_returned_verbatim() -> Result<()> {
    let config = AdapterConfig::with_batch(1)?.with_input_names(["mask", "image"]);
    let adapter = InterpreterAdapter::new(config)?;
    let interp = interpreter();
    let names = adapter.input_names(ModelHandle::Interpreter(&interp))?;
    assert_eq!(names, vec![LayerName::from("mask"), LayerName::from("image")]);
    Ok(())
}

#[test]
fn dtype_is_read_from_detail_record() -> Result<()> {
    let adapter = InterpreterAdapter::new(AdapterConfig::with_batch(1)?)?;
    let interp = interpreter();
    let handle = ModelHandle::Interpreter(&interp);
    assert_eq!(adapter.input_dtype(handle, &"image".into())?, Some(DType::F32));
    assert_eq!(adapter.input_dtype(handle, &"mask".into())?, Some(DType::U8));
    Ok(())
}

// Unlike the engine-native adapter, an unmapped tag or an unknown layer is
// reported as an absent dtype, not an error. Callers must treat `None` as a
// failure themselves.
#[test]
fn unresolved_dtype_is_silently_absent() -> Result<()> {
    let adapter = InterpreterAdapter::new(AdapterConfig::with_batch(1)?)?;
    let interp = interpreter();
    let handle = ModelHandle::Interpreter(&interp);
    assert_eq!(adapter.input_dtype(handle, &"embedding".into())?, None);
    assert_eq!(adapter.input_dtype(handle, &"labels".into())?, None);
    Ok(())
}

#[test]
fn outputs_come_from_output_details() -> Result<()> {
    let adapter = InterpreterAdapter::new(AdapterConfig::with_batch(1)?)?;
    let interp = interpreter();
    let names = adapter.output_names(ModelHandle::Interpreter(&interp))?;
    assert_eq!(names, vec![LayerName::from("scores")]);
    Ok(())
}

#[test]
fn no_output_details_is_unresolvable() -> Result<()> {
    let adapter = InterpreterAdapter::new(AdapterConfig::with_batch(1)?)?;
    let interp = InterpreterSnapshot {
        inputs: interpreter().inputs,
        outputs: Vec::new(),
    };
    let err = adapter
        .output_names(ModelHandle::Interpreter(&interp))
        .unwrap_err();
    assert!(matches!(err, Error::UnresolvableOutput));
    Ok(())
}

#[test]
fn output_override_wins() -> Result<()> {
    let config = AdapterConfig::with_batch(1)?.with_output_names(["logits"]);
    let adapter = InterpreterAdapter::new(config)?;
    let interp = InterpreterSnapshot::default();
    let names = adapter.output_names(ModelHandle::Interpreter(&interp))?;
    assert_eq!(names, vec![LayerName::from("logits")]);
    Ok(())
}
