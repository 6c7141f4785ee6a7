use std::io::Write;

use anyhow::Result;
use ioscope::{BackendKind, ModelSpec};
use serde::Serialize;

#[derive(Serialize)]
struct Report<'a> {
    backend: BackendKind,
    #[serde(flatten)]
    spec: &'a ModelSpec,
}

pub fn write_json(out: &mut impl Write, backend: BackendKind, spec: &ModelSpec) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, &Report { backend, spec })?;
    writeln!(out)?;
    Ok(())
}

pub fn write_text(out: &mut impl Write, backend: BackendKind, spec: &ModelSpec) -> Result<()> {
    writeln!(out, "backend: {backend} (batch {})", spec.batch_size)?;
    writeln!(out, "inputs:")?;
    let width = spec
        .inputs
        .iter()
        .map(|input| input.name.as_str().len())
        .max()
        .unwrap_or(0);
    for input in &spec.inputs {
        writeln!(
            out,
            "  {:<width$}  {:<8}  {}  {} bytes",
            input.name.as_str(),
            input.dtype,
            input.shape,
            input.byte_len()
        )?;
    }
    if let Some(outputs) = &spec.outputs {
        writeln!(out, "outputs:")?;
        for name in outputs {
            writeln!(out, "  {name}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use ioscope::{DType, LayerName, Shape, TensorSpec};

    use super::*;

    fn spec() -> ModelSpec {
        ModelSpec {
            inputs: vec![TensorSpec {
                name: LayerName::from("image"),
                dtype: DType::F32,
                shape: Shape::from_slice(&[1, 224, 224, 3]),
            }],
            outputs: Some(vec![LayerName::from("scores")]),
            batch_size: 1,
        }
    }

    #[test]
    fn text_lists_inputs_then_outputs() {
        let mut out = Vec::new();
        write_text(&mut out, BackendKind::Interpreter, &spec()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "backend: interpreter (batch 1)\ninputs:\n  image  float32   [1, 224, 224, 3]  602112 bytes\noutputs:\n  scores\n"
        );
    }

    #[test]
    fn json_carries_backend_and_shapes() {
        let mut out = Vec::new();
        write_json(&mut out, BackendKind::Graph, &spec()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["backend"], "graph");
        assert_eq!(value["inputs"][0]["shape"], serde_json::json!([1, 224, 224, 3]));
        assert_eq!(value["outputs"][0], "scores");
    }
}
