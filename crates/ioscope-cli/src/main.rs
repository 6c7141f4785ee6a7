mod cli;
mod report;

use std::io::Write;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use cli::{Cli, Command, Dims, Format};
use ioscope::{adapter_for, AdapterConfig, BackendKind, Manifest};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Inspect {
            manifest,
            backend,
            batch_size,
            input_names,
            input_shapes,
            output_names,
            import_scope,
            format,
        } => {
            let mut config = AdapterConfig::with_batch(batch_size)?;
            if !input_names.is_empty() {
                config = config.with_input_names(input_names);
            }
            if !input_shapes.is_empty() {
                let shapes = input_shapes.into_iter().map(|Dims(dims)| dims).collect();
                config = config.with_input_shapes(shapes);
            }
            if !output_names.is_empty() {
                config = config.with_output_names(output_names);
            }
            if let Some(scope) = import_scope {
                config = config.with_import_scope(scope);
            }
            inspect(&mut stdout, &manifest, backend.as_deref(), config, format)
        }
        Command::Backends => list_backends(&mut stdout),
    }
}

fn inspect(
    out: &mut impl Write,
    path: &Path,
    backend: Option<&str>,
    config: AdapterConfig,
    format: Format,
) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    let manifest: Manifest = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse manifest {}", path.display()))?;

    let kind = manifest.kind();
    if let Some(raw) = backend {
        let expected: BackendKind = raw.parse()?;
        ensure!(
            expected == kind,
            "manifest describes a {kind} model but --backend asked for {expected}"
        );
    }

    let adapter = adapter_for(kind, config)?;
    let spec = adapter
        .describe(manifest.handle())
        .with_context(|| format!("failed to resolve I/O of {}", path.display()))?;
    tracing::info!(backend = %kind, inputs = spec.inputs.len(), "resolved model I/O");

    match format {
        Format::Text => report::write_text(out, kind, &spec),
        Format::Json => report::write_json(out, kind, &spec),
    }
}

fn list_backends(out: &mut impl Write) -> Result<()> {
    for kind in BackendKind::ALL {
        let caps = adapter_for(kind, AdapterConfig::with_batch(1)?)?.capabilities();
        writeln!(
            out,
            "{kind:<12} outputs={:<5} batch={:?} shape_override={}",
            caps.discovers_outputs, caps.batch_rule, caps.honors_shape_override
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    const TFLITE: &str = r#"{
        "backend": "interpreter",
        "inputs": [{"name": "input", "index": 0, "shape": [1, 128, 128, 3], "dtype": "uint8"}],
        "outputs": [{"name": "Identity", "index": 171, "shape": [1, 10], "dtype": "float32"}]
    }"#;

    #[test]
    fn inspect_prints_resolved_io() {
        let file = manifest_file(TFLITE);
        let mut out = Vec::new();
        let config = AdapterConfig::with_batch(4).unwrap();
        inspect(&mut out, file.path(), Some("tflite"), config, Format::Text).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[4, 128, 128, 3]"), "{text}");
        assert!(text.contains("uint8"), "{text}");
        assert!(text.contains("Identity"), "{text}");
    }

    #[test]
    fn inspect_rejects_backend_mismatch() {
        let file = manifest_file(TFLITE);
        let mut out = Vec::new();
        let config = AdapterConfig::with_batch(1).unwrap();
        let err = inspect(&mut out, file.path(), Some("openvino"), config, Format::Json)
            .unwrap_err();
        assert!(err.to_string().contains("--backend"), "{err}");
        assert!(out.is_empty());
    }

    #[test]
    fn backends_are_listed() {
        let mut out = Vec::new();
        list_backends(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 4);
        assert!(text.starts_with("engine"));
    }
}
