//! Output discovery for graphs without explicit output metadata.
//!
//! A node is an output when nothing consumes it and its op type is not one
//! that never produces a result. Two linear passes: build the consumer map,
//! then filter.

use std::collections::HashMap;

use ioscope_core::{Error, GraphOperation, LayerName, Result};
use tracing::trace;

/// Op types that are never reported as outputs.
pub const NON_OUTPUT_OPS: [&str; 5] = ["Const", "Assign", "NoOp", "Placeholder", "Assert"];

/// Maps each producer node name to the nodes that read from it.
pub fn consumer_map(ops: &[GraphOperation]) -> HashMap<&str, Vec<&str>> {
    let mut consumers: HashMap<&str, Vec<&str>> = HashMap::new();
    for op in ops {
        for input in &op.inputs {
            consumers
                .entry(producer_name(input))
                .or_default()
                .push(op.name.as_str());
        }
    }
    consumers
}

/// Leaf nodes of the graph, named with `import_scope` stripped.
pub fn discover_outputs(ops: &[GraphOperation], import_scope: &str) -> Result<Vec<LayerName>> {
    let consumers = consumer_map(ops);
    trace!(producers = consumers.len(), "built consumer map");

    let names: Vec<LayerName> = ops
        .iter()
        .filter(|op| !consumers.contains_key(op.name.as_str()))
        .filter(|op| !NON_OUTPUT_OPS.contains(&op.op_type.as_str()))
        .map(|op| LayerName::from(strip_scope(&op.name, import_scope)))
        .collect();

    if names.is_empty() {
        return Err(Error::UnresolvableOutput);
    }
    Ok(names)
}

/// `^node` and `node:1` both refer to `node`.
fn producer_name(input: &str) -> &str {
    let input = input.strip_prefix('^').unwrap_or(input);
    match input.rsplit_once(':') {
        Some((node, port)) if port.bytes().all(|b| b.is_ascii_digit()) => node,
        _ => input,
    }
}

/// Keeps what follows the last occurrence of `scope`.
fn strip_scope<'a>(name: &'a str, scope: &str) -> &'a str {
    if scope.is_empty() {
        return name;
    }
    name.rsplit(scope).next().unwrap_or(name)
}
