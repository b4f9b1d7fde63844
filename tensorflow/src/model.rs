//! Whole-graph translation.
use irconv_core::framework::Framework;
use irconv_core::prelude::*;

use crate::ops::array::fold_reshapes_into_constants;

/// Rewrite node inputs into IR buffer names.
///
/// Control dependencies (`^node`) carry no data and are dropped. The first
/// output of a node is its own name, so `node:0` becomes `node`; later
/// outputs keep their `node:n` name.
pub fn normalize_inputs(nodes: &[SourceNode]) -> Vec<SourceNode> {
    nodes
        .iter()
        .map(|node| {
            let mut node = node.clone();
            node.inputs = node
                .inputs
                .iter()
                .filter(|i| !i.starts_with('^'))
                .map(|i| i.strip_suffix(":0").unwrap_or(i).to_string())
                .collect();
            node
        })
        .collect()
}

/// Translate `GraphDef` nodes, in topological order, into `graph`.
///
/// Once every node is in, reshapes of constants read by nothing else are
/// folded into them, and constants that were only used as attributes are
/// removed.
pub fn translate_graph(registry: &TranslationRegistry, nodes: &[SourceNode], graph: &mut IrGraph) -> IrResult<()> {
    let nodes = normalize_inputs(nodes);
    registry.translate_all(Framework::Tensorflow, &nodes, graph)?;
    let folded = fold_reshapes_into_constants(graph)?;
    if folded > 0 {
        debug!("folded {folded} reshape(s) into constants");
    }
    let pruned = graph.prune_unused_constants();
    if pruned > 0 {
        debug!("pruned {pruned} constant(s) folded into attributes");
    }
    Ok(())
}
