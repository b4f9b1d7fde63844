use anyhow::Result;
use irconv_core::internal::format_shape;
use irconv_core::prelude::*;

use crate::params::Parameters;

/// Print the translated graph: every op with its output buffers, then the
/// graph inputs and outputs.
pub fn handle(params: &Parameters, graph: &IrGraph) -> Result<()> {
    println!("# {} graph, {:?} axis order, {} op(s)", params.framework, graph.axis_order(), graph.len());
    print!("{graph}");
    for (label, names) in [("inputs", graph.input_names()), ("outputs", graph.output_names())] {
        let shapes = names
            .iter()
            .map(|name| graph.get_output_shape(name).map(|shape| format!("{name} {}", format_shape(shape))))
            .collect::<IrResult<Vec<String>>>()?;
        println!("{label}: {}", shapes.join(", "));
    }
    Ok(())
}

pub fn list_ops(params: &Parameters) -> Result<()> {
    let registry = params.registry()?;
    for (framework, op_type) in registry.keys() {
        if framework == params.framework {
            println!("{op_type}");
        }
    }
    Ok(())
}
