use anyhow::{Context, Result, bail};
use irconv_core::framework::ir_translations;
use irconv_core::prelude::*;
use std::path::{Path, PathBuf};

use crate::json;

/// Structure holding the parsed parameters.
#[derive(Debug)]
pub struct Parameters {
    pub model: Option<PathBuf>,
    pub framework: Framework,
    pub axis_order: AxisOrder,
    pub policy: UnsupportedPolicy,
}

/// `.caffe.json` and `.prototxt.json` files hold Caffe layers, `.ir.json`
/// IR nodes. Anything else is assumed to be TensorFlow.
fn guess_framework(model: &Path) -> Framework {
    let name = model.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    if name.ends_with(".caffe.json") || name.ends_with(".prototxt.json") {
        Framework::Caffe
    } else if name.ends_with(".ir.json") {
        Framework::Ir
    } else {
        Framework::Tensorflow
    }
}

pub fn default_axis_order(framework: Framework) -> AxisOrder {
    match framework {
        Framework::Caffe => AxisOrder::Caffe,
        Framework::Tensorflow => AxisOrder::Tf,
        Framework::Ir => AxisOrder::Onnx,
    }
}

impl Parameters {
    /// Parses the command-line arguments.
    pub fn from_clap(matches: &clap::ArgMatches) -> Result<Parameters> {
        let model = matches.value_of("model").map(PathBuf::from);
        let framework = match (matches.value_of("framework"), &model) {
            (Some(f), _) => f.parse::<Framework>().map_err(anyhow::Error::msg)?,
            (None, Some(model)) => guess_framework(model),
            (None, None) if matches.is_present("list_ops") => Framework::Tensorflow,
            (None, None) => bail!("Model argument required"),
        };
        let axis_order = match matches.value_of("axis_order") {
            Some(order) => order.parse::<AxisOrder>().map_err(anyhow::Error::msg)?,
            None => default_axis_order(framework),
        };
        let policy = if matches.is_present("passthrough_unsupported") {
            UnsupportedPolicy::Passthrough
        } else {
            UnsupportedPolicy::Abort
        };
        Ok(Parameters { model, framework, axis_order, policy })
    }

    pub fn registry(&self) -> Result<TranslationRegistry> {
        let registry = match self.framework {
            Framework::Caffe => irconv_caffe::caffe_translations(),
            Framework::Tensorflow => irconv_tensorflow::tensorflow_translations(),
            Framework::Ir => ir_translations(),
        };
        Ok(registry.context("Building the translation registry")?.with_policy(self.policy))
    }

    /// Load the node list and translate it into a new graph.
    pub fn translate(&self) -> Result<IrGraph> {
        let model = self.model.as_ref().context("Model argument required")?;
        let nodes = json::load_nodes(model)?;
        info!("{} {} node(s) loaded from {:?}", nodes.len(), self.framework, model);
        let registry = self.registry()?;
        let mut graph = IrGraph::new(self.axis_order);
        let translated = match self.framework {
            Framework::Caffe => irconv_caffe::translate_net(&registry, &nodes, &mut graph),
            Framework::Tensorflow => irconv_tensorflow::translate_graph(&registry, &nodes, &mut graph),
            Framework::Ir => registry.translate_all(Framework::Ir, &nodes, &mut graph),
        };
        translated.with_context(|| format!("Translating {model:?}"))?;
        Ok(graph)
    }
}
