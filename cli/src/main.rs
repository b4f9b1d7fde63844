#[macro_use]
extern crate log;

use anyhow::Result;
use clap::{Arg, Command};
use std::process;

mod dump;
mod json;
mod params;

use crate::params::Parameters;

/// Entrypoint for the command-line interface.
fn main() {
    let app = Command::new("irconv")
        .version(clap::crate_version!())
        .about("Translate Caffe or TensorFlow node lists into the irconv IR and show the inferred shapes")
        .arg(Arg::new("model").takes_value(true).help("Sets the model (a JSON node list) to use"))
        .arg(
            Arg::new("framework")
                .long("framework")
                .short('f')
                .takes_value(true)
                .possible_values(["caffe", "tf", "ir"])
                .help("Source framework of the nodes [default: guessed from the extension]"),
        )
        .arg(
            Arg::new("axis_order")
                .long("axis-order")
                .takes_value(true)
                .possible_values(["tf", "caffe", "onnx"])
                .help("Axis order of the IR graph [default: the framework's own]"),
        )
        .arg(
            Arg::new("passthrough_unsupported")
                .long("passthrough-unsupported")
                .help("Replace unsupported operators by no-ops instead of failing"),
        )
        .arg(Arg::new("list_ops").long("list-ops").help("List the operators known for the framework"))
        .arg(Arg::new("verbosity").short('v').multiple_occurrences(true).help("Sets the level of verbosity."));

    let matches = app.get_matches();

    let level = match matches.occurrences_of("verbosity") {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env = env_logger::Env::default().filter_or("IRCONV_LOG", level);
    env_logger::Builder::from_env(env).format_timestamp_nanos().init();

    if let Err(e) = handle(&matches) {
        error!("{e:?}");
        process::exit(1)
    }
}

fn handle(matches: &clap::ArgMatches) -> Result<()> {
    let params = Parameters::from_clap(matches)?;
    if matches.is_present("list_ops") {
        return dump::list_ops(&params);
    }
    let graph = params.translate()?;
    dump::handle(&params, &graph)
}
