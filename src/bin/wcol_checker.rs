use std::process;

use clap::{App, load_yaml};

use wcol::util::{read_ordering, read_params};
use wcol::wcol::{CheckerResult, checker};

/** computes the weak r-coloring number of an ordering */
pub fn main() {
    // parse arguments
    let yaml = load_yaml!("wcol_checker.yml");
    let main_args = App::from_yaml(yaml).get_matches();
    let (graph_filename, graph, radius) = read_params(&main_args).unwrap_or_else(|e| {
        eprintln!("{} {}", main_args.value_of("graph").unwrap_or_default(), e);
        process::exit(1);
    });
    let ordering_filename = main_args.value_of("ordering").unwrap_or_default();
    // read files
    let labels = read_ordering(ordering_filename).unwrap_or_else(|e| {
        eprintln!("{} {}", graph_filename, e);
        process::exit(1);
    });
    let ordering = match graph.ids_of(&labels) {
        Ok(ordering) => ordering,
        Err(label) => {
            println!("ERROR: vertex {} is not in the graph", label);
            return;
        }
    };
    // call checker
    match checker(&graph, &ordering, radius) {
        CheckerResult::Ok(n) => {
            println!("{}", n);
        },
        CheckerResult::VertexAddedTwice(v) => {
            println!("ERROR: vertex {} ordered twice", graph.label(v));
        },
        CheckerResult::VertexNotOrdered(v) => {
            println!("ERROR: vertex {} not ordered", graph.label(v));
        },
        CheckerResult::UnknownVertex(v) => {
            println!("ERROR: vertex {} is not in the graph", v);
        },
    };
}
