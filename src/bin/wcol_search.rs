use std::path::Path;
use std::process;
use std::time::Duration;

use clap::{App, load_yaml, value_t, values_t};

use wcol::heuristic::{
    Heuristic, HeuristicOption, OrderingProducer, Turbocharging,
    degeneracy::DegeneracyHeuristic,
    external::ExternalHeuristic,
};
use wcol::search::{SearchParams, SearchStatus, iterative_refinement};
use wcol::util::{export_results, init_logger, read_params, read_timeout};

/** searches an ordering of small weak r-coloring number with a heuristic program,
asking it repeatedly for better orderings until the time budget is exhausted */
pub fn main() {
    init_logger();
    // parse arguments
    let yaml = load_yaml!("wcol_search.yml");
    let main_args = App::from_yaml(yaml).get_matches();
    let (graph_filename, graph, radius) = read_params(&main_args).unwrap_or_else(|e| {
        eprintln!("{} {}", main_args.value_of("graph").unwrap_or_default(), e);
        process::exit(1);
    });
    let timeout = read_timeout(&main_args).unwrap_or_else(|| Duration::from_secs(60));
    let options:Vec<HeuristicOption> = if main_args.is_present("options") {
        values_t!(main_args, "options", HeuristicOption).unwrap_or_else(|e| e.exit())
    } else { Vec::new() };
    let bin_dir = Path::new(main_args.value_of("bin-dir").unwrap_or("./src"));
    // build the ordering producer
    let heuristic_name = main_args.value_of("heuristic").unwrap_or_default();
    let mut producer:Box<dyn OrderingProducer> = if heuristic_name == "Degeneracy" {
        Box::new(DegeneracyHeuristic::new(graph.clone()))
    } else {
        let heuristic = value_t!(main_args, "heuristic", Heuristic).unwrap_or_else(|e| e.exit());
        let turbocharging = value_t!(main_args, "turbocharging", Turbocharging)
            .unwrap_or_else(|e| e.exit());
        Box::new(ExternalHeuristic::new(bin_dir.join(heuristic.program_name()), &graph_filename)
            .with_turbocharging(turbocharging)
            .with_options(&options))
    };
    // search
    let params = SearchParams {
        radius,
        timeout,
        file: graph_filename.clone(),
    };
    let report = iterative_refinement(&graph, producer.as_mut(), &params);
    if let Some((k, _)) = report.best() {
        println!("best weak coloring number: {}", k);
    }
    // export results
    if let Some(output) = main_args.value_of("output") {
        if let Err(e) = export_results(&report.trace, output) {
            eprintln!("{} {}", graph_filename, e);
            process::exit(1);
        }
    }
    match report.status {
        SearchStatus::TimedOut | SearchStatus::Exhausted => println!("Timeout"),
        SearchStatus::Errored(msg) => {
            eprintln!("{} {}", graph_filename, msg);
            process::exit(1);
        }
    }
}
