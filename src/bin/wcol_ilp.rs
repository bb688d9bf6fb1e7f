use std::path::Path;
use std::process;

use clap::{App, load_yaml, value_t};

use wcol::heuristic::{
    Heuristic,
    degeneracy::DegeneracyHeuristic,
    external::ExternalHeuristic,
};
use wcol::ilp::{Encoding, IlpParams, solve_exact, warm_start};
use wcol::lower_bound::lower_bound;
use wcol::util::{init_logger, read_params, read_timeout, write_exact_result};

/** computes an optimal ordering with an integer program.
A heuristic ordering gives the initial upper bound. */
pub fn main() {
    init_logger();
    // parse arguments
    let yaml = load_yaml!("wcol_ilp.yml");
    let main_args = App::from_yaml(yaml).get_matches();
    let (graph_filename, graph, radius) = read_params(&main_args).unwrap_or_else(|e| {
        eprintln!("{} {}", main_args.value_of("graph").unwrap_or_default(), e);
        process::exit(1);
    });
    let encoding = value_t!(main_args, "encoding", Encoding).unwrap_or_else(|e| e.exit());
    let timeout = read_timeout(&main_args);
    let bin_dir = Path::new(main_args.value_of("bin-dir").unwrap_or("./src"));
    // upper bound: heuristic program, degeneracy ordering if it can not be run
    let mut external = ExternalHeuristic::new(
        bin_dir.join(Heuristic::SreachHeuristic.program_name()), &graph_filename
    );
    let warm = warm_start(&graph, &mut external, radius).or_else(|| {
        warm_start(&graph, &mut DegeneracyHeuristic::new(graph.clone()), radius)
    });
    // lower bound (used by the reduction)
    let lowerbound = match encoding {
        Encoding::Position => Some(lower_bound(
            &graph, &bin_dir.join("LowerBound"), Path::new(&graph_filename), radius
        )),
        _ => None,
    };
    let params = IlpParams { radius, encoding, timeout, lowerbound };
    // solve it
    match solve_exact(&graph, &params, warm.as_ref()) {
        Ok(Some(sol)) => {
            let ordering = graph.labels_of(&sol.ordering);
            println!("Ordering: {}", ordering.join(" "));
            println!("Weak coloring number: {}", sol.wcol);
            if let Some(output) = main_args.value_of("output") {
                let res = write_exact_result(output, &ordering, sol.time.as_secs_f64(), sol.wcol);
                if let Err(e) = res {
                    eprintln!("{} {}", graph_filename, e);
                    process::exit(1);
                }
            }
        },
        Ok(None) => println!("Timeout"),
        Err(e) => {
            eprintln!("{} {}", graph_filename, e);
            process::exit(1);
        }
    }
}
