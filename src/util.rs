use std::fs;
use std::path::Path;
use std::time::Duration;

use clap::{ArgMatches, ErrorKind, value_t};
use serde::Serialize;

use crate::adjlist::read_from_file;
use crate::error::WcolError;
use crate::graph::Graph;

/// installs the logger (level `info` unless RUST_LOG says otherwise)
pub fn init_logger() {
    let env = env_logger::Env::default().default_filter_or("info");
    // a logger may already be installed (tests)
    let _ = env_logger::Builder::from_env(env).try_init();
}

/** reads the parameters shared by the executables: graph file and radius.
Reads the graph and prints its statistics. Exits on invalid arguments. */
pub fn read_params(main_args:&ArgMatches) -> Result<(String, Graph, usize), WcolError> {
    let graph_filename = main_args.value_of("graph").unwrap_or_default().to_string();
    let radius = value_t!(main_args, "radius", usize).unwrap_or_else(|e| e.exit());
    let graph = read_from_file(&graph_filename)?;
    log::info!("{} (radius {})", graph_filename, radius);
    graph.display_statistics();
    Ok((graph_filename, graph, radius))
}

/// parses a time budget in seconds (finite, non-negative)
pub fn parse_timeout(value:&str) -> Result<Duration, String> {
    let seconds:f64 = value.trim().parse()
        .map_err(|_| format!("invalid timeout '{}': not a number", value))?;
    if !seconds.is_finite() || seconds < 0. {
        return Err(format!("invalid timeout '{}': expected a non-negative number of seconds", value));
    }
    Ok(Duration::from_secs_f64(seconds))
}

/// reads the "timeout" argument (if given). Exits on invalid values.
pub fn read_timeout(main_args:&ArgMatches) -> Option<Duration> {
    main_args.value_of("timeout").map(|value| {
        parse_timeout(value).unwrap_or_else(|e| {
            clap::Error::with_description(&e, ErrorKind::InvalidValue).exit()
        })
    })
}

/// creates the parent directories of a file
fn create_parent_dir(path:&Path) -> Result<(), WcolError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|e| WcolError::io(dir, e))
        },
        _ => Ok(()),
    }
}

/// exports search results (JSON) to a file, creating its directory if needed
pub fn export_results<T:Serialize, P:AsRef<Path>>(stats:&T, filename:P) -> Result<(), WcolError> {
    let path = filename.as_ref();
    create_parent_dir(path)?;
    let content = serde_json::to_string(stats)?;
    fs::write(path, content).map_err(|e| WcolError::io(path, e))
}

/// writes the result of the exact solver
pub fn write_exact_result<P:AsRef<Path>>(filename:P, ordering:&[String], time:f64, wcol:usize) -> Result<(), WcolError> {
    let path = filename.as_ref();
    create_parent_dir(path)?;
    let content = format!(
        "Ordering: {}\nTime: {}\nWeak coloring number: {}\n",
        ordering.join(" "), time, wcol
    );
    fs::write(path, content).map_err(|e| WcolError::io(path, e))
}

/** reads an ordering (vertex labels separated by white spaces).
Result files of the exact solver are accepted: only their "Ordering:" line is read. */
pub fn read_ordering<P:AsRef<Path>>(filename:P) -> Result<Vec<String>, WcolError> {
    let path = filename.as_ref();
    let content = fs::read_to_string(path).map_err(|e| WcolError::io(path, e))?;
    let labels = match content.lines().find_map(|l| l.strip_prefix("Ordering:")) {
        Some(line) => line.split_whitespace(),
        None => content.split_whitespace(),
    };
    Ok(labels.map(|l| l.to_string()).collect())
}
