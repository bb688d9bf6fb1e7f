//! Orderings of small weak r-coloring number: checker, heuristic-driven search and exact models

// #![warn(clippy::all, clippy::pedantic)]
// useful additional warnings if docs are missing, or crates imported but unused, etc.
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unsafe_code)]
#![warn(unused_extern_crates)]
#![warn(variant_size_differences)]

// not sure if already by default in clippy
#![warn(clippy::similar_names)]
#![warn(clippy::shadow_unrelated)]
#![warn(clippy::shadow_same)]
#![warn(clippy::shadow_reuse)]


/// graph model (labeled vertices, bounded BFS, vertex removal)
pub mod graph;

/// read/write adjacency list files
pub mod adjlist;

/// error type
pub mod error;

/// weak r-coloring number of an ordering, checker
pub mod wcol;

/// ordering producers (heuristic programs and in-process heuristics)
pub mod heuristic;

/// lower bounds of the weak r-coloring number
pub mod lower_bound;

/// iterative refinement search around an ordering producer
pub mod search;

/// pendant vertex reduction
pub mod reduction;

/// exact integer programming models
pub mod ilp;

/// helper and utility methods for executables
pub mod util;
