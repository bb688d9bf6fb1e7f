use std::collections::VecDeque;

use crate::graph::{Graph, VertexId};

/**
Pendant vertex reduction.

Given a lower bound L of the weak r-coloring number, a vertex of degree 1 whose
r-ball (itself included) has at most L vertices can be placed last in an
ordering: nobody reaches it more than L times, and a pendant vertex never
relays a path to another vertex. It is removed, and the rule is applied again
until no vertex qualifies.

returns the reduced graph and the removed vertices, in the order they must be
appended to an ordering of the reduced graph (last removed first).
*/
pub fn reduce(graph:&Graph, lowerbound:usize, radius:usize) -> (Graph, Vec<VertexId>) {
    let mut g = graph.clone();
    let mut suffix:VecDeque<VertexId> = VecDeque::new();
    log::info!("starting nodes: {}", g.n());
    log::info!("lower bound: {}", lowerbound);
    let mut removed_node = true;
    while removed_node {
        removed_node = false;
        let nodes:Vec<VertexId> = g.vertices().collect();
        for v in nodes {
            if g.degree(v) == 1 && g.ball_size(v, radius) <= lowerbound {
                g.remove_vertex(v);
                suffix.push_front(v);
                removed_node = true;
            }
        }
    }
    log_removable_candidates(&g, lowerbound, radius, log::log_enabled!(log::Level::Info));
    log::info!("number of removed: {}", suffix.len());
    (g, suffix.into_iter().collect())
}

/// logs the removable candidates (if enabled). returns how many were found
fn log_removable_candidates(graph:&Graph, lowerbound:usize, radius:usize, enabled:bool) -> Option<usize> {
    if !enabled { return None; }
    let candidates = removable_candidates(graph, lowerbound, radius);
    for v in &candidates {
        log::info!("can remove {}", graph.label(*v));
    }
    Some(candidates.len())
}

/** diagnostic: vertices v such that, once v is removed, every neighbor of v
still reaches at most L-1 vertices within the radius. Nothing is removed. */
pub fn removable_candidates(graph:&Graph, lowerbound:usize, radius:usize) -> Vec<VertexId> {
    graph.vertices().filter(|v| {
        let mut without = graph.clone();
        without.remove_vertex(*v);
        graph.neighbors(*v).all(|w| without.ball_size(w, radius) < lowerbound)
    }).collect()
}
