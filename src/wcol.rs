use bit_set::BitSet;

use crate::graph::{Graph, VertexId};

/** result of checking an elimination ordering */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckerResult {
    /// valid ordering, weak r-coloring number attained
    Ok(usize),
    /// vertex appears twice in the ordering
    VertexAddedTwice(VertexId),
    /// vertex of the graph missing from the ordering
    VertexNotOrdered(VertexId),
    /// the ordering contains something that is not a vertex of the graph
    UnknownVertex(VertexId),
}

/** computes wreach[u] for every vertex u, given a valid elimination ordering.
Vertices are processed in the ordering: every vertex reachable from v within
radius steps (v included) in the current graph has its count incremented, then
v is removed. Works on a copy of the graph.

returns a vector indexed by vertex id (0 for ids that are not vertices).
*/
pub fn wreach_sizes(graph:&Graph, ordering:&[VertexId], radius:usize) -> Vec<usize> {
    let mut g = graph.clone();
    let mut res = vec![0 ; graph.capacity()];
    for v in ordering {
        for u in g.bfs(*v, radius).vertices() {
            res[*u] += 1;
        }
        g.remove_vertex(*v);
    }
    res
}

/** checks that an ordering is a permutation of the vertices of the graph.
returns the first problem found (if any). */
pub fn check_permutation(graph:&Graph, ordering:&[VertexId]) -> Option<CheckerResult> {
    let mut visited = BitSet::with_capacity(graph.capacity());
    for v in ordering {
        if !graph.contains(*v) {
            return Some(CheckerResult::UnknownVertex(*v));
        }
        if !visited.insert(*v) {
            return Some(CheckerResult::VertexAddedTwice(*v));
        }
    }
    graph.vertices()
        .find(|v| !visited.contains(*v))
        .map(CheckerResult::VertexNotOrdered)
}

/** computes the weak r-coloring number of an ordering.
returns the reason the ordering is invalid otherwise */
pub fn checker(graph:&Graph, ordering:&[VertexId], radius:usize) -> CheckerResult {
    if let Some(problem) = check_permutation(graph, ordering) {
        return problem;
    }
    let wreach = wreach_sizes(graph, ordering, radius);
    CheckerResult::Ok(wreach.iter().copied().max().unwrap_or(0))
}

/** weak r-coloring number of a valid ordering (None if the ordering is not a permutation) */
pub fn weak_coloring_number(graph:&Graph, ordering:&[VertexId], radius:usize) -> Option<usize> {
    match checker(graph, ordering, radius) {
        CheckerResult::Ok(k) => Some(k),
        _ => None,
    }
}

/** true iff ordering is a permutation of the vertices of the graph and its
weak r-coloring number is exactly colnumber. Never modifies the graph. */
pub fn verify(graph:&Graph, ordering:&[VertexId], radius:usize, colnumber:usize) -> bool {
    checker(graph, ordering, radius) == CheckerResult::Ok(colnumber)
}

/** same as verify, with the ordering given by vertex labels.
Unknown labels make the verification fail. */
pub fn verify_labels<S:AsRef<str>>(graph:&Graph, ordering:&[S], radius:usize, colnumber:usize) -> bool {
    match graph.ids_of(ordering) {
        Ok(ids) => verify(graph, &ids, radius, colnumber),
        Err(_) => false,
    }
}

/** computes an optimal ordering by enumerating all permutations (Heap's algorithm).
Only usable for tiny graphs (n <= 9 or so). returns (weak r-coloring number, ordering) */
pub fn exhaustive_search(graph:&Graph, radius:usize) -> (usize, Vec<VertexId>) {
    let mut perm:Vec<VertexId> = graph.vertices().collect();
    let mut best_ordering = perm.clone();
    let mut best = weak_coloring_number(graph, &perm, radius).unwrap_or(0);
    let n = perm.len();
    let mut stack = vec![0 ; n];
    let mut i = 0;
    while i < n {
        if stack[i] < i {
            if i % 2 == 0 { perm.swap(0, i); } else { perm.swap(stack[i], i); }
            let k = wreach_sizes(graph, &perm, radius).into_iter().max().unwrap_or(0);
            if k < best {
                best = k;
                best_ordering = perm.clone();
            }
            stack[i] += 1;
            i = 0;
        } else {
            stack[i] = 0;
            i += 1;
        }
    }
    (best, best_ordering)
}
