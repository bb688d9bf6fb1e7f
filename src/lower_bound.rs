use std::cmp::Ordering;
use std::path::Path;
use std::time::Instant;

use priority_queue::PriorityQueue;

use crate::error::WcolError;
use crate::graph::{Graph, VertexId};
use crate::heuristic::external::run_with_deadline;

#[derive(PartialEq, Eq)]
struct PeelInfo {
    degree: usize,
    vertex: VertexId,
}

/// smallest degree first (ties: smallest id)
impl Ord for PeelInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        other.degree.cmp(&self.degree)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl PartialOrd for PeelInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/** repeatedly removes a vertex of minimum degree.
returns the vertices in removal order and the largest degree seen at removal
time (the degeneracy of the graph). */
pub fn degeneracy_peeling(graph:&Graph) -> (Vec<VertexId>, usize) {
    let mut queue:PriorityQueue<VertexId, PeelInfo> = PriorityQueue::new();
    for v in graph.vertices() {
        queue.push(v, PeelInfo { degree: graph.degree(v), vertex: v });
    }
    let mut removed = vec![false ; graph.capacity()];
    let mut order = Vec::with_capacity(graph.n());
    let mut degeneracy = 0;
    while let Some((v, info)) = queue.pop() {
        degeneracy = degeneracy.max(info.degree);
        removed[v] = true;
        order.push(v);
        for w in graph.neighbors(v).filter(|w| !removed[*w]) {
            queue.change_priority_by(&w, |p| { p.degree -= 1; });
        }
    }
    (order, degeneracy)
}

/** lower bound of the weak r-coloring number (for any r >= 1): the coloring
number, i.e. degeneracy + 1 (0 for the empty graph) */
pub fn degeneracy_lower_bound(graph:&Graph) -> usize {
    if graph.n() == 0 { return 0; }
    degeneracy_peeling(graph).1 + 1
}

/** reads the output of the lower bound program: lines "<label>: <integer>".
returns the largest value (0 if there is none). */
pub fn parse_lower_bound_output(out:&str) -> Result<usize, WcolError> {
    let mut res = 0;
    for line in out.lines().filter(|l| !l.trim().is_empty()) {
        let value = line.rsplit(": ").next()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .ok_or_else(|| WcolError::MalformedOutput(format!("lower bound line `{}`", line)))?;
        res = res.max(value);
    }
    Ok(res)
}

/// runs the lower bound program (`--in <graph> --rad <r>`) and reads its answer
pub fn external_lower_bound(program:&Path, graph_path:&Path, radius:usize, deadline:Option<Instant>) -> Result<Option<usize>, WcolError> {
    let args = vec![
        "--in".to_string(), graph_path.display().to_string(),
        "--rad".to_string(), radius.to_string(),
    ];
    match run_with_deadline(program, &args, deadline)? {
        None => Ok(None),
        Some(out) => Ok(Some(parse_lower_bound_output(&out)?)),
    }
}

/** lower bound used by the reduction: the external program's answer when it can
be run, the degeneracy bound otherwise (the best of both when available). */
pub fn lower_bound(graph:&Graph, program:&Path, graph_path:&Path, radius:usize) -> usize {
    let inner = degeneracy_lower_bound(graph);
    match external_lower_bound(program, graph_path, radius, None) {
        Ok(Some(lb)) => lb.max(inner),
        Ok(None) => inner,
        Err(e) => {
            log::warn!("lower bound program failed ({}), using the degeneracy bound", e);
            inner
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use crate::adjlist::read_from_file;
    use crate::graph::tests::{cycle, path4};
    use crate::wcol::exhaustive_search;

    #[test]
    fn test_peeling() {
        let g = path4();
        let (order, d) = degeneracy_peeling(&g);
        assert_eq!(d, 1);
        assert_eq!(order.len(), 4);
        assert_eq!(order[0], 0); // A has degree 1 and the smallest id
        assert_eq!(degeneracy_lower_bound(&cycle(6)), 3);
        let petersen = read_from_file("insts/small/petersen.txt").unwrap();
        assert_eq!(degeneracy_lower_bound(&petersen), 4);
        assert_eq!(degeneracy_lower_bound(&Graph::new()), 0);
    }

    #[test]
    fn test_degeneracy_bound_is_valid() {
        for g in &[path4(), cycle(5), read_from_file("insts/small/star_tail.txt").unwrap()] {
            for radius in 1..3 {
                assert!(degeneracy_lower_bound(g) <= exhaustive_search(g, radius).0);
            }
        }
    }

    #[test]
    fn test_parse_output() {
        let out = "Degeneracy: 3\nWCOL-UB-MMD+: 5\nWCOL-MMD+: 4\n\n";
        assert_eq!(parse_lower_bound_output(out).unwrap(), 5);
        assert_eq!(parse_lower_bound_output("").unwrap(), 0);
        assert!(parse_lower_bound_output("Degeneracy 3\n").is_err());
    }

    #[test]
    fn test_fallback_when_program_is_missing() {
        let g = cycle(5);
        let lb = lower_bound(&g, Path::new("./does/not/exist"), Path::new("g.txt"), 2);
        assert_eq!(lb, 3);
    }
}
