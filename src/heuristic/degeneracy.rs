use std::time::Instant;

use crate::error::WcolError;
use crate::graph::{Graph, VertexId};
use crate::heuristic::{HeuristicOutput, OrderingProducer, OrderingRequest, Produced};
use crate::lower_bound::degeneracy_peeling;
use crate::wcol::weak_coloring_number;

/** degeneracy ordering: reverse of the minimum-degree peeling order, so that
every vertex has few neighbors before it.
It gives the coloring number for radius 1, and a reasonable ordering for
larger radii. */
pub fn degeneracy_ordering(graph:&Graph) -> Vec<VertexId> {
    let mut res = degeneracy_peeling(graph).0;
    res.reverse();
    res
}

/**
In-process producer returning the degeneracy ordering. It has a single answer:
a refinement call succeeds only if that ordering already reaches the target.
*/
#[derive(Debug, Clone)]
pub struct DegeneracyHeuristic {
    graph: Graph,
}

impl DegeneracyHeuristic {
    /// creates the producer for a graph
    pub fn new(graph:Graph) -> Self {
        Self { graph }
    }
}

impl OrderingProducer for DegeneracyHeuristic {
    fn name(&self) -> String {
        "Degeneracy".to_string()
    }

    fn produce(&mut self, request:&OrderingRequest, deadline:Option<Instant>) -> Result<Produced, WcolError> {
        if deadline.map_or(false, |d| Instant::now() >= d) {
            return Ok(Produced::Cancelled);
        }
        let start = Instant::now();
        let ordering = degeneracy_ordering(&self.graph);
        let k = weak_coloring_number(&self.graph, &ordering, request.radius)
            .ok_or_else(|| WcolError::Verification("degeneracy ordering is not a permutation".to_string()))?;
        let reached = request.target.map_or(true, |t| k <= t.k);
        Ok(Produced::Output(HeuristicOutput {
            result: if reached { Some((k, self.graph.labels_of(&ordering))) } else { None },
            runtime_ms: start.elapsed().as_secs_f64() * 1000.,
            times_turbocharged: 0,
            time_turbocharging_ms: 0.,
            tc_tracker: Vec::new(),
        }))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use crate::adjlist::read_from_file;
    use crate::graph::tests::cycle;
    use crate::wcol::verify_labels;

    #[test]
    fn test_degeneracy_ordering_radius_one() {
        // radius 1: the degeneracy ordering is optimal (degeneracy + 1)
        let g = read_from_file("insts/small/petersen.txt").unwrap();
        let ordering = degeneracy_ordering(&g);
        assert_eq!(weak_coloring_number(&g, &ordering, 1), Some(4));
        assert_eq!(weak_coloring_number(&cycle(7), &degeneracy_ordering(&cycle(7)), 1), Some(3));
    }

    #[test]
    fn test_produce() {
        let g = read_from_file("insts/small/star_tail.txt").unwrap();
        let mut h = DegeneracyHeuristic::new(g.clone());
        let k = match h.produce(&OrderingRequest::initial(2), None).unwrap() {
            Produced::Output(out) => {
                let (k, ordering) = out.result.unwrap();
                assert!(verify_labels(&g, &ordering, 2, k));
                k
            },
            Produced::Cancelled => panic!("unexpected cancellation"),
        };
        // no better ordering to offer
        match h.produce(&OrderingRequest::refine(2, k-1, 1), None).unwrap() {
            Produced::Output(out) => assert_eq!(out.result, None),
            Produced::Cancelled => panic!("unexpected cancellation"),
        }
        // expired deadline
        assert_eq!(
            h.produce(&OrderingRequest::initial(2), Some(Instant::now())).unwrap(),
            Produced::Cancelled
        );
    }
}
