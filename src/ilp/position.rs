use std::collections::HashMap;
use std::time::Instant;

use good_lp::{Expression, Variable, variable};

use crate::error::WcolError;
use crate::graph::{Graph, VertexId};
use crate::ilp::{Formulation, ModelAnswer, deadline_reached, radius::RadiusReach};

/**
model with an integer position pos(v) in [1,n] per vertex, instead of the
transitivity constraints. Precedence variables follow the positions
(big-M form of the implications, with M = n):
    x(u,v) = 1  =>  pos(u) + 1 <= pos(v)
    x(u,v) = 0  =>  pos(v) + 1 <= pos(u)
Reachability is radius-indexed (see `radius`).
Meant to be used on a graph shrunk by the pendant vertex reduction.
*/
pub fn build(graph:&Graph, radius:usize) -> (Formulation, HashMap<VertexId, Variable>) {
    let nodes:Vec<VertexId> = graph.vertices().collect();
    let n = nodes.len() as f64;
    let mut f = Formulation::new(&nodes);
    let mut pos = HashMap::with_capacity(nodes.len());
    for v in &nodes {
        pos.insert(*v, f.vars.add(variable().integer().min(1).max(n)));
    }
    for (i,u) in nodes.iter().enumerate() {
        for v in &nodes[i+1..] {
            // pos(u) + 1 - pos(v) <= n (1 - x(u,v))
            let mut e = Expression::from(pos[u]);
            e -= pos[v];
            f.precedence.add_before(&mut e, n, *u, *v);
            f.constraints.push(e.leq(n - 1.));
            // pos(v) + 1 - pos(u) <= n x(u,v)
            let mut e = Expression::from(pos[v]);
            e -= pos[u];
            f.precedence.add_before(&mut e, -n, *u, *v);
            f.constraints.push(e.leq(-1.));
        }
    }
    RadiusReach::add_to(&mut f, graph, radius);
    (f, pos)
}

/// solves the position model in a single solver call
pub(crate) fn solve(graph:&Graph, radius:usize, cutoff:Option<usize>, deadline:Option<Instant>) -> Result<Option<ModelAnswer>, WcolError> {
    if deadline_reached(deadline) { return Ok(None); }
    if graph.n() == 0 {
        return Ok(Some(ModelAnswer { ordering: Vec::new(), wcol: 0, rounds: 0, cuts: 0 }));
    }
    let (f, _) = build(graph, radius);
    match f.solve(cutoff)? {
        None => Ok(None),
        Some((precedence, wcol, sol)) => Ok(Some(ModelAnswer {
            ordering: precedence.extract(&sol)?,
            wcol,
            rounds: 1,
            cuts: 0,
        })),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use crate::adjlist::read_from_file;
    use crate::graph::tests::{cycle, path4};
    use crate::ilp::{Encoding, IlpParams, solve_exact};
    use crate::ilp::tests::check_optimum;

    #[test]
    fn test_model_size() {
        let (f, pos) = build(&path4(), 1);
        assert_eq!(pos.len(), 4);
        // 6 pairs, 4 positions, 4*4*2 reachability variables, ans
        assert_eq!(f.vars.len(), 6 + 4 + 32 + 1);
        assert!(f.constraints.len() >= 12);
    }

    #[test]
    fn test_without_reduction() {
        // no pendant vertex: the model sees the whole graph
        assert_eq!(check_optimum(&cycle(5), 1, Encoding::Position).wcol, 3);
        check_optimum(&cycle(5), 2, Encoding::Position);
    }

    #[test]
    fn test_reduced_star_with_tail() {
        let g = read_from_file("insts/small/star_tail.txt").unwrap();
        // radius 1: only t2 is left to the model
        let sol = check_optimum(&g, 1, Encoding::Position);
        assert_eq!(sol.wcol, 2);
        assert_eq!(g.labels_of(&sol.ordering[1..]), vec!["t1", "c", "t3", "l3", "l2", "l1"]);
        // radius 2 with the optimum as lower bound
        let p = IlpParams { radius: 2, encoding: Encoding::Position, timeout: None, lowerbound: Some(3) };
        let sol = solve_exact(&g, &p, None).unwrap().unwrap();
        assert_eq!(sol.wcol, 3);
        assert_eq!(g.labels_of(&sol.ordering[5..]), vec!["t2", "t3"]);
    }

    #[test]
    fn test_path() {
        assert_eq!(check_optimum(&path4(), 1, Encoding::Position).wcol, 2);
        assert_eq!(check_optimum(&path4(), 2, Encoding::Position).wcol, 3);
    }
}
