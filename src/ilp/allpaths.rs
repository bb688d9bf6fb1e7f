use std::collections::HashMap;
use std::time::Instant;

use good_lp::{Expression, Solution, Variable, variable};

use crate::error::WcolError;
use crate::graph::{Graph, VertexId};
use crate::ilp::{Formulation, ModelAnswer, deadline_reached};

/**
path evidence: if source is processed before every other vertex of path
(a shortest path from source to target, of length at most the radius), target
is weakly reachable from source:
    sum_{x in path[1..]} [source before x] - (|path| - 2) <= reach(source,target)
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCut {
    /// vertex processed first
    pub source: VertexId,
    /// vertex reached
    pub target: VertexId,
    /// path from source to target (both included)
    pub path: Vec<VertexId>,
}

/**
model with one reachability variable per ordered pair, no radius index:
 - transitivity of the precedence variables
 - reach(u,u) = 1
 - reach(a,b) >= [a before b] for every edge (a,b), both ways
 - ans >= sum_v reach(v,u)
 - the path cuts found so far
returns the model and reach(v,u) for each pair.
*/
pub fn build(graph:&Graph, cuts:&[PathCut]) -> (Formulation, HashMap<(VertexId,VertexId), Variable>) {
    let nodes:Vec<VertexId> = graph.vertices().collect();
    let mut f = Formulation::new(&nodes);
    let transitivity = f.precedence.transitivity();
    f.constraints.extend(transitivity);
    let mut reach = HashMap::with_capacity(nodes.len() * nodes.len());
    for v in &nodes {
        for u in &nodes {
            reach.insert((*v,*u), f.vars.add(variable().binary()));
        }
    }
    for u in &nodes {
        f.constraints.push(Expression::from(reach[&(*u,*u)]).eq(1.));
    }
    for (a,b) in graph.edges() {
        for (v,w) in [(a,b), (b,a)].iter() {
            let mut e = f.precedence.before(*v, *w);
            e -= reach[&(*v,*w)];
            f.constraints.push(e.leq(0.));
        }
    }
    for u in &nodes {
        let mut counted = Expression::with_capacity(nodes.len());
        for v in &nodes {
            counted.add_mul(1., reach[&(*v,*u)]);
        }
        f.add_objective_bound(counted);
    }
    for cut in cuts {
        let mut e = Expression::with_capacity(cut.path.len());
        for x in &cut.path[1..] {
            f.precedence.add_before(&mut e, 1., cut.source, *x);
        }
        e -= reach[&(cut.source, cut.target)];
        f.constraints.push(e.leq((cut.path.len() - 2) as f64));
    }
    (f, reach)
}

/** cuts violated by an ordering: every vertex reached by v (when v is processed)
that the model does not count as reached from v. */
pub fn violated_cuts<F:Fn(VertexId,VertexId) -> bool>(graph:&Graph, ordering:&[VertexId], radius:usize, counted:F) -> Vec<PathCut> {
    let mut g = graph.clone();
    let mut res = Vec::new();
    for v in ordering {
        let tree = g.bfs(*v, radius);
        for u in tree.vertices().iter().filter(|u| **u != *v && !counted(*v, **u)) {
            if let Some(path) = tree.path_to(*u) {
                res.push(PathCut { source: *v, target: *u, path });
            }
        }
        g.remove_vertex(*v);
    }
    res
}

/**
lazy constraint loop: solves the model, reads the ordering of the solution,
and adds the path cuts it violates. Stops when the solution violates no cut:
the model value is then the weak r-coloring number of the ordering.
The model is rebuilt at each round with all the cuts found so far.
*/
pub(crate) fn solve(graph:&Graph, radius:usize, cutoff:Option<usize>, deadline:Option<Instant>) -> Result<Option<ModelAnswer>, WcolError> {
    let mut cuts:Vec<PathCut> = Vec::new();
    let mut rounds = 0;
    loop {
        if deadline_reached(deadline) { return Ok(None); }
        rounds += 1;
        let (f, reach) = build(graph, &cuts);
        let (precedence, wcol, sol) = match f.solve(cutoff)? {
            None => return Ok(None),
            Some(e) => e,
        };
        let ordering = precedence.extract(&sol)?;
        let new_cuts = violated_cuts(graph, &ordering, radius, |v,u| {
            sol.value(reach[&(v,u)]) >= 0.5
        });
        log::info!("round {}: integer solution {}, {} lazy cuts", rounds, wcol, new_cuts.len());
        if new_cuts.is_empty() {
            return Ok(Some(ModelAnswer { ordering, wcol, rounds, cuts: cuts.len() }));
        }
        cuts.extend(new_cuts);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use crate::graph::tests::{cycle, path4};
    use crate::ilp::Encoding;
    use crate::ilp::tests::{check_optimum, claw};

    #[test]
    fn test_violated_cuts() {
        let g = path4();
        // nothing counted: every pair reached gives a cut
        let cuts = violated_cuts(&g, &[0,1,2,3], 2, |v,u| v == u);
        let pairs:Vec<(VertexId,VertexId)> = cuts.iter().map(|c| (c.source, c.target)).collect();
        assert_eq!(pairs, vec![(0,1), (0,2), (1,2), (1,3), (2,3)]);
        assert_eq!(cuts[1].path, vec![0,1,2]);
        // everything counted
        assert!(violated_cuts(&g, &[0,1,2,3], 2, |_,_| true).is_empty());
    }

    #[test]
    fn test_model_without_cuts() {
        let (f, reach) = build(&cycle(4), &[]);
        assert_eq!(reach.len(), 16);
        assert_eq!(f.precedence.len(), 6);
    }

    #[test]
    fn test_path_and_cycle() {
        assert_eq!(check_optimum(&path4(), 1, Encoding::AllPaths).wcol, 2);
        let sol = check_optimum(&path4(), 2, Encoding::AllPaths);
        assert_eq!(sol.wcol, 3);
        assert!(sol.rounds >= 2);
        assert!(sol.cuts >= 1);
        assert_eq!(check_optimum(&cycle(5), 1, Encoding::AllPaths).wcol, 3);
        check_optimum(&cycle(5), 2, Encoding::AllPaths);
    }

    #[test]
    fn test_claw() {
        check_optimum(&claw(), 1, Encoding::AllPaths);
        check_optimum(&claw(), 2, Encoding::AllPaths);
    }
}
