use std::collections::HashMap;
use std::time::Instant;

use good_lp::{Expression, Variable, variable};

use crate::error::WcolError;
use crate::graph::{Graph, VertexId};
use crate::ilp::{Formulation, ModelAnswer, deadline_reached};

/**
radius-indexed reachability variables:
reach(u,v,d) = 1 iff v is weakly reachable from u within distance d,
i.e. through vertices processed after u.
*/
#[derive(Debug, Clone)]
pub struct RadiusReach {
    vars: HashMap<(VertexId,VertexId,usize), Variable>,
}

impl RadiusReach {
    /** adds the variables and the constraints:
     - reach(u,u,0) = 1
     - reach(u,v,d-1) <= reach(u,v,d)
     - for every edge (v,w) (both ways), u != w, d < radius:
       reach(u,v,d) + [u before w] <= 1 + reach(u,w,d+1)
     - ans >= sum_v reach(v,u,radius)
    */
    pub fn add_to(f:&mut Formulation, graph:&Graph, radius:usize) -> Self {
        let nodes = f.precedence.nodes().to_vec();
        let mut vars = HashMap::with_capacity(nodes.len() * nodes.len() * (radius+1));
        for u in &nodes {
            for v in &nodes {
                for d in 0..=radius {
                    vars.insert((*u,*v,d), f.vars.add(variable().binary()));
                }
            }
        }
        let res = Self { vars };
        for u in &nodes {
            f.constraints.push(Expression::from(res.var(*u,*u,0)).eq(1.));
            for v in &nodes {
                for d in 1..=radius {
                    let mut e = Expression::from(res.var(*u,*v,d-1));
                    e -= res.var(*u,*v,d);
                    f.constraints.push(e.leq(0.));
                }
            }
        }
        for (a,b) in graph.edges() {
            for (v,w) in [(a,b), (b,a)].iter() {
                for u in nodes.iter().filter(|u| *u != w) {
                    for d in 0..radius {
                        let mut e = Expression::from(res.var(*u,*v,d));
                        f.precedence.add_before(&mut e, 1., *u, *w);
                        e -= res.var(*u,*w,d+1);
                        f.constraints.push(e.leq(1.));
                    }
                }
            }
        }
        for u in &nodes {
            let mut counted = Expression::with_capacity(nodes.len());
            for v in &nodes {
                counted.add_mul(1., res.var(*v,*u,radius));
            }
            f.add_objective_bound(counted);
        }
        res
    }

    /// variable reach(u,v,d)
    pub fn var(&self, u:VertexId, v:VertexId, d:usize) -> Variable {
        self.vars[&(u,v,d)]
    }
}

/** full model: precedence variables with transitivity, and radius-indexed
reachability. */
pub fn build(graph:&Graph, radius:usize) -> Formulation {
    let nodes:Vec<VertexId> = graph.vertices().collect();
    let mut f = Formulation::new(&nodes);
    let transitivity = f.precedence.transitivity();
    f.constraints.extend(transitivity);
    RadiusReach::add_to(&mut f, graph, radius);
    f
}

/// solves the radius-indexed model in a single solver call
pub(crate) fn solve(graph:&Graph, radius:usize, cutoff:Option<usize>, deadline:Option<Instant>) -> Result<Option<ModelAnswer>, WcolError> {
    if deadline_reached(deadline) { return Ok(None); }
    let f = build(graph, radius);
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
