use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use good_lp::{
    Constraint, Expression, ProblemVariables, ResolutionError, Solution, SolverModel,
    Variable, default_solver, variable,
};

use crate::error::WcolError;
use crate::graph::{Graph, VertexId};
use crate::heuristic::{OrderingProducer, OrderingRequest, Produced};
use crate::lower_bound::degeneracy_lower_bound;
use crate::reduction::reduce;
use crate::wcol::{checker, CheckerResult};

/// reachability indexed by radius
pub mod radius;

/// reachability without radius index, strengthened by lazy path cuts
pub mod allpaths;

/// position variables on the reduced graph
pub mod position;

/// available integer programming models
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// see `radius`
    Radius,
    /// see `allpaths`
    AllPaths,
    /// see `position`
    Position,
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s:&str) -> Result<Self, Self::Err> {
        match s {
            "radius" => Ok(Self::Radius),
            "allpaths" => Ok(Self::AllPaths),
            "position" => Ok(Self::Position),
            _ => Err(format!("unknown encoding {}", s)),
        }
    }
}

/**
precedence variables: one binary variable per pair of vertices, stored for
the pair (u,v) where u comes first in the vertex list. x(u,v) = 1 iff u is
processed before v; the reverse pair is read as 1 - x(u,v).
*/
#[derive(Debug, Clone)]
pub struct Precedence {
    /// vertices of the model
    nodes: Vec<VertexId>,
    /// vars[(u,v)]: u before v
    vars: HashMap<(VertexId,VertexId), Variable>,
}

impl Precedence {
    /// creates the precedence variables of the pairs of nodes
    pub fn new(problem:&mut ProblemVariables, nodes:&[VertexId]) -> Self {
        let mut vars = HashMap::new();
        for (i,u) in nodes.iter().enumerate() {
            for v in &nodes[i+1..] {
                vars.insert((*u,*v), problem.add(variable().binary()));
            }
        }
        Self { nodes: nodes.to_vec(), vars }
    }

    /// vertices of the model
    pub fn nodes(&self) -> &[VertexId] { &self.nodes }

    /// number of variables
    pub fn len(&self) -> usize { self.vars.len() }

    /// true iff there is no pair
    pub fn is_empty(&self) -> bool { self.vars.is_empty() }

    /// performs expr += coef * [a before b]
    pub fn add_before(&self, expr:&mut Expression, coef:f64, a:VertexId, b:VertexId) {
        match self.vars.get(&(a,b)) {
            Some(x) => expr.add_mul(coef, *x),
            None => {
                let x = self.vars[&(b,a)];
                *expr += coef;
                expr.add_mul(-coef, x);
            }
        }
    }

    /// expression [a before b]
    pub fn before(&self, a:VertexId, b:VertexId) -> Expression {
        let mut res = Expression::with_capacity(1);
        self.add_before(&mut res, 1., a, b);
        res
    }

    /** transitivity: for every triple u,v,w (in list order),
    0 <= x(u,v) + x(v,w) - x(u,w) <= 1 */
    pub fn transitivity(&self) -> Vec<Constraint> {
        let n = self.nodes.len();
        let mut res = Vec::new();
        for i in 0..n {
            for j in i+1..n {
                for k in j+1..n {
                    let (u,v,w) = (self.nodes[i], self.nodes[j], self.nodes[k]);
                    let mut e = Expression::with_capacity(3);
                    e.add_mul(1., self.vars[&(u,v)]);
                    e.add_mul(1., self.vars[&(v,w)]);
                    e.add_mul(-1., self.vars[&(u,w)]);
                    res.push(e.clone().geq(0.));
                    res.push(e.leq(1.));
                }
            }
        }
        res
    }

    /// true iff a is before b in the solution
    pub fn is_before<S:Solution>(&self, sol:&S, a:VertexId, b:VertexId) -> bool {
        match self.vars.get(&(a,b)) {
            Some(x) => sol.value(*x) >= 0.5,
            None => sol.value(self.vars[&(b,a)]) < 0.5,
        }
    }

    /** ordering encoded by a solution: u is placed at the rank given by the
    number of vertices before it. Fails if two vertices get the same rank. */
    pub fn extract<S:Solution>(&self, sol:&S) -> Result<Vec<VertexId>, WcolError> {
        let n = self.nodes.len();
        let mut res:Vec<Option<VertexId>> = vec![None ; n];
        for u in &self.nodes {
            let rank = self.nodes.iter()
                .filter(|v| *v != u && self.is_before(sol, **v, *u))
                .count();
            if let Some(w) = res[rank] {
                return Err(WcolError::Solver(format!(
                    "precedence values are not a total order ({} and {} share rank {})", w, u, rank
                )));
            }
            res[rank] = Some(*u);
        }
        Ok(res.into_iter().flatten().collect())
    }
}

/** a model under construction: variables, constraints, the objective variable
ans (weak r-coloring number) and the precedence variables. */
pub struct Formulation {
    /// variables
    pub vars: ProblemVariables,
    /// constraints
    pub constraints: Vec<Constraint>,
    /// objective
    pub ans: Variable,
    /// precedence variables
    pub precedence: Precedence,
}

impl fmt::Debug for Formulation {
    fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formulation")
            .field("variables", &self.vars.len())
            .field("constraints", &self.constraints.len())
            .finish()
    }
}

impl Formulation {
    /// creates the precedence variables and the objective of the vertices
    pub fn new(nodes:&[VertexId]) -> Self {
        let mut vars = ProblemVariables::new();
        let precedence = Precedence::new(&mut vars, nodes);
        let ans = vars.add(variable().integer().min(0).max(nodes.len() as f64));
        Self { vars, constraints: Vec::new(), ans, precedence }
    }

    /// ans >= counted (number of vertices reaching a given vertex)
    pub fn add_objective_bound(&mut self, counted:Expression) {
        self.constraints.push(counted.leq(self.ans));
    }

    /** minimizes ans. The cutoff (if any) is imposed as ans <= cutoff.
    returns the precedence variables, the value of ans and the solution,
    or None if the model is infeasible. */
    pub fn solve(self, cutoff:Option<usize>) -> Result<Option<(Precedence, usize, impl Solution)>, WcolError> {
        let Formulation { vars, constraints, ans, precedence } = self;
        log::info!("solving model: {} variables, {} constraints", vars.len(), constraints.len());
        let mut problem = vars.minimise(ans).using(default_solver);
        for c in constraints {
            problem.add_constraint(c);
        }
        if let Some(k) = cutoff {
            problem.add_constraint(Expression::from(ans).leq(k as f64));
        }
        match problem.solve() {
            Ok(sol) => {
                let value = sol.value(ans).round() as usize;
                Ok(Some((precedence, value, sol)))
            },
            Err(ResolutionError::Infeasible) => Ok(None),
            Err(e) => Err(WcolError::Solver(e.to_string())),
        }
    }
}

/// heuristic ordering given to the solver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarmStart {
    /// ordering
    pub ordering: Vec<VertexId>,
    /// its weak r-coloring number
    pub k: usize,
}

/** asks a producer for an initial ordering, and checks it.
returns None (and logs why) if the producer fails or its answer is wrong. */
pub fn warm_start<P:OrderingProducer + ?Sized>(graph:&Graph, producer:&mut P, radius:usize) -> Option<WarmStart> {
    let out = match producer.produce(&OrderingRequest::initial(radius), None) {
        Ok(Produced::Output(out)) => out,
        Ok(Produced::Cancelled) => return None,
        Err(e) => {
            log::warn!("no warm start ({}): {}", producer.name(), e);
            return None;
        }
    };
    let (k, labels) = out.result?;
    let ordering = match graph.ids_of(&labels) {
        Ok(ordering) => ordering,
        Err(label) => {
            log::warn!("no warm start: unknown vertex {}", label);
            return None;
        }
    };
    match checker(graph, &ordering, radius) {
        CheckerResult::Ok(real) if real == k => {
            log::info!("warm start ({}): {}", producer.name(), k);
            Some(WarmStart { ordering, k })
        },
        res => {
            log::warn!("no warm start: claimed {}, checker says {:?}", k, res);
            None
        }
    }
}

/// parameters of the exact solver
#[derive(Debug, Clone)]
pub struct IlpParams {
    /// radius
    pub radius: usize,
    /// model used
    pub encoding: Encoding,
    /// time budget, checked before each solver call
    pub timeout: Option<Duration>,
    /// lower bound used by the reduction (position model only; degeneracy bound if None)
    pub lowerbound: Option<usize>,
}

/// optimal ordering found by the exact solver
#[derive(Debug, Clone, PartialEq)]
pub struct ExactSolution {
    /// ordering
    pub ordering: Vec<VertexId>,
    /// weak r-coloring number (checked)
    pub wcol: usize,
    /// number of solver calls
    pub rounds: usize,
    /// number of lazy cuts added
    pub cuts: usize,
    /// time spent
    pub time: Duration,
}

/// raw answer of a model: ordering, claimed value, solver calls, cuts
pub(crate) struct ModelAnswer {
    pub(crate) ordering: Vec<VertexId>,
    pub(crate) wcol: usize,
    pub(crate) rounds: usize,
    pub(crate) cuts: usize,
}

/**
computes an optimal ordering with the chosen model, and checks it.
returns None if the time budget is exhausted before a solution is proven
optimal, or if the model is infeasible (which only happens with a wrong warm
start). A solution whose checked value differs from the model value is an error.
*/
pub fn solve_exact(graph:&Graph, params:&IlpParams, warm:Option<&WarmStart>) -> Result<Option<ExactSolution>, WcolError> {
    let start = Instant::now();
    let deadline = params.timeout.map(|t| start + t);
    let cutoff = warm.map(|w| w.k);
    if graph.n() == 0 {
        return Ok(Some(ExactSolution { ordering: Vec::new(), wcol: 0, rounds: 0, cuts: 0, time: start.elapsed() }));
    }
    let answer = match params.encoding {
        Encoding::Radius => radius::solve(graph, params.radius, cutoff, deadline)?,
        Encoding::AllPaths => allpaths::solve(graph, params.radius, cutoff, deadline)?,
        Encoding::Position => {
            let lowerbound = params.lowerbound.unwrap_or_else(|| degeneracy_lower_bound(graph));
            let (reduced, suffix) = reduce(graph, lowerbound, params.radius);
            position::solve(&reduced, params.radius, cutoff, deadline)?.map(|mut a| {
                a.ordering.extend_from_slice(&suffix);
                // removed vertices are reached at most lowerbound times
                if !suffix.is_empty() {
                    a.wcol = a.wcol.max(lowerbound);
                }
                a
            })
        },
    };
    let answer = match answer {
        None => {
            log::info!("no solution found");
            return Ok(None);
        },
        Some(a) => a,
    };
    match checker(graph, &answer.ordering, params.radius) {
        CheckerResult::Ok(k) if k == answer.wcol => {},
        res => return Err(WcolError::Verification(format!(
            "model value {} (radius {}), checker says {:?}", answer.wcol, params.radius, res
        ))),
    }
    Ok(Some(ExactSolution {
        ordering: answer.ordering,
        wcol: answer.wcol,
        rounds: answer.rounds,
        cuts: answer.cuts,
        time: start.elapsed(),
    }))
}

/// true iff the deadline (if any) is reached
pub(crate) fn deadline_reached(deadline:Option<Instant>) -> bool {
    deadline.map_or(false, |d| Instant::now() >= d)
}


#[cfg(test)]
pub mod tests {
    use super::*;

    use rand::{SeedableRng, rngs::StdRng};

    use crate::adjlist::read_from_file;
    use crate::graph::tests::{cycle, path4};
    use crate::heuristic::degeneracy::DegeneracyHeuristic;
    use crate::wcol::{exhaustive_search, tests::random_graph};

    /// star with 3 leaves
    pub fn claw() -> Graph {
        Graph::from_edges(&[("c","a"), ("c","b"), ("c","d")])
    }

    fn params(radius:usize, encoding:Encoding) -> IlpParams {
        IlpParams { radius, encoding, timeout: None, lowerbound: None }
    }

    /// solves with the given model and checks the optimum against exhaustive search
    pub fn check_optimum(g:&Graph, radius:usize, encoding:Encoding) -> ExactSolution {
        let sol = solve_exact(g, &params(radius, encoding), None).unwrap().unwrap();
        assert_eq!(sol.wcol, exhaustive_search(g, radius).0);
        assert_eq!(checker(g, &sol.ordering, radius), CheckerResult::Ok(sol.wcol));
        sol
    }

    #[test]
    fn test_encoding_names() {
        assert_eq!("allpaths".parse::<Encoding>(), Ok(Encoding::AllPaths));
        assert!("lazy".parse::<Encoding>().is_err());
    }

    #[test]
    fn test_empty_graph() {
        for encoding in &[Encoding::Radius, Encoding::AllPaths, Encoding::Position] {
            let sol = solve_exact(&Graph::new(), &params(2, *encoding), None).unwrap().unwrap();
            assert_eq!(sol.wcol, 0);
            assert!(sol.ordering.is_empty());
        }
    }

    #[test]
    fn test_warm_start() {
        let g = read_from_file("insts/small/star_tail.txt").unwrap();
        let mut producer = DegeneracyHeuristic::new(g.clone());
        let warm = warm_start(&g, &mut producer, 2).unwrap();
        assert_eq!(checker(&g, &warm.ordering, 2), CheckerResult::Ok(warm.k));
        let sol = solve_exact(&g, &params(2, Encoding::Radius), Some(&warm)).unwrap().unwrap();
        assert!(sol.wcol <= warm.k);
        assert_eq!(sol.wcol, exhaustive_search(&g, 2).0);
    }

    #[test]
    fn test_cutoff_below_optimum_is_infeasible() {
        let g = path4();
        let wrong = WarmStart { ordering: vec![0,1,2,3], k: 1 };
        for encoding in &[Encoding::Radius, Encoding::AllPaths] {
            assert_eq!(solve_exact(&g, &params(1, *encoding), Some(&wrong)).unwrap(), None);
        }
    }

    #[test]
    fn test_expired_timeout() {
        let g = cycle(5);
        for encoding in &[Encoding::Radius, Encoding::AllPaths, Encoding::Position] {
            let p = IlpParams { timeout: Some(Duration::from_secs(0)), ..params(1, *encoding) };
            assert_eq!(solve_exact(&g, &p, None).unwrap(), None);
        }
    }

    #[test]
    fn test_models_agree_on_random_graphs() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..4 {
            let g = random_graph(&mut rng, 5, 0.4);
            for radius in 1..3 {
                let optimum = exhaustive_search(&g, radius).0;
                for encoding in &[Encoding::Radius, Encoding::AllPaths, Encoding::Position] {
                    let sol = solve_exact(&g, &params(radius, *encoding), None).unwrap().unwrap();
                    assert_eq!(sol.wcol, optimum);
                }
            }
        }
    }
}
