use std::time::{Duration, Instant};

use serde::Serialize;

use crate::error::WcolError;
use crate::graph::Graph;
use crate::heuristic::{HeuristicOutput, OrderingProducer, OrderingRequest, Produced, TcTrackerRow};
use crate::wcol::{checker, CheckerResult};

/// parameters of the iterative refinement
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// radius
    pub radius: usize,
    /// wall-clock budget of the whole run
    pub timeout: Duration,
    /// name of the graph file (reported in the trace)
    pub file: String,
}

/// ordering accepted by the search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Improvement {
    /// seconds since the beginning of the search
    pub totaltime: f64,
    /// conservation parameter of the successful call (0 for the initial call)
    pub c: usize,
    /// ordering (vertex labels)
    pub ordering: Vec<String>,
    /// weak r-coloring number of the ordering
    pub k: usize,
    /// turbocharging calls made by the heuristic
    pub times_turbocharged: u64,
    /// heuristic running time (ms)
    pub time: f64,
    /// time spent turbocharging (ms)
    pub time_turbocharging: f64,
    /// per-call trace
    pub tc_tracker: Vec<TcTrackerRow>,
}

/// call that did not reach its target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NonImprovement {
    /// seconds since the beginning of the search
    pub totaltime: f64,
    /// conservation parameter of the call
    pub c: usize,
    /// target color number of the call
    pub k: usize,
    /// turbocharging calls made by the heuristic
    pub times_turbocharged: u64,
    /// heuristic running time (ms)
    pub time: f64,
    /// time spent turbocharging (ms)
    pub time_turbocharging: f64,
    /// per-call trace
    pub tc_tracker: Vec<TcTrackerRow>,
}

/** everything recorded during a search. Records are only appended. */
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchTrace {
    /// graph file name
    pub file: String,
    /// accepted orderings (strictly decreasing color numbers)
    pub improvements: Vec<Improvement>,
    /// failed refinement calls
    pub nonimprovements: Vec<NonImprovement>,
    /// conservation parameter of the last attempt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c_timeout: Option<usize>,
    /// error that stopped the search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// why the search stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    /// the deadline was reached
    TimedOut,
    /// the conservation parameter exceeded the number of vertices: nothing more to find
    Exhausted,
    /// the producer failed or returned an invalid ordering
    Errored(String),
}

/// result of a search
#[derive(Debug, Clone)]
pub struct SearchReport {
    /// trace of the search
    pub trace: SearchTrace,
    /// termination cause
    pub status: SearchStatus,
}

impl SearchReport {
    /// best ordering found (color number, ordering)
    pub fn best(&self) -> Option<(usize, &[String])> {
        self.trace.improvements.last().map(|i| (i.k, i.ordering.as_slice()))
    }
}

/// state of a running search
struct Search<'a, P:OrderingProducer + ?Sized> {
    graph: &'a Graph,
    producer: &'a mut P,
    params: &'a SearchParams,
    start: Instant,
    deadline: Instant,
    trace: SearchTrace,
}

impl<'a, P:OrderingProducer + ?Sized> Search<'a, P> {

    fn deadline_reached(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// checks the claimed color number of a produced ordering
    fn verify(&self, ordering:&[String], k:usize) -> Result<(), WcolError> {
        let ids = self.graph.ids_of(ordering).map_err(|label| WcolError::Verification(
            format!("{} returned unknown vertex {}", self.producer.name(), label)
        ))?;
        match checker(self.graph, &ids, self.params.radius) {
            CheckerResult::Ok(real) if real == k => Ok(()),
            res => Err(WcolError::Verification(format!(
                "{} claimed {} (radius {}), checker says {:?}",
                self.producer.name(), k, self.params.radius, res
            ))),
        }
    }

    fn record_improvement(&mut self, c:usize, k:usize, ordering:Vec<String>, out:HeuristicOutput) {
        log::info!("new best ordering");
        log::info!("weak r-coloring number: {}", k);
        log::info!("ordering: {}", ordering.join(" "));
        self.trace.improvements.push(Improvement {
            totaltime: self.start.elapsed().as_secs_f64(),
            c,
            ordering,
            k,
            times_turbocharged: out.times_turbocharged,
            time: out.runtime_ms,
            time_turbocharging: out.time_turbocharging_ms,
            tc_tracker: out.tc_tracker,
        });
    }

    fn record_nonimprovement(&mut self, c:usize, k:usize, out:HeuristicOutput) {
        self.trace.nonimprovements.push(NonImprovement {
            totaltime: self.start.elapsed().as_secs_f64(),
            c,
            k,
            times_turbocharged: out.times_turbocharged,
            time: out.runtime_ms,
            time_turbocharging: out.time_turbocharging_ms,
            tc_tracker: out.tc_tracker,
        });
    }

    fn run(&mut self) -> Result<SearchStatus, WcolError> {
        let radius = self.params.radius;
        // initial solution
        let mut out = match self.producer.produce(&OrderingRequest::initial(radius), Some(self.deadline))? {
            Produced::Cancelled => return Ok(SearchStatus::TimedOut),
            Produced::Output(out) => out,
        };
        let (mut best, ordering) = out.result.take().ok_or_else(|| WcolError::MalformedOutput(
            format!("{} found no initial ordering", self.producer.name())
        ))?;
        self.verify(&ordering, best)?;
        self.record_improvement(0, best, ordering, out);
        // refinement
        loop {
            if best == 0 { return Ok(SearchStatus::Exhausted); }
            let target = best - 1;
            let mut c = 1;
            loop {
                self.trace.c_timeout = Some(c);
                if self.deadline_reached() { return Ok(SearchStatus::TimedOut); }
                if c > self.graph.n() {
                    log::info!("no ordering of weak {}-coloring number {} found", radius, target);
                    return Ok(SearchStatus::Exhausted);
                }
                log::info!("conservation parameter: {}", c);
                let request = OrderingRequest::refine(radius, target, c);
                let mut out = match self.producer.produce(&request, Some(self.deadline))? {
                    Produced::Cancelled => return Ok(SearchStatus::TimedOut),
                    Produced::Output(out) => out,
                };
                match out.result.take() {
                    Some((k, ordering)) => {
                        self.verify(&ordering, k)?;
                        if k >= best {
                            return Err(WcolError::Verification(format!(
                                "{} returned color number {} for target {}",
                                self.producer.name(), k, target
                            )));
                        }
                        best = k;
                        self.record_improvement(c, k, ordering, out);
                        break;
                    },
                    None => {
                        self.record_nonimprovement(c, target, out);
                        c += 1;
                    }
                }
            }
        }
    }
}

/**
Iterative refinement around an ordering producer.

1. asks for an initial ordering (no target), checks it and records it (c = 0)
2. asks for an ordering of color number best-1 with conservation parameter
   c = 1, 2, ... until the producer succeeds (c goes back to 1 with the new
   target) or c exceeds the number of vertices (exhausted)

The whole run is bounded by params.timeout; a call in flight when the deadline
is reached is cancelled. Every accepted ordering is checked; an ordering that
fails the check stops the search (status Errored), as does a producer failure.
The trace is always returned, whatever the termination cause.
*/
pub fn iterative_refinement<P:OrderingProducer + ?Sized>(graph:&Graph, producer:&mut P, params:&SearchParams) -> SearchReport {
    let start = Instant::now();
    let mut search = Search {
        graph,
        producer,
        params,
        start,
        deadline: start + params.timeout,
        trace: SearchTrace { file: params.file.clone(), ..SearchTrace::default() },
    };
    let status = match search.run() {
        Ok(status) => status,
        Err(e) => {
            log::error!("{}", e);
            search.trace.error = Some(e.to_string());
            SearchStatus::Errored(e.to_string())
        }
    };
    log::info!("search stopped: {:?}", status);
    SearchReport { trace: search.trace, status }
}
