use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use serde::Serialize;

use crate::error::WcolError;

/// decoder of the text protocol spoken by the heuristic programs
pub mod protocol;

/// heuristic programs run as child processes
pub mod external;

/// in-process degeneracy ordering
pub mod degeneracy;

/** heuristic programs able to produce an ordering */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heuristic {
    /// greedy on the weakly reachable sets
    WreachHeuristic,
    /// greedy on degrees
    DegreeHeuristic,
    /// greedy on degrees (ordering built right to left)
    DegreeHeuristicRL,
    /// greedy on the strongly reachable sets
    SreachHeuristic,
}

impl Heuristic {
    /// name of the executable implementing the heuristic
    pub fn program_name(&self) -> &'static str {
        match self {
            Self::WreachHeuristic => "WreachHeuristic",
            Self::DegreeHeuristic => "DegreeHeuristic",
            Self::DegreeHeuristicRL => "DegreeHeuristicRL",
            Self::SreachHeuristic => "SreachHeuristic",
        }
    }
}

impl FromStr for Heuristic {
    type Err = String;

    fn from_str(s:&str) -> Result<Self, Self::Err> {
        match s {
            "WreachHeuristic" => Ok(Self::WreachHeuristic),
            "DegreeHeuristic" => Ok(Self::DegreeHeuristic),
            "DegreeHeuristicRL" => Ok(Self::DegreeHeuristicRL),
            "SreachHeuristic" => Ok(Self::SreachHeuristic),
            _ => Err(format!("unknown heuristic {}", s)),
        }
    }
}

/** local improvement strategies the heuristic programs apply when they get stuck
below the target color number */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Turbocharging {
    /// merge
    Merge,
    /// last conservation
    LASTC,
    /// neighbor swaps
    SwapN,
    /// random neighborhood
    RNeigh,
    /// wreach based
    Wreach,
    /// swap local search
    SwapLS,
}

impl Turbocharging {
    /// strategy name, as expected in the `--turbocharge<name>` flag
    pub fn name(&self) -> &'static str {
        match self {
            Self::Merge => "Merge",
            Self::LASTC => "LASTC",
            Self::SwapN => "SwapN",
            Self::RNeigh => "RNeigh",
            Self::Wreach => "Wreach",
            Self::SwapLS => "SwapLS",
        }
    }

    /// swap strategies only take the target color number
    pub fn takes_conservation(&self) -> bool {
        !matches!(self, Self::SwapN | Self::SwapLS)
    }
}

impl FromStr for Turbocharging {
    type Err = String;

    fn from_str(s:&str) -> Result<Self, Self::Err> {
        match s {
            "Merge" => Ok(Self::Merge),
            "LASTC" => Ok(Self::LASTC),
            "SwapN" => Ok(Self::SwapN),
            "RNeigh" => Ok(Self::RNeigh),
            "Wreach" => Ok(Self::Wreach),
            "SwapLS" => Ok(Self::SwapLS),
            _ => Err(format!("unknown turbocharging strategy {}", s)),
        }
    }
}

/// boolean flags forwarded to the heuristic programs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeuristicOption {
    /// lower-bound
    LowerBound,
    /// only-reorder
    OnlyReorder,
    /// opt-components
    OptComponents,
    /// ordered-adj
    OrderedAdj,
    /// ignore-right
    IgnoreRight,
}

impl fmt::Display for HeuristicOption {
    fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::LowerBound => "lower-bound",
            Self::OnlyReorder => "only-reorder",
            Self::OptComponents => "opt-components",
            Self::OrderedAdj => "ordered-adj",
            Self::IgnoreRight => "ignore-right",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for HeuristicOption {
    type Err = String;

    fn from_str(s:&str) -> Result<Self, Self::Err> {
        match s {
            "lower-bound" => Ok(Self::LowerBound),
            "only-reorder" => Ok(Self::OnlyReorder),
            "opt-components" => Ok(Self::OptComponents),
            "ordered-adj" => Ok(Self::OrderedAdj),
            "ignore-right" => Ok(Self::IgnoreRight),
            _ => Err(format!("unknown heuristic option {}", s)),
        }
    }
}

/// target of a refinement call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    /// color number to reach
    pub k: usize,
    /// conservation parameter
    pub c: usize,
}

/** what is asked to a producer: an ordering for the given radius, reaching the
target if any (no target: any ordering) */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderingRequest {
    /// radius
    pub radius: usize,
    /// target color number (and conservation parameter)
    pub target: Option<Target>,
}

impl OrderingRequest {
    /// request without target
    pub fn initial(radius:usize) -> Self {
        Self { radius, target: None }
    }

    /// request for a color number of at most k
    pub fn refine(radius:usize, k:usize, c:usize) -> Self {
        Self { radius, target: Some(Target { k, c }) }
    }
}

/// one row of the turbocharging tracker printed by the heuristics in verbose mode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TcTrackerRow {
    /// nb nodes explored
    pub cnt_nodes: u64,
    /// nb depths explored
    #[serde(rename = "cnt_dephts")]
    pub cnt_depths: u64,
    /// sum of the depths
    pub sum_depth: u64,
    /// position the turbocharging was triggered at
    pub at: u64,
    /// nb vertices
    pub n: u64,
    /// time spent (ms)
    pub time: f64,
}

/** structured output of a heuristic call.
result is None when the heuristic reported no success at the requested target. */
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicOutput {
    /// color number and ordering (vertex labels)
    pub result: Option<(usize, Vec<String>)>,
    /// running time reported by the heuristic (ms)
    pub runtime_ms: f64,
    /// number of turbocharging calls
    pub times_turbocharged: u64,
    /// time spent turbocharging (ms)
    pub time_turbocharging_ms: f64,
    /// per-call trace
    pub tc_tracker: Vec<TcTrackerRow>,
}

impl HeuristicOutput {
    /// color number found (if any)
    pub fn colnumber(&self) -> Option<usize> {
        self.result.as_ref().map(|(k,_)| *k)
    }

    /// ordering found (if any)
    pub fn ordering(&self) -> Option<&[String]> {
        self.result.as_ref().map(|(_,o)| o.as_slice())
    }
}

/// outcome of a producer call
#[derive(Debug, Clone, PartialEq)]
pub enum Produced {
    /// the producer answered (possibly with a failure to reach the target)
    Output(HeuristicOutput),
    /// the deadline was reached before the producer answered
    Cancelled,
}

/**
Anything able to produce an ordering of a graph, given an optional target color
number. Implemented by the heuristic programs (run as child processes) and by
in-process heuristics.
*/
pub trait OrderingProducer {
    /// name used in the logs
    fn name(&self) -> String;

    /** produces an ordering. Must return Produced::Cancelled if the deadline is
    reached before an answer is available. */
    fn produce(&mut self, request:&OrderingRequest, deadline:Option<Instant>) -> Result<Produced, WcolError>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("SreachHeuristic".parse::<Heuristic>(), Ok(Heuristic::SreachHeuristic));
        assert_eq!(Heuristic::DegreeHeuristicRL.program_name(), "DegreeHeuristicRL");
        assert!("Sreach".parse::<Heuristic>().is_err());
        assert_eq!("LASTC".parse::<Turbocharging>(), Ok(Turbocharging::LASTC));
        assert_eq!("ordered-adj".parse::<HeuristicOption>(), Ok(HeuristicOption::OrderedAdj));
        assert_eq!(HeuristicOption::IgnoreRight.to_string(), "ignore-right");
    }

    #[test]
    fn test_swap_strategies_ignore_conservation() {
        assert!(!Turbocharging::SwapN.takes_conservation());
        assert!(!Turbocharging::SwapLS.takes_conservation());
        for tc in &[Turbocharging::Merge, Turbocharging::LASTC, Turbocharging::RNeigh, Turbocharging::Wreach] {
            assert!(tc.takes_conservation());
        }
    }
}
