use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// errors raised while reading instances, driving heuristics or solving the exact model
#[derive(Debug, Error)]
pub enum WcolError {
    /// file could not be read or written
    #[error("unable to access `{path}`: {source}")]
    Io {
        /// offending path
        path: PathBuf,
        /// underlying error
        #[source]
        source: std::io::Error,
    },
    /// a line of a graph file could not be parsed
    #[error("{path}:{line}: malformed adjacency line `{content}`")]
    MalformedGraph {
        /// graph file
        path: PathBuf,
        /// line number (starting at 1)
        line: usize,
        /// line content
        content: String,
    },
    /// a label does not belong to the graph
    #[error("unknown vertex `{0}`")]
    UnknownVertex(String),
    /// an external program could not be started
    #[error("unable to run `{program}`: {source}")]
    Spawn {
        /// program path
        program: String,
        /// underlying error
        #[source]
        source: std::io::Error,
    },
    /// an external program returned a non-zero exit status
    #[error("`{program}` exited with {status}")]
    ProcessFailed {
        /// program path
        program: String,
        /// exit status
        status: ExitStatus,
    },
    /// the output of an external program does not follow its protocol
    #[error("malformed output: {0}")]
    MalformedOutput(String),
    /// an ordering failed the ground-truth check
    #[error("verification failed: {0}")]
    Verification(String),
    /// the MIP solver failed
    #[error("solver error: {0}")]
    Solver(String),
    /// results could not be serialized
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl WcolError {
    /// wraps an I/O error with the path it occurred on
    pub fn io<P:Into<PathBuf>>(path:P, source:std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
