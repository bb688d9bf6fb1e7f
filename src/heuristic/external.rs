use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::WcolError;
use crate::heuristic::{
    HeuristicOption, OrderingProducer, OrderingRequest, Produced, Turbocharging,
    protocol::decode_output,
};

/// delay between two checks of a running child process
const POLL_INTERVAL:Duration = Duration::from_millis(10);

/**
runs a program and returns its standard output.
The child is killed when the deadline is reached, in which case None is returned.
A non-zero exit status is an error.
*/
pub fn run_with_deadline(program:&Path, args:&[String], deadline:Option<Instant>) -> Result<Option<String>, WcolError> {
    let program_name = program.display().to_string();
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|e| WcolError::Spawn { program: program_name.clone(), source: e })?;
    let mut stdout = match child.stdout.take() {
        Some(s) => s,
        None => return Err(WcolError::MalformedOutput(format!("no standard output for {}", program_name))),
    };
    // the pipe is drained in the background so that a verbose child never blocks on a full pipe
    let reader = thread::spawn(move || {
        let mut buf = String::new();
        stdout.read_to_string(&mut buf).map(|_| buf)
    });
    loop {
        let status = child.try_wait().map_err(|e| WcolError::io(program, e))?;
        if let Some(status) = status {
            let out = match reader.join() {
                Ok(Ok(out)) => out,
                Ok(Err(e)) => return Err(WcolError::io(program, e)),
                Err(_) => return Err(WcolError::MalformedOutput(
                    format!("unable to read the output of {}", program_name)
                )),
            };
            if !status.success() {
                return Err(WcolError::ProcessFailed { program: program_name, status });
            }
            return Ok(Some(out));
        }
        if deadline.map_or(false, |d| Instant::now() >= d) {
            log::debug!("deadline reached, killing {}", program_name);
            // the child may have exited in between: nothing left to kill then
            let _ = child.kill();
            let _ = child.wait();
            // the reader is not joined: grandchildren may still hold the pipe open
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/**
heuristic program run as a child process, speaking the text protocol decoded
by `protocol::decode_output`.
*/
#[derive(Debug, Clone)]
pub struct ExternalHeuristic {
    /// path of the executable
    program: PathBuf,
    /// graph file given to the program
    graph_path: PathBuf,
    /// strategy used by refinement calls
    turbocharging: Option<Turbocharging>,
    /// flags forwarded to refinement calls
    options: Vec<HeuristicOption>,
}

impl ExternalHeuristic {
    /// creates a heuristic calling program on the graph file graph_path
    pub fn new<P:Into<PathBuf>, Q:Into<PathBuf>>(program:P, graph_path:Q) -> Self {
        Self {
            program: program.into(),
            graph_path: graph_path.into(),
            turbocharging: None,
            options: Vec::new(),
        }
    }

    /// sets the turbocharging strategy of refinement calls
    pub fn with_turbocharging(mut self, turbocharging:Turbocharging) -> Self {
        self.turbocharging = Some(turbocharging);
        self
    }

    /// sets the flags forwarded to refinement calls
    pub fn with_options(mut self, options:&[HeuristicOption]) -> Self {
        self.options = options.to_vec();
        self
    }

    /** command line arguments of a call.
    initial call: `--in <graph> --rad <r>`.
    refinement call: `--<option>... --turbocharge<TC> --rad <r> --in <graph> --verbose [--c <c>] --k <k>`
    (`--c` is omitted for the swap strategies). */
    pub fn arguments(&self, request:&OrderingRequest) -> Vec<String> {
        let graph = self.graph_path.display().to_string();
        let radius = request.radius.to_string();
        let target = match request.target {
            None => return vec!["--in".to_string(), graph, "--rad".to_string(), radius],
            Some(t) => t,
        };
        let mut res:Vec<String> = self.options.iter().map(|o| format!("--{}", o)).collect();
        if let Some(tc) = self.turbocharging {
            res.push(format!("--turbocharge{}", tc.name()));
        }
        res.extend(vec!["--rad".to_string(), radius, "--in".to_string(), graph, "--verbose".to_string()]);
        if self.turbocharging.map_or(true, |tc| tc.takes_conservation()) {
            res.push("--c".to_string());
            res.push(target.c.to_string());
        }
        res.push("--k".to_string());
        res.push(target.k.to_string());
        res
    }
}

impl OrderingProducer for ExternalHeuristic {
    fn name(&self) -> String {
        self.program.display().to_string()
    }

    fn produce(&mut self, request:&OrderingRequest, deadline:Option<Instant>) -> Result<Produced, WcolError> {
        let args = self.arguments(request);
        log::debug!("running {} {}", self.program.display(), args.join(" "));
        match run_with_deadline(&self.program, &args, deadline)? {
            None => Ok(Produced::Cancelled),
            Some(out) => Ok(Produced::Output(decode_output(&out)?)),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    /// arguments of a `sh -c <script>` call
    fn shell(script:&str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[test]
    fn test_initial_arguments() {
        let h = ExternalHeuristic::new("./src/WreachHeuristic", "graphs/g.txt")
            .with_turbocharging(Turbocharging::Merge)
            .with_options(&[HeuristicOption::OrderedAdj]);
        assert_eq!(
            h.arguments(&OrderingRequest::initial(2)),
            vec!["--in", "graphs/g.txt", "--rad", "2"]
        );
    }

    #[test]
    fn test_refinement_arguments() {
        let h = ExternalHeuristic::new("./src/WreachHeuristic", "g.txt")
            .with_turbocharging(Turbocharging::Merge)
            .with_options(&[HeuristicOption::LowerBound, HeuristicOption::IgnoreRight]);
        assert_eq!(
            h.arguments(&OrderingRequest::refine(3, 7, 2)),
            vec![
                "--lower-bound", "--ignore-right", "--turbochargeMerge", "--rad", "3",
                "--in", "g.txt", "--verbose", "--c", "2", "--k", "7"
            ]
        );
        let h = ExternalHeuristic::new("./src/WreachHeuristic", "g.txt")
            .with_turbocharging(Turbocharging::SwapLS);
        assert_eq!(
            h.arguments(&OrderingRequest::refine(1, 4, 9)),
            vec!["--turbochargeSwapLS", "--rad", "1", "--in", "g.txt", "--verbose", "--k", "4"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_run_captures_output() {
        let out = run_with_deadline(Path::new("sh"), &shell("echo hello; echo world"), None).unwrap();
        assert_eq!(out, Some("hello\nworld\n".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_non_zero_exit() {
        let res = run_with_deadline(Path::new("sh"), &shell("echo partial; exit 3"), None);
        match res {
            Err(WcolError::ProcessFailed { status, .. }) => assert_eq!(status.code(), Some(3)),
            _ => panic!("expected a process failure"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_run_killed_at_deadline() {
        let start = Instant::now();
        let deadline = start + Duration::from_millis(200);
        let res = run_with_deadline(Path::new("sh"), &shell("sleep 10"), Some(deadline)).unwrap();
        assert_eq!(res, None);
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_missing_program() {
        let res = run_with_deadline(Path::new("./does/not/exist"), &[], None);
        assert!(matches!(res, Err(WcolError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_produce_through_script() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("FakeHeuristic");
        // succeeds only when asked for k = 2, and echoes the graph path as the ordering
        std::fs::write(&script, "#!/bin/sh\n\
            case \"$*\" in\n\
            *\"--k 2\"*) echo 2; echo \"$2\" ;;\n\
            *\"--k\"*) echo \"No success\"; echo \"Failed at position 1 from 3\" ;;\n\
            *) echo 3; echo \"$2\" ;;\n\
            esac\n\
            echo 1.5ms\n\
            echo \"Times turbocharged: 4\"\n\
            echo \"Time turbocharging: 0.5ms\"\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        let mut h = ExternalHeuristic::new(&script, "a")
            .with_turbocharging(Turbocharging::SwapN);
        // initial call: --in a --rad 1, $2 is the graph path
        match h.produce(&OrderingRequest::initial(1), None).unwrap() {
            Produced::Output(out) => {
                assert_eq!(out.colnumber(), Some(3));
                assert_eq!(out.ordering().unwrap(), &["a"]);
                assert_eq!(out.times_turbocharged, 4);
            },
            Produced::Cancelled => panic!("unexpected cancellation"),
        }
        match h.produce(&OrderingRequest::refine(1, 1, 1), None).unwrap() {
            Produced::Output(out) => assert_eq!(out.result, None),
            Produced::Cancelled => panic!("unexpected cancellation"),
        }
    }
}
