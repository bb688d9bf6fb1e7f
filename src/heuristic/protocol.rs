use nom::IResult;
use nom::bytes::complete::tag;
use nom::character::complete::{space0, space1, u64 as read_u64};
use nom::combinator::{all_consuming, map};
use nom::number::complete::double;
use nom::sequence::{delimited, preceded, terminated, tuple};

use crate::adjlist::read_adjacency_line;
use crate::error::WcolError;
use crate::heuristic::{HeuristicOutput, TcTrackerRow};

/*
Output of the heuristic programs (standard output):
    line 0: color number            (or "No success")
    line 1: ordering (labels)       (or "Failed at position <i> from <n>")
    line 2: <runtime>ms
    line 3: Times turbocharged: <int>
    line 4: Time turbocharging: <float>ms
    then (verbose mode) one tracker row per turbocharging call:
        cnt_nodes cnt_depths sum_depth at n time
*/

/// marker of a call that did not reach the target
const NO_SUCCESS:&str = "No success";

/// reads "<float>ms"
fn read_runtime(s:&str) -> IResult<&str, f64> {
    all_consuming(delimited(space0, terminated(double, tag("ms")), space0))(s)
}

/// reads "Times turbocharged: <int>"
fn read_times_turbocharged(s:&str) -> IResult<&str, u64> {
    all_consuming(delimited(
        space0,
        preceded(tuple((tag("Times turbocharged:"), space0)), read_u64),
        space0,
    ))(s)
}

/// reads "Time turbocharging: <float>ms"
fn read_time_turbocharging(s:&str) -> IResult<&str, f64> {
    all_consuming(delimited(
        space0,
        preceded(tuple((tag("Time turbocharging:"), space0)), terminated(double, tag("ms"))),
        space0,
    ))(s)
}

/// reads the color number line
fn read_colnumber(s:&str) -> IResult<&str, u64> {
    all_consuming(delimited(space0, read_u64, space0))(s)
}

/// reads a tracker row (5 integers, then a float)
fn read_tracker_row(s:&str) -> IResult<&str, TcTrackerRow> {
    all_consuming(delimited(
        space0,
        map(
            tuple((
                terminated(read_u64, space1),
                terminated(read_u64, space1),
                terminated(read_u64, space1),
                terminated(read_u64, space1),
                terminated(read_u64, space1),
                double,
            )),
            |(cnt_nodes, cnt_depths, sum_depth, at, n, time)| TcTrackerRow {
                cnt_nodes, cnt_depths, sum_depth, at, n, time
            }
        ),
        space0,
    ))(s)
}

/// runs a line parser, reporting the line on failure
fn parse_line<'a, T, F>(lines:&[&'a str], i:usize, parser:F) -> Result<T, WcolError>
where F: Fn(&'a str) -> IResult<&'a str, T> {
    let line = *lines.get(i).ok_or_else(|| WcolError::MalformedOutput(
        format!("missing line {} (got {} lines)", i+1, lines.len())
    ))?;
    match parser(line) {
        Ok((_, res)) => Ok(res),
        Err(_) => Err(WcolError::MalformedOutput(format!("line {}: `{}`", i+1, line))),
    }
}

/** decodes the standard output of a heuristic program.
Any output containing "No success" is a failure to reach the target: only the
statistics (lines 2 to 4) and the tracker rows are read. */
pub fn decode_output(out:&str) -> Result<HeuristicOutput, WcolError> {
    let lines:Vec<&str> = out.lines().collect();
    let runtime_ms = parse_line(&lines, 2, read_runtime)?;
    let times_turbocharged = parse_line(&lines, 3, read_times_turbocharged)?;
    let time_turbocharging_ms = parse_line(&lines, 4, read_time_turbocharging)?;
    let mut tc_tracker = Vec::new();
    for (i,line) in lines.iter().enumerate().skip(5) {
        if line.trim().is_empty() { continue; }
        tc_tracker.push(parse_line(&lines, i, read_tracker_row)?);
    }
    let result = if out.contains(NO_SUCCESS) {
        None
    } else {
        let k = parse_line(&lines, 0, read_colnumber)? as usize;
        let ordering = parse_line(&lines, 1, read_adjacency_line)?;
        Some((k, ordering.into_iter().map(|l| l.to_string()).collect()))
    };
    Ok(HeuristicOutput { result, runtime_ms, times_turbocharged, time_turbocharging_ms, tc_tracker })
}
