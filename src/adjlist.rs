use std::fs;
use std::path::Path;

use bit_set::BitSet;
use nom::IResult;
use nom::bytes::complete::is_not;
use nom::character::complete::{space0, space1};
use nom::combinator::all_consuming;
use nom::multi::separated_list0;
use nom::sequence::delimited;

use crate::error::WcolError;
use crate::graph::Graph;

/*
Adjacency list format: one line per vertex, the vertex label followed by
(some of) its neighbors. Everything after a '#' is a comment. An edge may be
listed on both endpoints' lines. Vertices are numbered by order of first
appearance (line head first, then its neighbors).
*/

/// reads a vertex label
fn read_label(s:&str) -> IResult<&str, &str> {
    is_not(" \t\r\n")(s)
}

/// reads a line (without comments) as a list of labels
pub fn read_adjacency_line(s:&str) -> IResult<&str, Vec<&str>> {
    all_consuming(delimited(space0, separated_list0(space1, read_label), space0))(s)
}

/// removes the comment part of a line
fn strip_comment(line:&str) -> &str {
    match line.find('#') {
        None => line,
        Some(pos) => &line[..pos],
    }
}

/// builds a graph from the content of an adjacency list file
pub fn parse_adjacency_list(content:&str, path:&Path) -> Result<Graph, WcolError> {
    let mut graph = Graph::new();
    for (i,line) in content.lines().enumerate() {
        let labels = match read_adjacency_line(strip_comment(line).trim_end_matches('\r')) {
            Ok((_,labels)) => labels,
            Err(_) => return Err(WcolError::MalformedGraph {
                path: path.to_path_buf(),
                line: i+1,
                content: line.to_string(),
            }),
        };
        let (head, neighbors) = match labels.split_first() {
            None => continue, // empty or comment line
            Some(e) => e,
        };
        let u = graph.add_vertex(head);
        for label in neighbors {
            let v = graph.add_vertex(label);
            if u == v {
                log::warn!("{}:{}: ignoring self-loop on {}", path.display(), i+1, head);
            }
            graph.add_edge(u, v);
        }
    }
    Ok(graph)
}

/// reads a graph from an adjacency list file
pub fn read_from_file<P:AsRef<Path>>(filename:P) -> Result<Graph, WcolError> {
    let path = filename.as_ref();
    let content = fs::read_to_string(path).map_err(|e| WcolError::io(path, e))?;
    parse_adjacency_list(&content, path)
}

/** writes a string encoding the graph. each edge is written once, on the line
of the first of its endpoints. */
pub fn graph_to_string(graph:&Graph) -> String {
    let mut res = String::default();
    res += format!("# {} vertices {} edges\n", graph.n(), graph.m()).as_str();
    let mut written = BitSet::with_capacity(graph.capacity());
    for u in graph.vertices() {
        res += graph.label(u);
        for v in graph.neighbors(u).filter(|v| !written.contains(*v)) {
            res += " ";
            res += graph.label(v);
        }
        res += "\n";
        written.insert(u);
    }
    res
}

/// writes a graph into a file
pub fn write_to_file<P:AsRef<Path>>(graph:&Graph, filename:P) -> Result<(), WcolError> {
    let path = filename.as_ref();
    fs::write(path, graph_to_string(graph)).map_err(|e| WcolError::io(path, e))
}


#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeSet;

    /// edges as a set of label pairs (sorted)
    fn label_edges(g:&Graph) -> BTreeSet<(String,String)> {
        g.edges().iter().map(|(u,v)| {
            let (a,b) = (g.label(*u).to_string(), g.label(*v).to_string());
            if a < b { (a,b) } else { (b,a) }
        }).collect()
    }

    #[test]
    fn test_read_line() {
        assert_eq!(read_adjacency_line("a b  c").unwrap().1, vec!["a","b","c"]);
        assert_eq!(read_adjacency_line("  x\t y ").unwrap().1, vec!["x","y"]);
        assert!(read_adjacency_line("").unwrap().1.is_empty());
        assert!(read_adjacency_line("a\rb").is_err());
    }

    #[test]
    fn test_read_instance() {
        let g = read_from_file("insts/small/cycle5.txt").unwrap();
        assert_eq!(g.n(), 5);
        assert_eq!(g.m(), 5);
        // order of first appearance
        assert_eq!(g.label(0), "0");
        assert_eq!(g.label(1), "1");
        assert_eq!(g.label(2), "4");
        assert!(g.vertices().all(|v| g.degree(v) == 2));
    }

    #[test]
    fn test_read_petersen() {
        let g = read_from_file("insts/small/petersen.txt").unwrap();
        assert_eq!(g.n(), 10);
        assert_eq!(g.m(), 15);
        assert!(g.vertices().all(|v| g.degree(v) == 3));
    }

    #[test]
    fn test_comments_and_self_loops() {
        let content = "# header\na b # trailing comment\n\nb b c\n";
        let g = parse_adjacency_list(content, Path::new("inline")).unwrap();
        assert_eq!(g.n(), 3);
        assert_eq!(g.m(), 2);
    }

    #[test]
    fn test_malformed_line() {
        let res = parse_adjacency_list("a b\nc\rd e\n", Path::new("inline"));
        match res {
            Err(WcolError::MalformedGraph { line, .. }) => assert_eq!(line, 2),
            _ => panic!("expected a malformed graph error"),
        }
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            read_from_file("insts/small/does_not_exist.txt"),
            Err(WcolError::Io { .. })
        ));
    }

    #[test]
    fn test_write_and_read_back() {
        let g = read_from_file("insts/small/petersen.txt").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("petersen.txt");
        write_to_file(&g, &path).unwrap();
        let h = read_from_file(&path).unwrap();
        assert_eq!(h.n(), g.n());
        assert_eq!(label_edges(&h), label_edges(&g));
        for v in g.vertices() {
            let w = h.id(g.label(v)).unwrap();
            assert_eq!(h.degree(w), g.degree(v));
        }
    }

    #[test]
    fn test_isolated_vertex_survives_writing() {
        let g = parse_adjacency_list("a b\nz\n", Path::new("inline")).unwrap();
        let h = parse_adjacency_list(&graph_to_string(&g), Path::new("inline")).unwrap();
        assert_eq!(h.n(), 3);
        assert_eq!(h.degree(h.id("z").unwrap()), 0);
    }
}
