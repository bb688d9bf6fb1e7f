use std::collections::{HashMap, VecDeque};

use bit_set::BitSet;

/** Vertex Id */
pub type VertexId = usize;

/** models an undirected graph with labeled vertices.
Vertices are identified internally by their insertion index, and externally by
their label (as found in the graph file). Vertices can be removed, which is how
the peeling procedures (verification, reduction) consume a working copy.
*/
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// labels[v]: label of vertex v
    labels: Vec<String>,
    /// index[label]: vertex id of label
    index: HashMap<String, VertexId>,
    /// adj[v]: bitset of the neighbors of v
    adj: Vec<BitSet>,
    /// vertices that are still present in the graph
    alive: BitSet,
    /// nb edges
    m: usize,
}

/** result of a depth-bounded breadth-first search.
    order[0] is the source, parent[v] is the predecessor of v in the BFS tree.
*/
#[derive(Debug, Clone)]
pub struct BfsTree {
    /// visited vertices (in BFS order)
    order: Vec<VertexId>,
    /// parent of each visited vertex (None for the source)
    parent: HashMap<VertexId, Option<VertexId>>,
    /// distance from the source of each visited vertex
    depth: HashMap<VertexId, usize>,
}

impl BfsTree {
    /// visited vertices (source included), in BFS order
    pub fn vertices(&self) -> &[VertexId] { &self.order }

    /// number of visited vertices (source included)
    pub fn len(&self) -> usize { self.order.len() }

    /// true iff no vertex was visited (only happens for a removed source)
    pub fn is_empty(&self) -> bool { self.order.is_empty() }

    /// true iff v was reached
    pub fn contains(&self, v:VertexId) -> bool { self.parent.contains_key(&v) }

    /// distance between the source and v (if reached)
    pub fn depth(&self, v:VertexId) -> Option<usize> { self.depth.get(&v).copied() }

    /** path from the source to v in the BFS tree (source and v included).
    It is a shortest path between both in the graph the BFS ran on. */
    pub fn path_to(&self, v:VertexId) -> Option<Vec<VertexId>> {
        let mut res = vec![v];
        let mut current = v;
        loop {
            match self.parent.get(&current)? {
                None => break,
                Some(p) => {
                    res.push(*p);
                    current = *p;
                }
            }
        }
        res.reverse();
        Some(res)
    }
}

impl Graph {

    /// creates an empty graph
    pub fn new() -> Self { Self::default() }

    /// creates a graph from a list of edges given by labels
    pub fn from_edges<S:AsRef<str>>(edges:&[(S,S)]) -> Self {
        let mut res = Self::new();
        for (a,b) in edges {
            let u = res.add_vertex(a.as_ref());
            let v = res.add_vertex(b.as_ref());
            res.add_edge(u, v);
        }
        res
    }

    /// adds a vertex (if it does not exist yet) and returns its id
    pub fn add_vertex(&mut self, label:&str) -> VertexId {
        if let Some(v) = self.index.get(label) {
            return *v;
        }
        let v = self.labels.len();
        self.labels.push(label.to_string());
        self.index.insert(label.to_string(), v);
        self.adj.push(BitSet::default());
        self.alive.insert(v);
        v
    }

    /** adds the edge (u,v). Self-loops are ignored.
    returns true iff the edge was not present before */
    pub fn add_edge(&mut self, u:VertexId, v:VertexId) -> bool {
        if u == v || !self.contains(u) || !self.contains(v) { return false; }
        let inserted = self.adj[u].insert(v);
        self.adj[v].insert(u);
        if inserted { self.m += 1; }
        inserted
    }

    /// number of (remaining) vertices
    pub fn n(&self) -> usize { self.alive.len() }

    /// number of (remaining) edges
    pub fn m(&self) -> usize { self.m }

    /// number of vertex ids ever allocated (removed vertices included)
    pub fn capacity(&self) -> usize { self.labels.len() }

    /// true iff v is a vertex of the graph
    pub fn contains(&self, v:VertexId) -> bool { self.alive.contains(v) }

    /// remaining vertices, by increasing id (i.e. in order of appearance in the file)
    pub fn vertices(&self) -> impl Iterator<Item=VertexId> + '_ { self.alive.iter() }

    /// neighbors of vertex u
    pub fn neighbors(&self, u:VertexId) -> impl Iterator<Item=VertexId> + '_ { self.adj[u].iter() }

    /// degree of vertex u
    pub fn degree(&self, u:VertexId) -> usize { self.adj[u].len() }

    /// true iff u and v are adjacent
    pub fn are_adjacent(&self, u:VertexId, v:VertexId) -> bool {
        u < self.adj.len() && self.adj[u].contains(v)
    }

    /// edge list (u < v)
    pub fn edges(&self) -> Vec<(VertexId,VertexId)> {
        let mut res = Vec::with_capacity(self.m);
        for u in self.vertices() {
            for v in self.neighbors(u).filter(|v| u < *v) {
                res.push((u,v));
            }
        }
        res
    }

    /// label of vertex v
    pub fn label(&self, v:VertexId) -> &str { &self.labels[v] }

    /// id of a label (if it belongs to the graph)
    pub fn id(&self, label:&str) -> Option<VertexId> {
        self.index.get(label).copied().filter(|v| self.contains(*v))
    }

    /// maps a list of vertex ids to their labels
    pub fn labels_of(&self, vertices:&[VertexId]) -> Vec<String> {
        vertices.iter().map(|v| self.labels[*v].clone()).collect()
    }

    /** maps a list of labels to vertex ids.
    returns the first label that does not belong to the graph as an error */
    pub fn ids_of<S:AsRef<str>>(&self, labels:&[S]) -> Result<Vec<VertexId>, String> {
        labels.iter().map(|l| {
            self.id(l.as_ref()).ok_or_else(|| l.as_ref().to_string())
        }).collect()
    }

    /** removes vertex v (and its incident edges).
    Ids of other vertices stay valid. */
    pub fn remove_vertex(&mut self, v:VertexId) {
        if !self.alive.remove(v) { return; }
        let neighbors:Vec<VertexId> = self.adj[v].iter().collect();
        for w in &neighbors {
            self.adj[*w].remove(v);
        }
        self.m -= neighbors.len();
        self.adj[v].clear();
    }

    /** breadth-first search from source, visiting vertices at distance at most max_depth.
    Neighbors are explored by increasing id, which makes the BFS tree deterministic. */
    pub fn bfs(&self, source:VertexId, max_depth:usize) -> BfsTree {
        let mut res = BfsTree {
            order: Vec::new(),
            parent: HashMap::new(),
            depth: HashMap::new(),
        };
        if !self.contains(source) { return res; }
        let mut queue = VecDeque::new();
        res.order.push(source);
        res.parent.insert(source, None);
        res.depth.insert(source, 0);
        queue.push_back((source, 0));
        while let Some((u,d)) = queue.pop_front() {
            if d == max_depth { continue; }
            for w in self.neighbors(u) {
                if res.parent.contains_key(&w) { continue; }
                res.order.push(w);
                res.parent.insert(w, Some(u));
                res.depth.insert(w, d+1);
                queue.push_back((w, d+1));
            }
        }
        res
    }

    /// number of vertices at distance at most max_depth from source (source included)
    pub fn ball_size(&self, source:VertexId, max_depth:usize) -> usize {
        self.bfs(source, max_depth).len()
    }

    /// print statistics of the instance
    pub fn display_statistics(&self) {
        log::info!("\t{} \t vertices", self.n());
        log::info!("\t{} \t edges", self.m());
        let degrees:Vec<usize> = self.vertices().map(|v| self.degree(v)).collect();
        if let (Some(min), Some(max)) = (degrees.iter().min(), degrees.iter().max()) {
            log::info!("\t{} \t min degree", min);
            log::info!("\t{} \t max degree", max);
        }
    }
}


#[cfg(test)]
pub mod tests {
    use super::*;

    /// path graph A-B-C-D
    pub fn path4() -> Graph {
        Graph::from_edges(&[("A","B"), ("B","C"), ("C","D")])
    }

    /// cycle of length n (labels 0..n)
    pub fn cycle(n:usize) -> Graph {
        let labels:Vec<String> = (0..n).map(|i| i.to_string()).collect();
        let edges:Vec<(&str,&str)> = (0..n)
            .map(|i| (labels[i].as_str(), labels[(i+1)%n].as_str()))
            .collect();
        Graph::from_edges(&edges)
    }

    #[test]
    fn test_build_path() {
        let g = path4();
        assert_eq!(g.n(), 4);
        assert_eq!(g.m(), 3);
        assert_eq!(g.id("C"), Some(2));
        assert_eq!(g.label(3), "D");
        assert!(g.are_adjacent(1, 2));
        assert!(!g.are_adjacent(0, 2));
        assert_eq!(g.edges(), vec![(0,1), (1,2), (2,3)]);
    }

    #[test]
    fn test_self_loops_and_duplicates_ignored() {
        let g = Graph::from_edges(&[("a","a"), ("a","b"), ("b","a")]);
        assert_eq!(g.n(), 2);
        assert_eq!(g.m(), 1);
        assert_eq!(g.degree(0), 1);
    }

    #[test]
    fn test_remove_vertex() {
        let mut g = path4();
        g.remove_vertex(1);
        assert_eq!(g.n(), 3);
        assert_eq!(g.m(), 1);
        assert_eq!(g.degree(0), 0);
        assert_eq!(g.id("B"), None);
        assert_eq!(g.vertices().collect::<Vec<_>>(), vec![0,2,3]);
        // removing twice does nothing
        g.remove_vertex(1);
        assert_eq!(g.m(), 1);
    }

    #[test]
    fn test_bfs_depth_limit() {
        let g = path4();
        let t = g.bfs(0, 2);
        assert_eq!(t.vertices(), &[0,1,2]);
        assert_eq!(t.depth(2), Some(2));
        assert!(!t.contains(3));
        assert_eq!(t.path_to(2), Some(vec![0,1,2]));
        assert_eq!(t.path_to(3), None);
        assert_eq!(g.ball_size(1, 1), 3);
        assert_eq!(g.ball_size(1, 0), 1);
    }

    #[test]
    fn test_bfs_shortest_paths_on_cycle() {
        let g = cycle(6);
        let t = g.bfs(0, 3);
        assert_eq!(t.len(), 6);
        assert_eq!(t.depth(3), Some(3));
        assert_eq!(t.path_to(5), Some(vec![0,5]));
        assert_eq!(t.path_to(4).map(|p| p.len()), Some(3));
    }

    #[test]
    fn test_ids_of_unknown() {
        let g = path4();
        assert_eq!(g.ids_of(&["A","D"]), Ok(vec![0,3]));
        assert_eq!(g.ids_of(&["A","Z"]), Err("Z".to_string()));
    }
}
