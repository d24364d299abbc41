//! Stop-ordering heuristics over a square weight matrix.
//!
//! All orderings start at stop 0 and are open paths: the return leg to the
//! start is not part of the result. MST-based orderings walk the tree in
//! depth-first preorder from stop 0.

use crate::traits::HeuristicKind;

/// Visiting order for `weights` under `heuristic`.
///
/// `weights` must be square: one row per stop, one column per stop.
pub fn order(heuristic: HeuristicKind, weights: &[Vec<f64>]) -> Vec<usize> {
    match heuristic {
        HeuristicKind::GreedyNearestNeighbor => greedy_path(weights),
        HeuristicKind::KruskalMst => preorder(&kruskal_mst(weights), 0),
        HeuristicKind::PrimMst => preorder(&prim_mst(weights), 0),
    }
}

/// Nearest unvisited neighbour, starting from stop 0. Ties go to the lower
/// index. Columns past the number of rows are ignored.
pub fn greedy_path(weights: &[Vec<f64>]) -> Vec<usize> {
    let n = weights.len();
    if n == 0 {
        return Vec::new();
    }

    let mut visited = vec![false; n];
    let mut path = Vec::with_capacity(n);
    visited[0] = true;
    path.push(0);

    while path.len() < n {
        let last = path[path.len() - 1];
        let mut next: Option<(usize, f64)> = None;
        for (candidate, &weight) in weights[last].iter().take(n).enumerate() {
            if visited[candidate] {
                continue;
            }
            if next.is_none_or(|(_, best)| weight < best) {
                next = Some((candidate, weight));
            }
        }
        let Some((candidate, _)) = next else {
            break;
        };
        visited[candidate] = true;
        path.push(candidate);
    }

    path
}

/// Minimum spanning tree by Kruskal's algorithm, as adjacency lists.
///
/// Edges are taken from the upper triangle and sorted stably by weight, so
/// equal-weight edges are considered in (i, j) order.
pub fn kruskal_mst(weights: &[Vec<f64>]) -> Vec<Vec<usize>> {
    let n = weights.len();
    let mut edges = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in i + 1..n {
            edges.push((edge_weight(weights, i, j), i, j));
        }
    }
    edges.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut sets = DisjointSets::new(n);
    let mut adjacency = vec![Vec::new(); n];
    for (_, u, v) in edges {
        if sets.union(u, v) {
            adjacency[u].push(v);
            adjacency[v].push(u);
        }
    }
    adjacency
}

/// Minimum spanning tree by Prim's algorithm grown from stop 0.
pub fn prim_mst(weights: &[Vec<f64>]) -> Vec<Vec<usize>> {
    let n = weights.len();
    let mut adjacency = vec![Vec::new(); n];
    if n == 0 {
        return adjacency;
    }

    let mut in_tree = vec![false; n];
    let mut best: Vec<f64> = (0..n).map(|v| edge_weight(weights, 0, v)).collect();
    let mut parent = vec![0; n];
    in_tree[0] = true;

    for _ in 1..n {
        let mut pick: Option<usize> = None;
        for v in 0..n {
            if in_tree[v] {
                continue;
            }
            if pick.is_none_or(|p| best[v] < best[p]) {
                pick = Some(v);
            }
        }
        let Some(v) = pick else {
            break;
        };

        in_tree[v] = true;
        adjacency[parent[v]].push(v);
        adjacency[v].push(parent[v]);

        for u in 0..n {
            if !in_tree[u] {
                let weight = edge_weight(weights, v, u);
                if weight < best[u] {
                    best[u] = weight;
                    parent[u] = v;
                }
            }
        }
    }

    adjacency
}

/// Depth-first preorder of a tree, visiting neighbours in list order.
pub fn preorder(adjacency: &[Vec<usize>], start: usize) -> Vec<usize> {
    if start >= adjacency.len() {
        return Vec::new();
    }

    let mut visited = vec![false; adjacency.len()];
    let mut order = Vec::with_capacity(adjacency.len());
    let mut stack = vec![start];

    while let Some(node) = stack.pop() {
        if visited[node] {
            continue;
        }
        visited[node] = true;
        order.push(node);
        for &neighbor in adjacency[node].iter().rev() {
            if !visited[neighbor] {
                stack.push(neighbor);
            }
        }
    }

    order
}

/// Sum of `weights` along consecutive stops of `path`.
pub fn path_total(path: &[usize], weights: &[Vec<f64>]) -> f64 {
    path.windows(2).map(|pair| weights[pair[0]][pair[1]]).sum()
}

/// Undirected weight between two stops, read from the upper triangle.
fn edge_weight(weights: &[Vec<f64>], a: usize, b: usize) -> f64 {
    if a <= b { weights[a][b] } else { weights[b][a] }
}

struct DisjointSets {
    parent: Vec<usize>,
    rank: Vec<u32>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = node;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    /// Merges the sets holding `a` and `b`. Returns false if already joined.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }
        match self.rank[root_a].cmp(&self.rank[root_b]) {
            std::cmp::Ordering::Greater => self.parent[root_b] = root_a,
            std::cmp::Ordering::Less => self.parent[root_a] = root_b,
            std::cmp::Ordering::Equal => {
                self.parent[root_b] = root_a;
                self.rank[root_a] += 1;
            }
        }
        true
    }
}
