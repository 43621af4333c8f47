//! Duplicate clustering via union-find.
//!
//! Confirmed-duplicate pairs form an undirected graph over sources; a cluster
//! is one connected component of size two or more. Duplication is
//! connectivity, not a single pairwise test: A≈B and B≈C cluster A, B and C
//! together even if A and C alone would not confirm.
//!
//! The disjoint-set arena gives near-linear construction and a final
//! partition that is independent of edge processing order.

/// One duplicate cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    /// Member source indices, ascending discovery order.
    pub members: Vec<usize>,
}

impl Cluster {
    /// Number of members. Always >= 2 for emitted clusters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True if the cluster has no members (never the case for emitted ones).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Disjoint-set forest over source indices.
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    /// Root of `x`, with path compression.
    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Merge the sets containing `a` and `b` (union by size).
    fn union(&mut self, a: usize, b: usize) {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
    }
}

/// Build clusters over `n` sources from confirmed-duplicate edges.
///
/// Singletons are dropped. Output ordering is deterministic: clusters sorted
/// by their first-discovered member, members ascending.
#[must_use]
pub fn build_clusters(n: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> Vec<Cluster> {
    let mut sets = DisjointSet::new(n);
    for (a, b) in edges {
        sets.union(a, b);
    }

    // Gather members per root. Iterating 0..n keeps members ascending and
    // lets the first member stand in as the cluster's discovery key.
    let mut by_root: Vec<Vec<usize>> = vec![Vec::new(); n];
    for i in 0..n {
        let root = sets.find(i);
        by_root[root].push(i);
    }

    let mut clusters: Vec<Cluster> = by_root
        .into_iter()
        .filter(|members| members.len() >= 2)
        .map(|members| Cluster { members })
        .collect();
    clusters.sort_by_key(|c| c.members[0]);

    log::debug!("{} cluster(s) over {} source(s)", clusters.len(), n);
    clusters
}
