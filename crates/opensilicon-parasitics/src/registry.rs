use std::collections::{BTreeMap, BTreeSet};

use opensilicon_core::{LayerId, Point, RoutePoint};
use serde::{Deserialize, Serialize};

/// A location in the routing space used to identify an electrical node.
///
/// Ordering is lexicographic on `(x, y, layer)` and only serves map keying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocationKey {
    pub x: i32,
    pub y: i32,
    pub layer: LayerId,
}

impl LocationKey {
    pub fn new(x: i32, y: i32, layer: LayerId) -> Self {
        Self { x, y, layer }
    }

    pub fn at(point: Point, layer: LayerId) -> Self {
        Self::new(point.x, point.y, layer)
    }
}

impl From<RoutePoint> for LocationKey {
    fn from(p: RoutePoint) -> Self {
        Self::new(p.x, p.y, p.layer)
    }
}

impl std::fmt::Display for LocationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.layer)
    }
}

/// Location to node map for a single net's build.
///
/// Internal nodes are created through a caller-supplied constructor that
/// receives the next synthetic id; ids start at zero and are never reused.
/// There is no removal: a registry lives for exactly one build.
#[derive(Debug)]
pub struct LocationKeyRegistry<N> {
    nodes: BTreeMap<LocationKey, N>,
    /// Keys whose node is a pin terminal rather than a grid or route node.
    terminals: BTreeSet<LocationKey>,
    next_id: u32,
}

impl<N: Copy> LocationKeyRegistry<N> {
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            terminals: BTreeSet::new(),
            next_id: 0,
        }
    }

    /// Return the node at `key`, creating and recording it if absent.
    pub fn ensure_node<E, F>(&mut self, key: LocationKey, create: F) -> Result<N, E>
    where
        F: FnOnce(u32) -> Result<N, E>,
    {
        if let Some(&node) = self.nodes.get(&key) {
            return Ok(node);
        }
        self.create_at(key, create)
    }

    /// Like [`ensure_node`](Self::ensure_node) but never resolves to a pin
    /// terminal: a terminal-held key is taken over by a fresh internal node.
    pub fn ensure_grid_node<E, F>(&mut self, key: LocationKey, create: F) -> Result<N, E>
    where
        F: FnOnce(u32) -> Result<N, E>,
    {
        match self.nodes.get(&key) {
            Some(&node) if !self.terminals.contains(&key) => Ok(node),
            _ => self.create_at(key, create),
        }
    }

    /// Record a pin's terminal node at its exact location. Returns `false`
    /// when the key was already claimed, in which case the first node stays.
    pub fn bind_terminal(&mut self, key: LocationKey, node: N) -> bool {
        if self.nodes.contains_key(&key) {
            return false;
        }
        self.nodes.insert(key, node);
        self.terminals.insert(key);
        true
    }

    fn create_at<E, F>(&mut self, key: LocationKey, create: F) -> Result<N, E>
    where
        F: FnOnce(u32) -> Result<N, E>,
    {
        let id = self.next_id;
        self.next_id += 1;
        let node = create(id)?;
        self.nodes.insert(key, node);
        self.terminals.remove(&key);
        Ok(node)
    }

    pub fn get(&self, key: &LocationKey) -> Option<N> {
        self.nodes.get(key).copied()
    }

    pub fn contains(&self, key: &LocationKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn is_terminal(&self, key: &LocationKey) -> bool {
        self.terminals.contains(key)
    }

    /// Number of synthetic ids handed out so far.
    pub fn ids_issued(&self) -> u32 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LocationKey, &N)> {
        self.nodes.iter()
    }
}

impl<N: Copy> Default for LocationKeyRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}
