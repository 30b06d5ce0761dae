//! Segment trie with precomputed key fallbacks.
//!
//! Every node consumes one path segment, either as a literal or as a key. A node may also have
//! a wildcard child, which consumes the rest of the path.
//!
//! Lookups never backtrack. When a literal lookup fails, the walk jumps straight to the node's
//! cached `fallback`: the key child of the nearest ancestor whose literal edge was followed to
//! get here. Jumping there reinterprets that ancestor's segment as a key, then the walk carries
//! on from the segment that follows it.
//!
//! Nodes live in an arena and refer to each other by [NodeId], so the fallback edge (which points
//! back up and across the tree) never owns anything.
use super::pattern::Token;
use std::{collections::HashMap, ops::Index};

/// Index of a node in a [Tree].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node, which always exists.
    pub const ROOT: Self = NodeId(0);
}

#[derive(Clone, Debug)]
pub struct Node<V> {
    /// Number of segments consumed to get here.
    pub(crate) depth: usize,
    pub(crate) literals: HashMap<String, NodeId>,
    pub(crate) key: Option<NodeId>,
    pub(crate) wildcard: Option<NodeId>,

    /// Where to go when no child accepts the next segment. Not an owning edge.
    pub(crate) fallback: Option<NodeId>,

    /// `(name, segment index)` of every key on the path to this node. Only meaningful at
    /// endpoints.
    pub(crate) keys: Vec<(String, usize)>,

    /// Present iff some pattern terminates here.
    pub(crate) value: Option<V>,
}

impl<V> Node<V> {
    fn new(depth: usize, fallback: Option<NodeId>) -> Self {
        Self {
            depth,
            literals: HashMap::new(),
            key: None,
            wildcard: None,
            fallback,
            keys: vec![],
            value: None,
        }
    }

    /// Returns true if a pattern terminates at this node.
    pub fn is_endpoint(&self) -> bool {
        self.value.is_some()
    }

    /// The fallback for a child reached over a literal (or wildcard) edge.
    fn literal_fallback(&self) -> Option<NodeId> {
        self.key.or(self.fallback)
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Edge {
    Literal,
    Key,
}

/// A trie of route patterns, each bound to a `V`.
#[derive(Clone, Debug)]
pub struct Tree<V> {
    nodes: Vec<Node<V>>,
    endpoints: usize,
}

impl<V> Default for Tree<V> {
    fn default() -> Self {
        Self {
            nodes: vec![Node::new(0, None)],
            endpoints: 0,
        }
    }
}

impl<V> Index<NodeId> for Tree<V> {
    type Output = Node<V>;

    #[inline]
    fn index(&self, id: NodeId) -> &Node<V> {
        &self.nodes[id.0]
    }
}

/// A successful walk of the tree.
#[derive(Debug)]
pub struct Found<'t, V> {
    /// The node that matched.
    pub node: NodeId,

    /// The value bound to the matched pattern.
    pub value: &'t V,

    /// `(name, segment index)` of every key in the matched pattern.
    pub keys: &'t [(String, usize)],

    /// If a wildcard matched, the index of the first segment it captured.
    pub rest: Option<usize>,
}

impl<V> Tree<V> {
    /// Number of distinct patterns stored in the tree.
    pub fn len(&self) -> usize {
        self.endpoints
    }

    /// Returns true if no pattern has been inserted.
    pub fn is_empty(&self) -> bool {
        self.endpoints == 0
    }

    /// Number of nodes in the tree, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<V> {
        &mut self.nodes[id.0]
    }

    /// Allocate a child of `parent`. The caller is responsible for attaching it.
    fn alloc(&mut self, parent: NodeId, edge: Edge) -> NodeId {
        let p = &self[parent];
        let fallback = match edge {
            Edge::Literal => p.literal_fallback(),
            // a key edge already used this level's alternative
            Edge::Key => p.fallback,
        };
        let node = Node::new(p.depth + 1, fallback);

        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn literal_child(&mut self, parent: NodeId, text: &str) -> NodeId {
        if let Some(&child) = self[parent].literals.get(text) {
            return child;
        }

        let child = self.alloc(parent, Edge::Literal);
        self.node_mut(parent).literals.insert(text.into(), child);
        child
    }

    fn key_child(&mut self, parent: NodeId) -> NodeId {
        if let Some(child) = self[parent].key {
            return child;
        }

        let child = self.alloc(parent, Edge::Key);
        self.node_mut(parent).key = Some(child);

        // every literal descendant of parent now has a nearer alternative
        self.relink(parent);
        child
    }

    fn wildcard_child(&mut self, parent: NodeId) -> NodeId {
        if let Some(child) = self[parent].wildcard {
            return child;
        }

        let child = self.alloc(parent, Edge::Literal);
        self.node_mut(parent).wildcard = Some(child);
        child
    }

    /// Insert a tokenized pattern, binding it to `value`.
    ///
    /// Existing prefixes are shared. If the pattern was already present, its value and key names
    /// are replaced, and the old value is returned.
    pub fn insert(&mut self, tokens: &[Token<'_>], value: V) -> (NodeId, Option<V>) {
        let mut n = NodeId::ROOT;
        let mut keys = vec![];

        for token in tokens {
            n = match *token {
                Token::Literal(text) => self.literal_child(n, text),

                Token::Key(name) => {
                    keys.push((name.to_owned(), self[n].depth));
                    self.key_child(n)
                }

                Token::Wildcard => {
                    n = self.wildcard_child(n);
                    break;
                }
            };
        }

        let node = self.node_mut(n);
        node.keys = keys;
        let old = node.value.replace(value);

        if old.is_none() {
            self.endpoints += 1;
        }

        (n, old)
    }

    /// Recompute the cached fallback of every node below `from`, given the fallback of `from`
    /// itself.
    ///
    /// Children over a literal or wildcard edge fall back to `from`'s key child if it has one,
    /// otherwise to wherever `from` falls back. The key child inherits `from`'s fallback
    /// unchanged, since reaching it already used that alternative.
    pub(crate) fn relink(&mut self, from: NodeId) {
        let mut stack = vec![from];

        while let Some(id) = stack.pop() {
            let node = &self[id];
            let via_key = node.fallback;
            let via_literal = node.literal_fallback();
            let key = node.key;

            let children: Vec<NodeId> = (node.literals.values())
                .copied()
                .chain(node.wildcard)
                .collect();

            for child in children {
                self.node_mut(child).fallback = via_literal;
                stack.push(child);
            }

            if let Some(child) = key {
                self.node_mut(child).fallback = via_key;
                stack.push(child);
            }
        }
    }

    /// Walk the tree along `segments`.
    ///
    /// At each node, a literal child is preferred over the key child, and the key child over the
    /// fallback. The deepest wildcard passed along the way is used if the walk doesn't end on an
    /// endpoint.
    pub fn find<S: AsRef<str>>(&self, segments: &[S]) -> Option<Found<'_, V>> {
        let count = segments.len();
        let mut last_wildcard: Option<NodeId> = None;
        let mut cursor = Some(NodeId::ROOT);

        while let Some(id) = cursor {
            let n = &self[id];
            if n.depth >= count {
                break;
            }

            if let Some(w) = n.wildcard {
                if last_wildcard.map_or(true, |lw| self[lw].depth < self[w].depth) {
                    last_wildcard = Some(w);
                }
            }

            let seg = segments[n.depth].as_ref();
            cursor = (n.literals.get(seg).copied())
                .or(n.key)
                .or(n.fallback);
        }

        // running out of segments on a node isn't a match unless a pattern ends there
        if let Some(id) = cursor.filter(|&id| self[id].is_endpoint()) {
            return self.found(id, None);
        }

        last_wildcard.and_then(|id| self.found(id, Some(self[id].depth - 1)))
    }

    fn found(&self, id: NodeId, rest: Option<usize>) -> Option<Found<'_, V>> {
        let n = &self[id];
        let value = n.value.as_ref()?;

        Some(Found {
            node: id,
            value,
            keys: &n.keys,
            rest,
        })
    }
}
