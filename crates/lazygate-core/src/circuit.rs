//! Tree representation of boolean circuits.

use std::sync::Arc;

use crate::error::BuildError;
use crate::gate::GateKind;
use crate::leaf::{Constant, LeafValue};

/// A gate together with its ordered arguments.
#[derive(Debug, Clone)]
pub struct Gate {
    kind: GateKind,
    args: Vec<Arc<Node>>,
}

impl Gate {
    /// The gate's kind.
    pub fn kind(&self) -> GateKind {
        self.kind
    }

    /// Arguments in positional order.
    pub fn args(&self) -> &[Arc<Node>] {
        &self.args
    }
}

/// A node in the circuit tree.
///
/// Nodes are immutable once built. Gate arity is checked at construction, so
/// every node reachable from a [`Circuit`] is well formed.
#[derive(Debug, Clone)]
pub enum Node {
    /// A boolean value, possibly fetched lazily.
    Leaf(Arc<dyn LeafValue>),
    /// A gate over child nodes.
    Gate(Gate),
}

impl Node {
    /// Leaf holding a constant value.
    pub fn leaf(value: bool) -> Self {
        Node::Leaf(Arc::new(Constant(value)))
    }

    /// Leaf backed by an arbitrary value source.
    pub fn from_leaf(source: impl LeafValue + 'static) -> Self {
        Node::Leaf(Arc::new(source))
    }

    /// Gate of any kind, checking the argument count.
    pub fn gate(kind: GateKind, args: Vec<Node>) -> Result<Self, BuildError> {
        if let Some(expected) = kind.arity() {
            if args.len() != expected {
                return Err(BuildError::Arity {
                    kind,
                    expected,
                    found: args.len(),
                });
            }
        }
        Ok(Node::Gate(Gate {
            kind,
            args: args.into_iter().map(Arc::new).collect(),
        }))
    }

    pub fn and(args: Vec<Node>) -> Self {
        Self::unchecked(GateKind::And, args)
    }

    pub fn or(args: Vec<Node>) -> Self {
        Self::unchecked(GateKind::Or, args)
    }

    pub fn not(arg: Node) -> Self {
        Self::unchecked(GateKind::Not, vec![arg])
    }

    pub fn if_then_else(condition: Node, on_true: Node, on_false: Node) -> Self {
        Self::unchecked(GateKind::If, vec![condition, on_true, on_false])
    }

    /// True iff more than `threshold` arguments are true.
    pub fn gt(threshold: i64, args: Vec<Node>) -> Self {
        Self::unchecked(GateKind::Gt(threshold), args)
    }

    /// True iff fewer than `threshold` arguments are true.
    pub fn lt(threshold: i64, args: Vec<Node>) -> Self {
        Self::unchecked(GateKind::Lt(threshold), args)
    }

    /// Callers guarantee `args` matches the arity of `kind`.
    pub(crate) fn unchecked(kind: GateKind, args: Vec<Node>) -> Self {
        Node::Gate(Gate {
            kind,
            args: args.into_iter().map(Arc::new).collect(),
        })
    }

    /// Whether this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    fn depth(&self) -> usize {
        match self {
            Node::Leaf(_) => 0,
            Node::Gate(gate) => 1 + gate.args.iter().map(|a| a.depth()).max().unwrap_or(0),
        }
    }

    fn count(&self, leaves_only: bool) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Gate(gate) => {
                let below: usize = gate.args.iter().map(|a| a.count(leaves_only)).sum();
                if leaves_only {
                    below
                } else {
                    below + 1
                }
            }
        }
    }
}

/// A complete circuit, shared read-only between evaluation tasks.
#[derive(Debug, Clone)]
pub struct Circuit {
    root: Arc<Node>,
}

impl From<Node> for Circuit {
    fn from(root: Node) -> Self {
        Self::new(root)
    }
}

impl Circuit {
    /// Wrap a root node.
    pub fn new(root: Node) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    /// The root node.
    pub fn root(&self) -> &Arc<Node> {
        &self.root
    }

    /// Longest path from the root to a leaf, counted in gates.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Total number of nodes, leaves included.
    pub fn node_count(&self) -> usize {
        self.root.count(false)
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.root.count(true)
    }
}
