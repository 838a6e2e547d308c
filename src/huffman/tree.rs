use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::frequency::FrequencyTable;

/// Index of a node within [`HuffmanTree`]'s arena
pub type NodeId = usize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Leaf { symbol: char, weight: u64 },
    Internal { weight: u64, left: NodeId, right: NodeId },
}

impl Node {
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// Huffman tree stored as an arena of nodes.
///
/// Children are referenced by index and always precede their parent in the
/// arena, so the root is the last node pushed.
#[derive(Clone, Debug)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Build a tree from symbol frequencies; `None` for an empty table.
    ///
    /// Nodes are ordered by `(weight, arena index)`. Leaves enter the arena in
    /// ascending symbol order and merged nodes are appended as they are
    /// created, so equal weights resolve to the smaller symbol first and then
    /// to the older node. The first node extracted becomes the left child.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Option<Self> {
        let leaves = frequencies.sorted();
        if leaves.is_empty() {
            return None;
        }

        let mut nodes = Vec::with_capacity(2 * leaves.len() - 1);
        let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::with_capacity(leaves.len());

        for (symbol, weight) in leaves {
            heap.push(Reverse((weight, nodes.len())));
            nodes.push(Node::Leaf { symbol, weight });
        }

        while let Some(Reverse((left_weight, left))) = heap.pop() {
            let Some(Reverse((right_weight, right))) = heap.pop() else {
                // Last node standing is the root (a lone leaf for one symbol)
                return Some(Self { nodes, root: left });
            };

            let weight = left_weight + right_weight;
            heap.push(Reverse((weight, nodes.len())));
            nodes.push(Node::Internal { weight, left, right });
        }

        None
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn root_node(&self) -> &Node {
        self.node(self.root)
    }

    /// Total node count (leaves and internal nodes)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Weight of the root, i.e. the text length in symbols
    pub fn weight(&self) -> u64 {
        self.root_node().weight()
    }

    /// Depth of the deepest leaf (0 for a single-leaf tree)
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match self.node(id) {
                Node::Leaf { .. } => deepest = deepest.max(depth),
                Node::Internal { left, right, .. } => {
                    stack.push((*left, depth + 1));
                    stack.push((*right, depth + 1));
                }
            }
        }
        deepest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_for(text: &str) -> HuffmanTree {
        HuffmanTree::from_frequencies(&FrequencyTable::from_text(text)).unwrap()
    }

    #[test]
    fn test_empty_has_no_tree() {
        assert!(HuffmanTree::from_frequencies(&FrequencyTable::new()).is_none());
    }

    #[test]
    fn test_single_symbol_is_lone_leaf() {
        let tree = tree_for("xxxx");
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root_node(), &Node::Leaf { symbol: 'x', weight: 4 });
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn test_strict_binary_tree() {
        let tree = tree_for("abracadabra alakazam");
        let leaves = tree.leaf_count();
        // A strict binary tree with n leaves has n - 1 internal nodes
        assert_eq!(tree.len(), 2 * leaves - 1);
        for id in 0..tree.len() {
            if let Node::Internal { weight, left, right } = tree.node(id) {
                assert_eq!(*weight, tree.node(*left).weight() + tree.node(*right).weight());
                assert!(*left < id && *right < id);
            }
        }
    }

    #[test]
    fn test_root_weight_is_text_length() {
        let text = "mississippi river";
        assert_eq!(tree_for(text).weight(), text.chars().count() as u64);
    }

    #[test]
    fn test_tie_break_is_deterministic() {
        // a:3 b:2 c:1 -> c and b merge first (c left), then a joins on the left
        let tree = tree_for("aaabbc");
        let Node::Internal { left, right, weight } = tree.root_node() else {
            panic!("root should be internal");
        };
        assert_eq!(*weight, 6);
        assert_eq!(tree.node(*left), &Node::Leaf { symbol: 'a', weight: 3 });
        let Node::Internal { left: inner_left, right: inner_right, .. } = tree.node(*right) else {
            panic!("right child should be internal");
        };
        assert_eq!(tree.node(*inner_left), &Node::Leaf { symbol: 'c', weight: 1 });
        assert_eq!(tree.node(*inner_right), &Node::Leaf { symbol: 'b', weight: 2 });
    }

    #[test]
    fn test_skewed_frequencies_deepen_tree() {
        // Fibonacci-like weights produce a maximally unbalanced tree
        let mut text = String::new();
        for (symbol, count) in [('a', 1), ('b', 1), ('c', 2), ('d', 3), ('e', 5), ('f', 8)] {
            text.extend(std::iter::repeat(symbol).take(count));
        }
        assert_eq!(tree_for(&text).depth(), 5);
    }
}
