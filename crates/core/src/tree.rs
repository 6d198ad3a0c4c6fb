//! Huffman tree construction and bit-at-a-time decoding.
//!
//! Nodes live in an arena (`Vec<Node>`) and refer to children by index,
//! so dropping a tree never recurses, even for large alphabets.
//!
//! # Construction
//! Leaves enter a min-priority queue ordered by `(frequency, insertion
//! index)`. The two lowest are merged into an internal node carrying their
//! summed frequency until one node remains. The insertion index breaks
//! frequency ties, so identical input sequences always build identical
//! trees. The first node popped becomes the left (0) child.
//!
//! # Decoding
//! Starting at the root, each bit selects a branch (0 = left, 1 = right)
//! until a leaf is reached. Running out of bits mid-walk is a corrupt
//! stream, never a silent truncation.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::bitio::BitReader;
use crate::codebook::Code;
use crate::error::{HuffmanError, Result};

type NodeId = usize;

#[derive(Debug, Clone)]
struct Node<T> {
    frequency: u64,
    /// Some for leaves, None for internal nodes
    symbol: Option<T>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

/// A queue entry awaiting a merge.
///
/// Ordering is reversed on `(frequency, seq)` so that `BinaryHeap`, a
/// max-heap, pops the lowest-frequency earliest-seen entry first.
#[derive(Debug)]
struct Pending {
    frequency: u64,
    seq: u64,
    node: NodeId,
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .frequency
            .cmp(&self.frequency)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

/// An immutable Huffman coding tree over symbols of type `T`.
///
/// Built once from a frequency table; afterward it only answers traversal
/// queries ([`decode_symbol`](Self::decode_symbol), [`codes`](Self::codes),
/// [`height`](Self::height)).
#[derive(Debug, Clone)]
pub struct HuffmanTree<T> {
    nodes: Vec<Node<T>>,
    root: NodeId,
}

impl<T> HuffmanTree<T> {
    /// Build a tree from `(symbol, frequency)` pairs.
    ///
    /// Pair order is the tie-break order: when two nodes have equal
    /// frequency, the earlier one merges first and takes the left branch.
    ///
    /// A single-symbol alphabet gets a synthetic root above its one leaf,
    /// so the symbol still costs one bit and the stream always advances.
    ///
    /// # Errors
    /// Returns `HuffmanError::EmptyAlphabet` if `frequencies` is empty.
    pub fn from_frequencies<I>(frequencies: I) -> Result<Self>
    where
        I: IntoIterator<Item = (T, u64)>,
    {
        let mut nodes = Vec::new();
        let mut heap = BinaryHeap::new();

        for (seq, (symbol, frequency)) in frequencies.into_iter().enumerate() {
            let node = nodes.len();
            nodes.push(Node {
                frequency,
                symbol: Some(symbol),
                left: None,
                right: None,
            });
            heap.push(Pending {
                frequency,
                seq: seq as u64,
                node,
            });
        }

        if nodes.is_empty() {
            return Err(HuffmanError::EmptyAlphabet.into());
        }

        if nodes.len() == 1 {
            nodes.push(Node {
                frequency: nodes[0].frequency,
                symbol: None,
                left: Some(0),
                right: None,
            });
            return Ok(Self { nodes, root: 1 });
        }

        // Internal nodes continue the sequence numbering, so a merged
        // node always ranks after the leaves it absorbed.
        let mut seq = nodes.len() as u64;
        while let Some(first) = heap.pop() {
            match heap.pop() {
                Some(second) => {
                    let node = nodes.len();
                    let frequency = nodes[first.node]
                        .frequency
                        .saturating_add(nodes[second.node].frequency);
                    nodes.push(Node {
                        frequency,
                        symbol: None,
                        left: Some(first.node),
                        right: Some(second.node),
                    });
                    heap.push(Pending {
                        frequency,
                        seq,
                        node,
                    });
                    seq += 1;
                }
                None => return Ok(Self { nodes, root: first.node }),
            }
        }

        Err(HuffmanError::EmptyAlphabet.into())
    }

    /// Decode one symbol by walking the tree bit by bit.
    ///
    /// # Errors
    /// Returns `HuffmanError::CorruptStream` if the reader runs out of
    /// bits mid-walk or a bit selects a missing branch.
    pub fn decode_symbol(&self, reader: &mut BitReader<'_>) -> Result<&T> {
        let mut node = &self.nodes[self.root];
        loop {
            if let Some(symbol) = &node.symbol {
                return Ok(symbol);
            }

            let bit = reader.read_bit().map_err(|_| HuffmanError::CorruptStream {
                bit_position: reader.position(),
            })?;

            let next = if bit { node.right } else { node.left };
            match next {
                Some(child) => node = &self.nodes[child],
                None => {
                    return Err(HuffmanError::CorruptStream {
                        bit_position: reader.position(),
                    }
                    .into())
                }
            }
        }
    }

    /// Return the maximum leaf depth, which equals the longest codeword
    /// length in bits.
    pub fn height(&self) -> u32 {
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 0u32)];
        while let Some((node_id, depth)) = stack.pop() {
            let node = &self.nodes[node_id];
            if node.symbol.is_some() {
                max_depth = max_depth.max(depth);
                continue;
            }
            if let Some(left) = node.left {
                stack.push((left, depth + 1));
            }
            if let Some(right) = node.right {
                stack.push((right, depth + 1));
            }
        }
        max_depth
    }

    /// Walk root to leaf, assigning 0 per left branch and 1 per right
    /// branch. Each leaf's codeword length equals its depth.
    ///
    /// Leaves are listed left to right.
    ///
    /// # Errors
    /// Returns `HuffmanError::CodeTooLong` if any codeword would exceed
    /// 64 bits.
    pub fn codes(&self) -> Result<Vec<(T, Code)>>
    where
        T: Clone,
    {
        let mut assignments = Vec::new();
        let mut stack = vec![(self.root, 0u64, 0u32)];

        while let Some((node_id, bits, length)) = stack.pop() {
            let node = &self.nodes[node_id];
            if let Some(symbol) = &node.symbol {
                assignments.push((symbol.clone(), Code::new(bits, length as u8)));
                continue;
            }

            if length >= 64 {
                return Err(HuffmanError::CodeTooLong { length: length + 1 }.into());
            }

            // Right is pushed first so the left branch pops first
            if let Some(right) = node.right {
                stack.push((right, (bits << 1) | 1, length + 1));
            }
            if let Some(left) = node.left {
                stack.push((left, bits << 1, length + 1));
            }
        }

        Ok(assignments)
    }
}
