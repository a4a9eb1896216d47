//! Frequency tabulation, Huffman tree construction, and code table derivation.
//!
//! The tree is a flat array of nodes addressed by index rather than a
//! pointer/`Rc` structure: leaves occupy `0..alphabet_size` in the same order
//! as the frequency table, internal nodes are appended as they're created,
//! and `-1` marks "no child"/"no parent", as other flat index-array
//! compressors do.

use crate::Error;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::io::Read;

/// One distinct byte value seen in the input, and how many times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyEntry {
    pub symbol: u8,
    pub weight: u64,
}

/// A node in the flat Huffman tree. `weight` is only meaningful during
/// construction; it is not part of the archive's on-disk representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeNode {
    pub left: i32,
    pub right: i32,
    pub parent: i32,
    pub weight: u64,
}

impl TreeNode {
    fn leaf(weight: u64) -> Self {
        Self { left: -1, right: -1, parent: -1, weight }
    }

    pub fn is_leaf(&self) -> bool {
        self.left == -1 && self.right == -1
    }
}

/// Count occurrences of each byte value in `input`. Order of the returned
/// entries matches ascending symbol value. Fails on an empty input: there is
/// no alphabet to build a tree from.
pub fn tabulate_frequencies<R: Read>(input: &mut R) -> Result<Vec<FrequencyEntry>, Error> {
    let mut counts = [0u64; 256];
    let mut buf = [0u8; 8192];
    loop {
        let n = input.read(&mut buf)?;
        if n == 0 {
            break;
        }
        for &b in &buf[..n] {
            counts[b as usize] += 1;
        }
    }
    let entries: Vec<FrequencyEntry> = counts
        .iter()
        .enumerate()
        .filter(|&(_, &w)| w > 0)
        .map(|(symbol, &weight)| FrequencyEntry { symbol: symbol as u8, weight })
        .collect();
    if entries.is_empty() {
        return Err(Error::EmptyInput);
    }
    Ok(entries)
}

/// Build the Huffman tree for `entries`. Leaves `0..entries.len()` correspond
/// 1:1 with `entries`; internal nodes follow in creation order. A
/// single-symbol alphabet yields a single leaf and no internal nodes.
///
/// Ties in the min-heap (two candidates with equal weight) are broken by
/// array index: the lower index is always popped first, which makes the
/// resulting tree fully deterministic for a given `entries` order.
pub fn build_tree(entries: &[FrequencyEntry]) -> Vec<TreeNode> {
    let n = entries.len();
    let node_count = if n <= 1 { n } else { 2 * n - 1 };
    let mut nodes: Vec<TreeNode> = entries.iter().map(|e| TreeNode::leaf(e.weight)).collect();
    nodes.resize(node_count, TreeNode::leaf(0));

    if n < 2 {
        return nodes;
    }

    let mut heap: BinaryHeap<Reverse<(u64, usize)>> = BinaryHeap::new();
    for i in 0..n {
        heap.push(Reverse((nodes[i].weight, i)));
    }
    for i in n..node_count {
        let Reverse((weight_a, a)) = heap.pop().expect("heap has at least two entries per iteration");
        let Reverse((weight_b, b)) = heap.pop().expect("heap has at least two entries per iteration");
        nodes[i].left = a as i32;
        nodes[i].right = b as i32;
        nodes[i].weight = weight_a + weight_b;
        nodes[a].parent = i as i32;
        nodes[b].parent = i as i32;
        heap.push(Reverse((nodes[i].weight, i)));
    }
    nodes
}

/// Derive each symbol's code by walking from its leaf to the root and
/// reversing, with `0` meaning "took the left child" and `1` meaning "took
/// the right child". A single-symbol alphabet has no internal nodes to walk,
/// so every table entry stays empty (see `codec::compress`'s n=1 fast path).
pub fn build_code_table(nodes: &[TreeNode], entries: &[FrequencyEntry]) -> Vec<Vec<bool>> {
    let mut table = vec![Vec::new(); 256];
    if entries.len() < 2 {
        return table;
    }
    for (leaf_index, entry) in entries.iter().enumerate() {
        let mut bits = Vec::new();
        let mut cur = leaf_index;
        while nodes[cur].parent != -1 {
            let parent = nodes[cur].parent as usize;
            bits.push(nodes[parent].right as usize == cur);
            cur = parent;
        }
        bits.reverse();
        table[entry.symbol as usize] = bits;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn empty_input_is_rejected() {
        let mut input = Cursor::new(Vec::<u8>::new());
        assert!(matches!(tabulate_frequencies(&mut input), Err(Error::EmptyInput)));
    }

    #[test]
    fn single_symbol_tree_has_one_leaf_and_no_code() {
        let mut input = Cursor::new(b"aaaa".to_vec());
        let entries = tabulate_frequencies(&mut input).unwrap();
        assert_eq!(entries, vec![FrequencyEntry { symbol: b'a', weight: 4 }]);
        let nodes = build_tree(&entries);
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].is_leaf());
        let table = build_code_table(&nodes, &entries);
        assert!(table[b'a' as usize].is_empty());
    }

    #[test]
    fn codes_are_prefix_free_and_shorter_for_frequent_symbols() {
        let mut input = Cursor::new(b"aaaaaaaabbbc".to_vec());
        let entries = tabulate_frequencies(&mut input).unwrap();
        let nodes = build_tree(&entries);
        assert_eq!(nodes.len(), 2 * entries.len() - 1);
        let table = build_code_table(&nodes, &entries);

        let code_a = &table[b'a' as usize];
        let code_b = &table[b'b' as usize];
        let code_c = &table[b'c' as usize];
        assert!(!code_a.is_empty() && !code_b.is_empty() && !code_c.is_empty());
        assert!(code_a.len() <= code_b.len());
        assert!(code_b.len() <= code_c.len());

        // No code is a prefix of another.
        let codes = [code_a, code_b, code_c];
        for (i, ci) in codes.iter().enumerate() {
            for (j, cj) in codes.iter().enumerate() {
                if i != j {
                    assert!(!cj.starts_with(ci));
                }
            }
        }
    }

    #[test]
    fn tie_break_prefers_lower_index() {
        // Four symbols with identical weight: the heap must pop indices
        // 0,1 before 2,3, making the tree shape deterministic.
        let entries = vec![
            FrequencyEntry { symbol: b'a', weight: 1 },
            FrequencyEntry { symbol: b'b', weight: 1 },
            FrequencyEntry { symbol: b'c', weight: 1 },
            FrequencyEntry { symbol: b'd', weight: 1 },
        ];
        let nodes = build_tree(&entries);
        // node 4 is the first internal node created, combining leaves 0 and 1.
        assert_eq!(nodes[4].left, 0);
        assert_eq!(nodes[4].right, 1);
    }
}
