//! Archive header: magic banner, node table, and frequency table.
//!
//! The original C++ implementation this format is descended from wrote the
//! tree and frequency table as host-native `long`s with no declared
//! endianness. That isn't a choice a Rust port can carry forward as-is, so
//! every integer field here is a fixed 32-bit little-endian value, and the
//! magic banner is bumped to say so.

use crate::huffman::{FrequencyEntry, TreeNode};
use crate::Error;
use std::io::{Read, Write};

pub const MAGIC: &[u8] = b"huffman zipped file version 2\n";

pub struct ParsedHeader {
    pub nodes: Vec<TreeNode>,
    pub entries: Vec<FrequencyEntry>,
}

pub fn write_header<W: Write>(
    out: &mut W,
    nodes: &[TreeNode],
    entries: &[FrequencyEntry],
) -> Result<(), Error> {
    out.write_all(MAGIC)?;
    let alphabet_size = i32::try_from(entries.len()).map_err(|_| Error::FileTooLarge)?;
    out.write_all(&alphabet_size.to_le_bytes())?;
    for node in nodes {
        out.write_all(&node.left.to_le_bytes())?;
        out.write_all(&node.right.to_le_bytes())?;
        out.write_all(&node.parent.to_le_bytes())?;
    }
    for entry in entries {
        out.write_all(&[entry.symbol])?;
        let weight = i32::try_from(entry.weight).map_err(|_| Error::FileTooLarge)?;
        out.write_all(&weight.to_le_bytes())?;
    }
    Ok(())
}

pub fn read_header<R: Read>(input: &mut R) -> Result<ParsedHeader, Error> {
    let mut banner = Vec::with_capacity(MAGIC.len());
    let mut byte = [0u8; 1];
    loop {
        match input.read(&mut byte) {
            Ok(0) => return Err(Error::BadMagic),
            Ok(_) => {
                banner.push(byte[0]);
                if byte[0] == b'\n' {
                    break;
                }
                if banner.len() > MAGIC.len() {
                    return Err(Error::BadMagic);
                }
            }
            Err(e) => return Err(Error::Io(e)),
        }
    }
    if banner != MAGIC {
        return Err(Error::BadMagic);
    }

    let alphabet_size = read_i32(input)?;
    if alphabet_size <= 0 || alphabet_size > 256 {
        return Err(Error::BadMagic);
    }
    let alphabet_size = alphabet_size as usize;
    let node_count = if alphabet_size == 1 { 1 } else { 2 * alphabet_size - 1 };

    let mut nodes = Vec::with_capacity(node_count);
    for _ in 0..node_count {
        let left = read_i32(input)?;
        let right = read_i32(input)?;
        let parent = read_i32(input)?;
        for index in [left, right, parent] {
            if index != -1 && (index < 0 || index as usize >= node_count) {
                return Err(Error::CorruptStream);
            }
        }
        nodes.push(TreeNode { left, right, parent, weight: 0 });
    }

    let mut entries = Vec::with_capacity(alphabet_size);
    for _ in 0..alphabet_size {
        let mut symbol = [0u8; 1];
        input.read_exact(&mut symbol).map_err(|_| Error::BadMagic)?;
        let weight = read_i32(input)?;
        if weight < 0 {
            return Err(Error::BadMagic);
        }
        entries.push(FrequencyEntry { symbol: symbol[0], weight: weight as u64 });
    }

    // Leaves occupy [0, alphabet_size) and nowhere else; a node outside that
    // range claiming to be a leaf (both children -1) would let the decoder
    // index `entries` out of bounds while walking the tree.
    for (index, node) in nodes.iter().enumerate() {
        if node.is_leaf() != (index < alphabet_size) {
            return Err(Error::CorruptStream);
        }
    }

    Ok(ParsedHeader { nodes, entries })
}

fn read_i32<R: Read>(input: &mut R) -> Result<i32, Error> {
    let mut buf = [0u8; 4];
    input.read_exact(&mut buf).map_err(|_| Error::BadMagic)?;
    Ok(i32::from_le_bytes(buf))
}
