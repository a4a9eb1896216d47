//! Static Huffman byte compression with a self-describing archive format.
//!
//! Compression makes a single pass over the input to count byte frequencies,
//! builds one Huffman tree for the whole input, writes that tree into the
//! archive header, then encodes the input against it. Decompression reads
//! the header to reconstruct the identical tree and walks it bit by bit.
//! There is no adaptive retraining and no canonical code packing: the tree
//! that goes into the header is exactly the tree used to encode.

pub mod bitio;
pub mod codec;
pub mod header;
pub mod huffman;

use std::io::Cursor;

/// Everything that can go wrong building, reading, or walking a bit stream
/// or Huffman archive.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("negative value is not allowed here")]
    NegativeValue,
    #[error("bit width must be non-negative and no wider than the value's type")]
    InvalidWidth,
    #[error("ld_max_width must be between 0 and 8 inclusive")]
    InvalidLdMaxWidth,
    #[error("value needs more bits than ld_max_width can describe")]
    ValueOutOfRange,
    #[error("decoded variable-width length exceeds the target type's width")]
    ValueTypeTooNarrow,
    #[error("value must be strictly positive")]
    ZeroNotAllowed,
    #[error("cannot unread more bits than were just read")]
    UnreadTooMany,
    #[error("bit position counter overflowed")]
    PositionOverflow,
    #[error("unexpected end of input")]
    UnexpectedEOF,
    #[error("input is empty; there is no alphabet to build a tree from")]
    EmptyInput,
    #[error("archive header is missing or carries an unrecognized magic banner")]
    BadMagic,
    #[error("corrupt Huffman stream: tree traversal reached a missing child")]
    CorruptStream,
    #[error("corrupt Huffman stream: bits remain after the declared bit count but don't reach a leaf")]
    TrailingPartialCode,
    #[error("symbol has no assigned code")]
    UnencodableSymbol,
    #[error("value does not fit the archive's 32-bit wire format")]
    FileTooLarge,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Compress `data` in memory, returning the archive bytes.
pub fn compress_slice(data: &[u8]) -> Result<Vec<u8>, Error> {
    let mut input = Cursor::new(data);
    let mut output = Cursor::new(Vec::new());
    codec::compress(&mut input, &mut output)?;
    Ok(output.into_inner())
}

/// Decompress an in-memory archive, returning the original bytes.
pub fn decompress_slice(data: &[u8]) -> Result<Vec<u8>, Error> {
    let mut input = Cursor::new(data);
    let mut output = Cursor::new(Vec::new());
    codec::decompress(&mut input, &mut output)?;
    Ok(output.into_inner())
}
