//! Encoder/decoder engines: drives the header codec and bit stream together
//! into the `compress`/`decompress` entry points.
//!
//! Grounded on `huffman_data_encode`/`huffman_data_decode` from the C++
//! source this format is descended from: write a placeholder bit count,
//! encode, then seek back and patch in the real count; on decode, walk the
//! tree bit by bit from the root, emitting a symbol and resetting to the
//! root each time a leaf is reached, until the declared bit count is
//! consumed.

use crate::bitio::{BitReader, BitWriter};
use crate::header::{read_header, write_header};
use crate::huffman::{build_code_table, build_tree, tabulate_frequencies};
use crate::Error;
use std::io::{Read, Seek, SeekFrom, Write};

/// Compress all of `input` into `output`. Returns `(bytes_read, bytes_written)`.
///
/// `input` is read twice (once to tabulate frequencies, once to encode), so
/// it must support seeking back to the start.
pub fn compress<R: Read + Seek, W: Write + Seek>(
    input: &mut R,
    output: &mut W,
) -> Result<(u64, u64), Error> {
    input.seek(SeekFrom::Start(0))?;
    let entries = tabulate_frequencies(input)?;
    let in_size = input.stream_position()?;
    input.seek(SeekFrom::Start(0))?;
    log::debug!("tabulated {} distinct symbols over {} bytes", entries.len(), in_size);

    let nodes = build_tree(&entries);
    let code_table = build_code_table(&nodes, &entries);
    log::debug!("built tree with {} nodes", nodes.len());

    write_header(output, &nodes, &entries)?;
    let bit_count_pos = output.stream_position()?;
    output.write_all(&0i32.to_le_bytes())?;
    log::trace!("header written, bit count placeholder at offset {}", bit_count_pos);

    let bit_count = if entries.len() < 2 {
        // A single-symbol alphabet carries its whole payload in the
        // frequency table's weight; there is nothing left to encode.
        log::debug!("single-symbol alphabet, skipping bit encoding");
        0u64
    } else {
        let mut writer = BitWriter::new(&mut *output);
        for byte in (&mut *input).bytes() {
            let byte = byte?;
            let code = &code_table[byte as usize];
            if code.is_empty() {
                log::error!("symbol {byte:#04x} has no assigned code");
                return Err(Error::UnencodableSymbol);
            }
            for &bit in code {
                writer.write_bool(bit)?;
            }
        }
        let count = writer.position();
        writer.flush()?;
        count
    };
    log::debug!("encoded {} bits", bit_count);

    let bit_count_i32 = i32::try_from(bit_count).map_err(|_| Error::FileTooLarge)?;
    output.seek(SeekFrom::Start(bit_count_pos))?;
    output.write_all(&bit_count_i32.to_le_bytes())?;
    output.seek(SeekFrom::End(0))?;
    let out_size = output.stream_position()?;

    Ok((in_size, out_size))
}

/// Decompress an archive from `input` into `output`. Returns
/// `(bytes_read, bytes_written)`.
pub fn decompress<R: Read + Seek, W: Write + Seek>(
    input: &mut R,
    output: &mut W,
) -> Result<(u64, u64), Error> {
    let header = read_header(input)?;
    log::debug!("header read, alphabet size {}", header.entries.len());
    let mut bit_count_buf = [0u8; 4];
    input.read_exact(&mut bit_count_buf)?;
    let bit_count = i32::from_le_bytes(bit_count_buf);
    if bit_count < 0 {
        log::error!("negative bit count {bit_count} in header");
        return Err(Error::CorruptStream);
    }
    let bit_count = bit_count as u64;

    if header.entries.len() < 2 {
        let entry = header.entries[0];
        log::debug!("single-symbol alphabet, replicating {:#04x} {} times", entry.symbol, entry.weight);
        let buf = vec![entry.symbol; entry.weight as usize];
        output.write_all(&buf)?;
        let in_size = input.stream_position()?;
        return Ok((in_size, entry.weight));
    }

    let root = header.nodes.len() - 1;
    let mut cursor = root;
    let mut out_size = 0u64;
    let mut reader = BitReader::new(&mut *input);

    while reader.position() < bit_count {
        let bit = reader.read_bool()?;
        let node = &header.nodes[cursor];
        let next = if bit { node.right } else { node.left };
        if next < 0 {
            log::error!("tree traversal demanded missing child at node {cursor}");
            return Err(Error::CorruptStream);
        }
        cursor = next as usize;
        if header.nodes[cursor].is_leaf() {
            output.write_all(&[header.entries[cursor].symbol])?;
            out_size += 1;
            cursor = root;
        }
    }
    if cursor != root {
        log::error!("bit count exhausted mid-code, cursor at node {cursor}");
        return Err(Error::TrailingPartialCode);
    }
    log::debug!("decoded {} bytes from {} bits", out_size, bit_count);

    let in_size = input.stream_position()?;
    Ok((in_size, out_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn round_trip(data: &[u8]) {
        let mut input = Cursor::new(data.to_vec());
        let mut packed = Cursor::new(Vec::new());
        compress(&mut input, &mut packed).unwrap();

        packed.set_position(0);
        let mut restored = Cursor::new(Vec::new());
        decompress(&mut packed, &mut restored).unwrap();

        assert_eq!(restored.into_inner(), data);
    }

    #[test]
    fn round_trips_typical_text() {
        round_trip(b"the quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn round_trips_single_symbol_input() {
        round_trip(&vec![b'x'; 37]);
    }

    #[test]
    fn round_trips_two_symbol_input() {
        round_trip(b"ababababababab");
    }

    #[test]
    fn round_trips_all_byte_values() {
        let data: Vec<u8> = (0..=255u8).collect();
        round_trip(&data);
    }

    #[test]
    fn empty_input_is_rejected() {
        let mut input = Cursor::new(Vec::<u8>::new());
        let mut output = Cursor::new(Vec::new());
        assert!(matches!(compress(&mut input, &mut output), Err(Error::EmptyInput)));
    }

    #[test]
    fn truncated_archive_is_rejected() {
        let mut input = Cursor::new(b"abracadabra".to_vec());
        let mut packed = Cursor::new(Vec::new());
        compress(&mut input, &mut packed).unwrap();

        let mut truncated = packed.into_inner();
        truncated.truncate(truncated.len() - 2);
        let mut cursor = Cursor::new(truncated);
        let mut restored = Cursor::new(Vec::new());
        assert!(decompress(&mut cursor, &mut restored).is_err());
    }

    #[test]
    fn two_symbol_payload_packs_to_the_expected_byte() {
        // "abab": equal weights, so the index tie-break gives leaf 0 ('a')
        // the left child (code 0) and leaf 1 ('b') the right child (code 1).
        // Encoded bits for a,b,a,b are 0,1,0,1, packed MSB-first: 0101_0000.
        let mut input = Cursor::new(b"abab".to_vec());
        let mut packed = Cursor::new(Vec::new());
        compress(&mut input, &mut packed).unwrap();
        let bytes = packed.into_inner();
        let payload = &bytes[bytes.len() - 1..];
        assert_eq!(hex::encode(payload), "50");
    }
}
