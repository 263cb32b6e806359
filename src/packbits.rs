//! The PackBits run-length codec.
//!
//! An encoded stream is a sequence of chunks, each starting with a signed
//! control byte `n`:
//!
//! * `0..=127`: the next `n + 1` bytes are copied verbatim (a literal run).
//! * `-127..=-1`: the next byte is repeated `1 - n` times (a repeat run).
//! * `-128`: no-op; no data follows.  The encoder never produces this, but
//!   other encoders use it for padding, so the decoder skips it.
//!
//! This is the scheme used for the RGB channels and masks of Apple icon
//! files and for TIFF strips, so the exact chunking matters to external
//! decoders even though any valid chunking round-trips.

use std::io;

//===========================================================================//

// The longest literal run the encoder accumulates before flushing.
const MAX_LITERAL_LEN: usize = 127;

// The longest repeat run a single control byte can express.
const MAX_REPEAT_LEN: usize = 128;

// The control byte that decoders must treat as a no-op.
const NO_OP: i8 = -128;

//===========================================================================//

/// Compresses `raw` with PackBits.  Every input is encodable; an empty
/// input produces an empty output.
pub fn encode(raw: &[u8]) -> Vec<u8> {
    let capacity = raw.len() + raw.len() / MAX_LITERAL_LEN + 1;
    let mut output = Vec::<u8>::with_capacity(capacity);
    let mut literals = Vec::<u8>::with_capacity(MAX_LITERAL_LEN);
    let mut position = 0;
    while position < raw.len() {
        let current = raw[position];
        match raw.get(position + 1) {
            None => {
                literals.push(current);
                flush_literals(&mut literals, &mut output);
                position += 1;
            }
            Some(&next) if next != current => {
                literals.push(current);
                if literals.len() == MAX_LITERAL_LEN {
                    flush_literals(&mut literals, &mut output);
                }
                position += 1;
            }
            Some(_) => {
                // Two equal bytes always start a repeat run, even in the
                // middle of a literal.
                flush_literals(&mut literals, &mut output);
                let run_len = repeat_run_len(&raw[position..]);
                output.push(to_unsigned8(1 - run_len as i32));
                output.push(current);
                position += run_len;
            }
        }
    }
    debug_assert!(literals.is_empty());
    output
}

/// Decompresses a PackBits stream.  Returns an error of kind `InvalidData`
/// if a control byte promises more data than the stream contains.
pub fn decode(encoded: &[u8]) -> io::Result<Vec<u8>> {
    let mut output = Vec::<u8>::new();
    let mut position = 0;
    while position < encoded.len() {
        let (chunk, consumed) = Chunk::read(encoded, position)?;
        match chunk {
            Chunk::NoOp => {}
            Chunk::Literal(bytes) => output.extend_from_slice(bytes),
            Chunk::Repeat(value, count) => {
                output.resize(output.len() + count, value)
            }
        }
        position += consumed;
    }
    Ok(output)
}

/// Returns the number of bytes that `decode` would produce for `encoded`,
/// without decoding it.  Fails exactly when `decode` would.
pub fn decoded_len(encoded: &[u8]) -> io::Result<usize> {
    let mut total = 0;
    let mut position = 0;
    while position < encoded.len() {
        let (chunk, consumed) = Chunk::read(encoded, position)?;
        total += chunk.decoded_len();
        position += consumed;
    }
    Ok(total)
}

/// Masks `value` to its low eight bits, e.g. to store a negated run length
/// as a raw control byte.
pub fn to_unsigned8(value: i32) -> u8 {
    (value & 0xff) as u8
}

/// Reinterprets an unsigned byte as a two's-complement signed byte.
pub fn to_signed8(value: u8) -> i8 {
    value as i8
}

//===========================================================================//

fn flush_literals(literals: &mut Vec<u8>, output: &mut Vec<u8>) {
    if literals.is_empty() {
        return;
    }
    debug_assert!(literals.len() <= MAX_LITERAL_LEN + 1);
    output.push(to_unsigned8(literals.len() as i32 - 1));
    output.append(literals);
}

// Given a slice whose first two bytes are equal, returns how many leading
// bytes belong to a single repeat run.
fn repeat_run_len(run: &[u8]) -> usize {
    debug_assert!(run.len() >= 2 && run[0] == run[1]);
    let value = run[0];
    let limit = run.len().min(MAX_REPEAT_LEN);
    2 + run[2..limit].iter().take_while(|&&byte| byte == value).count()
}

//===========================================================================//

/// One control byte and the data it governs.
#[derive(Debug, Eq, PartialEq)]
enum Chunk<'a> {
    NoOp,
    Literal(&'a [u8]),
    Repeat(u8, usize),
}

impl<'a> Chunk<'a> {
    /// Parses the chunk whose control byte is at `encoded[position]`, and
    /// returns it along with the number of bytes it occupies.
    fn read(
        encoded: &'a [u8],
        position: usize,
    ) -> io::Result<(Chunk<'a>, usize)> {
        let control = to_signed8(encoded[position]);
        let data = &encoded[(position + 1)..];
        if control == NO_OP {
            Ok((Chunk::NoOp, 1))
        } else if control >= 0 {
            let len = control as usize + 1;
            if data.len() < len {
                invalid_data!(
                    "Truncated PackBits literal run at offset {} \
                     (needs {} bytes, but only {} remain)",
                    position,
                    len,
                    data.len()
                );
            }
            Ok((Chunk::Literal(&data[..len]), 1 + len))
        } else {
            let count = 1 - control as isize;
            match data.first() {
                Some(&value) => Ok((Chunk::Repeat(value, count as usize), 2)),
                None => invalid_data!(
                    "Truncated PackBits repeat run at offset {} \
                     (needs 1 byte, but none remain)",
                    position
                ),
            }
        }
    }

    fn decoded_len(&self) -> usize {
        match *self {
            Chunk::NoOp => 0,
            Chunk::Literal(bytes) => bytes.len(),
            Chunk::Repeat(_, count) => count,
        }
    }
}

//===========================================================================//


//===========================================================================//
