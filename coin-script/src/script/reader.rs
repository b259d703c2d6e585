//! Sequential decoding of raw script bytes into tokens.

use thiserror::Error;

use super::opcodes::{self, Opcode};

/// The error type associated with a token that runs past the end of the script.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The length prefix of an `OP_PUSHDATA*` was cut short.
    #[error("push length truncated at {position}; need {needed} bytes, {remaining} remaining")]
    LengthTooShort {
        position: usize,
        needed: usize,
        remaining: usize,
    },
    /// The push payload was cut short.
    #[error("push data truncated at {position}; need {needed} bytes, {remaining} remaining")]
    DataTooShort {
        position: usize,
        needed: usize,
        remaining: usize,
    },
}

/// A single decoded element of a script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    /// `OP_0` through `OP_PUSHDATA4`, together with the pushed bytes.
    Push { opcode: Opcode, data: &'a [u8] },
    /// Any other opcode.
    Op(Opcode),
}

impl<'a> Token<'a> {
    pub fn opcode(&self) -> Opcode {
        match *self {
            Token::Push { opcode, .. } => opcode,
            Token::Op(opcode) => opcode,
        }
    }

    /// The pushed bytes, empty for plain opcodes.
    pub fn data(&self) -> &'a [u8] {
        match *self {
            Token::Push { data, .. } => data,
            Token::Op(_) => &[],
        }
    }

    pub fn is_push(&self) -> bool {
        matches!(self, Token::Push { .. })
    }
}

/// Decode the token starting at `cursor`.
///
/// Returns `Ok(None)` once `cursor` has reached the end of `bytes`. On success the cursor
/// is moved past the token; on error it is left untouched.
pub fn read_token<'a>(
    bytes: &'a [u8],
    cursor: &mut usize,
) -> Result<Option<Token<'a>>, TokenError> {
    let start = *cursor;
    let opcode = match bytes.get(start) {
        Some(byte) => Opcode::from(*byte),
        None => return Ok(None),
    };
    if !opcode.is_push() {
        *cursor = start + 1;
        return Ok(Some(Token::Op(opcode)));
    }

    let mut pos = start + 1;
    let rest = &bytes[pos..];
    let prefix_len = match opcode {
        opcodes::OP_PUSHDATA1 => 1,
        opcodes::OP_PUSHDATA2 => 2,
        opcodes::OP_PUSHDATA4 => 4,
        _ => 0,
    };
    if rest.len() < prefix_len {
        return Err(TokenError::LengthTooShort {
            position: start,
            needed: prefix_len,
            remaining: rest.len(),
        });
    }
    let data_len = match prefix_len {
        0 => opcode.to_u8() as usize,
        1 => rest[0] as usize,
        2 => u16::from_le_bytes([rest[0], rest[1]]) as usize,
        _ => u32::from_le_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize,
    };
    pos += prefix_len;

    let remaining = bytes.len() - pos;
    if remaining < data_len {
        return Err(TokenError::DataTooShort {
            position: start,
            needed: data_len,
            remaining,
        });
    }
    let data = &bytes[pos..pos + data_len];
    *cursor = pos + data_len;
    Ok(Some(Token::Push { opcode, data }))
}

/// Iterator over the tokens of a script.
///
/// Yields at most one error, after which it is exhausted.
#[derive(Clone, Debug)]
pub struct ScriptReader<'a> {
    bytes: &'a [u8],
    cursor: usize,
    done: bool,
}

impl<'a> ScriptReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::from_offset(bytes, 0)
    }

    /// Start reading at `offset`. An offset past the end yields nothing.
    pub fn from_offset(bytes: &'a [u8], offset: usize) -> Self {
        Self {
            bytes,
            cursor: offset,
            done: false,
        }
    }

    /// Offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.cursor
    }
}

impl<'a> Iterator for ScriptReader<'a> {
    type Item = Result<Token<'a>, TokenError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match read_token(self.bytes, &mut self.cursor) {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<'a> std::iter::FusedIterator for ScriptReader<'a> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::opcodes::*;

    #[test]
    fn direct_push_and_ops() {
        let raw = hex::decode("76a914043ea5736aa3a48ebdd5034309b590505d8bdd9088ac").unwrap();
        let tokens: Vec<_> = ScriptReader::new(&raw).collect::<Result<_, _>>().unwrap();
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[0], Token::Op(OP_DUP));
        assert_eq!(tokens[1], Token::Op(OP_HASH160));
        assert_eq!(tokens[2].data(), &raw[3..23]);
        assert_eq!(tokens[3], Token::Op(OP_EQUALVERIFY));
        assert_eq!(tokens[4], Token::Op(OP_CHECKSIG));
    }

    #[test]
    fn op_0_is_empty_push() {
        let mut cursor = 0;
        let token = read_token(&[0x00], &mut cursor).unwrap().unwrap();
        assert_eq!(token, Token::Push { opcode: OP_0, data: &[] });
        assert_eq!(cursor, 1);
        assert_eq!(read_token(&[0x00], &mut cursor), Ok(None));
    }

    #[test]
    fn pushdata_lengths_are_little_endian() {
        let mut raw = vec![0x4d, 0x03, 0x01];
        raw.extend(std::iter::repeat(0xab).take(0x0103));
        let mut reader = ScriptReader::new(&raw);
        let token = reader.next().unwrap().unwrap();
        assert_eq!(token.opcode(), OP_PUSHDATA2);
        assert_eq!(token.data().len(), 0x0103);
        assert_eq!(reader.position(), raw.len());
        assert!(reader.next().is_none());

        let raw = [0x4e, 0x02, 0x00, 0x00, 0x00, 0xca, 0xfe];
        let mut cursor = 0;
        let token = read_token(&raw, &mut cursor).unwrap().unwrap();
        assert_eq!(token.data(), &[0xca, 0xfe]);
    }

    #[test]
    fn truncated_length_is_malformed() {
        let raw = [0x51, 0x4d, 0x01];
        let mut reader = ScriptReader::new(&raw);
        assert_eq!(reader.next(), Some(Ok(Token::Op(OP_1))));
        assert_eq!(
            reader.next(),
            Some(Err(TokenError::LengthTooShort {
                position: 1,
                needed: 2,
                remaining: 1
            }))
        );
        assert_eq!(reader.next(), None);
        assert_eq!(reader.position(), 1);
    }

    #[test]
    fn truncated_data_is_malformed() {
        let raw = [0x14, 0x00, 0x01];
        let mut cursor = 0;
        assert_eq!(
            read_token(&raw, &mut cursor),
            Err(TokenError::DataTooShort {
                position: 0,
                needed: 20,
                remaining: 2
            })
        );
        assert_eq!(cursor, 0);
    }

    #[test]
    fn offset_past_end_yields_nothing() {
        assert_eq!(ScriptReader::from_offset(&[0x51], 5).count(), 0);
    }
}
