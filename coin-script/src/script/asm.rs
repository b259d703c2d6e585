//! Human readable rendering of scripts.

use log::trace;

use super::{
    num::decode_num,
    opcodes,
    reader::{ScriptReader, Token},
};

const LOG_TARGET: &str = "coin_script::asm";

/// Marker appended when a token cannot be decoded.
pub const ERROR_MARKER: &str = "[error]";

fn render_value(data: &[u8]) -> String {
    match decode_num(data) {
        Some(value) => value.to_string(),
        None => hex::encode(data),
    }
}

/// Render `script` as space separated tokens.
///
/// Pushes of up to 4 bytes render as decimal numbers, longer pushes as lowercase hex and
/// other opcodes by name. Rendering stops after `OP_ZEROCOINSPEND`, or with
/// [`ERROR_MARKER`] at the first malformed token.
pub fn disassemble(script: &[u8]) -> String {
    let mut out = String::new();
    for token in ScriptReader::new(script) {
        if !out.is_empty() {
            out.push(' ');
        }
        match token {
            Ok(Token::Push { data, .. }) => out.push_str(&render_value(data)),
            Ok(Token::Op(opcode)) => {
                out.push_str(opcode.name());
                if opcode == opcodes::OP_ZEROCOINSPEND {
                    break;
                }
            }
            Err(err) => {
                trace!(target: LOG_TARGET, "disassembly stopped; {}", err);
                out.push_str(ERROR_MARKER);
                break;
            }
        }
    }
    out
}
