//! Structural recognition of well-known script shapes.
//!
//! All checks work on byte lengths and opcode positions only; nothing is executed.

use std::fmt;

use super::{
    opcodes::{self, OP_PUSHBYTES_20},
    reader::{ScriptReader, Token},
    solver::{self, OutputKind},
};
use crate::config::{self, Policy};

/// Length of a pay-to-script-hash output.
pub const P2SH_LEN: usize = 23;

/// Length of a pay-to-pubkey-hash output.
pub const P2PKH_LEN: usize = 25;

/// The shape of a script.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScriptPattern {
    PayToPubkeyHash,
    PayToScriptHash,
    /// Bare multisig while bare multisig is not treated as standard.
    BareMultisig,
    ZerocoinMint,
    ZerocoinSpend,
    Unclassified,
}

impl fmt::Display for ScriptPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PayToPubkeyHash => "pay-to-pubkey-hash",
            Self::PayToScriptHash => "pay-to-script-hash",
            Self::BareMultisig => "bare multisig",
            Self::ZerocoinMint => "zerocoin mint",
            Self::ZerocoinSpend => "zerocoin spend",
            Self::Unclassified => "unclassified",
        };
        f.write_str(name)
    }
}

/// `OP_HASH160 <20 bytes> OP_EQUAL`, checked at fixed offsets.
pub fn is_pay_to_script_hash(script: &[u8]) -> bool {
    script.len() == P2SH_LEN
        && script[0] == opcodes::OP_HASH160.to_u8()
        && script[1] == OP_PUSHBYTES_20.to_u8()
        && script[22] == opcodes::OP_EQUAL.to_u8()
}

/// `OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG`.
///
/// The script must be exactly 25 bytes and decode into exactly these five tokens.
/// The hash contents are not inspected.
pub fn is_normal_payment(script: &[u8]) -> bool {
    if script.len() != P2PKH_LEN {
        return false;
    }
    let mut reader = ScriptReader::new(script);
    for i in 0..5 {
        let token = match reader.next() {
            Some(Ok(token)) => token,
            _ => return false,
        };
        let ok = match i {
            0 => token == Token::Op(opcodes::OP_DUP),
            1 => token == Token::Op(opcodes::OP_HASH160),
            2 => token.is_push() && token.data().len() == 20,
            3 => token == Token::Op(opcodes::OP_EQUALVERIFY),
            _ => token == Token::Op(opcodes::OP_CHECKSIG),
        };
        if !ok {
            return false;
        }
    }
    reader.next().is_none()
}

pub fn is_zerocoin_mint(script: &[u8]) -> bool {
    script.first() == Some(&opcodes::OP_ZEROCOINMINT.to_u8())
}

pub fn is_zerocoin_spend(script: &[u8]) -> bool {
    script.first() == Some(&opcodes::OP_ZEROCOINSPEND.to_u8())
}

/// Whether every token from `offset` on is at or below `OP_16`.
///
/// A malformed token makes the script not push-only.
pub fn is_push_only_from(script: &[u8], offset: usize) -> bool {
    ScriptReader::from_offset(script, offset).all(|token| match token {
        Ok(token) => token.opcode().is_push_only(),
        Err(_) => false,
    })
}

pub fn is_push_only(script: &[u8]) -> bool {
    is_push_only_from(script, 0)
}

/// Bare multisig output, unless `policy` treats bare multisig as standard.
pub fn is_bare_multisig_with(script: &[u8], policy: &Policy) -> bool {
    !policy.bare_multisig_is_standard && solver::solve(script).kind == OutputKind::Multisig
}

/// [`is_bare_multisig_with`] under the process-wide policy.
pub fn is_bare_multisig(script: &[u8]) -> bool {
    is_bare_multisig_with(script, &config::policy())
}

pub fn classify_with(script: &[u8], policy: &Policy) -> ScriptPattern {
    if is_normal_payment(script) {
        ScriptPattern::PayToPubkeyHash
    } else if is_pay_to_script_hash(script) {
        ScriptPattern::PayToScriptHash
    } else if is_zerocoin_mint(script) {
        ScriptPattern::ZerocoinMint
    } else if is_zerocoin_spend(script) {
        ScriptPattern::ZerocoinSpend
    } else if is_bare_multisig_with(script, policy) {
        ScriptPattern::BareMultisig
    } else {
        ScriptPattern::Unclassified
    }
}

/// Classify under the process-wide policy.
pub fn classify(script: &[u8]) -> ScriptPattern {
    classify_with(script, &config::policy())
}
