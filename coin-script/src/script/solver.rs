//! Recognition of standard output scripts by template matching.

use std::fmt;

use super::{
    opcodes::{self, Opcode},
    pattern,
    reader::{ScriptReader, Token},
};

/// Scripts marked as zerocoin mints are only standard up to this size.
pub const MAX_ZEROCOIN_MINT_SIZE: usize = 150;

/// Offset of the coin commitment within a zerocoin mint script.
pub const ZEROCOIN_MINT_DATA_OFFSET: usize = 6;

/// Largest standard `OP_RETURN` output: 80 data bytes plus push overhead.
pub const MAX_NULL_DATA_SIZE: usize = 83;

/// The recognized shape of an output script.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputKind {
    NonStandard,
    PubKey,
    PubKeyHash,
    ScriptHash,
    Multisig,
    NullData,
    ZerocoinMint,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NonStandard => "nonstandard",
            Self::PubKey => "pubkey",
            Self::PubKeyHash => "pubkeyhash",
            Self::ScriptHash => "scripthash",
            Self::Multisig => "multisig",
            Self::NullData => "nulldata",
            Self::ZerocoinMint => "zerocoinmint",
        };
        f.write_str(name)
    }
}

/// The result of solving an output script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    pub kind: OutputKind,
    /// Keys, hashes or small integers extracted from the script, in script order.
    pub solutions: Vec<Vec<u8>>,
}

impl Solution {
    fn non_standard() -> Self {
        Self {
            kind: OutputKind::NonStandard,
            solutions: Vec::new(),
        }
    }
}

/// A symbol in an output template.
///
/// These are matching placeholders only and have no byte encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TemplateToken {
    /// Exactly this plain opcode.
    Op(Opcode),
    /// A push of 33 to 65 bytes.
    PubKey,
    /// A run of zero or more `PubKey`.
    PubKeys,
    /// A push of exactly 20 bytes.
    PubKeyHash,
    /// `OP_0` or `OP_1` through `OP_16`.
    SmallInteger,
}

use TemplateToken::*;

const TEMPLATES: &[(OutputKind, &[TemplateToken])] = &[
    (OutputKind::PubKey, &[PubKey, Op(opcodes::OP_CHECKSIG)]),
    (
        OutputKind::PubKeyHash,
        &[
            Op(opcodes::OP_DUP),
            Op(opcodes::OP_HASH160),
            PubKeyHash,
            Op(opcodes::OP_EQUALVERIFY),
            Op(opcodes::OP_CHECKSIG),
        ],
    ),
    (
        OutputKind::Multisig,
        &[
            SmallInteger,
            PubKeys,
            SmallInteger,
            Op(opcodes::OP_CHECKMULTISIG),
        ],
    ),
];

fn is_pubkey(token: &Token<'_>) -> bool {
    token.is_push() && (33..=65).contains(&token.data().len())
}

fn match_template(tokens: &[Token<'_>], template: &[TemplateToken]) -> Option<Vec<Vec<u8>>> {
    let mut solutions = Vec::new();
    let mut tokens = tokens.iter().peekable();
    for symbol in template {
        match symbol {
            PubKeys => {
                while let Some(token) = tokens.next_if(|token| is_pubkey(token)) {
                    solutions.push(token.data().to_vec());
                }
            }
            PubKey => {
                let token = tokens.next().filter(|token| is_pubkey(token))?;
                solutions.push(token.data().to_vec());
            }
            PubKeyHash => {
                let token = tokens
                    .next()
                    .filter(|token| token.is_push() && token.data().len() == 20)?;
                solutions.push(token.data().to_vec());
            }
            SmallInteger => {
                let n = tokens.next()?.opcode().small_int_or_zero()?;
                solutions.push(vec![n]);
            }
            Op(expected) => match tokens.next()? {
                Token::Op(opcode) if opcode == expected => {}
                _ => return None,
            },
        }
    }
    if tokens.next().is_some() {
        return None;
    }
    Some(solutions)
}

fn is_valid_multisig(solutions: &[Vec<u8>]) -> bool {
    let (m, n) = match (solutions.first(), solutions.last()) {
        (Some(m), Some(n)) if solutions.len() >= 2 => (m[0] as usize, n[0] as usize),
        _ => return false,
    };
    m >= 1 && n >= 1 && m <= n && solutions.len() - 2 == n
}

/// Determine the standard shape of an output script.
pub fn solve(script: &[u8]) -> Solution {
    if pattern::is_pay_to_script_hash(script) {
        return Solution {
            kind: OutputKind::ScriptHash,
            solutions: vec![script[2..22].to_vec()],
        };
    }

    if pattern::is_zerocoin_mint(script) {
        if script.len() > MAX_ZEROCOIN_MINT_SIZE {
            return Solution::non_standard();
        }
        let data = script.get(ZEROCOIN_MINT_DATA_OFFSET..).unwrap_or_default();
        return Solution {
            kind: OutputKind::ZerocoinMint,
            solutions: vec![data.to_vec()],
        };
    }

    if script.first() == Some(&opcodes::OP_RETURN.to_u8())
        && script.len() <= MAX_NULL_DATA_SIZE
        && pattern::is_push_only_from(script, 1)
    {
        return Solution {
            kind: OutputKind::NullData,
            solutions: Vec::new(),
        };
    }

    let tokens = match ScriptReader::new(script).collect::<Result<Vec<_>, _>>() {
        Ok(tokens) => tokens,
        Err(_) => return Solution::non_standard(),
    };
    for (kind, template) in TEMPLATES {
        if let Some(solutions) = match_template(&tokens, template) {
            if *kind == OutputKind::Multisig && !is_valid_multisig(&solutions) {
                continue;
            }
            return Solution {
                kind: *kind,
                solutions,
            };
        }
    }
    Solution::non_standard()
}
