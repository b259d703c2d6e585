//! This module contains collection of OP codes.
//!
//! Every byte is a valid [`Opcode`]; bytes without an assigned meaning render as
//! `OP_UNKNOWN`. Template placeholders used by the output solver live in a
//! separate type and never appear here.

use std::fmt;

/// A single script opcode byte.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Opcode(u8);

impl From<u8> for Opcode {
    fn from(byte: u8) -> Self {
        Opcode(byte)
    }
}

impl Into<u8> for Opcode {
    fn into(self) -> u8 {
        self.0
    }
}

impl fmt::Debug for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02x})", self.name(), self.0)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! opcodes {
    ($($(#[$doc:meta])* $name:ident = $value:expr;)*) => {
        $(
            $(#[$doc])*
            pub const $name: Opcode = Opcode($value);
        )*
    };
}

opcodes! {
    /// Push an empty array.
    OP_0 = 0x00;
    /// Read the next byte as N and push the next N bytes.
    OP_PUSHDATA1 = 0x4c;
    /// Read the next 2 bytes as N and push the next N bytes.
    OP_PUSHDATA2 = 0x4d;
    /// Read the next 4 bytes as N and push the next N bytes.
    OP_PUSHDATA4 = 0x4e;
    /// Push the number -1.
    OP_1NEGATE = 0x4f;
    OP_RESERVED = 0x50;
    OP_1 = 0x51;
    OP_2 = 0x52;
    OP_3 = 0x53;
    OP_4 = 0x54;
    OP_5 = 0x55;
    OP_6 = 0x56;
    OP_7 = 0x57;
    OP_8 = 0x58;
    OP_9 = 0x59;
    OP_10 = 0x5a;
    OP_11 = 0x5b;
    OP_12 = 0x5c;
    OP_13 = 0x5d;
    OP_14 = 0x5e;
    OP_15 = 0x5f;
    OP_16 = 0x60;

    OP_NOP = 0x61;
    OP_VER = 0x62;
    OP_IF = 0x63;
    OP_NOTIF = 0x64;
    OP_VERIF = 0x65;
    OP_VERNOTIF = 0x66;
    OP_ELSE = 0x67;
    OP_ENDIF = 0x68;
    OP_VERIFY = 0x69;
    OP_RETURN = 0x6a;

    OP_TOALTSTACK = 0x6b;
    OP_FROMALTSTACK = 0x6c;
    OP_2DROP = 0x6d;
    OP_2DUP = 0x6e;
    OP_3DUP = 0x6f;
    OP_2OVER = 0x70;
    OP_2ROT = 0x71;
    OP_2SWAP = 0x72;
    OP_IFDUP = 0x73;
    OP_DEPTH = 0x74;
    OP_DROP = 0x75;
    OP_DUP = 0x76;
    OP_NIP = 0x77;
    OP_OVER = 0x78;
    OP_PICK = 0x79;
    OP_ROLL = 0x7a;
    OP_ROT = 0x7b;
    OP_SWAP = 0x7c;
    OP_TUCK = 0x7d;

    OP_CAT = 0x7e;
    OP_SUBSTR = 0x7f;
    OP_LEFT = 0x80;
    OP_RIGHT = 0x81;
    OP_SIZE = 0x82;

    OP_INVERT = 0x83;
    OP_AND = 0x84;
    OP_OR = 0x85;
    OP_XOR = 0x86;
    OP_EQUAL = 0x87;
    OP_EQUALVERIFY = 0x88;
    OP_RESERVED1 = 0x89;
    OP_RESERVED2 = 0x8a;

    OP_1ADD = 0x8b;
    OP_1SUB = 0x8c;
    OP_2MUL = 0x8d;
    OP_2DIV = 0x8e;
    OP_NEGATE = 0x8f;
    OP_ABS = 0x90;
    OP_NOT = 0x91;
    OP_0NOTEQUAL = 0x92;
    OP_ADD = 0x93;
    OP_SUB = 0x94;
    OP_MUL = 0x95;
    OP_DIV = 0x96;
    OP_MOD = 0x97;
    OP_LSHIFT = 0x98;
    OP_RSHIFT = 0x99;
    OP_BOOLAND = 0x9a;
    OP_BOOLOR = 0x9b;
    OP_NUMEQUAL = 0x9c;
    OP_NUMEQUALVERIFY = 0x9d;
    OP_NUMNOTEQUAL = 0x9e;
    OP_LESSTHAN = 0x9f;
    OP_GREATERTHAN = 0xa0;
    OP_LESSTHANOREQUAL = 0xa1;
    OP_GREATERTHANOREQUAL = 0xa2;
    OP_MIN = 0xa3;
    OP_MAX = 0xa4;
    OP_WITHIN = 0xa5;

    OP_RIPEMD160 = 0xa6;
    OP_SHA1 = 0xa7;
    OP_SHA256 = 0xa8;
    OP_HASH160 = 0xa9;
    OP_HASH256 = 0xaa;
    OP_CODESEPARATOR = 0xab;
    OP_CHECKSIG = 0xac;
    OP_CHECKSIGVERIFY = 0xad;
    OP_CHECKMULTISIG = 0xae;
    OP_CHECKMULTISIGVERIFY = 0xaf;

    OP_NOP1 = 0xb0;
    OP_NOP2 = 0xb1;
    OP_NOP3 = 0xb2;
    OP_NOP4 = 0xb3;
    OP_NOP5 = 0xb4;
    OP_NOP6 = 0xb5;
    OP_NOP7 = 0xb6;
    OP_NOP8 = 0xb7;
    OP_NOP9 = 0xb8;
    OP_NOP10 = 0xb9;

    /// Marks a zerocoin mint output.
    OP_ZEROCOINMINT = 0xc1;
    /// Marks a zerocoin spend input. Nothing after it is interpreted.
    OP_ZEROCOINSPEND = 0xc2;

    OP_INVALIDOPCODE = 0xff;
}

/// Pushes the next 20 bytes.
pub const OP_PUSHBYTES_20: Opcode = Opcode(0x14);

impl Opcode {
    /// The raw byte.
    #[inline]
    pub fn to_u8(self) -> u8 {
        self.0
    }

    /// Whether the opcode carries a payload (`OP_0` through `OP_PUSHDATA4`).
    #[inline]
    pub fn is_push(self) -> bool {
        self <= OP_PUSHDATA4
    }

    /// Whether the opcode is allowed in a push-only script.
    ///
    /// This includes `OP_1NEGATE`, `OP_RESERVED` and the small integers.
    #[inline]
    pub fn is_push_only(self) -> bool {
        self <= OP_16
    }

    /// The value of `OP_1` through `OP_16`.
    pub fn small_int(self) -> Option<u8> {
        if self >= OP_1 && self <= OP_16 {
            Some(self.0 - (OP_1.0 - 1))
        } else {
            None
        }
    }

    /// The value of `OP_0` or `OP_1` through `OP_16`.
    pub fn small_int_or_zero(self) -> Option<u8> {
        if self == OP_0 {
            Some(0)
        } else {
            self.small_int()
        }
    }

    /// Canonical mnemonic used by the disassembler.
    ///
    /// Small integer opcodes render as numerals. Direct pushes (`0x01..=0x4b`) have no
    /// mnemonic of their own and render as `OP_UNKNOWN`, as does any unassigned byte.
    pub fn name(self) -> &'static str {
        match self.0 {
            0x00 => "0",
            0x4c => "OP_PUSHDATA1",
            0x4d => "OP_PUSHDATA2",
            0x4e => "OP_PUSHDATA4",
            0x4f => "-1",
            0x50 => "OP_RESERVED",
            0x51 => "1",
            0x52 => "2",
            0x53 => "3",
            0x54 => "4",
            0x55 => "5",
            0x56 => "6",
            0x57 => "7",
            0x58 => "8",
            0x59 => "9",
            0x5a => "10",
            0x5b => "11",
            0x5c => "12",
            0x5d => "13",
            0x5e => "14",
            0x5f => "15",
            0x60 => "16",

            // control
            0x61 => "OP_NOP",
            0x62 => "OP_VER",
            0x63 => "OP_IF",
            0x64 => "OP_NOTIF",
            0x65 => "OP_VERIF",
            0x66 => "OP_VERNOTIF",
            0x67 => "OP_ELSE",
            0x68 => "OP_ENDIF",
            0x69 => "OP_VERIFY",
            0x6a => "OP_RETURN",

            // stack
            0x6b => "OP_TOALTSTACK",
            0x6c => "OP_FROMALTSTACK",
            0x6d => "OP_2DROP",
            0x6e => "OP_2DUP",
            0x6f => "OP_3DUP",
            0x70 => "OP_2OVER",
            0x71 => "OP_2ROT",
            0x72 => "OP_2SWAP",
            0x73 => "OP_IFDUP",
            0x74 => "OP_DEPTH",
            0x75 => "OP_DROP",
            0x76 => "OP_DUP",
            0x77 => "OP_NIP",
            0x78 => "OP_OVER",
            0x79 => "OP_PICK",
            0x7a => "OP_ROLL",
            0x7b => "OP_ROT",
            0x7c => "OP_SWAP",
            0x7d => "OP_TUCK",

            // splice
            0x7e => "OP_CAT",
            0x7f => "OP_SUBSTR",
            0x80 => "OP_LEFT",
            0x81 => "OP_RIGHT",
            0x82 => "OP_SIZE",

            // bit logic
            0x83 => "OP_INVERT",
            0x84 => "OP_AND",
            0x85 => "OP_OR",
            0x86 => "OP_XOR",
            0x87 => "OP_EQUAL",
            0x88 => "OP_EQUALVERIFY",
            0x89 => "OP_RESERVED1",
            0x8a => "OP_RESERVED2",

            // numeric
            0x8b => "OP_1ADD",
            0x8c => "OP_1SUB",
            0x8d => "OP_2MUL",
            0x8e => "OP_2DIV",
            0x8f => "OP_NEGATE",
            0x90 => "OP_ABS",
            0x91 => "OP_NOT",
            0x92 => "OP_0NOTEQUAL",
            0x93 => "OP_ADD",
            0x94 => "OP_SUB",
            0x95 => "OP_MUL",
            0x96 => "OP_DIV",
            0x97 => "OP_MOD",
            0x98 => "OP_LSHIFT",
            0x99 => "OP_RSHIFT",
            0x9a => "OP_BOOLAND",
            0x9b => "OP_BOOLOR",
            0x9c => "OP_NUMEQUAL",
            0x9d => "OP_NUMEQUALVERIFY",
            0x9e => "OP_NUMNOTEQUAL",
            0x9f => "OP_LESSTHAN",
            0xa0 => "OP_GREATERTHAN",
            0xa1 => "OP_LESSTHANOREQUAL",
            0xa2 => "OP_GREATERTHANOREQUAL",
            0xa3 => "OP_MIN",
            0xa4 => "OP_MAX",
            0xa5 => "OP_WITHIN",

            // crypto
            0xa6 => "OP_RIPEMD160",
            0xa7 => "OP_SHA1",
            0xa8 => "OP_SHA256",
            0xa9 => "OP_HASH160",
            0xaa => "OP_HASH256",
            0xab => "OP_CODESEPARATOR",
            0xac => "OP_CHECKSIG",
            0xad => "OP_CHECKSIGVERIFY",
            0xae => "OP_CHECKMULTISIG",
            0xaf => "OP_CHECKMULTISIGVERIFY",

            // expansion
            0xb0 => "OP_NOP1",
            0xb1 => "OP_NOP2",
            0xb2 => "OP_NOP3",
            0xb3 => "OP_NOP4",
            0xb4 => "OP_NOP5",
            0xb5 => "OP_NOP6",
            0xb6 => "OP_NOP7",
            0xb7 => "OP_NOP8",
            0xb8 => "OP_NOP9",
            0xb9 => "OP_NOP10",

            0xc1 => "OP_ZEROCOINMINT",
            0xc2 => "OP_ZEROCOINSPEND",

            0xff => "OP_INVALIDOPCODE",

            _ => "OP_UNKNOWN",
        }
    }
}

/// Canonical mnemonic of a raw opcode byte.
#[inline]
pub fn name_of(byte: u8) -> &'static str {
    Opcode(byte).name()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_integers_render_as_numerals() {
        assert_eq!(OP_0.name(), "0");
        assert_eq!(OP_1NEGATE.name(), "-1");
        for n in 1..=16u8 {
            let op = Opcode::from(OP_1.to_u8() + n - 1);
            assert_eq!(op.name(), n.to_string());
            assert_eq!(op.small_int(), Some(n));
        }
    }

    #[test]
    fn catalog_is_total() {
        for byte in 0..=255u8 {
            assert!(!name_of(byte).is_empty());
        }
        assert_eq!(name_of(0x01), "OP_UNKNOWN");
        assert_eq!(name_of(0x4b), "OP_UNKNOWN");
        assert_eq!(name_of(0xba), "OP_UNKNOWN");
        assert_eq!(name_of(0xc0), "OP_UNKNOWN");
        assert_eq!(name_of(0xfe), "OP_UNKNOWN");
    }

    #[test]
    fn zerocoin_markers() {
        assert_eq!(name_of(0xc1), "OP_ZEROCOINMINT");
        assert_eq!(name_of(0xc2), "OP_ZEROCOINSPEND");
        assert_eq!(OP_INVALIDOPCODE.name(), "OP_INVALIDOPCODE");
    }

    #[test]
    fn push_ranges() {
        assert!(OP_0.is_push());
        assert!(OP_PUSHDATA4.is_push());
        assert!(!OP_1NEGATE.is_push());
        assert!(OP_RESERVED.is_push_only());
        assert!(OP_16.is_push_only());
        assert!(!OP_NOP.is_push_only());
        assert_eq!(OP_0.small_int(), None);
        assert_eq!(OP_0.small_int_or_zero(), Some(0));
        assert_eq!(OP_1NEGATE.small_int(), None);
        assert_eq!(OP_NOP.small_int(), None);
    }
}
