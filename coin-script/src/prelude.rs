pub use crate::{
    config::{Config, ConfigError, Policy},
    quicksend::{Flag, PrefixEntry, PrefixTable, TableError},
    script::{
        opcodes::Opcode,
        pattern::ScriptPattern,
        reader::{ScriptReader, Token, TokenError},
        solver::{OutputKind, Solution},
        Script, ScriptHexError,
    },
};
