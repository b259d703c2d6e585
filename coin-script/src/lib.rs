pub mod config;
pub mod prelude;
pub mod quicksend;
pub mod script;

pub use crate::{
    config::{Config, Policy},
    quicksend::Flag,
    script::{pattern::ScriptPattern, Script},
};
pub use crate::script::pattern::{
    is_pay_to_script_hash, is_push_only, is_push_only_from, is_zerocoin_mint, is_zerocoin_spend,
};

/// Classify a script under the process-wide policy.
pub fn classify(script: &[u8]) -> ScriptPattern {
    script::pattern::classify(script)
}

/// Count the signature operations in a script.
pub fn count_sig_ops(script: &[u8], accurate: bool) -> u32 {
    script::sigops::count(script, accurate)
}

/// Count the signature operations spent by `script_sig` against `script_pubkey`.
pub fn count_sig_ops_with_script_sig(script_pubkey: &[u8], script_sig: &[u8]) -> u32 {
    script::sigops::count_with_script_sig(script_pubkey, script_sig)
}

/// Render a script as text.
pub fn disassemble(script: &[u8]) -> String {
    script::asm::disassemble(script)
}

/// Check a script against the process-wide watchlist and policy.
pub fn detect_flagged(script: &[u8]) -> Option<Flag<'static>> {
    quicksend::detect(script)
}
