//! Signature operation accounting.

use log::trace;

use super::{
    opcodes::{self, Opcode},
    pattern,
    reader::ScriptReader,
};

const LOG_TARGET: &str = "coin_script::sigops";

/// Cost charged for a multisig check when the key count is not known.
pub const MAX_PUBKEYS_PER_MULTISIG: u32 = 20;

/// Count the signature checks in `script`.
///
/// With `accurate` set, a multisig check directly preceded by `OP_1`..`OP_16` costs that
/// many sig-ops, otherwise it costs [`MAX_PUBKEYS_PER_MULTISIG`]. A malformed token ends
/// the scan and the count so far is returned.
pub fn count(script: &[u8], accurate: bool) -> u32 {
    accumulate(0, script, accurate)
}

/// Add the sig-ops of `script` to `n`, saturating at `u32::MAX`.
fn accumulate(mut n: u32, script: &[u8], accurate: bool) -> u32 {
    let mut last_opcode = opcodes::OP_INVALIDOPCODE;
    for token in ScriptReader::new(script) {
        let opcode = match token {
            Ok(token) => token.opcode(),
            Err(err) => {
                trace!(target: LOG_TARGET, "stopping sig-op count; {}", err);
                break;
            }
        };
        match opcode {
            opcodes::OP_CHECKSIG | opcodes::OP_CHECKSIGVERIFY => n = n.saturating_add(1),
            opcodes::OP_CHECKMULTISIG | opcodes::OP_CHECKMULTISIGVERIFY => {
                n = n.saturating_add(multisig_cost(last_opcode, accurate));
            }
            _ => {}
        }
        last_opcode = opcode;
    }
    n
}

fn multisig_cost(last_opcode: Opcode, accurate: bool) -> u32 {
    match last_opcode.small_int() {
        Some(keys) if accurate => u32::from(keys),
        _ => MAX_PUBKEYS_PER_MULTISIG,
    }
}

/// Count the signature checks spent by `script_sig` against `script_pubkey`.
///
/// For a pay-to-script-hash output the cost is that of the redeem script, which is the
/// payload of the last token in `script_sig`. A `script_sig` that is malformed or not
/// push-only costs nothing.
pub fn count_with_script_sig(script_pubkey: &[u8], script_sig: &[u8]) -> u32 {
    if !pattern::is_pay_to_script_hash(script_pubkey) {
        return count(script_pubkey, true);
    }

    let mut redeem_script: &[u8] = &[];
    for token in ScriptReader::new(script_sig) {
        let token = match token {
            Ok(token) => token,
            Err(err) => {
                trace!(target: LOG_TARGET, "malformed p2sh script sig; {}", err);
                return 0;
            }
        };
        if !token.opcode().is_push_only() {
            trace!(
                target: LOG_TARGET,
                "p2sh script sig contains {}",
                token.opcode()
            );
            return 0;
        }
        redeem_script = token.data();
    }
    count(redeem_script, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::solver::tests::multisig_script;

    const P2SH: &str = "a914748284390f9e263a4b766a75d0633c50426eb87587";

    fn push(data: &[u8]) -> Vec<u8> {
        let mut raw = match data.len() {
            len if len < 0x4c => vec![len as u8],
            len if len <= 0xff => vec![0x4c, len as u8],
            len => {
                let mut prefix = vec![0x4d];
                prefix.extend(&(len as u16).to_le_bytes());
                prefix
            }
        };
        raw.extend(data);
        raw
    }

    #[test]
    fn count_saturates() {
        assert_eq!(accumulate(u32::MAX - 1, &[0xac, 0xac, 0xae], false), u32::MAX);
        assert_eq!(accumulate(u32::MAX - 21, &[0xac, 0xae], false), u32::MAX);
        assert_eq!(accumulate(5, &[0xac], true), 6);
    }

    #[test]
    fn single_signature_checks() {
        let raw = hex::decode("76a914043ea5736aa3a48ebdd5034309b590505d8bdd9088ac").unwrap();
        assert_eq!(count(&raw, true), 1);
        assert_eq!(count(&raw, false), 1);
        assert_eq!(count(&[0xac, 0xad, 0xac], false), 3);
    }

    #[test]
    fn multisig_accurate_and_conservative() {
        let raw = [0x53, 0xae];
        assert_eq!(count(&raw, true), 3);
        assert_eq!(count(&raw, false), 20);

        let raw = multisig_script(2, 3, 3);
        assert_eq!(count(&raw, true), 3);
        assert_eq!(count(&raw, false), 20);

        // 16 is decoded, OP_0 and pushes fall back to the constant
        assert_eq!(count(&[0x60, 0xaf], true), 16);
        assert_eq!(count(&[0x00, 0xae], true), 20);
        assert_eq!(count(&[0x01, 0x03, 0xae], true), 20);
        assert_eq!(count(&[0xae], true), 20);
    }

    #[test]
    fn malformed_returns_partial_count() {
        assert_eq!(count(&[0xac, 0xac, 0x4c], true), 2);
        assert_eq!(count(&[0xac, 0x05, 0xac], true), 1);
        assert_eq!(count(&[], true), 0);
    }

    #[test]
    fn non_p2sh_counts_script_pubkey() {
        let raw = multisig_script(1, 2, 2);
        assert_eq!(count_with_script_sig(&raw, &[0x00]), 2);
    }

    #[test]
    fn p2sh_counts_redeem_script() {
        let script_pubkey = hex::decode(P2SH).unwrap();
        let redeem_script = multisig_script(2, 3, 3);
        let mut script_sig = vec![0x00];
        script_sig.extend(push(&[0x30; 71]));
        script_sig.extend(push(&redeem_script));
        assert_eq!(
            count_with_script_sig(&script_pubkey, &script_sig),
            count(&redeem_script, true)
        );
        assert_eq!(count_with_script_sig(&script_pubkey, &push(&redeem_script)), 3);
    }

    #[test]
    fn p2sh_rejects_non_push_script_sig() {
        let script_pubkey = hex::decode(P2SH).unwrap();
        let redeem_script = multisig_script(2, 3, 3);
        let mut script_sig = push(&redeem_script);
        script_sig.push(0x76);
        assert_eq!(count_with_script_sig(&script_pubkey, &script_sig), 0);

        let mut script_sig = vec![0x76];
        script_sig.extend(push(&redeem_script));
        assert_eq!(count_with_script_sig(&script_pubkey, &script_sig), 0);
    }

    #[test]
    fn p2sh_malformed_or_empty_script_sig() {
        let script_pubkey = hex::decode(P2SH).unwrap();
        assert_eq!(count_with_script_sig(&script_pubkey, &[0x4c]), 0);
        assert_eq!(count_with_script_sig(&script_pubkey, &[]), 0);
        // A trailing small integer carries no payload
        let mut script_sig = push(&[0xac]);
        script_sig.push(0x51);
        assert_eq!(count_with_script_sig(&script_pubkey, &script_sig), 0);
    }
}
