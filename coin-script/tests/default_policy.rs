use coin_script::{classify, detect_flagged, disassemble, Flag, Script, ScriptPattern};

const MULTISIG_1_OF_1: &str =
    "51210279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f8179851ae";

#[test]
fn uninitialized_policy_flags_bare_multisig() {
    let multisig = Script::from_hex(MULTISIG_1_OF_1).unwrap();
    assert_eq!(classify(multisig.as_bytes()), ScriptPattern::BareMultisig);
    assert_eq!(detect_flagged(multisig.as_bytes()), Some(Flag::BareMultisig));
    assert_eq!(multisig.sig_op_count(true), 1);
    assert_eq!(
        disassemble(multisig.as_bytes()),
        "1 0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798 1 OP_CHECKMULTISIG"
    );
}

#[test]
fn embedded_watchlist_is_used() {
    // QuickSend1
    let script =
        Script::from_hex("76a914338958960000000000000000000000000000000088ac").unwrap();
    assert_eq!(detect_flagged(script.as_bytes()).map(|flag| flag.label()), Some("QuickSend1"));

    let script =
        Script::from_hex("76a914338958970000000000000000000000000000000088ac").unwrap();
    assert_eq!(detect_flagged(script.as_bytes()), None);
}
