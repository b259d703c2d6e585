use std::io::Write;

use coin_script::{
    config::{self, ConfigError},
    quicksend, Config, Policy,
};

#[test]
fn init_leaves_policy_alone_when_table_in_use() {
    let mut path = std::env::temp_dir();
    path.push(format!("coin-script-late-table-{}.json", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(br#"[{ "start": "043ea573", "end": "043ea573", "label": "Late" }]"#)
        .unwrap();

    assert_eq!(quicksend::table().len(), 311);
    assert!(quicksend::is_installed());

    let config = Config {
        bare_multisig_is_standard: true,
        quicksend_table: Some(path.clone()),
    };
    let result = config::init(&config);
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(result, Err(ConfigError::AlreadyInitialized)));

    assert_eq!(config::policy(), Policy::default());
    assert_eq!(quicksend::table().len(), 311);
}
