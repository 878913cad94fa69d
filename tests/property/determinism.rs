//! Property-based tests for classification determinism

use proptest::prelude::*;
use redirect_console::device::{self, builtin, HardwareIdentifier, Model, RuleTable, BUILTIN_RULES};

/// Classifying the same identifier twice gives the same model
#[test]
fn test_classify_determinism_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&"[0-9A-Fa-f]{12}", |raw| {
            assert_eq!(device::classify(&raw), device::classify(&raw));
            Ok(())
        })
        .unwrap();
}

/// Case of the input never changes the result
#[test]
fn test_classify_case_insensitive_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&"(000413|00087[Bb])[0-9A-Fa-f]{6}", |raw| {
            let upper = raw.to_ascii_uppercase();
            let lower = raw.to_ascii_lowercase();
            assert_eq!(device::classify(&upper), device::classify(&lower));
            Ok(())
        })
        .unwrap();
}

/// Identifiers outside the vendor prefixes never classify
#[test]
fn test_foreign_vendor_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&"[0-9A-F]{12}", |raw| {
            prop_assume!(!raw.starts_with("000413") && !raw.starts_with("00087B"));
            assert_eq!(device::classify(&raw), None);
            assert!(!device::validate(&raw));
            Ok(())
        })
        .unwrap();
}

/// A freshly compiled table agrees with the shared built-in one
#[test]
fn test_recompiled_table_agrees_property() {
    let table = RuleTable::compile(BUILTIN_RULES).unwrap();
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&"000413[0-9A-F]{6}", |raw| {
            let id = HardwareIdentifier::parse(&raw).unwrap();
            assert_eq!(table.classify(&id), builtin().classify(&id));
            Ok(())
        })
        .unwrap();
}

/// Pinned samples: these depend on rule order and must not drift
#[test]
fn test_table_order_samples() {
    let samples = [
        ("000413300001", Some(Model::SnomM9)),
        ("000413250001", Some(Model::Snom300)),
        ("00041394B400", Some(Model::SnomD765)),
        ("00041394B420", Some(Model::SnomD765)),
        ("00041394B421", Some(Model::Snom715)),
        ("00041394BF03", Some(Model::Snom715)),
        ("000413790FFF", Some(Model::SnomD765)),
        ("000413791000", Some(Model::SnomD745)),
        ("000413840016", Some(Model::SnomD305)),
        ("000413840079", Some(Model::SnomD305)),
        ("000413840080", Some(Model::SnomD315)),
        ("000413640000", Some(Model::SnomM200SC)),
        ("00087B081234", Some(Model::SnomM700)),
        ("00087BD71234", Some(Model::SnomM300)),
        ("000413000000", None),
    ];
    for (raw, expected) in samples {
        assert_eq!(device::classify(raw), expected, "{}", raw);
    }
}
