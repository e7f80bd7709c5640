//! Command-line settings tests

mod common;

use std::sync::Arc;
use std::thread;

use nodecfg::ArgumentStore;

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_reparse_is_idempotent() {
    let tokens = ["-a=1", "--b", "-noc", "-d=x", "-d=y", "stop", "-e"];
    let first = ArgumentStore::from_tokens(tokens);
    let second = ArgumentStore::from_tokens(tokens);
    first.parse_parameters(tokens);

    assert_eq!(first.snapshot(), second.snapshot());
    assert_eq!(first.multi_snapshot(), second.multi_snapshot());
    assert!(!first.is_set("-e"));
}

#[test]
fn test_double_dash_is_single_dash() {
    let store = ArgumentStore::from_tokens(["--datadir=/tmp/x"]);
    assert_eq!(store.get_string("-datadir", ""), "/tmp/x");
    assert!(!store.is_set("--datadir"));
}

#[test]
fn test_split_token() {
    assert_eq!(nodecfg::settings::split_token("-a=b=c"), ("-a", "b=c"));
    assert_eq!(nodecfg::settings::split_token("-flag"), ("-flag", ""));
}

// ============================================================================
// Negative settings
// ============================================================================

#[test]
fn test_negative_forms() {
    let store = ArgumentStore::from_tokens(["-nofoo", "-nobar=0"]);
    assert_eq!(store.get_string("-foo", ""), "0");
    assert_eq!(store.get_string("-bar", ""), "1");
    // The negative key itself stays in the store.
    assert!(store.is_set("-nofoo"));
    assert!(!store.get_bool("-foo", true));
    assert!(store.get_bool("-bar", false));
}

#[test]
fn test_explicit_positive_blocks_inversion() {
    let store = ArgumentStore::from_tokens(["-foo=7", "-nofoo"]);
    assert_eq!(store.get_int("-foo", 0), 7);
}

// ============================================================================
// Typed access
// ============================================================================

#[test]
fn test_bool_decoding() {
    let store = ArgumentStore::from_tokens(["-foo", "-zero=0", "-abc=abc", "-five=5"]);
    assert!(store.get_bool("-foo", false));
    assert!(!store.get_bool("-zero", true));
    assert!(!store.get_bool("-abc", true));
    assert!(store.get_bool("-five", false));
}

#[test]
fn test_soft_and_force_set() {
    let store = ArgumentStore::from_tokens(["-port=1"]);
    assert!(!store.soft_set("-port", "2"));
    assert!(store.soft_set_bool("-listen", true));
    store.force_set("-port", "3");

    assert_eq!(store.get_int("-port", 0), 3);
    assert_eq!(store.get_multi("-port"), vec!["3"]);
    assert!(store.get_bool("-listen", false));
}

#[test]
fn test_shared_store_across_threads() {
    let store = Arc::new(ArgumentStore::from_tokens(["-n=1"]));
    let writers: Vec<_> = (0..4)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                store.soft_set(&format!("-k{}", i), "v");
                store.get_int("-n", 0)
            })
        })
        .collect();
    for handle in writers {
        assert_eq!(handle.join().unwrap(), 1);
    }
    assert_eq!(store.snapshot().len(), 5);
}
