mod common;

use std::fs;

use common::link;
use likes_core::LinkSet;
use likes_engine::{
    ensure_output_dir, LinkStore, FAILED_LINKS_FILE, FILTERED_LINKS_FILE, RAW_LINKS_FILE,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn raw_list_is_sorted_and_newline_delimited() {
    let temp = TempDir::new().unwrap();
    let store = LinkStore::new(temp.path());
    let links: LinkSet = [
        "https://soundcloud.com/b/two",
        "https://soundcloud.com/a/one",
        "https://soundcloud.com/c/three",
    ]
    .into_iter()
    .map(link)
    .collect();

    let path = store.write_raw(&links).unwrap();

    assert_eq!(path.file_name().unwrap(), RAW_LINKS_FILE);
    assert_eq!(
        fs::read_to_string(path).unwrap(),
        "https://soundcloud.com/a/one\nhttps://soundcloud.com/b/two\nhttps://soundcloud.com/c/three"
    );
}

#[test]
fn filtered_list_round_trips_and_is_replaced() {
    let temp = TempDir::new().unwrap();
    let store = LinkStore::new(temp.path());
    store
        .write_filtered(&[link("https://soundcloud.com/old/track")])
        .unwrap();

    let fresh = vec![
        link("https://soundcloud.com/a/one"),
        link("https://soundcloud.com/b/two"),
    ];
    let path = store.write_filtered(&fresh).unwrap();

    assert_eq!(path, temp.path().join(FILTERED_LINKS_FILE));
    assert_eq!(store.read_filtered().unwrap(), fresh);
}

#[test]
fn missing_failed_list_reads_as_empty_and_clear_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let store = LinkStore::new(temp.path());

    assert!(store.read_failed().unwrap().is_empty());
    store.clear_failed().unwrap();

    store
        .write_failed(&[link("https://soundcloud.com/a/one")])
        .unwrap();
    assert!(temp.path().join(FAILED_LINKS_FILE).exists());
    store.clear_failed().unwrap();
    assert!(!temp.path().join(FAILED_LINKS_FILE).exists());
}

#[test]
fn log_lines_are_appended() {
    let temp = TempDir::new().unwrap();
    let store = LinkStore::new(temp.path()).with_log_file("run.log");

    store.append_log_line("first").unwrap();
    store.append_log_line("second\nthird").unwrap();

    assert_eq!(
        fs::read_to_string(temp.path().join("run.log")).unwrap(),
        "first\nsecond\nthird\n"
    );
}

#[test]
fn no_partial_file_when_dir_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let store = LinkStore::new(file_path.clone());
    let result = store.write_filtered(&[link("https://soundcloud.com/a/one")]);

    assert!(result.is_err());
    assert!(!file_path.with_file_name(FILTERED_LINKS_FILE).exists());
}
