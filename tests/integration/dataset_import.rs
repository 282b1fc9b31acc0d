#![allow(missing_docs)]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use time::macros::datetime;
use witter::cli::{load_dataset, DatasetPaths};
use witter::{SocialStore, StoreOptions, WitterError};

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write csv");
    path
}

fn store() -> SocialStore {
    SocialStore::open(StoreOptions::default()).expect("open store")
}

#[test]
fn loads_all_three_files() {
    let dir = TempDir::new().expect("tempdir");
    let paths = DatasetPaths {
        users: Some(write(
            &dir,
            "users.csv",
            "id,name,joined\n1,Ada,2019-01-01\n2,Grace,2019-02-01 10:00:00\n3,Alan,2019-03-01T08:00:00Z\n2,Dup,2019-04-01\n",
        )),
        follows: Some(write(
            &dir,
            "follows.csv",
            "follower,followed,at\n1,2,2020-01-01\n1,3,2020-01-02\n2,3,2020-01-03\n1,2,2020-01-04\n3,3,2020-01-05\n",
        )),
        weets: Some(write(
            &dir,
            "weets.csv",
            "id,author,message,at\n1,1,\"Hello, #World\",2020-02-01 09:00:00\n2,1,again #world #rust,2020-02-02\n1,1,dup,2020-02-03\n",
        )),
    };

    let mut store = store();
    let summary = load_dataset(&mut store, &paths).expect("load dataset");
    assert_eq!(summary.users_imported, 3);
    assert_eq!(summary.users_skipped, 1);
    assert_eq!(summary.follows_imported, 3);
    assert_eq!(summary.follows_skipped, 2);
    assert_eq!(summary.weets_imported, 2);
    assert_eq!(summary.weets_skipped, 1);

    assert_eq!(store.following(1), vec![3, 2]);
    assert_eq!(store.user(2).map(|u| u.joined), Some(datetime!(2019-02-01 10:00 UTC)));
    assert_eq!(store.post(1).map(|p| p.message), Some("Hello, #World".to_string()));
    assert_eq!(store.trending_tags(1), vec!["#world"]);
}

#[test]
fn columns_matched_by_name() {
    let dir = TempDir::new().expect("tempdir");
    let paths = DatasetPaths {
        follows: Some(write(&dir, "f.csv", "At,Followed,Follower\n2020-01-01,2,1\n")),
        ..DatasetPaths::default()
    };
    let mut store = store();
    load_dataset(&mut store, &paths).expect("load dataset");
    assert!(store.is_following(1, 2));
}

#[test]
fn bad_timestamp_names_line_and_column() {
    let dir = TempDir::new().expect("tempdir");
    let paths = DatasetPaths {
        follows: Some(write(
            &dir,
            "follows.csv",
            "follower,followed,at\n1,2,2020-01-01\n2,3,not-a-date\n",
        )),
        ..DatasetPaths::default()
    };
    let err = load_dataset(&mut store(), &paths).expect_err("bad row");
    match err {
        WitterError::Parse { context, .. } => {
            assert!(context.contains("follows.csv"), "{context}");
            assert!(context.contains(":3 "), "{context}");
            assert!(context.contains("'at'"), "{context}");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn missing_column_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    let paths = DatasetPaths {
        users: Some(write(&dir, "users.csv", "id,joined\n1,2020-01-01\n")),
        ..DatasetPaths::default()
    };
    let err = load_dataset(&mut store(), &paths).expect_err("missing column");
    assert!(err.to_string().contains("column 'name' not found"));
}

#[test]
fn missing_file_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let paths = DatasetPaths {
        weets: Some(dir.path().join("absent.csv")),
        ..DatasetPaths::default()
    };
    assert!(load_dataset(&mut store(), &paths).is_err());
}
