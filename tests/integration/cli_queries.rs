#![allow(missing_docs)]

use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

struct Dataset {
    dir: TempDir,
    config: PathBuf,
}

fn dataset() -> Dataset {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("users.csv"),
        "id,name,joined\n1,Ada,2019-01-01\n2,Grace,2019-02-01\n3,Alan,2019-03-01\n4,Adele,2019-04-01\n",
    )
    .expect("users");
    fs::write(
        dir.path().join("follows.csv"),
        "follower,followed,at\n1,2,2020-01-01\n1,3,2020-01-02\n2,3,2020-01-03\n4,2,2020-01-04\n4,3,2020-01-05\n",
    )
    .expect("follows");
    fs::write(
        dir.path().join("weets.csv"),
        "id,author,message,at\n1,1,Hello #Rust,2020-02-01 09:00:00\n2,2,#rust and #cli,2020-02-02 10:00:00\n3,1,quiet day,2020-02-02 11:00:00\n",
    )
    .expect("weets");
    let config = dir.path().join("config.toml");
    fs::write(
        &config,
        "[dataset]\nusers = \"users.csv\"\nfollows = \"follows.csv\"\nweets = \"weets.csv\"\n",
    )
    .expect("config");
    Dataset { dir, config }
}

fn witter(data: &Dataset) -> Command {
    let mut cmd = cargo_bin_cmd!("witter");
    cmd.env_remove("RUST_LOG").arg("--config").arg(&data.config);
    cmd
}

fn json(data: &Dataset, args: &[&str]) -> Value {
    let output = witter(data)
        .args(["--format", "json"])
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).expect("valid json")
}

#[test]
fn following_and_followers_are_recent_first() {
    let data = dataset();
    assert_eq!(json(&data, &["following", "1"]), serde_json::json!([3, 2]));
    assert_eq!(json(&data, &["followers", "3"]), serde_json::json!([4, 2, 1]));
    assert_eq!(json(&data, &["followers", "99"]), serde_json::json!([]));
}

#[test]
fn mutual_queries_and_membership() {
    let data = dataset();
    assert_eq!(
        json(&data, &["mutual-followers", "2", "3"]),
        serde_json::json!([4, 1])
    );
    assert_eq!(
        json(&data, &["mutual-following", "1", "4"]),
        serde_json::json!([3, 2])
    );
    assert_eq!(json(&data, &["is-following", "1", "2"]), Value::Bool(true));
    assert_eq!(json(&data, &["is-following", "2", "1"]), Value::Bool(false));
}

#[test]
fn top_users_report_counts() {
    let data = dataset();
    let rows = json(&data, &["top-users", "--limit", "2"]);
    assert_eq!(rows[0]["id"], 3);
    assert_eq!(rows[0]["followers"], 3);
    assert_eq!(rows[1]["id"], 2);
    assert_eq!(rows.as_array().map(Vec::len), Some(2));
}

#[test]
fn weet_filters_and_trending() {
    let data = dataset();
    let by_author = json(&data, &["weets", "--author", "1"]);
    assert_eq!(by_author[0]["id"], 3);
    assert_eq!(by_author[1]["id"], 1);

    let on_day = json(&data, &["weets", "--on", "2020-02-02"]);
    assert_eq!(on_day.as_array().map(Vec::len), Some(2));

    let trending = json(&data, &["trending", "--limit", "1"]);
    assert_eq!(trending[0]["tag"], "#rust");
    assert_eq!(trending[0]["count"], 2);

    let weet = json(&data, &["weet", "2"]);
    assert_eq!(weet["author"], 2);
    assert_eq!(weet["posted_at"], "2020-02-02T10:00:00Z");
}

#[test]
fn users_filter_by_name_and_date() {
    let data = dataset();
    let users = json(&data, &["users", "--containing", "ad"]);
    assert_eq!(users[0]["name"], "Adele");
    assert_eq!(users[1]["name"], "Ada");
    let early = json(&data, &["users", "--before", "2019-02-15"]);
    assert_eq!(early.as_array().map(Vec::len), Some(2));
}

#[test]
fn stats_in_text_mode() {
    let data = dataset();
    let output = witter(&data)
        .arg("stats")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).expect("utf8");
    assert!(text.contains("Dataset"));
    assert!(text.contains("follows: 5"), "{text}");
}

#[test]
fn flags_override_config_paths() {
    let data = dataset();
    let other = data.dir.path().join("other.csv");
    fs::write(&other, "follower,followed,at\n7,8,2021-01-01\n").expect("other");
    let ids = json(&data, &["--follows", other.to_str().expect("utf8 path"), "following", "7"]);
    assert_eq!(ids, serde_json::json!([8]));
}

#[test]
fn unknown_weet_exits_with_error() {
    let data = dataset();
    let output = witter(&data).args(["weet", "404"]).assert().code(1).get_output().stderr.clone();
    let stderr = String::from_utf8(output).expect("utf8");
    assert!(stderr.contains("weet not found"), "{stderr}");
}

#[test]
fn conflicting_weet_filters_are_rejected() {
    let data = dataset();
    witter(&data)
        .args(["weets", "--author", "1", "--containing", "x"])
        .assert()
        .failure();
}

#[test]
fn config_path_prints_explicit_file() {
    let data = dataset();
    let output = witter(&data).arg("config-path").assert().success().get_output().stdout.clone();
    let printed = String::from_utf8(output).expect("utf8");
    assert_eq!(printed.trim(), data.config.display().to_string());
}
