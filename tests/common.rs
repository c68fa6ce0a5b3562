#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rsu() -> Command {
    cargo_bin_cmd!("rsetup")
}

/// Command already pointed at the test database, in test mode.
pub fn rsu_db(db_path: &str) -> Command {
    let mut cmd = rsu();
    cmd.args(["--db", db_path, "--test"]);
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rsetup.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Initialize the DB and add one car (id 1).
pub fn init_with_car(db_path: &str) {
    rsu_db(db_path).arg("init").assert().success();
    rsu_db(db_path)
        .args(["car", "add", "Late Model"])
        .assert()
        .success();
}

/// Car with three number parts: #1 LF Spring, #2 RF Spring (Suspension)
/// and #3 Jet (Engine / Carb).
pub fn init_with_parts(db_path: &str) {
    init_with_car(db_path);
    rsu_db(db_path)
        .args([
            "part", "add", "Spring", "--loc", "lf,rf", "--sub", "Suspension", "--unit", "lb",
        ])
        .assert()
        .success();
    rsu_db(db_path)
        .args(["part", "add", "Jet", "--loc", "engine", "--sub", "Carb"])
        .assert()
        .success();
}

/// Open the test database directly for assertions on stored rows.
pub fn open(db_path: &str) -> rusqlite::Connection {
    rusqlite::Connection::open(db_path).expect("open db")
}

pub fn count(db_path: &str, sql: &str) -> i64 {
    open(db_path)
        .query_row(sql, [], |r| r.get(0))
        .expect("count query")
}
