use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{count, init_with_parts, open, rsu_db, setup_test_db};

fn current_value(db_path: &str, part_id: i64) -> String {
    open(db_path)
        .query_row(
            "SELECT value FROM part_values WHERE part_id = ?1",
            [part_id],
            |r| r.get(0),
        )
        .expect("value row")
}

fn snapshot(db_path: &str, session_id: i64) -> String {
    open(db_path)
        .query_row(
            "SELECT snapshot FROM session_values WHERE session_id = ?1",
            [session_id],
            |r| r.get(0),
        )
        .expect("snapshot row")
}

#[test]
fn test_garage_edit_save_and_load() {
    let db_path = setup_test_db("garage_flow");
    init_with_parts(&db_path);

    rsu_db(&db_path)
        .args(["garage", "set", "3", "72"])
        .assert()
        .success();
    rsu_db(&db_path)
        .args(["garage", "inc", "3"])
        .assert()
        .success()
        .stdout(contains("= 73"));
    rsu_db(&db_path)
        .args(["garage", "set", "3", "rich"])
        .assert()
        .failure()
        .stderr(contains("Invalid numeric value"));

    rsu_db(&db_path)
        .args(["garage", "show"])
        .assert()
        .success()
        .stdout(contains("Jet").and(contains("73")));

    rsu_db(&db_path)
        .args(["garage", "save", "--title", "Baseline"])
        .assert()
        .success()
        .stdout(contains("'Baseline'").and(contains("Garage session on")));
    assert!(snapshot(&db_path, 1).contains(r#""3":"73""#));

    rsu_db(&db_path)
        .args(["garage", "set", "3", "60"])
        .assert()
        .success();
    rsu_db(&db_path)
        .args(["garage", "load", "1"])
        .assert()
        .success()
        .stdout(contains("Modified from Baseline at"));
    assert_eq!(current_value(&db_path, 3), "73");

    // a recent garage event is reused in test mode
    rsu_db(&db_path)
        .args(["garage", "save", "--from", "1"])
        .assert()
        .success()
        .stdout(contains("Modified from Baseline at"));
    assert_eq!(count(&db_path, "SELECT COUNT(*) FROM events"), 1);
    assert_eq!(count(&db_path, "SELECT COUNT(*) FROM sessions"), 2);

    rsu_db(&db_path)
        .args(["garage", "save", "--new-event"])
        .assert()
        .success()
        .stdout(contains("Current Setup at"));
    assert_eq!(count(&db_path, "SELECT COUNT(*) FROM events"), 2);

    rsu_db(&db_path)
        .args(["garage", "history"])
        .assert()
        .success()
        .stdout(contains("Baseline").and(contains("Garage")));
}

#[test]
fn test_table_part_editing() {
    let db_path = setup_test_db("garage_table");
    init_with_parts(&db_path);
    rsu_db(&db_path)
        .args(["part", "add", "Shock curve", "--type", "table", "--loc", "center"])
        .assert()
        .success();

    rsu_db(&db_path)
        .args(["garage", "table", "4", "add-column"])
        .assert()
        .success();
    rsu_db(&db_path)
        .args(["garage", "table", "4", "cell", "2", "1", "10"])
        .assert()
        .success()
        .stdout(contains("2 row(s) x 2 column(s)"));
    rsu_db(&db_path)
        .args(["garage", "table", "4", "delete-row", "0"])
        .assert()
        .failure();
    rsu_db(&db_path)
        .args(["garage", "table", "3", "add-row"])
        .assert()
        .failure()
        .stderr(contains("not a table part"));
}

#[test]
fn test_trackside_event_and_submit() {
    let db_path = setup_test_db("trackside_flow");
    init_with_parts(&db_path);
    rsu_db(&db_path)
        .args(["garage", "set", "1", "250"])
        .assert()
        .success();

    rsu_db(&db_path)
        .args([
            "trackside", "new", "Eldora", "--date", "2025-06-14", "--add-session", "B-Main",
        ])
        .assert()
        .success()
        .stdout(contains("Racing at Eldora").and(contains("4 session(s)")));

    rsu_db(&db_path)
        .args(["trackside", "show", "2"])
        .assert()
        .success()
        .stdout(contains("Heat").and(contains("250")));

    rsu_db(&db_path)
        .args(["trackside", "submit", "2", "--set", "1=275"])
        .assert()
        .success();
    rsu_db(&db_path)
        .args(["trackside", "submit", "2", "--set", "1=280"])
        .assert()
        .success();

    assert_eq!(
        count(&db_path, "SELECT COUNT(*) FROM session_values WHERE session_id = 2"),
        1
    );
    assert!(snapshot(&db_path, 2).contains(r#""1":"280""#));
    assert_eq!(current_value(&db_path, 1), "280");

    rsu_db(&db_path)
        .args(["trackside", "submit", "2", "--set", "lf=3"])
        .assert()
        .failure()
        .stderr(contains("PART_ID=VALUE"));

    rsu_db(&db_path)
        .args(["trackside", "list"])
        .assert()
        .success()
        .stdout(contains("Racing at Eldora"));

    rsu_db(&db_path)
        .args(["track", "list"])
        .assert()
        .success()
        .stdout(contains("Eldora").and(contains("Garage").not()));
}

#[test]
fn test_garage_track_is_reserved() {
    let db_path = setup_test_db("trackside_reserved");
    init_with_parts(&db_path);

    rsu_db(&db_path)
        .args(["trackside", "new", "garage"])
        .assert()
        .failure()
        .stderr(contains("reserved"));
}

#[test]
fn test_trackside_today() {
    let db_path = setup_test_db("trackside_today");
    init_with_parts(&db_path);

    rsu_db(&db_path)
        .args(["trackside", "today"])
        .assert()
        .success()
        .stdout(contains("No race event today"));

    rsu_db(&db_path)
        .args(["trackside", "new", "Knoxville", "--session", "Hot Laps"])
        .assert()
        .success();

    rsu_db(&db_path)
        .args(["trackside", "today"])
        .assert()
        .success()
        .stdout(contains("Racing at Knoxville").and(contains("Hot Laps")));
}

#[test]
fn test_part_delete_scrubs_snapshots() {
    let db_path = setup_test_db("part_delete_scrub");
    init_with_parts(&db_path);
    rsu_db(&db_path)
        .args(["trackside", "new", "Eldora"])
        .assert()
        .success();
    rsu_db(&db_path)
        .args(["trackside", "submit", "1", "--set", "1=250", "--set", "3=72"])
        .assert()
        .success();

    rsu_db(&db_path)
        .args(["part", "delete", "1"])
        .assert()
        .success()
        .stdout(contains("1 session(s)").and(contains("deleted")));

    let snap = snapshot(&db_path, 1);
    assert!(!snap.contains(r#""1":"#));
    assert!(snap.contains(r#""3":"72""#));
    assert_eq!(
        count(&db_path, "SELECT COUNT(*) FROM part_values WHERE part_id = 1"),
        0
    );
}

#[test]
fn test_event_delete_cascades() {
    let db_path = setup_test_db("event_cascade");
    init_with_parts(&db_path);
    rsu_db(&db_path)
        .args(["trackside", "new", "Eldora"])
        .assert()
        .success();
    rsu_db(&db_path)
        .args(["trackside", "submit", "3"])
        .assert()
        .success();

    rsu_db(&db_path)
        .args(["event", "add-session", "1", "Dash"])
        .assert()
        .success()
        .stdout(contains("Session #4 'Dash'"));
    rsu_db(&db_path)
        .args(["session", "rename", "4", "Trophy Dash"])
        .assert()
        .success();
    rsu_db(&db_path)
        .args(["event", "show", "1"])
        .assert()
        .success()
        .stdout(contains("Trophy Dash"));

    rsu_db(&db_path)
        .args(["session", "delete", "1"])
        .assert()
        .success();
    assert_eq!(count(&db_path, "SELECT COUNT(*) FROM sessions"), 3);

    rsu_db(&db_path)
        .args(["event", "delete", "1"])
        .assert()
        .success();
    assert_eq!(count(&db_path, "SELECT COUNT(*) FROM sessions"), 0);
    assert_eq!(count(&db_path, "SELECT COUNT(*) FROM session_values"), 0);
}

#[test]
fn test_car_delete_cascades() {
    let db_path = setup_test_db("car_cascade");
    init_with_parts(&db_path);
    rsu_db(&db_path)
        .args(["garage", "save"])
        .assert()
        .success();

    rsu_db(&db_path)
        .args(["car", "delete", "1"])
        .assert()
        .success();

    for table in ["parts", "part_values", "events", "sessions", "session_values"] {
        assert_eq!(
            count(&db_path, &format!("SELECT COUNT(*) FROM {table}")),
            0,
            "{table} should be empty"
        );
    }
}
