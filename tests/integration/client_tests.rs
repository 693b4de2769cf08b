//! Facade behavior: config loading, caching, normalization, close

use crate::common::{self, VALID_PROFILE};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tempfile::TempDir;

#[test]
fn test_connect_builds_connection_string() {
    let root = TempDir::new().unwrap();
    common::write_profile(root.path(), "payments", VALID_PROFILE);
    let client = common::test_client(&root);

    let conn = client.connect("payments");
    assert!(conn.is_some());
    // port=0 in the profile defaults to 3306; omitted params are filled in
    // and serialized in sorted key order.
    assert_eq!(
        client.driver().last_dsn().as_deref(),
        Some("u:p@tcp(db1:3306)/orders?charset=utf8&loc=UTC&parseTime=true")
    );
}

#[test]
fn test_connect_unknown_path_returns_none() {
    let root = TempDir::new().unwrap();
    let client = common::test_client(&root);

    assert!(client.connect("absent").is_none());
    assert_eq!(client.driver().open_attempts(), 0);
}

#[test]
fn test_connect_invalid_profile_is_not_cached() {
    let root = TempDir::new().unwrap();
    common::write_profile(
        root.path(),
        "payments",
        r#"
        host = ""
        user = "u"
        password = "p"
        db = "orders"
        "#,
    );
    let client = common::test_client(&root);

    assert!(client.connect("payments").is_none());
    assert_eq!(client.driver().open_attempts(), 0);

    // The failed load was not cached: fixing the file is enough.
    common::write_profile(root.path(), "payments", VALID_PROFILE);
    assert!(client.connect("payments").is_some());
}

#[test]
fn test_get_config_is_idempotent() {
    let root = TempDir::new().unwrap();
    common::write_profile(root.path(), "payments", VALID_PROFILE);
    let client = common::test_client(&root);

    let first = client.get_config("payments").unwrap();
    assert_eq!(first.host, "db1");
    assert_eq!(first.port, 3306);
    assert_eq!(first.path(), "db/mysql/payments");
    assert!(first.last_modified() > 0);

    // Editing the file after the first load must not be observed.
    common::write_profile(
        root.path(),
        "payments",
        r#"
        host = "db2"
        user = "u"
        password = "p"
        db = "orders"
        "#,
    );
    let second = client.get_config("payments").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.host, "db1");
}

#[test]
fn test_get_config_never_connects() {
    let root = TempDir::new().unwrap();
    common::write_profile(root.path(), "payments", VALID_PROFILE);
    let client = common::test_client(&root);

    assert!(client.get_config("payments").is_some());
    assert!(client.get_config("payments").is_some());
    assert_eq!(client.driver().open_attempts(), 0);
}

#[test]
fn test_get_config_missing_returns_none() {
    let root = TempDir::new().unwrap();
    let client = common::test_client(&root);
    assert!(client.get_config("absent").is_none());
}

#[test]
fn test_path_variants_share_one_connection() {
    let root = TempDir::new().unwrap();
    common::write_profile(root.path(), "foo", VALID_PROFILE);
    let client = common::test_client(&root);

    let a = client.connect("foo").unwrap();
    let b = client.connect("/foo").unwrap();
    let c = client.connect("db/mysql/foo").unwrap();
    let d = client.connect("/db/mysql/foo/").unwrap();

    assert!(Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&b, &c));
    assert!(Arc::ptr_eq(&c, &d));
    assert_eq!(client.driver().open_attempts(), 1);
}

#[test]
fn test_explicit_params_reach_connection_string() {
    let root = TempDir::new().unwrap();
    common::write_profile(
        root.path(),
        "payments",
        r#"
        host = "db1"
        user = "u"
        password = "p"
        db = "orders"

        [params]
        charset = "utf8mb4"
        loc = "Local"
        "#,
    );
    let client = common::test_client(&root);

    client.connect("payments").unwrap();
    assert_eq!(
        client.driver().last_dsn().as_deref(),
        Some("u:p@tcp(db1:3306)/orders?charset=utf8mb4&loc=Local&parseTime=true")
    );
}

#[test]
fn test_close_is_a_noop_while_operations_are_in_flight() {
    let root = TempDir::new().unwrap();
    common::write_profile(root.path(), "payments", VALID_PROFILE);
    let client = common::test_client(&root);

    let conn = client.connect("payments").unwrap();
    conn.state.in_use.store(2, Ordering::SeqCst);

    assert!(!client.close(&conn));
    assert!(!conn.state.closed.load(Ordering::SeqCst));
}

#[test]
fn test_close_idle_connection_then_reconnect_reopens() {
    let root = TempDir::new().unwrap();
    common::write_profile(root.path(), "payments", VALID_PROFILE);
    let client = common::test_client(&root);

    let conn = client.connect("payments").unwrap();
    assert!(client.close(&conn));
    assert!(conn.state.closed.load(Ordering::SeqCst));

    // The registry kept the handle; the next connect notices the dead link
    // and opens a fresh one.
    let fresh = client.connect("payments").unwrap();
    assert!(!Arc::ptr_eq(&conn, &fresh));
    assert_eq!(client.driver().open_attempts(), 2);
}
