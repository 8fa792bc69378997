//! Route table resolution contract.

mod common;

use common::{route, route_table};

#[test]
fn test_root() {
    let r1 = route(None, None, None);
    let table = route_table(&[r1.clone()]);
    assert_eq!(table.resolve("/").unwrap().spec(), &r1);
    assert!(table.resolve("/x").is_none());
}

#[test]
fn test_similar_matches_constant() {
    let r1 = route(None, None, Some("clients/all"));
    let r2 = route(None, None, Some("clients/:id"));
    let table = route_table(&[r1.clone(), r2]);
    assert_eq!(table.resolve("/clients/all").unwrap().spec(), &r1);
}

#[test]
fn test_similar_matches_param() {
    let r1 = route(None, None, Some("clients/all"));
    let r2 = route(None, None, Some("clients/:id"));
    let table = route_table(&[r1, r2.clone()]);
    let resolved = table.resolve("/clients/123").unwrap();
    assert_eq!(resolved.spec(), &r2);
    assert_eq!(resolved.params.get("id"), Some("123"));
}

#[test]
fn test_ignores_param_region() {
    let r1 = route(Some("cntrl"), None, None);
    let r2 = route(Some("cntrl"), None, Some("clients/:id"));
    let table = route_table(&[r1.clone(), r2]);
    assert_eq!(table.resolve("/cntrl").unwrap().spec(), &r1);
}

#[test]
fn test_finds_param_region() {
    let r1 = route(Some("cntrl"), None, None);
    let r2 = route(Some("cntrl"), None, Some("clients/:id"));
    let table = route_table(&[r1, r2.clone()]);
    let resolved = table.resolve("/cntrl/clients/23455").unwrap();
    assert_eq!(resolved.spec(), &r2);
    assert_eq!(resolved.params.get("id"), Some("23455"));
}

#[test]
fn test_distinguishes_between_controller_and_action() {
    let r1 = route(Some("cntrl"), None, None);
    let r2 = route(None, Some("actn"), None);
    let table = route_table(&[r1, r2.clone()]);
    assert_eq!(table.resolve("/actn").unwrap().spec(), &r2);
}

#[test]
fn test_not_found() {
    let table = route_table(&[route(Some("cntrl"), None, None), route(None, Some("actn"), None)]);
    assert!(table.resolve("/test").is_none());
}

#[test]
fn test_multi_param_regions() {
    let r1 = route(Some("cntrl"), Some("actn"), Some(":id"));
    let r2 = route(Some("cntrl"), Some("actn"), Some(":id/:name"));
    let table = route_table(&[r1.clone(), r2.clone()]);

    let resolved = table.resolve("/cntrl/actn/123/bob").unwrap();
    assert_eq!(resolved.spec(), &r2);
    assert_eq!(resolved.params.get("id"), Some("123"));
    assert_eq!(resolved.params.get("name"), Some("bob"));

    let resolved = table.resolve("/cntrl/actn/123").unwrap();
    assert_eq!(resolved.spec(), &r1);
    assert_eq!(resolved.params.get("id"), Some("123"));
}

#[test]
fn test_custom_patterns() {
    let numeric = route(Some("cntrl"), Some("actn"), Some(":id<[0-9]+>"));
    let alpha = route(Some("cntrl"), Some("actn"), Some(":id<[a-z]+>"));
    let table = route_table(&[numeric.clone(), alpha.clone()]);

    assert_eq!(table.resolve("/cntrl/actn/bob").unwrap().spec(), &alpha);
    assert_eq!(table.resolve("/cntrl/actn/123").unwrap().spec(), &numeric);
    assert!(table.resolve("/cntrl/actn/BOB").is_none());
}

#[test]
fn test_symbols_in_literal_segments() {
    let r1 = route(Some("cntrl"), Some("actn"), Some("a+b/:id<[0-9]+>/:name"));
    let table = route_table(&[r1.clone()]);
    let resolved = table.resolve("/cntrl/actn/a+b/7/x").unwrap();
    assert_eq!(resolved.spec(), &r1);
    assert!(table.resolve("/cntrl/actn/aab/7/x").is_none());
}

#[test]
fn test_parameter_never_spans_segments() {
    let table = route_table(&[route(Some("files"), None, Some(":name"))]);
    assert!(table.resolve("/files/a/b").is_none());
    assert_eq!(
        table.resolve("/files/a.txt").unwrap().params.get("name"),
        Some("a.txt")
    );
}
