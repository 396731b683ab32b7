//! Integration tests for the routing table and query rewrite.

use imaging_proxy::proxy::rewrite::{rename_image_set_id, Rewrite};
use imaging_proxy::proxy::routing::{PathMatcher, RouteRule, RoutingTable};

const RUNTIME: &str = "runtime-medical-imaging.us-east-1.amazonaws.com";
const DICOM: &str = "dicom-medical-imaging.us-east-1.amazonaws.com";

#[test]
fn non_studies_paths_go_to_default_host_unchanged() {
    let table = RoutingTable::medical_imaging(RUNTIME, DICOM);
    let cases = [
        ("/", None),
        ("/datastore/d1/imageSet/i1/getImageSetMetadata", None),
        ("/other", Some("x=1")),
        ("/study/1", Some("ImageSetID=ABC")),
        ("/STUDIES/1", Some("a=%20b")),
    ];

    for (path, query) in cases {
        let d = table.route(path, query);
        assert_eq!(d.host, RUNTIME, "path {path}");
        assert_eq!(d.path, path);
        assert_eq!(d.query.as_deref(), query);
    }
}

#[test]
fn studies_paths_go_to_dicom_host() {
    let table = RoutingTable::medical_imaging(RUNTIME, DICOM);
    for path in [
        "/studies/1",
        "/datastore/d1/studies/1.2.3/series/4.5.6/instances",
        "/a/studies/",
    ] {
        assert_eq!(table.route(path, None).host, DICOM, "path {path}");
    }
}

#[test]
fn studies_rewrite_scenarios() {
    let table = RoutingTable::medical_imaging(RUNTIME, DICOM);

    let d = table.route("/studies/1", Some("ImageSetID=ABC123"));
    assert_eq!(d.path_and_query(), "/studies/1?imageSetId=abc123");

    let d = table.route("/studies/1", Some("includefield=All&ImageSetID=DeF"));
    let query = d.query.unwrap();
    assert!(query.contains("imageSetId=def"));
    assert!(query.contains("includefield=All"));
    assert!(!query.contains("ImageSetID"));

    let d = table.route("/studies/1", Some("includefield=All"));
    assert_eq!(d.query.as_deref(), Some("includefield=All"));
}

#[test]
fn rewrite_is_idempotent() {
    let once = rename_image_set_id("x=1&ImageSetID=ABC");
    assert_eq!(rename_image_set_id(&once), once);
}

#[test]
fn custom_rules_are_evaluated_in_order() {
    let table = RoutingTable::new(
        vec![
            RouteRule {
                name: "dicom",
                matcher: PathMatcher::Contains("/studies/"),
                host: DICOM.into(),
                rewrite: Some(Rewrite::ImageSetId),
            },
            RouteRule {
                name: "catch-all",
                matcher: PathMatcher::Any,
                host: "other.example.com".into(),
                rewrite: None,
            },
        ],
        RUNTIME,
    );

    assert_eq!(table.rules().len(), 2);
    assert_eq!(table.route("/studies/1", None).rule, "dicom");
    assert_eq!(table.route("/x", None).rule, "catch-all");
    assert_eq!(table.route("/x", None).host, "other.example.com");
}
