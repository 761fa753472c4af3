//! Tests for resolve_location_children

use rstest::{fixture, rstest};

use loctree::util::testing;
use loctree::{resolve_location_children, LocationRecord};

fn location(id: &str, parent: Option<&str>) -> LocationRecord {
    let record = LocationRecord::new(id);
    match parent {
        Some(parent) => record.with_parent(parent),
        None => record,
    }
}

fn ids(records: &[LocationRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

/// country
/// ├── province-a
/// │   ├── district-a1
/// │   │   └── office-a1
/// │   └── district-a2
/// └── province-b
///     └── district-b1
/// elsewhere
/// └── elsewhere-child
#[fixture]
fn forest() -> Vec<LocationRecord> {
    testing::init_test_setup();
    vec![
        location("office-a1", Some("district-a1")),
        location("country", None),
        location("province-a", Some("country")),
        location("elsewhere", None),
        location("district-a1", Some("province-a")),
        location("province-b", Some("country")),
        location("elsewhere-child", Some("elsewhere")),
        location("district-a2", Some("province-a")),
        location("district-b1", Some("province-b")),
    ]
}

#[test]
fn given_empty_locations_when_resolving_then_empty() {
    let result = resolve_location_children("anyUUID", &[]);
    assert!(result.is_empty());
}

#[test]
fn given_parent_with_no_children_when_resolving_then_empty() {
    let result = resolve_location_children("uuid1", &[location("uuid1", None)]);
    assert!(result.is_empty());
}

#[test]
fn given_single_level_hierarchy_when_resolving_then_returns_child() {
    let uuid1 = location("uuid1", None);
    let uuid2 = location("uuid2", Some("uuid1"));

    let result = resolve_location_children("uuid1", &[uuid1, uuid2.clone()]);

    assert!(result.contains(&uuid2));
    assert_eq!(result.len(), 1);
}

#[test]
fn given_multi_level_hierarchy_when_resolving_then_parent_before_descendant() {
    let uuid1 = location("uuid1", None);
    let uuid2 = location("uuid2", Some("uuid1"));
    let uuid3 = location("uuid3", Some("uuid2"));

    let result = resolve_location_children("uuid1", &[uuid1, uuid2.clone(), uuid3.clone()]);

    assert_eq!(result, vec![uuid2, uuid3]);
}

#[test]
fn given_chain_in_reverse_input_order_when_resolving_then_still_level_order() {
    let records = vec![
        location("uuid3", Some("uuid2")),
        location("uuid2", Some("uuid1")),
        location("uuid1", None),
    ];

    let result = resolve_location_children("uuid1", &records);

    assert_eq!(ids(&result), vec!["uuid2", "uuid3"]);
}

#[test]
fn given_unknown_root_when_resolving_then_empty() {
    let records = vec![location("uuid2", Some("uuid1")), location("uuid3", Some("uuid2"))];

    let result = resolve_location_children("uuid1", &records);

    assert!(result.is_empty());
}

#[rstest]
fn given_forest_when_resolving_then_breadth_first_with_input_sibling_order(
    forest: Vec<LocationRecord>,
) {
    let result = resolve_location_children("country", &forest);

    assert_eq!(
        ids(&result),
        vec![
            "province-a",
            "province-b",
            "district-a1",
            "district-a2",
            "district-b1",
            "office-a1",
        ]
    );
}

#[rstest]
fn given_forest_when_resolving_then_disjoint_subtree_excluded(forest: Vec<LocationRecord>) {
    let result = resolve_location_children("country", &forest);

    assert!(!ids(&result).contains(&"elsewhere"));
    assert!(!ids(&result).contains(&"elsewhere-child"));
    assert_eq!(ids(&resolve_location_children("elsewhere", &forest)), vec!["elsewhere-child"]);
}

#[rstest]
#[case("country")]
#[case("province-a")]
#[case("district-a1")]
#[case("office-a1")]
fn given_any_root_when_resolving_then_root_never_included(
    forest: Vec<LocationRecord>,
    #[case] root: &str,
) {
    let result = resolve_location_children(root, &forest);

    assert!(!ids(&result).contains(&root));
}

#[rstest]
fn given_same_input_when_resolving_twice_then_identical(forest: Vec<LocationRecord>) {
    let first = resolve_location_children("province-a", &forest);
    let second = resolve_location_children("province-a", &forest);

    assert_eq!(first, second);
    assert_eq!(ids(&first), vec!["district-a1", "district-a2", "office-a1"]);
}

#[rstest]
#[case("uuid1")]
#[case("Location/")]
#[case("Organization/uuid1")]
#[case("Location/uuid1/extra")]
fn given_malformed_reference_when_resolving_then_treated_as_no_parent(#[case] reference: &str) {
    let records = vec![
        location("uuid1", None),
        LocationRecord::new("uuid2").with_reference(reference),
    ];

    let result = resolve_location_children("uuid1", &records);

    assert!(result.is_empty());
}

#[test]
fn given_cycle_when_resolving_then_terminates() {
    let records = vec![
        location("a", Some("c")),
        location("b", Some("a")),
        location("c", Some("b")),
    ];

    let result = resolve_location_children("a", &records);

    assert_eq!(ids(&result), vec!["b", "c"]);
}

#[test]
fn given_json_records_when_resolving_then_results_equal_input_records() {
    let records: Vec<LocationRecord> = serde_json::from_str(
        r#"[
            { "resourceType": "Location", "id": "uuid1", "name": "HQ", "status": "active" },
            { "resourceType": "Location", "id": "uuid2", "name": "Branch",
              "partOf": { "reference": "Location/uuid1" }, "status": "active" }
        ]"#,
    )
    .unwrap();

    let result = resolve_location_children("uuid1", &records);

    assert_eq!(result, vec![records[1].clone()]);
}
