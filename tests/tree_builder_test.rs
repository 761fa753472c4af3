//! Tests for TreeBuilder and LocationTree

use rstest::rstest;

use loctree::domain::{DomainError, LocationIndex, LocationRecord, TreeBuilder};

fn records() -> Vec<LocationRecord> {
    vec![
        LocationRecord::new("country").with_name("Farajaland"),
        LocationRecord::new("central").with_parent("country"),
        LocationRecord::new("sulaka").with_parent("country"),
        LocationRecord::new("ibombo").with_parent("central"),
        LocationRecord::new("isamba").with_parent("central"),
        LocationRecord::new("ilanga").with_parent("sulaka"),
        LocationRecord::new("standalone"),
        LocationRecord::new("orphan").with_parent("nowhere"),
    ]
}

#[test]
fn given_records_when_building_forest_then_one_tree_per_root() {
    // Arrange
    let records = records();
    let index = LocationIndex::new(&records);

    // Act
    let trees = TreeBuilder::new().build_forest(&index).unwrap();

    // Assert
    let roots: Vec<_> = trees
        .iter()
        .filter_map(|t| t.root_record())
        .map(|r| r.id.to_string())
        .collect();
    assert_eq!(roots, vec!["country", "standalone", "orphan"]);
    assert_eq!(trees[0].len(), 6);
    assert_eq!(trees[1].len(), 1);
    assert_eq!(trees[2].len(), 1);
}

#[test]
fn given_tree_when_iterating_then_preorder_matches_index_children() {
    // Arrange
    let records = records();
    let index = LocationIndex::new(&records);

    // Act
    let tree = TreeBuilder::new().build_tree(&index, "country").unwrap();

    // Assert
    let preorder: Vec<_> = tree.iter().map(|(_, n)| n.data.id.to_string()).collect();
    assert_eq!(
        preorder,
        vec!["country", "central", "ibombo", "isamba", "sulaka", "ilanga"]
    );
    for (_, node) in tree.iter() {
        let from_tree: Vec<_> = node
            .children
            .iter()
            .filter_map(|&idx| tree.get_node(idx))
            .map(|child| child.data.id.to_string())
            .collect();
        let from_index: Vec<_> = index
            .children_of(node.data.id.as_str())
            .map(|r| r.id.to_string())
            .collect();
        assert_eq!(from_tree, from_index);
    }
}

#[test]
fn given_tree_when_rendering_then_nested_labels() {
    // Arrange
    let records = records();
    let index = LocationIndex::new(&records);
    let tree = TreeBuilder::new().build_tree(&index, "country").unwrap();

    // Act
    let rendered = tree.to_tree_string().to_string();

    // Assert
    let lines: Vec<_> = rendered.lines().collect();
    assert_eq!(lines[0], "country (Farajaland)");
    assert_eq!(lines.len(), 6);
    assert!(lines[1].ends_with("central"));
    assert!(lines[2].ends_with("ibombo"));
}

#[rstest]
#[case::two_cycle(vec![
    LocationRecord::new("a").with_parent("b"),
    LocationRecord::new("b").with_parent("a"),
])]
#[case::cycle_beside_tree(vec![
    LocationRecord::new("root"),
    LocationRecord::new("x").with_parent("y"),
    LocationRecord::new("y").with_parent("x"),
    LocationRecord::new("hanger").with_parent("x"),
])]
#[case::self_reference(vec![LocationRecord::new("self").with_parent("self")])]
fn given_cycle_when_building_forest_then_errors(#[case] records: Vec<LocationRecord>) {
    // Arrange
    let index = LocationIndex::new(&records);

    // Act
    let result = TreeBuilder::new().build_forest(&index);

    // Assert
    assert!(matches!(result, Err(DomainError::CycleDetected(_))));
}

#[test]
fn given_empty_records_when_building_forest_then_no_trees() {
    let index = LocationIndex::new(&[]);

    let trees = TreeBuilder::new().build_forest(&index).unwrap();

    assert!(trees.is_empty());
}
