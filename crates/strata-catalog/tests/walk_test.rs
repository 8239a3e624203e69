//! Layout-aware visiting and walking over the fixture tree.

mod common;

use std::sync::Arc;

use common::{file_convention, layouts_v2, mixed_storage, record_008};
use strata_catalog::{
    walk, CatalogError, DirNode, FileNode, LayoutQuery, LayoutVisitor, Metadata, MismatchPolicy,
    MemoryStorage, NoLayoutVisitor, Node, Storage, VisitResult, Visitor,
};
use strata_core::{FieldRefs, Record, RecordFilter, Reference, Value};

fn refs(pairs: &[(&str, Reference)]) -> FieldRefs {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn queries(filters: &FieldRefs) -> Vec<Arc<LayoutQuery>> {
    layouts_v2()
        .iter()
        .map(|layout| Arc::new(layout.query(filters).unwrap()))
        .collect()
}

fn dir_node(path: &str, depth: usize) -> DirNode {
    DirNode::new(path, Metadata::default(), mixed_storage(), depth)
}

// ---- Directory visits ----

#[test]
fn test_layout_visit_dir_prunes_per_branch() {
    let all = queries(&FieldRefs::default());
    let visitor = LayoutVisitor::new(all.clone());

    // Root survives unconditionally with every layout.
    let result = visitor.visit_dir(&dir_node("root", 0)).unwrap();
    assert!(result.explore_next);
    assert!(result.payload.is_none());
    assert_eq!(result.surviving.len(), 2);
    assert!(Arc::ptr_eq(&result.surviving[0], &all[0]));
    assert!(Arc::ptr_eq(&result.surviving[1], &all[1]));

    // A color directory only fits the three-level shape.
    let result = visitor.visit_dir(&dir_node("root/RED", 1)).unwrap();
    assert!(result.explore_next);
    assert_eq!(result.surviving.len(), 1);
    assert!(Arc::ptr_eq(&result.surviving[0], &all[0]));

    // A flat resolution directory only fits the two-level shape.
    let result = visitor.visit_dir(&dir_node("root/HR_009", 1)).unwrap();
    assert!(result.explore_next);
    assert_eq!(result.surviving.len(), 1);
    assert!(Arc::ptr_eq(&result.surviving[0], &all[1]));
}

#[test]
fn test_layout_visit_dir_outlier_policies() {
    let node = || dir_node("root/outlier", 1);

    let visitor =
        LayoutVisitor::new(queries(&FieldRefs::default())).on_mismatch_dir(MismatchPolicy::Ignore);
    let result = visitor.visit_dir(&node()).unwrap();
    assert!(!result.explore_next);
    assert!(result.payload.is_none());
    assert!(result.surviving.is_empty());

    let visitor =
        LayoutVisitor::new(queries(&FieldRefs::default())).on_mismatch_dir(MismatchPolicy::Warn);
    let result = visitor.visit_dir(&node()).unwrap();
    assert!(!result.explore_next);
    assert!(result.payload.is_none());

    let visitor =
        LayoutVisitor::new(queries(&FieldRefs::default())).on_mismatch_dir(MismatchPolicy::Raise);
    assert!(matches!(
        visitor.visit_dir(&node()),
        Err(CatalogError::LayoutMismatch { .. })
    ));
}

#[test]
fn test_layout_visit_dir_filtered_out_stops_silently() {
    let visitor = LayoutVisitor::new(queries(&refs(&[(
        "field_enum",
        Reference::str("BLUE"),
    )])));
    let result = visitor.visit_dir(&dir_node("root/RED", 1)).unwrap();
    assert!(!result.explore_next);
    assert!(result.payload.is_none());
}

// ---- File visits ----

#[test]
fn test_layout_visit_file_first_match_wins() {
    let all = queries(&FieldRefs::default());
    let path = "root/GREEN/HR_008/file_008_7.4_baz_20230209_GREEN_20221101_20230705_19500101.txt";

    // Deep shape: the file sits at depth 3, interpreted by the first layout.
    let visitor = LayoutVisitor::new(vec![Arc::clone(&all[0])]);
    let node = FileNode::new(path, Metadata::default(), 3);
    let result = visitor.visit_file(&node).unwrap();
    assert!(!result.explore_next);
    assert!(result.surviving.is_empty());
    let mut expected = record_008();
    expected.push(Value::Str(path.to_string()));
    assert_eq!(result.payload.unwrap(), expected);

    // Flat shape: same leaf at depth 2, interpreted by the second layout.
    let path = "root/HR_009/file_008_7.4_baz_20230209_GREEN_20221101_20230705_19500101.txt";
    let visitor = LayoutVisitor::new(vec![Arc::clone(&all[1])]);
    let node = FileNode::new(path, Metadata::default(), 2);
    let result = visitor.visit_file(&node).unwrap();
    let mut expected = record_008();
    expected.push(Value::Str(path.to_string()));
    assert_eq!(result.payload.unwrap(), expected);
}

#[test]
fn test_layout_visit_file_outlier_policies() {
    let node = || FileNode::new("root/HR_011/file_KO.txt", Metadata::default(), 1);

    let visitor =
        LayoutVisitor::new(queries(&FieldRefs::default())).on_mismatch_file(MismatchPolicy::Ignore);
    let result = visitor.visit_file(&node()).unwrap();
    assert!(!result.explore_next);
    assert!(result.payload.is_none());
    assert!(result.surviving.is_empty());

    let visitor =
        LayoutVisitor::new(queries(&FieldRefs::default())).on_mismatch_file(MismatchPolicy::Warn);
    let result = visitor.visit_file(&node()).unwrap();
    assert!(!result.explore_next);
    assert!(result.payload.is_none());

    let visitor =
        LayoutVisitor::new(queries(&FieldRefs::default())).on_mismatch_file(MismatchPolicy::Raise);
    assert!(matches!(
        visitor.visit_file(&node()),
        Err(CatalogError::LayoutMismatch { .. })
    ));
}

#[test]
fn test_layout_visit_file_stat_fields() {
    let path = "root/GREEN/HR_008/file_008_7.4_baz_20230209_GREEN_20221101_20230705_19500101.txt";
    let mut meta = Metadata::default();
    meta.insert("size".to_string(), Value::Int(100));
    meta.insert("type".to_string(), Value::Str("file".to_string()));
    meta.insert("created".to_string(), Value::Int(250));

    let all = queries(&FieldRefs::default());
    let visitor =
        LayoutVisitor::new(vec![Arc::clone(&all[0])]).with_stat_fields(["size", "type"]);
    let node = FileNode::new(path, meta, 3);

    let result = visitor.visit_file(&node).unwrap();
    let mut expected = record_008();
    expected.push(Value::Str(path.to_string()));
    expected.push(Value::Int(100));
    expected.push(Value::Str("file".to_string()));
    assert_eq!(result.payload.unwrap(), expected);
}

#[test]
fn test_layout_visit_file_unknown_stat_field() {
    let path = "root/GREEN/HR_008/file_008_7.4_baz_20230209_GREEN_20221101_20230705_19500101.txt";
    let all = queries(&FieldRefs::default());
    let visitor = LayoutVisitor::new(vec![Arc::clone(&all[0])]).with_stat_fields(["foo"]);
    let node = FileNode::new(path, Metadata::default(), 3);
    assert!(matches!(
        visitor.visit_file(&node),
        Err(CatalogError::MissingMetadata { .. })
    ));
}

// ---- Advancement ----

#[test]
fn test_layout_advance_captures_surviving_queries() {
    let all = queries(&FieldRefs::default());
    let visitor = LayoutVisitor::new(all.clone());

    let result: VisitResult<Record> = VisitResult::explore(vec![Arc::clone(&all[0])]);
    let advanced = visitor.advance(&result);
    assert_eq!(advanced.queries().len(), 1);
    assert!(Arc::ptr_eq(&advanced.queries()[0], &all[0]));
    // The parent visitor keeps its own view.
    assert_eq!(visitor.queries().len(), 2);
}

// ---- Whole-tree walks ----

fn walk_rows(filters: FieldRefs) -> Vec<Record> {
    let visitor =
        LayoutVisitor::new(queries(&filters)).on_mismatch_dir(MismatchPolicy::Ignore);
    let root = Arc::new(Node::Dir(DirNode::root("root", mixed_storage())));
    walk(root, visitor).collect::<Result<Vec<_>, _>>().unwrap()
}

#[test]
fn test_walk_layout_filter_by_color() {
    let rows = walk_rows(refs(&[("field_enum", Reference::str("BLUE"))]));
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|row| row[4] == Value::Label("BLUE".into())));
}

#[test]
fn test_walk_layout_filter_by_float() {
    let rows = walk_rows(refs(&[("field_f", Reference::Float(5.6))]));
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row[1] == Value::Float(5.6)));
}

#[test]
fn test_walk_layout_unfiltered_yields_all_well_formed_leaves() {
    let rows = walk_rows(FieldRefs::default());
    // Nine deep-shape leaves plus three flat-shape ones; outliers skipped.
    assert_eq!(rows.len(), 12);
}

#[test]
fn test_walk_raises_on_outlier_directory() {
    let storage: Arc<dyn Storage> =
        Arc::new(MemoryStorage::with_files(["root/weird-dir/x.txt"]));
    let visitor = LayoutVisitor::new(queries(&FieldRefs::default()));
    let root = Arc::new(Node::Dir(DirNode::root("root", storage)));

    let outcome: Result<Vec<_>, _> = walk(root, visitor).collect();
    assert!(matches!(outcome, Err(CatalogError::LayoutMismatch { .. })));
}

// ---- Storage backends ----

#[test]
fn test_local_and_memory_storage_agree() {
    use strata_catalog::{LocalStorage, StandardVisitor};

    let dir = tempfile::tempdir().unwrap();
    for path in common::nine_files() {
        let relative = path.strip_prefix("root/").unwrap();
        let full = dir.path().join(relative);
        std::fs::create_dir_all(full.parent().unwrap()).unwrap();
        std::fs::write(full, b"").unwrap();
    }

    let local_root = Arc::new(Node::Dir(DirNode::root(
        dir.path().to_str().unwrap(),
        Arc::new(LocalStorage::new()),
    )));
    let memory_root = Arc::new(Node::Dir(DirNode::root(
        "root",
        Arc::new(MemoryStorage::with_files(common::nine_files())),
    )));

    let shape = |root| {
        walk(root, StandardVisitor)
            .map(|listing| {
                let listing = listing.unwrap();
                (listing.dirs, listing.files)
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(shape(local_root), shape(memory_root));
}

// ---- No-layout visiting ----

#[test]
fn test_no_layout_visit_dir_always_explores() {
    let visitor = NoLayoutVisitor::new(file_convention(), RecordFilter::default());
    for (path, depth) in [("root", 0), ("root/RED", 1), ("root/outlier", 1)] {
        let result = visitor.visit_dir(&dir_node(path, depth)).unwrap();
        assert!(result.explore_next);
        assert!(result.payload.is_none());
    }
}

#[test]
fn test_no_layout_visit_file() {
    let visitor = NoLayoutVisitor::new(file_convention(), RecordFilter::default());
    // Depth does not matter without a layout.
    let path = "root/HR_009/file_008_7.4_baz_20230209_GREEN_20221101_20230705_19500101.txt";
    let node = FileNode::new(path, Metadata::default(), 10);

    let result = visitor.visit_file(&node).unwrap();
    assert!(!result.explore_next);
    let mut expected = record_008();
    expected.push(Value::Str(path.to_string()));
    assert_eq!(result.payload.unwrap(), expected);

    // A name the convention does not recognize is expected and skipped.
    let node = FileNode::new("root/HR_011/KO.txt", Metadata::default(), 10);
    let result = visitor.visit_file(&node).unwrap();
    assert!(!result.explore_next);
    assert!(result.payload.is_none());
}

fn no_layout_walk_rows(filters: FieldRefs) -> Vec<Record> {
    let convention = file_convention();
    let filter = RecordFilter::new(convention.fields(), &filters).unwrap();
    let visitor = NoLayoutVisitor::new(convention, filter);
    let root = Arc::new(Node::Dir(DirNode::root("root", mixed_storage())));
    walk(root, visitor).collect::<Result<Vec<_>, _>>().unwrap()
}

#[test]
fn test_walk_no_layout_matches_layout_walk() {
    let rows = no_layout_walk_rows(refs(&[("field_enum", Reference::str("BLUE"))]));
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|row| row[4] == Value::Label("BLUE".into())));

    let rows = no_layout_walk_rows(refs(&[("field_f", Reference::Float(5.6))]));
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row[1] == Value::Float(5.6)));
}
