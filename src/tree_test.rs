use serde_json::json;

use super::*;

fn sample() -> DocTree {
    DocTree::from_json(
        r#"{
            "tag": "BODY",
            "id": "body",
            "children": [
                { "tag": "div", "id": "a", "class": "x y", "text": "Hello" },
                { "tag": "div", "id": "b" },
                { "tag": "div", "id": "c", "children": [ { "tag": "span", "id": "d" } ] }
            ]
        }"#,
    )
    .unwrap()
}

fn id(tree: &DocTree, value: &str) -> NodeId {
    tree.element_by_id(value).unwrap()
}

fn ids<'a>(tree: &'a DocTree, parent: &str) -> Vec<&'a str> {
    tree.child_ids(id(tree, parent))
        .iter()
        .map(|&child| tree.get_attribute(child, "id").unwrap_or_default())
        .collect()
}

// =============================================================
// Construction
// =============================================================

#[test]
fn from_json_builds_tree() {
    let tree = sample();
    assert_eq!(tree.tag(id(&tree, "body")), "body");
    assert_eq!(ids(&tree, "body"), ["a", "b", "c"]);
    assert_eq!(ids(&tree, "c"), ["d"]);
    assert_eq!(tree.classes(id(&tree, "a")), ["x", "y"]);
    assert_eq!(tree.text(id(&tree, "a")), Some("Hello"));
}

#[test]
fn from_json_rejects_malformed() {
    assert!(DocTree::from_json("{ \"children\": [] }").is_err());
}

#[test]
fn node_spec_roundtrip_omits_empty_fields() {
    let spec = NodeSpec { tag: "p".into(), ..NodeSpec::default() };
    assert_eq!(serde_json::to_value(&spec).unwrap(), json!({ "tag": "p" }));
}

#[test]
fn top_level_element_has_no_parent() {
    let tree = sample();
    assert_eq!(tree.parent(id(&tree, "body")), None);
    assert_eq!(tree.parent(id(&tree, "d")), Some(id(&tree, "c")));
}

#[test]
fn descendants_preorder() {
    let tree = sample();
    let order: Vec<&str> = tree
        .descendants(tree.root())
        .into_iter()
        .map(|node| tree.get_attribute(node, "id").unwrap_or_default())
        .collect();
    assert_eq!(order, ["body", "a", "b", "c", "d"]);
}

#[test]
fn set_attribute_replaces() {
    let mut tree = sample();
    let b = id(&tree, "b");
    tree.set_attribute(b, "Title", "one");
    tree.set_attribute(b, "title", "two");
    assert_eq!(tree.get_attribute(b, "title"), Some("two"));
}

// =============================================================
// Dom mutations
// =============================================================

#[test]
fn append_moves_between_parents() {
    let mut tree = sample();
    let (a, c) = (id(&tree, "a"), id(&tree, "c"));
    tree.append(&c, &a).unwrap();
    assert_eq!(ids(&tree, "body"), ["b", "c"]);
    assert_eq!(ids(&tree, "c"), ["d", "a"]);
    assert_eq!(tree.parent(a), Some(c));
}

#[test]
fn prepend_moves_to_front() {
    let mut tree = sample();
    let (body, c) = (id(&tree, "body"), id(&tree, "c"));
    tree.prepend(&body, &c).unwrap();
    assert_eq!(ids(&tree, "body"), ["c", "a", "b"]);
}

#[test]
fn insert_before_within_same_parent() {
    let mut tree = sample();
    let (a, c) = (id(&tree, "a"), id(&tree, "c"));
    tree.insert_before(&a, &c).unwrap();
    assert_eq!(ids(&tree, "body"), ["c", "a", "b"]);

    tree.insert_before(&c, &a).unwrap();
    assert_eq!(ids(&tree, "body"), ["a", "c", "b"]);
}

#[test]
fn insert_before_self_is_noop() {
    let mut tree = sample();
    let b = id(&tree, "b");
    tree.insert_before(&b, &b).unwrap();
    assert_eq!(ids(&tree, "body"), ["a", "b", "c"]);
}

#[test]
fn insert_before_detached_reference_fails() {
    let mut tree = sample();
    let loose = tree.create_element("div");
    let a = id(&tree, "a");
    assert_eq!(tree.insert_before(&loose, &a), Err(DomError::Detached));
}

#[test]
fn insert_into_own_subtree_fails() {
    let mut tree = sample();
    let (c, d) = (id(&tree, "c"), id(&tree, "d"));
    assert_eq!(tree.append(&d, &c), Err(DomError::Cycle));
    assert_eq!(tree.insert_before(&d, &c), Err(DomError::Cycle));
    assert_eq!(ids(&tree, "c"), ["d"]);
}

#[test]
fn unknown_node_fails() {
    let mut tree = sample();
    let a = id(&tree, "a");
    let other = DocTree::from_json(r#"{ "tag": "div", "children": [ {"tag": "p"}, {"tag": "p"}, {"tag": "p"}, {"tag": "p"}, {"tag": "p"}, {"tag": "p"} ] }"#)
        .unwrap();
    let far = *other.descendants(other.root()).last().unwrap();
    assert!(matches!(tree.append(&far, &a), Err(DomError::UnknownNode(_))));
}

#[test]
fn index_in_parent_counts_elements() {
    let tree = sample();
    assert_eq!(tree.index_in_parent(&id(&tree, "c")), Some(2));
    assert_eq!(tree.index_in_parent(&id(&tree, "body")), None);
}

#[test]
fn class_list_edits() {
    let mut tree = sample();
    let a = id(&tree, "a");
    tree.add_class(&a, "z").unwrap();
    tree.add_class(&a, "x").unwrap();
    assert_eq!(tree.classes(a), ["x", "y", "z"]);

    tree.remove_class(&a, "y").unwrap();
    assert_eq!(tree.classes(a), ["x", "z"]);
    assert!(tree.has_class(a, "z"));
    assert!(!tree.has_class(a, "y"));

    let b = id(&tree, "b");
    tree.remove_class(&b, "x").unwrap();
    assert_eq!(tree.get_attribute(b, "class"), None);
}

#[test]
fn elements_with_attribute_in_document_order() {
    let mut tree = sample();
    let (a, d) = (id(&tree, "a"), id(&tree, "d"));
    tree.set_attribute(d, "data-da", ".x");
    tree.set_attribute(a, "data-da", ".y");
    assert_eq!(tree.elements_with_attribute("data-da"), [a, d]);
}

// =============================================================
// Outline
// =============================================================

#[test]
fn outline_indents_children() {
    let tree = sample();
    assert_eq!(
        tree.outline(),
        "body#body\n  div#a.x.y \"Hello\"\n  div#b\n  div#c\n    span#d\n"
    );
}

#[test]
fn label_joins_tag_id_and_classes() {
    let tree = sample();
    let a = tree.element_by_id("a").unwrap();
    let d = tree.element_by_id("d").unwrap();
    assert_eq!(tree.label(a), "div#a.x.y");
    assert_eq!(tree.label(d), "span#d");
}
