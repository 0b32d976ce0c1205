use serde_json::json;

use super::*;
use crate::dom::Dom;
use crate::tree::{DocTree, NodeSpec};

fn page() -> DocTree {
    let spec: NodeSpec = serde_json::from_value(json!({
        "tag": "body",
        "id": "body",
        "children": [
            { "tag": "header", "id": "header", "class": "header lock-padding", "children": [
                { "tag": "nav", "id": "nav", "class": "menu", "children": [
                    { "tag": "a", "id": "link", "class": "menu__link", "attrs": { "href": "#about" } },
                ]},
            ]},
            { "tag": "main", "id": "main", "children": [
                { "tag": "section", "id": "s1", "class": "block" },
                { "tag": "section", "id": "s2", "class": "block block--wide", "attrs": { "data-kind": "hero" } },
                { "tag": "div", "id": "s3", "class": "menu" },
            ]},
        ]
    }))
    .unwrap();
    DocTree::from_spec(&spec)
}

fn select(dom: &DocTree, selector: &str) -> Option<String> {
    dom.query_selector(selector)
        .and_then(|node| dom.get_attribute(node, "id").map(str::to_owned))
}

// =============================================================
// Parsing
// =============================================================

#[test]
fn parse_compound() {
    let list = SelectorList::parse("div.a.b#c").unwrap();
    assert_eq!(list.selectors.len(), 1);
    assert_eq!(
        list.selectors[0].head.simples,
        [
            Simple::Type("div".into()),
            Simple::Class("a".into()),
            Simple::Class("b".into()),
            Simple::Id("c".into()),
        ]
    );
}

#[test]
fn parse_type_is_lowercased() {
    let list = SelectorList::parse("SECTION").unwrap();
    assert_eq!(list.selectors[0].head.simples, [Simple::Type("section".into())]);
}

#[test]
fn parse_combinators() {
    let list = SelectorList::parse("main > .block + div ~ p a").unwrap();
    let combinators: Vec<Combinator> = list.selectors[0].tail.iter().map(|(c, _)| *c).collect();
    assert_eq!(
        combinators,
        [Combinator::Child, Combinator::Adjacent, Combinator::Sibling, Combinator::Descendant]
    );
}

#[test]
fn parse_attribute_forms() {
    let list = SelectorList::parse(r#"[data-da] [data-kind="hero"] [lang=en]"#).unwrap();
    let complex = &list.selectors[0];
    assert_eq!(complex.head.simples, [Simple::Attr { name: "data-da".into(), value: None }]);
    assert_eq!(
        complex.tail[0].1.simples,
        [Simple::Attr { name: "data-kind".into(), value: Some("hero".into()) }]
    );
    assert_eq!(
        complex.tail[1].1.simples,
        [Simple::Attr { name: "lang".into(), value: Some("en".into()) }]
    );
}

#[test]
fn parse_list() {
    let list = SelectorList::parse(".a, #b").unwrap();
    assert_eq!(list.selectors.len(), 2);
}

#[test]
fn parse_errors() {
    assert_eq!(SelectorList::parse(""), Err(SelectorError::Empty));
    assert_eq!(SelectorList::parse("   "), Err(SelectorError::Empty));
    assert_eq!(SelectorList::parse("div >"), Err(SelectorError::DanglingCombinator));
    assert_eq!(SelectorList::parse("[href"), Err(SelectorError::UnclosedAttribute));
    assert_eq!(SelectorList::parse("[a='x"), Err(SelectorError::UnclosedAttribute));
    assert_eq!(SelectorList::parse("a, "), Err(SelectorError::Empty));
    assert!(matches!(
        SelectorList::parse(".a:hover"),
        Err(SelectorError::Unexpected { found: ':', at: 2 })
    ));
    assert!(matches!(SelectorList::parse("."), Err(SelectorError::Empty)));
}

// =============================================================
// Matching via DocTree
// =============================================================

#[test]
fn select_by_id_class_type() {
    let dom = page();
    assert_eq!(select(&dom, "#main").as_deref(), Some("main"));
    assert_eq!(select(&dom, ".block").as_deref(), Some("s1"));
    assert_eq!(select(&dom, "section.block--wide").as_deref(), Some("s2"));
    assert_eq!(select(&dom, "nav").as_deref(), Some("nav"));
    assert_eq!(select(&dom, "*").as_deref(), Some("body"));
}

#[test]
fn select_first_in_document_order() {
    let dom = page();
    assert_eq!(select(&dom, ".menu").as_deref(), Some("nav"));
}

#[test]
fn select_attribute() {
    let dom = page();
    assert_eq!(select(&dom, "[data-kind]").as_deref(), Some("s2"));
    assert_eq!(select(&dom, "[data-kind=hero]").as_deref(), Some("s2"));
    assert_eq!(select(&dom, "[data-kind=footer]"), None);
    assert_eq!(select(&dom, r##"a[href="#about"]"##).as_deref(), Some("link"));
}

#[test]
fn select_descendant_and_child() {
    let dom = page();
    assert_eq!(select(&dom, "header .menu__link").as_deref(), Some("link"));
    assert_eq!(select(&dom, "header > .menu__link"), None);
    assert_eq!(select(&dom, "header > nav > a").as_deref(), Some("link"));
    assert_eq!(select(&dom, "main .menu").as_deref(), Some("s3"));
}

#[test]
fn select_descendant_backtracks() {
    let dom = page();
    // `.menu` ancestor exists but not under `main`.
    assert_eq!(select(&dom, "body .menu a").as_deref(), Some("link"));
    assert_eq!(select(&dom, "main .menu a"), None);
    // `nav` is the nearest `*` ancestor but only `header` is a child of `body`.
    assert_eq!(select(&dom, "body > * .menu__link").as_deref(), Some("link"));
}

#[test]
fn select_siblings() {
    let dom = page();
    assert_eq!(select(&dom, ".block + .block").as_deref(), Some("s2"));
    assert_eq!(select(&dom, "#s1 ~ div").as_deref(), Some("s3"));
    assert_eq!(select(&dom, "#s1 + div"), None);
}

#[test]
fn select_list_takes_first_in_document() {
    let dom = page();
    assert_eq!(select(&dom, "#s3, #nav").as_deref(), Some("nav"));
}

#[test]
fn select_document_is_not_an_element() {
    let dom = page();
    assert_eq!(select(&dom, "* > body"), None);
}

#[test]
fn select_invalid_returns_none() {
    let dom = page();
    assert_eq!(select(&dom, "main >"), None);
}
