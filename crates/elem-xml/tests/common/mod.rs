//! Test support: structural XML comparison.
//!
//! Two documents compare equal when their parsed trees match element by
//! element on (namespace URI, local name), attribute sets and
//! whitespace-normalized text; prefix spellings and namespace
//! declarations are irrelevant.

use xot::Xot;

/// Canonical form of one element subtree
#[derive(Debug, PartialEq)]
pub struct CanonElem {
    pub name: (String, String),
    pub attrs: Vec<(String, String, String)>,
    pub text: String,
    pub children: Vec<CanonElem>,
}

/// Assert that two XML strings are structurally equivalent; panics with
/// an expected/got rendering on mismatch.
pub fn compare_xml(expected: &str, given: &str) {
    let mut xot = Xot::new();
    let expected_doc = xot.parse(expected.trim()).expect("expected XML parses");
    let given_doc = xot.parse(given.trim()).expect("given XML parses");

    let expected_canon = canon(&xot, document_element(&xot, expected_doc));
    let given_canon = canon(&xot, document_element(&xot, given_doc));

    if expected_canon != given_canon {
        panic!(
            "XML documents differ\nexpected: {}\n     got: {}\n\nexpected tree: {:#?}\n     got tree: {:#?}",
            expected.trim(),
            given.trim(),
            expected_canon,
            given_canon,
        );
    }
}

fn document_element(xot: &Xot, doc: xot::Node) -> xot::Node {
    xot.children(doc)
        .find(|&n| xot.element(n).is_some())
        .expect("document has an element")
}

fn canon(xot: &Xot, el: xot::Node) -> CanonElem {
    let name_id = xot.node_name(el).expect("element has a name");
    let (local, uri) = xot.name_ns_str(name_id);
    let name = (uri.to_string(), local.to_string());

    let mut attrs = Vec::new();
    for (attr_name, value) in xot.attributes(el).iter() {
        let (attr_local, attr_uri) = xot.name_ns_str(attr_name);
        attrs.push((attr_uri.to_string(), attr_local.to_string(), value.to_string()));
    }
    attrs.sort();

    let mut text = String::new();
    let mut children = Vec::new();
    for child in xot.children(el) {
        match xot.value(child) {
            xot::Value::Text(t) => text.push_str(t.get()),
            xot::Value::Element(_) => children.push(canon(xot, child)),
            _ => {}
        }
    }

    CanonElem {
        name,
        attrs,
        text: normalize_ws(&text),
        children,
    }
}

fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
