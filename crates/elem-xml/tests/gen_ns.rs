//! Namespace-aware markup generation, checked against hand-written
//! documents from the XML namespaces recommendation.

mod common;

use common::compare_xml;
use elem_tree::{well_known, Document};
use elem_xml::MarkupSerializer;

fn to_xml(doc: &Document) -> String {
    MarkupSerializer::new(doc).to_string(doc.root_id()).unwrap()
}

#[test]
fn test_gen_unused_prefix_is_cleaned_up() {
    let mut doc = Document::xml();
    doc.root()
        .merge_ns([("edi", "http://ecommerce.example.org/schema")]);
    doc.root().set("x", "");

    let out = to_xml(&doc);
    compare_xml(
        r#"
        <x xmlns:edi='http://ecommerce.example.org/schema'>
        </x>
        "#,
        &out,
    );
    assert!(!out.contains("ecommerce.example.org"));
}

#[test]
fn test_gen_prefixed_root_with_attr() {
    let mut doc = Document::xml();
    doc.root()
        .merge_ns([("edi", "http://ecommerce.example.org/schema")]);
    doc.root().set("edi_price", "32.18").attr("units", "Euro");

    compare_xml(
        r#"
        <edi:price xmlns:edi='http://ecommerce.example.org/schema' units='Euro'>32.18</edi:price>
        "#,
        &to_xml(&doc),
    );
}

#[test]
fn test_gen_default_ns_document() {
    let mut doc = Document::xml();
    doc.root().ns(well_known::HTML.1);

    doc.root().child("html").child("head").set("title", "Frobnostication");
    doc.root().child("html").child("body").set("p", "Moved to");
    doc.root()
        .child("html")
        .child("body")
        .child("p")
        .set("a", "here.")
        .attr("href", "http://frob.example.com");

    compare_xml(
        r#"
        <html:html xmlns:html="http://www.w3.org/1999/xhtml">
           <html:head>
              <html:title>Frobnostication</html:title>
           </html:head>
           <html:body>
              <html:p>
                 Moved to
                 <html:a href="http://frob.example.com">here.</html:a>
              </html:p>
           </html:body>
        </html:html>
        "#,
        &to_xml(&doc),
    );
}

#[test]
fn test_gen_two_prefixes() {
    let mut doc = Document::xml();
    doc.root().merge_ns([
        ("bk", "urn:loc.gov:books"),
        ("isbn", "urn:ISBN:0-395-36341-6"),
    ]);

    doc.root()
        .child("root")
        .child("bk_book")
        .set("bk_title", "Cheaper by the Dozen");
    doc.root()
        .child("root")
        .child("bk_book")
        .set("isbn_number", "1568491379");

    let out = to_xml(&doc);
    compare_xml(
        r#"
        <root>
          <bk:book xmlns:bk='urn:loc.gov:books' xmlns:isbn='urn:ISBN:0-395-36341-6'>
            <bk:title>Cheaper by the Dozen</bk:title>
            <isbn:number>1568491379</isbn:number>
          </bk:book>
        </root>
        "#,
        &out,
    );
    // Each namespace is declared exactly once.
    assert_eq!(out.matches("urn:loc.gov:books").count(), 1);
    assert_eq!(out.matches("urn:ISBN:0-395-36341-6").count(), 1);
}

#[test]
fn test_gen_default_plus_prefixed() {
    let mut doc = Document::xml();
    doc.root().ns("urn:loc.gov:books");
    doc.root()
        .merge_ns([("isbn", "urn:ISBN:0-395-36341-6"), well_known::HTML]);

    doc.root().child("book").set("title", "Cheaper by the Dozen");
    doc.root().child("book").set("isbn_number", "1568491379");
    doc.root().child("book").child("notes").set("html_p", "");

    let out = to_xml(&doc);
    compare_xml(
        r#"
        <book xmlns='urn:loc.gov:books' xmlns:isbn='urn:ISBN:0-395-36341-6'>
            <title>Cheaper by the Dozen</title>
            <isbn:number>1568491379</isbn:number>
            <notes>
              <p xmlns='http://www.w3.org/1999/xhtml'>
              </p>
            </notes>
        </book>
        "#,
        &out,
    );
    assert_eq!(out.matches("\"urn:loc.gov:books\"").count(), 1);
    assert_eq!(out.matches("urn:ISBN:0-395-36341-6").count(), 1);
    assert_eq!(out.matches("http://www.w3.org/1999/xhtml").count(), 1);
}

#[test]
fn test_gen_same_uri_default_and_prefixed() {
    let mut doc = Document::xml();
    doc.root().ns("example.com");
    doc.root().merge_ns([("n1", "example.com")]);

    doc.root()
        .child("x")
        .child("good")
        .at(0)
        .unwrap()
        .attr("a", "1")
        .attr("b", "2");
    doc.root()
        .child("x")
        .child("good")
        .at(1)
        .unwrap()
        .attr("a", "1")
        .attr("n1_a", "2");

    compare_xml(
        r#"
        <x xmlns:n1="example.com" xmlns="example.com">
          <good a="1" b="2" />
          <good a="1" n1:a="2" />
        </x>
        "#,
        &to_xml(&doc),
    );
}

#[test]
fn test_gen_default_ns_elem() {
    let mut doc = Document::xml();
    doc.root().child("root").ns("example.com");
    doc.root().child("root").merge_ns([("x", "example.com/x")]);
    doc.root().child("root").child("x_a").set("b", "123");

    let out = to_xml(&doc);
    compare_xml(
        r#"
        <root xmlns="example.com">
          <x:a xmlns:x="example.com/x">
            <b>123</b>
          </x:a>
        </root>
        "#,
        &out,
    );
    assert_eq!(out.matches("\"example.com\"").count(), 1);
    assert_eq!(out.matches("example.com/x").count(), 1);
}

#[test]
fn test_gen_default_ns_attr() {
    let mut doc = Document::xml();
    doc.root().child("root").ns("example.com");
    doc.root().child("root").merge_ns([("x", "example.com/x")]);
    doc.root()
        .child("root")
        .child("x_a")
        .set("b", "123")
        .attr("foo", "bar");

    compare_xml(
        r#"
        <root xmlns="example.com">
          <x:a xmlns:x="example.com/x">
            <b foo="bar">123</b>
          </x:a>
        </root>
        "#,
        &to_xml(&doc),
    );
}

#[test]
fn test_gen_set_already_existing_ns() {
    let mut doc = Document::xml();
    doc.root().child("root").ns("example.com");
    doc.root().child("root").merge_ns([("x", "example.com/x")]);
    doc.root().child("root").child("x_a").set("b", "123");
    // Set explicitly; expected to reuse the prefix declared in the map.
    doc.root().child("root").child("x_a").ns("example.com/x");

    let x_a = doc.root().child("root").child("x_a").id();
    assert_eq!(doc.ns_of(x_a).prefix.as_deref(), Some("x"));

    compare_xml(
        r#"
        <root xmlns="example.com">
          <x:a xmlns:x="example.com/x">
            <b>123</b>
          </x:a>
        </root>
        "#,
        &to_xml(&doc),
    );
}

#[test]
fn test_gen_ns_reset_to_empty() {
    let mut doc = Document::xml();

    doc.root().child("Beers").child("table").ns(well_known::HTML.1);

    doc.root()
        .child("Beers")
        .child("table")
        .child("th")
        .child("td")
        .at(0)
        .unwrap()
        .value("Name");
    doc.root()
        .child("Beers")
        .child("table")
        .child("th")
        .child("td")
        .at(1)
        .unwrap()
        .value("Origin");

    doc.root()
        .child("Beers")
        .child("table")
        .child("tr")
        .child("td")
        .at(0)
        .unwrap()
        .child("brandName")
        .ns("")
        .value("Huntsman");
    doc.root()
        .child("Beers")
        .child("table")
        .child("tr")
        .child("td")
        .at(1)
        .unwrap()
        .child("origin")
        .ns("")
        .value("Bath, UK");

    compare_xml(
        r#"
        <Beers>
          <table xmlns='http://www.w3.org/1999/xhtml'>
           <th><td>Name</td><td>Origin</td></th>
           <tr>
             <td><brandName xmlns="">Huntsman</brandName></td>
             <td><origin xmlns="">Bath, UK</origin></td>
           </tr>
          </table>
        </Beers>
        "#,
        &to_xml(&doc),
    );
}
