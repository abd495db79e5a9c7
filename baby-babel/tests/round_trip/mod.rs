//! Round trips: compile, decompile, compile again.
//!
//! Formatting is not preserved; element names, attribute values and comments are.

use crate::common::{fixture, fixture_tables};
use baby_babel::conversion::Conversion;
use baby_babel::tables::{AnonAttributeTable, NameShortcutTable, Tables};
use baby_babel::{Compile, Decompile};

/// Element and comment content of an XML document, in document order.
/// Attributes are sorted so that ordering differences do not count.
fn outline(xml: &str) -> Vec<String> {
    let doc = roxmltree::Document::parse(xml).expect("XML should be well-formed");
    doc.descendants()
        .filter_map(|node| {
            if node.is_element() {
                let mut attributes: Vec<String> = node
                    .attributes()
                    .map(|a| format!("{}={}", a.name(), a.value()))
                    .collect();
                attributes.sort();
                Some(format!("<{}> {}", node.tag_name().name(), attributes.join(" ")))
            } else if node.is_comment() {
                node.text().map(|text| format!("<!--{text}-->"))
            } else {
                None
            }
        })
        .collect()
}

fn compile(source: &str, tables: &Tables) -> String {
    let mut diagnostics = Vec::new();
    Compile::default()
        .convert("rt.baby", source, tables, &mut diagnostics)
        .unwrap_or_else(|e| panic!("compile failed: {e}; {diagnostics:?}"))
}

fn decompile(xml: &str, tables: &Tables) -> String {
    let mut diagnostics = Vec::new();
    Decompile::default()
        .convert("rt.xml", xml, tables, &mut diagnostics)
        .unwrap_or_else(|e| panic!("decompile failed: {e}"))
}

#[test]
fn test_point_round_trip() {
    let tables = Tables::new(
        NameShortcutTable::default(),
        AnonAttributeTable::from_rules([("point", ["x", "y"])]),
    );
    let xml = compile("point(1, 2);", &tables);
    let terse = decompile(&xml, &tables);
    assert_eq!(terse, "point(1, 2);\n");
    assert_eq!(outline(&compile(&terse, &tables)), outline(&xml));
}

#[test]
fn test_fixture_round_trip() {
    let tables = fixture_tables();
    let xml = compile(&fixture("intro.baby"), &tables);
    let terse = decompile(&xml, &tables);
    let again = compile(&terse, &tables);
    assert_eq!(outline(&again), outline(&xml));
}

#[test]
fn test_xml_fixture_survives_decompile_and_compile() {
    let tables = fixture_tables();
    let original = fixture("intro.xml");
    let again = compile(&decompile(&original, &tables), &tables);

    // The `comment` attribute becomes a comment node, and the quoted fallback
    // value is unquoted again, so compare everything else.
    let expected: Vec<String> = outline(&original)
        .into_iter()
        .map(|line| line.replace(" comment=first wave", ""))
        .collect();
    let actual: Vec<String> = outline(&again)
        .into_iter()
        .filter(|line| line != "<!-- first wave-->")
        .collect();
    assert_eq!(actual, expected);
}
