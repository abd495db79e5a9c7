//! Compile tests (BabyScript → XML)
//!
//! Structure is checked by parsing the output with roxmltree; whole documents
//! are pinned with inline snapshots.

use crate::common::{fixture, fixture_tables};
use baby_babel::conversion::Conversion;
use baby_babel::diagnostics::Diagnostic;
use baby_babel::error::ConvertError;
use baby_babel::tables::{AnonAttributeTable, NameShortcutTable, Tables};
use baby_babel::{Compile, CompileRules};
use insta::assert_snapshot;

fn compile_with(source: &str, tables: &Tables) -> (Result<String, ConvertError>, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let result = Compile::default().convert("test.baby", source, tables, &mut diagnostics);
    (result, diagnostics)
}

fn point_tables(rule: &[&str]) -> Tables {
    Tables::new(
        NameShortcutTable::default(),
        AnonAttributeTable::from_rules([("point", rule.iter().copied())]),
    )
}

/// `(name, value)` pairs of the first element called `tag`.
fn attributes_of(xml: &str, tag: &str) -> Vec<(String, String)> {
    let doc = roxmltree::Document::parse(xml).expect("compiled output should be well-formed");
    let node = doc
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == tag)
        .unwrap_or_else(|| panic!("no <{tag}> in output"));
    node.attributes()
        .map(|a| (a.name().to_string(), a.value().to_string()))
        .collect()
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_anonymous_values_follow_rule_order() {
    let (result, diagnostics) = compile_with("point(1, 2, 3);", &point_tables(&["a", "b", "c"]));
    let xml = result.unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(
        attributes_of(&xml, "point"),
        pairs(&[("a", "1"), ("b", "2"), ("c", "3")])
    );
}

#[test]
fn test_fourth_anonymous_value_overflows() {
    let (result, diagnostics) =
        compile_with("point(1, 2, 3, 4);", &point_tables(&["a", "b", "c"]));
    let err = result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "test.baby: Aborting write due to semantic error(s)"
    );
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].message,
        "point has more anonymous attributes than the config specifies for it"
    );
}

#[test]
fn test_anonymous_value_without_rule_fails() {
    let (result, diagnostics) = compile_with("door(\"red\");", &point_tables(&["x"]));
    assert!(matches!(result, Err(ConvertError::SemanticErrors { .. })));
    assert_eq!(
        diagnostics[0].to_string(),
        "test.baby:1:1: door has an anonymous attribute but the config has no rule for it"
    );
}

#[test]
fn test_anonymous_value_cannot_repeat_an_explicit_name() {
    let (result, diagnostics) = compile_with("point(x: 5, 1);", &point_tables(&["x", "y"]));
    assert!(matches!(result, Err(ConvertError::SemanticErrors { .. })));
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].to_string(),
        "test.baby:1:1: point has duplicate attribute x"
    );
}

#[test]
fn test_deep_nesting_is_a_syntax_error() {
    let depth = 20_000;
    let source = format!("point({}1{});", "(".repeat(depth), ")".repeat(depth));
    let (result, diagnostics) = compile_with(&source, &point_tables(&["x"]));
    assert!(matches!(result, Err(ConvertError::SyntaxErrors { .. })));
    assert!(diagnostics
        .iter()
        .any(|d| d.message.starts_with("nesting deeper than")));

    let blocks = format!("{}{}", "room {".repeat(depth), "}".repeat(depth));
    let (result, _) = compile_with(&blocks, &Tables::default());
    assert!(matches!(result, Err(ConvertError::SyntaxErrors { .. })));
}

#[test]
fn test_named_values_need_no_rule() {
    let (result, _) = compile_with("door(color: \"red\", locked: true);", &Tables::default());
    assert_eq!(
        attributes_of(&result.unwrap(), "door"),
        pairs(&[("color", "red"), ("locked", "true")])
    );
}

#[test]
fn test_short_names_expand_before_rule_lookup() {
    let tables = Tables::new(
        NameShortcutTable::from_pairs([("spawn_point", "sp")]),
        AnonAttributeTable::from_rules([("spawn_point", ["type"])]),
    );
    let (result, _) = compile_with("sp(\"orc\");", &tables);
    assert_eq!(
        attributes_of(&result.unwrap(), "spawn_point"),
        pairs(&[("type", "orc")])
    );
}

#[test]
fn test_unknown_short_name_is_kept() {
    let (result, _) = compile_with("mystery;", &Tables::default());
    assert!(result.unwrap().contains("<mystery/>"));
}

#[test]
fn test_only_one_quote_layer_is_removed() {
    let (result, _) = compile_with(
        r#"say(text: "plain", empty: "", expr: a + 1);"#,
        &Tables::default(),
    );
    assert_eq!(
        attributes_of(&result.unwrap(), "say"),
        pairs(&[("text", "plain"), ("empty", ""), ("expr", "a + 1")])
    );
}

#[test]
fn test_assignment_keeps_value_verbatim() {
    let (result, _) = compile_with("motto = \"go\";", &Tables::default());
    assert_eq!(
        attributes_of(&result.unwrap(), "set_value"),
        pairs(&[("name", "motto"), ("exact", "\"go\"")])
    );
}

#[test]
fn test_syntax_errors_abort_before_output() {
    let (result, diagnostics) = compile_with("a(1,;\nb(;\n", &Tables::default());
    match result {
        Err(ConvertError::SyntaxErrors { file, count }) => {
            assert_eq!(file, "test.baby");
            assert_eq!(count, 2);
        }
        other => panic!("expected syntax errors, got {other:?}"),
    }
    let lines: Vec<Option<usize>> = diagnostics.iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![Some(1), Some(2)]);
}

#[test]
fn test_compact_output_without_declaration() {
    let compile = Compile::new(CompileRules {
        indent_size: 0,
        xml_declaration: false,
    });
    let mut diagnostics = Vec::new();
    let xml = compile
        .convert("t.baby", "a { b; c; }", &Tables::default(), &mut diagnostics)
        .unwrap();
    assert_eq!(xml, "<a><b/><c/></a>\n");
}

#[test]
fn test_comment_cannot_close_early() {
    let (result, _) = compile_with("// a -- b -\nx;", &Tables::default());
    let xml = result.unwrap();
    assert!(xml.contains("<!-- a - - b - -->"));
    roxmltree::Document::parse(&xml).expect("sanitized comment should stay well-formed");
}

#[test]
fn test_intro_fixture() {
    let (result, diagnostics) = compile_with(&fixture("intro.baby"), &fixture_tables());
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    let xml = result.unwrap();
    assert_snapshot!(xml.trim_end(), @r#"
<?xml version="1.0" encoding="utf-8"?>
<!-- Intro level-->
<level name="intro">
  <spawn_point type="orc" count="3" delay="1.5"/>
  <set_value name="health" exact="100"/>
  <trigger_zone radius="4.5">
    <play_sound file="alarm.wav" volume="0.8"/>
    <!-- boss wave-->
    <spawn_point type="boss" count="1"/>
  </trigger_zone>
  <point x="1" y="2" z="3"/>
</level>
"#);
}
