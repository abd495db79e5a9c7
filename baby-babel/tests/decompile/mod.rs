//! Decompile tests (XML → BabyScript)

use crate::common::{fixture, fixture_tables};
use baby_babel::conversion::Conversion;
use baby_babel::decompile::{decompile_source, XmlNode, XmlSource};
use baby_babel::diagnostics::{Diagnostic, Severity};
use baby_babel::error::ConvertError;
use baby_babel::tables::{AnonAttributeTable, NameShortcutTable, Tables};
use baby_babel::{Decompile, DecompileRules};
use insta::assert_snapshot;

fn decompile_with(xml: &str, tables: &Tables) -> (String, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let text = Decompile::default()
        .convert("test.xml", xml, tables, &mut diagnostics)
        .expect("decompile should not fail on well-formed XML");
    (text, diagnostics)
}

fn point_tables(rule: &[&str]) -> Tables {
    Tables::new(
        NameShortcutTable::default(),
        AnonAttributeTable::from_rules([("point", rule.iter().copied())]),
    )
}

#[test]
fn test_point_with_full_rule() {
    let (text, diagnostics) = decompile_with(r#"<point x="1" y="2"/>"#, &point_tables(&["x", "y"]));
    assert_eq!(text, "point(1, 2);\n");
    assert!(diagnostics.is_empty());
}

#[test]
fn test_point_with_gap_in_rule() {
    let (text, _) = decompile_with(
        r#"<point x="1" z="3"/>"#,
        &point_tables(&["x", "y", "z"]),
    );
    assert_eq!(text, "point(1, z:3);\n");
}

#[test]
fn test_no_rule_means_all_named() {
    let (text, _) = decompile_with(r#"<door color="red" locked="true"/>"#, &Tables::default());
    assert_eq!(text, "door(color:red, locked:true);\n");
}

#[test]
fn test_invalid_value_is_wrapped() {
    let (text, diagnostics) =
        decompile_with(r#"<sign text="no$entry"/>"#, &Tables::default());
    assert_eq!(text, "sign(text:\"no$entry\");\n");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert_eq!(diagnostics[0].line, Some(1));
    assert_eq!(diagnostics[0].column, None);
}

#[test]
fn test_deeply_nested_value_is_wrapped() {
    let depth = 20_000;
    let value = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    let xml = format!(r#"<point x="{value}"/>"#);
    let (text, diagnostics) = decompile_with(&xml, &point_tables(&["x"]));
    assert_eq!(text, format!("point(\"{value}\");\n"));
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
}

#[test]
fn test_set_value_shorthand() {
    let (text, _) = decompile_with(
        "<script>\n  <set_value name=\"lives\" exact=\"3\"/>\n</script>",
        &Tables::default(),
    );
    assert_eq!(text, "script\n{\n    lives = 3;\n}\n");
}

#[test]
fn test_custom_indent() {
    let rules = DecompileRules {
        indent_string: "\t".to_string(),
        ..DecompileRules::default()
    };
    let mut diagnostics = Vec::new();
    let text = Decompile::new(rules)
        .convert("t.xml", "<a><b><c/></b></a>", &Tables::default(), &mut diagnostics)
        .unwrap();
    assert_eq!(text, "a\n{\n\tb\n\t{\n\t\tc;\n\t}\n}\n");
}

#[test]
fn test_truncated_document_is_an_error() {
    let mut diagnostics = Vec::new();
    let result = Decompile::default().convert(
        "t.xml",
        "<a><b x=\"1></a>",
        &Tables::default(),
        &mut diagnostics,
    );
    assert!(matches!(result, Err(ConvertError::Xml(_))));
}

/// Replays a fixed node list, to drive the converter without any XML text.
struct Replay(std::vec::IntoIter<XmlNode>);

impl XmlSource for Replay {
    fn next_node(&mut self) -> Result<Option<XmlNode>, ConvertError> {
        Ok(self.0.next())
    }
}

#[test]
fn test_any_xml_source_can_drive_the_converter() {
    let nodes = vec![
        XmlNode::StartElement {
            name: "point".to_string(),
            attributes: vec![
                ("y".to_string(), "2".to_string()),
                ("x".to_string(), "1".to_string()),
            ],
            self_closing: true,
            line: 7,
        },
        XmlNode::Comment("done".to_string()),
    ];
    let mut diagnostics = Vec::new();
    let text = decompile_source(
        "replay",
        &mut Replay(nodes.into_iter()),
        &point_tables(&["x", "y"]),
        &DecompileRules::default(),
        &mut diagnostics,
    )
    .unwrap();
    assert_eq!(text, "point(1, 2);\n//done\n");
}

#[test]
fn test_intro_fixture() {
    let (text, diagnostics) = decompile_with(&fixture("intro.xml"), &fixture_tables());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].to_string(),
        "test.xml:10: very angry isn't a valid expression, got to wrap it"
    );
    assert_snapshot!(text.trim_end(), @r#"
//Intro level
level(name:intro)
{
    sp(orc, 3, delay:1.5); // first wave
    health = 100;

    tz(4.5)
    {
        snd(alarm.wav, gain:high);
        //boss wave
        sp(boss, mood:"very angry");
    }
    point(1, z:3);
}
"#);
}
