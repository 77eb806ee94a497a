//! Integration tests for Path parsing and manipulation

use formtree_foundation::{ErrorKind, IntoPath, Path, Segment, Value, access, keyify};

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn parse_mixed_path() {
    let path = Path::parse("order.rows[2].name").unwrap();
    assert_eq!(
        path.segments(),
        &[
            Segment::Key("order".into()),
            Segment::Key("rows".into()),
            Segment::Index(2),
            Segment::Key("name".into()),
        ]
    );
}

#[test]
fn empty_string_is_root() {
    let path = Path::parse("").unwrap();
    assert!(path.is_root());
    assert_eq!(path, Path::root());
}

#[test]
fn dotted_digits_normalize_to_index() {
    assert_eq!(Path::parse("a.0").unwrap(), Path::parse("a[0]").unwrap());
    assert_eq!(Path::parse("a.0").unwrap().to_string(), "a[0]");
}

#[test]
fn leading_zero_stays_a_key() {
    let path = Path::parse("a.01").unwrap();
    assert_eq!(path.last(), Some(&Segment::Key("01".into())));
}

#[test]
fn malformed_paths_are_rejected() {
    for bad in ["a..b", ".a", "a.", "a[", "a[x]", "a[-1]", "a]", "a[0]b"] {
        let err = Path::parse(bad).unwrap_err();
        assert!(
            matches!(err.kind, ErrorKind::PathSyntax { .. }),
            "expected syntax error for {bad:?}"
        );
    }
}

#[test]
fn syntax_error_names_path() {
    let err = Path::parse("a..b").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("a..b"));
    assert!(msg.contains("empty segment"));
}

// =============================================================================
// Building and Comparing
// =============================================================================

#[test]
fn builders_match_parse() {
    let built = Path::root().key("rows").index(3).key("qty");
    assert_eq!(built, Path::parse("rows[3].qty").unwrap());
    assert_eq!(built.to_string(), "rows[3].qty");
}

#[test]
fn parent_and_join() {
    let path = Path::parse("a.b[1]").unwrap();
    assert_eq!(path.parent(), Some(Path::parse("a.b").unwrap()));
    assert_eq!(Path::root().parent(), None);

    let joined = Path::parse("a").unwrap().join(&Path::parse("b[1]").unwrap());
    assert_eq!(joined, path);
}

#[test]
fn prefix_relations() {
    let rows = Path::parse("rows").unwrap();
    let cell = Path::parse("rows[1].qty").unwrap();
    assert!(cell.starts_with(&rows));
    assert!(!rows.starts_with(&cell));
    assert!(rows.overlaps(&cell));
    assert_eq!(cell.strip_prefix(&rows), Some(Path::parse("[1].qty").unwrap()));
    assert!(!rows.overlaps(&Path::parse("rowsx").unwrap()));
}

#[test]
fn into_path_accepts_strings_and_paths() {
    let expected = Path::parse("a.b").unwrap();
    assert_eq!("a.b".into_path().unwrap(), expected);
    assert_eq!(String::from("a.b").into_path().unwrap(), expected);
    assert_eq!((&expected).into_path().unwrap(), expected);
    assert!("a..b".into_path().is_err());
}

#[test]
fn from_str_parses() {
    let path: Path = "x[0].y".parse().unwrap();
    assert_eq!(path.len(), 3);
}

// =============================================================================
// Quoted Keys
// =============================================================================

#[test]
fn awkward_field_names_survive_display() {
    let tree = Value::object([
        ("", Value::Int(1)),
        ("x.y", Value::Int(2)),
        ("[0]", Value::Int(3)),
    ]);
    for path in keyify(&tree) {
        let text = path.to_string();
        let reparsed = Path::parse(&text).unwrap();
        assert_eq!(reparsed, path, "{text} did not round-trip");
        assert!(access::get(&tree, &reparsed).is_some(), "{text} lost its field");
    }
}

#[test]
fn quoted_key_in_the_middle() {
    let path = Path::parse("form[\"first.name\"].value").unwrap();
    assert_eq!(path.segments()[1], Segment::Key("first.name".into()));
    assert_eq!(path.to_string(), "form[\"first.name\"].value");
}
