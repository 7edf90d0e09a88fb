use super::*;

// =============================================================
// ComponentKind
// =============================================================

#[test]
fn kind_serde_all_variants() {
    let cases = [
        (ComponentKind::Video, "\"video\""),
        (ComponentKind::Quiz, "\"quiz\""),
        (ComponentKind::Text, "\"text\""),
        (ComponentKind::Code, "\"code\""),
        (ComponentKind::Diagram, "\"diagram\""),
    ];
    for (kind, expected) in cases {
        assert_eq!(serde_json::to_string(&kind).unwrap(), expected);
    }
}

#[test]
fn kind_deserialize_invalid_rejects() {
    assert!(serde_json::from_str::<ComponentKind>("\"slides\"").is_err());
}

#[test]
fn kind_from_tag_is_exact() {
    assert_eq!(ComponentKind::from_tag("quiz"), Some(ComponentKind::Quiz));
    assert_eq!(ComponentKind::from_tag("Quiz"), None);
    assert_eq!(ComponentKind::from_tag(""), None);
}

#[test]
fn kind_tag_round_trips_through_from_tag() {
    for kind in ComponentKind::ALL {
        assert_eq!(ComponentKind::from_tag(kind.tag()), Some(kind));
    }
}

// =============================================================
// Registry
// =============================================================

#[test]
fn describe_known_type() {
    let registry = Registry::new();
    let video = registry.describe("video").unwrap();
    assert_eq!(video.icon, "🎥");
    assert_eq!(video.name, "Video Lesson");
    let labels: Vec<_> = video.fields.iter().map(|f| f.label).collect();
    assert_eq!(labels, ["Title", "URL", "Duration"]);
}

#[test]
fn describe_unknown_type_fails() {
    let err = Registry::new().describe("slides").unwrap_err();
    assert_eq!(err, BuilderError::UnknownType("slides".into()));
}

#[test]
fn describe_kind_matches_catalog_order() {
    let registry = Registry::new();
    for kind in ComponentKind::ALL {
        assert_eq!(registry.describe_kind(kind).kind, kind);
    }
}

#[test]
fn entries_in_palette_order() {
    let names: Vec<_> = Registry::new().entries().iter().map(|e| e.name).collect();
    assert_eq!(names, ["Video Lesson", "Quiz", "Text Content", "Code Playground", "Interactive Diagram"]);
}

#[test]
fn field_keys_are_lowercased_labels() {
    for entry in Registry::new().entries() {
        for field in entry.fields {
            assert_eq!(field.key, field.label.to_lowercase());
        }
    }
}

// =============================================================
// Field lookup
// =============================================================

#[test]
fn field_lookup_ignores_case() {
    let quiz = Registry::new().describe("quiz").unwrap();
    assert_eq!(quiz.field("TIME LIMIT").unwrap().key, "time limit");
    assert_eq!(quiz.field("Time Limit").unwrap().default, "No limit");
    assert!(quiz.field("timelimit").is_none());
}

#[test]
fn resolve_key_rejects_foreign_field() {
    let text = Registry::new().describe("text").unwrap();
    assert_eq!(text.resolve_key("Content").unwrap(), "content");
    let err = text.resolve_key("url").unwrap_err();
    assert_eq!(err, BuilderError::UnknownField { kind: "text".into(), field: "url".into() });
}

#[test]
fn code_defaults() {
    let code = Registry::new().describe("code").unwrap();
    let defaults: Vec<_> = code.fields.iter().map(|f| f.default).collect();
    assert_eq!(defaults, ["Code", "// Add code here", "No instructions provided"]);
}
