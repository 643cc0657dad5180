//! Integration tests for the encoding pipeline

mod common;

use common::*;
use dartir_binary::{
    decode, encode, EncodeError, EncoderConfig, IrEncoder, LifecycleMethod, RelationshipIssue,
    StatePairing, ValidationIssue,
};
use dartir_binary::format::{relationship, CHECKSUM_SIZE, FLAG_CHECKSUM, FORMAT_VERSION, MAGIC};
use dartir_ir::{ClassDecl, DartFile, DartType, FunctionBody, ParameterKind};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

fn encode_plain(file: &DartFile) -> Vec<u8> {
    IrEncoder::new(EncoderConfig::default().with_checksum(false))
        .encode(file)
        .unwrap()
}

#[test]
fn test_empty_file_layout() {
    let bytes = encode_plain(&DartFile::new("a.dart", "h"));

    let mut expected = Vec::new();
    expected.extend_from_slice(&MAGIC.to_le_bytes());
    expected.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    expected.extend_from_slice(&0u16.to_le_bytes());
    expected.extend_from_slice(&3u32.to_le_bytes());
    for s in ["a.dart", "h", "<unknown>"] {
        expected.extend_from_slice(&(s.len() as u16).to_le_bytes());
        expected.extend_from_slice(s.as_bytes());
    }
    expected.extend_from_slice(&0u16.to_le_bytes()); // no relationships
    for index in [0u32, 1, 2] {
        expected.extend_from_slice(&index.to_le_bytes());
    }
    expected.extend_from_slice(&0u64.to_le_bytes());
    for _ in 0..7 {
        expected.extend_from_slice(&0u32.to_le_bytes());
    }

    assert_eq!(bytes, expected);
    assert_eq!(&bytes[..4], b"DIRB");
}

#[test]
fn test_empty_file_with_checksum() {
    let plain = encode_plain(&DartFile::new("a.dart", "h"));
    let bytes = encode(&DartFile::new("a.dart", "h")).unwrap();
    assert_eq!(bytes.len(), plain.len() + CHECKSUM_SIZE);
    assert_eq!(u16::from_le_bytes([bytes[6], bytes[7]]), FLAG_CHECKSUM);

    let (body, trailer) = bytes.split_at(bytes.len() - CHECKSUM_SIZE);
    assert_eq!(trailer, Sha256::digest(body).as_slice());
}

#[test]
fn test_widget_state_pairing() {
    let module = decode(&encode(&counter_app()).unwrap()).unwrap();
    let rel = &module.relationships;

    assert_eq!(rel.widget_to_state.len(), 1);
    assert_eq!(rel.widget_to_state["c_counter"], "c_state");

    let mut hooks = BTreeMap::new();
    hooks.insert(LifecycleMethod::InitState, "m_init".to_string());
    assert_eq!(rel.lifecycle.len(), 1);
    assert_eq!(rel.lifecycle["c_state"], hooks);

    assert_eq!(rel.build_methods.len(), 1);
    assert_eq!(rel.build_methods["c_state"], "m_build");
}

#[test]
fn test_counter_relationships() {
    let module = decode(&encode(&counter_app()).unwrap()).unwrap();
    let rel = &module.relationships;

    assert_eq!(
        rel.method_calls["m_build"].iter().collect::<Vec<_>>(),
        vec!["m_inc"]
    );
    assert!(rel.field_accesses["m_build"].contains("f_count"));
    assert!(rel.field_accesses["m_inc"].contains("f_count"));
    assert!(!rel.method_calls.contains_key("m_init"));

    assert_eq!(rel.class_hierarchy["c_counter"], "StatefulWidget");
    assert_eq!(rel.class_hierarchy["c_state"], "State<Counter>");
    assert_eq!(rel.build_outputs["c_state"], "Column");
    assert!(rel.interface_implementers.is_empty());
}

#[test]
fn test_relationship_flags_in_header_order() {
    let bytes = encode_plain(&counter_app());
    let module = decode(&bytes).unwrap();

    // string table ends where the relationship flags begin
    let table_len: usize = 4 + module.strings.iter().map(|s| 2 + s.len()).sum::<usize>();
    let offset = 8 + table_len;
    let flags = u16::from_le_bytes([bytes[offset], bytes[offset + 1]]);
    assert_eq!(
        flags,
        relationship::WIDGET_STATE
            | relationship::LIFECYCLE
            | relationship::METHOD_CALLS
            | relationship::FIELD_ACCESS
            | relationship::CLASS_HIERARCHY
            | relationship::BUILD_OUTPUTS
    );
}

#[test]
fn test_shared_string_interns_once() {
    let mut file = DartFile::new("lib/models.dart", "5e1f");
    let mut a = class("c_a", "Clicks", None);
    a.fields.push(field("f_a", "count", DartType::simple("int")));
    let mut b = class("c_b", "Taps", None);
    b.fields.push(field("f_b", "count", DartType::simple("int")));
    file.classes = vec![a, b];

    let module = decode(&encode(&file).unwrap()).unwrap();
    let occurrences = module.strings.iter().filter(|s| *s == "count").count();
    assert_eq!(occurrences, 1);
    assert_eq!(module.file.classes[0].fields[0].name, "count");
    assert_eq!(module.file.classes[1].fields[0].name, "count");
}

#[test]
fn test_empty_class_name_fails_before_relationships() {
    let mut file = DartFile::new("lib/bad.dart", "77");
    file.classes.push(class("c_empty", "", None));

    let mut augmented = false;
    let err = IrEncoder::default()
        .encode_with(&file, |_| augmented = true)
        .unwrap_err();

    assert!(!augmented);
    match err {
        EncodeError::Validation(issues) => assert_eq!(
            issues,
            vec![ValidationIssue::EmptyName {
                kind: "class",
                id: "c_empty".to_string()
            }]
        ),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_dangling_method_call_produces_no_bytes() {
    let result = IrEncoder::default().encode_with(&counter_app(), |registry| {
        registry.record_method_call("m_build", "m_missing");
    });

    match result {
        Err(EncodeError::RelationshipValidation(issues)) => assert_eq!(
            issues,
            vec![RelationshipIssue::UnknownMethod {
                map: "method_calls",
                id: "m_missing".to_string()
            }]
        ),
        other => panic!("unexpected result {:?}", other.map(|b| b.len())),
    }
}

#[test]
fn test_recorded_edges_are_serialized() {
    let bytes = IrEncoder::default()
        .encode_with(&counter_app(), |registry| {
            registry.record_method_call("m_init", "m_inc");
        })
        .unwrap();
    let module = decode(&bytes).unwrap();
    assert!(module.relationships.method_calls["m_init"].contains("m_inc"));
}

#[test]
fn test_validation_collects_every_issue() {
    let mut file = DartFile::new("", "");
    file.classes.push(class("", "", None));
    let mut widget = class("c_w", "W", None);
    widget.fields.push(field("f_w", "", DartType::Dynamic));
    file.classes.push(widget);

    let err = encode(&file).unwrap_err();
    let EncodeError::Validation(issues) = err else {
        panic!("expected validation failure");
    };
    assert!(issues.contains(&ValidationIssue::EmptyFilePath));
    assert!(issues.contains(&ValidationIssue::EmptyContentHash));
    assert!(issues.contains(&ValidationIssue::EmptyName {
        kind: "field",
        id: "f_w".to_string()
    }));
    assert!(issues.len() >= 4);
}

#[test]
fn test_independent_violations_reported_together() {
    let mut file = DartFile::new("lib/form.dart", "d00d");
    file.classes.push(class("c_nameless", "", None));
    let mut submit = function("fn_submit", "submit", DartType::Void, FunctionBody::Empty);
    submit.parameters = (0..3)
        .map(|i| {
            param(
                &format!("p{}", i),
                &format!("arg{}", i),
                DartType::Dynamic,
                ParameterKind::Positional,
            )
        })
        .collect();
    file.functions.push(submit);

    let config = EncoderConfig::from_json(r#"{"limits": {"max_parameters": 2}}"#).unwrap();
    let err = IrEncoder::new(config).encode(&file).unwrap_err();
    let EncodeError::Validation(issues) = err else {
        panic!("expected validation failure");
    };
    assert_eq!(
        issues,
        vec![
            ValidationIssue::TooManyParameters {
                owner: "function",
                id: "fn_submit".to_string(),
                count: 3,
                max: 2
            },
            ValidationIssue::EmptyName {
                kind: "class",
                id: "c_nameless".to_string()
            },
        ]
    );
}

#[test]
fn test_encoding_is_deterministic() {
    let file = counter_app();
    let first = encode(&file).unwrap();
    for _ in 0..5 {
        assert_eq!(encode(&file).unwrap(), first);
    }
    assert_eq!(encode(&file.clone()).unwrap(), first);
}

#[test]
fn test_string_table_starts_with_file_header_strings() {
    let module = decode(&encode(&counter_app()).unwrap()).unwrap();
    assert_eq!(&module.strings[..3], &[COUNTER_PATH, "c0ffee", "counter"]);

    let mut seen = std::collections::HashSet::new();
    assert!(module.strings.iter().all(|s| !s.is_empty() && seen.insert(s)));
}

struct AnnotatedPairing;

impl StatePairing for AnnotatedPairing {
    fn is_stateful_widget(&self, class: &ClassDecl) -> bool {
        class.metadata.contains_key("state")
    }

    fn resolve_state<'a>(&self, widget: &ClassDecl, classes: &'a [ClassDecl]) -> Option<&'a ClassDecl> {
        let state = widget.metadata.get("state")?;
        classes.iter().find(|c| &c.name == state)
    }
}

#[test]
fn test_custom_pairing_strategy() {
    let mut file = DartFile::new("lib/panel.dart", "ab12");
    let mut panel = class("c_panel", "Panel", Some(DartType::simple("Widget")));
    panel
        .metadata
        .insert("state".to_string(), "PanelController".to_string());
    let controller = class("c_ctrl", "PanelController", None);
    file.classes = vec![panel, controller];

    let default_module = decode(&encode(&file).unwrap()).unwrap();
    assert!(default_module.relationships.widget_to_state.is_empty());

    let bytes = IrEncoder::default()
        .with_pairing(AnnotatedPairing)
        .encode(&file)
        .unwrap();
    let module = decode(&bytes).unwrap();
    assert_eq!(module.relationships.widget_to_state["c_panel"], "c_ctrl");
}

#[test]
fn test_config_from_json() {
    let config = EncoderConfig::from_json(r#"{"checksum": false, "limits": {"max_classes": 1}}"#).unwrap();
    assert!(!config.checksum);
    assert_eq!(config.limits.max_classes, 1);

    let err = IrEncoder::new(config).encode(&counter_app()).unwrap_err();
    assert!(matches!(
        err,
        EncodeError::Validation(ref issues)
            if issues.contains(&ValidationIssue::TooManyDeclarations { kind: "classes", count: 2, max: 1 })
    ));
}
