//! Integration tests for decoding what the encoder produced

mod common;

use common::*;
use dartir_binary::{
    decode, decode_with, encode, DecodeError, EncodeError, EncoderConfig, EncoderLimits, IrEncoder,
    ValidationIssue,
};
use dartir_ir::walk::max_nesting_depth;
use dartir_ir::{
    DartFile, DartType, Expression, ExpressionKind, FunctionBody, SourceLocation, Statement,
    StatementKind, VariableDecl,
};

const TODO_TILE: &str = include_str!("fixtures/todo_tile.json");

fn todo_tile() -> DartFile {
    serde_json::from_str(TODO_TILE).unwrap()
}

#[test]
fn test_counter_app_round_trip() {
    let file = counter_app();
    let module = decode(&encode(&file).unwrap()).unwrap();

    assert!(module.header.has_checksum());
    assert!(module.checksum.is_some());
    assert_eq!(module.file, file);
}

#[test]
fn test_fixture_round_trip() {
    let file = todo_tile();
    assert_eq!(file.classes[0].name, "TodoTile");

    let plain = IrEncoder::new(EncoderConfig::default().with_checksum(false))
        .encode(&file)
        .unwrap();
    let module = decode(&plain).unwrap();
    assert!(!module.header.has_checksum());
    assert_eq!(module.checksum, None);
    assert_eq!(module.file, file);
}

#[test]
fn test_fixture_relationships() {
    let module = decode(&encode(&todo_tile()).unwrap()).unwrap();
    let rel = &module.relationships;

    assert!(rel.widget_to_state.is_empty());
    assert!(rel.lifecycle.is_empty());
    assert_eq!(rel.class_hierarchy["c_tile"], "StatelessWidget");
    assert!(rel.interface_implementers["Comparable"].contains("c_tile"));
    assert_eq!(rel.build_outputs["c_tile"], "ListTile");

    // unresolved `formatTitle(...)` falls back to the top-level function
    assert!(rel.method_calls["m_build"].contains("fn_format"));
    let build_fields: Vec<_> = rel.field_accesses["m_build"].iter().collect();
    assert_eq!(build_fields, vec!["f_done", "f_title"]);
    // `this.title` is a field read, `other.title` is not attributed
    let compare_fields: Vec<_> = rel.field_accesses["m_compare"].iter().collect();
    assert_eq!(compare_fields, vec!["f_title"]);
    assert!(!rel.method_calls.contains_key("fn_format"));
}

#[test]
fn test_non_native_types_come_back_in_wire_form() {
    let mut file = DartFile::new("lib/list.dart", "aa");
    let mut holder = class("c_holder", "Holder", None);
    let items = DartType::generic("List", vec![DartType::nullable("String")]);
    holder.fields.push(field("f_items", "items", items.clone()));
    file.classes.push(holder);

    let module = decode(&encode(&file).unwrap()).unwrap();
    let decoded = &module.file.classes[0].fields[0].field_type;
    assert_eq!(*decoded, items.to_wire_form());
    assert_eq!(decoded.to_string(), "List<String?>");
}

#[test]
fn test_empty_optional_text_reads_as_absent() {
    let mut file = counter_app();
    file.classes[1].methods[0].overridden_signature = Some(String::new());

    let module = decode(&encode(&file).unwrap()).unwrap();
    assert_eq!(module.file.classes[1].methods[0].overridden_signature, None);
}

#[test]
fn test_missing_library_name() {
    let mut file = counter_app();
    file.library_name = None;

    let module = decode(&encode(&file).unwrap()).unwrap();
    assert_eq!(module.file.library_name, None);
    assert!(module.strings.iter().any(|s| s == "<unknown>"));
}

#[test]
fn test_blank_location_file_takes_the_file_path() {
    let mut file = DartFile::new("lib/blank.dart", "bb");
    let mut panel = class("c_panel", "Panel", None);
    panel.location = SourceLocation::default();
    file.classes.push(panel);

    let module = decode(&encode(&file).unwrap()).unwrap();
    let location = &module.file.classes[0].location;
    assert_eq!(location.file, "lib/blank.dart");
    assert_eq!(location.line, 0);
}

#[test]
fn test_string_literals_survive() {
    let mut file = counter_app();
    let mut greeting = field("f_greeting", "greeting", DartType::simple("String"));
    greeting.initializer = Some(expr(
        "e_greeting",
        DartType::simple("String"),
        ExpressionKind::StringLiteral {
            value: "héllo, wörld ✓".to_string(),
        },
    ));
    file.classes[1].fields.push(greeting);

    let module = decode(&encode(&file).unwrap()).unwrap();
    assert_eq!(module.file, file);
}

#[test]
fn test_decoder_depth_limit() {
    let bytes = encode(&counter_app()).unwrap();
    let limits = EncoderLimits {
        max_nesting_depth: 3,
        ..EncoderLimits::default()
    };
    assert!(matches!(
        decode_with(&bytes, &limits),
        Err(DecodeError::NestingTooDeep(3))
    ));
}

fn lambda(level: usize, statements: Vec<Statement>) -> Expression {
    expr(
        &format!("e{}", level),
        DartType::Dynamic,
        ExpressionKind::Lambda {
            parameters: Vec::new(),
            body: FunctionBody::Block { statements },
            is_async: false,
        },
    )
}

/// `final handler = () { return () { return ... }; };`, `levels` deep
fn lambda_chain(levels: usize) -> DartFile {
    let mut level = levels;
    let mut statements = Vec::new();
    if level % 2 == 0 {
        statements.push(stmt(&format!("s{}", level), StatementKind::Return { value: None }));
        level -= 1;
    }
    let mut initializer = lambda(level, statements);
    while level > 1 {
        let ret = stmt(
            &format!("s{}", level - 1),
            StatementKind::Return {
                value: Some(initializer),
            },
        );
        initializer = lambda(level - 2, vec![ret]);
        level -= 2;
    }

    let mut file = DartFile::new(COUNTER_PATH, "5ca1ab1e");
    file.variables.push(VariableDecl {
        id: "v_handler".to_string(),
        location: loc(1),
        name: "handler".to_string(),
        declared_type: DartType::Dynamic,
        initializer: Some(initializer),
        is_final: true,
        is_const: false,
        is_late: false,
    });
    file
}

#[test]
fn test_default_depth_round_trips_on_small_stack() {
    let depth = EncoderLimits::default().max_nesting_depth;
    let file = lambda_chain(depth);
    assert_eq!(max_nesting_depth(&file), depth);

    // smallest stack a spawned thread gets by default
    let worker = std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(move || {
            let module = decode(&encode(&file).unwrap()).unwrap();
            assert_eq!(module.file, file);
        })
        .unwrap();
    worker.join().unwrap();
}

#[test]
fn test_one_level_past_default_depth_is_rejected() {
    let max = EncoderLimits::default().max_nesting_depth;
    let err = encode(&lambda_chain(max + 1)).unwrap_err();
    let EncodeError::Validation(issues) = err else {
        panic!("expected validation failure");
    };
    assert_eq!(
        issues,
        vec![ValidationIssue::NestingTooDeep {
            depth: max + 1,
            max
        }]
    );

    // the decoder counts the same way
    let bytes = encode(&lambda_chain(max)).unwrap();
    let tighter = EncoderLimits {
        max_nesting_depth: max - 1,
        ..EncoderLimits::default()
    };
    assert!(matches!(
        decode_with(&bytes, &tighter),
        Err(DecodeError::NestingTooDeep(limit)) if limit == max - 1
    ));
}

/// Take a nested generic apart one level at a time
fn unwind(mut ty: DartType) {
    loop {
        let inner = match &mut ty {
            DartType::Generic { type_arguments, .. } => type_arguments.pop(),
            _ => None,
        };
        match inner {
            Some(inner) => ty = inner,
            None => break,
        }
    }
}

#[test]
fn test_deep_generic_superclass_encodes() {
    let levels = 20_000;
    let mut superclass = DartType::simple("W");
    for _ in 0..levels {
        superclass = DartType::generic("L", vec![superclass]);
    }
    let mut file = DartFile::new("lib/deep.dart", "0ddba11");
    file.classes.push(class("c_deep", "Deep", Some(superclass)));

    let result = encode(&file);
    if let Some(superclass) = file.classes[0].superclass.take() {
        unwind(superclass);
    }

    let name = format!("{}W{}", "L<".repeat(levels), ">".repeat(levels));
    let module = decode(&result.unwrap()).unwrap();
    assert_eq!(module.relationships.class_hierarchy["c_deep"], name);
    assert_eq!(
        module.file.classes[0].superclass,
        Some(DartType::Simple {
            name,
            nullable: false
        })
    );
}

#[test]
fn test_every_truncation_is_rejected() {
    let bytes = IrEncoder::new(EncoderConfig::default().with_checksum(false))
        .encode(&counter_app())
        .unwrap();
    for len in 0..bytes.len() {
        assert!(decode(&bytes[..len]).is_err(), "prefix of {} bytes decoded", len);
    }
}

#[test]
fn test_flipped_byte_fails_checksum() {
    let mut bytes = encode(&todo_tile()).unwrap();
    let middle = bytes.len() / 2;
    bytes[middle] ^= 0x01;
    assert!(matches!(
        decode(&bytes),
        Err(DecodeError::ChecksumMismatch { .. })
    ));
}
