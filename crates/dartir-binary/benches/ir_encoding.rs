use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dartir_binary::{decode, EncoderConfig, IrEncoder, NamingConventionPairing, RelationshipRegistry};
use dartir_ir::{
    ClassDecl, DartFile, DartType, Expression, ExpressionKind, FieldDecl, FunctionBody,
    FunctionDecl, MethodDecl, NamedArgument, SourceLocation, Statement, StatementKind,
};

const PATH: &str = "lib/screens.dart";

fn loc(line: u32) -> SourceLocation {
    SourceLocation::new(PATH, line, 1, line * 20, 8)
}

fn class(id: String, name: String, superclass: &str) -> ClassDecl {
    ClassDecl {
        id,
        location: loc(1),
        metadata: Default::default(),
        name,
        superclass: Some(DartType::simple(superclass)),
        interfaces: Vec::new(),
        mixins: Vec::new(),
        type_parameters: Vec::new(),
        fields: Vec::new(),
        methods: Vec::new(),
        constructors: Vec::new(),
        is_abstract: false,
        annotations: Vec::new(),
    }
}

fn build_method(class_id: &str, class_name: &str, field_id: &str) -> MethodDecl {
    let read = Expression::new(
        format!("{}.read", class_id),
        loc(3),
        DartType::simple("String"),
        ExpressionKind::Identifier {
            name: "title".to_string(),
            resolved_id: Some(field_id.to_string()),
        },
    );
    let text = Expression::new(
        format!("{}.text", class_id),
        loc(3),
        DartType::simple("Text"),
        ExpressionKind::InstanceCreation {
            constructed_type: DartType::simple("Text"),
            constructor_name: None,
            arguments: vec![read],
            named_arguments: Vec::new(),
            is_const: false,
        },
    );
    let padding = Expression::new(
        format!("{}.padding", class_id),
        loc(3),
        DartType::simple("Padding"),
        ExpressionKind::InstanceCreation {
            constructed_type: DartType::simple("Padding"),
            constructor_name: None,
            arguments: Vec::new(),
            named_arguments: vec![NamedArgument {
                name: "child".to_string(),
                value: text,
            }],
            is_const: false,
        },
    );
    MethodDecl {
        function: FunctionDecl {
            id: format!("{}.build", class_id),
            location: loc(2),
            metadata: Default::default(),
            name: "build".to_string(),
            return_type: DartType::simple("Widget"),
            type_parameters: Vec::new(),
            parameters: Vec::new(),
            body: FunctionBody::Block {
                statements: vec![Statement::new(
                    format!("{}.return", class_id),
                    loc(3),
                    StatementKind::Return {
                        value: Some(padding),
                    },
                )],
            },
            is_async: false,
            is_generator: false,
            annotations: Vec::new(),
            components: None,
        },
        class_name: class_name.to_string(),
        is_static: false,
        is_abstract: false,
        is_getter: false,
        is_setter: false,
        overridden_signature: None,
    }
}

/// `screens` widget/state pairs, each state with a field and a build method
fn screens(screens: usize) -> DartFile {
    let mut file = DartFile::new(PATH, "0badc0de");
    file.library_name = Some("screens".to_string());
    for i in 0..screens {
        let widget_name = format!("Screen{}", i);
        let state_name = format!("_Screen{}State", i);
        file.classes
            .push(class(format!("w{}", i), widget_name.clone(), "StatefulWidget"));

        let state_id = format!("s{}", i);
        let field_id = format!("{}.title", state_id);
        let mut state = class(state_id.clone(), state_name.clone(), &format!("State<{}>", widget_name));
        state.fields.push(FieldDecl {
            id: field_id.clone(),
            location: loc(2),
            metadata: Default::default(),
            name: "title".to_string(),
            field_type: DartType::simple("String"),
            initializer: None,
            is_final: false,
            is_const: false,
            is_static: false,
            is_late: true,
            annotations: Vec::new(),
        });
        state
            .methods
            .push(build_method(&state_id, &state_name, &field_id));
        file.classes.push(state);
    }
    file
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for size in [1, 16, 128] {
        let file = screens(size);
        let checked = IrEncoder::default();
        let plain = IrEncoder::new(EncoderConfig::default().with_checksum(false));
        group.throughput(Throughput::Elements(file.classes.len() as u64));

        group.bench_with_input(BenchmarkId::new("checksum", size), &file, |b, file| {
            b.iter(|| checked.encode(black_box(file)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("plain", size), &file, |b, file| {
            b.iter(|| plain.encode(black_box(file)).unwrap());
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for size in [1, 16, 128] {
        let bytes = IrEncoder::default().encode(&screens(size)).unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("screens", size), &bytes, |b, bytes| {
            b.iter(|| decode(black_box(bytes)).unwrap());
        });
    }

    group.finish();
}

fn bench_registry(c: &mut Criterion) {
    let file = screens(128);
    let pairing = NamingConventionPairing;

    c.bench_function("registry_build_128", |b| {
        b.iter(|| RelationshipRegistry::build(black_box(&file), &pairing));
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_registry);
criterion_main!(benches);
