//! Shared IR builders for the integration tests

#![allow(dead_code)]

use dartir_ir::{
    BinaryOperator, ClassDecl, ComponentProperty, ConstructorDecl, ConstructorInvocation,
    DartFile, DartType, Expression, ExpressionKind, FieldDecl, FlutterComponent, FunctionBody,
    FunctionDecl, InterpolationPart, MethodDecl, NamedArgument, ParameterDecl, ParameterKind,
    PropertyValue, SourceLocation, Statement, StatementKind, WidgetComponent,
};

pub const COUNTER_PATH: &str = "lib/counter.dart";

pub fn loc(line: u32) -> SourceLocation {
    SourceLocation::new(COUNTER_PATH, line, 3, line * 40, 12)
}

pub fn expr(id: &str, ty: DartType, kind: ExpressionKind) -> Expression {
    Expression::new(id, loc(1), ty, kind)
}

pub fn stmt(id: &str, kind: StatementKind) -> Statement {
    Statement::new(id, loc(1), kind)
}

pub fn ident(id: &str, name: &str, resolved: Option<&str>) -> Expression {
    expr(
        id,
        DartType::Dynamic,
        ExpressionKind::Identifier {
            name: name.to_string(),
            resolved_id: resolved.map(str::to_string),
        },
    )
}

pub fn create(id: &str, type_name: &str, named: Vec<NamedArgument>) -> Expression {
    expr(
        id,
        DartType::simple(type_name),
        ExpressionKind::InstanceCreation {
            constructed_type: DartType::simple(type_name),
            constructor_name: None,
            arguments: Vec::new(),
            named_arguments: named,
            is_const: false,
        },
    )
}

pub fn named(name: &str, value: Expression) -> NamedArgument {
    NamedArgument {
        name: name.to_string(),
        value,
    }
}

pub fn function(id: &str, name: &str, return_type: DartType, body: FunctionBody) -> FunctionDecl {
    FunctionDecl {
        id: id.to_string(),
        location: loc(2),
        metadata: Default::default(),
        name: name.to_string(),
        return_type,
        type_parameters: Vec::new(),
        parameters: Vec::new(),
        body,
        is_async: false,
        is_generator: false,
        annotations: Vec::new(),
        components: None,
    }
}

pub fn method(class_name: &str, function: FunctionDecl) -> MethodDecl {
    MethodDecl {
        function,
        class_name: class_name.to_string(),
        is_static: false,
        is_abstract: false,
        is_getter: false,
        is_setter: false,
        overridden_signature: None,
    }
}

pub fn param(id: &str, name: &str, ty: DartType, kind: ParameterKind) -> ParameterDecl {
    ParameterDecl {
        id: id.to_string(),
        location: loc(3),
        name: name.to_string(),
        param_type: ty,
        kind,
        default_value: None,
        is_field_initializer: false,
        is_super_initializer: false,
        annotations: Vec::new(),
    }
}

pub fn field(id: &str, name: &str, ty: DartType) -> FieldDecl {
    FieldDecl {
        id: id.to_string(),
        location: loc(4),
        metadata: Default::default(),
        name: name.to_string(),
        field_type: ty,
        initializer: None,
        is_final: false,
        is_const: false,
        is_static: false,
        is_late: false,
        annotations: Vec::new(),
    }
}

pub fn class(id: &str, name: &str, superclass: Option<DartType>) -> ClassDecl {
    ClassDecl {
        id: id.to_string(),
        location: loc(5),
        metadata: Default::default(),
        name: name.to_string(),
        superclass,
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

fn block(statements: Vec<Statement>) -> FunctionBody {
    FunctionBody::Block { statements }
}

/// The stock Flutter counter: a stateful widget and its state.
///
/// All types are wire-native and every location names the file, so the
/// tree survives an encode/decode round trip unchanged.
pub fn counter_app() -> DartFile {
    let mut widget = class("c_counter", "Counter", Some(DartType::simple("StatefulWidget")));
    let mut ctor_fn = function("k_counter", "Counter", DartType::simple("Counter"), FunctionBody::Empty);
    ctor_fn.parameters.push(param(
        "p_key",
        "key",
        DartType::nullable("Key"),
        ParameterKind::Named,
    ));
    widget.constructors.push(ConstructorDecl {
        function: ctor_fn,
        class_name: "Counter".to_string(),
        constructor_name: None,
        initializers: Vec::new(),
        super_call: Some(ConstructorInvocation {
            constructor_name: None,
            arguments: Vec::new(),
            named_arguments: vec![named("key", ident("e_key", "key", Some("p_key")))],
        }),
        redirect: None,
        is_const: true,
        is_factory: false,
    });
    widget.methods.push(method(
        "Counter",
        function(
            "m_create_state",
            "createState",
            DartType::simple("State<Counter>"),
            FunctionBody::Arrow {
                expression: Box::new(create("e_state", "_CounterState", Vec::new())),
            },
        ),
    ));

    let mut state = class("c_state", "_CounterState", Some(DartType::simple("State<Counter>")));
    let mut count = field("f_count", "count", DartType::simple("int"));
    count.initializer = Some(expr(
        "e_zero",
        DartType::simple("int"),
        ExpressionKind::IntLiteral { value: 0 },
    ));
    state.fields.push(count);

    let super_init = expr(
        "e_super_init",
        DartType::Void,
        ExpressionKind::MethodCall {
            target: Some(Box::new(expr("e_super", DartType::Dynamic, ExpressionKind::Super))),
            method_name: "initState".to_string(),
            arguments: Vec::new(),
            named_arguments: Vec::new(),
            type_arguments: Vec::new(),
            null_aware: false,
            resolved_id: None,
        },
    );
    let mut init_state = method(
        "_CounterState",
        function(
            "m_init",
            "initState",
            DartType::Void,
            block(vec![stmt(
                "s_super_init",
                StatementKind::Expression {
                    expression: super_init,
                },
            )]),
        ),
    );
    init_state.overridden_signature = Some("void initState()".to_string());
    state.methods.push(init_state);

    let bump = expr(
        "e_bump",
        DartType::simple("int"),
        ExpressionKind::CompoundAssignment {
            target: Box::new(ident("e_count_target", "count", Some("f_count"))),
            operator: BinaryOperator::Add,
            value: Box::new(expr(
                "e_one",
                DartType::simple("int"),
                ExpressionKind::IntLiteral { value: 1 },
            )),
        },
    );
    let set_state = expr(
        "e_set_state",
        DartType::Void,
        ExpressionKind::MethodCall {
            target: None,
            method_name: "setState".to_string(),
            arguments: vec![expr(
                "e_lambda",
                DartType::simple("Function"),
                ExpressionKind::Lambda {
                    parameters: Vec::new(),
                    body: block(vec![stmt("s_bump", StatementKind::Expression { expression: bump })]),
                    is_async: false,
                },
            )],
            named_arguments: Vec::new(),
            type_arguments: Vec::new(),
            null_aware: false,
            resolved_id: None,
        },
    );
    state.methods.push(method(
        "_CounterState",
        function(
            "m_inc",
            "_increment",
            DartType::Void,
            block(vec![stmt(
                "s_set_state",
                StatementKind::Expression {
                    expression: set_state,
                },
            )]),
        ),
    ));

    let label = expr(
        "e_label",
        DartType::simple("String"),
        ExpressionKind::StringInterpolation {
            parts: vec![
                InterpolationPart::Text {
                    value: "Count: ".to_string(),
                },
                InterpolationPart::Expression {
                    expression: ident("e_count_read", "count", Some("f_count")),
                },
            ],
        },
    );
    let text = expr(
        "e_text",
        DartType::simple("Text"),
        ExpressionKind::InstanceCreation {
            constructed_type: DartType::simple("Text"),
            constructor_name: None,
            arguments: vec![label],
            named_arguments: Vec::new(),
            is_const: false,
        },
    );
    let button = create(
        "e_button",
        "ElevatedButton",
        vec![named("onPressed", ident("e_tear_off", "_increment", Some("m_inc")))],
    );
    let children = expr(
        "e_children",
        DartType::simple("List<Widget>"),
        ExpressionKind::ListLiteral {
            element_type: DartType::simple("Widget"),
            elements: vec![text, button],
            is_const: false,
        },
    );
    let column = create("e_column", "Column", vec![named("children", children)]);

    let mut build = function(
        "m_build",
        "build",
        DartType::simple("Widget"),
        block(vec![stmt("s_return", StatementKind::Return { value: Some(column) })]),
    );
    build.parameters.push(param(
        "p_context",
        "context",
        DartType::simple("BuildContext"),
        ParameterKind::Positional,
    ));
    build.components = Some(vec![FlutterComponent::Widget(WidgetComponent {
        widget_name: "Column".to_string(),
        constructor_name: None,
        is_const: false,
        properties: vec![ComponentProperty {
            name: "children".to_string(),
            value: PropertyValue::Components {
                components: vec![
                    FlutterComponent::Widget(WidgetComponent {
                        widget_name: "Text".to_string(),
                        constructor_name: None,
                        is_const: false,
                        properties: vec![ComponentProperty {
                            name: "data".to_string(),
                            value: PropertyValue::Expression {
                                source: "'Count: $count'".to_string(),
                            },
                        }],
                    }),
                    FlutterComponent::Unsupported {
                        source: "ElevatedButton(onPressed: _increment)".to_string(),
                        reason: "callback property".to_string(),
                    },
                ],
            },
        }],
    })]);
    state.methods.push(method("_CounterState", build));

    let mut file = DartFile::new(COUNTER_PATH, "c0ffee");
    file.library_name = Some("counter".to_string());
    file.analyzed_at_ms = 1_700_000_000_000;
    file.classes.push(widget);
    file.classes.push(state);
    file
}
