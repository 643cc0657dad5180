//! Registry build pass: indexing and edge inference

use super::pairing::StatePairing;
use super::{LifecycleMethod, RelationshipRegistry};
use dartir_ir::walk::{self, NodeRef};
use dartir_ir::{
    ClassDecl, ConstructorDecl, DartFile, Expression, ExpressionKind, FunctionBody, FunctionDecl,
    StatementKind,
};

/// Edge found in a callable body
enum Edge<'a> {
    Call(&'a str),
    Field(&'a str),
}

impl RelationshipRegistry {
    /// Index the declarations of `file` and infer every relationship.
    ///
    /// Inferred edges only point at declarations of this file: a
    /// `resolved_id` naming something elsewhere (an SDK method, a local
    /// variable) produces no edge. Edges added later through
    /// [`record_method_call`](Self::record_method_call) are not filtered
    /// and are checked by [`validate`](Self::validate).
    pub fn build(file: &DartFile, pairing: &dyn StatePairing) -> Self {
        let mut registry = Self::default();
        registry.index_declarations(file);
        registry.infer_build_outputs(file);
        registry.pair_widgets(file, pairing);
        registry.infer_edges(file);
        registry
    }

    fn index_declarations(&mut self, file: &DartFile) {
        for function in &file.functions {
            self.callable_ids.insert(function.id.clone());
        }
        for variable in &file.variables {
            self.field_ids.insert(variable.id.clone());
        }
        for class in &file.classes {
            self.class_ids.insert(class.id.clone());
            for method in &class.methods {
                self.method_to_class
                    .insert(method.id().to_string(), class.id.clone());
                self.callable_ids.insert(method.id().to_string());
            }
            for ctor in &class.constructors {
                self.method_to_class
                    .insert(ctor.id().to_string(), class.id.clone());
                self.callable_ids.insert(ctor.id().to_string());
            }
            for field in &class.fields {
                self.field_to_class
                    .insert(field.id.clone(), class.id.clone());
                self.field_ids.insert(field.id.clone());
            }

            if let Some(superclass) = &class.superclass {
                let name = superclass.display_name();
                if !name.is_empty() {
                    self.section
                        .class_hierarchy
                        .insert(class.id.clone(), name);
                }
            }
            for interface in &class.interfaces {
                let name = interface.display_name();
                if !name.is_empty() {
                    self.section
                        .interface_implementers
                        .entry(name)
                        .or_default()
                        .insert(class.id.clone());
                }
            }
        }
    }

    fn infer_build_outputs(&mut self, file: &DartFile) {
        for class in &file.classes {
            let Some(build) = class.find_method("build") else {
                continue;
            };
            if let Some(widget) = build_output(&build.function) {
                self.section
                    .build_outputs
                    .insert(class.id.clone(), widget);
            }
        }
    }

    fn pair_widgets(&mut self, file: &DartFile, pairing: &dyn StatePairing) {
        for widget in &file.classes {
            if !pairing.is_stateful_widget(widget) {
                continue;
            }
            let Some(state) = pairing.resolve_state(widget, &file.classes) else {
                continue;
            };
            self.section
                .widget_to_state
                .insert(widget.id.clone(), state.id.clone());
            self.register_lifecycle(state);
        }
    }

    fn register_lifecycle(&mut self, state: &ClassDecl) {
        for method in &state.methods {
            if let Some(hook) = LifecycleMethod::from_method_name(method.name()) {
                self.section
                    .lifecycle
                    .entry(state.id.clone())
                    .or_default()
                    .entry(hook)
                    .or_insert_with(|| method.id().to_string());
            } else if method.name() == "build" {
                self.section
                    .build_methods
                    .entry(state.id.clone())
                    .or_insert_with(|| method.id().to_string());
            }
        }
    }

    fn infer_edges(&mut self, file: &DartFile) {
        for class in &file.classes {
            for method in &class.methods {
                let roots = walk::function_roots(&method.function);
                self.collect_edges(method.id(), Some(class), file, roots);
            }
            for ctor in &class.constructors {
                for init in &ctor.initializers {
                    if let Some(field) = class.find_field(&init.field_name) {
                        self.record_field_access(ctor.id(), field.id.clone());
                    }
                }
                self.collect_edges(ctor.id(), Some(class), file, constructor_roots(ctor));
            }
        }
        for function in &file.functions {
            let roots = walk::function_roots(function);
            self.collect_edges(&function.id, None, file, roots);
        }
    }

    fn collect_edges(
        &mut self,
        caller: &str,
        class: Option<&ClassDecl>,
        file: &DartFile,
        roots: Vec<NodeRef<'_>>,
    ) {
        let mut calls = Vec::new();
        let mut fields = Vec::new();
        walk::walk(roots, |node, _| {
            if let NodeRef::Expression(expr) = node {
                match self.edge_for(expr, class, file) {
                    Some(Edge::Call(id)) => calls.push(id.to_string()),
                    Some(Edge::Field(id)) => fields.push(id.to_string()),
                    None => {}
                }
            }
        });
        for callee in calls {
            self.record_method_call(caller, callee);
        }
        for field in fields {
            self.record_field_access(caller, field);
        }
    }

    fn edge_for<'a>(
        &self,
        expr: &'a Expression,
        class: Option<&'a ClassDecl>,
        file: &'a DartFile,
    ) -> Option<Edge<'a>> {
        match &expr.kind {
            ExpressionKind::MethodCall {
                target,
                method_name,
                resolved_id,
                ..
            } => match resolved_id {
                Some(id) => self.is_callable(id).then_some(Edge::Call(id.as_str())),
                None if target.as_deref().map_or(true, Expression::is_this) => class?
                    .find_method(method_name)
                    .map(|m| Edge::Call(m.id())),
                None => None,
            },
            ExpressionKind::FunctionCall {
                function_name,
                resolved_id,
                ..
            } => match resolved_id {
                Some(id) => self.is_callable(id).then_some(Edge::Call(id.as_str())),
                None => class
                    .and_then(|c| c.find_method(function_name))
                    .map(|m| m.id())
                    .or_else(|| {
                        file.functions
                            .iter()
                            .find(|f| &f.name == function_name)
                            .map(|f| f.id.as_str())
                    })
                    .map(Edge::Call),
            },
            ExpressionKind::PropertyAccess {
                target,
                property,
                resolved_id,
            } => match resolved_id {
                Some(id) => self.resolved_edge(id),
                None if target.is_this() => Self::member_edge(class?, property),
                None => None,
            },
            ExpressionKind::Identifier { name, resolved_id } => match resolved_id {
                Some(id) => self.resolved_edge(id),
                None => Self::member_edge(class?, name),
            },
            _ => None,
        }
    }

    fn resolved_edge<'a>(&self, id: &'a str) -> Option<Edge<'a>> {
        if self.is_field(id) {
            Some(Edge::Field(id))
        } else if self.is_callable(id) {
            Some(Edge::Call(id))
        } else {
            None
        }
    }

    /// Unresolved bare name or `this.name`: a field, else a method tear-off or getter
    fn member_edge<'a>(class: &'a ClassDecl, name: &str) -> Option<Edge<'a>> {
        class
            .find_field(name)
            .map(|f| Edge::Field(f.id.as_str()))
            .or_else(|| class.find_method(name).map(|m| Edge::Call(m.id())))
    }
}

/// Outermost nodes of a constructor, including its initializer list
fn constructor_roots(ctor: &ConstructorDecl) -> Vec<NodeRef<'_>> {
    let mut roots = walk::function_roots(&ctor.function);
    roots.extend(ctor.initializers.iter().map(|init| NodeRef::Expression(&init.value)));
    for call in ctor.super_call.iter().chain(&ctor.redirect) {
        roots.extend(call.arguments.iter().map(NodeRef::Expression));
        roots.extend(call.named_arguments.iter().map(|arg| NodeRef::Expression(&arg.value)));
    }
    roots
}

/// Widget a `build` method produces.
///
/// Extracted components win; otherwise the first top-level `return` (or
/// arrow body) that creates an instance directly or in the then-branch of a
/// conditional.
fn build_output(build: &FunctionDecl) -> Option<String> {
    if let Some(components) = &build.components {
        if let Some(name) = components.iter().find_map(|c| c.first_widget_name()) {
            if !name.is_empty() {
                return Some(name.to_string());
            }
        }
    }
    match &build.body {
        FunctionBody::Arrow { expression } => created_widget(expression),
        FunctionBody::Block { statements } => statements.iter().find_map(|stmt| match &stmt.kind {
            StatementKind::Return { value: Some(value) } => created_widget(value),
            _ => None,
        }),
        FunctionBody::Empty => None,
    }
}

fn created_widget(expr: &Expression) -> Option<String> {
    let created = match &expr.kind {
        ExpressionKind::Conditional {
            then_expression, ..
        } => then_expression.as_ref(),
        _ => expr,
    };
    match &created.kind {
        ExpressionKind::InstanceCreation {
            constructed_type, ..
        } => Some(constructed_type.display_name()).filter(|name| !name.is_empty()),
        _ => None,
    }
}
