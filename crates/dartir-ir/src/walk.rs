//! Non-recursive tree traversal
//!
//! Traversal uses an explicit work stack so arbitrarily deep input trees
//! cannot exhaust the native stack. Passes that must recurse (the encoders)
//! run only after [`max_nesting_depth`] has bounded the input.

use crate::component::{FlutterComponent, PropertyValue};
use crate::decl::{Annotation, ClassDecl, FunctionBody, FunctionDecl, ParameterDecl};
use crate::expr::{Expression, ExpressionKind, InterpolationPart, NamedArgument};
use crate::file::DartFile;
use crate::stmt::{Statement, StatementKind};

/// Borrowed reference to a nestable tree node
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    /// Expression node
    Expression(&'a Expression),
    /// Statement node
    Statement(&'a Statement),
    /// Extracted widget component
    Component(&'a FlutterComponent),
}

impl<'a> NodeRef<'a> {
    /// Direct children of this node, in source order
    pub fn children(&self) -> Vec<NodeRef<'a>> {
        let mut out = Vec::new();
        match *self {
            NodeRef::Expression(expr) => expression_children(expr, &mut out),
            NodeRef::Statement(stmt) => statement_children(stmt, &mut out),
            NodeRef::Component(component) => component_children(component, &mut out),
        }
        out
    }
}

/// Visit every node reachable from `roots`, depth-first in source order.
///
/// The callback receives each node and its depth (roots are at depth 1).
pub fn walk<'a>(roots: Vec<NodeRef<'a>>, mut visit: impl FnMut(NodeRef<'a>, usize)) {
    let mut stack: Vec<(NodeRef<'a>, usize)> = roots.into_iter().rev().map(|n| (n, 1)).collect();
    while let Some((node, depth)) = stack.pop() {
        visit(node, depth);
        let children = node.children();
        stack.extend(children.into_iter().rev().map(|c| (c, depth + 1)));
    }
}

/// Deepest expression/statement/component nesting in the file
pub fn max_nesting_depth(file: &DartFile) -> usize {
    let mut max = 0;
    walk(file_roots(file), |_, depth| max = max.max(depth));
    max
}

/// Outermost nestable nodes of a file
pub fn file_roots(file: &DartFile) -> Vec<NodeRef<'_>> {
    let mut out = Vec::new();
    for variable in &file.variables {
        if let Some(init) = &variable.initializer {
            out.push(NodeRef::Expression(init));
        }
    }
    for function in &file.functions {
        push_function(function, &mut out);
    }
    for class in &file.classes {
        push_class(class, &mut out);
    }
    out
}

/// Outermost nestable nodes of a function: parameter defaults, annotations,
/// body and extracted components
pub fn function_roots(function: &FunctionDecl) -> Vec<NodeRef<'_>> {
    let mut out = Vec::new();
    push_function(function, &mut out);
    out
}

fn push_class<'a>(class: &'a ClassDecl, out: &mut Vec<NodeRef<'a>>) {
    push_annotations(&class.annotations, out);
    for field in &class.fields {
        push_annotations(&field.annotations, out);
        if let Some(init) = &field.initializer {
            out.push(NodeRef::Expression(init));
        }
    }
    for ctor in &class.constructors {
        push_function(&ctor.function, out);
        for init in &ctor.initializers {
            out.push(NodeRef::Expression(&init.value));
        }
        for call in ctor.super_call.iter().chain(ctor.redirect.iter()) {
            push_arguments(&call.arguments, &call.named_arguments, out);
        }
    }
    for method in &class.methods {
        push_function(&method.function, out);
    }
}

fn push_function<'a>(function: &'a FunctionDecl, out: &mut Vec<NodeRef<'a>>) {
    push_annotations(&function.annotations, out);
    push_parameters(&function.parameters, out);
    push_body(&function.body, out);
    if let Some(components) = &function.components {
        out.extend(components.iter().map(NodeRef::Component));
    }
}

fn push_parameters<'a>(parameters: &'a [ParameterDecl], out: &mut Vec<NodeRef<'a>>) {
    for param in parameters {
        push_annotations(&param.annotations, out);
        if let Some(default) = &param.default_value {
            out.push(NodeRef::Expression(default));
        }
    }
}

fn push_annotations<'a>(annotations: &'a [Annotation], out: &mut Vec<NodeRef<'a>>) {
    for annotation in annotations {
        push_arguments(&annotation.arguments, &annotation.named_arguments, out);
    }
}

fn push_body<'a>(body: &'a FunctionBody, out: &mut Vec<NodeRef<'a>>) {
    match body {
        FunctionBody::Block { statements } => out.extend(statements.iter().map(NodeRef::Statement)),
        FunctionBody::Arrow { expression } => out.push(NodeRef::Expression(expression)),
        FunctionBody::Empty => {}
    }
}

fn push_arguments<'a>(
    arguments: &'a [Expression],
    named: &'a [NamedArgument],
    out: &mut Vec<NodeRef<'a>>,
) {
    out.extend(arguments.iter().map(NodeRef::Expression));
    out.extend(named.iter().map(|arg| NodeRef::Expression(&arg.value)));
}

fn expression_children<'a>(expr: &'a Expression, out: &mut Vec<NodeRef<'a>>) {
    use ExpressionKind as K;
    match &expr.kind {
        K::IntLiteral { .. }
        | K::DoubleLiteral { .. }
        | K::StringLiteral { .. }
        | K::BoolLiteral { .. }
        | K::NullLiteral
        | K::Identifier { .. }
        | K::This
        | K::Super => {}
        K::Binary { left, right, .. } | K::NullCoalescing { left, right } => {
            out.push(NodeRef::Expression(left));
            out.push(NodeRef::Expression(right));
        }
        K::CompoundAssignment { target, value, .. } | K::Assignment { target, value } => {
            out.push(NodeRef::Expression(target));
            out.push(NodeRef::Expression(value));
        }
        K::IndexAccess { target, index, .. } => {
            out.push(NodeRef::Expression(target));
            out.push(NodeRef::Expression(index));
        }
        K::Unary { operand, .. } | K::Await { operand } | K::Throw { operand } => {
            out.push(NodeRef::Expression(operand))
        }
        K::PropertyAccess { target, .. } | K::NullAwareAccess { target, .. } => {
            out.push(NodeRef::Expression(target))
        }
        K::Cascade {
            target, sections, ..
        } => {
            out.push(NodeRef::Expression(target));
            out.extend(sections.iter().map(NodeRef::Expression));
        }
        K::Cast { expression, .. } | K::TypeCheck { expression, .. } => {
            out.push(NodeRef::Expression(expression))
        }
        K::MethodCall {
            target,
            arguments,
            named_arguments,
            ..
        } => {
            if let Some(target) = target {
                out.push(NodeRef::Expression(target));
            }
            push_arguments(arguments, named_arguments, out);
        }
        K::FunctionCall {
            arguments,
            named_arguments,
            ..
        }
        | K::InstanceCreation {
            arguments,
            named_arguments,
            ..
        } => push_arguments(arguments, named_arguments, out),
        K::StringInterpolation { parts } => {
            for part in parts {
                if let InterpolationPart::Expression { expression } = part {
                    out.push(NodeRef::Expression(expression));
                }
            }
        }
        K::Lambda {
            parameters, body, ..
        } => {
            push_parameters(parameters, out);
            push_body(body, out);
        }
        K::Parenthesized { inner } => out.push(NodeRef::Expression(inner)),
        K::ListLiteral { elements, .. } | K::SetLiteral { elements, .. } => {
            out.extend(elements.iter().map(NodeRef::Expression))
        }
        K::MapLiteral { entries, .. } => {
            for entry in entries {
                out.push(NodeRef::Expression(&entry.key));
                out.push(NodeRef::Expression(&entry.value));
            }
        }
        K::Conditional {
            condition,
            then_expression,
            else_expression,
        } => {
            out.push(NodeRef::Expression(condition));
            out.push(NodeRef::Expression(then_expression));
            out.push(NodeRef::Expression(else_expression));
        }
    }
}

fn statement_children<'a>(stmt: &'a Statement, out: &mut Vec<NodeRef<'a>>) {
    use StatementKind as S;
    match &stmt.kind {
        S::Expression { expression } => out.push(NodeRef::Expression(expression)),
        S::VariableDeclaration { variables } => {
            for variable in variables {
                if let Some(init) = &variable.initializer {
                    out.push(NodeRef::Expression(init));
                }
            }
        }
        S::Return { value } => out.extend(value.iter().map(NodeRef::Expression)),
        S::Break { .. } | S::Continue { .. } | S::Empty => {}
        S::Throw { exception } => out.push(NodeRef::Expression(exception)),
        S::Assert { condition, message } => {
            out.push(NodeRef::Expression(condition));
            out.extend(message.iter().map(NodeRef::Expression));
        }
        S::Block { statements } => out.extend(statements.iter().map(NodeRef::Statement)),
        S::If {
            condition,
            then_branch,
            else_branch,
        } => {
            out.push(NodeRef::Expression(condition));
            out.push(NodeRef::Statement(then_branch));
            out.extend(else_branch.iter().map(|s| NodeRef::Statement(s)));
        }
        S::For {
            initializer,
            condition,
            updaters,
            body,
        } => {
            out.extend(initializer.iter().map(|s| NodeRef::Statement(s)));
            out.extend(condition.iter().map(NodeRef::Expression));
            out.extend(updaters.iter().map(NodeRef::Expression));
            out.push(NodeRef::Statement(body));
        }
        S::ForEach { iterable, body, .. } => {
            out.push(NodeRef::Expression(iterable));
            out.push(NodeRef::Statement(body));
        }
        S::While { condition, body } => {
            out.push(NodeRef::Expression(condition));
            out.push(NodeRef::Statement(body));
        }
        S::DoWhile { body, condition } => {
            out.push(NodeRef::Statement(body));
            out.push(NodeRef::Expression(condition));
        }
        S::Switch { subject, cases } => {
            out.push(NodeRef::Expression(subject));
            for case in cases {
                out.extend(case.pattern.iter().map(NodeRef::Expression));
                out.extend(case.guard.iter().map(NodeRef::Expression));
                out.extend(case.statements.iter().map(NodeRef::Statement));
            }
        }
        S::Try {
            body,
            catch_clauses,
            finally_block,
        } => {
            out.extend(body.iter().map(NodeRef::Statement));
            for clause in catch_clauses {
                out.extend(clause.body.iter().map(NodeRef::Statement));
            }
            if let Some(finally) = finally_block {
                out.extend(finally.iter().map(NodeRef::Statement));
            }
        }
        S::Labeled { statement, .. } => out.push(NodeRef::Statement(statement)),
        S::Yield { value, .. } => out.push(NodeRef::Expression(value)),
        S::FunctionDeclaration { function } => push_function(function, out),
    }
}

fn component_children<'a>(component: &'a FlutterComponent, out: &mut Vec<NodeRef<'a>>) {
    match component {
        FlutterComponent::Widget(widget) => {
            for property in &widget.properties {
                match &property.value {
                    PropertyValue::Literal { .. } | PropertyValue::Expression { .. } => {}
                    PropertyValue::Component { component } => out.push(NodeRef::Component(component)),
                    PropertyValue::Components { components } => {
                        out.extend(components.iter().map(NodeRef::Component))
                    }
                }
            }
        }
        FlutterComponent::Conditional {
            then_component,
            else_component,
            ..
        } => {
            out.push(NodeRef::Component(then_component));
            out.extend(else_component.iter().map(|c| NodeRef::Component(c)));
        }
        FlutterComponent::Loop { body, .. } | FlutterComponent::Builder { body, .. } => {
            out.push(NodeRef::Component(body))
        }
        FlutterComponent::Unsupported { .. } => {}
    }
}
