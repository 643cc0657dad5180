//! Expression writer
//!
//! Record layout: tag, id, result type, payload, location.

use super::NodeWriter;
use crate::error::EncodeError;
use crate::format::{ExprTag, PartTag};
use crate::strings::StringInterner;
use crate::writer::ByteSink;
use dartir_ir::{Expression, ExpressionKind, InterpolationPart, NamedArgument};

impl<W: ByteSink, S: StringInterner> NodeWriter<'_, W, S> {
    /// Write an expression and, recursively, its sub-expressions
    pub fn write_expression(&mut self, expr: &Expression) -> Result<(), EncodeError> {
        self.out.emit_u8(expr_tag(&expr.kind).to_u8());
        self.str_ref(&expr.id)?;
        self.write_type(&expr.result_type)?;
        self.write_expression_payload(&expr.kind)?;
        self.location(&expr.location)
    }

    fn write_expression_payload(&mut self, kind: &ExpressionKind) -> Result<(), EncodeError> {
        use ExpressionKind as K;
        match kind {
            K::IntLiteral { value } => self.out.emit_i64(*value),
            K::DoubleLiteral { value } => self.out.emit_f64(*value),
            K::StringLiteral { value } => self.text(value)?,
            K::BoolLiteral { value } => self.flag(*value),
            K::NullLiteral | K::This | K::Super => {}
            K::Identifier { name, resolved_id } => {
                self.text(name)?;
                self.opt_text(resolved_id.as_deref())?;
            }
            K::Binary {
                left,
                operator,
                right,
            } => {
                self.write_expression(left)?;
                self.out.emit_u8(operator.to_u8());
                self.write_expression(right)?;
            }
            K::Unary { operator, operand } => {
                self.out.emit_u8(operator.to_u8());
                self.write_expression(operand)?;
            }
            K::CompoundAssignment {
                target,
                operator,
                value,
            } => {
                self.write_expression(target)?;
                self.out.emit_u8(operator.to_u8());
                self.write_expression(value)?;
            }
            K::Assignment { target, value } => {
                self.write_expression(target)?;
                self.write_expression(value)?;
            }
            K::IndexAccess {
                target,
                index,
                null_aware,
            } => {
                self.write_expression(target)?;
                self.write_expression(index)?;
                self.flag(*null_aware);
            }
            K::PropertyAccess {
                target,
                property,
                resolved_id,
            } => {
                self.write_expression(target)?;
                self.text(property)?;
                self.opt_text(resolved_id.as_deref())?;
            }
            K::NullAwareAccess { target, property } => {
                self.write_expression(target)?;
                self.text(property)?;
            }
            K::NullCoalescing { left, right } => {
                self.write_expression(left)?;
                self.write_expression(right)?;
            }
            K::Cascade {
                target,
                sections,
                null_aware,
            } => {
                self.write_expression(target)?;
                self.write_expressions(sections, "cascade sections")?;
                self.flag(*null_aware);
            }
            K::Cast {
                expression,
                target_type,
            } => {
                self.write_expression(expression)?;
                self.write_type(target_type)?;
            }
            K::TypeCheck {
                expression,
                tested_type,
                negated,
            } => {
                self.write_expression(expression)?;
                self.write_type(tested_type)?;
                self.flag(*negated);
            }
            K::Await { operand } | K::Throw { operand } => self.write_expression(operand)?,
            K::MethodCall {
                target,
                method_name,
                arguments,
                named_arguments,
                type_arguments,
                null_aware,
                resolved_id,
            } => {
                self.optional(target.as_deref(), Self::write_expression)?;
                self.text(method_name)?;
                self.write_arguments(arguments, named_arguments)?;
                self.write_types(type_arguments, "type arguments")?;
                self.flag(*null_aware);
                self.opt_text(resolved_id.as_deref())?;
            }
            K::FunctionCall {
                function_name,
                arguments,
                named_arguments,
                type_arguments,
                resolved_id,
            } => {
                self.text(function_name)?;
                self.write_arguments(arguments, named_arguments)?;
                self.write_types(type_arguments, "type arguments")?;
                self.opt_text(resolved_id.as_deref())?;
            }
            K::StringInterpolation { parts } => {
                self.list(parts, "interpolation parts", |w, part| match part {
                    InterpolationPart::Text { value } => {
                        w.out.emit_u8(PartTag::Text.to_u8());
                        w.text(value)
                    }
                    InterpolationPart::Expression { expression } => {
                        w.out.emit_u8(PartTag::Expression.to_u8());
                        w.write_expression(expression)
                    }
                })?;
            }
            K::InstanceCreation {
                constructed_type,
                constructor_name,
                arguments,
                named_arguments,
                is_const,
            } => {
                self.write_type(constructed_type)?;
                self.opt_text(constructor_name.as_deref())?;
                self.write_arguments(arguments, named_arguments)?;
                self.flag(*is_const);
            }
            K::Lambda {
                parameters,
                body,
                is_async,
            } => {
                self.list(parameters, "lambda parameters", Self::write_parameter)?;
                self.write_body(body)?;
                self.flag(*is_async);
            }
            K::Parenthesized { inner } => self.write_expression(inner)?,
            K::ListLiteral {
                element_type,
                elements,
                is_const,
            }
            | K::SetLiteral {
                element_type,
                elements,
                is_const,
            } => {
                self.write_type(element_type)?;
                self.write_expressions(elements, "collection elements")?;
                self.flag(*is_const);
            }
            K::MapLiteral {
                key_type,
                value_type,
                entries,
                is_const,
            } => {
                self.write_type(key_type)?;
                self.write_type(value_type)?;
                self.list(entries, "map entries", |w, entry| {
                    w.write_expression(&entry.key)?;
                    w.write_expression(&entry.value)
                })?;
                self.flag(*is_const);
            }
            K::Conditional {
                condition,
                then_expression,
                else_expression,
            } => {
                self.write_expression(condition)?;
                self.write_expression(then_expression)?;
                self.write_expression(else_expression)?;
            }
        }
        Ok(())
    }

    pub(super) fn write_expressions(
        &mut self,
        exprs: &[Expression],
        context: &'static str,
    ) -> Result<(), EncodeError> {
        self.list(exprs, context, Self::write_expression)
    }

    /// Positional arguments, then `(name, value)` pairs
    pub(super) fn write_arguments(
        &mut self,
        arguments: &[Expression],
        named: &[NamedArgument],
    ) -> Result<(), EncodeError> {
        self.write_expressions(arguments, "arguments")?;
        self.list(named, "named arguments", |w, arg| {
            w.text(&arg.name)?;
            w.write_expression(&arg.value)
        })
    }
}

fn expr_tag(kind: &ExpressionKind) -> ExprTag {
    use ExpressionKind as K;
    match kind {
        K::IntLiteral { .. } => ExprTag::IntLiteral,
        K::DoubleLiteral { .. } => ExprTag::DoubleLiteral,
        K::StringLiteral { .. } => ExprTag::StringLiteral,
        K::BoolLiteral { .. } => ExprTag::BoolLiteral,
        K::NullLiteral => ExprTag::NullLiteral,
        K::Identifier { .. } => ExprTag::Identifier,
        K::Binary { .. } => ExprTag::Binary,
        K::Unary { .. } => ExprTag::Unary,
        K::CompoundAssignment { .. } => ExprTag::CompoundAssignment,
        K::Assignment { .. } => ExprTag::Assignment,
        K::IndexAccess { .. } => ExprTag::IndexAccess,
        K::PropertyAccess { .. } => ExprTag::PropertyAccess,
        K::NullAwareAccess { .. } => ExprTag::NullAwareAccess,
        K::NullCoalescing { .. } => ExprTag::NullCoalescing,
        K::Cascade { .. } => ExprTag::Cascade,
        K::Cast { .. } => ExprTag::Cast,
        K::TypeCheck { .. } => ExprTag::TypeCheck,
        K::Await { .. } => ExprTag::Await,
        K::Throw { .. } => ExprTag::Throw,
        K::MethodCall { .. } => ExprTag::MethodCall,
        K::FunctionCall { .. } => ExprTag::FunctionCall,
        K::StringInterpolation { .. } => ExprTag::StringInterpolation,
        K::InstanceCreation { .. } => ExprTag::InstanceCreation,
        K::Lambda { .. } => ExprTag::Lambda,
        K::This => ExprTag::This,
        K::Super => ExprTag::Super,
        K::Parenthesized { .. } => ExprTag::Parenthesized,
        K::ListLiteral { .. } => ExprTag::ListLiteral,
        K::MapLiteral { .. } => ExprTag::MapLiteral,
        K::SetLiteral { .. } => ExprTag::SetLiteral,
        K::Conditional { .. } => ExprTag::Conditional,
    }
}
