//! Statement writer
//!
//! Record layout: tag, id, payload, location.

use super::NodeWriter;
use crate::error::EncodeError;
use crate::format::StmtTag;
use crate::strings::StringInterner;
use crate::writer::ByteSink;
use dartir_ir::{CatchClause, Statement, StatementKind, SwitchCase};

impl<W: ByteSink, S: StringInterner> NodeWriter<'_, W, S> {
    /// Write a statement and, recursively, its children
    pub fn write_statement(&mut self, stmt: &Statement) -> Result<(), EncodeError> {
        self.out.emit_u8(stmt_tag(&stmt.kind).to_u8());
        self.str_ref(&stmt.id)?;
        self.write_statement_payload(&stmt.kind)?;
        self.location(&stmt.location)
    }

    fn write_statement_payload(&mut self, kind: &StatementKind) -> Result<(), EncodeError> {
        use StatementKind as K;
        match kind {
            K::Expression { expression } => self.write_expression(expression),
            K::VariableDeclaration { variables } => {
                self.list(variables, "variables", Self::write_variable)
            }
            K::Return { value } => self.optional(value.as_ref(), Self::write_expression),
            K::Break { label } | K::Continue { label } => self.opt_text(label.as_deref()),
            K::Throw { exception } => self.write_expression(exception),
            K::Assert { condition, message } => {
                self.write_expression(condition)?;
                self.optional(message.as_ref(), Self::write_expression)
            }
            K::Empty => Ok(()),
            K::Block { statements } => self.write_statements(statements),
            K::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.write_expression(condition)?;
                self.write_statement(then_branch)?;
                self.optional(else_branch.as_deref(), Self::write_statement)
            }
            K::For {
                initializer,
                condition,
                updaters,
                body,
            } => {
                self.optional(initializer.as_deref(), Self::write_statement)?;
                self.optional(condition.as_ref(), Self::write_expression)?;
                self.write_expressions(updaters, "for updaters")?;
                self.write_statement(body)
            }
            K::ForEach {
                variable_name,
                variable_type,
                iterable,
                body,
                is_await,
            } => {
                self.text(variable_name)?;
                self.write_type(variable_type)?;
                self.write_expression(iterable)?;
                self.write_statement(body)?;
                self.flag(*is_await);
                Ok(())
            }
            K::While { condition, body } => {
                self.write_expression(condition)?;
                self.write_statement(body)
            }
            K::DoWhile { body, condition } => {
                self.write_statement(body)?;
                self.write_expression(condition)
            }
            K::Switch { subject, cases } => {
                self.write_expression(subject)?;
                self.list(cases, "switch cases", Self::write_switch_case)
            }
            K::Try {
                body,
                catch_clauses,
                finally_block,
            } => {
                self.write_statements(body)?;
                self.list(catch_clauses, "catch clauses", Self::write_catch_clause)?;
                self.optional(finally_block.as_deref(), Self::write_statements)
            }
            K::Labeled { label, statement } => {
                self.text(label)?;
                self.write_statement(statement)
            }
            K::Yield { value, is_star } => {
                self.write_expression(value)?;
                self.flag(*is_star);
                Ok(())
            }
            K::FunctionDeclaration { function } => self.write_function(function),
        }
    }

    pub(super) fn write_statements(&mut self, statements: &[Statement]) -> Result<(), EncodeError> {
        self.list(statements, "statements", Self::write_statement)
    }

    fn write_switch_case(&mut self, case: &SwitchCase) -> Result<(), EncodeError> {
        self.str_ref(&case.id)?;
        self.optional(case.pattern.as_ref(), Self::write_expression)?;
        self.optional(case.guard.as_ref(), Self::write_expression)?;
        self.write_statements(&case.statements)?;
        self.location(&case.location)
    }

    fn write_catch_clause(&mut self, clause: &CatchClause) -> Result<(), EncodeError> {
        self.str_ref(&clause.id)?;
        self.optional(clause.exception_type.as_ref(), Self::write_type)?;
        self.opt_text(clause.exception_parameter.as_deref())?;
        self.opt_text(clause.stack_trace_parameter.as_deref())?;
        self.write_statements(&clause.body)?;
        self.location(&clause.location)
    }
}

fn stmt_tag(kind: &StatementKind) -> StmtTag {
    use StatementKind as K;
    match kind {
        K::Expression { .. } => StmtTag::Expression,
        K::VariableDeclaration { .. } => StmtTag::VariableDeclaration,
        K::Return { .. } => StmtTag::Return,
        K::Break { .. } => StmtTag::Break,
        K::Continue { .. } => StmtTag::Continue,
        K::Throw { .. } => StmtTag::Throw,
        K::Assert { .. } => StmtTag::Assert,
        K::Empty => StmtTag::Empty,
        K::Block { .. } => StmtTag::Block,
        K::If { .. } => StmtTag::If,
        K::For { .. } => StmtTag::For,
        K::ForEach { .. } => StmtTag::ForEach,
        K::While { .. } => StmtTag::While,
        K::DoWhile { .. } => StmtTag::DoWhile,
        K::Switch { .. } => StmtTag::Switch,
        K::Try { .. } => StmtTag::Try,
        K::Labeled { .. } => StmtTag::Labeled,
        K::Yield { .. } => StmtTag::Yield,
        K::FunctionDeclaration { .. } => StmtTag::FunctionDeclaration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EncoderLimits;
    use crate::strings::StringCollector;
    use crate::writer::BinaryWriter;
    use dartir_ir::SourceLocation;

    #[test]
    fn test_break_without_label() {
        let limits = EncoderLimits::default();
        let mut collector = StringCollector::new();
        let mut out = BinaryWriter::new();
        let stmt = Statement::new("s1", SourceLocation::default(), StatementKind::Break { label: None });
        NodeWriter::new(&mut out, &mut collector, &limits)
            .write_statement(&stmt)
            .unwrap();

        let mut expected = vec![StmtTag::Break.to_u8(), 0, 0, 0, 0, 0];
        expected.extend_from_slice(&[0u8; 20]);
        assert_eq!(out.buffer(), expected.as_slice());
    }

    #[test]
    fn test_default_case_has_no_pattern() {
        let limits = EncoderLimits::default();
        let mut collector = StringCollector::new();
        let mut out = BinaryWriter::new();
        let stmt = Statement::new(
            "s1",
            SourceLocation::default(),
            StatementKind::Switch {
                subject: dartir_ir::Expression::new(
                    "e1",
                    SourceLocation::default(),
                    dartir_ir::DartType::Dynamic,
                    dartir_ir::ExpressionKind::NullLiteral,
                ),
                cases: vec![SwitchCase {
                    id: "c1".to_string(),
                    location: SourceLocation::default(),
                    pattern: None,
                    guard: None,
                    statements: Vec::new(),
                }],
            },
        );
        NodeWriter::new(&mut out, &mut collector, &limits)
            .write_statement(&stmt)
            .unwrap();
        // tag + id, then subject: tag + id + dynamic + location
        let case_start = 5 + (1 + 4 + 1 + 20) + 4;
        let bytes = out.buffer();
        assert_eq!(&bytes[case_start + 4..case_start + 6], &[0, 0]);
        assert_eq!(collector.len(), 3);
    }
}
