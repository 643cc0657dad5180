//! Node reader: primitives, types, expressions, statements and components

use crate::config::EncoderLimits;
use crate::error::DecodeError;
use crate::format::{ComponentTag, ExprTag, PartTag, PropertyTag, StmtTag, TypeTag};
use crate::reader::BinaryReader;
use dartir_ir::{
    BinaryOperator, CatchClause, ComponentProperty, DartType, Expression, ExpressionKind,
    FlutterComponent, InterpolationPart, MapEntry, Metadata, NamedArgument, PropertyValue,
    SourceLocation, Statement, StatementKind, SwitchCase, UnaryOperator, WidgetComponent,
};

/// Reader for everything after the string table
pub(crate) struct NodeReader<'a> {
    reader: BinaryReader<'a>,
    strings: &'a [String],
    limits: &'a EncoderLimits,
    depth: usize,
}

impl<'a> NodeReader<'a> {
    pub(crate) fn new(
        reader: BinaryReader<'a>,
        strings: &'a [String],
        limits: &'a EncoderLimits,
    ) -> Self {
        Self {
            reader,
            strings,
            limits,
            depth: 0,
        }
    }

    pub(crate) fn into_reader(self) -> BinaryReader<'a> {
        self.reader
    }

    // ===== Primitives =====

    pub(super) fn position(&self) -> usize {
        self.reader.position()
    }

    pub(super) fn u8(&mut self) -> Result<u8, DecodeError> {
        self.reader.read_u8()
    }

    pub(super) fn u16(&mut self) -> Result<u16, DecodeError> {
        self.reader.read_u16()
    }

    pub(super) fn u32(&mut self) -> Result<u32, DecodeError> {
        self.reader.read_u32()
    }

    pub(super) fn u64(&mut self) -> Result<u64, DecodeError> {
        self.reader.read_u64()
    }

    pub(super) fn flag(&mut self) -> Result<bool, DecodeError> {
        self.reader.read_bool()
    }

    /// Read a tag byte and map it through `from_u8`
    pub(super) fn tag<T>(
        &mut self,
        kind: &'static str,
        from_u8: impl FnOnce(u8) -> Option<T>,
    ) -> Result<T, DecodeError> {
        let offset = self.reader.position();
        let tag = self.u8()?;
        from_u8(tag).ok_or(DecodeError::InvalidTag { kind, tag, offset })
    }

    pub(super) fn str_ref(&mut self) -> Result<String, DecodeError> {
        let index = self.u32()?;
        self.strings
            .get(index as usize)
            .cloned()
            .ok_or(DecodeError::InvalidStringRef {
                index,
                count: self.strings.len(),
            })
    }

    /// Text written with a presence byte; absent reads as `""`
    pub(super) fn text(&mut self) -> Result<String, DecodeError> {
        Ok(self.opt_text()?.unwrap_or_default())
    }

    pub(super) fn opt_text(&mut self) -> Result<Option<String>, DecodeError> {
        self.optional(Self::str_ref)
    }

    pub(super) fn texts(&mut self) -> Result<Vec<String>, DecodeError> {
        self.list(Self::text)
    }

    pub(super) fn optional<T>(
        &mut self,
        read: impl FnOnce(&mut Self) -> Result<T, DecodeError>,
    ) -> Result<Option<T>, DecodeError> {
        if self.flag()? {
            read(self).map(Some)
        } else {
            Ok(None)
        }
    }

    pub(super) fn list<T>(
        &mut self,
        mut read: impl FnMut(&mut Self) -> Result<T, DecodeError>,
    ) -> Result<Vec<T>, DecodeError> {
        let count = self.u32()? as usize;
        // every element takes at least one byte
        let mut items = Vec::with_capacity(count.min(self.reader.remaining()));
        for _ in 0..count {
            items.push(read(self)?);
        }
        Ok(items)
    }

    pub(super) fn location(&mut self) -> Result<SourceLocation, DecodeError> {
        Ok(SourceLocation {
            file: self.str_ref()?,
            line: self.u32()?,
            column: self.u32()?,
            offset: self.u32()?,
            length: self.u32()?,
        })
    }

    pub(super) fn metadata(&mut self) -> Result<Metadata, DecodeError> {
        let pairs = self.list(|r| Ok((r.text()?, r.text()?)))?;
        Ok(pairs.into_iter().collect())
    }

    /// Step one nesting level deeper; every successful call is paired with `leave`
    fn enter(&mut self) -> Result<(), DecodeError> {
        if self.depth >= self.limits.max_nesting_depth {
            return Err(DecodeError::NestingTooDeep(self.limits.max_nesting_depth));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // ===== Types =====

    pub(super) fn read_type(&mut self) -> Result<DartType, DecodeError> {
        let offset = self.position();
        match self.tag("type", TypeTag::from_u8)? {
            TypeTag::Simple => Ok(DartType::Simple {
                name: self.text()?,
                nullable: self.flag()?,
            }),
            TypeTag::Dynamic => Ok(DartType::Dynamic),
            TypeTag::Void => Ok(DartType::Void),
            TypeTag::Never => Ok(DartType::Never),
            TypeTag::Unknown => Err(reserved("type", TypeTag::Unknown.to_u8(), offset)),
        }
    }

    pub(super) fn read_types(&mut self) -> Result<Vec<DartType>, DecodeError> {
        self.list(Self::read_type)
    }

    // ===== Expressions =====
    //
    // Expressions, statements and components recurse through each other.
    // Dispatch arms hand off to a per-variant reader and carry no `?` of
    // their own, keeping each recursion step's frame small.

    pub(super) fn read_expression(&mut self) -> Result<Expression, DecodeError> {
        self.enter()?;
        let expression = self.read_expression_node();
        self.leave();
        expression
    }

    fn read_expression_node(&mut self) -> Result<Expression, DecodeError> {
        let offset = self.position();
        let tag = self.tag("expression", ExprTag::from_u8)?;
        let id = self.str_ref()?;
        let result_type = self.read_type()?;
        let kind = self.read_expression_kind(tag, offset)?;
        Ok(Expression {
            id,
            location: self.location()?,
            result_type,
            kind,
        })
    }

    fn boxed_expression(&mut self) -> Result<Box<Expression>, DecodeError> {
        self.read_expression().map(Box::new)
    }

    pub(super) fn read_expressions(&mut self) -> Result<Vec<Expression>, DecodeError> {
        self.list(Self::read_expression)
    }

    /// Positional arguments, then `(name, value)` pairs
    pub(super) fn read_arguments(
        &mut self,
    ) -> Result<(Vec<Expression>, Vec<NamedArgument>), DecodeError> {
        let arguments = self.read_expressions()?;
        let named = self.list(|r| {
            Ok(NamedArgument {
                name: r.text()?,
                value: r.read_expression()?,
            })
        })?;
        Ok((arguments, named))
    }

    fn binary_operator(&mut self) -> Result<BinaryOperator, DecodeError> {
        self.tag("binary operator", BinaryOperator::from_u8)
    }

    fn read_expression_kind(
        &mut self,
        tag: ExprTag,
        offset: usize,
    ) -> Result<ExpressionKind, DecodeError> {
        use ExpressionKind as K;
        match tag {
            ExprTag::IntLiteral => self.reader.read_i64().map(|value| K::IntLiteral { value }),
            ExprTag::DoubleLiteral => self.reader.read_f64().map(|value| K::DoubleLiteral { value }),
            ExprTag::StringLiteral => self.text().map(|value| K::StringLiteral { value }),
            ExprTag::BoolLiteral => self.flag().map(|value| K::BoolLiteral { value }),
            ExprTag::NullLiteral => Ok(K::NullLiteral),
            ExprTag::This => Ok(K::This),
            ExprTag::Super => Ok(K::Super),
            ExprTag::Identifier => self.read_identifier(),
            ExprTag::Binary => self.read_binary(),
            ExprTag::Unary => self.read_unary(),
            ExprTag::CompoundAssignment => self.read_compound_assignment(),
            ExprTag::Assignment => self.read_assignment(),
            ExprTag::IndexAccess => self.read_index_access(),
            ExprTag::PropertyAccess => self.read_property_access(),
            ExprTag::NullAwareAccess => self.read_null_aware_access(),
            ExprTag::NullCoalescing => self.read_null_coalescing(),
            ExprTag::Cascade => self.read_cascade(),
            ExprTag::Cast => self.read_cast(),
            ExprTag::TypeCheck => self.read_type_check(),
            ExprTag::Await => self.boxed_expression().map(|operand| K::Await { operand }),
            ExprTag::Throw => self.boxed_expression().map(|operand| K::Throw { operand }),
            ExprTag::MethodCall => self.read_method_call(),
            ExprTag::FunctionCall => self.read_function_call(),
            ExprTag::StringInterpolation => self.read_interpolation(),
            ExprTag::InstanceCreation => self.read_instance_creation(),
            ExprTag::Lambda => self.read_lambda(),
            ExprTag::Parenthesized => self.boxed_expression().map(|inner| K::Parenthesized { inner }),
            ExprTag::ListLiteral => self.read_collection().map(|(element_type, elements, is_const)| {
                K::ListLiteral {
                    element_type,
                    elements,
                    is_const,
                }
            }),
            ExprTag::SetLiteral => self.read_collection().map(|(element_type, elements, is_const)| {
                K::SetLiteral {
                    element_type,
                    elements,
                    is_const,
                }
            }),
            ExprTag::MapLiteral => self.read_map_literal(),
            ExprTag::Conditional => self.read_conditional(),
            ExprTag::Unknown => Err(reserved("expression", tag.to_u8(), offset)),
        }
    }

    fn read_identifier(&mut self) -> Result<ExpressionKind, DecodeError> {
        Ok(ExpressionKind::Identifier {
            name: self.text()?,
            resolved_id: self.opt_text()?,
        })
    }

    fn read_binary(&mut self) -> Result<ExpressionKind, DecodeError> {
        Ok(ExpressionKind::Binary {
            left: self.boxed_expression()?,
            operator: self.binary_operator()?,
            right: self.boxed_expression()?,
        })
    }

    fn read_unary(&mut self) -> Result<ExpressionKind, DecodeError> {
        Ok(ExpressionKind::Unary {
            operator: self.tag("unary operator", UnaryOperator::from_u8)?,
            operand: self.boxed_expression()?,
        })
    }

    fn read_compound_assignment(&mut self) -> Result<ExpressionKind, DecodeError> {
        Ok(ExpressionKind::CompoundAssignment {
            target: self.boxed_expression()?,
            operator: self.binary_operator()?,
            value: self.boxed_expression()?,
        })
    }

    fn read_assignment(&mut self) -> Result<ExpressionKind, DecodeError> {
        Ok(ExpressionKind::Assignment {
            target: self.boxed_expression()?,
            value: self.boxed_expression()?,
        })
    }

    fn read_index_access(&mut self) -> Result<ExpressionKind, DecodeError> {
        Ok(ExpressionKind::IndexAccess {
            target: self.boxed_expression()?,
            index: self.boxed_expression()?,
            null_aware: self.flag()?,
        })
    }

    fn read_property_access(&mut self) -> Result<ExpressionKind, DecodeError> {
        Ok(ExpressionKind::PropertyAccess {
            target: self.boxed_expression()?,
            property: self.text()?,
            resolved_id: self.opt_text()?,
        })
    }

    fn read_null_aware_access(&mut self) -> Result<ExpressionKind, DecodeError> {
        Ok(ExpressionKind::NullAwareAccess {
            target: self.boxed_expression()?,
            property: self.text()?,
        })
    }

    fn read_null_coalescing(&mut self) -> Result<ExpressionKind, DecodeError> {
        Ok(ExpressionKind::NullCoalescing {
            left: self.boxed_expression()?,
            right: self.boxed_expression()?,
        })
    }

    fn read_cascade(&mut self) -> Result<ExpressionKind, DecodeError> {
        Ok(ExpressionKind::Cascade {
            target: self.boxed_expression()?,
            sections: self.read_expressions()?,
            null_aware: self.flag()?,
        })
    }

    fn read_cast(&mut self) -> Result<ExpressionKind, DecodeError> {
        Ok(ExpressionKind::Cast {
            expression: self.boxed_expression()?,
            target_type: self.read_type()?,
        })
    }

    fn read_type_check(&mut self) -> Result<ExpressionKind, DecodeError> {
        Ok(ExpressionKind::TypeCheck {
            expression: self.boxed_expression()?,
            tested_type: self.read_type()?,
            negated: self.flag()?,
        })
    }

    fn read_method_call(&mut self) -> Result<ExpressionKind, DecodeError> {
        let target = self.optional(Self::boxed_expression)?;
        let method_name = self.text()?;
        let (arguments, named_arguments) = self.read_arguments()?;
        Ok(ExpressionKind::MethodCall {
            target,
            method_name,
            arguments,
            named_arguments,
            type_arguments: self.read_types()?,
            null_aware: self.flag()?,
            resolved_id: self.opt_text()?,
        })
    }

    fn read_function_call(&mut self) -> Result<ExpressionKind, DecodeError> {
        let function_name = self.text()?;
        let (arguments, named_arguments) = self.read_arguments()?;
        Ok(ExpressionKind::FunctionCall {
            function_name,
            arguments,
            named_arguments,
            type_arguments: self.read_types()?,
            resolved_id: self.opt_text()?,
        })
    }

    fn read_interpolation(&mut self) -> Result<ExpressionKind, DecodeError> {
        let parts = self.list(|r| {
            let offset = r.position();
            match r.tag("interpolation part", PartTag::from_u8)? {
                PartTag::Text => r.text().map(|value| InterpolationPart::Text { value }),
                PartTag::Expression => r
                    .read_expression()
                    .map(|expression| InterpolationPart::Expression { expression }),
                PartTag::Unknown => Err(reserved(
                    "interpolation part",
                    PartTag::Unknown.to_u8(),
                    offset,
                )),
            }
        })?;
        Ok(ExpressionKind::StringInterpolation { parts })
    }

    fn read_instance_creation(&mut self) -> Result<ExpressionKind, DecodeError> {
        let constructed_type = self.read_type()?;
        let constructor_name = self.opt_text()?;
        let (arguments, named_arguments) = self.read_arguments()?;
        Ok(ExpressionKind::InstanceCreation {
            constructed_type,
            constructor_name,
            arguments,
            named_arguments,
            is_const: self.flag()?,
        })
    }

    fn read_lambda(&mut self) -> Result<ExpressionKind, DecodeError> {
        Ok(ExpressionKind::Lambda {
            parameters: self.list(Self::read_parameter)?,
            body: self.read_body()?,
            is_async: self.flag()?,
        })
    }

    /// List and set literals share a layout
    fn read_collection(&mut self) -> Result<(DartType, Vec<Expression>, bool), DecodeError> {
        Ok((self.read_type()?, self.read_expressions()?, self.flag()?))
    }

    fn read_map_literal(&mut self) -> Result<ExpressionKind, DecodeError> {
        Ok(ExpressionKind::MapLiteral {
            key_type: self.read_type()?,
            value_type: self.read_type()?,
            entries: self.list(|r| {
                Ok(MapEntry {
                    key: r.read_expression()?,
                    value: r.read_expression()?,
                })
            })?,
            is_const: self.flag()?,
        })
    }

    fn read_conditional(&mut self) -> Result<ExpressionKind, DecodeError> {
        Ok(ExpressionKind::Conditional {
            condition: self.boxed_expression()?,
            then_expression: self.boxed_expression()?,
            else_expression: self.boxed_expression()?,
        })
    }

    // ===== Statements =====

    pub(super) fn read_statement(&mut self) -> Result<Statement, DecodeError> {
        self.enter()?;
        let statement = self.read_statement_node();
        self.leave();
        statement
    }

    fn read_statement_node(&mut self) -> Result<Statement, DecodeError> {
        let offset = self.position();
        let tag = self.tag("statement", StmtTag::from_u8)?;
        let id = self.str_ref()?;
        let kind = self.read_statement_kind(tag, offset)?;
        Ok(Statement {
            id,
            location: self.location()?,
            kind,
        })
    }

    fn boxed_statement(&mut self) -> Result<Box<Statement>, DecodeError> {
        self.read_statement().map(Box::new)
    }

    pub(super) fn read_statements(&mut self) -> Result<Vec<Statement>, DecodeError> {
        self.list(Self::read_statement)
    }

    fn read_statement_kind(
        &mut self,
        tag: StmtTag,
        offset: usize,
    ) -> Result<StatementKind, DecodeError> {
        use StatementKind as K;
        match tag {
            StmtTag::Expression => self.read_expression().map(|expression| K::Expression { expression }),
            StmtTag::VariableDeclaration => self
                .list(Self::read_variable)
                .map(|variables| K::VariableDeclaration { variables }),
            StmtTag::Return => self.optional(Self::read_expression).map(|value| K::Return { value }),
            StmtTag::Break => self.opt_text().map(|label| K::Break { label }),
            StmtTag::Continue => self.opt_text().map(|label| K::Continue { label }),
            StmtTag::Throw => self.read_expression().map(|exception| K::Throw { exception }),
            StmtTag::Assert => self.read_assert(),
            StmtTag::Empty => Ok(K::Empty),
            StmtTag::Block => self.read_statements().map(|statements| K::Block { statements }),
            StmtTag::If => self.read_if(),
            StmtTag::For => self.read_for(),
            StmtTag::ForEach => self.read_for_each(),
            StmtTag::While => self.read_while(),
            StmtTag::DoWhile => self.read_do_while(),
            StmtTag::Switch => self.read_switch(),
            StmtTag::Try => self.read_try(),
            StmtTag::Labeled => self.read_labeled(),
            StmtTag::Yield => self.read_yield(),
            StmtTag::FunctionDeclaration => self.read_local_function(),
            StmtTag::Unknown => Err(reserved("statement", tag.to_u8(), offset)),
        }
    }

    fn read_assert(&mut self) -> Result<StatementKind, DecodeError> {
        Ok(StatementKind::Assert {
            condition: self.read_expression()?,
            message: self.optional(Self::read_expression)?,
        })
    }

    fn read_if(&mut self) -> Result<StatementKind, DecodeError> {
        Ok(StatementKind::If {
            condition: self.read_expression()?,
            then_branch: self.boxed_statement()?,
            else_branch: self.optional(Self::boxed_statement)?,
        })
    }

    fn read_for(&mut self) -> Result<StatementKind, DecodeError> {
        Ok(StatementKind::For {
            initializer: self.optional(Self::boxed_statement)?,
            condition: self.optional(Self::read_expression)?,
            updaters: self.read_expressions()?,
            body: self.boxed_statement()?,
        })
    }

    fn read_for_each(&mut self) -> Result<StatementKind, DecodeError> {
        Ok(StatementKind::ForEach {
            variable_name: self.text()?,
            variable_type: self.read_type()?,
            iterable: self.read_expression()?,
            body: self.boxed_statement()?,
            is_await: self.flag()?,
        })
    }

    fn read_while(&mut self) -> Result<StatementKind, DecodeError> {
        Ok(StatementKind::While {
            condition: self.read_expression()?,
            body: self.boxed_statement()?,
        })
    }

    fn read_do_while(&mut self) -> Result<StatementKind, DecodeError> {
        Ok(StatementKind::DoWhile {
            body: self.boxed_statement()?,
            condition: self.read_expression()?,
        })
    }

    fn read_switch(&mut self) -> Result<StatementKind, DecodeError> {
        Ok(StatementKind::Switch {
            subject: self.read_expression()?,
            cases: self.list(Self::read_switch_case)?,
        })
    }

    fn read_try(&mut self) -> Result<StatementKind, DecodeError> {
        Ok(StatementKind::Try {
            body: self.read_statements()?,
            catch_clauses: self.list(Self::read_catch_clause)?,
            finally_block: self.optional(Self::read_statements)?,
        })
    }

    fn read_labeled(&mut self) -> Result<StatementKind, DecodeError> {
        Ok(StatementKind::Labeled {
            label: self.text()?,
            statement: self.boxed_statement()?,
        })
    }

    fn read_yield(&mut self) -> Result<StatementKind, DecodeError> {
        Ok(StatementKind::Yield {
            value: self.read_expression()?,
            is_star: self.flag()?,
        })
    }

    fn read_local_function(&mut self) -> Result<StatementKind, DecodeError> {
        let function = Box::new(self.read_function()?);
        Ok(StatementKind::FunctionDeclaration { function })
    }

    fn read_switch_case(&mut self) -> Result<SwitchCase, DecodeError> {
        Ok(SwitchCase {
            id: self.str_ref()?,
            pattern: self.optional(Self::read_expression)?,
            guard: self.optional(Self::read_expression)?,
            statements: self.read_statements()?,
            location: self.location()?,
        })
    }

    fn read_catch_clause(&mut self) -> Result<CatchClause, DecodeError> {
        Ok(CatchClause {
            id: self.str_ref()?,
            exception_type: self.optional(Self::read_type)?,
            exception_parameter: self.opt_text()?,
            stack_trace_parameter: self.opt_text()?,
            body: self.read_statements()?,
            location: self.location()?,
        })
    }

    // ===== Components =====

    pub(super) fn read_component(&mut self) -> Result<FlutterComponent, DecodeError> {
        self.enter()?;
        let component = self.read_component_node();
        self.leave();
        component
    }

    fn read_component_node(&mut self) -> Result<FlutterComponent, DecodeError> {
        let offset = self.position();
        match self.tag("component", ComponentTag::from_u8)? {
            ComponentTag::Widget => self.read_widget().map(FlutterComponent::Widget),
            ComponentTag::Conditional => self.read_conditional_component(),
            ComponentTag::Loop => self.read_loop_component(),
            ComponentTag::Builder => self.read_builder_component(),
            ComponentTag::Unsupported => self.read_unsupported_component(),
            ComponentTag::Unknown => Err(reserved(
                "component",
                ComponentTag::Unknown.to_u8(),
                offset,
            )),
        }
    }

    fn boxed_component(&mut self) -> Result<Box<FlutterComponent>, DecodeError> {
        self.read_component().map(Box::new)
    }

    fn read_widget(&mut self) -> Result<WidgetComponent, DecodeError> {
        Ok(WidgetComponent {
            widget_name: self.text()?,
            constructor_name: self.opt_text()?,
            is_const: self.flag()?,
            properties: self.list(|r| {
                Ok(ComponentProperty {
                    name: r.text()?,
                    value: r.read_property_value()?,
                })
            })?,
        })
    }

    fn read_conditional_component(&mut self) -> Result<FlutterComponent, DecodeError> {
        Ok(FlutterComponent::Conditional {
            condition: self.text()?,
            then_component: self.boxed_component()?,
            else_component: self.optional(Self::boxed_component)?,
        })
    }

    fn read_loop_component(&mut self) -> Result<FlutterComponent, DecodeError> {
        Ok(FlutterComponent::Loop {
            iterable: self.text()?,
            item_name: self.text()?,
            body: self.boxed_component()?,
        })
    }

    fn read_builder_component(&mut self) -> Result<FlutterComponent, DecodeError> {
        Ok(FlutterComponent::Builder {
            builder_name: self.text()?,
            parameters: self.texts()?,
            body: self.boxed_component()?,
        })
    }

    fn read_unsupported_component(&mut self) -> Result<FlutterComponent, DecodeError> {
        Ok(FlutterComponent::Unsupported {
            source: self.text()?,
            reason: self.text()?,
        })
    }

    fn read_property_value(&mut self) -> Result<PropertyValue, DecodeError> {
        let offset = self.position();
        match self.tag("property value", PropertyTag::from_u8)? {
            PropertyTag::Literal => self.text().map(|source| PropertyValue::Literal { source }),
            PropertyTag::Expression => self.text().map(|source| PropertyValue::Expression { source }),
            PropertyTag::Component => self
                .boxed_component()
                .map(|component| PropertyValue::Component { component }),
            PropertyTag::Components => self
                .list(Self::read_component)
                .map(|components| PropertyValue::Components { components }),
            PropertyTag::Unknown => Err(reserved(
                "property value",
                PropertyTag::Unknown.to_u8(),
                offset,
            )),
        }
    }
}

/// Error for a tag enum's reserved `Unknown` byte
pub(super) fn reserved(kind: &'static str, tag: u8, offset: usize) -> DecodeError {
    DecodeError::InvalidTag { kind, tag, offset }
}
