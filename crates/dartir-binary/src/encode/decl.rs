//! Declaration writers
//!
//! Every declaration record starts with its [`DeclTag`]. Methods and
//! constructors embed a complete function record for their shared signature
//! and body. Each record runs in its own error context so a failure points
//! at the innermost declaration being written.

use super::NodeWriter;
use crate::error::EncodeError;
use crate::format::{BodyTag, DeclTag};
use crate::strings::StringInterner;
use crate::writer::ByteSink;
use dartir_ir::{
    AnalysisIssue, Annotation, ClassDecl, ConstructorDecl, ConstructorInvocation,
    ExportDirective, FieldDecl, FunctionBody, FunctionDecl, ImportDirective, MethodDecl,
    ParameterDecl, PartDirective, VariableDecl,
};

impl<W: ByteSink, S: StringInterner> NodeWriter<'_, W, S> {
    fn decl_tag(&mut self, tag: DeclTag) {
        self.out.emit_u8(tag.to_u8());
    }

    pub(super) fn write_import(&mut self, import: &ImportDirective) -> Result<(), EncodeError> {
        self.in_context("import_write", |w| {
            w.decl_tag(DeclTag::Import);
            w.str_ref(&import.id)?;
            w.text(&import.uri)?;
            w.opt_text(import.prefix.as_deref())?;
            w.texts(&import.show, "show names")?;
            w.texts(&import.hide, "hide names")?;
            w.flag(import.is_deferred);
            w.location(&import.location)
        })
    }

    pub(super) fn write_export(&mut self, export: &ExportDirective) -> Result<(), EncodeError> {
        self.in_context("export_write", |w| {
            w.decl_tag(DeclTag::Export);
            w.str_ref(&export.id)?;
            w.text(&export.uri)?;
            w.texts(&export.show, "show names")?;
            w.texts(&export.hide, "hide names")?;
            w.location(&export.location)
        })
    }

    pub(super) fn write_part(&mut self, part: &PartDirective) -> Result<(), EncodeError> {
        self.in_context("part_write", |w| {
            w.decl_tag(DeclTag::Part);
            w.str_ref(&part.id)?;
            w.text(&part.uri)?;
            w.location(&part.location)
        })
    }

    pub(super) fn write_variable(&mut self, variable: &VariableDecl) -> Result<(), EncodeError> {
        self.in_context("variable_write", |w| {
            w.decl_tag(DeclTag::Variable);
            w.str_ref(&variable.id)?;
            w.text(&variable.name)?;
            w.write_type(&variable.declared_type)?;
            w.optional(variable.initializer.as_ref(), Self::write_expression)?;
            w.flag(variable.is_final);
            w.flag(variable.is_const);
            w.flag(variable.is_late);
            w.location(&variable.location)
        })
    }

    /// Write a function record (top-level, local, or embedded in a method or constructor)
    pub fn write_function(&mut self, function: &FunctionDecl) -> Result<(), EncodeError> {
        self.in_context("function_write", |w| {
            w.decl_tag(DeclTag::Function);
            w.str_ref(&function.id)?;
            w.metadata(&function.metadata)?;
            w.text(&function.name)?;
            w.write_type(&function.return_type)?;
            w.texts(&function.type_parameters, "type parameters")?;
            w.list(&function.parameters, "parameters", Self::write_parameter)?;
            w.write_body(&function.body)?;
            w.flag(function.is_async);
            w.flag(function.is_generator);
            w.write_annotations(&function.annotations)?;
            w.optional(function.components.as_deref(), |w, components| {
                w.list(components, "components", Self::write_component)
            })?;
            w.location(&function.location)
        })
    }

    pub(super) fn write_body(&mut self, body: &FunctionBody) -> Result<(), EncodeError> {
        match body {
            FunctionBody::Empty => {
                self.out.emit_u8(BodyTag::Empty.to_u8());
                Ok(())
            }
            FunctionBody::Block { statements } => {
                self.out.emit_u8(BodyTag::Block.to_u8());
                self.write_statements(statements)
            }
            FunctionBody::Arrow { expression } => {
                self.out.emit_u8(BodyTag::Arrow.to_u8());
                self.write_expression(expression)
            }
        }
    }

    pub(super) fn write_parameter(&mut self, param: &ParameterDecl) -> Result<(), EncodeError> {
        self.in_context("parameter_write", |w| {
            w.decl_tag(DeclTag::Parameter);
            w.str_ref(&param.id)?;
            w.str_ref(&param.name)?;
            w.write_type(&param.param_type)?;
            w.out.emit_u8(param.kind.to_u8());
            w.optional(param.default_value.as_ref(), Self::write_expression)?;
            w.flag(param.is_field_initializer);
            w.flag(param.is_super_initializer);
            w.write_annotations(&param.annotations)?;
            w.location(&param.location)
        })
    }

    fn write_annotations(&mut self, annotations: &[Annotation]) -> Result<(), EncodeError> {
        self.list(annotations, "annotations", Self::write_annotation)
    }

    fn write_annotation(&mut self, annotation: &Annotation) -> Result<(), EncodeError> {
        self.in_context("annotation_write", |w| {
            w.decl_tag(DeclTag::Annotation);
            w.str_ref(&annotation.id)?;
            w.text(&annotation.name)?;
            w.write_arguments(&annotation.arguments, &annotation.named_arguments)?;
            w.location(&annotation.location)
        })
    }

    pub(super) fn write_class(&mut self, class: &ClassDecl) -> Result<(), EncodeError> {
        self.in_context("class_write", |w| {
            w.decl_tag(DeclTag::Class);
            w.str_ref(&class.id)?;
            w.metadata(&class.metadata)?;
            w.str_ref(&class.name)?;
            w.optional(class.superclass.as_ref(), Self::write_type)?;
            w.write_types(&class.interfaces, "interfaces")?;
            w.write_types(&class.mixins, "mixins")?;
            w.texts(&class.type_parameters, "type parameters")?;
            w.list(&class.fields, "fields", Self::write_field)?;
            w.list(&class.methods, "methods", Self::write_method)?;
            w.list(&class.constructors, "constructors", Self::write_constructor)?;
            w.flag(class.is_abstract);
            w.write_annotations(&class.annotations)?;
            w.location(&class.location)
        })
    }

    fn write_field(&mut self, field: &FieldDecl) -> Result<(), EncodeError> {
        self.in_context("field_write", |w| {
            w.decl_tag(DeclTag::Field);
            w.str_ref(&field.id)?;
            w.metadata(&field.metadata)?;
            w.str_ref(&field.name)?;
            w.write_type(&field.field_type)?;
            w.optional(field.initializer.as_ref(), Self::write_expression)?;
            w.flag(field.is_final);
            w.flag(field.is_const);
            w.flag(field.is_static);
            w.flag(field.is_late);
            w.write_annotations(&field.annotations)?;
            w.location(&field.location)
        })
    }

    fn write_method(&mut self, method: &MethodDecl) -> Result<(), EncodeError> {
        self.in_context("method_write", |w| {
            w.decl_tag(DeclTag::Method);
            w.write_function(&method.function)?;
            w.text(&method.class_name)?;
            w.flag(method.is_static);
            w.flag(method.is_abstract);
            w.flag(method.is_getter);
            w.flag(method.is_setter);
            w.opt_text(method.overridden_signature.as_deref())
        })
    }

    fn write_constructor(&mut self, ctor: &ConstructorDecl) -> Result<(), EncodeError> {
        self.in_context("constructor_write", |w| {
            w.decl_tag(DeclTag::Constructor);
            w.write_function(&ctor.function)?;
            w.text(&ctor.class_name)?;
            w.opt_text(ctor.constructor_name.as_deref())?;
            w.list(&ctor.initializers, "initializers", |w, init| {
                w.text(&init.field_name)?;
                w.write_expression(&init.value)
            })?;
            w.optional(ctor.super_call.as_ref(), Self::write_invocation)?;
            w.optional(ctor.redirect.as_ref(), Self::write_invocation)?;
            w.flag(ctor.is_const);
            w.flag(ctor.is_factory);
            Ok(())
        })
    }

    fn write_invocation(&mut self, call: &ConstructorInvocation) -> Result<(), EncodeError> {
        self.opt_text(call.constructor_name.as_deref())?;
        self.write_arguments(&call.arguments, &call.named_arguments)
    }

    pub(super) fn write_analysis_issue(&mut self, issue: &AnalysisIssue) -> Result<(), EncodeError> {
        self.in_context("issue_write", |w| {
            w.decl_tag(DeclTag::AnalysisIssue);
            w.str_ref(&issue.id)?;
            w.out.emit_u8(issue.severity.to_u8());
            w.text(&issue.code)?;
            w.text(&issue.message)?;
            w.opt_text(issue.correction.as_deref())?;
            w.location(&issue.location)
        })
    }
}
