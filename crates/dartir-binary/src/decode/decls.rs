//! Declaration readers

use super::nodes::{reserved, NodeReader};
use crate::error::DecodeError;
use crate::format::{BodyTag, DeclTag, UNKNOWN_LIBRARY};
use dartir_ir::{
    AnalysisIssue, Annotation, ClassDecl, ConstructorDecl, ConstructorInitializer,
    ConstructorInvocation, DartFile, ExportDirective, FieldDecl, FunctionBody, FunctionDecl,
    ImportDirective, IssueSeverity, MethodDecl, ParameterDecl, ParameterKind, PartDirective,
    VariableDecl,
};

impl NodeReader<'_> {
    pub(crate) fn read_ir_data(&mut self) -> Result<DartFile, DecodeError> {
        let file_path = self.str_ref()?;
        let content_hash = self.str_ref()?;
        let library = self.str_ref()?;
        Ok(DartFile {
            file_path,
            content_hash,
            library_name: (library != UNKNOWN_LIBRARY).then_some(library),
            analyzed_at_ms: self.u64()?,
            imports: self.list(Self::read_import)?,
            exports: self.list(Self::read_export)?,
            parts: self.list(Self::read_part)?,
            variables: self.list(Self::read_variable)?,
            functions: self.list(Self::read_function)?,
            classes: self.list(Self::read_class)?,
            analysis_issues: self.list(Self::read_analysis_issue)?,
        })
    }

    fn expect_decl(&mut self, expected: DeclTag) -> Result<(), DecodeError> {
        let tag = self.tag("declaration", DeclTag::from_u8)?;
        if tag == expected {
            Ok(())
        } else {
            // the tag byte was valid, just not the one this record needs
            Err(DecodeError::InvalidTag {
                kind: expected.name(),
                tag: tag.to_u8(),
                offset: self.position() - 1,
            })
        }
    }

    fn read_import(&mut self) -> Result<ImportDirective, DecodeError> {
        self.expect_decl(DeclTag::Import)?;
        Ok(ImportDirective {
            id: self.str_ref()?,
            uri: self.text()?,
            prefix: self.opt_text()?,
            show: self.texts()?,
            hide: self.texts()?,
            is_deferred: self.flag()?,
            location: self.location()?,
        })
    }

    fn read_export(&mut self) -> Result<ExportDirective, DecodeError> {
        self.expect_decl(DeclTag::Export)?;
        Ok(ExportDirective {
            id: self.str_ref()?,
            uri: self.text()?,
            show: self.texts()?,
            hide: self.texts()?,
            location: self.location()?,
        })
    }

    fn read_part(&mut self) -> Result<PartDirective, DecodeError> {
        self.expect_decl(DeclTag::Part)?;
        Ok(PartDirective {
            id: self.str_ref()?,
            uri: self.text()?,
            location: self.location()?,
        })
    }

    pub(super) fn read_variable(&mut self) -> Result<VariableDecl, DecodeError> {
        self.expect_decl(DeclTag::Variable)?;
        Ok(VariableDecl {
            id: self.str_ref()?,
            name: self.text()?,
            declared_type: self.read_type()?,
            initializer: self.optional(Self::read_expression)?,
            is_final: self.flag()?,
            is_const: self.flag()?,
            is_late: self.flag()?,
            location: self.location()?,
        })
    }

    pub(super) fn read_function(&mut self) -> Result<FunctionDecl, DecodeError> {
        self.expect_decl(DeclTag::Function)?;
        Ok(FunctionDecl {
            id: self.str_ref()?,
            metadata: self.metadata()?,
            name: self.text()?,
            return_type: self.read_type()?,
            type_parameters: self.texts()?,
            parameters: self.list(Self::read_parameter)?,
            body: self.read_body()?,
            is_async: self.flag()?,
            is_generator: self.flag()?,
            annotations: self.read_annotations()?,
            components: self.optional(|r| r.list(Self::read_component))?,
            location: self.location()?,
        })
    }

    pub(super) fn read_body(&mut self) -> Result<FunctionBody, DecodeError> {
        let offset = self.position();
        match self.tag("body", BodyTag::from_u8)? {
            BodyTag::Empty => Ok(FunctionBody::Empty),
            BodyTag::Block => self
                .read_statements()
                .map(|statements| FunctionBody::Block { statements }),
            BodyTag::Arrow => self.read_expression().map(|expression| FunctionBody::Arrow {
                expression: Box::new(expression),
            }),
            BodyTag::Unknown => Err(reserved("body", BodyTag::Unknown.to_u8(), offset)),
        }
    }

    pub(super) fn read_parameter(&mut self) -> Result<ParameterDecl, DecodeError> {
        self.expect_decl(DeclTag::Parameter)?;
        Ok(ParameterDecl {
            id: self.str_ref()?,
            name: self.str_ref()?,
            param_type: self.read_type()?,
            kind: self.tag("parameter kind", ParameterKind::from_u8)?,
            default_value: self.optional(Self::read_expression)?,
            is_field_initializer: self.flag()?,
            is_super_initializer: self.flag()?,
            annotations: self.read_annotations()?,
            location: self.location()?,
        })
    }

    fn read_annotations(&mut self) -> Result<Vec<Annotation>, DecodeError> {
        self.list(|r| {
            r.expect_decl(DeclTag::Annotation)?;
            let id = r.str_ref()?;
            let name = r.text()?;
            let (arguments, named_arguments) = r.read_arguments()?;
            Ok(Annotation {
                id,
                name,
                arguments,
                named_arguments,
                location: r.location()?,
            })
        })
    }

    fn read_class(&mut self) -> Result<ClassDecl, DecodeError> {
        self.expect_decl(DeclTag::Class)?;
        Ok(ClassDecl {
            id: self.str_ref()?,
            metadata: self.metadata()?,
            name: self.str_ref()?,
            superclass: self.optional(Self::read_type)?,
            interfaces: self.read_types()?,
            mixins: self.read_types()?,
            type_parameters: self.texts()?,
            fields: self.list(Self::read_field)?,
            methods: self.list(Self::read_method)?,
            constructors: self.list(Self::read_constructor)?,
            is_abstract: self.flag()?,
            annotations: self.read_annotations()?,
            location: self.location()?,
        })
    }

    fn read_field(&mut self) -> Result<FieldDecl, DecodeError> {
        self.expect_decl(DeclTag::Field)?;
        Ok(FieldDecl {
            id: self.str_ref()?,
            metadata: self.metadata()?,
            name: self.str_ref()?,
            field_type: self.read_type()?,
            initializer: self.optional(Self::read_expression)?,
            is_final: self.flag()?,
            is_const: self.flag()?,
            is_static: self.flag()?,
            is_late: self.flag()?,
            annotations: self.read_annotations()?,
            location: self.location()?,
        })
    }

    fn read_method(&mut self) -> Result<MethodDecl, DecodeError> {
        self.expect_decl(DeclTag::Method)?;
        Ok(MethodDecl {
            function: self.read_function()?,
            class_name: self.text()?,
            is_static: self.flag()?,
            is_abstract: self.flag()?,
            is_getter: self.flag()?,
            is_setter: self.flag()?,
            overridden_signature: self.opt_text()?,
        })
    }

    fn read_constructor(&mut self) -> Result<ConstructorDecl, DecodeError> {
        self.expect_decl(DeclTag::Constructor)?;
        Ok(ConstructorDecl {
            function: self.read_function()?,
            class_name: self.text()?,
            constructor_name: self.opt_text()?,
            initializers: self.list(|r| {
                Ok(ConstructorInitializer {
                    field_name: r.text()?,
                    value: r.read_expression()?,
                })
            })?,
            super_call: self.optional(Self::read_invocation)?,
            redirect: self.optional(Self::read_invocation)?,
            is_const: self.flag()?,
            is_factory: self.flag()?,
        })
    }

    fn read_invocation(&mut self) -> Result<ConstructorInvocation, DecodeError> {
        let constructor_name = self.opt_text()?;
        let (arguments, named_arguments) = self.read_arguments()?;
        Ok(ConstructorInvocation {
            constructor_name,
            arguments,
            named_arguments,
        })
    }

    fn read_analysis_issue(&mut self) -> Result<AnalysisIssue, DecodeError> {
        self.expect_decl(DeclTag::AnalysisIssue)?;
        Ok(AnalysisIssue {
            id: self.str_ref()?,
            severity: self.tag("issue severity", IssueSeverity::from_u8)?,
            code: self.text()?,
            message: self.text()?,
            correction: self.opt_text()?,
            location: self.location()?,
        })
    }
}
