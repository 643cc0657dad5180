//! Declaration nodes
//!
//! Declarations are the named building blocks of a Dart file: variables,
//! fields, parameters, functions, methods, constructors and classes, plus
//! the directives and analyzer issues attached to the file.
//!
//! Methods and constructors wrap a [`FunctionDecl`] that carries the shared
//! signature and body; they add only what is specific to them.

use crate::component::FlutterComponent;
use crate::expr::{Expression, NamedArgument};
use crate::location::SourceLocation;
use crate::stmt::Statement;
use crate::types::DartType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Free-form key/value annotations the frontend attaches to declarations
pub type Metadata = BTreeMap<String, String>;

/// Variable declaration (top-level or local): `final int count = 0;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDecl {
    /// Unique node id
    pub id: String,
    /// Where the variable is declared
    #[serde(default)]
    pub location: SourceLocation,
    /// Variable name
    pub name: String,
    /// Declared or inferred type
    #[serde(default)]
    pub declared_type: DartType,
    /// Initializer
    #[serde(default)]
    pub initializer: Option<Expression>,
    /// `final`
    #[serde(default)]
    pub is_final: bool,
    /// `const`
    #[serde(default)]
    pub is_const: bool,
    /// `late`
    #[serde(default)]
    pub is_late: bool,
}

/// Field of a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Unique node id
    pub id: String,
    /// Where the field is declared
    #[serde(default)]
    pub location: SourceLocation,
    /// Frontend metadata
    #[serde(default)]
    pub metadata: Metadata,
    /// Field name
    pub name: String,
    /// Declared or inferred type
    #[serde(default)]
    pub field_type: DartType,
    /// Initializer
    #[serde(default)]
    pub initializer: Option<Expression>,
    /// `final`
    #[serde(default)]
    pub is_final: bool,
    /// `const`
    #[serde(default)]
    pub is_const: bool,
    /// `static`
    #[serde(default)]
    pub is_static: bool,
    /// `late`
    #[serde(default)]
    pub is_late: bool,
    /// Annotations in source order
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// How a parameter is passed
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Required positional: `f(int a)`
    #[default]
    Positional = 0,
    /// Optional positional: `f([int a = 0])`
    OptionalPositional = 1,
    /// Optional named: `f({int? a})`
    Named = 2,
    /// Required named: `f({required int a})`
    RequiredNamed = 3,
}

impl ParameterKind {
    /// Convert to the wire byte
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Convert from the wire byte
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Positional),
            1 => Some(Self::OptionalPositional),
            2 => Some(Self::Named),
            3 => Some(Self::RequiredNamed),
            _ => None,
        }
    }

    /// Whether the parameter is passed by name
    pub fn is_named(self) -> bool {
        matches!(self, Self::Named | Self::RequiredNamed)
    }
}

/// Function, method, constructor or lambda parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDecl {
    /// Unique node id
    pub id: String,
    /// Where the parameter is declared
    #[serde(default)]
    pub location: SourceLocation,
    /// Parameter name
    pub name: String,
    /// Declared or inferred type
    #[serde(default)]
    pub param_type: DartType,
    /// Passing convention
    #[serde(default)]
    pub kind: ParameterKind,
    /// Default value
    #[serde(default)]
    pub default_value: Option<Expression>,
    /// `this.name` initializing formal
    #[serde(default)]
    pub is_field_initializer: bool,
    /// `super.name` parameter
    #[serde(default)]
    pub is_super_initializer: bool,
    /// Annotations in source order
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// Annotation: `@override`, `@Deprecated('use x')`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Unique node id
    pub id: String,
    /// Where the annotation appears
    #[serde(default)]
    pub location: SourceLocation,
    /// Annotation name without `@`
    pub name: String,
    /// Positional arguments
    #[serde(default)]
    pub arguments: Vec<Expression>,
    /// Named arguments
    #[serde(default)]
    pub named_arguments: Vec<NamedArgument>,
}

/// Body of a function, method, constructor or lambda
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "body", rename_all = "snake_case")]
pub enum FunctionBody {
    /// Block body: `{ ... }`
    Block {
        /// Statements in order
        statements: Vec<Statement>,
    },
    /// Arrow body: `=> expr`
    Arrow {
        /// Returned expression
        expression: Box<Expression>,
    },
    /// No body (abstract or external)
    #[default]
    Empty,
}

impl FunctionBody {
    /// Top-level statements of a block body, empty otherwise
    pub fn statements(&self) -> &[Statement] {
        match self {
            FunctionBody::Block { statements } => statements,
            FunctionBody::Arrow { .. } | FunctionBody::Empty => &[],
        }
    }
}

/// Function declaration (top-level, local, or the core of a method/constructor)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    /// Unique node id
    pub id: String,
    /// Where the function is declared
    #[serde(default)]
    pub location: SourceLocation,
    /// Frontend metadata
    #[serde(default)]
    pub metadata: Metadata,
    /// Function name
    pub name: String,
    /// Declared return type
    #[serde(default)]
    pub return_type: DartType,
    /// Type parameter names: `T` in `T first<T>(List<T> xs)`
    #[serde(default)]
    pub type_parameters: Vec<String>,
    /// Parameters in declaration order
    #[serde(default)]
    pub parameters: Vec<ParameterDecl>,
    /// Body
    #[serde(default)]
    pub body: FunctionBody,
    /// `async` / `async*`
    #[serde(default)]
    pub is_async: bool,
    /// `sync*` / `async*`
    #[serde(default)]
    pub is_generator: bool,
    /// Annotations in source order
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Widget-extraction results for the body, when the analysis ran
    #[serde(default)]
    pub components: Option<Vec<FlutterComponent>>,
}

/// Method of a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    /// Signature and body
    pub function: FunctionDecl,
    /// Name of the owning class
    pub class_name: String,
    /// `static`
    #[serde(default)]
    pub is_static: bool,
    /// Abstract method (no body)
    #[serde(default)]
    pub is_abstract: bool,
    /// `get`
    #[serde(default)]
    pub is_getter: bool,
    /// `set`
    #[serde(default)]
    pub is_setter: bool,
    /// Signature of the overridden member, when this method overrides one
    #[serde(default)]
    pub overridden_signature: Option<String>,
}

impl MethodDecl {
    /// Method id
    pub fn id(&self) -> &str {
        &self.function.id
    }

    /// Method name
    pub fn name(&self) -> &str {
        &self.function.name
    }
}

/// Field initializer in a constructor initializer list: `: _count = 0`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorInitializer {
    /// Initialized field
    pub field_name: String,
    /// Assigned value
    pub value: Expression,
}

/// `super(...)` or `this(...)` invocation from a constructor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorInvocation {
    /// Named constructor, absent for the unnamed one
    #[serde(default)]
    pub constructor_name: Option<String>,
    /// Positional arguments
    #[serde(default)]
    pub arguments: Vec<Expression>,
    /// Named arguments
    #[serde(default)]
    pub named_arguments: Vec<NamedArgument>,
}

/// Constructor of a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorDecl {
    /// Parameters and body
    pub function: FunctionDecl,
    /// Name of the owning class
    pub class_name: String,
    /// Named constructor suffix (`fromJson` in `User.fromJson`)
    #[serde(default)]
    pub constructor_name: Option<String>,
    /// Initializer list entries
    #[serde(default)]
    pub initializers: Vec<ConstructorInitializer>,
    /// `super(...)` call
    #[serde(default)]
    pub super_call: Option<ConstructorInvocation>,
    /// Redirecting `this(...)` call
    #[serde(default)]
    pub redirect: Option<ConstructorInvocation>,
    /// `const` constructor
    #[serde(default)]
    pub is_const: bool,
    /// `factory` constructor
    #[serde(default)]
    pub is_factory: bool,
}

impl ConstructorDecl {
    /// Constructor id
    pub fn id(&self) -> &str {
        &self.function.id
    }
}

/// Class declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    /// Unique node id
    pub id: String,
    /// Where the class is declared
    #[serde(default)]
    pub location: SourceLocation,
    /// Frontend metadata
    #[serde(default)]
    pub metadata: Metadata,
    /// Class name
    pub name: String,
    /// `extends` clause
    #[serde(default)]
    pub superclass: Option<DartType>,
    /// `implements` clause
    #[serde(default)]
    pub interfaces: Vec<DartType>,
    /// `with` clause
    #[serde(default)]
    pub mixins: Vec<DartType>,
    /// Type parameter names
    #[serde(default)]
    pub type_parameters: Vec<String>,
    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    /// Methods in declaration order
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
    /// Constructors in declaration order
    #[serde(default)]
    pub constructors: Vec<ConstructorDecl>,
    /// `abstract class`
    #[serde(default)]
    pub is_abstract: bool,
    /// Annotations in source order
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl ClassDecl {
    /// Find a method by name
    pub fn find_method(&self, name: &str) -> Option<&MethodDecl> {
        self.methods.iter().find(|m| m.name() == name)
    }

    /// Check if the class declares a method with this name
    pub fn has_method(&self, name: &str) -> bool {
        self.find_method(name).is_some()
    }

    /// Find a field by name
    pub fn find_field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Severity of an analyzer issue
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    /// Informational hint
    #[default]
    Info = 0,
    /// Warning
    Warning = 1,
    /// Error
    Error = 2,
}

impl IssueSeverity {
    /// Convert to the wire byte
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Convert from the wire byte
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Info),
            1 => Some(Self::Warning),
            2 => Some(Self::Error),
            _ => None,
        }
    }
}

/// Issue reported by the analyzer for this file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisIssue {
    /// Unique node id
    pub id: String,
    /// Where the issue was reported
    #[serde(default)]
    pub location: SourceLocation,
    /// Severity
    #[serde(default)]
    pub severity: IssueSeverity,
    /// Diagnostic code: `unused_import`
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Suggested fix
    #[serde(default)]
    pub correction: Option<String>,
}

/// `import 'package:flutter/material.dart' as m show Text;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportDirective {
    /// Unique node id
    pub id: String,
    /// Where the directive appears
    #[serde(default)]
    pub location: SourceLocation,
    /// Imported URI
    pub uri: String,
    /// `as` prefix
    #[serde(default)]
    pub prefix: Option<String>,
    /// `show` combinator names
    #[serde(default)]
    pub show: Vec<String>,
    /// `hide` combinator names
    #[serde(default)]
    pub hide: Vec<String>,
    /// `deferred as`
    #[serde(default)]
    pub is_deferred: bool,
}

/// `export 'src/widgets.dart' show Foo;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDirective {
    /// Unique node id
    pub id: String,
    /// Where the directive appears
    #[serde(default)]
    pub location: SourceLocation,
    /// Exported URI
    pub uri: String,
    /// `show` combinator names
    #[serde(default)]
    pub show: Vec<String>,
    /// `hide` combinator names
    #[serde(default)]
    pub hide: Vec<String>,
}

/// `part 'state.g.dart';`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartDirective {
    /// Unique node id
    pub id: String,
    /// Where the directive appears
    #[serde(default)]
    pub location: SourceLocation,
    /// Part URI
    pub uri: String,
}
