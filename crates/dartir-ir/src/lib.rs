//! Dart/Flutter IR tree
//!
//! This crate defines the typed intermediate representation that a Dart
//! frontend hands to the `dartir-binary` encoder:
//! - **Types**: the `DartType` sum type (`types` module)
//! - **Expressions** and **statements**: closed enums wrapped in nodes that
//!   carry an id and a source location (`expr`, `stmt` modules)
//! - **Declarations**: fields, parameters, functions, methods, constructors,
//!   classes, directives and analysis issues (`decl` module)
//! - **Flutter components**: widget-extraction results attached to function
//!   bodies (`component` module)
//! - **Walking**: a non-recursive traversal over the tree (`walk` module)
//!
//! The tree is owned top-down and has no back-pointers. All node types
//! derive serde so fixtures can be written as JSON.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod component;
pub mod decl;
pub mod expr;
pub mod file;
pub mod location;
pub mod stmt;
pub mod types;
pub mod walk;

pub use component::{ComponentProperty, FlutterComponent, PropertyValue, WidgetComponent};
pub use decl::{
    AnalysisIssue, Annotation, ClassDecl, ConstructorDecl, ConstructorInitializer,
    ConstructorInvocation, ExportDirective, FieldDecl, FunctionBody, FunctionDecl,
    ImportDirective, IssueSeverity, Metadata, MethodDecl, ParameterDecl, ParameterKind,
    PartDirective, VariableDecl,
};
pub use expr::{
    BinaryOperator, Expression, ExpressionKind, InterpolationPart, MapEntry, NamedArgument,
    UnaryOperator,
};
pub use file::DartFile;
pub use location::SourceLocation;
pub use stmt::{CatchClause, Statement, StatementKind, SwitchCase};
pub use types::DartType;
pub use walk::NodeRef;
