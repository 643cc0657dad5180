//! Structural validation of the raw tree
//!
//! Runs before anything else in an encode call and reports every violation
//! it finds. Nesting depth is measured with the iterative walker from
//! `dartir_ir::walk`, so a pathologically deep tree is rejected here instead
//! of overflowing the stack in the recursive writers.

use crate::config::EncoderLimits;
use dartir_ir::walk::{self, NodeRef};
use dartir_ir::{
    Annotation, ClassDecl, DartFile, ExpressionKind, FunctionDecl, ParameterDecl, StatementKind,
};
use thiserror::Error;

/// One structural violation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    /// File path is empty
    #[error("file path is empty")]
    EmptyFilePath,

    /// File path is longer than allowed
    #[error("file path of {length} bytes exceeds {max}")]
    FilePathTooLong {
        /// Path length in bytes
        length: usize,
        /// Configured maximum
        max: usize,
    },

    /// Content hash is empty
    #[error("content hash is empty")]
    EmptyContentHash,

    /// Too many top-level declarations of one kind
    #[error("{count} {kind} exceed the limit of {max}")]
    TooManyDeclarations {
        /// `classes`, `functions` or `imports`
        kind: &'static str,
        /// Actual count
        count: usize,
        /// Configured maximum
        max: usize,
    },

    /// Declaration with an empty name
    #[error("{kind} '{id}' has an empty name")]
    EmptyName {
        /// Declaration kind
        kind: &'static str,
        /// Declaration id
        id: String,
    },

    /// Declaration name longer than allowed
    #[error("{kind} '{id}' has a name of {length} bytes (max {max})")]
    NameTooLong {
        /// Declaration kind
        kind: &'static str,
        /// Declaration id
        id: String,
        /// Name length in bytes
        length: usize,
        /// Configured maximum
        max: usize,
    },

    /// Function with too many parameters
    #[error("{owner} '{id}' declares {count} parameters (max {max})")]
    TooManyParameters {
        /// Function kind
        owner: &'static str,
        /// Function id
        id: String,
        /// Parameter count
        count: usize,
        /// Configured maximum
        max: usize,
    },

    /// `show`/`hide` list longer than allowed
    #[error("{combinator} list of '{uri}' has {count} names (max {max})")]
    CombinatorTooLong {
        /// Directive URI
        uri: String,
        /// `show` or `hide`
        combinator: &'static str,
        /// Name count
        count: usize,
        /// Configured maximum
        max: usize,
    },

    /// Node without an id
    #[error("{kind} at {location} has an empty id")]
    EmptyId {
        /// Node kind
        kind: &'static str,
        /// Where the node appears
        location: String,
    },

    /// Tree nests deeper than allowed
    #[error("nesting depth {depth} exceeds {max}")]
    NestingTooDeep {
        /// Deepest nesting found
        depth: usize,
        /// Configured maximum
        max: usize,
    },
}

/// Check a file against the limits; an empty result means the file can be encoded
pub fn validate_file(file: &DartFile, limits: &EncoderLimits) -> Vec<ValidationIssue> {
    let mut validator = Validator {
        limits,
        issues: Vec::new(),
    };
    validator.check_file(file);
    validator.check_nodes(file);
    validator.issues
}

struct Validator<'a> {
    limits: &'a EncoderLimits,
    issues: Vec<ValidationIssue>,
}

impl Validator<'_> {
    fn check_file(&mut self, file: &DartFile) {
        if file.file_path.is_empty() {
            self.issues.push(ValidationIssue::EmptyFilePath);
        } else if file.file_path.len() > self.limits.max_path_length {
            self.issues.push(ValidationIssue::FilePathTooLong {
                length: file.file_path.len(),
                max: self.limits.max_path_length,
            });
        }
        if file.content_hash.is_empty() {
            self.issues.push(ValidationIssue::EmptyContentHash);
        }

        self.check_count("classes", file.classes.len(), self.limits.max_classes);
        self.check_count("functions", file.functions.len(), self.limits.max_functions);
        self.check_count("imports", file.imports.len(), self.limits.max_imports);

        for import in &file.imports {
            self.check_id("import", &import.id, &import.location);
            self.check_combinator(&import.uri, "show", import.show.len());
            self.check_combinator(&import.uri, "hide", import.hide.len());
        }
        for export in &file.exports {
            self.check_id("export", &export.id, &export.location);
            self.check_combinator(&export.uri, "show", export.show.len());
            self.check_combinator(&export.uri, "hide", export.hide.len());
        }
        for part in &file.parts {
            self.check_id("part", &part.id, &part.location);
        }
        for variable in &file.variables {
            self.check_id("variable", &variable.id, &variable.location);
        }
        for function in &file.functions {
            self.check_function("function", function, true);
        }
        for class in &file.classes {
            self.check_class(class);
        }
        for issue in &file.analysis_issues {
            self.check_id("analysis issue", &issue.id, &issue.location);
        }
    }

    fn check_class(&mut self, class: &ClassDecl) {
        self.check_id("class", &class.id, &class.location);
        self.check_name("class", &class.id, &class.name);
        self.check_annotations(&class.annotations);
        for field in &class.fields {
            self.check_id("field", &field.id, &field.location);
            self.check_name("field", &field.id, &field.name);
            self.check_annotations(&field.annotations);
        }
        for method in &class.methods {
            self.check_function("method", &method.function, true);
        }
        // Unnamed constructors legitimately carry an empty name.
        for ctor in &class.constructors {
            self.check_function("constructor", &ctor.function, false);
        }
    }

    fn check_function(&mut self, kind: &'static str, function: &FunctionDecl, named: bool) {
        self.check_id(kind, &function.id, &function.location);
        if named {
            self.check_name(kind, &function.id, &function.name);
        }
        self.check_annotations(&function.annotations);
        self.check_parameters(kind, &function.id, &function.parameters);
    }

    fn check_parameters(&mut self, owner: &'static str, id: &str, parameters: &[ParameterDecl]) {
        if parameters.len() > self.limits.max_parameters {
            self.issues.push(ValidationIssue::TooManyParameters {
                owner,
                id: id.to_string(),
                count: parameters.len(),
                max: self.limits.max_parameters,
            });
        }
        for param in parameters {
            self.check_id("parameter", &param.id, &param.location);
            self.check_name("parameter", &param.id, &param.name);
            self.check_annotations(&param.annotations);
        }
    }

    fn check_annotations(&mut self, annotations: &[Annotation]) {
        for annotation in annotations {
            self.check_id("annotation", &annotation.id, &annotation.location);
        }
    }

    /// Walk every nestable node once: ids, local declarations, depth
    fn check_nodes(&mut self, file: &DartFile) {
        let mut deepest = 0;
        walk::walk(walk::file_roots(file), |node, depth| {
            deepest = deepest.max(depth);
            match node {
                NodeRef::Expression(expr) => {
                    self.check_id("expression", &expr.id, &expr.location);
                    if let ExpressionKind::Lambda { parameters, .. } = &expr.kind {
                        self.check_parameters("lambda", &expr.id, parameters);
                    }
                }
                NodeRef::Statement(stmt) => {
                    self.check_id("statement", &stmt.id, &stmt.location);
                    match &stmt.kind {
                        StatementKind::VariableDeclaration { variables } => {
                            for variable in variables {
                                self.check_id("variable", &variable.id, &variable.location);
                            }
                        }
                        StatementKind::Switch { cases, .. } => {
                            for case in cases {
                                self.check_id("switch case", &case.id, &case.location);
                            }
                        }
                        StatementKind::Try { catch_clauses, .. } => {
                            for clause in catch_clauses {
                                self.check_id("catch clause", &clause.id, &clause.location);
                            }
                        }
                        StatementKind::FunctionDeclaration { function } => {
                            self.check_function("local function", function, true);
                        }
                        _ => {}
                    }
                }
                NodeRef::Component(_) => {}
            }
        });
        if deepest > self.limits.max_nesting_depth {
            self.issues.push(ValidationIssue::NestingTooDeep {
                depth: deepest,
                max: self.limits.max_nesting_depth,
            });
        }
    }

    fn check_count(&mut self, kind: &'static str, count: usize, max: usize) {
        if count > max {
            self.issues
                .push(ValidationIssue::TooManyDeclarations { kind, count, max });
        }
    }

    fn check_combinator(&mut self, uri: &str, combinator: &'static str, count: usize) {
        if count > self.limits.max_show_hide {
            self.issues.push(ValidationIssue::CombinatorTooLong {
                uri: uri.to_string(),
                combinator,
                count,
                max: self.limits.max_show_hide,
            });
        }
    }

    fn check_id(&mut self, kind: &'static str, id: &str, location: &dartir_ir::SourceLocation) {
        if id.is_empty() {
            self.issues.push(ValidationIssue::EmptyId {
                kind,
                location: location.to_string(),
            });
        }
    }

    fn check_name(&mut self, kind: &'static str, id: &str, name: &str) {
        if name.is_empty() {
            self.issues.push(ValidationIssue::EmptyName {
                kind,
                id: id.to_string(),
            });
        } else if name.len() > self.limits.max_name_length {
            self.issues.push(ValidationIssue::NameTooLong {
                kind,
                id: id.to_string(),
                length: name.len(),
                max: self.limits.max_name_length,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dartir_ir::{
        Expression, FunctionBody, ImportDirective, ParameterKind, SourceLocation, Statement,
    };
    use dartir_ir::DartType;

    fn class(id: &str, name: &str) -> ClassDecl {
        ClassDecl {
            id: id.to_string(),
            location: SourceLocation::default(),
            metadata: Default::default(),
            name: name.to_string(),
            superclass: None,
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

    fn function(id: &str, name: &str, params: usize) -> FunctionDecl {
        FunctionDecl {
            id: id.to_string(),
            location: SourceLocation::default(),
            metadata: Default::default(),
            name: name.to_string(),
            return_type: DartType::Void,
            type_parameters: Vec::new(),
            parameters: (0..params)
                .map(|i| ParameterDecl {
                    id: format!("{}_p{}", id, i),
                    location: SourceLocation::default(),
                    name: format!("p{}", i),
                    param_type: DartType::simple("int"),
                    kind: ParameterKind::Positional,
                    default_value: None,
                    is_field_initializer: false,
                    is_super_initializer: false,
                    annotations: Vec::new(),
                })
                .collect(),
            body: FunctionBody::Empty,
            is_async: false,
            is_generator: false,
            annotations: Vec::new(),
            components: None,
        }
    }

    #[test]
    fn test_valid_file_has_no_issues() {
        let mut file = DartFile::new("lib/a.dart", "h");
        file.classes.push(class("c1", "Foo"));
        file.functions.push(function("f1", "main", 2));
        assert!(validate_file(&file, &EncoderLimits::default()).is_empty());
    }

    #[test]
    fn test_collects_every_issue() {
        let mut file = DartFile::new("", "");
        file.classes.push(class("c1", ""));
        file.functions.push(function("f1", "tooMany", 300));
        let issues = validate_file(&file, &EncoderLimits::default());
        assert!(issues.contains(&ValidationIssue::EmptyFilePath));
        assert!(issues.contains(&ValidationIssue::EmptyContentHash));
        assert!(issues.contains(&ValidationIssue::EmptyName {
            kind: "class",
            id: "c1".to_string()
        }));
        assert!(issues.contains(&ValidationIssue::TooManyParameters {
            owner: "function",
            id: "f1".to_string(),
            count: 300,
            max: 255
        }));
        assert_eq!(issues.len(), 4);
    }

    #[test]
    fn test_collection_ceilings() {
        let limits = EncoderLimits {
            max_classes: 1,
            max_imports: 0,
            max_show_hide: 1,
            ..EncoderLimits::default()
        };
        let mut file = DartFile::new("a.dart", "h");
        file.classes.push(class("c1", "A"));
        file.classes.push(class("c2", "B"));
        file.imports.push(ImportDirective {
            id: "i1".to_string(),
            location: SourceLocation::default(),
            uri: "package:x/x.dart".to_string(),
            prefix: None,
            show: vec!["A".to_string(), "B".to_string()],
            hide: Vec::new(),
            is_deferred: false,
        });
        let issues = validate_file(&file, &limits);
        assert_eq!(issues.len(), 3);
        assert!(matches!(
            issues[0],
            ValidationIssue::TooManyDeclarations { kind: "classes", count: 2, max: 1 }
        ));
        assert!(matches!(
            issues[1],
            ValidationIssue::TooManyDeclarations { kind: "imports", .. }
        ));
        assert!(matches!(
            issues[2],
            ValidationIssue::CombinatorTooLong { combinator: "show", count: 2, .. }
        ));
    }

    #[test]
    fn test_nested_ids_and_depth() {
        let mut body = Statement::new(
            "s0",
            SourceLocation::default(),
            StatementKind::Empty,
        );
        for i in 1..=5 {
            body = Statement::new(
                format!("s{}", i),
                SourceLocation::default(),
                StatementKind::Block {
                    statements: vec![body],
                },
            );
        }
        let mut main = function("f1", "main", 0);
        main.body = FunctionBody::Block {
            statements: vec![
                body,
                Statement::new(
                    "",
                    SourceLocation::new("a.dart", 9, 3, 120, 5),
                    StatementKind::Expression {
                        expression: Expression::new(
                            "e1",
                            SourceLocation::default(),
                            DartType::Dynamic,
                            ExpressionKind::NullLiteral,
                        ),
                    },
                ),
            ],
        };
        let mut file = DartFile::new("a.dart", "h");
        file.functions.push(main);

        let limits = EncoderLimits {
            max_nesting_depth: 4,
            ..EncoderLimits::default()
        };
        let issues = validate_file(&file, &limits);
        assert_eq!(
            issues,
            vec![
                ValidationIssue::EmptyId {
                    kind: "statement",
                    location: "a.dart:9:3".to_string()
                },
                ValidationIssue::NestingTooDeep { depth: 6, max: 4 },
            ]
        );
    }
}
