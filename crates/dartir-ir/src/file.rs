//! File-level IR root

use crate::decl::{
    AnalysisIssue, ClassDecl, ExportDirective, FunctionDecl, ImportDirective, PartDirective,
    VariableDecl,
};
use serde::{Deserialize, Serialize};

/// Analyzed Dart file: the unit the encoder serializes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DartFile {
    /// Path of the source file
    pub file_path: String,
    /// Hash of the source text the tree was built from
    pub content_hash: String,
    /// `library` name, if declared
    #[serde(default)]
    pub library_name: Option<String>,
    /// When the analysis ran (milliseconds since the Unix epoch)
    #[serde(default)]
    pub analyzed_at_ms: u64,
    /// Import directives
    #[serde(default)]
    pub imports: Vec<ImportDirective>,
    /// Export directives
    #[serde(default)]
    pub exports: Vec<ExportDirective>,
    /// Part directives
    #[serde(default)]
    pub parts: Vec<PartDirective>,
    /// Top-level variables
    #[serde(default)]
    pub variables: Vec<VariableDecl>,
    /// Top-level functions
    #[serde(default)]
    pub functions: Vec<FunctionDecl>,
    /// Classes
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
    /// Analyzer issues
    #[serde(default)]
    pub analysis_issues: Vec<AnalysisIssue>,
}

impl DartFile {
    /// Create an empty file
    pub fn new(file_path: impl Into<String>, content_hash: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            content_hash: content_hash.into(),
            library_name: None,
            analyzed_at_ms: 0,
            imports: Vec::new(),
            exports: Vec::new(),
            parts: Vec::new(),
            variables: Vec::new(),
            functions: Vec::new(),
            classes: Vec::new(),
            analysis_issues: Vec::new(),
        }
    }

    /// Find a class by name
    pub fn find_class(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.iter().find(|c| c.name == name)
    }
}
