//! Statement nodes

use crate::decl::{FunctionDecl, VariableDecl};
use crate::expr::Expression;
use crate::location::SourceLocation;
use crate::types::DartType;
use serde::{Deserialize, Serialize};

/// Statement node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// Unique node id
    pub id: String,
    /// Where the statement appears
    #[serde(default)]
    pub location: SourceLocation,
    /// The statement itself
    pub kind: StatementKind,
}

impl Statement {
    /// Create a new statement node
    pub fn new(id: impl Into<String>, location: SourceLocation, kind: StatementKind) -> Self {
        Self {
            id: id.into(),
            location,
            kind,
        }
    }
}

/// Statement variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatementKind {
    /// Expression statement: foo();
    Expression {
        /// Evaluated expression
        expression: Expression,
    },

    /// Local variable declaration: final a = 1, b = 2;
    VariableDeclaration {
        /// Declared variables
        variables: Vec<VariableDecl>,
    },

    /// return; / return value;
    Return {
        /// Returned value
        #[serde(default)]
        value: Option<Expression>,
    },

    /// break; / break label;
    Break {
        /// Target label
        #[serde(default)]
        label: Option<String>,
    },

    /// continue; / continue label;
    Continue {
        /// Target label
        #[serde(default)]
        label: Option<String>,
    },

    /// throw statement
    Throw {
        /// Thrown value
        exception: Expression,
    },

    /// assert(condition, message);
    Assert {
        /// Asserted condition
        condition: Expression,
        /// Failure message
        #[serde(default)]
        message: Option<Expression>,
    },

    /// ;
    Empty,

    /// { ... }
    Block {
        /// Statements in order
        statements: Vec<Statement>,
    },

    /// if (cond) then else otherwise
    If {
        /// Condition
        condition: Expression,
        /// Then branch
        then_branch: Box<Statement>,
        /// Else branch
        #[serde(default)]
        else_branch: Option<Box<Statement>>,
    },

    /// for (init; cond; updaters) body
    For {
        /// Initializer (variable declaration or expression statement)
        #[serde(default)]
        initializer: Option<Box<Statement>>,
        /// Loop condition
        #[serde(default)]
        condition: Option<Expression>,
        /// Update expressions
        #[serde(default)]
        updaters: Vec<Expression>,
        /// Loop body
        body: Box<Statement>,
    },

    /// for (final x in items) body
    ForEach {
        /// Loop variable name
        variable_name: String,
        /// Loop variable type
        #[serde(default)]
        variable_type: DartType,
        /// Iterated expression
        iterable: Expression,
        /// Loop body
        body: Box<Statement>,
        /// `await for`
        #[serde(default)]
        is_await: bool,
    },

    /// while (cond) body
    While {
        /// Loop condition
        condition: Expression,
        /// Loop body
        body: Box<Statement>,
    },

    /// do body while (cond);
    DoWhile {
        /// Loop body
        body: Box<Statement>,
        /// Loop condition
        condition: Expression,
    },

    /// switch (subject) { cases }
    Switch {
        /// Switched value
        subject: Expression,
        /// Cases in order, including `default`
        cases: Vec<SwitchCase>,
    },

    /// try { } on T catch (e, s) { } finally { }
    Try {
        /// Guarded statements
        body: Vec<Statement>,
        /// Catch clauses in order
        #[serde(default)]
        catch_clauses: Vec<CatchClause>,
        /// Finally block
        #[serde(default)]
        finally_block: Option<Vec<Statement>>,
    },

    /// label: statement
    Labeled {
        /// Label name
        label: String,
        /// Labeled statement
        statement: Box<Statement>,
    },

    /// yield value; / yield* values;
    Yield {
        /// Yielded value
        value: Expression,
        /// `yield*`
        #[serde(default)]
        is_star: bool,
    },

    /// Local function declaration
    FunctionDeclaration {
        /// Declared function
        function: Box<FunctionDecl>,
    },
}

/// Case of a switch statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    /// Unique node id
    pub id: String,
    /// Where the case appears
    #[serde(default)]
    pub location: SourceLocation,
    /// Matched pattern, absent for `default:`
    #[serde(default)]
    pub pattern: Option<Expression>,
    /// `when` guard
    #[serde(default)]
    pub guard: Option<Expression>,
    /// Case body
    #[serde(default)]
    pub statements: Vec<Statement>,
}

impl SwitchCase {
    /// Check if this is the `default:` case
    pub fn is_default(&self) -> bool {
        self.pattern.is_none()
    }
}

/// Catch clause of a try statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    /// Unique node id
    pub id: String,
    /// Where the clause appears
    #[serde(default)]
    pub location: SourceLocation,
    /// `on` type
    #[serde(default)]
    pub exception_type: Option<DartType>,
    /// Exception variable name
    #[serde(default)]
    pub exception_parameter: Option<String>,
    /// Stack trace variable name
    #[serde(default)]
    pub stack_trace_parameter: Option<String>,
    /// Handler body
    #[serde(default)]
    pub body: Vec<Statement>,
}
