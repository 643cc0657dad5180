//! Expression nodes
//!
//! Every expression is an [`Expression`] node (id, location, static result
//! type) wrapping one [`ExpressionKind`] variant. Variants own their
//! sub-expressions.

use crate::decl::{FunctionBody, ParameterDecl};
use crate::location::SourceLocation;
use crate::types::DartType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    /// Unique node id
    pub id: String,
    /// Where the expression appears
    #[serde(default)]
    pub location: SourceLocation,
    /// Static type of the expression
    #[serde(default)]
    pub result_type: DartType,
    /// The expression itself
    pub kind: ExpressionKind,
}

impl Expression {
    /// Create a new expression node
    pub fn new(
        id: impl Into<String>,
        location: SourceLocation,
        result_type: DartType,
        kind: ExpressionKind,
    ) -> Self {
        Self {
            id: id.into(),
            location,
            result_type,
            kind,
        }
    }

    /// Check if this expression constructs an object (`Foo()`, `const Foo()`)
    pub fn is_instance_creation(&self) -> bool {
        matches!(self.kind, ExpressionKind::InstanceCreation { .. })
    }

    /// Check if this expression is `this`
    pub fn is_this(&self) -> bool {
        matches!(self.kind, ExpressionKind::This)
    }
}

/// Expression variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExpressionKind {
    /// Integer literal: 42, 0xFF
    IntLiteral {
        /// Literal value
        value: i64,
    },

    /// Double literal: 3.14
    DoubleLiteral {
        /// Literal value
        value: f64,
    },

    /// String literal: 'hello'
    StringLiteral {
        /// Literal value (may be empty)
        value: String,
    },

    /// Boolean literal: true, false
    BoolLiteral {
        /// Literal value
        value: bool,
    },

    /// `null`
    NullLiteral,

    /// Simple identifier: `count`
    Identifier {
        /// Referenced name
        name: String,
        /// Declaration id the analyzer resolved this name to
        #[serde(default)]
        resolved_id: Option<String>,
    },

    /// Binary expression: a + b, a && b
    Binary {
        /// Left operand
        left: Box<Expression>,
        /// Operator
        operator: BinaryOperator,
        /// Right operand
        right: Box<Expression>,
    },

    /// Prefix or postfix unary expression: !x, -y, i++
    Unary {
        /// Operator
        operator: UnaryOperator,
        /// Operand
        operand: Box<Expression>,
    },

    /// Compound assignment: x += 1, y ??= z
    CompoundAssignment {
        /// Assigned location
        target: Box<Expression>,
        /// Operator applied before assignment
        operator: BinaryOperator,
        /// Right-hand side
        value: Box<Expression>,
    },

    /// Assignment: x = 42
    Assignment {
        /// Assigned location
        target: Box<Expression>,
        /// Right-hand side
        value: Box<Expression>,
    },

    /// Index access: items[0], items?[0]
    IndexAccess {
        /// Indexed expression
        target: Box<Expression>,
        /// Index expression
        index: Box<Expression>,
        /// `?[` access
        #[serde(default)]
        null_aware: bool,
    },

    /// Property access: widget.title
    PropertyAccess {
        /// Receiver
        target: Box<Expression>,
        /// Property name
        property: String,
        /// Declaration id the analyzer resolved this property to
        #[serde(default)]
        resolved_id: Option<String>,
    },

    /// Null-aware property access: user?.name
    NullAwareAccess {
        /// Receiver
        target: Box<Expression>,
        /// Property name
        property: String,
    },

    /// Null-coalescing: a ?? b
    NullCoalescing {
        /// Preferred value
        left: Box<Expression>,
        /// Fallback value
        right: Box<Expression>,
    },

    /// Cascade: paint..color = red..strokeWidth = 2
    Cascade {
        /// Cascade receiver
        target: Box<Expression>,
        /// Cascade sections, each evaluated against the receiver
        sections: Vec<Expression>,
        /// `?..` cascade
        #[serde(default)]
        null_aware: bool,
    },

    /// Cast: value as String
    Cast {
        /// Cast operand
        expression: Box<Expression>,
        /// Target type
        target_type: DartType,
    },

    /// Type check: value is int, value is! int
    TypeCheck {
        /// Tested operand
        expression: Box<Expression>,
        /// Tested type
        tested_type: DartType,
        /// `is!` form
        #[serde(default)]
        negated: bool,
    },

    /// await future
    Await {
        /// Awaited expression
        operand: Box<Expression>,
    },

    /// throw expression
    Throw {
        /// Thrown value
        operand: Box<Expression>,
    },

    /// Method invocation: list.add(x), setState(() {})
    MethodCall {
        /// Receiver, absent for implicit `this` calls
        #[serde(default)]
        target: Option<Box<Expression>>,
        /// Invoked method name
        method_name: String,
        /// Positional arguments
        #[serde(default)]
        arguments: Vec<Expression>,
        /// Named arguments
        #[serde(default)]
        named_arguments: Vec<NamedArgument>,
        /// Explicit type arguments
        #[serde(default)]
        type_arguments: Vec<DartType>,
        /// `?.` invocation
        #[serde(default)]
        null_aware: bool,
        /// Declaration id of the invoked method, when resolved
        #[serde(default)]
        resolved_id: Option<String>,
    },

    /// Function invocation: print(x)
    FunctionCall {
        /// Invoked function name
        function_name: String,
        /// Positional arguments
        #[serde(default)]
        arguments: Vec<Expression>,
        /// Named arguments
        #[serde(default)]
        named_arguments: Vec<NamedArgument>,
        /// Explicit type arguments
        #[serde(default)]
        type_arguments: Vec<DartType>,
        /// Declaration id of the invoked function, when resolved
        #[serde(default)]
        resolved_id: Option<String>,
    },

    /// String interpolation: 'Count: $count'
    StringInterpolation {
        /// Literal and interpolated parts in order
        parts: Vec<InterpolationPart>,
    },

    /// Instance creation: Text('hi'), const EdgeInsets.all(8)
    InstanceCreation {
        /// Constructed type
        constructed_type: DartType,
        /// Named constructor (`all` in `EdgeInsets.all`)
        #[serde(default)]
        constructor_name: Option<String>,
        /// Positional arguments
        #[serde(default)]
        arguments: Vec<Expression>,
        /// Named arguments
        #[serde(default)]
        named_arguments: Vec<NamedArgument>,
        /// `const` creation
        #[serde(default)]
        is_const: bool,
    },

    /// Function literal: (x) => x + 1, () { ... }
    Lambda {
        /// Parameters
        #[serde(default)]
        parameters: Vec<ParameterDecl>,
        /// Body
        body: FunctionBody,
        /// `async` lambda
        #[serde(default)]
        is_async: bool,
    },

    /// `this`
    This,

    /// `super`
    Super,

    /// Parenthesized expression: (a + b)
    Parenthesized {
        /// Inner expression
        inner: Box<Expression>,
    },

    /// List literal: [1, 2, 3]
    ListLiteral {
        /// Element type
        #[serde(default)]
        element_type: DartType,
        /// Elements
        #[serde(default)]
        elements: Vec<Expression>,
        /// `const` literal
        #[serde(default)]
        is_const: bool,
    },

    /// Map literal: {'a': 1}
    MapLiteral {
        /// Key type
        #[serde(default)]
        key_type: DartType,
        /// Value type
        #[serde(default)]
        value_type: DartType,
        /// Entries in source order
        #[serde(default)]
        entries: Vec<MapEntry>,
        /// `const` literal
        #[serde(default)]
        is_const: bool,
    },

    /// Set literal: {1, 2}
    SetLiteral {
        /// Element type
        #[serde(default)]
        element_type: DartType,
        /// Elements
        #[serde(default)]
        elements: Vec<Expression>,
        /// `const` literal
        #[serde(default)]
        is_const: bool,
    },

    /// Conditional: cond ? a : b
    Conditional {
        /// Condition
        condition: Box<Expression>,
        /// Value when true
        then_expression: Box<Expression>,
        /// Value when false
        else_expression: Box<Expression>,
    },
}

/// Named argument: `child: Text('x')`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedArgument {
    /// Parameter name
    pub name: String,
    /// Argument value
    pub value: Expression,
}

/// Key/value entry of a map literal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEntry {
    /// Entry key
    pub key: Expression,
    /// Entry value
    pub value: Expression,
}

/// Part of a string interpolation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "part", rename_all = "snake_case")]
pub enum InterpolationPart {
    /// Literal text between interpolations
    Text {
        /// Text value
        value: String,
    },
    /// Interpolated expression: `$x`, `${a.b}`
    Expression {
        /// Interpolated expression
        expression: Expression,
    },
}

/// Binary operators
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOperator {
    /// +
    Add = 0x00,
    /// -
    Subtract = 0x01,
    /// *
    Multiply = 0x02,
    /// /
    Divide = 0x03,
    /// ~/
    IntegerDivide = 0x04,
    /// %
    Modulo = 0x05,
    /// ==
    Equal = 0x06,
    /// !=
    NotEqual = 0x07,
    /// <
    Less = 0x08,
    /// <=
    LessEqual = 0x09,
    /// >
    Greater = 0x0A,
    /// >=
    GreaterEqual = 0x0B,
    /// &&
    LogicalAnd = 0x0C,
    /// ||
    LogicalOr = 0x0D,
    /// &
    BitAnd = 0x0E,
    /// |
    BitOr = 0x0F,
    /// ^
    BitXor = 0x10,
    /// <<
    ShiftLeft = 0x11,
    /// >>
    ShiftRight = 0x12,
    /// >>>
    UnsignedShiftRight = 0x13,
    /// ??
    IfNull = 0x14,
}

impl BinaryOperator {
    /// Convert to the wire byte
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Convert from the wire byte
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Self::Add),
            0x01 => Some(Self::Subtract),
            0x02 => Some(Self::Multiply),
            0x03 => Some(Self::Divide),
            0x04 => Some(Self::IntegerDivide),
            0x05 => Some(Self::Modulo),
            0x06 => Some(Self::Equal),
            0x07 => Some(Self::NotEqual),
            0x08 => Some(Self::Less),
            0x09 => Some(Self::LessEqual),
            0x0A => Some(Self::Greater),
            0x0B => Some(Self::GreaterEqual),
            0x0C => Some(Self::LogicalAnd),
            0x0D => Some(Self::LogicalOr),
            0x0E => Some(Self::BitAnd),
            0x0F => Some(Self::BitOr),
            0x10 => Some(Self::BitXor),
            0x11 => Some(Self::ShiftLeft),
            0x12 => Some(Self::ShiftRight),
            0x13 => Some(Self::UnsignedShiftRight),
            0x14 => Some(Self::IfNull),
            _ => None,
        }
    }

    /// Dart source symbol
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::IntegerDivide => "~/",
            Self::Modulo => "%",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::LogicalAnd => "&&",
            Self::LogicalOr => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::UnsignedShiftRight => ">>>",
            Self::IfNull => "??",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary operators
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOperator {
    /// -x
    Negate = 0x00,
    /// !x
    Not = 0x01,
    /// ~x
    BitNot = 0x02,
    /// ++x
    PreIncrement = 0x03,
    /// --x
    PreDecrement = 0x04,
    /// x++
    PostIncrement = 0x05,
    /// x--
    PostDecrement = 0x06,
}

impl UnaryOperator {
    /// Convert to the wire byte
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Convert from the wire byte
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Self::Negate),
            0x01 => Some(Self::Not),
            0x02 => Some(Self::BitNot),
            0x03 => Some(Self::PreIncrement),
            0x04 => Some(Self::PreDecrement),
            0x05 => Some(Self::PostIncrement),
            0x06 => Some(Self::PostDecrement),
            _ => None,
        }
    }

    /// Dart source symbol
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Negate => "-",
            Self::Not => "!",
            Self::BitNot => "~",
            Self::PreIncrement | Self::PostIncrement => "++",
            Self::PreDecrement | Self::PostDecrement => "--",
        }
    }

    /// Whether the operator is written after its operand
    pub fn is_postfix(self) -> bool {
        matches!(self, Self::PostIncrement | Self::PostDecrement)
    }
}
