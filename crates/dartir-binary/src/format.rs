//! Wire format constants and tag enumerations
//!
//! Every tree family has its own one-byte tag space. Each family reserves
//! `0xFF` as `Unknown`: the writers match the closed IR enums exhaustively so
//! they never emit it, and the decoder rejects it like any unassigned byte.

/// Magic number: `"DIRB"` read as a little-endian u32
pub const MAGIC: u32 = u32::from_le_bytes(*b"DIRB");

/// Current format version
pub const FORMAT_VERSION: u16 = 1;

/// Header flag: a SHA-256 trailer follows the IR data
pub const FLAG_CHECKSUM: u16 = 0x0001;

/// Size of the fixed header (magic, version, flags)
pub const HEADER_SIZE: usize = 8;

/// Size of the SHA-256 trailer
pub const CHECKSUM_SIZE: usize = 32;

/// Longest string the u16 length prefix can describe
pub const MAX_WIRE_STRING_LENGTH: usize = u16::MAX as usize;

/// Library name written when the file declares none
pub const UNKNOWN_LIBRARY: &str = "<unknown>";

/// Relationship section present-flags, in block order
pub mod relationship {
    /// Widget class id → state class id
    pub const WIDGET_STATE: u16 = 0x0001;
    /// State lifecycle methods and state build methods
    pub const LIFECYCLE: u16 = 0x0002;
    /// Caller id → callee ids
    pub const METHOD_CALLS: u16 = 0x0004;
    /// Accessor id → field ids
    pub const FIELD_ACCESS: u16 = 0x0008;
    /// Class id → superclass type name
    pub const CLASS_HIERARCHY: u16 = 0x0010;
    /// Interface type name → implementing class ids
    pub const INTERFACE_IMPLEMENTERS: u16 = 0x0020;
    /// Class id → widget produced by its build method
    pub const BUILD_OUTPUTS: u16 = 0x0040;

    /// Every defined flag
    pub const ALL: u16 = WIDGET_STATE
        | LIFECYCLE
        | METHOD_CALLS
        | FIELD_ACCESS
        | CLASS_HIERARCHY
        | INTERFACE_IMPLEMENTERS
        | BUILD_OUTPUTS;
}

macro_rules! wire_tags {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value,)+
            /// Reserved, never written
            Unknown = 0xFF,
        }

        impl $name {
            /// Convert to the wire byte
            pub fn to_u8(self) -> u8 {
                self as u8
            }

            /// Convert from the wire byte; `Unknown` and unassigned bytes yield `None`
            pub fn from_u8(byte: u8) -> Option<Self> {
                match byte {
                    $($value => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Variant name for diagnostics
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                    Self::Unknown => "unknown",
                }
            }
        }
    };
}

wire_tags! {
    /// Type tags
    TypeTag {
        /// Named type with a nullability flag
        Simple = 0x01 => "simple",
        /// `dynamic`
        Dynamic = 0x02 => "dynamic",
        /// `void`
        Void = 0x03 => "void",
        /// `Never`
        Never = 0x04 => "Never",
    }
}

wire_tags! {
    /// Expression tags
    ExprTag {
        /// Integer literal
        IntLiteral = 0x01 => "int_literal",
        /// Double literal
        DoubleLiteral = 0x02 => "double_literal",
        /// String literal
        StringLiteral = 0x03 => "string_literal",
        /// Boolean literal
        BoolLiteral = 0x04 => "bool_literal",
        /// `null`
        NullLiteral = 0x05 => "null_literal",
        /// Identifier
        Identifier = 0x06 => "identifier",
        /// Binary expression
        Binary = 0x07 => "binary",
        /// Unary expression
        Unary = 0x08 => "unary",
        /// Compound assignment
        CompoundAssignment = 0x09 => "compound_assignment",
        /// Assignment
        Assignment = 0x0A => "assignment",
        /// Index access
        IndexAccess = 0x0B => "index_access",
        /// Property access
        PropertyAccess = 0x0C => "property_access",
        /// Null-aware property access
        NullAwareAccess = 0x0D => "null_aware_access",
        /// `??`
        NullCoalescing = 0x0E => "null_coalescing",
        /// Cascade
        Cascade = 0x0F => "cascade",
        /// `as`
        Cast = 0x10 => "cast",
        /// `is` / `is!`
        TypeCheck = 0x11 => "type_check",
        /// `await`
        Await = 0x12 => "await",
        /// `throw` expression
        Throw = 0x13 => "throw",
        /// Method call
        MethodCall = 0x14 => "method_call",
        /// Function call
        FunctionCall = 0x15 => "function_call",
        /// String interpolation
        StringInterpolation = 0x16 => "string_interpolation",
        /// Instance creation
        InstanceCreation = 0x17 => "instance_creation",
        /// Function literal
        Lambda = 0x18 => "lambda",
        /// `this`
        This = 0x19 => "this",
        /// `super`
        Super = 0x1A => "super",
        /// Parenthesized expression
        Parenthesized = 0x1B => "parenthesized",
        /// List literal
        ListLiteral = 0x1C => "list_literal",
        /// Map literal
        MapLiteral = 0x1D => "map_literal",
        /// Set literal
        SetLiteral = 0x1E => "set_literal",
        /// Conditional expression
        Conditional = 0x1F => "conditional",
    }
}

wire_tags! {
    /// Statement tags
    StmtTag {
        /// Expression statement
        Expression = 0x01 => "expression",
        /// Local variable declaration
        VariableDeclaration = 0x02 => "variable_declaration",
        /// `return`
        Return = 0x03 => "return",
        /// `break`
        Break = 0x04 => "break",
        /// `continue`
        Continue = 0x05 => "continue",
        /// `throw` statement
        Throw = 0x06 => "throw",
        /// `assert`
        Assert = 0x07 => "assert",
        /// `;`
        Empty = 0x08 => "empty",
        /// Block
        Block = 0x09 => "block",
        /// `if`
        If = 0x0A => "if",
        /// `for`
        For = 0x0B => "for",
        /// `for-in`
        ForEach = 0x0C => "for_each",
        /// `while`
        While = 0x0D => "while",
        /// `do-while`
        DoWhile = 0x0E => "do_while",
        /// `switch`
        Switch = 0x0F => "switch",
        /// `try`
        Try = 0x10 => "try",
        /// Labeled statement
        Labeled = 0x11 => "labeled",
        /// `yield`
        Yield = 0x12 => "yield",
        /// Local function declaration
        FunctionDeclaration = 0x13 => "function_declaration",
    }
}

wire_tags! {
    /// Declaration record tags
    DeclTag {
        /// Import directive
        Import = 0x01 => "import",
        /// Export directive
        Export = 0x02 => "export",
        /// Part directive
        Part = 0x03 => "part",
        /// Variable
        Variable = 0x04 => "variable",
        /// Function
        Function = 0x05 => "function",
        /// Class
        Class = 0x06 => "class",
        /// Field
        Field = 0x07 => "field",
        /// Method
        Method = 0x08 => "method",
        /// Constructor
        Constructor = 0x09 => "constructor",
        /// Parameter
        Parameter = 0x0A => "parameter",
        /// Annotation
        Annotation = 0x0B => "annotation",
        /// Analysis issue
        AnalysisIssue = 0x0C => "analysis_issue",
    }
}

wire_tags! {
    /// Flutter component tags
    ComponentTag {
        /// Widget construction
        Widget = 0x01 => "widget",
        /// Conditional component
        Conditional = 0x02 => "conditional",
        /// Loop-generated components
        Loop = 0x03 => "loop",
        /// Builder callback
        Builder = 0x04 => "builder",
        /// Construct the extraction could not model
        Unsupported = 0x05 => "unsupported",
    }
}

wire_tags! {
    /// Widget property value tags
    PropertyTag {
        /// Literal source text
        Literal = 0x01 => "literal",
        /// Expression source text
        Expression = 0x02 => "expression",
        /// Single nested component
        Component = 0x03 => "component",
        /// List of nested components
        Components = 0x04 => "components",
    }
}

wire_tags! {
    /// Function body tags
    BodyTag {
        /// No body
        Empty = 0x00 => "empty",
        /// Block body
        Block = 0x01 => "block",
        /// Arrow body
        Arrow = 0x02 => "arrow",
    }
}

wire_tags! {
    /// String interpolation part tags
    PartTag {
        /// Literal text
        Text = 0x00 => "text",
        /// Interpolated expression
        Expression = 0x01 => "expression",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_bytes() {
        assert_eq!(MAGIC.to_le_bytes(), *b"DIRB");
    }

    #[test]
    fn test_expr_tags_are_dense() {
        for byte in 0x01..=0x1F {
            let tag = ExprTag::from_u8(byte).unwrap();
            assert_eq!(tag.to_u8(), byte);
        }
        assert_eq!(ExprTag::from_u8(0x00), None);
        assert_eq!(ExprTag::from_u8(0x20), None);
    }

    #[test]
    fn test_unknown_is_never_decoded() {
        assert_eq!(TypeTag::from_u8(0xFF), None);
        assert_eq!(StmtTag::from_u8(0xFF), None);
        assert_eq!(DeclTag::from_u8(0xFF), None);
        assert_eq!(ComponentTag::Unknown.to_u8(), 0xFF);
        assert_eq!(BodyTag::Unknown.name(), "unknown");
    }

    #[test]
    fn test_stmt_tag_names() {
        assert_eq!(StmtTag::FunctionDeclaration.to_u8(), 0x13);
        assert_eq!(StmtTag::ForEach.name(), "for_each");
        assert_eq!(DeclTag::AnalysisIssue.to_u8(), 0x0C);
    }

    #[test]
    fn test_relationship_flags_are_distinct_bits() {
        let flags = [
            relationship::WIDGET_STATE,
            relationship::LIFECYCLE,
            relationship::METHOD_CALLS,
            relationship::FIELD_ACCESS,
            relationship::CLASS_HIERARCHY,
            relationship::INTERFACE_IMPLEMENTERS,
            relationship::BUILD_OUTPUTS,
        ];
        for (i, flag) in flags.iter().enumerate() {
            assert_eq!(*flag, 1 << i);
        }
        assert_eq!(relationship::ALL, 0x007F);
    }
}
