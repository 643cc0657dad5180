//! Dart types
//!
//! The binary format only knows four type shapes (simple, `dynamic`, `void`,
//! `Never`). Richer shapes exist in memory and are flattened to a simple
//! type named by their display string when encoded.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Dart static type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DartType {
    /// Named type without type arguments: `int`, `String?`
    Simple {
        /// Type name
        name: String,
        /// Whether the type is nullable (`T?`)
        #[serde(default)]
        nullable: bool,
    },

    /// `dynamic`
    Dynamic,

    /// `void`
    Void,

    /// `Never`
    Never,

    /// Parameterized type: `List<int>`, `Map<String, dynamic>?`
    Generic {
        /// Base type name
        name: String,
        /// Type arguments in declaration order
        type_arguments: Vec<DartType>,
        /// Whether the type is nullable
        #[serde(default)]
        nullable: bool,
    },

    /// Function type: `int Function(String)`
    Function {
        /// Return type
        return_type: Box<DartType>,
        /// Positional parameter types
        #[serde(default)]
        parameter_types: Vec<DartType>,
        /// Whether the type is nullable
        #[serde(default)]
        nullable: bool,
    },

    /// Reference to a type parameter: `T`
    TypeParameter {
        /// Parameter name
        name: String,
        /// Upper bound (`T extends Widget`)
        #[serde(default)]
        bound: Option<Box<DartType>>,
    },
}

impl Default for DartType {
    fn default() -> Self {
        DartType::Dynamic
    }
}

impl DartType {
    /// Non-nullable simple type
    pub fn simple(name: impl Into<String>) -> Self {
        DartType::Simple {
            name: name.into(),
            nullable: false,
        }
    }

    /// Nullable simple type
    pub fn nullable(name: impl Into<String>) -> Self {
        DartType::Simple {
            name: name.into(),
            nullable: true,
        }
    }

    /// Generic type with the given arguments
    pub fn generic(name: impl Into<String>, type_arguments: Vec<DartType>) -> Self {
        DartType::Generic {
            name: name.into(),
            type_arguments,
            nullable: false,
        }
    }

    /// Whether the type carries a `?` marker
    pub fn is_nullable(&self) -> bool {
        match self {
            DartType::Simple { nullable, .. }
            | DartType::Generic { nullable, .. }
            | DartType::Function { nullable, .. } => *nullable,
            DartType::Dynamic | DartType::Void | DartType::Never | DartType::TypeParameter { .. } => {
                false
            }
        }
    }

    /// Name without type arguments: `List` for `List<int>`
    pub fn base_name(&self) -> &str {
        match self {
            DartType::Simple { name, .. }
            | DartType::Generic { name, .. }
            | DartType::TypeParameter { name, .. } => name,
            DartType::Dynamic => "dynamic",
            DartType::Void => "void",
            DartType::Never => "Never",
            DartType::Function { .. } => "Function",
        }
    }

    /// Display string without the trailing nullability marker.
    ///
    /// Type arguments keep their own markers: `Map<String, int?>`. Rendering
    /// uses a work stack, so arbitrarily deep types are safe.
    pub fn display_name(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![Piece::Bare(self)];
        while let Some(piece) = stack.pop() {
            let ty = match piece {
                Piece::Text(text) => {
                    out.push_str(text);
                    continue;
                }
                Piece::Marked(ty) => {
                    if ty.is_nullable() {
                        stack.push(Piece::Text("?"));
                    }
                    ty
                }
                Piece::Bare(ty) => ty,
            };
            match ty {
                DartType::Generic {
                    name,
                    type_arguments,
                    ..
                } => {
                    out.push_str(name);
                    out.push('<');
                    stack.push(Piece::Text(">"));
                    push_separated(&mut stack, type_arguments);
                }
                DartType::Function {
                    return_type,
                    parameter_types,
                    ..
                } => {
                    stack.push(Piece::Text(")"));
                    push_separated(&mut stack, parameter_types);
                    stack.push(Piece::Text(" Function("));
                    stack.push(Piece::Marked(return_type));
                }
                other => out.push_str(other.base_name()),
            }
        }
        out
    }

    /// Whether the binary format can represent this type without loss
    pub fn is_wire_native(&self) -> bool {
        matches!(
            self,
            DartType::Simple { .. } | DartType::Dynamic | DartType::Void | DartType::Never
        )
    }

    /// The shape this type takes after a trip through the binary format.
    ///
    /// Generic, function and type-parameter types collapse into a simple
    /// type named by [`display_name`](Self::display_name).
    pub fn to_wire_form(&self) -> DartType {
        if self.is_wire_native() {
            return self.clone();
        }
        DartType::Simple {
            name: self.display_name(),
            nullable: self.is_nullable(),
        }
    }
}

/// Pending output of [`DartType::display_name`]
enum Piece<'a> {
    /// A type without its own `?`
    Bare(&'a DartType),
    /// A type followed by its `?`, if nullable
    Marked(&'a DartType),
    Text(&'static str),
}

/// Queue `types` comma-separated, first one on top
fn push_separated<'a>(stack: &mut Vec<Piece<'a>>, types: &'a [DartType]) {
    for (i, ty) in types.iter().enumerate().rev() {
        stack.push(Piece::Marked(ty));
        if i > 0 {
            stack.push(Piece::Text(", "));
        }
    }
}

impl fmt::Display for DartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nullable() {
            write!(f, "{}?", self.display_name())
        } else {
            write!(f, "{}", self.display_name())
        }
    }
}
