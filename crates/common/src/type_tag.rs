//! Type tag definitions for IPPcode24 values.

use std::fmt;

/// Identifies the dynamic type of a stored value.
///
/// Every initialized variable and every literal has exactly one type tag.
/// Tags are never fixed at parse time: a variable's tag is whatever its
/// current value says at the moment it is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Signed 64-bit integer.
    Int,
    /// Boolean.
    Bool,
    /// Character string (escaped form).
    String,
    /// The single `nil` value.
    Nil,
}

/// All type tags, in definition order.
pub const ALL_TYPE_TAGS: [TypeTag; 4] = [TypeTag::Int, TypeTag::Bool, TypeTag::String, TypeTag::Nil];

impl TypeTag {
    /// Returns the source-level name of this type (`int`, `bool`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::Int => "int",
            TypeTag::Bool => "bool",
            TypeTag::String => "string",
            TypeTag::Nil => "nil",
        }
    }

    /// Looks up a type by its source-level name. Matching is exact.
    pub fn from_name(name: &str) -> Option<TypeTag> {
        ALL_TYPE_TAGS.iter().find(|tt| tt.name() == name).copied()
    }

    /// Returns true for the types a READ instruction may request.
    pub fn is_readable(&self) -> bool {
        !matches!(self, TypeTag::Nil)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
