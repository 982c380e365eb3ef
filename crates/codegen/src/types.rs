// Static types of the expression language
//
// Every node of the typed tree carries one of these after checking.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
    /// Platform word size
    Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    W32,
    W64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Nil,
    Bool,
    Int(IntWidth),
    Uint(IntWidth),
    Float(FloatWidth),
    /// Complex number whose parts have the given float width
    Complex(FloatWidth),
    /// Arbitrary-precision decimal
    Decimal,
    String,
    Array(Box<Type>),
    /// String-keyed map
    Map(Box<Type>),
    /// Reference to a value of the inner type; never implicitly numeric
    Ref(Box<Type>),
    Func,
    /// Statically unknown, checked at run time
    Any,
}

impl Type {
    /// The numeric type predicate: integers of any width and signedness,
    /// floats, complex numbers and decimals. References are not numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Type::Int(_) | Type::Uint(_) | Type::Float(_) | Type::Complex(_) | Type::Decimal
        )
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Int(_) | Type::Uint(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Type::Float(_))
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, Type::Complex(_))
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Type::Any)
    }

    /// Strip every level of reference; native operators look through them.
    pub fn dereferenced(&self) -> &Type {
        match self {
            Type::Ref(inner) => inner.dereferenced(),
            other => other,
        }
    }

    /// Element type shared by all items, `Any` when they differ
    pub fn common<'a>(mut types: impl Iterator<Item = &'a Type>) -> Type {
        let Some(first) = types.next() else {
            return Type::Any;
        };
        if types.all(|t| t == first) {
            first.clone()
        } else {
            Type::Any
        }
    }
}

impl fmt::Display for IntWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntWidth::W8 => write!(f, "8"),
            IntWidth::W16 => write!(f, "16"),
            IntWidth::W32 => write!(f, "32"),
            IntWidth::W64 => write!(f, "64"),
            IntWidth::Size => write!(f, "size"),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Nil => write!(f, "nil"),
            Type::Bool => write!(f, "bool"),
            Type::Int(w) => write!(f, "int{}", w),
            Type::Uint(w) => write!(f, "uint{}", w),
            Type::Float(FloatWidth::W32) => write!(f, "float32"),
            Type::Float(FloatWidth::W64) => write!(f, "float64"),
            Type::Complex(FloatWidth::W32) => write!(f, "complex64"),
            Type::Complex(FloatWidth::W64) => write!(f, "complex128"),
            Type::Decimal => write!(f, "decimal"),
            Type::String => write!(f, "string"),
            Type::Array(elem) => write!(f, "[]{}", elem),
            Type::Map(elem) => write!(f, "map[string]{}", elem),
            Type::Ref(inner) => write!(f, "&{}", inner),
            Type::Func => write!(f, "func"),
            Type::Any => write!(f, "any"),
        }
    }
}
