//! Array classes and complexity flags of the external API

use std::fmt;

/// Class of an external array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MxClassId {
    Cell,
    Struct,
    Logical,
    Char,
    Double,
    Single,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
}

impl MxClassId {
    /// Class name as reported by `mxGetClassName`
    pub fn name(self) -> &'static str {
        match self {
            MxClassId::Cell => "cell",
            MxClassId::Struct => "struct",
            MxClassId::Logical => "logical",
            MxClassId::Char => "char",
            MxClassId::Double => "double",
            MxClassId::Single => "single",
            MxClassId::Int8 => "int8",
            MxClassId::Uint8 => "uint8",
            MxClassId::Int16 => "int16",
            MxClassId::Uint16 => "uint16",
            MxClassId::Int32 => "int32",
            MxClassId::Uint32 => "uint32",
            MxClassId::Int64 => "int64",
            MxClassId::Uint64 => "uint64",
        }
    }

    /// Double, single and the integer classes
    pub fn is_numeric(self) -> bool {
        !matches!(
            self,
            MxClassId::Cell | MxClassId::Struct | MxClassId::Logical | MxClassId::Char
        )
    }

    pub fn is_integer(self) -> bool {
        self.is_numeric() && !matches!(self, MxClassId::Double | MxClassId::Single)
    }

    /// Size in bytes of one element. Complex elements are interleaved, so
    /// they take twice the real size. Containers hold one handle per
    /// element.
    pub fn element_size(self, complexity: MxComplexity) -> usize {
        let real = match self {
            MxClassId::Cell | MxClassId::Struct => std::mem::size_of::<usize>(),
            MxClassId::Logical | MxClassId::Int8 | MxClassId::Uint8 => 1,
            MxClassId::Char | MxClassId::Int16 | MxClassId::Uint16 => 2,
            MxClassId::Single | MxClassId::Int32 | MxClassId::Uint32 => 4,
            MxClassId::Double | MxClassId::Int64 | MxClassId::Uint64 => 8,
        };
        match complexity {
            MxComplexity::Complex if self.is_numeric() => real * 2,
            _ => real,
        }
    }
}

impl fmt::Display for MxClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether numeric storage carries imaginary parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MxComplexity {
    #[default]
    Real,
    Complex,
}

impl MxComplexity {
    pub fn from_flag(is_complex: bool) -> Self {
        if is_complex {
            MxComplexity::Complex
        } else {
            MxComplexity::Real
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_sizes() {
        assert_eq!(MxClassId::Double.element_size(MxComplexity::Real), 8);
        assert_eq!(MxClassId::Double.element_size(MxComplexity::Complex), 16);
        assert_eq!(MxClassId::Char.element_size(MxComplexity::Real), 2);
        assert_eq!(MxClassId::Logical.element_size(MxComplexity::Complex), 1);
    }

    #[test]
    fn test_integer_classes() {
        assert!(MxClassId::Uint16.is_integer());
        assert!(!MxClassId::Single.is_integer());
        assert!(!MxClassId::Char.is_numeric());
    }
}
