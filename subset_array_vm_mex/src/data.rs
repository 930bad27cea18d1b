//! Typed raw storage behind dense and sparse representations

use subset_array_vm::value::{Complex32, Complex64};

use crate::class::{MxClassId, MxComplexity};

/// Column-major element storage of one external array.
///
/// Complex data is interleaved: each element carries its real and
/// imaginary part together.
#[derive(Debug, Clone, PartialEq)]
pub enum MxData {
    Double(Vec<f64>),
    Single(Vec<f32>),
    Int8(Vec<i8>),
    Uint8(Vec<u8>),
    Int16(Vec<i16>),
    Uint16(Vec<u16>),
    Int32(Vec<i32>),
    Uint32(Vec<u32>),
    Int64(Vec<i64>),
    Uint64(Vec<u64>),
    Logical(Vec<bool>),
    /// UTF-16 code units
    Char(Vec<u16>),
    ComplexDouble(Vec<Complex64>),
    ComplexSingle(Vec<Complex32>),
}

/// Apply `$body` to the vector inside any `MxData` variant
macro_rules! with_vec {
    ($data:expr, $v:ident => $body:expr) => {
        match $data {
            MxData::Double($v) => $body,
            MxData::Single($v) => $body,
            MxData::Int8($v) => $body,
            MxData::Uint8($v) => $body,
            MxData::Int16($v) => $body,
            MxData::Uint16($v) => $body,
            MxData::Int32($v) => $body,
            MxData::Uint32($v) => $body,
            MxData::Int64($v) => $body,
            MxData::Uint64($v) => $body,
            MxData::Logical($v) => $body,
            MxData::Char($v) => $body,
            MxData::ComplexDouble($v) => $body,
            MxData::ComplexSingle($v) => $body,
        }
    };
}

impl MxData {
    /// `len` zero elements of the given class, or `None` when the class has
    /// no flat storage (cell, struct) or cannot be complex
    pub fn zeros(class: MxClassId, complexity: MxComplexity, len: usize) -> Option<Self> {
        let complex = complexity == MxComplexity::Complex;
        let data = match class {
            MxClassId::Double if complex => MxData::ComplexDouble(vec![Complex64::new(0.0, 0.0); len]),
            MxClassId::Single if complex => MxData::ComplexSingle(vec![Complex32::new(0.0, 0.0); len]),
            _ if complex => return None,
            MxClassId::Double => MxData::Double(vec![0.0; len]),
            MxClassId::Single => MxData::Single(vec![0.0; len]),
            MxClassId::Int8 => MxData::Int8(vec![0; len]),
            MxClassId::Uint8 => MxData::Uint8(vec![0; len]),
            MxClassId::Int16 => MxData::Int16(vec![0; len]),
            MxClassId::Uint16 => MxData::Uint16(vec![0; len]),
            MxClassId::Int32 => MxData::Int32(vec![0; len]),
            MxClassId::Uint32 => MxData::Uint32(vec![0; len]),
            MxClassId::Int64 => MxData::Int64(vec![0; len]),
            MxClassId::Uint64 => MxData::Uint64(vec![0; len]),
            MxClassId::Logical => MxData::Logical(vec![false; len]),
            MxClassId::Char => MxData::Char(vec![0; len]),
            MxClassId::Cell | MxClassId::Struct => return None,
        };
        Some(data)
    }

    pub fn class_id(&self) -> MxClassId {
        match self {
            MxData::Double(_) | MxData::ComplexDouble(_) => MxClassId::Double,
            MxData::Single(_) | MxData::ComplexSingle(_) => MxClassId::Single,
            MxData::Int8(_) => MxClassId::Int8,
            MxData::Uint8(_) => MxClassId::Uint8,
            MxData::Int16(_) => MxClassId::Int16,
            MxData::Uint16(_) => MxClassId::Uint16,
            MxData::Int32(_) => MxClassId::Int32,
            MxData::Uint32(_) => MxClassId::Uint32,
            MxData::Int64(_) => MxClassId::Int64,
            MxData::Uint64(_) => MxClassId::Uint64,
            MxData::Logical(_) => MxClassId::Logical,
            MxData::Char(_) => MxClassId::Char,
        }
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, MxData::ComplexDouble(_) | MxData::ComplexSingle(_))
    }

    pub fn complexity(&self) -> MxComplexity {
        MxComplexity::from_flag(self.is_complex())
    }

    pub fn len(&self) -> usize {
        with_vec!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grow with zeros or truncate to `len` elements
    pub fn resize(&mut self, len: usize) {
        with_vec!(self, v => v.resize(len, Default::default()))
    }

    /// Same class and complexity, so that one may replace the other
    pub fn same_layout(&self, other: &MxData) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// First element as a double. Complex data contributes its real part.
    pub fn first_as_f64(&self) -> Option<f64> {
        match self {
            MxData::Double(v) => v.first().copied(),
            MxData::Single(v) => v.first().map(|&x| f64::from(x)),
            MxData::Int8(v) => v.first().map(|&x| f64::from(x)),
            MxData::Uint8(v) => v.first().map(|&x| f64::from(x)),
            MxData::Int16(v) => v.first().map(|&x| f64::from(x)),
            MxData::Uint16(v) => v.first().map(|&x| f64::from(x)),
            MxData::Int32(v) => v.first().map(|&x| f64::from(x)),
            MxData::Uint32(v) => v.first().map(|&x| f64::from(x)),
            MxData::Int64(v) => v.first().map(|&x| x as f64),
            MxData::Uint64(v) => v.first().map(|&x| x as f64),
            MxData::Logical(v) => v.first().map(|&b| if b { 1.0 } else { 0.0 }),
            MxData::Char(v) => v.first().map(|&c| f64::from(c)),
            MxData::ComplexDouble(v) => v.first().map(|z| z.re),
            MxData::ComplexSingle(v) => v.first().map(|z| f64::from(z.re)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_respects_complexity() {
        let d = MxData::zeros(MxClassId::Double, MxComplexity::Complex, 3).unwrap();
        assert!(d.is_complex());
        assert_eq!(d.len(), 3);
        assert!(MxData::zeros(MxClassId::Int8, MxComplexity::Complex, 1).is_none());
        assert!(MxData::zeros(MxClassId::Cell, MxComplexity::Real, 1).is_none());
    }

    #[test]
    fn test_resize_pads_with_zero() {
        let mut d = MxData::Int16(vec![4, 5]);
        d.resize(4);
        assert_eq!(d, MxData::Int16(vec![4, 5, 0, 0]));
        d.resize(1);
        assert_eq!(d, MxData::Int16(vec![4]));
    }

    #[test]
    fn test_same_layout() {
        assert!(MxData::Double(vec![]).same_layout(&MxData::Double(vec![1.0])));
        assert!(!MxData::Double(vec![]).same_layout(&MxData::ComplexDouble(vec![])));
    }
}
