//! Compressed sparse column representation with caller-visible index
//! arrays.
//!
//! `jc` has `cols + 1` entries; entries of column `j` occupy
//! `ir[jc[j]..jc[j+1]]` and the matching slots of the data array. `ir` and
//! the data array both have room for `nzmax` entries, of which the first
//! `jc[cols]` are in use.

use nalgebra::Scalar;
use num_traits::Zero;
use subset_array_vm::value::{Complex64, SparseMatrix};
use subset_array_vm::Value;

use super::MxRep;
use crate::class::{MxClassId, MxComplexity};
use crate::data::MxData;
use crate::error::{MexError, MexResult};

#[derive(Debug, Clone, PartialEq)]
pub struct SparseRep {
    rows: usize,
    cols: usize,
    nzmax: usize,
    ir: Vec<usize>,
    jc: Vec<usize>,
    data: MxData,
}

impl SparseRep {
    /// Empty double sparse matrix with room for `nzmax` entries (at least one)
    pub fn double(rows: usize, cols: usize, nzmax: usize, complexity: MxComplexity) -> Self {
        let nzmax = nzmax.max(1);
        let data = match complexity {
            MxComplexity::Real => MxData::Double(vec![0.0; nzmax]),
            MxComplexity::Complex => MxData::ComplexDouble(vec![Complex64::new(0.0, 0.0); nzmax]),
        };
        Self::with_capacity(rows, cols, nzmax, data)
    }

    /// Empty logical sparse matrix
    pub fn logical(rows: usize, cols: usize, nzmax: usize) -> Self {
        let nzmax = nzmax.max(1);
        Self::with_capacity(rows, cols, nzmax, MxData::Logical(vec![false; nzmax]))
    }

    fn with_capacity(rows: usize, cols: usize, nzmax: usize, data: MxData) -> Self {
        Self {
            rows,
            cols,
            nzmax,
            ir: vec![0; nzmax],
            jc: vec![0; cols + 1],
            data,
        }
    }

    /// Take over existing CSC arrays, padding storage to at least one slot
    pub(crate) fn from_parts(
        rows: usize,
        cols: usize,
        jc: Vec<usize>,
        mut ir: Vec<usize>,
        mut data: MxData,
    ) -> Self {
        let nzmax = ir.len().max(1);
        ir.resize(nzmax, 0);
        data.resize(nzmax);
        Self {
            rows,
            cols,
            nzmax,
            ir,
            jc,
            data,
        }
    }

    /// Number of entries in use, after checking `jc` against the storage
    fn nnz(&self) -> MexResult<usize> {
        if self.jc.len() != self.cols + 1 {
            return Err(MexError::invalid_data(
                "as_value",
                format!("jc has {} entries for {} columns", self.jc.len(), self.cols),
            ));
        }
        let nnz = self.jc[self.cols];
        if nnz > self.ir.len() || nnz > self.data.len() {
            return Err(MexError::invalid_data(
                "as_value",
                format!("jc claims {} entries but nzmax is {}", nnz, self.nzmax),
            ));
        }
        Ok(nnz)
    }

    /// Validated sparse matrix over the used part of `values`. Stored
    /// zeros are dropped.
    fn matrix<T: Scalar + Zero + Copy>(&self, values: &[T]) -> MexResult<SparseMatrix<T>> {
        let nnz = self.nnz()?;
        let checked = SparseMatrix::from_csc(
            self.rows,
            self.cols,
            self.jc.clone(),
            self.ir[..nnz].to_vec(),
            values[..nnz].to_vec(),
        )
        .ok_or_else(|| MexError::invalid_data("as_value", "inconsistent sparse index arrays"))?;

        let mut col_ptr = Vec::with_capacity(self.cols + 1);
        let mut row_idx = Vec::with_capacity(nnz);
        let mut kept = Vec::with_capacity(nnz);
        col_ptr.push(0);
        for j in 0..self.cols {
            for k in checked.col_ptr()[j]..checked.col_ptr()[j + 1] {
                let v = checked.values()[k];
                if !v.is_zero() {
                    row_idx.push(checked.row_idx()[k]);
                    kept.push(v);
                }
            }
            col_ptr.push(kept.len());
        }
        SparseMatrix::from_csc(self.rows, self.cols, col_ptr, row_idx, kept)
            .ok_or_else(|| MexError::invalid_data("as_value", "inconsistent sparse index arrays"))
    }
}

impl MxRep for SparseRep {
    fn dup(&self) -> Box<dyn MxRep> {
        Box::new(self.clone())
    }

    fn class_id(&self) -> MxClassId {
        self.data.class_id()
    }

    fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Logical sparse arrays have no sparse language counterpart and come
    /// back as a dense bool matrix.
    fn as_value(&self) -> MexResult<Value> {
        match &self.data {
            MxData::Double(v) => Ok(Value::SparseMatrix(self.matrix(v)?)),
            MxData::ComplexDouble(v) => Ok(Value::SparseComplexMatrix(self.matrix(v)?)),
            MxData::Logical(v) => {
                let numeric: Vec<f64> = v.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect();
                let s = self.matrix(&numeric)?;
                Ok(Value::BoolMatrix(s.to_dense().map(|x| x != 0.0)))
            }
            other => Err(MexError::invalid_type("as_value", other.class_id())),
        }
    }

    fn is_complex(&self) -> bool {
        self.data.is_complex()
    }

    fn is_sparse(&self) -> bool {
        true
    }

    fn is_logical_scalar_true(&self) -> bool {
        self.dims() == (1, 1)
            && self.jc.get(1) == Some(&1)
            && matches!(&self.data, MxData::Logical(v) if v.first() == Some(&true))
    }

    fn scalar(&self) -> MexResult<f64> {
        self.as_value()?
            .scalar_value()
            .ok_or_else(|| MexError::out_of_bound("get_scalar", 0, 0))
    }

    fn set_dims(&mut self, rows: usize, cols: usize) -> MexResult<()> {
        let used = self.jc.last().copied().unwrap_or(0);
        self.rows = rows;
        self.cols = cols;
        self.jc.resize(cols + 1, used);
        Ok(())
    }

    fn data(&self) -> MexResult<&MxData> {
        Ok(&self.data)
    }

    fn data_mut(&mut self) -> MexResult<&mut MxData> {
        Ok(&mut self.data)
    }

    fn set_data(&mut self, data: MxData) -> MexResult<()> {
        if !self.data.same_layout(&data) {
            return Err(MexError::invalid_type("set_data", self.class_id()));
        }
        self.data = data;
        Ok(())
    }

    fn ir(&self) -> MexResult<&[usize]> {
        Ok(&self.ir)
    }

    fn ir_mut(&mut self) -> MexResult<&mut [usize]> {
        Ok(&mut self.ir)
    }

    fn jc(&self) -> MexResult<&[usize]> {
        Ok(&self.jc)
    }

    fn jc_mut(&mut self) -> MexResult<&mut [usize]> {
        Ok(&mut self.jc)
    }

    fn nzmax(&self) -> MexResult<usize> {
        Ok(self.nzmax)
    }

    fn set_ir(&mut self, ir: Vec<usize>) -> MexResult<()> {
        self.ir = ir;
        Ok(())
    }

    fn set_jc(&mut self, jc: Vec<usize>) -> MexResult<()> {
        self.jc = jc;
        Ok(())
    }

    fn set_nzmax(&mut self, nzmax: usize) -> MexResult<()> {
        let nzmax = nzmax.max(1);
        self.nzmax = nzmax;
        self.ir.resize(nzmax, 0);
        self.data.resize(nzmax);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    #[test]
    fn test_new_sparse_is_empty() {
        let rep = SparseRep::double(3, 2, 0, MxComplexity::Real);
        assert_eq!(rep.nzmax().unwrap(), 1);
        assert_eq!(rep.jc().unwrap(), &[0, 0, 0]);
        assert_eq!(rep.as_value().unwrap(), Value::SparseMatrix(SparseMatrix::zeros(3, 2)));
    }

    #[test]
    fn test_filled_by_caller() {
        // [0 2; 1 0]
        let mut rep = SparseRep::double(2, 2, 2, MxComplexity::Real);
        rep.set_ir(vec![1, 0]).unwrap();
        rep.set_jc(vec![0, 1, 2]).unwrap();
        rep.set_data(MxData::Double(vec![1.0, 2.0])).unwrap();
        let expected = SparseMatrix::from_dense(&DMatrix::from_row_slice(2, 2, &[0.0, 2.0, 1.0, 0.0]));
        assert_eq!(rep.as_value().unwrap(), Value::SparseMatrix(expected));
    }

    #[test]
    fn test_stored_zero_dropped() {
        let mut rep = SparseRep::double(1, 2, 2, MxComplexity::Real);
        rep.set_ir(vec![0, 0]).unwrap();
        rep.set_jc(vec![0, 1, 2]).unwrap();
        rep.set_data(MxData::Double(vec![0.0, 5.0])).unwrap();
        match rep.as_value().unwrap() {
            Value::SparseMatrix(s) => assert_eq!(s.nnz(), 1),
            other => panic!("expected sparse matrix, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_jc_rejected() {
        let mut rep = SparseRep::double(2, 2, 1, MxComplexity::Real);
        rep.set_jc(vec![0, 3, 3]).unwrap();
        assert!(matches!(rep.as_value(), Err(MexError::InvalidData { .. })));
    }

    #[test]
    fn test_non_monotone_jc_rejected() {
        let mut rep = SparseRep::double(2, 2, 2, MxComplexity::Real);
        rep.set_ir(vec![0, 1]).unwrap();
        rep.set_data(MxData::Double(vec![1.0, 2.0])).unwrap();
        rep.set_jc(vec![0, 5, 2]).unwrap();
        assert!(matches!(rep.as_value(), Err(MexError::InvalidData { .. })));
    }

    #[test]
    fn test_logical_sparse_comes_back_dense() {
        let mut rep = SparseRep::logical(1, 2, 1);
        rep.set_ir(vec![0]).unwrap();
        rep.set_jc(vec![0, 0, 1]).unwrap();
        rep.set_data(MxData::Logical(vec![true])).unwrap();
        assert_eq!(
            rep.as_value().unwrap(),
            Value::BoolMatrix(DMatrix::from_row_slice(1, 2, &[false, true]))
        );
    }
}
