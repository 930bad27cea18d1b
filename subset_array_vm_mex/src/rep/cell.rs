use subset_array_vm::value::CellArray;
use subset_array_vm::Value;

use super::{check_index, MxRep};
use crate::array::MxArray;
use crate::class::MxClassId;
use crate::error::{MexError, MexResult};

/// Cell array of element handles. An unset element reads back as an empty
/// matrix.
#[derive(Debug)]
pub struct CellRep {
    rows: usize,
    cols: usize,
    cells: Vec<Option<MxArray>>,
}

impl CellRep {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: (0..rows * cols).map(|_| None).collect(),
        }
    }

    pub(crate) fn from_cells(rows: usize, cols: usize, cells: Vec<Option<MxArray>>) -> Self {
        Self { rows, cols, cells }
    }
}

/// Stored value of an element handle; unset elements are empty matrices
fn element_value(element: Option<&MxArray>) -> MexResult<Value> {
    let mut value = match element {
        Some(a) => a.as_value()?,
        None => Value::null_matrix().storable_value(),
    };
    value.make_storable();
    Ok(value)
}

impl MxRep for CellRep {
    fn dup(&self) -> Box<dyn MxRep> {
        let cells = self.cells.iter().map(|c| c.as_ref().map(MxArray::dup)).collect();
        Box::new(CellRep::from_cells(self.rows, self.cols, cells))
    }

    fn class_id(&self) -> MxClassId {
        MxClassId::Cell
    }

    fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn as_value(&self) -> MexResult<Value> {
        let cells = self
            .cells
            .iter()
            .map(|c| element_value(c.as_ref()))
            .collect::<MexResult<Vec<_>>>()?;
        CellArray::from_cells(self.rows, self.cols, cells)
            .map(Value::Cell)
            .ok_or_else(|| MexError::invalid_data("as_value", "cell count does not match dimensions"))
    }

    fn set_dims(&mut self, rows: usize, cols: usize) -> MexResult<()> {
        self.rows = rows;
        self.cols = cols;
        self.cells.resize_with(rows * cols, || None);
        Ok(())
    }

    fn cell(&self, index: usize) -> MexResult<Option<&MxArray>> {
        check_index("get_cell", index, self.cells.len())?;
        Ok(self.cells[index].as_ref())
    }

    fn set_cell(&mut self, index: usize, value: Option<MxArray>) -> MexResult<()> {
        check_index("set_cell", index, self.cells.len())?;
        self.cells[index] = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_cells_read_as_empty() {
        let rep = CellRep::new(1, 2);
        let value = rep.as_value().unwrap();
        let Value::Cell(c) = value else {
            panic!("expected cell");
        };
        assert!(c.cells.iter().all(|v| v.is_empty() && !v.is_null()));
    }

    #[test]
    fn test_cell_index_checked() {
        let mut rep = CellRep::new(1, 1);
        assert_eq!(
            rep.set_cell(1, None).unwrap_err(),
            MexError::out_of_bound("set_cell", 1, 1)
        );
        rep.set_cell(0, Some(MxArray::create_double_scalar(2.0))).unwrap();
        assert_eq!(rep.cell(0).unwrap().map(|a| a.dims()), Some((1, 1)));
    }
}
