use super::Value;

/// Cell array: a column-major grid of arbitrary values
#[derive(Debug, Clone, PartialEq)]
pub struct CellArray {
    pub rows: usize,
    pub cols: usize,
    /// Column-major, `rows * cols` entries
    pub cells: Vec<Value>,
}

impl CellArray {
    /// `rows x cols` cell array of empty matrices
    pub fn new(rows: usize, cols: usize) -> Self {
        let empty = Value::null_matrix().storable_value();
        Self {
            rows,
            cols,
            cells: vec![empty; rows * cols],
        }
    }

    /// Build from column-major cells. Returns `None` if the count is wrong.
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<Value>) -> Option<Self> {
        if cells.len() != rows * cols {
            return None;
        }
        Some(Self { rows, cols, cells })
    }

    /// 1xN row of cells
    pub fn row(cells: Vec<Value>) -> Self {
        let cols = cells.len();
        Self {
            rows: if cols == 0 { 0 } else { 1 },
            cols,
            cells,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, r: usize, c: usize) -> Option<&Value> {
        if r >= self.rows || c >= self.cols {
            return None;
        }
        self.cells.get(c * self.rows + r)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
