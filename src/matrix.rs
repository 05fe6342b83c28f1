//! Owned row-major 2-D storage.

use crate::{GridError, Result};

/// A generic dense matrix: `rows x cols` cells in one row-major `Vec`.
///
/// Cloning is deep; a clone shares no storage with its source, so
/// mutating one never shows through the other. `set` is the only
/// mutation entry point besides `IndexMut`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseMatrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T> DenseMatrix<T> {
    /// Build from a flat row-major buffer.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        match rows.checked_mul(cols) {
            Some(len) if len == data.len() => Ok(Self { data, rows, cols }),
            _ => Err(GridError::LengthMismatch {
                rows,
                cols,
                len: data.len(),
            }),
        }
    }

    /// Build from nested rows. All rows must share one width; an empty
    /// outer vec yields the 0x0 matrix.
    pub fn from_rows(nested: Vec<Vec<T>>) -> Result<Self> {
        let rows = nested.len();
        let cols = nested.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows * cols);
        for (index, row) in nested.into_iter().enumerate() {
            if row.len() != cols {
                return Err(GridError::RaggedRows {
                    row: index,
                    expected: cols,
                    found: row.len(),
                });
            }
            data.extend(row);
        }
        Ok(Self { data, rows, cols })
    }

    /// Build a single-row 1xN matrix.
    pub fn from_row(cells: Vec<T>) -> Self {
        let cols = cells.len();
        Self {
            data: cells,
            rows: 1,
            cols,
        }
    }

    /// Build by calling `f` for every cell in row-major order.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self { data, rows, cols }
    }

    /// Internal constructor for engine output; the caller guarantees the
    /// buffer length matches the shape.
    pub(crate) fn from_parts(data: Vec<T>, rows: usize, cols: usize) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self { data, rows, cols }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.cols
    }

    /// `(rows, columns)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total cell count.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Checked cell read.
    pub fn get(&self, row: usize, col: usize) -> Result<&T> {
        if row < self.rows && col < self.cols {
            Ok(&self.data[row * self.cols + col])
        } else {
            Err(self.out_of_bounds(row, col))
        }
    }

    /// Checked cell write.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row < self.rows && col < self.cols {
            self.data[row * self.cols + col] = value;
            Ok(())
        } else {
            Err(self.out_of_bounds(row, col))
        }
    }

    /// Row-major cell iterator.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Row-major iterator yielding `(row, col, &cell)`.
    pub fn indexed_iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let cols = self.cols;
        self.data
            .iter()
            .enumerate()
            .map(move |(idx, value)| (idx / cols, idx % cols, value))
    }

    fn row_slice(&self, row: usize) -> &[T] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    fn out_of_bounds(&self, row: usize, col: usize) -> GridError {
        GridError::OutOfBounds {
            row,
            col,
            rows: self.rows,
            cols: self.cols,
        }
    }
}

impl<T: Clone> DenseMatrix<T> {
    /// Build with every cell set to `value`.
    pub fn from_elem(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    /// Copy out the cells of a single-row or single-column matrix.
    pub fn to_flat_vec(&self) -> Result<Vec<T>> {
        if self.rows == 1 || self.cols == 1 {
            Ok(self.data.clone())
        } else {
            Err(GridError::NotVector {
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Stack `self` above `bottom`. Column counts must match.
    pub fn concat_vertical(&self, bottom: &Self) -> Result<Self> {
        if self.cols != bottom.cols {
            return Err(GridError::ShapeMismatch {
                left: self.shape(),
                right: bottom.shape(),
            });
        }
        let mut data = Vec::with_capacity(self.data.len() + bottom.data.len());
        data.extend_from_slice(&self.data);
        data.extend_from_slice(&bottom.data);
        Ok(Self {
            data,
            rows: self.rows + bottom.rows,
            cols: self.cols,
        })
    }

    /// Place `self` beside `right`. Row counts must match.
    pub fn concat_horizontal(&self, right: &Self) -> Result<Self> {
        if self.rows != right.rows {
            return Err(GridError::ShapeMismatch {
                left: self.shape(),
                right: right.shape(),
            });
        }
        let cols = self.cols + right.cols;
        let mut data = Vec::with_capacity(self.rows * cols);
        for r in 0..self.rows {
            data.extend_from_slice(self.row_slice(r));
            data.extend_from_slice(right.row_slice(r));
        }
        Ok(Self {
            data,
            rows: self.rows,
            cols,
        })
    }
}

impl<T: Default + Clone> DenseMatrix<T> {
    /// Build a default-initialized `rows x cols` matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::from_elem(rows, cols, T::default())
    }
}

impl<T> std::ops::Index<(usize, usize)> for DenseMatrix<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(
            row < self.rows && col < self.cols,
            "position ({row}, {col}) out of bounds for {}x{} matrix",
            self.rows,
            self.cols
        );
        &self.data[row * self.cols + col]
    }
}

impl<T> std::ops::IndexMut<(usize, usize)> for DenseMatrix<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(
            row < self.rows && col < self.cols,
            "position ({row}, {col}) out of bounds for {}x{} matrix",
            self.rows,
            self.cols
        );
        &mut self.data[row * self.cols + col]
    }
}

/// Shape-equality guard shared by zip and elementwise arithmetic.
pub(crate) fn ensure_same_shape<A, B>(
    left: &DenseMatrix<A>,
    right: &DenseMatrix<B>,
) -> Result<()> {
    if left.shape() == right.shape() {
        Ok(())
    } else {
        Err(GridError::ShapeMismatch {
            left: left.shape(),
            right: right.shape(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_shape_checked() {
        let m = DenseMatrix::from_vec(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m[(1, 2)], 6);

        let err = DenseMatrix::from_vec(2, 2, vec![1, 2, 3]).unwrap_err();
        assert!(matches!(err, GridError::LengthMismatch { len: 3, .. }));
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = DenseMatrix::from_rows(vec![vec![1, 2], vec![3]]).unwrap_err();
        assert!(matches!(
            err,
            GridError::RaggedRows {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_from_rows_empty_is_0x0() {
        let m = DenseMatrix::<i32>::from_rows(vec![]).unwrap();
        assert_eq!(m.shape(), (0, 0));
        assert!(m.is_empty());
    }

    #[test]
    fn test_from_row_is_1xn() {
        let m = DenseMatrix::from_row(vec![88, 77, 66, 55]);
        assert_eq!(m.shape(), (1, 4));
        assert_eq!(m[(0, 2)], 66);
    }

    #[test]
    fn test_new_is_default_initialized() {
        let m: DenseMatrix<i64> = DenseMatrix::new(2, 2);
        assert!(m.iter().all(|&v| v == 0));
        let s: DenseMatrix<String> = DenseMatrix::new(1, 2);
        assert!(s.iter().all(String::is_empty));
    }

    #[test]
    fn test_get_set_bounds() {
        let mut m = DenseMatrix::from_fn(2, 2, |i, j| i + j);
        assert_eq!(*m.get(1, 1).unwrap(), 2);
        m.set(1, 1, 9).unwrap();
        assert_eq!(*m.get(1, 1).unwrap(), 9);

        let err = m.get(2, 0).unwrap_err();
        assert!(matches!(
            err,
            GridError::OutOfBounds {
                row: 2,
                col: 0,
                rows: 2,
                cols: 2
            }
        ));
        assert!(m.set(0, 5, 1).is_err());
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_index_panics_out_of_range() {
        let m = DenseMatrix::from_row(vec![1]);
        let _ = m[(0, 1)];
    }

    #[test]
    fn test_indexed_iter_positions() {
        let m = DenseMatrix::from_fn(2, 3, |i, j| i * 3 + j);
        let cells: Vec<_> = m.indexed_iter().map(|(i, j, &v)| (i, j, v)).collect();
        assert_eq!(
            cells,
            vec![
                (0, 0, 0),
                (0, 1, 1),
                (0, 2, 2),
                (1, 0, 3),
                (1, 1, 4),
                (1, 2, 5)
            ]
        );
    }

    #[test]
    fn test_to_flat_vec_needs_vector_shape() {
        let row = DenseMatrix::from_row(vec![1, 2, 3]);
        assert_eq!(row.to_flat_vec().unwrap(), vec![1, 2, 3]);

        let col = DenseMatrix::from_vec(3, 1, vec![4, 5, 6]).unwrap();
        assert_eq!(col.to_flat_vec().unwrap(), vec![4, 5, 6]);

        let square = DenseMatrix::from_fn(2, 2, |i, j| i + j);
        assert!(matches!(
            square.to_flat_vec().unwrap_err(),
            GridError::NotVector { rows: 2, cols: 2 }
        ));
    }

    #[test]
    fn test_concat_vertical() {
        let top = DenseMatrix::from_rows(vec![vec![1, 2]]).unwrap();
        let bottom = DenseMatrix::from_rows(vec![vec![3, 4], vec![5, 6]]).unwrap();
        let stacked = top.concat_vertical(&bottom).unwrap();
        assert_eq!(stacked.shape(), (3, 2));
        assert_eq!(stacked[(2, 1)], 6);

        let narrow = DenseMatrix::from_row(vec![9]);
        assert!(matches!(
            top.concat_vertical(&narrow).unwrap_err(),
            GridError::ShapeMismatch { .. }
        ));
    }

    #[test]
    fn test_concat_horizontal() {
        let left = DenseMatrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let right = DenseMatrix::from_vec(2, 1, vec![9, 8]).unwrap();
        let wide = left.concat_horizontal(&right).unwrap();
        assert_eq!(wide.shape(), (2, 3));
        assert_eq!(wide[(0, 2)], 9);
        assert_eq!(wide[(1, 0)], 3);

        let tall = DenseMatrix::from_vec(3, 1, vec![1, 2, 3]).unwrap();
        assert!(left.concat_horizontal(&tall).is_err());
    }

    #[test]
    fn test_clone_is_deep() {
        let source = DenseMatrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let mut copy = source.clone();
        copy.set(0, 0, 99).unwrap();
        assert_eq!(source[(0, 0)], 1);
        assert_eq!(copy[(0, 0)], 99);
    }

    #[test]
    fn test_structural_equality() {
        let a = DenseMatrix::from_fn(2, 2, |i, j| i * 2 + j);
        let b = DenseMatrix::from_vec(2, 2, vec![0, 1, 2, 3]).unwrap();
        assert_eq!(a, b);
        // Same cells, different shape.
        let c = DenseMatrix::from_vec(1, 4, vec![0, 1, 2, 3]).unwrap();
        assert_ne!(a, c);
    }
}
