use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use crate::error::{Error, Result};

/// Dense row-major matrix of `f64`.
///
/// `rows`/`cols` always agree with `data`; every constructor either builds
/// the rows itself or checks them. Binary operations check shapes and return
/// `Error::DimensionMismatch` instead of panicking.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Vec<f64>>
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Fills a `rows x cols` matrix with uniform draws in
    /// `(-1/sqrt(fan_in), 1/sqrt(fan_in))`.
    ///
    /// `fan_in` is the number of inputs feeding the layer these weights
    /// belong to; for a weight matrix applied as `W · x` it equals `cols`.
    pub fn random_uniform<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        fan_in: usize,
        rng: &mut R,
    ) -> Matrix {
        if rows == 0 || cols == 0 || fan_in == 0 {
            return Matrix::zeros(rows, cols);
        }
        let bound = 1.0 / (fan_in as f64).sqrt();
        let dist = Uniform::new(-bound, bound);
        let data = (0..rows)
            .map(|_| (0..cols).map(|_| dist.sample(rng)).collect())
            .collect();
        Matrix { rows, cols, data }
    }

    /// Wraps nested rows. Every row must have the first row's length.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let cols = data.first().map_or(0, |row| row.len());
        if let Some(row) = data.iter().find(|row| row.len() != cols) {
            return Err(Error::ShapeMismatch {
                what: "matrix row",
                expected: cols,
                actual: row.len(),
            });
        }
        Ok(Matrix {
            rows: data.len(),
            cols,
            data
        })
    }

    /// Number of entries in a `rows x cols` matrix, or `SizeOverflow` if that
    /// does not fit in a `usize`.
    pub fn len_for(rows: usize, cols: usize) -> Result<usize> {
        rows.checked_mul(cols).ok_or(Error::SizeOverflow { rows, cols })
    }

    /// Builds a matrix from a flat row-major slice.
    pub fn from_flat(rows: usize, cols: usize, values: &[f64]) -> Result<Matrix> {
        let expected = Matrix::len_for(rows, cols)?;
        if values.len() != expected {
            return Err(Error::ShapeMismatch {
                what: "flat matrix values",
                expected,
                actual: values.len(),
            });
        }
        let data = if cols == 0 {
            vec![Vec::new(); rows]
        } else {
            values.chunks(cols).map(|row| row.to_vec()).collect()
        };
        Ok(Matrix { rows, cols, data })
    }

    /// Column vector (`n x 1`).
    pub fn column(values: &[f64]) -> Matrix {
        Matrix {
            rows: values.len(),
            cols: 1,
            data: values.iter().map(|&v| vec![v]).collect()
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i]
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i][j]
    }

    /// Row-major copy of every entry.
    pub fn to_flat(&self) -> Vec<f64> {
        self.data.iter().flatten().copied().collect()
    }

    /// Flattens a column vector back into a `Vec`.
    pub fn into_column_vec(self) -> Vec<f64> {
        debug_assert_eq!(self.cols, 1);
        self.data.into_iter().flatten().collect()
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect()
        }
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    /// Matrix product `self · rhs`.
    pub fn dot(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(Error::DimensionMismatch {
                op: "dot",
                lhs: self.shape(),
                rhs: rhs.shape(),
            });
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        Ok(res)
    }

    pub fn add(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("add", rhs, |a, b| a + b)
    }

    pub fn sub(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("subtract", rhs, |a, b| a - b)
    }

    /// Element-wise (Hadamard) product.
    pub fn hadamard(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("multiply", rhs, |a, b| a * b)
    }

    fn zip_with<F>(&self, op: &'static str, rhs: &Matrix, f: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.shape() != rhs.shape() {
            return Err(Error::DimensionMismatch {
                op,
                lhs: self.shape(),
                rhs: rhs.shape(),
            });
        }

        let data = self.data.iter().zip(rhs.data.iter())
            .map(|(row_a, row_b)| {
                row_a.iter().zip(row_b.iter()).map(|(&x, &y)| f(x, y)).collect()
            })
            .collect();

        Ok(Matrix { rows: self.rows, cols: self.cols, data })
    }
}
