use core::fmt;
use core::ops::{Index, IndexMut};

use alloc::vec::Vec;
use ndarray::Array2;
use serde::Serialize;

use crate::*;

/// Fixed-size 2D board addressed by `(x, y)`.
///
/// Cells are kept row-major, so every traversal this type offers (`iter`, `count`, `index_of`, ...) walks the board
/// in raster order: `y` outer, `x` inner, starting at `(0, 0)`.
///
/// Serialize only; `from_vec` is the way back in, since it checks the shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Grid<T> {
    size: Coord2,
    cells: Array2<T>,
}

impl<T> Grid<T> {
    /// Builds a grid by calling `generator` once per cell, in raster order.
    pub fn from_fn(size: Coord2, mut generator: impl FnMut(Coord2) -> T) -> Self {
        let (width, height) = size;
        let cells = Array2::from_shape_fn((usize::from(height), usize::from(width)), |(y, x)| {
            generator((x as Coord, y as Coord))
        });
        Self { size, cells }
    }

    /// Builds a grid from cells listed in raster order.
    pub fn from_vec(size: Coord2, cells: Vec<T>) -> Result<Self> {
        let (width, height) = size;
        let cells = Array2::from_shape_vec((usize::from(height), usize::from(width)), cells)
            .map_err(|_| GameError::InvalidBoardShape)?;
        Ok(Self { size, cells })
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    pub fn width(&self) -> Coord {
        self.size.0
    }

    pub fn height(&self) -> Coord {
        self.size.1
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        coords.0 < self.size.0 && coords.1 < self.size.1
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn get(&self, coords: Coord2) -> Result<&T> {
        let coords = self.validate_coords(coords)?;
        Ok(&self.cells[coords.to_nd_index()])
    }

    pub fn set(&mut self, coords: Coord2, value: T) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        self.cells[coords.to_nd_index()] = value;
        Ok(())
    }

    pub fn swap(&mut self, a: Coord2, b: Coord2) -> Result<()> {
        let a = self.validate_coords(a)?;
        let b = self.validate_coords(b)?;
        self.cells.swap(a.to_nd_index(), b.to_nd_index());
        Ok(())
    }

    /// Coordinates of the `index`-th cell in raster order.
    pub fn coords_at(&self, index: CellCount) -> Option<Coord2> {
        if index >= self.total_cells() {
            return None;
        }
        let width = CellCount::from(self.size.0);
        Some(((index % width) as Coord, (index / width) as Coord))
    }

    /// Raster index of `coords`, the inverse of [`Grid::coords_at`].
    pub fn raster_index(&self, coords: Coord2) -> Result<CellCount> {
        let (x, y) = self.validate_coords(coords)?;
        Ok(CellCount::from(y) * CellCount::from(self.size.0) + CellCount::from(x))
    }

    pub fn iter_coords(&self) -> impl Iterator<Item = Coord2> + use<T> {
        let (width, height) = self.size;
        (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord2, &T)> {
        self.cells
            .indexed_iter()
            .map(|((y, x), cell)| ((x as Coord, y as Coord), cell))
    }

    pub fn count_where(&self, mut predicate: impl FnMut(&T) -> bool) -> CellCount {
        self.cells.iter().filter(|&cell| predicate(cell)).count() as CellCount
    }

    pub fn position(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<Coord2> {
        self.iter()
            .find(|&(_, cell)| predicate(cell))
            .map(|(coords, _)| coords)
    }
}

impl<T: Clone> Grid<T> {
    pub fn filled(size: Coord2, value: T) -> Self {
        let (width, height) = size;
        Self {
            size,
            cells: Array2::from_elem((usize::from(height), usize::from(width)), value),
        }
    }

    /// Resets every cell to `value` without reallocating.
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }
}

impl<T: PartialEq> Grid<T> {
    pub fn count(&self, value: &T) -> CellCount {
        self.count_where(|cell| cell == value)
    }

    pub fn index_of(&self, value: &T) -> Option<Coord2> {
        self.position(|cell| cell == value)
    }
}

impl<T: Default> Grid<T> {
    pub fn new(size: Coord2) -> Self {
        Self::from_fn(size, |_| T::default())
    }
}

impl<T> Index<Coord2> for Grid<T> {
    type Output = T;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl<T> IndexMut<Coord2> for Grid<T> {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}

impl<T: fmt::Display> fmt::Display for Grid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.size;
        writeln!(f, "[")?;
        for y in 0..height {
            write!(f, "  [")?;
            for x in 0..width {
                if x > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self[(x, y)])?;
            }
            write!(f, "]")?;
            if y + 1 < height {
                write!(f, ",")?;
            }
            writeln!(f)?;
        }
        write!(f, "]")
    }
}
