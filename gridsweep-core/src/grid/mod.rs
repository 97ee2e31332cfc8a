//! Lattice graphs over 2D and 3D integer grids.
//!
//! A [`GridSpec`] describes the lattice, [`EdgeWeightPolicy`] decides how
//! each directed edge is weighted, and [`GraphGenerator`] serialises the
//! result into the line-oriented format the solver consumes. Connectivity is
//! strictly axis-aligned: 4 neighbours in 2D and 6 in 3D, never diagonal.

mod generator;
mod suite;
mod weights;

use std::fmt;

pub use generator::{GenerationSummary, GraphGenerator, generate};
pub use suite::StandardCase;
pub use weights::{EdgeWeightPolicy, MIN_WEIGHT, WeightSampler};

use crate::error::GenerationError;

/// Number of spatial axes a grid spans.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Dimensionality {
    /// A planar `X x Y` grid.
    TwoD,
    /// A volumetric `X x Y x Z` grid.
    ThreeD,
}

impl Dimensionality {
    /// Returns the value passed to the solver's `--flag3d` argument.
    #[must_use]
    pub const fn solver_flag(self) -> &'static str {
        match self {
            Self::TwoD => "0",
            Self::ThreeD => "1",
        }
    }

    const fn axis_count(self) -> usize {
        match self {
            Self::TwoD => 2,
            Self::ThreeD => 3,
        }
    }
}

impl fmt::Display for Dimensionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TwoD => "2D",
            Self::ThreeD => "3D",
        })
    }
}

/// Lattice axis.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Axis {
    /// First coordinate.
    X,
    /// Second coordinate.
    Y,
    /// Third coordinate; always zero on 2D grids.
    Z,
}

impl Axis {
    /// Lowercase axis name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }
}

/// Neighbour offsets in emission order: `+x, -x, +y, -y, +z, -z`.
const NEIGHBOUR_STEPS: [(Axis, bool); 6] = [
    (Axis::X, true),
    (Axis::X, false),
    (Axis::Y, true),
    (Axis::Y, false),
    (Axis::Z, true),
    (Axis::Z, false),
];

/// Integer lattice coordinate. `z` is zero for cells of a 2D grid.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Cell {
    /// First coordinate.
    pub x: usize,
    /// Second coordinate.
    pub y: usize,
    /// Third coordinate.
    pub z: usize,
}

impl Cell {
    /// Creates a 3D coordinate.
    #[must_use]
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    /// Creates a 2D coordinate (`z = 0`).
    #[must_use]
    pub const fn planar(x: usize, y: usize) -> Self {
        Self { x, y, z: 0 }
    }

    const fn get(self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    const fn with(self, axis: Axis, value: usize) -> Self {
        match axis {
            Axis::X => Self { x: value, ..self },
            Axis::Y => Self { y: value, ..self },
            Axis::Z => Self { z: value, ..self },
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Validated grid extents.
///
/// # Examples
/// ```
/// use gridsweep_core::{Cell, GridSpec};
///
/// let grid = GridSpec::two_d(3, 3).expect("extents are positive");
/// assert_eq!(grid.directed_edge_count(), 24);
/// assert!(grid.contains(Cell::planar(2, 2)));
/// assert!(!grid.contains(Cell::planar(3, 0)));
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct GridSpec {
    x: usize,
    y: usize,
    z: usize,
    dimensionality: Dimensionality,
}

impl GridSpec {
    /// Creates a planar grid.
    ///
    /// # Errors
    /// Returns [`GenerationError::ZeroExtent`] when either extent is zero.
    pub fn two_d(x: usize, y: usize) -> Result<Self, GenerationError> {
        check_extent(Axis::X, x)?;
        check_extent(Axis::Y, y)?;
        Ok(Self::new_unchecked(x, y, 1, Dimensionality::TwoD))
    }

    /// Creates a volumetric grid.
    ///
    /// # Errors
    /// Returns [`GenerationError::ZeroExtent`] when any extent is zero.
    pub fn three_d(x: usize, y: usize, z: usize) -> Result<Self, GenerationError> {
        check_extent(Axis::X, x)?;
        check_extent(Axis::Y, y)?;
        check_extent(Axis::Z, z)?;
        Ok(Self::new_unchecked(x, y, z, Dimensionality::ThreeD))
    }

    pub(crate) const fn new_unchecked(
        x: usize,
        y: usize,
        z: usize,
        dimensionality: Dimensionality,
    ) -> Self {
        Self {
            x,
            y,
            z,
            dimensionality,
        }
    }

    /// Returns whether the grid is planar or volumetric.
    #[must_use]
    pub const fn dimensionality(self) -> Dimensionality {
        self.dimensionality
    }

    /// Returns `[X, Y, Z]`; `Z` is 1 for planar grids.
    #[must_use]
    pub const fn extents(self) -> [usize; 3] {
        [self.x, self.y, self.z]
    }

    const fn extent(self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Number of lattice cells.
    #[must_use]
    pub const fn cell_count(self) -> usize {
        self.x.saturating_mul(self.y).saturating_mul(self.z)
    }

    /// Returns `true` when `cell` lies inside the grid.
    #[must_use]
    pub const fn contains(self, cell: Cell) -> bool {
        cell.x < self.x && cell.y < self.y && cell.z < self.z
    }

    /// Enumerates every cell, `x` outermost and `z` innermost.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        (0..self.x).flat_map(move |x| {
            (0..self.y).flat_map(move |y| (0..self.z).map(move |z| Cell::new(x, y, z)))
        })
    }

    /// Enumerates the in-bounds axis-aligned neighbours of `cell` in the
    /// order `+x, -x, +y, -y, +z, -z`.
    pub fn neighbours(self, cell: Cell) -> impl Iterator<Item = Cell> {
        NEIGHBOUR_STEPS
            .iter()
            .take(self.dimensionality.axis_count().saturating_mul(2))
            .filter_map(move |&(axis, forward)| self.step(cell, axis, forward))
    }

    fn step(self, cell: Cell, axis: Axis, forward: bool) -> Option<Cell> {
        let coordinate = cell.get(axis);
        let next = if forward {
            coordinate
                .checked_add(1)
                .filter(|&value| value < self.extent(axis))?
        } else {
            coordinate.checked_sub(1)?
        };
        Some(cell.with(axis, next))
    }

    /// Number of directed edges the generator emits for this grid.
    ///
    /// Each axis with extent `n` contributes `2 * (n - 1)` edges per line of
    /// cells along it.
    #[must_use]
    pub fn directed_edge_count(self) -> usize {
        [Axis::X, Axis::Y, Axis::Z]
            .into_iter()
            .map(|axis| {
                let extent = self.extent(axis);
                let lines = self.cell_count().checked_div(extent).unwrap_or(0);
                extent.saturating_sub(1).saturating_mul(2).saturating_mul(lines)
            })
            .fold(0_usize, usize::saturating_add)
    }
}

impl fmt::Display for GridSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dimensionality {
            Dimensionality::TwoD => write!(f, "{}x{}", self.x, self.y),
            Dimensionality::ThreeD => write!(f, "{}x{}x{}", self.x, self.y, self.z),
        }
    }
}

const fn check_extent(axis: Axis, extent: usize) -> Result<(), GenerationError> {
    if extent == 0 {
        return Err(GenerationError::ZeroExtent { axis: axis.name() });
    }
    Ok(())
}
