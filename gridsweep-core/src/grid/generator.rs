//! Serialisation of grid graphs into the solver's input format.
//!
//! ```text
//! X Y [Z]
//! Sx Sy [Sz]
//! x y [z] nx ny [nz] w.ww
//! ...
//! ```

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use tracing::{info, instrument};

use super::{Cell, Dimensionality, EdgeWeightPolicy, GridSpec};
use crate::error::GenerationError;

/// Outcome of writing a graph file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GenerationSummary {
    /// File that was written.
    pub path: PathBuf,
    /// Number of lattice cells.
    pub cells: usize,
    /// Number of directed edge records.
    pub edges: usize,
}

/// Validated generator inputs for one grid graph.
///
/// # Examples
/// ```
/// use gridsweep_core::{Cell, EdgeWeightPolicy, GraphGenerator, GridSpec};
///
/// let grid = GridSpec::two_d(2, 1).expect("valid grid");
/// let generator = GraphGenerator::new(grid, EdgeWeightPolicy::Uniform(1.0), Cell::planar(0, 0))
///     .expect("valid generator");
/// let mut buffer = Vec::new();
/// let edges = generator.write_to(&mut buffer).expect("in-memory write");
/// assert_eq!(edges, 2);
/// assert_eq!(
///     String::from_utf8(buffer).expect("utf-8"),
///     "2 1\n0 0\n0 0 1 0 1.00\n1 0 0 0 1.00\n",
/// );
/// ```
#[derive(Clone, Debug)]
pub struct GraphGenerator {
    grid: GridSpec,
    policy: EdgeWeightPolicy,
    source: Cell,
}

impl GraphGenerator {
    /// Validates the weight policy and source vertex against `grid`.
    ///
    /// # Errors
    /// Returns [`GenerationError::SourceOutOfBounds`] when `source` is outside
    /// the grid, or the policy's validation error.
    pub fn new(
        grid: GridSpec,
        policy: EdgeWeightPolicy,
        source: Cell,
    ) -> Result<Self, GenerationError> {
        if !grid.contains(source) {
            return Err(GenerationError::SourceOutOfBounds {
                vertex: source,
                grid,
            });
        }
        policy.validate()?;
        Ok(Self {
            grid,
            policy,
            source,
        })
    }

    /// Returns the grid being generated.
    #[must_use]
    pub const fn grid(&self) -> GridSpec {
        self.grid
    }

    /// Writes the header and every directed edge to `writer`, returning the
    /// number of edge records.
    ///
    /// # Errors
    /// Propagates any error raised by `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<usize> {
        let dimensionality = self.grid.dimensionality();
        let [x, y, z] = self.grid.extents();
        match dimensionality {
            Dimensionality::TwoD => writeln!(writer, "{x} {y}")?,
            Dimensionality::ThreeD => writeln!(writer, "{x} {y} {z}")?,
        }
        write_cell(&mut writer, self.source, dimensionality)?;
        writeln!(writer)?;

        let mut sampler = self.policy.sampler();
        let mut edges = 0_usize;
        for cell in self.grid.cells() {
            for neighbour in self.grid.neighbours(cell) {
                let weight = sampler.next_weight();
                write_cell(&mut writer, cell, dimensionality)?;
                writer.write_all(b" ")?;
                write_cell(&mut writer, neighbour, dimensionality)?;
                writeln!(writer, " {weight:.2}")?;
                edges = edges.saturating_add(1);
            }
        }
        writer.flush()?;
        Ok(edges)
    }

    /// Writes the graph to `path`, replacing any existing file.
    ///
    /// # Errors
    /// Returns [`GenerationError::Io`] when the file cannot be created or
    /// written.
    #[instrument(
        name = "grid.generate",
        err,
        skip(self, path),
        fields(grid = %self.grid, policy = %self.policy, path = %path.display()),
    )]
    pub fn write_file(&self, path: &Path) -> Result<GenerationSummary, GenerationError> {
        let io_error = |source| GenerationError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(io_error)?;
        let edges = self.write_to(BufWriter::new(file)).map_err(io_error)?;
        let summary = GenerationSummary {
            path: path.to_path_buf(),
            cells: self.grid.cell_count(),
            edges,
        };
        info!(
            cells = summary.cells,
            edges = summary.edges,
            "graph file written"
        );
        Ok(summary)
    }
}

/// Validates the inputs and writes one graph file.
///
/// # Errors
/// Returns [`GenerationError`] for invalid inputs or write failures.
pub fn generate(
    grid: GridSpec,
    policy: EdgeWeightPolicy,
    source: Cell,
    path: &Path,
) -> Result<GenerationSummary, GenerationError> {
    GraphGenerator::new(grid, policy, source)?.write_file(path)
}

fn write_cell<W: Write>(writer: &mut W, cell: Cell, dimensionality: Dimensionality) -> io::Result<()> {
    match dimensionality {
        Dimensionality::TwoD => write!(writer, "{} {}", cell.x, cell.y),
        Dimensionality::ThreeD => write!(writer, "{} {} {}", cell.x, cell.y, cell.z),
    }
}
