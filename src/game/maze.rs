//! Maze Grid Model
//!
//! Square grid of cells with shared wall storage. Each cell stores only its
//! south and east flags; a cell's north wall is its `row - 1` neighbor's
//! south wall and its west wall is its `col - 1` neighbor's east wall. The
//! outer boundary is implicit: queries that point off the grid report a
//! wall, and the last row/column keep their south/east flags set because
//! the generator never carves toward a missing neighbor.
//!
//! Coordinates: `x` grows with `col`, `z` grows with `row`. World span is
//! `[0, grid_size * cell_width]` on both axes.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

use crate::core::rng::DeterministicRng;
use crate::core::vec2::Vec2;
use crate::game::generator;

/// Validation failures for [`MazeConfig`].
#[derive(Debug, Error, PartialEq)]
pub enum MazeError {
    /// Grid must hold at least one cell.
    #[error("grid size must be at least 1, got {0}")]
    InvalidGridSize(usize),

    /// Cell width must be a positive finite number.
    #[error("cell width must be positive and finite, got {0}")]
    InvalidCellWidth(f32),

    /// Wall thickness must be a non-negative finite number smaller than
    /// half a cell.
    #[error("wall thickness must be in [0, cell_width / 2), got {0}")]
    InvalidWallThickness(f32),
}

/// Grid and geometry parameters for one arena.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MazeConfig {
    /// Cells per side.
    pub grid_size: usize,
    /// World units per cell side.
    pub cell_width: f32,
    /// Physical wall depth; also the collision comparison tolerance.
    pub wall_thickness: f32,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            grid_size: 10,
            cell_width: 10.0,
            wall_thickness: 1.0,
        }
    }
}

impl MazeConfig {
    /// Reject degenerate geometry before generation.
    pub fn validate(&self) -> Result<(), MazeError> {
        if self.grid_size == 0 {
            return Err(MazeError::InvalidGridSize(self.grid_size));
        }
        if !self.cell_width.is_finite() || self.cell_width <= 0.0 {
            return Err(MazeError::InvalidCellWidth(self.cell_width));
        }
        if !self.wall_thickness.is_finite()
            || self.wall_thickness < 0.0
            || self.wall_thickness >= self.cell_width / 2.0
        {
            return Err(MazeError::InvalidWallThickness(self.wall_thickness));
        }
        Ok(())
    }
}

/// Cardinal direction on the grid. North is toward lower `row` (lower `z`),
/// east is toward higher `col` (higher `x`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Toward lower `row` / lower `z`.
    North,
    /// Toward higher `row` / higher `z`.
    South,
    /// Toward higher `col` / higher `x`.
    East,
    /// Toward lower `col` / lower `x`.
    West,
}

/// One grid cell. `visited` is generation scratch and carries no meaning
/// after the carve completes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Cell {
    /// Generation scratch flag.
    pub visited: bool,
    /// Wall on the high-z edge, shared with the `row + 1` neighbor.
    pub south_wall: bool,
    /// Wall on the high-x edge, shared with the `col + 1` neighbor.
    pub east_wall: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            visited: false,
            south_wall: true,
            east_wall: true,
        }
    }
}

/// A generated maze. Immutable after generation; arena transitions replace
/// the whole value rather than mutating it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Maze {
    cells: Vec<Cell>,
    grid_size: usize,
    cell_width: f32,
    wall_thickness: f32,
}

impl Maze {
    /// Generate a maze from a validated config and an injected RNG.
    pub fn generate(
        config: MazeConfig,
        rng: &mut DeterministicRng,
    ) -> Result<Self, MazeError> {
        config.validate()?;

        let mut maze = Self {
            cells: vec![Cell::default(); config.grid_size * config.grid_size],
            grid_size: config.grid_size,
            cell_width: config.cell_width,
            wall_thickness: config.wall_thickness,
        };
        generator::carve(&mut maze, rng);

        debug!(
            grid_size = maze.grid_size,
            layout = %hex::encode(&maze.layout_hash()[..8]),
            "maze generated"
        );
        Ok(maze)
    }

    /// Generate from a bare seed.
    pub fn from_seed(config: MazeConfig, seed: u64) -> Result<Self, MazeError> {
        let mut rng = DeterministicRng::new(seed);
        Self::generate(config, &mut rng)
    }

    /// Cells per side.
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// World units per cell side.
    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    /// Physical wall depth and collision tolerance.
    pub fn wall_thickness(&self) -> f32 {
        self.wall_thickness
    }

    /// World span of one side, `grid_size * cell_width`.
    pub fn size(&self) -> f32 {
        self.grid_size as f32 * self.cell_width
    }

    /// Cell at `(row, col)`, or `None` off-grid.
    pub fn cell_at(&self, row: usize, col: usize) -> Option<&Cell> {
        if row < self.grid_size && col < self.grid_size {
            Some(&self.cells[row * self.grid_size + col])
        } else {
            None
        }
    }

    pub(crate) fn cell_mut(&mut self, row: usize, col: usize) -> &mut Cell {
        &mut self.cells[row * self.grid_size + col]
    }

    /// Whether a wall stands between `(row, col)` and its neighbor in
    /// `dir`. Queries whose neighbor falls off the grid report the outer
    /// boundary as a wall.
    pub fn wall_between(&self, row: usize, col: usize, dir: Direction) -> bool {
        let n = self.grid_size;
        if row >= n || col >= n {
            return true;
        }
        match dir {
            Direction::South if row + 1 >= n => true,
            Direction::East if col + 1 >= n => true,
            Direction::North if row == 0 => true,
            Direction::West if col == 0 => true,
            _ => self.interior_wall(row as isize, col as isize, dir),
        }
    }

    /// Stored interior wall flag, with off-grid indices reading as open.
    /// The resolver uses this so the outermost sweep never needs special
    /// casing; the boundary is handled by the clamp pass instead.
    pub(crate) fn interior_wall(&self, row: isize, col: isize, dir: Direction) -> bool {
        match dir {
            Direction::North => self.interior_wall(row - 1, col, Direction::South),
            Direction::West => self.interior_wall(row, col - 1, Direction::East),
            Direction::South | Direction::East => {
                let n = self.grid_size as isize;
                if row < 0 || row >= n || col < 0 || col >= n {
                    return false;
                }
                let cell = &self.cells[row as usize * self.grid_size + col as usize];
                match dir {
                    Direction::South => cell.south_wall,
                    _ => cell.east_wall,
                }
            }
        }
    }

    /// Grid cell containing a world position, clamped into the grid.
    pub fn cell_of(&self, position: Vec2) -> (usize, usize) {
        let max = self.grid_size - 1;
        let row = (position.z / self.cell_width).floor().max(0.0) as usize;
        let col = (position.x / self.cell_width).floor().max(0.0) as usize;
        (row.min(max), col.min(max))
    }

    /// World-space center of a cell.
    pub fn cell_center(&self, row: usize, col: usize) -> Vec2 {
        Vec2::new(
            (col as f32 + 0.5) * self.cell_width,
            (row as f32 + 0.5) * self.cell_width,
        )
    }

    /// SHA-256 digest of the wall layout. Two mazes with equal digests are
    /// byte-for-byte the same layout; used by replay verification.
    pub fn layout_hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update((self.grid_size as u64).to_le_bytes());
        for cell in &self.cells {
            hasher.update([u8::from(cell.south_wall), u8::from(cell.east_wall)]);
        }
        hasher.finalize().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(MazeConfig::default().validate().is_ok());

        let bad = MazeConfig {
            grid_size: 0,
            ..Default::default()
        };
        assert_eq!(bad.validate(), Err(MazeError::InvalidGridSize(0)));

        let bad = MazeConfig {
            cell_width: 0.0,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(MazeError::InvalidCellWidth(_))));

        let bad = MazeConfig {
            cell_width: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(MazeError::InvalidCellWidth(_))));

        let bad = MazeConfig {
            wall_thickness: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(MazeError::InvalidWallThickness(_))
        ));

        // Walls thicker than half a cell would seal the corridors shut.
        let bad = MazeConfig {
            cell_width: 10.0,
            wall_thickness: 5.0,
            ..Default::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(MazeError::InvalidWallThickness(_))
        ));
    }

    #[test]
    fn test_boundary_queries_report_walls() {
        let maze = Maze::from_seed(MazeConfig::default(), 7).unwrap();
        let last = maze.grid_size() - 1;

        for i in 0..maze.grid_size() {
            assert!(maze.wall_between(0, i, Direction::North));
            assert!(maze.wall_between(last, i, Direction::South));
            assert!(maze.wall_between(i, 0, Direction::West));
            assert!(maze.wall_between(i, last, Direction::East));
        }

        // Fully off-grid queries are boundary too.
        assert!(maze.wall_between(100, 0, Direction::North));
        assert!(maze.wall_between(0, 100, Direction::South));
    }

    #[test]
    fn test_wall_between_is_symmetric() {
        let maze = Maze::from_seed(MazeConfig::default(), 99).unwrap();
        let n = maze.grid_size();

        for row in 0..n {
            for col in 0..n {
                if row + 1 < n {
                    assert_eq!(
                        maze.wall_between(row, col, Direction::South),
                        maze.wall_between(row + 1, col, Direction::North),
                    );
                }
                if col + 1 < n {
                    assert_eq!(
                        maze.wall_between(row, col, Direction::East),
                        maze.wall_between(row, col + 1, Direction::West),
                    );
                }
            }
        }
    }

    #[test]
    fn test_cell_at_bounds() {
        let maze = Maze::from_seed(MazeConfig::default(), 1).unwrap();
        assert!(maze.cell_at(0, 0).is_some());
        assert!(maze.cell_at(9, 9).is_some());
        assert!(maze.cell_at(10, 0).is_none());
        assert!(maze.cell_at(0, 10).is_none());
    }

    #[test]
    fn test_cell_of_clamps() {
        let maze = Maze::from_seed(MazeConfig::default(), 1).unwrap();
        assert_eq!(maze.cell_of(Vec2::new(5.0, 5.0)), (0, 0));
        assert_eq!(maze.cell_of(Vec2::new(15.0, 25.0)), (2, 1));
        assert_eq!(maze.cell_of(Vec2::new(-3.0, -3.0)), (0, 0));
        assert_eq!(maze.cell_of(Vec2::new(1000.0, 1000.0)), (9, 9));
    }

    #[test]
    fn test_layout_hash_determinism() {
        let config = MazeConfig::default();
        let a = Maze::from_seed(config, 42).unwrap();
        let b = Maze::from_seed(config, 42).unwrap();
        let c = Maze::from_seed(config, 43).unwrap();

        assert_eq!(a.layout_hash(), b.layout_hash());
        assert_ne!(a.layout_hash(), c.layout_hash());
    }

    #[test]
    fn test_single_cell_maze() {
        let config = MazeConfig {
            grid_size: 1,
            ..Default::default()
        };
        let maze = Maze::from_seed(config, 0).unwrap();
        assert!(maze.wall_between(0, 0, Direction::North));
        assert!(maze.wall_between(0, 0, Direction::South));
        assert!(maze.wall_between(0, 0, Direction::East));
        assert!(maze.wall_between(0, 0, Direction::West));
    }
}
