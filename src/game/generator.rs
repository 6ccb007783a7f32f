//! Maze Generation
//!
//! Randomized depth-first backtracker over an explicit stack. The stack can
//! grow to `grid_size * grid_size` entries, so call-stack recursion is out.
//! The carve clears exactly one shared wall flag per visited cell beyond
//! the first, which makes the result a spanning tree of the grid: every
//! pair of cells is connected by exactly one path.

use crate::core::rng::DeterministicRng;
use crate::game::maze::Maze;

/// Carve corridors into a fully walled grid.
///
/// Runs until the stack empties; that exit is normal completion for every
/// grid size, never an error.
pub(crate) fn carve(maze: &mut Maze, rng: &mut DeterministicRng) {
    let n = maze.grid_size();

    maze.cell_mut(0, 0).visited = true;
    let mut stack: Vec<(usize, usize)> = vec![(0, 0)];
    let mut candidates: Vec<(usize, usize)> = Vec::with_capacity(4);

    while let Some(&(row, col)) = stack.last() {
        candidates.clear();
        if col > 0 && !maze.cell_at(row, col - 1).map_or(true, |c| c.visited) {
            candidates.push((row, col - 1));
        }
        if col + 1 < n && !maze.cell_at(row, col + 1).map_or(true, |c| c.visited) {
            candidates.push((row, col + 1));
        }
        if row > 0 && !maze.cell_at(row - 1, col).map_or(true, |c| c.visited) {
            candidates.push((row - 1, col));
        }
        if row + 1 < n && !maze.cell_at(row + 1, col).map_or(true, |c| c.visited) {
            candidates.push((row + 1, col));
        }

        if candidates.is_empty() {
            stack.pop();
            continue;
        }

        let (next_row, next_col) = candidates[rng.next_int(candidates.len() as u32) as usize];

        // Shared-wall storage: clearing toward north/west clears the
        // neighbor's flag instead of this cell's.
        if next_row > row {
            maze.cell_mut(row, col).south_wall = false;
        } else if next_row < row {
            maze.cell_mut(next_row, next_col).south_wall = false;
        } else if next_col > col {
            maze.cell_mut(row, col).east_wall = false;
        } else {
            maze.cell_mut(next_row, next_col).east_wall = false;
        }

        maze.cell_mut(next_row, next_col).visited = true;
        stack.push((next_row, next_col));
    }
}
