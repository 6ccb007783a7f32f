//! Wall Collision Resolution
//!
//! Continuous, radius-aware collision between a moving circular actor and
//! the maze walls plus outer boundary. Pure functions of the maze and the
//! actor's kinematic arguments, so independent actors within a tick can be
//! resolved concurrently.
//!
//! The resolver is axis-separated: a velocity component is either kept or
//! zeroed, never partially scaled, which produces wall sliding for free.
//! Per axis the target extent (expanded by radius plus wall thickness) is
//! swept grid line by grid line away from the current cell, so a velocity
//! larger than a cell cannot tunnel past a farther wall. At each crossed
//! line five wall segments can block:
//!
//! - the segment in the actor's own lane, unconditionally;
//! - the segments one lane to either side, when the actor's perpendicular
//!   extent pokes into the shared corner (within `wall_thickness` of the
//!   lane edge, strict comparison);
//! - the two perpendicular segments just beyond the line whose end caps
//!   reach into those same corners, under the same overlap tests.
//!
//! Overlap tests are strict so an actor resting flush against a wall is
//! not blocked sliding parallel to it.

use crate::core::vec2::Vec2;
use crate::game::maze::{Direction, Maze};

/// Which axes made wall contact during a detection pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Contact {
    /// Contact along the x axis.
    pub x: bool,
    /// Contact along the z axis.
    pub z: bool,
}

impl Contact {
    /// True when at least one axis contacted.
    pub fn any(self) -> bool {
        self.x || self.z
    }
}

/// Clamp a velocity against the maze: contacted components come back
/// zeroed, free components unchanged. `position + resolve(..)` never
/// penetrates a wall or leaves the maze.
pub fn resolve(maze: &Maze, position: Vec2, velocity: Vec2, radius: f32) -> Vec2 {
    detect(maze, position, velocity, radius).0
}

/// Would this move contact a wall on at least one axis? Used by bullets,
/// which despawn on contact instead of sliding.
pub fn probe(maze: &Maze, position: Vec2, velocity: Vec2, radius: f32) -> bool {
    detect(maze, position, velocity, radius).1.any()
}

/// Shared detection pass behind [`resolve`] and [`probe`].
pub fn detect(
    maze: &Maze,
    position: Vec2,
    mut velocity: Vec2,
    radius: f32,
) -> (Vec2, Contact) {
    let mut contact = Contact::default();
    let margin = radius + maze.wall_thickness();
    let size = maze.size();

    // Outer boundary first, per axis. Interior sweeps below run on the
    // already clamped component.
    if velocity.x < 0.0 && position.x + velocity.x - margin < 0.0 {
        velocity.x = 0.0;
        contact.x = true;
    } else if velocity.x > 0.0 && position.x + velocity.x + margin > size {
        velocity.x = 0.0;
        contact.x = true;
    }
    if velocity.z < 0.0 && position.z + velocity.z - margin < 0.0 {
        velocity.z = 0.0;
        contact.z = true;
    } else if velocity.z > 0.0 && position.z + velocity.z + margin > size {
        velocity.z = 0.0;
        contact.z = true;
    }

    let (row, col) = maze.cell_of(position);
    let (row, col) = (row as isize, col as isize);

    if velocity.x > 0.0
        && swept_blocked(maze, position, velocity.x, radius, row, col, Direction::East)
    {
        contact.x = true;
    } else if velocity.x < 0.0
        && swept_blocked(maze, position, velocity.x, radius, row, col, Direction::West)
    {
        contact.x = true;
    }
    if velocity.z > 0.0
        && swept_blocked(maze, position, velocity.z, radius, row, col, Direction::South)
    {
        contact.z = true;
    } else if velocity.z < 0.0
        && swept_blocked(maze, position, velocity.z, radius, row, col, Direction::North)
    {
        contact.z = true;
    }

    if contact.x {
        velocity.x = 0.0;
    }
    if contact.z {
        velocity.z = 0.0;
    }
    (velocity, contact)
}

/// Walk the grid lines the expanded target extent crosses, nearest first,
/// and report the first blocked one. `along` is the cell index on the
/// travel axis, `lane` the index on the perpendicular axis.
fn swept_blocked(
    maze: &Maze,
    position: Vec2,
    travel: f32,
    radius: f32,
    row: isize,
    col: isize,
    dir: Direction,
) -> bool {
    let w = maze.cell_width();
    let t = maze.wall_thickness();
    let n = maze.grid_size() as isize;

    let (axis_target, lane, mut along) = match dir {
        Direction::East | Direction::West => (position.x + travel, row, col),
        Direction::South | Direction::North => (position.z + travel, col, row),
    };

    loop {
        let crosses = match dir {
            Direction::East | Direction::South => {
                axis_target + radius + t > (along + 1) as f32 * w
            }
            Direction::West | Direction::North => {
                axis_target - radius - t < along as f32 * w
            }
        };
        if !crosses {
            return false;
        }
        if blocked_at_line(maze, position, radius, lane, along, dir) {
            return true;
        }
        match dir {
            Direction::East | Direction::South => {
                along += 1;
                if along >= n {
                    return false;
                }
            }
            Direction::West | Direction::North => {
                along -= 1;
                if along < 0 {
                    return false;
                }
            }
        }
    }
}

/// The five-segment check at one grid line. Missing neighbors read as open
/// via `interior_wall`, so the outermost ring needs no special casing.
fn blocked_at_line(
    maze: &Maze,
    position: Vec2,
    radius: f32,
    lane: isize,
    along: isize,
    dir: Direction,
) -> bool {
    let w = maze.cell_width();
    let t = maze.wall_thickness();

    let perp = match dir {
        Direction::East | Direction::West => position.z,
        Direction::South | Direction::North => position.x,
    };
    let low = perp - radius < lane as f32 * w + t;
    let high = perp + radius > (lane + 1) as f32 * w - t;

    let wall = |r: isize, c: isize, d: Direction| maze.interior_wall(r, c, d);

    use Direction::{East, North, South, West};
    match dir {
        East => {
            wall(lane, along, East)
                || (low && (wall(lane - 1, along, East) || wall(lane - 1, along + 1, South)))
                || (high && (wall(lane + 1, along, East) || wall(lane, along + 1, South)))
        }
        West => {
            wall(lane, along - 1, East)
                || (low && (wall(lane - 1, along - 1, East) || wall(lane - 1, along - 1, South)))
                || (high && (wall(lane + 1, along - 1, East) || wall(lane, along - 1, South)))
        }
        South => {
            wall(along, lane, South)
                || (low && (wall(along, lane - 1, South) || wall(along + 1, lane - 1, East)))
                || (high && (wall(along, lane + 1, South) || wall(along + 1, lane, East)))
        }
        North => {
            wall(along - 1, lane, South)
                || (low && (wall(along - 1, lane - 1, South) || wall(along - 1, lane - 1, East)))
                || (high && (wall(along - 1, lane + 1, South) || wall(along - 1, lane, East)))
        }
    }
}
