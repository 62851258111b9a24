//! Maze grid storage and pellet bookkeeping used by the world crate.

use maze_chase_core::{CellKind, MazeView, PelletKind, Position};
use thiserror::Error;

/// Glyphs accepted by the layout parser.
///
/// `#` wall, `.` pellet, `o` power pellet, space open floor, `-` ghost-house
/// marker (passable, decorative only).
const WALL: char = '#';
const PELLET: char = '.';
const POWER_PELLET: char = 'o';
const OPEN: char = ' ';
const GHOST_HOUSE: char = '-';

/// Errors raised while parsing a maze layout.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The layout contained no rows or an empty first row.
    #[error("maze layout must contain at least one non-empty row")]
    Empty,
    /// A row's width differed from the first row's width.
    #[error("maze row {row} is {found} cells wide, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width established by the first row.
        expected: usize,
        /// Width actually found.
        found: usize,
    },
    /// A character outside the glyph alphabet appeared in the layout.
    #[error("unknown maze glyph {glyph:?} at column {column}, row {row}")]
    UnknownGlyph {
        /// The unrecognized character.
        glyph: char,
        /// Zero-based column of the glyph.
        column: usize,
        /// Zero-based row of the glyph.
        row: usize,
    },
    /// A spawn cell referenced by the world configuration is not passable.
    #[error("spawn cell ({x}, {y}) is not passable")]
    BlockedSpawn {
        /// Horizontal coordinate of the spawn cell.
        x: i32,
        /// Vertical coordinate of the spawn cell.
        y: i32,
    },
}

/// Dense row-major maze grid, mutable only through pellet consumption.
#[derive(Clone, Debug)]
pub(crate) struct Maze {
    width: i32,
    height: i32,
    cells: Vec<CellKind>,
}

impl Maze {
    /// Parses a maze from glyph rows.
    pub(crate) fn parse(rows: &[&str]) -> Result<Self, LayoutError> {
        let Some(first) = rows.first() else {
            return Err(LayoutError::Empty);
        };
        let width = first.chars().count();
        if width == 0 {
            return Err(LayoutError::Empty);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(LayoutError::RaggedRow {
                    row: row_index,
                    expected: width,
                    found,
                });
            }

            for (column, glyph) in row.chars().enumerate() {
                cells.push(match glyph {
                    WALL => CellKind::Wall,
                    PELLET => CellKind::Pellet,
                    POWER_PELLET => CellKind::PowerPellet,
                    OPEN => CellKind::Open,
                    GHOST_HOUSE => CellKind::GhostHouse,
                    other => {
                        return Err(LayoutError::UnknownGlyph {
                            glyph: other,
                            column,
                            row: row_index,
                        })
                    }
                });
            }
        }

        Ok(Self {
            width: width as i32,
            height: rows.len() as i32,
            cells,
        })
    }

    pub(crate) const fn width(&self) -> i32 {
        self.width
    }

    pub(crate) const fn height(&self) -> i32 {
        self.height
    }

    /// Captures a read-only view carrying the motion primitives.
    pub(crate) fn view(&self) -> MazeView<'_> {
        MazeView::new(&self.cells, self.width, self.height)
    }

    /// Removes the pellet at the position, if one is present.
    ///
    /// Idempotent: the cell becomes [`CellKind::Open`] permanently, so a
    /// second call for the same cell returns `None`.
    pub(crate) fn consume_pellet(&mut self, position: Position) -> Option<PelletKind> {
        let index = self.index(position)?;
        let consumed = match self.cells.get(index)? {
            CellKind::Pellet => PelletKind::Pellet,
            CellKind::PowerPellet => PelletKind::PowerPellet,
            _ => return None,
        };
        self.cells[index] = CellKind::Open;
        Some(consumed)
    }

    /// Counts the cells still holding a pellet of either kind.
    pub(crate) fn remaining_pellets(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| matches!(cell, CellKind::Pellet | CellKind::PowerPellet))
            .count()
    }

    fn index(&self, position: Position) -> Option<usize> {
        if position.x() < 0
            || position.x() >= self.width
            || position.y() < 0
            || position.y() >= self.height
        {
            return None;
        }
        Some(position.y() as usize * self.width as usize + position.x() as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_glyph_alphabet() {
        let maze = Maze::parse(&["#.o", " -#"]).expect("layout parses");
        assert_eq!(maze.width(), 3);
        assert_eq!(maze.height(), 2);
        let view = maze.view();
        assert_eq!(view.cell(Position::new(0, 0)), CellKind::Wall);
        assert_eq!(view.cell(Position::new(1, 0)), CellKind::Pellet);
        assert_eq!(view.cell(Position::new(2, 0)), CellKind::PowerPellet);
        assert_eq!(view.cell(Position::new(0, 1)), CellKind::Open);
        assert_eq!(view.cell(Position::new(1, 1)), CellKind::GhostHouse);
    }

    #[test]
    fn rejects_ragged_rows() {
        let error = Maze::parse(&["###", "##"]).expect_err("ragged layout");
        assert_eq!(
            error,
            LayoutError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2,
            }
        );
    }

    #[test]
    fn rejects_unknown_glyphs() {
        let error = Maze::parse(&["#x#"]).expect_err("unknown glyph");
        assert_eq!(
            error,
            LayoutError::UnknownGlyph {
                glyph: 'x',
                column: 1,
                row: 0,
            }
        );
    }

    #[test]
    fn rejects_empty_layouts() {
        assert_eq!(Maze::parse(&[]).expect_err("empty"), LayoutError::Empty);
        assert_eq!(Maze::parse(&[""]).expect_err("empty"), LayoutError::Empty);
    }

    #[test]
    fn pellet_consumption_is_idempotent() {
        let mut maze = Maze::parse(&["#.#"]).expect("layout parses");
        let cell = Position::new(1, 0);

        assert_eq!(maze.consume_pellet(cell), Some(PelletKind::Pellet));
        assert_eq!(maze.view().cell(cell), CellKind::Open);
        assert_eq!(maze.consume_pellet(cell), None);
        assert_eq!(maze.view().cell(cell), CellKind::Open);
    }

    #[test]
    fn ghost_house_cells_hold_no_pellet() {
        let mut maze = Maze::parse(&["#-#"]).expect("layout parses");
        assert_eq!(maze.consume_pellet(Position::new(1, 0)), None);
        assert_eq!(maze.view().cell(Position::new(1, 0)), CellKind::GhostHouse);
    }

    #[test]
    fn counts_remaining_pellets_of_both_kinds() {
        let mut maze = Maze::parse(&["o..#"]).expect("layout parses");
        assert_eq!(maze.remaining_pellets(), 3);
        let _ = maze.consume_pellet(Position::new(0, 0));
        assert_eq!(maze.remaining_pellets(), 2);
    }
}
