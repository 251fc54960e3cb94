use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// The minefield with its player-visible state.
///
/// Dimensions, mine count and mine placement are fixed once the board exists, only cell states change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
    revealed_count: CellCount,
    flagged_count: CellCount,
    triggered_mine: Option<Coord2>,
}

impl Board {
    pub fn from_layout(mine_layout: &MineLayout) -> Self {
        let size = mine_layout.size();
        let cells = Array2::from_shape_fn(nd_index(size), |(row, column)| {
            let coords = (row as Coord, column as Coord);
            Cell {
                is_mine: mine_layout.contains_mine(coords),
                adjacent_mines: mine_layout.adjacent_mine_count(coords),
                state: CellState::Hidden,
            }
        });

        Self {
            cells,
            mine_count: mine_layout.mine_count(),
            revealed_count: 0,
            flagged_count: 0,
            triggered_mine: None,
        }
    }

    /// Places `config.mines` mines at random, keeping `excluded` and its neighbors mine free when given.
    pub fn generate(config: GameConfig, excluded: Option<Coord2>, seed: u64) -> Result<Self> {
        let generator = match excluded {
            Some(start) => RandomLayoutGenerator::new(seed, start, FirstMovePolicy::FirstMoveZero),
            None => RandomLayoutGenerator::new(seed, (0, 0), FirstMovePolicy::Random),
        };
        Ok(Self::from_layout(&generator.generate(config)?))
    }

    pub fn size(&self) -> Coord2 {
        grid_size(&self.cells)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len().try_into().unwrap_or(CellCount::MAX)
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn mines_left(&self) -> i32 {
        i32::from(self.mine_count) - i32::from(self.flagged_count)
    }

    pub fn cell(&self, coords: Coord2) -> Option<Cell> {
        self.cells.get(nd_index(coords)).copied()
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, column), &cell)| ((row as Coord, column as Coord), cell))
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// True iff every non-mine cell is revealed.
    pub fn is_cleared(&self) -> bool {
        self.revealed_count == self.safe_cell_count()
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        use CellState::*;
        use MarkOutcome::*;

        let coords = self.validate_coords(coords)?;
        let cell = &mut self.cells[nd_index(coords)];

        Ok(match cell.state {
            Hidden => {
                cell.state = Flagged;
                self.flagged_count += 1;
                Changed
            }
            Flagged => {
                cell.state = Hidden;
                self.flagged_count -= 1;
                Changed
            }
            Revealed => NoChange,
        })
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        Ok(self.reveal_single_cell(coords))
    }

    /// Reveals every hidden neighbor of a revealed cell once its number is matched by adjacent flags.
    ///
    /// On a hidden cell this is a plain reveal.
    pub fn chord_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        let cell = self.cells[nd_index(coords)];

        Ok(match cell.state {
            CellState::Revealed if cell.adjacent_mines == self.count_flagged_neighbors(coords) => {
                neighbors(coords, self.size())
                    .map(|neighbor_coords| self.reveal_single_cell(neighbor_coords))
                    .reduce(core::ops::BitOr::bitor)
                    .unwrap_or(RevealOutcome::NoChange)
            }
            CellState::Hidden => self.reveal_single_cell(coords),
            _ => RevealOutcome::NoChange,
        })
    }

    pub fn can_chord_reveal_at(&self, coords: Coord2) -> bool {
        match self.cell(coords) {
            Some(cell) if cell.is_revealed() => {
                cell.adjacent_mines == self.count_flagged_neighbors(coords)
                    && neighbors(coords, self.size())
                        .any(|pos| self.cells[nd_index(pos)].is_hidden())
            }
            _ => false,
        }
    }

    fn reveal_single_cell(&mut self, coords: Coord2) -> RevealOutcome {
        let cell = self.cells[nd_index(coords)];

        match (cell.state, cell.is_mine) {
            (CellState::Hidden, true) => {
                self.cells[nd_index(coords)].state = CellState::Revealed;
                self.triggered_mine = Some(coords);
                RevealOutcome::HitMine
            }
            (CellState::Hidden, false) => {
                self.open(coords);
                let mut revealed = alloc::vec![coords];

                if cell.adjacent_mines == 0 {
                    self.flood_fill(coords, &mut revealed);
                }

                RevealOutcome::Revealed(revealed)
            }
            _ => RevealOutcome::NoChange,
        }
    }

    /// Opens the region connected to `origin` through zero-count cells.
    ///
    /// Cells with a positive count are opened but stop the fill. Flagged cells are never opened.
    fn flood_fill(&mut self, origin: Coord2, revealed: &mut Vec<Coord2>) {
        let mut visited = BTreeSet::from([origin]);
        let mut to_visit: VecDeque<_> = self.hidden_neighbors(origin).collect();

        while let Some(visit_coords) = to_visit.pop_front() {
            if !visited.insert(visit_coords) {
                continue;
            }

            let cell = self.cells[nd_index(visit_coords)];
            if !cell.is_hidden() || cell.is_mine {
                continue;
            }

            self.open(visit_coords);
            revealed.push(visit_coords);

            if cell.adjacent_mines == 0 {
                to_visit.extend(
                    self.hidden_neighbors(visit_coords)
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }

    fn open(&mut self, coords: Coord2) {
        self.cells[nd_index(coords)].state = CellState::Revealed;
        self.revealed_count += 1;
    }

    fn hidden_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + '_ {
        neighbors(coords, self.size())
            .filter(|&pos| self.cells[nd_index(pos)].is_hidden())
    }

    fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        neighbors(coords, self.size())
            .filter(|&pos| self.cells[nd_index(pos)].is_flagged())
            .count() as u8
    }
}
