use alloc::collections::VecDeque;
use core::ops::{Index, IndexMut};
use hashbrown::HashSet;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Tiles already processed by a flood reveal.
pub type VisitedSet = HashSet<Coord2>;

/// Dense grid of packed cells, stored row-major so `index(x, y) == y * width + x`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

impl Board {
    pub fn new((width, height): Coord2) -> Self {
        Self {
            cells: Array2::default((usize::from(height), usize::from(width))),
            mine_count: 0,
        }
    }

    /// Builds a board with mines at `mine_coords` and neighbor counts already computed.
    pub fn from_mines(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        GameConfig::new(size.0, size.1, 0)?;

        let mut board = Self::new(size);
        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords(coords));
            }
            board.place_mine(coords);
        }
        board.compute_neighbor_counts();
        Ok(board)
    }

    /// Resets every tile to empty. Size limits are the caller's concern.
    pub fn init(&mut self, size: Coord2) {
        *self = Self::new(size);
    }

    pub fn width(&self) -> Coord {
        self.cells.ncols().try_into().unwrap_or(Coord::MAX)
    }

    pub fn height(&self) -> Coord {
        self.cells.nrows().try_into().unwrap_or(Coord::MAX)
    }

    pub fn size(&self) -> Coord2 {
        (self.width(), self.height())
    }

    pub fn total_tiles(&self) -> CellCount {
        mult(self.width(), self.height())
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_tiles(&self) -> CellCount {
        self.total_tiles().saturating_sub(self.mine_count)
    }

    pub fn index(&self, (x, y): Coord2) -> usize {
        usize::from(y) * usize::from(self.width()) + usize::from(x)
    }

    pub fn coords_of(&self, index: usize) -> Coord2 {
        let width = usize::from(self.width());
        ((index % width) as Coord, (index / width) as Coord)
    }

    pub fn in_bounds(&self, x: i16, y: i16) -> bool {
        x >= 0 && y >= 0 && x < i16::from(self.width()) && y < i16::from(self.height())
    }

    pub fn contains(&self, (x, y): Coord2) -> bool {
        x < self.width() && y < self.height()
    }

    pub fn cell(&self, coords: Coord2) -> Cell {
        self[coords]
    }

    /// All cells with their coordinates, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((y, x), &cell)| ((x as Coord, y as Coord), cell))
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    /// Returns `false` when the tile already holds a mine.
    pub fn place_mine(&mut self, coords: Coord2) -> bool {
        let cell = &mut self[coords];
        if cell.is_mine() {
            return false;
        }

        cell.set(CellFlags::MINE, true);
        self.mine_count += 1;
        true
    }

    /// Must run once after the mine layout is final and before anything is revealed.
    pub fn compute_neighbor_counts(&mut self) {
        let (width, height) = self.size();
        for y in 0..height {
            for x in 0..width {
                if self[(x, y)].is_mine() {
                    continue;
                }
                let count = self.count_neighbors((x, y), Cell::is_mine);
                self[(x, y)].set_neighbor_mines(count);
            }
        }
    }

    pub fn count_neighbors(&self, coords: Coord2, predicate: impl Fn(Cell) -> bool) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| predicate(self[pos]))
            .count() as u8
    }

    /// Reveals a single tile without cascading.
    pub fn reveal_cell(&mut self, coords: Coord2) -> bool {
        let cell = &mut self[coords];
        if !cell.is_hidden() {
            return false;
        }

        cell.set(CellFlags::REVEALED, true);
        true
    }

    /// Opens `coords` and cascades through every zero tile it reaches.
    ///
    /// Returns the number of newly revealed tiles. Mines are never opened by a
    /// flood; detonation is handled by the engine.
    pub fn reveal_flood(&mut self, coords: Coord2) -> CellCount {
        let mut visited = VisitedSet::new();
        self.reveal_flood_with(coords, &mut visited, |_, _| {})
    }

    /// Flood reveal sharing `visited` across calls, reporting every tile it opens.
    pub fn reveal_flood_with<F>(
        &mut self,
        start: Coord2,
        visited: &mut VisitedSet,
        mut on_reveal: F,
    ) -> CellCount
    where
        F: FnMut(Coord2, Cell),
    {
        debug_assert!(self.contains(start), "flood start {start:?} out of bounds");

        let mut revealed = 0;
        let mut to_visit = VecDeque::from([start]);

        while let Some(coords) = to_visit.pop_front() {
            let cell = self[coords];
            if !cell.is_hidden() || !visited.insert(coords) {
                continue;
            }

            if cell.is_mine() {
                continue;
            }

            self.reveal_cell(coords);
            revealed += 1;
            on_reveal(coords, self[coords]);

            if cell.neighbor_mines() == 0 {
                to_visit.extend(
                    self.iter_neighbors(coords)
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }

        revealed
    }

    /// No-op on revealed tiles.
    pub fn toggle_flag(&mut self, coords: Coord2) {
        let cell = &mut self[coords];
        if cell.is_revealed() {
            return;
        }

        let flagged = cell.is_flagged();
        cell.set(CellFlags::FLAGGED, !flagged);
    }

    /// Reveals every tile that is not flagged, returning how many changed.
    pub fn reveal_all(&mut self) -> CellCount {
        let mut revealed = 0;
        for cell in self.cells.iter_mut() {
            if cell.is_hidden() {
                cell.set(CellFlags::REVEALED, true);
                revealed += 1;
            }
        }
        revealed
    }

    pub fn flag_count(&self) -> CellCount {
        self.count_cells(Cell::is_flagged)
    }

    pub fn flagged_mine_count(&self) -> CellCount {
        self.count_cells(|cell| cell.is_flagged() && cell.is_mine())
    }

    pub fn revealed_safe_count(&self) -> CellCount {
        self.count_cells(|cell| cell.is_revealed() && !cell.is_mine())
    }

    /// Mines actually present in the grid, as opposed to the cached `mine_count`.
    pub fn counted_mines(&self) -> CellCount {
        self.count_cells(Cell::is_mine)
    }

    fn count_cells(&self, predicate: impl Fn(Cell) -> bool) -> CellCount {
        self.cells.iter().filter(|&&cell| predicate(cell)).count() as CellCount
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Board {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}
