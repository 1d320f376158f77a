use alloc::vec;

use super::*;

/// Uniform mine placement: the first `n` tiles get mines, the whole layout is
/// shuffled, then a mine sitting on [`SAFE_ORIGIN`] is moved elsewhere.
#[derive(Clone, Debug)]
pub struct ShuffleGenerator<R> {
    rng: R,
}

impl<R: RandomSource> ShuffleGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

impl<R: RandomSource> BoardGenerator for ShuffleGenerator<R> {
    fn fill(&mut self, config: &GameConfig, board: &mut Board) {
        let total_tiles = usize::from(config.total_tiles());
        let mut mines = usize::from(config.mine_count());

        board.init(config.size());
        if total_tiles == 0 {
            return;
        }

        if mines >= total_tiles {
            log::warn!(
                "Cannot keep the origin safe with {} mines on {} tiles, leaving one free",
                mines,
                total_tiles
            );
            mines = total_tiles - 1;
        }

        let mut layout = vec![false; total_tiles];
        layout[..mines].fill(true);
        shuffle(&mut layout, &mut self.rng);

        let origin = board.index(SAFE_ORIGIN);
        if layout[origin] {
            // retry until a free tile comes up, keeping the swap target uniform
            loop {
                let target = self.rng.below(total_tiles as u32) as usize;
                if !layout[target] {
                    layout.swap(origin, target);
                    break;
                }
            }
        }

        for (index, _) in layout.iter().enumerate().filter(|&(_, &is_mine)| is_mine) {
            board.place_mine(board.coords_of(index));
        }
        board.compute_neighbor_counts();

        debug_assert_eq!(usize::from(board.mine_count()), mines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn places_configured_mine_count_away_from_origin() {
        let config = GameConfig::new(16, 7, 2).unwrap();
        let mut generator = ShuffleGenerator::new(SmallRng::seed_from_u64(42));
        let mut board = Board::new((1, 1));

        for _ in 0..50 {
            generator.fill(&config, &mut board);

            assert_eq!(board.size(), (16, 7));
            assert_eq!(board.mine_count(), config.mine_count());
            assert_eq!(board.counted_mines(), config.mine_count());
            assert!(!board[SAFE_ORIGIN].is_mine());
        }
    }

    #[test]
    fn computes_neighbor_counts() {
        let config = GameConfig::new(12, 12, 1).unwrap();
        let mut generator = ShuffleGenerator::new(SmallRng::seed_from_u64(9));
        let mut board = Board::new((1, 1));

        generator.fill(&config, &mut board);

        for (coords, cell) in board.iter().filter(|(_, cell)| !cell.is_mine()) {
            assert_eq!(
                cell.neighbor_mines(),
                board.count_neighbors(coords, Cell::is_mine)
            );
        }
    }

    #[test]
    fn every_tile_but_origin_can_hold_a_mine() {
        let config = GameConfig::new(3, 3, 2).unwrap();
        let mut generator = ShuffleGenerator::new(SmallRng::seed_from_u64(1));
        let mut board = Board::new((1, 1));
        let mut seen = [false; 9];

        for _ in 0..500 {
            generator.fill(&config, &mut board);
            for (coords, cell) in board.iter() {
                if cell.is_mine() {
                    seen[board.index(coords)] = true;
                }
            }
        }

        assert!(!seen[0]);
        assert!(seen[1..].iter().all(|&hit| hit));
    }
}
