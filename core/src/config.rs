use serde::{Deserialize, Serialize};

use crate::*;

/// Mine density tier. The index is what gets persisted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Out of range indices clamp to the hardest tier.
    pub const fn from_index(index: u8) -> Self {
        match index {
            0 => Self::Easy,
            1 => Self::Medium,
            _ => Self::Hard,
        }
    }

    pub const fn index(self) -> u8 {
        match self {
            Self::Easy => 0,
            Self::Medium => 1,
            Self::Hard => 2,
        }
    }

    /// Share of the board covered by mines, in percent.
    pub const fn mine_percent(self) -> CellCount {
        match self {
            Self::Easy => 15,
            Self::Medium => 17,
            Self::Hard => 19,
        }
    }

    pub const fn mine_count(self, total_tiles: CellCount) -> CellCount {
        // at most 1024 * 19, no overflow in u32
        ((total_tiles as u32 * self.mine_percent() as u32) / 100) as CellCount
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Easy
    }
}

/// Parameters fixed for the lifetime of a single game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: Coord,
    pub height: Coord,
    pub difficulty: u8,
    pub ensure_solvable: bool,
    pub wrap_enabled: bool,
}

impl GameConfig {
    pub const fn new_unchecked(width: Coord, height: Coord, difficulty: u8) -> Self {
        Self {
            width,
            height,
            difficulty,
            ensure_solvable: false,
            wrap_enabled: false,
        }
    }

    pub fn new(width: Coord, height: Coord, difficulty: u8) -> Result<Self> {
        let config = Self::new_unchecked(width, height, difficulty);
        config.validate()?;
        Ok(config)
    }

    pub const fn with_solvable(mut self, ensure_solvable: bool) -> Self {
        self.ensure_solvable = ensure_solvable;
        self
    }

    pub const fn with_wrap(mut self, wrap_enabled: bool) -> Self {
        self.wrap_enabled = wrap_enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=BOARD_MAX_WIDTH).contains(&self.width) {
            return Err(GameError::InvalidWidth(self.width));
        }
        if !(1..=BOARD_MAX_HEIGHT).contains(&self.height) {
            return Err(GameError::InvalidHeight(self.height));
        }
        if self.difficulty > Difficulty::Hard.index() {
            return Err(GameError::InvalidDifficulty(self.difficulty));
        }
        Ok(())
    }

    pub const fn size(&self) -> Coord2 {
        (self.width, self.height)
    }

    pub const fn total_tiles(&self) -> CellCount {
        mult(self.width, self.height)
    }

    pub const fn difficulty(&self) -> Difficulty {
        Difficulty::from_index(self.difficulty)
    }

    pub const fn mine_count(&self) -> CellCount {
        self.difficulty().mine_count(self.total_tiles())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        // fits a 128x64 screen at 8px tiles with room for the status bar
        Self::new_unchecked(16, 7, Difficulty::Easy.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_fields() {
        assert_eq!(GameConfig::new(0, 8, 0), Err(GameError::InvalidWidth(0)));
        assert_eq!(GameConfig::new(8, 33, 0), Err(GameError::InvalidHeight(33)));
        assert_eq!(GameConfig::new(8, 8, 3), Err(GameError::InvalidDifficulty(3)));
        assert!(GameConfig::new(32, 32, 2).is_ok());
    }

    #[test]
    fn mine_count_follows_difficulty() {
        let easy = GameConfig::new(10, 10, 0).unwrap();
        let medium = GameConfig::new(10, 10, 1).unwrap();
        let hard = GameConfig::new(10, 10, 2).unwrap();

        assert_eq!(easy.mine_count(), 15);
        assert_eq!(medium.mine_count(), 17);
        assert_eq!(hard.mine_count(), 19);
        assert_eq!(GameConfig::new(32, 32, 2).unwrap().mine_count(), 194);
    }

    #[test]
    fn difficulty_index_is_clamped() {
        assert_eq!(Difficulty::from_index(7), Difficulty::Hard);
        assert_eq!(GameConfig::new_unchecked(4, 4, 9).difficulty(), Difficulty::Hard);
    }
}
