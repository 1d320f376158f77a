use serde::{Deserialize, Serialize};

use crate::*;

/// Candidates drawn per [`GenerationJob::step`] when generating synchronously.
const NEW_GAME_BATCH: u32 = 64;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Playing,
    Won,
    Lost,
}

impl Phase {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Per-game counters and cursor, kept in step with the board by every action.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Runtime {
    pub cursor_row: Coord,
    pub cursor_col: Coord,
    pub mines_left: CellCount,
    pub flags_left: CellCount,
    pub tiles_left: CellCount,
    /// Opaque caller timestamp, see [`GameState::stamp_start`].
    pub start_tick: u32,
    pub phase: Phase,
}

impl Runtime {
    /// Counters for an untouched `board`, cursor on the origin.
    pub fn fresh(board: &Board) -> Self {
        Self {
            cursor_row: 0,
            cursor_col: 0,
            mines_left: board.mine_count(),
            flags_left: board.mine_count(),
            tiles_left: board.safe_tiles(),
            start_tick: 0,
            phase: Phase::Playing,
        }
    }

    pub const fn cursor(&self) -> Coord2 {
        (self.cursor_col, self.cursor_row)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Move { dx: Delta, dy: Delta },
    Reveal,
    Flag,
    Chord,
    NewGame,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionResult {
    Noop,
    Changed,
    Win,
    Lose,
    Invalid,
}

impl ActionResult {
    pub const fn has_update(self) -> bool {
        use ActionResult::*;
        match self {
            Noop => false,
            Changed => true,
            Win => true,
            Lose => true,
            Invalid => false,
        }
    }
}

/// How a cursor move related to the board edges.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// Not a move, or a move that stayed inside the board without changing anything.
    #[default]
    None,
    Moved,
    /// The raw target was off the board and wrapped to the opposite edge.
    Wrapped,
    /// The raw target was off the board and got clamped.
    Blocked,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub result: ActionResult,
    pub move_outcome: MoveOutcome,
}

impl From<ActionResult> for ActionOutcome {
    fn from(result: ActionResult) -> Self {
        Self {
            result,
            move_outcome: MoveOutcome::None,
        }
    }
}

/// Board, config and runtime of a single game, mutated only through actions.
///
/// Deserializing bypasses validation; pass restored data through
/// [`GameState::restore`] or check it with [`GameState::validate_state`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    config: GameConfig,
    runtime: Runtime,
}

impl GameState {
    /// An empty, mine-free board of the configured size. Call
    /// [`new_game`](Self::new_game) to lay out mines.
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        let board = Board::new(config.size());
        let runtime = Runtime::fresh(&board);
        Ok(Self {
            board,
            config,
            runtime,
        })
    }

    /// Starts a game on a prepared board.
    pub fn with_board(config: GameConfig, board: Board) -> Result<Self> {
        let runtime = Runtime::fresh(&board);
        Self::restore(board, config, runtime)
    }

    /// Reassembles a saved game, rejecting it if any invariant is broken.
    pub fn restore(board: Board, config: GameConfig, runtime: Runtime) -> Result<Self> {
        check_parts(&board, &config, &runtime)?;
        Ok(Self {
            board,
            config,
            runtime,
        })
    }

    pub(crate) fn install(&mut self, config: GameConfig, board: Board) {
        self.runtime = Runtime::fresh(&board);
        self.config = config;
        self.board = board;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn phase(&self) -> Phase {
        self.runtime.phase
    }

    pub fn cursor(&self) -> Coord2 {
        self.runtime.cursor()
    }

    /// Records when the caller's clock started for this game.
    pub fn stamp_start(&mut self, tick: u32) {
        self.runtime.start_tick = tick;
    }

    /// Generates a fresh board for the current config, blocking until one is accepted.
    pub fn new_game<G>(&mut self, generator: &mut G) -> ActionResult
    where
        G: BoardGenerator + ?Sized,
    {
        let mut job = match GenerationJob::begin(self.config) {
            Ok(job) => job,
            Err(err) => {
                log::warn!("Cannot start a new game: {}", err);
                return ActionResult::Invalid;
            }
        };

        while job.step(generator, NEW_GAME_BATCH).is_running() {}
        job.finish(self, false)
    }

    pub fn apply_action<G>(&mut self, action: Action, generator: &mut G) -> ActionResult
    where
        G: BoardGenerator + ?Sized,
    {
        self.apply_action_ex(action, generator).result
    }

    /// Like [`apply_action`](Self::apply_action), also classifying cursor moves.
    ///
    /// Reveal, flag and chord act on the cursor tile and are ignored once the
    /// game is over. Moves and new games are accepted in any phase.
    pub fn apply_action_ex<G>(&mut self, action: Action, generator: &mut G) -> ActionOutcome
    where
        G: BoardGenerator + ?Sized,
    {
        use Action::*;

        match action {
            Move { dx, dy } => self.move_cursor(dx, dy),
            NewGame => self.new_game(generator).into(),
            _ if !self.runtime.phase.is_playing() => ActionResult::Noop.into(),
            Reveal => self.reveal(self.cursor()).into(),
            Flag => self.toggle_flag(self.cursor()).into(),
            Chord => self.chord(self.cursor()).into(),
        }
    }

    pub fn reveal(&mut self, coords: Coord2) -> ActionResult {
        if !self.runtime.phase.is_playing() {
            return ActionResult::Noop;
        }
        if !self.board.contains(coords) {
            return ActionResult::Invalid;
        }

        let cell = self.board[coords];
        if !cell.is_hidden() {
            return ActionResult::Noop;
        }
        if cell.is_mine() {
            log::debug!("Mine hit at {:?}", coords);
            return self.reveal_all_mines();
        }

        let revealed = self.board.reveal_flood(coords);
        self.apply_revealed(revealed)
    }

    /// Opens every unflagged neighbor of a satisfied clue.
    ///
    /// Flags are only counted, so a misplaced flag can make this detonate a mine.
    pub fn chord(&mut self, coords: Coord2) -> ActionResult {
        if !self.runtime.phase.is_playing() {
            return ActionResult::Noop;
        }
        if !self.board.contains(coords) {
            return ActionResult::Invalid;
        }

        let cell = self.board[coords];
        let clue = cell.neighbor_mines();
        if !cell.is_revealed() || clue == 0 {
            return ActionResult::Noop;
        }
        if self.board.count_neighbors(coords, Cell::is_flagged) != clue {
            return ActionResult::Noop;
        }

        let mut revealed = 0;
        for pos in self.board.iter_neighbors(coords) {
            let neighbor = self.board[pos];
            if !neighbor.is_hidden() {
                continue;
            }
            if neighbor.is_mine() {
                log::debug!("Chord at {:?} hit a mine at {:?}", coords, pos);
                return self.reveal_all_mines();
            }
            revealed += self.board.reveal_flood(pos);
        }

        self.apply_revealed(revealed)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> ActionResult {
        if !self.runtime.phase.is_playing() {
            return ActionResult::Noop;
        }
        if !self.board.contains(coords) {
            return ActionResult::Invalid;
        }

        let cell = self.board[coords];
        if cell.is_revealed() {
            return ActionResult::Noop;
        }

        let runtime = &mut self.runtime;
        if cell.is_flagged() {
            runtime.flags_left += 1;
            if cell.is_mine() {
                runtime.mines_left += 1;
            }
        } else {
            if runtime.flags_left == 0 {
                return ActionResult::Noop;
            }
            runtime.flags_left -= 1;
            if cell.is_mine() {
                runtime.mines_left -= 1;
            }
        }
        self.board.toggle_flag(coords);

        self.check_win_conditions()
    }

    /// Moves the cursor by `(dx, dy)`, wrapping or clamping at the edges per config.
    pub fn move_cursor(&mut self, dx: Delta, dy: Delta) -> ActionOutcome {
        let (width, height) = self.board.size();
        if width == 0 || height == 0 {
            return ActionResult::Invalid.into();
        }
        let (width, height) = (i16::from(width), i16::from(height));

        let raw_col = i16::from(self.runtime.cursor_col) + i16::from(dx);
        let raw_row = i16::from(self.runtime.cursor_row) + i16::from(dy);
        let inside = self.board.in_bounds(raw_col, raw_row);

        let (col, row) = if self.config.wrap_enabled {
            (raw_col.rem_euclid(width), raw_row.rem_euclid(height))
        } else {
            (raw_col.clamp(0, width - 1), raw_row.clamp(0, height - 1))
        };
        let next = (col as Coord, row as Coord);
        let moved = next != self.cursor();

        self.runtime.cursor_col = next.0;
        self.runtime.cursor_row = next.1;

        let move_outcome = match (inside, self.config.wrap_enabled) {
            (false, true) => MoveOutcome::Wrapped,
            (false, false) => MoveOutcome::Blocked,
            (true, _) if moved => MoveOutcome::Moved,
            (true, _) => MoveOutcome::None,
        };
        let result = if moved {
            ActionResult::Changed
        } else {
            ActionResult::Noop
        };

        ActionOutcome {
            result,
            move_outcome,
        }
    }

    /// Wins once every safe tile is open and every flag sits on a mine.
    ///
    /// On a win the remaining unflagged tiles are revealed as well.
    pub fn check_win_conditions(&mut self) -> ActionResult {
        let runtime = &self.runtime;
        if runtime.tiles_left != 0 || runtime.flags_left != runtime.mines_left {
            return ActionResult::Changed;
        }

        self.board.reveal_all();
        self.runtime.phase = Phase::Won;
        ActionResult::Win
    }

    /// Ends the game as lost and opens the whole board; flags stay in place.
    pub fn reveal_all_mines(&mut self) -> ActionResult {
        self.board.reveal_all();
        self.runtime.phase = Phase::Lost;
        ActionResult::Lose
    }

    /// Replaces the config if the current board and runtime still satisfy it.
    pub fn set_config(&mut self, config: GameConfig) -> ActionResult {
        if let Err(err) = check_parts(&self.board, &config, &self.runtime) {
            log::warn!("Rejected config {:?}: {}", config, err);
            return ActionResult::Invalid;
        }
        if config == self.config {
            return ActionResult::Noop;
        }

        self.config = config;
        ActionResult::Changed
    }

    /// Replaces the runtime if it is consistent with the current board.
    pub fn set_runtime(&mut self, runtime: Runtime) -> ActionResult {
        if let Err(err) = check_parts(&self.board, &self.config, &runtime) {
            log::warn!("Rejected runtime {:?}: {}", runtime, err);
            return ActionResult::Invalid;
        }
        if runtime == self.runtime {
            return ActionResult::Noop;
        }

        self.runtime = runtime;
        ActionResult::Changed
    }

    /// [`ActionResult::Noop`] when every invariant holds, [`ActionResult::Invalid`] otherwise.
    pub fn validate_state(&self) -> ActionResult {
        match self.check() {
            Ok(()) => ActionResult::Noop,
            Err(err) => {
                log::warn!("Invalid game state: {}", err);
                ActionResult::Invalid
            }
        }
    }

    /// Reports the first broken invariant.
    pub fn check(&self) -> Result<()> {
        check_parts(&self.board, &self.config, &self.runtime)
    }

    fn apply_revealed(&mut self, revealed: CellCount) -> ActionResult {
        if revealed == 0 {
            return ActionResult::Noop;
        }

        self.runtime.tiles_left = self.runtime.tiles_left.saturating_sub(revealed);
        self.check_win_conditions()
    }
}

fn check_parts(board: &Board, config: &GameConfig, runtime: &Runtime) -> Result<()> {
    config.validate()?;

    if board.size() != config.size() {
        return Err(GameError::BoardShapeMismatch {
            board: board.size(),
            config: config.size(),
        });
    }

    let mine_count = board.mine_count();
    let counted = board.counted_mines();
    if mine_count != counted {
        return Err(GameError::MineCountMismatch {
            declared: mine_count,
            actual: counted,
        });
    }
    if mine_count >= board.total_tiles() {
        return Err(GameError::TooManyMines);
    }

    if !board.contains(runtime.cursor()) {
        return Err(GameError::CursorOutOfBounds(runtime.cursor()));
    }

    for (coords, cell) in board.iter() {
        if cell.is_revealed() && cell.is_flagged() {
            return Err(GameError::RevealedFlagConflict(coords));
        }
        if !cell.is_mine() && cell.neighbor_mines() != board.count_neighbors(coords, Cell::is_mine)
        {
            return Err(GameError::NeighborCountMismatch(coords));
        }
        if runtime.phase.is_playing() && cell.is_revealed() && cell.is_mine() {
            return Err(GameError::RevealedMineWhilePlaying(coords));
        }
    }

    let flags_placed = board.flag_count();
    let expected_flags = mine_count.saturating_sub(flags_placed);
    if flags_placed > mine_count || runtime.flags_left != expected_flags {
        return Err(GameError::FlagsLeftMismatch {
            expected: expected_flags,
            actual: runtime.flags_left,
        });
    }

    let expected_mines = mine_count - board.flagged_mine_count();
    if runtime.mines_left != expected_mines {
        return Err(GameError::MinesLeftMismatch {
            expected: expected_mines,
            actual: runtime.mines_left,
        });
    }

    let safe_tiles = board.safe_tiles();
    if runtime.phase == Phase::Lost {
        // losing opens the whole board, so only the upper bound survives
        if runtime.tiles_left > safe_tiles {
            return Err(GameError::TilesLeftMismatch {
                expected: safe_tiles,
                actual: runtime.tiles_left,
            });
        }
    } else {
        let expected_tiles = safe_tiles - board.revealed_safe_count();
        if runtime.tiles_left != expected_tiles {
            return Err(GameError::TilesLeftMismatch {
                expected: expected_tiles,
                actual: runtime.tiles_left,
            });
        }
    }

    if runtime.phase == Phase::Won
        && (runtime.tiles_left != 0 || runtime.flags_left != runtime.mines_left)
    {
        return Err(GameError::WonWithoutClearedBoard);
    }

    Ok(())
}
