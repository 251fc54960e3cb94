use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    pub const fn is_playable(self) -> bool {
        matches!(self, Self::NotStarted | Self::InProgress)
    }
}

/// Lifecycle of a single game.
///
/// The board is generated on the first reveal so that the first move can be kept safe. A session becomes terminal
/// exactly once; after that every command is ignored. Start a new session for a new game.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSession {
    config: GameConfig,
    seed: u64,
    board: Option<Board>,
    status: GameStatus,
    elapsed: Seconds,
    outbound: Option<Outbound>,
}

impl GameSession {
    /// Fails when the configuration cannot keep even the first cell mine free.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        RandomLayoutGenerator::check(config, (0, 0), FirstMovePolicy::SimpleSafe)?;
        Ok(Self::unchecked(config, seed))
    }

    /// A fresh session on [`GameConfig::default`], which always passes [`Self::new`]'s check.
    pub fn with_default_config(seed: u64) -> Self {
        Self::unchecked(GameConfig::default(), seed)
    }

    fn unchecked(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            board: None,
            status: GameStatus::NotStarted,
            elapsed: 0,
            outbound: None,
        }
    }

    pub fn with_board(board: Board) -> Self {
        Self {
            config: GameConfig::new_unchecked(board.size(), board.mine_count()),
            seed: 0,
            board: Some(board),
            status: GameStatus::NotStarted,
            elapsed: 0,
            outbound: None,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Elapsed seconds, frozen once the session is terminal.
    pub fn elapsed(&self) -> Seconds {
        self.elapsed
    }

    pub fn mines_left(&self) -> i32 {
        self.board
            .as_ref()
            .map_or(i32::from(self.config.mines), Board::mines_left)
    }

    /// Player-visible cell, hidden everywhere until the board exists.
    pub fn cell(&self, coords: Coord2) -> Option<Cell> {
        match &self.board {
            Some(board) => board.cell(coords),
            None => self.config.contains(coords).then(Cell::default),
        }
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        if self.status.is_finished() {
            return Ok(RevealOutcome::NoChange);
        }
        if !self.config.contains(coords) {
            return Err(GameError::InvalidCoords);
        }

        let board = match self.board.take() {
            Some(board) => board,
            None => Self::generate_board(self.config, self.seed, coords)?,
        };
        let board = self.board.insert(board);

        let outcome = board.reveal(coords)?;
        self.observe(&outcome);
        Ok(outcome)
    }

    pub fn chord_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        if !matches!(self.status, GameStatus::InProgress) {
            return self.reveal(coords);
        }

        let Some(board) = self.board.as_mut() else {
            return Ok(RevealOutcome::NoChange);
        };
        let outcome = board.chord_reveal(coords)?;
        self.observe(&outcome);
        Ok(outcome)
    }

    /// Flags are only accepted while the game is running.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        match (&mut self.board, self.status) {
            (Some(board), GameStatus::InProgress) => board.toggle_flag(coords),
            _ => Ok(MarkOutcome::NoChange),
        }
    }

    /// Advances the clock by one second. Returns whether the clock moved.
    pub fn tick(&mut self) -> bool {
        if matches!(self.status, GameStatus::InProgress) {
            self.elapsed = self.elapsed.saturating_add(1);
            true
        } else {
            false
        }
    }

    /// Takes the pending outbound message, raised once when the game is won.
    pub fn take_outbound(&mut self) -> Option<Outbound> {
        self.outbound.take()
    }

    fn generate_board(config: GameConfig, seed: u64, start: Coord2) -> Result<Board> {
        let mut policy = FirstMovePolicy::FirstMoveZero;
        loop {
            match RandomLayoutGenerator::new(seed, start, policy).generate(config) {
                Ok(layout) => return Ok(Board::from_layout(&layout)),
                Err(GameError::InvalidConfiguration) if policy != FirstMovePolicy::SimpleSafe => {
                    log::warn!("Cannot keep {:?} for start {:?}, falling back", policy, start);
                    policy = policy.weaker().ok_or(GameError::InvalidConfiguration)?;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn observe(&mut self, outcome: &RevealOutcome) {
        match outcome {
            RevealOutcome::NoChange => {}
            RevealOutcome::HitMine => {
                self.mark_started();
                self.end_game(false);
            }
            RevealOutcome::Revealed(_) => {
                self.mark_started();
                if self.board.as_ref().is_some_and(Board::is_cleared) {
                    self.end_game(true);
                }
            }
        }
    }

    fn mark_started(&mut self) {
        if matches!(self.status, GameStatus::NotStarted) {
            log::debug!("game started");
            self.status = GameStatus::InProgress;
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.status.is_finished() {
            return;
        }

        self.status = if won {
            GameStatus::Won
        } else {
            GameStatus::Lost
        };
        log::debug!("game ended: {:?} after {}s", self.status, self.elapsed);

        if won {
            self.outbound = Some(Outbound::RequestSaveScore { time: self.elapsed });
        }
    }
}
