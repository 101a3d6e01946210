//! Game controller: turns move events into board operations
//!
//! Runs the lock cycle after a failed descent, awards points scaled by the
//! difficulty, and manages the optional second player for versus games.
//! Each player owns an independent [`Board`]; nothing is shared between them.

use crate::board::{Board, BoardState, ViewSnapshot, BOARD_COLS, BOARD_ROWS};
use crate::difficulty::Difficulty;
use crate::matrix::ClearResult;
use tracing::{debug, info};

/// Points for a soft drop step, before the difficulty multiplier
const SOFT_DROP_POINTS: i64 = 1;
/// Points for each second survived
const SURVIVAL_POINTS: i64 = 1;

/// Which way a move event pushes the piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Down,
    Left,
    Right,
    Rotate,
}

/// Who triggered a move event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    /// A key press
    User,
    /// The fall timer
    Thread,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveEvent {
    pub kind: EventType,
    pub source: EventSource,
}

impl MoveEvent {
    pub fn new(kind: EventType, source: EventSource) -> Self {
        Self { kind, source }
    }

    pub fn user(kind: EventType) -> Self {
        Self::new(kind, EventSource::User)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerId {
    One,
    Two,
}

/// Result of a down event
#[derive(Debug, Clone)]
pub struct DownData {
    /// Set only when the piece locked
    pub clear: Option<ClearResult>,
    pub view: ViewSnapshot,
    /// The replacement piece overlapped the stack
    pub game_over: bool,
}

#[derive(Debug, Clone)]
pub enum EventOutcome {
    Moved(ViewSnapshot),
    Down(DownData),
}

/// Coordinates one or two boards for a local game
pub struct GameController {
    player_one: Board,
    player_two: Option<Board>,
    difficulty: Difficulty,
    paused: bool,
    rows: usize,
    cols: usize,
}

impl GameController {
    /// Single-player game on a standard board
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_size(BOARD_ROWS, BOARD_COLS, difficulty)
    }

    /// Single-player game on a `rows` x `cols` board
    pub fn with_size(rows: usize, cols: usize, difficulty: Difficulty) -> Self {
        Self::with_board(Board::new(rows, cols), difficulty)
    }

    /// Single-player game on a prepared board
    pub fn with_board(board: Board, difficulty: Difficulty) -> Self {
        let (rows, cols) = (board.rows(), board.cols());
        Self {
            player_one: board,
            player_two: None,
            difficulty,
            paused: false,
            rows,
            cols,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if self.difficulty != difficulty {
            info!("Difficulty set to {}", difficulty.name());
        }
        self.difficulty = difficulty;
    }

    pub fn is_versus(&self) -> bool {
        self.player_two.is_some()
    }

    /// Turn versus mode on or off
    ///
    /// Enabling gives player two a fresh board; disabling discards it.
    pub fn set_versus(&mut self, enabled: bool) {
        if enabled == self.is_versus() {
            return;
        }
        let (rows, cols) = (self.rows, self.cols);
        self.player_two = enabled.then(|| Board::new(rows, cols));
        info!("Versus mode {}", if enabled { "on" } else { "off" });
    }

    /// Install a prepared board for player two
    pub fn set_player_two(&mut self, board: Board) {
        self.player_two = Some(board);
    }

    pub fn board(&self, player: PlayerId) -> Option<&Board> {
        match player {
            PlayerId::One => Some(&self.player_one),
            PlayerId::Two => self.player_two.as_ref(),
        }
    }

    pub fn board_mut(&mut self, player: PlayerId) -> Option<&mut Board> {
        match player {
            PlayerId::One => Some(&mut self.player_one),
            PlayerId::Two => self.player_two.as_mut(),
        }
    }

    /// Players currently in the game
    pub fn players(&self) -> Vec<PlayerId> {
        let mut players = vec![PlayerId::One];
        if self.is_versus() {
            players.push(PlayerId::Two);
        }
        players
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        debug!("Paused: {}", self.paused);
    }

    /// True once every board in play has topped out
    pub fn is_over(&self) -> bool {
        self.players()
            .into_iter()
            .filter_map(|player| self.board(player))
            .all(Board::is_game_over)
    }

    /// Reset every board and resume play
    pub fn new_game(&mut self) {
        self.player_one.reset_game();
        if let Some(board) = &mut self.player_two {
            board.reset_game();
        }
        self.paused = false;
    }

    /// Apply one move event to a player's board
    ///
    /// Returns `None` if the player is absent, the game is paused or that
    /// player's board is already over.
    pub fn handle_event(&mut self, player: PlayerId, event: MoveEvent) -> Option<EventOutcome> {
        if self.paused {
            return None;
        }
        let multiplier = self.difficulty.score_multiplier();
        let board = self.board_mut(player)?;
        if board.state() == BoardState::GameOver {
            return None;
        }

        let outcome = match event.kind {
            EventType::Down => EventOutcome::Down(drop_one(board, event.source, multiplier)),
            EventType::Left => {
                board.move_left();
                EventOutcome::Moved(board.view())
            }
            EventType::Right => {
                board.move_right();
                EventOutcome::Moved(board.view())
            }
            EventType::Rotate => {
                board.rotate_left();
                EventOutcome::Moved(board.view())
            }
        };

        if let EventOutcome::Down(DownData { game_over: true, .. }) = outcome {
            info!(
                "Player {:?} topped out with {} points",
                player,
                self.board(player).map_or(0, |b| b.score().points())
            );
        }
        Some(outcome)
    }

    /// One timer-driven descent for every live player
    pub fn tick(&mut self) -> Vec<(PlayerId, DownData)> {
        let mut results = Vec::new();
        for player in self.players() {
            let event = MoveEvent::new(EventType::Down, EventSource::Thread);
            if let Some(EventOutcome::Down(data)) = self.handle_event(player, event) {
                results.push((player, data));
            }
        }
        results
    }

    /// Reward every live player for surviving another second
    pub fn award_survival_point(&mut self) {
        if self.paused {
            return;
        }
        for player in self.players() {
            if let Some(board) = self.board_mut(player) {
                if !board.is_game_over() {
                    board.score_mut().add(SURVIVAL_POINTS);
                }
            }
        }
    }
}

/// Move down once, running the lock cycle if the piece is resting
fn drop_one(board: &mut Board, source: EventSource, multiplier: i64) -> DownData {
    if board.move_down() {
        if source == EventSource::User {
            board.score_mut().add(SOFT_DROP_POINTS * multiplier);
        }
        return DownData {
            clear: None,
            view: board.view(),
            game_over: false,
        };
    }

    board.lock_active_piece();
    let clear = board.clear_completed_rows();
    if clear.lines_removed() > 0 {
        board.score_mut().add(clear.score_bonus() * multiplier);
    }
    let game_over = board.spawn();

    DownData {
        clear: Some(clear),
        view: board.view(),
        game_over,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supply::PieceSupply;
    use crate::tetromino::TetrominoType;

    fn scripted(pieces: &[TetrominoType], difficulty: Difficulty) -> GameController {
        let supply = PieceSupply::with_queue(pieces.iter().copied(), 11);
        GameController::with_board(Board::with_supply(BOARD_ROWS, BOARD_COLS, supply), difficulty)
    }

    fn down(controller: &mut GameController, source: EventSource) -> DownData {
        match controller.handle_event(PlayerId::One, MoveEvent::new(EventType::Down, source)) {
            Some(EventOutcome::Down(data)) => data,
            other => panic!("expected a down outcome, got {:?}", other),
        }
    }

    #[test]
    fn test_soft_drop_awards_point() {
        let mut controller = scripted(&[TetrominoType::O], Difficulty::Easy);
        let data = down(&mut controller, EventSource::User);
        assert!(data.clear.is_none());
        assert_eq!(data.view.y(), 1);
        assert_eq!(controller.board(PlayerId::One).unwrap().score().points(), 1);
    }

    #[test]
    fn test_hard_doubles_soft_drop() {
        let mut controller = scripted(&[TetrominoType::O], Difficulty::Hard);
        down(&mut controller, EventSource::User);
        assert_eq!(controller.board(PlayerId::One).unwrap().score().points(), 2);
    }

    #[test]
    fn test_timer_descent_awards_nothing() {
        let mut controller = scripted(&[TetrominoType::O], Difficulty::Easy);
        let results = controller.tick();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, PlayerId::One);
        assert_eq!(controller.board(PlayerId::One).unwrap().score().points(), 0);
    }

    #[test]
    fn test_lock_cycle_spawns_next() {
        let mut controller = scripted(&[TetrominoType::O, TetrominoType::T], Difficulty::Easy);
        let mut locked = None;
        for _ in 0..BOARD_ROWS {
            let data = down(&mut controller, EventSource::Thread);
            if data.clear.is_some() {
                locked = Some(data);
                break;
            }
        }
        let data = locked.expect("piece should lock before running out of rows");
        assert_eq!(data.clear.as_ref().map(ClearResult::lines_removed), Some(0));
        assert!(!data.game_over);
        assert_eq!(data.view.brick_data(), TetrominoType::T.shape(0).as_slice());

        let board = controller.board(PlayerId::One).unwrap();
        assert_eq!(board.get(BOARD_ROWS as i32 - 1, 5), Some(4));
        assert_eq!(board.score().points(), 0);
    }

    #[test]
    fn test_moves_return_view() {
        let mut controller = scripted(&[TetrominoType::T], Difficulty::Easy);
        match controller.handle_event(PlayerId::One, MoveEvent::user(EventType::Left)) {
            Some(EventOutcome::Moved(view)) => assert_eq!(view.x(), 3),
            other => panic!("unexpected {:?}", other),
        }
        match controller.handle_event(PlayerId::One, MoveEvent::user(EventType::Rotate)) {
            Some(EventOutcome::Moved(view)) => {
                assert_eq!(view.brick_data(), TetrominoType::T.shape(1).as_slice())
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_pause_blocks_events() {
        let mut controller = scripted(&[TetrominoType::O], Difficulty::Easy);
        controller.toggle_pause();
        assert!(controller.is_paused());
        assert!(controller
            .handle_event(PlayerId::One, MoveEvent::user(EventType::Down))
            .is_none());
        assert!(controller.tick().is_empty());
        controller.award_survival_point();
        assert_eq!(controller.board(PlayerId::One).unwrap().score().points(), 0);

        controller.toggle_pause();
        assert!(controller
            .handle_event(PlayerId::One, MoveEvent::user(EventType::Down))
            .is_some());
    }

    #[test]
    fn test_versus_boards_are_independent() {
        let mut controller = GameController::new(Difficulty::Easy);
        assert!(controller
            .handle_event(PlayerId::Two, MoveEvent::user(EventType::Left))
            .is_none());

        controller.set_versus(true);
        assert_eq!(controller.players(), vec![PlayerId::One, PlayerId::Two]);

        controller.handle_event(PlayerId::Two, MoveEvent::user(EventType::Down));
        let one = controller.board(PlayerId::One).unwrap();
        let two = controller.board(PlayerId::Two).unwrap();
        assert_eq!(one.anchor().row, 0);
        assert_eq!(two.anchor().row, 1);
        assert_eq!(one.score().points(), 0);
        assert_eq!(two.score().points(), 1);

        assert_eq!(controller.tick().len(), 2);

        controller.set_versus(false);
        assert!(controller.board(PlayerId::Two).is_none());
    }

    #[test]
    fn test_scripted_player_two() {
        let mut controller = scripted(&[TetrominoType::O], Difficulty::Easy);
        let supply = PieceSupply::with_queue([TetrominoType::I, TetrominoType::T], 4);
        controller.set_player_two(Board::with_supply(BOARD_ROWS, BOARD_COLS, supply));
        assert!(controller.is_versus());

        let two = controller.board(PlayerId::Two).unwrap();
        assert_eq!(two.active_piece(), TetrominoType::I);
        assert_eq!(two.next_piece(), TetrominoType::T);
        assert_eq!(controller.board(PlayerId::One).unwrap().active_piece(), TetrominoType::O);

        // Player two's board runs its own lock cycle
        let mut locked = false;
        for _ in 0..BOARD_ROWS {
            let event = MoveEvent::new(EventType::Down, EventSource::Thread);
            if let Some(EventOutcome::Down(data)) = controller.handle_event(PlayerId::Two, event) {
                if data.clear.is_some() {
                    locked = true;
                    break;
                }
            }
        }
        assert!(locked);
        let two = controller.board(PlayerId::Two).unwrap();
        assert_eq!(two.active_piece(), TetrominoType::T);
        assert_eq!(two.get(BOARD_ROWS as i32 - 1, 4), Some(1));
        assert_eq!(controller.board(PlayerId::One).unwrap().anchor().row, 0);
    }

    #[test]
    fn test_survival_points() {
        let mut controller = GameController::new(Difficulty::Hard);
        controller.set_versus(true);
        controller.award_survival_point();
        controller.award_survival_point();
        assert_eq!(controller.board(PlayerId::One).unwrap().score().points(), 2);
        assert_eq!(controller.board(PlayerId::Two).unwrap().score().points(), 2);
    }

    #[test]
    fn test_new_game_resets_and_unpauses() {
        let mut controller = scripted(&[TetrominoType::O], Difficulty::Easy);
        down(&mut controller, EventSource::User);
        controller.toggle_pause();
        controller.new_game();
        assert!(!controller.is_paused());
        let board = controller.board(PlayerId::One).unwrap();
        assert_eq!(board.score().points(), 0);
        assert_eq!(board.anchor().row, 0);
        assert!(!controller.is_over());
    }
}
