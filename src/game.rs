//! Game-level state: the deal, the board, the move history and the
//! click-to-select state machine a front end drives.
//
//! A `Game` is fully described by:
//!   - the deal it started from (`DealSource` and the resulting deck)
//!   - the sequence of single logical moves applied so far
//!
//! The current `Board` is derivable from those two and is cached here.
//! Auto-home moves are recorded in the history as ordinary single-card
//! requests, so replaying the history always reproduces the board.

use serde::Serialize;

use crate::board::{Board, BoardSnapshot, CellId, CellKind};
use crate::card::Card;
use crate::deal::{DealError, DealSource, DECK_LEN};
use crate::moves::{self, InvalidMove, MoveError, MoveOutcome, MoveRequest};
use crate::supermove::Step;

/// The source currently picked up by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Selection {
    pub cell: CellId,
    pub count: usize,
}

/// What a call to `Game::choose` did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Choice {
    /// Nothing was selected and the chosen cell cannot be a source.
    Ignored,
    /// The chosen cards are now the selection.
    Selected(Selection),
    /// The selection was chosen again and has been dropped.
    Deselected,
    /// The selection was moved onto the chosen cell.
    Moved(MoveOutcome),
}

#[derive(Clone, Debug)]
pub struct Game {
    source: DealSource,
    label: String,
    initial_deck: [Card; DECK_LEN],
    board: Board,
    selection: Option<Selection>,
    history: Vec<MoveRequest>,
}

impl Game {
    /// Shuffle and deal a new game.
    pub fn new(source: DealSource) -> Result<Self, DealError> {
        let initial_deck = source.deck()?;
        let label = source.label();
        log::info!("new game: {}", label);
        Ok(Game {
            source,
            label,
            initial_deck,
            board: Board::deal(&initial_deck),
            selection: None,
            history: Vec::new(),
        })
    }

    /// Start the same deal over.
    pub fn restart(&mut self) {
        log::info!("restarting {}", self.label);
        self.board = Board::deal(&self.initial_deck);
        self.selection = None;
        self.history.clear();
    }

    pub fn source(&self) -> &DealSource {
        &self.source
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn initial_deck(&self) -> &[Card; DECK_LEN] {
        &self.initial_deck
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Moves applied since the deal, auto-home moves included.
    pub fn history(&self) -> &[MoveRequest] {
        &self.history
    }

    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    pub fn is_won(&self) -> bool {
        self.board.is_won()
    }

    pub fn is_legal_move(&self, req: &MoveRequest) -> bool {
        moves::is_legal_move(&self.board, req)
    }

    /// Largest run that could currently be moved onto `to`.
    pub fn capacity_for(&self, to: CellId) -> usize {
        moves::move_capacity(&self.board, to)
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.board.snapshot()
    }

    /// Validate and apply one logical move. Any pending selection is
    /// dropped, whether or not the move succeeds.
    pub fn request_move(&mut self, req: MoveRequest) -> Result<MoveOutcome, MoveError> {
        self.selection = None;
        let outcome = moves::apply_move(&mut self.board, &req)?;
        self.history.push(req);
        if outcome.won {
            log::info!("{} won after {} moves", self.label, self.history.len());
        }
        Ok(outcome)
    }

    /// Send every card that can go home there, until nothing more can.
    pub fn auto_move_home(&mut self) -> Vec<Step> {
        self.selection = None;
        let was_won = self.board.is_won();
        let steps = moves::auto_home(&mut self.board);
        self.history
            .extend(steps.iter().map(|s| MoveRequest::single(s.from, s.to)));
        if !was_won && self.board.is_won() {
            log::info!("{} won after {} moves", self.label, self.history.len());
        }
        steps
    }

    /// Feed one player choice of (`cell`, `count`) into the selection machine.
    ///
    /// With nothing selected, a non-empty free or tableau cell becomes the
    /// selection; home cells and empty cells are ignored. With a selection,
    /// choosing the identical (`cell`, `count`) drops it, and anything else
    /// is taken as the destination of a move (the chosen count is then
    /// irrelevant). The selection is always empty after a move attempt.
    pub fn choose(&mut self, cell: CellId, count: usize) -> Result<Choice, MoveError> {
        let Some(selected) = self.selection else {
            return self.select(cell, count);
        };
        if selected.cell == cell && selected.count == count {
            self.selection = None;
            log::debug!("deselected {}", cell);
            return Ok(Choice::Deselected);
        }
        let req = MoveRequest::new(selected.cell, cell, selected.count);
        self.request_move(req).map(Choice::Moved)
    }

    fn select(&mut self, cell: CellId, count: usize) -> Result<Choice, MoveError> {
        let source = self
            .board
            .cell(cell)
            .ok_or(InvalidMove::UnknownCell(cell))?;
        if cell.kind == CellKind::Home || source.is_empty() {
            return Ok(Choice::Ignored);
        }
        let held = source.len();
        if count == 0 || count > held || (cell.kind == CellKind::Free && count != 1) {
            return Err(InvalidMove::BadCount { count, held }.into());
        }
        let selection = Selection { cell, count };
        self.selection = Some(selection);
        log::debug!("selected {} card(s) from {}", count, cell);
        Ok(Choice::Selected(selection))
    }

    /// Rebuild the board by dealing the initial deck and replaying the
    /// history. Mainly a consistency check against the cached board.
    pub fn replay_history(&self) -> Result<Board, MoveError> {
        let mut board = Board::deal(&self.initial_deck);
        for req in &self.history {
            moves::apply_move(&mut board, req)?;
        }
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::standard_deck;
    use crate::deal::DeckSpec;

    fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    /// Standard deck order dealt round-robin: column 1 holds AC 9C 4D QD
    /// 7H 2S TS (bottom to top), column 2 holds 2C TC 5D KD 8H 3S JS, ...
    fn ordered_game() -> Game {
        Game::new(DealSource::Deck(DeckSpec {
            label: "ordered".to_string(),
            deck: standard_deck(),
        }))
        .unwrap()
    }

    #[test]
    fn new_game_deals_all_cards() {
        let game = Game::new(DealSource::Classic(1)).unwrap();
        assert_eq!(game.label(), "game 1");
        assert_eq!(game.board().card_count(), 52);
        assert_eq!(game.move_count(), 0);
        assert!(game.selection().is_none());
        assert!(!game.is_won());
    }

    #[test]
    fn new_game_rejects_bad_numbers() {
        assert!(matches!(
            Game::new(DealSource::Classic(0)),
            Err(DealError::GameNumberOutOfRange(0))
        ));
    }

    #[test]
    fn same_seed_same_deal() {
        let a = Game::new(DealSource::Classic(31337)).unwrap();
        let b = Game::new(DealSource::Classic(31337)).unwrap();
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn selection_machine() {
        let mut game = ordered_game();
        let t1 = CellId::tableau(0);
        let f1 = CellId::free(0);
        let h1 = CellId::home(0);

        // Home and empty cells cannot be picked up.
        assert_eq!(game.choose(h1, 1), Ok(Choice::Ignored));
        assert_eq!(game.choose(f1, 1), Ok(Choice::Ignored));

        let sel = Selection { cell: t1, count: 1 };
        assert_eq!(game.choose(t1, 1), Ok(Choice::Selected(sel)));
        assert_eq!(game.selection(), Some(sel));

        // Same choice again drops the selection.
        assert_eq!(game.choose(t1, 1), Ok(Choice::Deselected));
        assert_eq!(game.selection(), None);

        // Select again and move to a free cell.
        game.choose(t1, 1).unwrap();
        let Ok(Choice::Moved(outcome)) = game.choose(f1, 1) else {
            panic!("expected a move");
        };
        assert_eq!(outcome.steps.len(), 1);
        assert_eq!(outcome.steps[0].card, card("TS"));
        assert_eq!(game.board().cell(f1).unwrap().top(), Some(card("TS")));
        assert_eq!(game.selection(), None);
        assert_eq!(game.move_count(), 1);
    }

    #[test]
    fn failed_move_clears_selection_and_keeps_board() {
        let mut game = ordered_game();
        let before = game.snapshot();

        // TS onto JS: same color.
        game.choose(CellId::tableau(0), 1).unwrap();
        let err = game.choose(CellId::tableau(1), 1).unwrap_err();
        assert_eq!(err, MoveError::Invalid(InvalidMove::NotACascade));
        assert_eq!(game.selection(), None);
        assert_eq!(game.snapshot(), before);
        assert_eq!(game.move_count(), 0);
    }

    #[test]
    fn bad_counts_are_rejected() {
        let mut game = ordered_game();
        assert_eq!(
            game.choose(CellId::tableau(0), 8),
            Err(MoveError::Invalid(InvalidMove::BadCount { count: 8, held: 7 }))
        );
        assert_eq!(
            game.choose(CellId::tableau(0), 0),
            Err(MoveError::Invalid(InvalidMove::BadCount { count: 0, held: 7 }))
        );
        assert_eq!(game.selection(), None);

        game.request_move(MoveRequest::single(CellId::tableau(0), CellId::free(0)))
            .unwrap();
        assert_eq!(
            game.choose(CellId::free(0), 2),
            Err(MoveError::Invalid(InvalidMove::BadCount { count: 2, held: 1 }))
        );
    }

    #[test]
    fn unknown_cells_are_reported() {
        let mut game = ordered_game();
        let off = CellId::tableau(8);
        assert_eq!(
            game.choose(off, 1),
            Err(MoveError::Invalid(InvalidMove::UnknownCell(off)))
        );
    }

    #[test]
    fn restart_and_replay() {
        let mut game = ordered_game();
        game.request_move(MoveRequest::single(CellId::tableau(0), CellId::free(0)))
            .unwrap();
        game.request_move(MoveRequest::single(CellId::tableau(1), CellId::free(1)))
            .unwrap();
        game.auto_move_home();
        assert_eq!(game.replay_history().unwrap(), *game.board());

        game.restart();
        assert_eq!(game.move_count(), 0);
        assert_eq!(*game.board(), Board::deal(&standard_deck()));
    }

    #[test]
    fn reversed_deck_wins_by_auto_home() {
        let mut deck = standard_deck();
        deck.reverse();
        let mut game = Game::new(DealSource::Deck(DeckSpec {
            label: "reversed".to_string(),
            deck,
        }))
        .unwrap();

        let steps = game.auto_move_home();
        assert_eq!(steps.len(), 52);
        assert!(game.is_won());
        assert_eq!(game.move_count(), 52);
        assert_eq!(game.replay_history().unwrap(), *game.board());
    }

    #[test]
    fn auto_home_drops_the_selection() {
        let mut deck = standard_deck();
        deck.reverse();
        let mut game = Game::new(DealSource::Deck(DeckSpec {
            label: "reversed".to_string(),
            deck,
        }))
        .unwrap();

        let t1 = CellId::tableau(0);
        game.choose(t1, 1).unwrap();
        game.auto_move_home();
        assert!(game.board().cell(t1).unwrap().is_empty());
        assert_eq!(game.selection(), None);
        // The next choice starts a fresh selection instead of a move.
        assert_eq!(game.choose(CellId::free(0), 1), Ok(Choice::Ignored));
    }

    #[test]
    fn capacity_query_excludes_empty_destination() {
        let game = ordered_game();
        assert_eq!(game.capacity_for(CellId::tableau(0)), 5);
    }
}
