//! Move requests, validation and application for FreeCell.
//
//! A `MoveRequest` names a source cell, a destination cell and how many
//! cards to take from the top of the source. `check_move` runs every
//! legality and capacity check without touching the board; `apply_move`
//! re-checks, realises the move as single-card `Step`s (through the
//! supermove decomposition for tableau destinations) and commits the result
//! only if the whole move succeeded.

use core::fmt;

use crate::board::{Board, CellId, CellKind};
use crate::rules::{can_add_to_tableau, can_place_on_free, can_place_on_home, capacity};
use crate::supermove::{self, PreconditionViolation, Step, Subproblem};

/// A logical move of `count` cards from the top of `from` onto `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MoveRequest {
    pub from: CellId,
    pub to: CellId,
    pub count: usize,
}

impl MoveRequest {
    pub fn new(from: CellId, to: CellId, count: usize) -> Self {
        MoveRequest { from, to, count }
    }

    /// Shorthand for a single-card move.
    pub fn single(from: CellId, to: CellId) -> Self {
        MoveRequest::new(from, to, 1)
    }
}

impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 1 {
            write!(f, "{} -> {}", self.from, self.to)
        } else {
            write!(f, "{} -> {} ({} cards)", self.from, self.to, self.count)
        }
    }
}

/// Why a requested move was refused. The board is never modified when one
/// of these is returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvalidMove {
    UnknownCell(CellId),
    SameCell,
    FromHome,
    EmptySource,
    BadCount { count: usize, held: usize },
    FreeCellRule,
    HomeCellRule,
    NotACascade,
    OverCapacity { count: usize, capacity: usize },
}

impl fmt::Display for InvalidMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCell(id) => write!(f, "cell {:?} is not on the board", id),
            Self::SameCell => write!(f, "source and destination are the same cell"),
            Self::FromHome => write!(f, "cards cannot leave a home cell"),
            Self::EmptySource => write!(f, "source cell is empty"),
            Self::BadCount { count, held } => {
                write!(f, "cannot take {} card(s) from a cell holding {}", count, held)
            }
            Self::FreeCellRule => write!(f, "a free cell takes one card and only when empty"),
            Self::HomeCellRule => write!(f, "card does not continue the home cell"),
            Self::NotACascade => write!(f, "cards do not form a cascade onto the destination"),
            Self::OverCapacity { count, capacity } => {
                write!(f, "{} cards requested but at most {} can move", count, capacity)
            }
        }
    }
}

impl std::error::Error for InvalidMove {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveError {
    /// The move breaks a rule; recoverable, board unchanged.
    Invalid(InvalidMove),
    /// The decomposition was reached with a move that had not really been
    /// validated. Board unchanged; indicates a bug.
    DecompositionPrecondition(PreconditionViolation),
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(e) => write!(f, "invalid move: {}", e),
            Self::DecompositionPrecondition(e) => write!(f, "supermove precondition: {}", e),
        }
    }
}

impl std::error::Error for MoveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Invalid(e) => Some(e),
            Self::DecompositionPrecondition(e) => Some(e),
        }
    }
}

impl From<InvalidMove> for MoveError {
    fn from(e: InvalidMove) -> Self {
        MoveError::Invalid(e)
    }
}

impl From<PreconditionViolation> for MoveError {
    fn from(e: PreconditionViolation) -> Self {
        MoveError::DecompositionPrecondition(e)
    }
}

/// Result of a successful move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Single-card moves actually performed, in order.
    pub steps: Vec<Step>,
    /// Every home cell is complete after this move.
    pub won: bool,
}

/// Empty tableau columns usable as temporary storage for a move onto `to`.
/// An empty destination cannot be its own temporary column.
pub fn temporary_columns(board: &Board, to: CellId) -> usize {
    let empty = board.count_empty(CellKind::Tableau);
    let to_is_empty_column =
        to.kind == CellKind::Tableau && board.cell(to).is_some_and(|c| c.is_empty());
    if to_is_empty_column {
        empty.saturating_sub(1)
    } else {
        empty
    }
}

/// Largest run that could currently be moved onto `to`.
pub fn move_capacity(board: &Board, to: CellId) -> usize {
    capacity(board.count_empty(CellKind::Free), temporary_columns(board, to))
}

/// Run every legality and capacity check for `req` against `board`.
pub fn check_move(board: &Board, req: &MoveRequest) -> Result<(), InvalidMove> {
    let source = board.cell(req.from).ok_or(InvalidMove::UnknownCell(req.from))?;
    let dest = board.cell(req.to).ok_or(InvalidMove::UnknownCell(req.to))?;

    if req.from == req.to {
        return Err(InvalidMove::SameCell);
    }
    if req.from.kind == CellKind::Home {
        return Err(InvalidMove::FromHome);
    }
    let Some(top) = source.top() else {
        return Err(InvalidMove::EmptySource);
    };
    let held = source.len();
    if req.count == 0 || req.count > held || (req.from.kind == CellKind::Free && req.count != 1) {
        return Err(InvalidMove::BadCount {
            count: req.count,
            held,
        });
    }

    match req.to.kind {
        CellKind::Free => {
            if !can_place_on_free(dest, req.count) {
                return Err(InvalidMove::FreeCellRule);
            }
        }
        CellKind::Home => {
            if !can_place_on_home(top, dest, req.count) {
                return Err(InvalidMove::HomeCellRule);
            }
        }
        CellKind::Tableau => {
            let capacity = move_capacity(board, req.to);
            if req.count > capacity {
                return Err(InvalidMove::OverCapacity {
                    count: req.count,
                    capacity,
                });
            }
            if !can_add_to_tableau(source, dest, req.count) {
                return Err(InvalidMove::NotACascade);
            }
        }
    }
    Ok(())
}

/// Pure query: would `req` be accepted on `board`?
pub fn is_legal_move(board: &Board, req: &MoveRequest) -> bool {
    check_move(board, req).is_ok()
}

/// The single-card steps `req` would perform, without changing `board`.
pub fn plan_move(board: &Board, req: &MoveRequest) -> Result<Vec<Step>, MoveError> {
    let mut scratch = board.clone();
    perform(&mut scratch, req)
}

/// Validate and perform `req`.
///
/// On any error the board is exactly as it was before the call.
pub fn apply_move(board: &mut Board, req: &MoveRequest) -> Result<MoveOutcome, MoveError> {
    let mut scratch = board.clone();
    match perform(&mut scratch, req) {
        Ok(steps) => {
            *board = scratch;
            let won = board.is_won();
            log::debug!("move {} done in {} step(s)", req, steps.len());
            Ok(MoveOutcome { steps, won })
        }
        Err(e) => {
            match &e {
                MoveError::Invalid(reason) => log::debug!("move {} refused: {}", req, reason),
                MoveError::DecompositionPrecondition(v) => {
                    log::error!("move {} passed validation but failed: {}", req, v)
                }
            }
            Err(e)
        }
    }
}

fn perform(board: &mut Board, req: &MoveRequest) -> Result<Vec<Step>, MoveError> {
    check_move(board, req)?;
    match req.to.kind {
        CellKind::Free | CellKind::Home => {
            let card = board.move_top(req.from, req.to).ok_or(InvalidMove::EmptySource)?;
            Ok(vec![Step {
                from: req.from,
                to: req.to,
                card,
            }])
        }
        CellKind::Tableau => {
            let sub = Subproblem::new(req.from, req.to, req.count, temporary_columns(board, req.to));
            Ok(supermove::execute(board, sub)?)
        }
    }
}

/// Move the first card from a cell of `kind` that may go onto `home`.
fn home_from(board: &mut Board, home: CellId, kind: CellKind) -> Option<Step> {
    let dest = board.cell(home)?;
    let from = CellId::all_of(kind).find(|&id| {
        board
            .cell(id)
            .and_then(|c| c.top())
            .is_some_and(|card| can_place_on_home(card, dest, 1))
    })?;
    let card = board.move_top(from, home)?;
    Some(Step { from, to: home, card })
}

/// True if some free-cell or tableau top card could go to some home cell.
pub fn has_home_move(board: &Board) -> bool {
    CellId::all_of(CellKind::Home).any(|home| {
        let Some(dest) = board.cell(home) else {
            return false;
        };
        [CellKind::Free, CellKind::Tableau]
            .iter()
            .flat_map(|&kind| CellId::all_of(kind))
            .filter_map(|id| board.cell(id).and_then(|c| c.top()))
            .any(|card| can_place_on_home(card, dest, 1))
    })
}

/// Repeatedly send cards home until a full pass moves nothing.
///
/// Each pass offers every home cell, in order, the first eligible free-cell
/// card, or failing that the first eligible tableau card. Returns the moves
/// made; an empty vector means nothing could go home.
pub fn auto_home(board: &mut Board) -> Vec<Step> {
    let mut steps = Vec::new();
    loop {
        let mut moved = false;
        for home in CellId::all_of(CellKind::Home) {
            let step = home_from(board, home, CellKind::Free)
                .or_else(|| home_from(board, home, CellKind::Tableau));
            if let Some(step) = step {
                log::debug!("auto-home {}", step);
                steps.push(step);
                moved = true;
            }
        }
        if !moved {
            break;
        }
    }
    steps
}

// ----- Tests -----
