//! Multi-card "supermove" decomposition.
//
//! A validated run of `L` cards is moved from one cell to another using only
//! single-card moves. Runs that fit through the empty free cells
//! (`L <= f + 1`) are parked card by card and unparked onto the
//! destination in reverse. Longer runs are split in half around an empty
//! tableau column used as temporary storage:
//!
//! ```text
//!   source --(top L/2)------> temp
//!   source --(rest)---------> destination
//!   temp   --(L/2)----------> destination
//! ```
//!
//! Each of those three is itself a `Subproblem`. They are kept on an
//! explicit work stack rather than the call stack, so the order in which
//! single-card `Step`s are emitted is exactly the pop order of that stack.
//!
//! Nothing here re-checks legality. Callers must first establish (via
//! `rules`) that the run is a cascade that may land on the destination and
//! that `L <= capacity(f, t)`. Under that precondition every emitted step
//! is a legal single-card move and every temporary cell ends empty.

use core::fmt;

use serde::Serialize;

use crate::board::{Board, CellId, CellKind};
use crate::card::Card;

/// One single-card relocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Step {
    pub from: CellId,
    pub to: CellId,
    pub card: Card,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.card, self.from, self.to)
    }
}

/// One pending piece of a decomposition: move the top `length` cards of
/// `source` onto `destination`, with `available` empty tableau columns
/// that may be borrowed as temporary storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Subproblem {
    pub source: CellId,
    pub destination: CellId,
    pub length: usize,
    pub available: usize,
}

impl Subproblem {
    pub fn new(source: CellId, destination: CellId, length: usize, available: usize) -> Self {
        Subproblem {
            source,
            destination,
            length,
            available,
        }
    }
}

/// The decomposition was started without its precondition holding.
///
/// This is a contract violation by the caller, never a user error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreconditionViolation {
    pub subproblem: Subproblem,
    pub reason: &'static str,
}

impl fmt::Display for PreconditionViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.subproblem;
        write!(
            f,
            "{} while moving {} card(s) {} -> {} ({} temporary column(s))",
            self.reason, s.length, s.source, s.destination, s.available
        )
    }
}

impl std::error::Error for PreconditionViolation {}

/// Carry out `initial` on `board`, returning every single-card step in the
/// order performed.
///
/// On error the board may be partially moved; `moves::apply_move` runs this
/// against a scratch copy for that reason.
pub fn execute(board: &mut Board, initial: Subproblem) -> Result<Vec<Step>, PreconditionViolation> {
    let free = board.count_empty(CellKind::Free);
    let mut steps = Vec::with_capacity(initial.length * 2);
    let mut pending = vec![initial];

    while let Some(sub) = pending.pop() {
        if sub.length <= free + 1 {
            move_through_free_cells(board, sub, &mut steps)?;
            continue;
        }

        if sub.available == 0 {
            return Err(PreconditionViolation {
                subproblem: sub,
                reason: "run longer than capacity",
            });
        }
        let Some(temp) = board.first_empty(CellKind::Tableau, Some(sub.destination)) else {
            return Err(PreconditionViolation {
                subproblem: sub,
                reason: "no empty tableau column for temporary storage",
            });
        };

        // `parked` is the top of the run; `direct` the part nearer the
        // destination, which has to land first.
        let parked = sub.length / 2;
        let direct = sub.length - parked;
        let available = sub.available - 1;
        log::trace!(
            "split {} card(s) {} -> {} via {}: {} parked, {} direct",
            sub.length,
            sub.source,
            sub.destination,
            temp,
            parked,
            direct
        );

        pending.push(Subproblem::new(temp, sub.destination, parked, available));
        pending.push(Subproblem::new(sub.source, sub.destination, direct, available));
        pending.push(Subproblem::new(sub.source, temp, parked, available));
    }

    Ok(steps)
}

/// Same as `execute` but against a copy of `board`; the board passed in is
/// left untouched.
pub fn plan(board: &Board, initial: Subproblem) -> Result<Vec<Step>, PreconditionViolation> {
    let mut scratch = board.clone();
    execute(&mut scratch, initial)
}

/// Base case: park all but the bottom card of the run in distinct free
/// cells, move the bottom card, then unpark in reverse order.
fn move_through_free_cells(
    board: &mut Board,
    sub: Subproblem,
    steps: &mut Vec<Step>,
) -> Result<(), PreconditionViolation> {
    if sub.length == 0 {
        return Ok(());
    }

    let mut parked: Vec<CellId> = Vec::with_capacity(sub.length - 1);
    for _ in 1..sub.length {
        let Some(cell) = board.first_empty(CellKind::Free, None) else {
            return Err(PreconditionViolation {
                subproblem: sub,
                reason: "not enough empty free cells",
            });
        };
        single_step(board, sub, sub.source, cell, steps)?;
        parked.push(cell);
    }

    single_step(board, sub, sub.source, sub.destination, steps)?;

    while let Some(cell) = parked.pop() {
        single_step(board, sub, cell, sub.destination, steps)?;
    }
    Ok(())
}

fn single_step(
    board: &mut Board,
    sub: Subproblem,
    from: CellId,
    to: CellId,
    steps: &mut Vec<Step>,
) -> Result<(), PreconditionViolation> {
    let card = board.move_top(from, to).ok_or(PreconditionViolation {
        subproblem: sub,
        reason: "source ran out of cards",
    })?;
    log::trace!("step {} {} -> {}", card, from, to);
    steps.push(Step { from, to, card });
    Ok(())
}
