//! Human-readable rendering of FreeCell boards.
//!
//! Renders a `Board` as multi-line text using the compact `Card`
//! representation ("AH", "TD", ...). The layout mirrors the physical game:
//! free cells and home cells across the top, tableau columns underneath,
//! each column drawn from its bottom card (first dealt) downwards so the
//! last line of a column is the card that can be picked up.

use crate::board::{Board, Cell, TABLEAU_COLUMNS};
use crate::card::Card;

const EMPTY_SLOT: &str = "[  ]";

fn slot(cell: &Cell) -> String {
    match cell.top() {
        Some(card) => format!("[{}]", card.short_str()),
        None => EMPTY_SLOT.to_string(),
    }
}

/// Render the free cells and the home cells on one line.
///
/// Home cells only show their top card.
///   `Free: [TS] [  ] [  ] [  ]    Home: [2H] [AS] [  ] [  ]`
pub fn render_cells(board: &Board) -> String {
    let free: Vec<String> = board.free_cells().iter().map(slot).collect();
    let home: Vec<String> = board.home_cells().iter().map(slot).collect();
    format!("Free: {}    Home: {}", free.join(" "), home.join(" "))
}

/// Render all tableau columns as a multi-line string.
///
/// Each column is four characters wide. Row 0 holds the bottom card of
/// every column; shorter columns simply stop earlier.
pub fn render_columns(board: &Board) -> String {
    let mut s = String::new();

    s.push_str("Columns:\n");
    s.push_str("      ");
    for col_idx in 0..TABLEAU_COLUMNS {
        s.push_str(&format!(" T{} ", col_idx + 1));
    }
    s.push('\n');

    let max_height = board.tableau().iter().map(Cell::len).max().unwrap_or(0);

    for row in 0..max_height {
        s.push_str("      ");
        for col in board.tableau() {
            match col.cards().get(row) {
                Some(card) => s.push_str(&format!("{:>3} ", card.short_str())),
                None => s.push_str("    "),
            }
        }
        s.push('\n');
    }

    s
}

/// Render the whole board: cells line, blank line, columns.
pub fn render_board(board: &Board) -> String {
    let mut s = String::new();
    s.push_str(&render_cells(board));
    s.push('\n');
    s.push('\n');
    s.push_str(&render_columns(board));
    s
}

pub fn print_board(board: &Board) {
    println!("{}", render_board(board));
}

/// Space-separated card codes, e.g. for logging a deck.
pub fn format_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|c| c.short_str())
        .collect::<Vec<_>>()
        .join(" ")
}
