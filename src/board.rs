//! Board state: free cells, home cells and tableau columns.
//
//! The `Board` owns every `Cell`. Everything else (selections, supermove
//! subproblems, move requests) refers to a cell by its `CellId`, never by
//! holding on to the cell itself.

use core::fmt;

use serde::Serialize;

use crate::card::{Card, NUM_RANKS};

pub const FREE_CELLS: usize = 4;
pub const HOME_CELLS: usize = 4;
pub const TABLEAU_COLUMNS: usize = 8;

/// Which of the three groups of cells a `CellId` points into.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum CellKind {
    Free,
    Home,
    Tableau,
}

impl CellKind {
    pub const ALL: [CellKind; 3] = [CellKind::Free, CellKind::Home, CellKind::Tableau];

    /// Number of cells of this kind on the board.
    pub fn cell_count(self) -> usize {
        match self {
            CellKind::Free => FREE_CELLS,
            CellKind::Home => HOME_CELLS,
            CellKind::Tableau => TABLEAU_COLUMNS,
        }
    }

    fn short_char(self) -> char {
        match self {
            CellKind::Free => 'f',
            CellKind::Home => 'h',
            CellKind::Tableau => 't',
        }
    }
}

/// Stable identifier of one cell: kind plus 0-based index within that kind.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct CellId {
    pub kind: CellKind,
    pub index: u8,
}

impl CellId {
    pub const fn new(kind: CellKind, index: u8) -> Self {
        CellId { kind, index }
    }

    pub const fn free(index: u8) -> Self {
        CellId::new(CellKind::Free, index)
    }

    pub const fn home(index: u8) -> Self {
        CellId::new(CellKind::Home, index)
    }

    pub const fn tableau(index: u8) -> Self {
        CellId::new(CellKind::Tableau, index)
    }

    /// True if the index is within range for the kind.
    pub fn is_on_board(self) -> bool {
        (self.index as usize) < self.kind.cell_count()
    }

    /// Every cell of `kind`, in index order.
    pub fn all_of(kind: CellKind) -> impl Iterator<Item = CellId> {
        (0..kind.cell_count() as u8).map(move |i| CellId::new(kind, i))
    }
}

/// Cells are shown 1-based (`f1`, `h4`, `t8`), the same way they are typed
/// on the command line.
impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.short_char(), self.index as usize + 1)
    }
}

impl core::str::FromStr for CellId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let kind = match chars.next().map(|c| c.to_ascii_lowercase()) {
            Some('f') => CellKind::Free,
            Some('h') => CellKind::Home,
            Some('t') => CellKind::Tableau,
            _ => return Err(format!("unknown cell {:?}; expected f1..f4, h1..h4 or t1..t8", s)),
        };
        let n: usize = chars
            .as_str()
            .parse()
            .map_err(|_| format!("could not parse cell number in {:?}", s))?;
        if n == 0 || n > kind.cell_count() {
            return Err(format!("cell {:?} is not on the board", s));
        }
        Ok(CellId::new(kind, (n - 1) as u8))
    }
}

/// An ordered pile of cards with stack discipline.
///
/// Cards are stored bottom-to-top: `cards()[0]` is the card dealt first,
/// `top()` is the last element and the only one moves touch.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct Cell {
    cards: Vec<Card>,
}

impl Cell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: &[Card]) -> Self {
        Cell {
            cards: cards.to_vec(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[inline]
    pub fn top(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn pop(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// All cards, bottom first.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// The top `count` cards, bottom of the run first, or `None` if the cell
    /// holds fewer than `count` cards.
    pub fn run(&self, count: usize) -> Option<&[Card]> {
        let len = self.cards.len();
        if count > len {
            return None;
        }
        Some(&self.cards[len - count..])
    }
}

/// Complete game state: 4 free cells, 4 home cells, 8 tableau columns.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct Board {
    free: [Cell; FREE_CELLS],
    home: [Cell; HOME_CELLS],
    tableau: [Cell; TABLEAU_COLUMNS],
}

impl Board {
    /// A board with every cell empty.
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Deal `deck` round-robin into the tableau: `deck[i]` goes on column
    /// `i % 8`, so the first eight cards form the bottom row.
    pub fn deal(deck: &[Card]) -> Self {
        let mut board = Board::new_empty();
        for (i, &card) in deck.iter().enumerate() {
            board.tableau[i % TABLEAU_COLUMNS].push(card);
        }
        board
    }

    fn group(&self, kind: CellKind) -> &[Cell] {
        match kind {
            CellKind::Free => &self.free,
            CellKind::Home => &self.home,
            CellKind::Tableau => &self.tableau,
        }
    }

    fn group_mut(&mut self, kind: CellKind) -> &mut [Cell] {
        match kind {
            CellKind::Free => &mut self.free,
            CellKind::Home => &mut self.home,
            CellKind::Tableau => &mut self.tableau,
        }
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.group(id.kind).get(id.index as usize)
    }

    pub fn cell_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.group_mut(id.kind).get_mut(id.index as usize)
    }

    pub fn free_cells(&self) -> &[Cell; FREE_CELLS] {
        &self.free
    }

    pub fn home_cells(&self) -> &[Cell; HOME_CELLS] {
        &self.home
    }

    pub fn tableau(&self) -> &[Cell; TABLEAU_COLUMNS] {
        &self.tableau
    }

    /// Number of empty cells of the given kind.
    pub fn count_empty(&self, kind: CellKind) -> usize {
        self.group(kind).iter().filter(|c| c.is_empty()).count()
    }

    /// The lowest-indexed empty cell of `kind` other than `exclude`.
    pub fn first_empty(&self, kind: CellKind, exclude: Option<CellId>) -> Option<CellId> {
        CellId::all_of(kind)
            .filter(|&id| Some(id) != exclude)
            .find(|&id| self.cell(id).is_some_and(Cell::is_empty))
    }

    /// Move the top card of `from` onto `to` without any legality check.
    ///
    /// Returns the card moved, or `None` (and leaves the board untouched)
    /// if either id is off the board or `from` is empty.
    pub fn move_top(&mut self, from: CellId, to: CellId) -> Option<Card> {
        if from == to || !to.is_on_board() {
            return None;
        }
        let card = self.cell_mut(from)?.pop()?;
        self.cell_mut(to)?.push(card);
        Some(card)
    }

    /// Total number of cards on the board.
    pub fn card_count(&self) -> usize {
        CellKind::ALL
            .iter()
            .map(|&k| self.group(k).iter().map(Cell::len).sum::<usize>())
            .sum()
    }

    /// Number of cards not yet in a home cell.
    pub fn cards_outside_home(&self) -> usize {
        self.card_count() - self.group(CellKind::Home).iter().map(Cell::len).sum::<usize>()
    }

    /// All cards on the board, sorted by index. Useful for checking that a
    /// move neither created nor destroyed a card.
    pub fn card_multiset(&self) -> Vec<Card> {
        let mut all: Vec<Card> = CellKind::ALL
            .iter()
            .flat_map(|&k| self.group(k).iter())
            .flat_map(|c| c.cards().iter().copied())
            .collect();
        all.sort();
        all
    }

    /// Every home cell holds a full suit.
    pub fn is_won(&self) -> bool {
        self.home.iter().all(|c| c.len() == NUM_RANKS as usize)
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let copy = |cells: &[Cell]| cells.iter().map(|c| c.cards().to_vec()).collect();
        BoardSnapshot {
            free: copy(&self.free),
            home: copy(&self.home),
            tableau: copy(&self.tableau),
        }
    }
}

/// Read-only copy of the board contents for renderers.
///
/// Each inner vector is one cell, bottom card first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub free: Vec<Vec<Card>>,
    pub home: Vec<Vec<Card>>,
    pub tableau: Vec<Vec<Card>>,
}
