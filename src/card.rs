//! Card, Suit, Rank and Color types for a standard 52-card deck.
//!
//! - `Card` is a compact 1-byte representation (0..=51).
//! - `Suit` and `Rank` give human-readable structure on top of that.
//! - `Card::try_new` is the checked constructor for untyped input; it is
//!   the only place an `InvalidCard` can come from.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of suits in a standard deck.
pub const NUM_SUITS: u8 = 4;
/// Number of ranks in a standard deck.
pub const NUM_RANKS: u8 = 13;
/// Number of cards in a standard deck.
pub const CARDS_PER_DECK: u8 = NUM_SUITS * NUM_RANKS;

/// A playing card represented compactly as an index in 0..=51.
///
/// The mapping is:
/// ```text
/// index = suit as u8 * 13 + (rank number - 1)
/// ```
/// so the deck is laid out suit-major (Clubs, Diamonds, Hearts, Spades)
/// and rank-minor (Ace..King).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Card(u8);

/// The four suits, in deck order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[repr(u8)]
pub enum Suit {
    Clubs = 0,
    Diamonds = 1,
    Hearts = 2,
    Spades = 3,
}

/// The thirteen ranks. Ace is low.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[repr(u8)]
pub enum Rank {
    Ace = 1,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King, // 13
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Color {
    Red,
    Black,
}

/// Construction-time failure for out-of-domain card input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CardError {
    InvalidCard(String),
}

impl fmt::Display for CardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCard(s) => write!(f, "invalid card: {}", s),
        }
    }
}

impl std::error::Error for CardError {}

impl Card {
    /// Create a new card from a suit and rank.
    #[inline]
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Card(suit as u8 * NUM_RANKS + rank as u8 - 1)
    }

    /// Checked constructor from raw numbers: `rank` in 1..=13 (Ace=1),
    /// `suit` in 0..=3 following `Suit::ALL`.
    pub fn try_new(rank: u8, suit: u8) -> Result<Self, CardError> {
        let rank = Rank::try_from_number(rank)?;
        let suit = Suit::try_from_u8(suit)?;
        Ok(Card::new(suit, rank))
    }

    /// Create a card from a raw index in 0..=51.
    pub fn try_from_index(index: u8) -> Result<Self, CardError> {
        if index < CARDS_PER_DECK {
            Ok(Card(index))
        } else {
            Err(CardError::InvalidCard(format!(
                "card index {} out of range 0..=51",
                index
            )))
        }
    }

    /// Return the raw 0..=51 index of this card.
    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn suit(self) -> Suit {
        Suit::ALL[(self.0 / NUM_RANKS) as usize]
    }

    #[inline]
    pub fn rank(self) -> Rank {
        Rank::ALL[(self.0 % NUM_RANKS) as usize]
    }

    /// Rank number in 1..=13 (Ace=1, King=13).
    #[inline]
    pub fn rank_number(self) -> u8 {
        self.rank() as u8
    }

    #[inline]
    pub fn color(self) -> Color {
        self.suit().color()
    }

    /// Short string like "AH", "7C", "TD", "KS".
    pub fn short_str(self) -> String {
        format!("{}{}", self.rank().short_char(), self.suit().short_char())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_str())
    }
}

impl FromStr for Card {
    type Err = CardError;

    /// Parse the two-character form produced by `short_str`, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CardError::InvalidCard(format!("could not parse {:?}", s));
        let mut chars = s.trim().chars();
        let (Some(r), Some(su), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };
        let r = r.to_ascii_uppercase();
        let su = su.to_ascii_uppercase();
        let rank = Rank::ALL
            .iter()
            .copied()
            .find(|rank| rank.short_char() == r)
            .ok_or_else(invalid)?;
        let suit = Suit::ALL
            .iter()
            .copied()
            .find(|suit| suit.short_char() == su)
            .ok_or_else(invalid)?;
        Ok(Card::new(suit, rank))
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.short_str()
    }
}

impl TryFrom<String> for Card {
    type Error = CardError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Suit {
    /// All suits in deck order.
    pub const ALL: [Suit; NUM_SUITS as usize] =
        [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    /// Construct a suit from a small integer 0..=3.
    pub fn try_from_u8(v: u8) -> Result<Self, CardError> {
        Suit::ALL
            .get(v as usize)
            .copied()
            .ok_or_else(|| CardError::InvalidCard(format!("suit {} out of range 0..=3", v)))
    }

    #[inline]
    pub fn color(self) -> Color {
        match self {
            Suit::Hearts | Suit::Diamonds => Color::Red,
            Suit::Clubs | Suit::Spades => Color::Black,
        }
    }

    /// Single-character representation: 'C', 'D', 'H', or 'S'.
    #[inline]
    pub fn short_char(self) -> char {
        match self {
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
            Suit::Hearts => 'H',
            Suit::Spades => 'S',
        }
    }
}

impl Rank {
    /// All ranks in a fixed, reproducible order (Ace..King).
    pub const ALL: [Rank; NUM_RANKS as usize] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Construct a rank from its number 1..=13.
    pub fn try_from_number(v: u8) -> Result<Self, CardError> {
        match v {
            1..=13 => Ok(Rank::ALL[(v - 1) as usize]),
            _ => Err(CardError::InvalidCard(format!(
                "rank {} out of range 1..=13",
                v
            ))),
        }
    }

    /// Rank number in 1..=13 (Ace=1, King=13).
    #[inline]
    pub fn number(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn short_char(self) -> char {
        match self {
            Rank::Ace => 'A',
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
        }
    }
}

/// Generate a standard 52-card deck in a fixed order.
///
/// Suits follow `Suit::ALL` order, and ranks follow `Rank::ALL` order.
pub fn standard_deck() -> [Card; CARDS_PER_DECK as usize] {
    let mut cards = [Card(0); CARDS_PER_DECK as usize];
    for (i, card) in cards.iter_mut().enumerate() {
        *card = Card(i as u8);
    }
    cards
}
