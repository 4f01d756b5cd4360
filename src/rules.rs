//! Move legality rules and the supermove capacity formula.
//
//! Everything here is a pure function of card values and cell contents; the
//! board is never mutated. `moves` combines these checks into a dispatch,
//! and they are public so a front end can use them for highlighting.

use crate::board::Cell;
use crate::card::{Card, Rank};

/// True if `upper` may sit directly on `lower` in a tableau column:
/// opposite colors and `upper` exactly one rank below `lower`.
#[inline]
pub fn can_stack_on(upper: Card, lower: Card) -> bool {
    upper.color() != lower.color() && upper.rank_number() + 1 == lower.rank_number()
}

/// True if the slice (bottom of the run first) is a cascade: every card
/// stacks legally on the one below it. An empty slice is not a run.
pub fn is_cascade(run: &[Card]) -> bool {
    !run.is_empty() && run.windows(2).all(|pair| can_stack_on(pair[1], pair[0]))
}

/// A free cell takes exactly one card, and only when it is empty.
#[inline]
pub fn can_place_on_free(dest: &Cell, count: usize) -> bool {
    count == 1 && dest.is_empty()
}

/// A home cell takes one card at a time: an Ace when empty, otherwise the
/// next rank of the suit already there.
pub fn can_place_on_home(card: Card, dest: &Cell, count: usize) -> bool {
    if count != 1 {
        return false;
    }
    match dest.top() {
        None => card.rank() == Rank::Ace,
        Some(top) => top.suit() == card.suit() && card.rank_number() == top.rank_number() + 1,
    }
}

/// True if the top `count` cards of `source` can move as a unit onto the
/// tableau column `dest`: the run must itself be a cascade, and its bottom
/// card must stack on `dest`'s top card unless `dest` is empty.
///
/// Capacity is checked separately by `capacity`.
pub fn can_add_to_tableau(source: &Cell, dest: &Cell, count: usize) -> bool {
    let Some(run) = source.run(count) else {
        return false;
    };
    if !is_cascade(run) {
        return false;
    }
    match dest.top() {
        None => true,
        Some(top) => can_stack_on(run[0], top),
    }
}

/// Largest run that can be relocated in one logical move with `free_cells`
/// empty free cells and `tableau_columns` empty columns usable as
/// temporary storage: `2^t * (f + 1)`.
///
/// An empty destination column must not be counted in `tableau_columns`.
pub fn capacity(free_cells: usize, tableau_columns: usize) -> usize {
    u32::try_from(tableau_columns)
        .ok()
        .and_then(|t| 1usize.checked_shl(t))
        .map_or(usize::MAX, |doubling| doubling.saturating_mul(free_cells + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;

    fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    #[test]
    fn capacity_matches_formula() {
        for f in 0..=4usize {
            for t in 0..=8usize {
                assert_eq!(capacity(f, t), (1 << t) * (f + 1), "f={f} t={t}");
            }
        }
        assert_eq!(capacity(3, 2), 16);
        assert_eq!(capacity(0, 0), 1);
        assert_eq!(capacity(4, 7), 640);
    }

    #[test]
    fn capacity_saturates_instead_of_overflowing() {
        assert_eq!(capacity(4, 200), usize::MAX);
    }

    #[test]
    fn stacking_requires_opposite_color_and_rank_one_lower() {
        for r in 2..=13u8 {
            for &lower_suit in Suit::ALL.iter() {
                for &upper_suit in Suit::ALL.iter() {
                    let lower = Card::try_new(r, lower_suit as u8).unwrap();
                    let upper = Card::try_new(r - 1, upper_suit as u8).unwrap();
                    let opposite = lower.color() != upper.color();
                    assert_eq!(can_stack_on(upper, lower), opposite, "{upper} on {lower}");

                    // Wrong rank difference is always rejected.
                    let same_rank = Card::try_new(r, upper_suit as u8).unwrap();
                    assert!(!can_stack_on(same_rank, lower));
                    if r >= 3 {
                        let two_lower = Card::try_new(r - 2, upper_suit as u8).unwrap();
                        assert!(!can_stack_on(two_lower, lower));
                    }
                }
            }
        }
    }

    #[test]
    fn cascades() {
        assert!(is_cascade(&[card("8S"), card("7H"), card("6C")]));
        assert!(!is_cascade(&[card("8S"), card("7H"), card("6C"), card("5C")]));
        assert!(is_cascade(&[card("QD")]));
        assert!(!is_cascade(&[]));
    }

    #[test]
    fn free_cell_rule() {
        let empty = Cell::new();
        let occupied = Cell::from_cards(&[card("3D")]);
        assert!(can_place_on_free(&empty, 1));
        assert!(!can_place_on_free(&empty, 2));
        assert!(!can_place_on_free(&occupied, 1));
    }

    #[test]
    fn home_cell_rule() {
        let empty = Cell::new();
        assert!(can_place_on_home(card("AH"), &empty, 1));
        assert!(!can_place_on_home(card("2H"), &empty, 1));
        assert!(!can_place_on_home(card("AH"), &empty, 2));

        let hearts = Cell::from_cards(&[card("AH"), card("2H")]);
        assert!(can_place_on_home(card("3H"), &hearts, 1));
        assert!(!can_place_on_home(card("3D"), &hearts, 1));
        assert!(!can_place_on_home(card("4H"), &hearts, 1));
    }

    #[test]
    fn tableau_run_validity() {
        let source = Cell::from_cards(&[card("2C"), card("9S"), card("8H"), card("7C")]);
        let on_red_ten = Cell::from_cards(&[card("TD")]);
        let on_black_ten = Cell::from_cards(&[card("TC")]);
        let empty = Cell::new();

        assert!(can_add_to_tableau(&source, &on_red_ten, 3));
        assert!(!can_add_to_tableau(&source, &on_black_ten, 3));
        assert!(can_add_to_tableau(&source, &empty, 3));
        // 2C does not continue the cascade.
        assert!(!can_add_to_tableau(&source, &empty, 4));
        // More cards than the column holds.
        assert!(!can_add_to_tableau(&source, &empty, 5));
        assert!(!can_add_to_tableau(&source, &empty, 0));
        // A single 7C can go on a red eight only.
        assert!(can_add_to_tableau(&source, &Cell::from_cards(&[card("8D")]), 1));
        assert!(!can_add_to_tableau(&source, &on_red_ten, 1));
    }
}
