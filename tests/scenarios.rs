use freecell::board::{Board, CellId, CellKind};
use freecell::card::Card;
use freecell::deal::DealSource;
use freecell::game::Game;
use freecell::moves::{
    apply_move, auto_home, has_home_move, is_legal_move, move_capacity, InvalidMove, MoveError,
    MoveRequest,
};
use freecell::rules::capacity;

fn cards(codes: &[&str]) -> Vec<Card> {
    codes.iter().map(|c| c.parse().unwrap()).collect()
}

fn board_with(cells: &[(CellId, &[&str])]) -> Board {
    let mut board = Board::new_empty();
    for (id, codes) in cells {
        for card in cards(codes) {
            board.cell_mut(*id).unwrap().push(card);
        }
    }
    board
}

/// Replay `steps` one by one, checking each is a legal single-card move.
fn replay_as_single_moves(mut board: Board, steps: &[freecell::supermove::Step]) -> Board {
    for step in steps {
        let req = MoveRequest::single(step.from, step.to);
        assert!(is_legal_move(&board, &req), "illegal step {}", step);
        apply_move(&mut board, &req).unwrap();
    }
    board
}

#[test]
fn five_card_run_to_empty_column_uses_free_cells_only() {
    let run = ["KS", "QH", "JC", "TD", "9S"];
    let t1 = CellId::tableau(0);
    let t2 = CellId::tableau(1);
    let mut board = board_with(&[(t1, &run[..])]);

    assert_eq!(capacity(4, 7), 640);
    // Seven empty columns, minus the destination itself.
    assert_eq!(move_capacity(&board, t2), capacity(4, 6));

    let req = MoveRequest::new(t1, t2, 5);
    assert!(is_legal_move(&board, &req));
    let outcome = apply_move(&mut board, &req).unwrap();

    assert_eq!(board.cell(t2).unwrap().cards(), &cards(&run)[..]);
    assert!(board.cell(t1).unwrap().is_empty());
    assert_eq!(board.count_empty(CellKind::Free), 4);
    assert_eq!(outcome.steps.len(), 9);
    assert!(outcome.steps.iter().all(|s| {
        [s.from, s.to]
            .iter()
            .all(|&id| id == t1 || id == t2 || id.kind == CellKind::Free)
    }));
}

#[test]
fn long_run_keeps_order_and_leaves_temporaries_empty() {
    let run = ["KS", "QH", "JC", "TD", "9S", "8H", "7C", "6D", "5S", "4H"];
    let src = CellId::tableau(0);
    let dst = CellId::tableau(1);
    let before = board_with(&[
        (src, &run[..]),
        (CellId::tableau(4), &["KC"]),
        (CellId::tableau(5), &["KD"]),
        (CellId::tableau(6), &["KH"]),
        (CellId::tableau(7), &["QC"]),
        (CellId::free(0), &["AC"]),
        (CellId::free(1), &["AS"]),
    ]);
    // Two empty free cells, two spare columns besides the destination.
    assert_eq!(move_capacity(&before, dst), 12);

    let mut board = before.clone();
    let outcome = apply_move(&mut board, &MoveRequest::new(src, dst, run.len())).unwrap();

    assert_eq!(board.cell(dst).unwrap().cards(), &cards(&run)[..]);
    for id in [src, CellId::tableau(2), CellId::tableau(3), CellId::free(2), CellId::free(3)] {
        assert!(board.cell(id).unwrap().is_empty(), "{} not empty", id);
    }
    assert_eq!(board.card_multiset(), before.card_multiset());
    assert_eq!(replay_as_single_moves(before, &outcome.steps), board);
}

#[test]
fn ace_of_hearts_goes_home() {
    let t3 = CellId::tableau(2);
    let h1 = CellId::home(0);
    let mut board = board_with(&[(t3, &["9C", "AH"])]);

    let outcome = apply_move(&mut board, &MoveRequest::single(t3, h1)).unwrap();
    assert_eq!(board.cell(h1).unwrap().cards(), &cards(&["AH"])[..]);
    assert_eq!(board.cell(t3).unwrap().cards(), &cards(&["9C"])[..]);
    assert!(!outcome.won);
}

#[test]
fn same_color_pair_is_refused_without_changes() {
    let src = CellId::tableau(0);
    let before = board_with(&[(src, &["8S", "7C"]), (CellId::tableau(1), &["9H"])]);
    let req = MoveRequest::new(src, CellId::tableau(1), 2);

    assert!(!is_legal_move(&before, &req));
    let mut board = before.clone();
    assert_eq!(
        apply_move(&mut board, &req),
        Err(MoveError::Invalid(InvalidMove::NotACascade))
    );
    assert_eq!(board, before);
}

#[test]
fn over_capacity_is_refused_without_changes() {
    let run = ["KS", "QH", "JC", "TD", "9S", "8H"];
    let src = CellId::tableau(0);
    let mut fill: Vec<(CellId, &[&str])> = vec![(src, &run[..])];
    let fillers: [&[&str]; 7] = [&["KC"], &["KD"], &["KH"], &["QC"], &["QD"], &["QS"], &["JD"]];
    for (i, f) in fillers.iter().enumerate() {
        fill.push((CellId::tableau(i as u8 + 1), *f));
    }
    let before = board_with(&fill);

    // No empty columns: capacity is f + 1 = 5.
    let mut board = before.clone();
    let req = MoveRequest::new(src, CellId::tableau(3), 6);
    assert_eq!(
        apply_move(&mut board, &req),
        Err(MoveError::Invalid(InvalidMove::OverCapacity {
            count: 6,
            capacity: 5
        }))
    );
    assert_eq!(board, before);
}

#[test]
fn same_seed_gives_same_deal() {
    for source in [
        DealSource::Classic(1),
        DealSource::Classic(999_999),
        DealSource::Microsoft(11982),
        DealSource::PySol("ms24".to_string()),
    ] {
        let a = Game::new(source.clone()).unwrap();
        let b = Game::new(source).unwrap();
        assert_eq!(a.initial_deck(), b.initial_deck());
        assert_eq!(a.snapshot(), b.snapshot());
    }
    let a = Game::new(DealSource::Classic(1)).unwrap();
    let b = Game::new(DealSource::Classic(2)).unwrap();
    assert_ne!(a.initial_deck(), b.initial_deck());
}

#[test]
fn auto_home_reaches_a_fixed_point() {
    let mut board = board_with(&[
        (CellId::tableau(0), &["3H", "2S", "AH"]),
        (CellId::tableau(1), &["5C", "2H", "AS"]),
        (CellId::tableau(2), &["KD", "3S"]),
        (CellId::free(0), &["AC"]),
        (CellId::free(1), &["4H"]),
    ]);
    let before = board.card_multiset();

    let steps = auto_home(&mut board);
    assert_eq!(steps.len(), 8);
    assert!(!has_home_move(&board));
    assert!(auto_home(&mut board).is_empty());
    assert_eq!(board.card_multiset(), before);
    assert_eq!(board.cards_outside_home(), 2);
}

#[test]
fn game_play_keeps_every_card() {
    let mut game = Game::new(DealSource::Microsoft(1)).unwrap();
    let before = game.board().card_multiset();

    // Try every single-card move from each column to each free cell and
    // back, plus auto-home, and check nothing is lost along the way.
    for col in 0..8u8 {
        let req = MoveRequest::single(CellId::tableau(col), CellId::free(col % 4));
        if game.is_legal_move(&req) {
            game.request_move(req).unwrap();
            game.auto_move_home();
        }
    }
    assert_eq!(game.board().card_multiset(), before);
    assert_eq!(game.replay_history().unwrap(), *game.board());
}
