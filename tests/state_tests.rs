//! Game state integration tests: win detection, owner read-back, hashing.

use gomoku_mcts::core::{has_five, has_five_naive, GameError, GameRng, Outcome, PlayerId, State};
use proptest::prelude::*;

/// Winner found by scanning every cell in every direction.
fn naive_winner<const N: usize>(state: &State<N>) -> Option<PlayerId> {
    const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];
    for y in 0..N {
        for x in 0..N {
            let Some(owner) = state.cell(x, y) else {
                continue;
            };
            for (dx, dy) in DIRECTIONS {
                let run = (1..5).all(|step| {
                    let cx = x as isize + dx * step;
                    let cy = y as isize + dy * step;
                    (0..N as isize).contains(&cx)
                        && (0..N as isize).contains(&cy)
                        && state.cell(cx as usize, cy as usize) == Some(owner)
                });
                if run {
                    return Some(owner);
                }
            }
        }
    }
    None
}

/// Play a random game, checking every position against a plain board.
fn check_random_game<const N: usize>(seed: u64) {
    let mut rng = GameRng::new(seed);
    let mut moves = State::<N>::new().possible_actions();
    rng.shuffle(&mut moves);

    let mut state = State::<N>::new();
    let mut board = vec![None; N * N];
    for (turn, &action) in moves.iter().enumerate() {
        let mover = state.to_move();
        assert_eq!(mover, PlayerId::new((turn % 2) as u8));
        let empty_before = state.empty_count();

        state.action(action);
        board[action as usize] = Some(mover);

        assert_eq!(state.empty_count(), empty_before - 1);
        for (index, &owner) in board.iter().enumerate() {
            let (x, y) = State::<N>::coords_of(index as u16);
            assert_eq!(state.cell(x, y), owner, "cell ({}, {}) after turn {}", x, y, turn);
        }

        let winner = naive_winner(&state);
        assert_eq!(state.winner(), winner);
        assert_eq!(state.terminal(), winner.is_some() || state.empty_count() == 0);
        if state.terminal() {
            if let Some(winner) = winner {
                assert_eq!(winner, mover);
            }
            return;
        }
    }
    panic!("game never ended");
}

proptest! {
    #[test]
    fn prop_bit_trick_matches_scan_8(word in 0u64..(1 << 8)) {
        prop_assert_eq!(has_five(word), has_five_naive(word));
    }

    #[test]
    fn prop_bit_trick_matches_scan_13(word in 0u64..(1 << 13)) {
        prop_assert_eq!(has_five(word), has_five_naive(word));
    }

    #[test]
    fn prop_bit_trick_matches_scan_15(word in 0u64..(1 << 15)) {
        prop_assert_eq!(has_five(word), has_five_naive(word));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_terminal_matches_scan_8(seed in any::<u64>()) {
        check_random_game::<8>(seed);
    }

    #[test]
    fn prop_terminal_matches_scan_13(seed in any::<u64>()) {
        check_random_game::<13>(seed);
    }

    #[test]
    fn prop_terminal_matches_scan_15(seed in any::<u64>()) {
        check_random_game::<15>(seed);
    }
}

proptest! {
    #[test]
    fn prop_hash_independent_of_move_order(seed in any::<u64>(), count in 1usize..20) {
        let mut rng = GameRng::new(seed);
        let mut moves = State::<15>::new().possible_actions();
        rng.shuffle(&mut moves);
        moves.truncate(count);

        let mut state = State::<15>::new();
        for &action in &moves {
            state.action(action);
            if state.terminal() {
                return Ok(());
            }
        }

        // Reorder within each player's own moves.
        let (mut first, mut second): (Vec<_>, Vec<_>) =
            moves.iter().enumerate().partition(|(i, _)| i % 2 == 0);
        first.reverse();
        second.reverse();
        let mut replay = State::<15>::new();
        for i in 0..moves.len() {
            let (_, &action) = if i % 2 == 0 { first[i / 2] } else { second[i / 2] };
            replay.action(action);
        }

        prop_assert_eq!(replay.hash(), state.hash());
        prop_assert!(replay.same_position(&state));
    }
}

#[test]
fn test_five_ends_the_game_four_does_not() {
    let mut state = State::<15>::new();
    let opponent = [(0, 14), (14, 14), (14, 0), (7, 0)];
    for (i, &(x, y)) in opponent.iter().enumerate() {
        state.play(3 + i, 7).unwrap();
        state.play(x, y).unwrap();
        assert!(!state.terminal());
    }
    assert_eq!(state.winner(), None);

    state.play(7, 7).unwrap();

    assert!(state.terminal());
    assert_eq!(state.winner(), Some(PlayerId::FIRST));
    assert_eq!(state.outcome(), Some(Outcome::Win(PlayerId::FIRST)));
}

#[test]
fn test_second_player_wins_on_diagonal() {
    let mut state = State::<15>::new();
    let first = [(0, 0), (0, 2), (0, 4), (0, 6), (0, 8)];
    for (i, &(x, y)) in first.iter().enumerate() {
        state.play(x, y).unwrap();
        state.play(5 + i, 9 - i).unwrap();
    }
    // (5,9) .. (9,5) is an anti-diagonal; player 0's column has gaps.
    assert_eq!(state.winner(), Some(PlayerId::SECOND));
}

#[test]
fn test_same_moves_same_hash() {
    let moves = [(7, 7), (7, 8), (8, 8), (6, 6)];
    let a = State::<15>::from_moves(&moves).unwrap();
    let b = State::<15>::from_moves(&moves).unwrap();
    assert_eq!(a.hash(), b.hash());
    assert_eq!(a, b);
}

#[test]
fn test_position_string_replay() {
    let state: State<15> = "7,7 7,8; 8,8".parse().unwrap();
    assert_eq!(state.moves_played(), 3);
    assert_eq!(state.cell(8, 8), Some(PlayerId::FIRST));
    assert_eq!(state.cell(7, 8), Some(PlayerId::SECOND));

    let bad = "7,7 seven".parse::<State<15>>();
    assert!(matches!(bad, Err(GameError::MalformedPosition(_))));
}

#[test]
fn test_rejected_moves_leave_state_untouched() {
    let mut state = State::<15>::from_moves(&[(7, 7)]).unwrap();
    let before = state.clone();

    assert_eq!(state.play(7, 7), Err(GameError::Occupied { x: 7, y: 7 }));
    assert!(matches!(state.play(15, 0), Err(GameError::OutOfBounds { .. })));
    assert!(matches!(state.try_action(225), Err(GameError::InvalidIndex { .. })));
    assert_eq!(state, before);
}

#[test]
fn test_full_board_draw() {
    // Column pairs alternate owners row by row: no five anywhere.
    const N: usize = 8;
    let mut first = Vec::new();
    let mut second = Vec::new();
    for y in 0..N {
        for x in 0..N {
            if (x / 2 + y) % 2 == 0 {
                first.push((x, y));
            } else {
                second.push((x, y));
            }
        }
    }
    assert_eq!(first.len(), second.len());

    let mut state = State::<N>::new();
    for (&a, &b) in first.iter().zip(&second) {
        state.play(a.0, a.1).unwrap();
        state.play(b.0, b.1).unwrap();
    }

    assert!(state.terminal());
    assert_eq!(state.winner(), None);
    assert_eq!(state.outcome(), Some(Outcome::Draw));
    assert!(state.possible_actions().is_empty());
    assert_eq!(state.play(0, 0), Err(GameError::GameOver));
}
