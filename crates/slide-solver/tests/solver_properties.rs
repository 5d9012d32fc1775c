use std::collections::{HashMap, HashSet, VecDeque};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use slide_solver::{
    is_reachable, replay, solve, Board, HeuristicKind, InvalidStateError, Move, SolveError,
    Solver, SolverConfig, StateKey,
};

/// Shortest distance from `goal` to every reachable board.
fn bfs_distances(goal: &Board) -> HashMap<StateKey, usize> {
    let mut distances = HashMap::new();
    let mut queue = VecDeque::new();
    distances.insert(goal.key().clone(), 0);
    queue.push_back(goal.clone());

    while let Some(board) = queue.pop_front() {
        let d = distances[board.key()];
        for mv in Move::ALL {
            if let Some(next) = board.neighbor(mv) {
                if !distances.contains_key(next.key()) {
                    distances.insert(next.key().clone(), d + 1);
                    queue.push_back(next);
                }
            }
        }
    }
    distances
}

/// Board reached from `start` by a seeded random walk of the blank.
fn scramble(start: &Board, steps: usize, rng: &mut StdRng) -> Board {
    let mut board = start.clone();
    for _ in 0..steps {
        let options: Vec<Board> = Move::ALL
            .iter()
            .filter_map(|&mv| board.neighbor(mv))
            .collect();
        board = options
            .choose(rng)
            .cloned()
            .expect("every board of size >= 2 has a neighbor");
    }
    board
}

#[test]
fn test_paths_are_optimal_and_replay_to_goal() {
    let goal = Board::solved(3).unwrap();
    let distances = bfs_distances(&goal);
    assert_eq!(distances.len(), 181_440);

    let mut rng = StdRng::seed_from_u64(7);
    for steps in [0, 1, 2, 5, 10, 20, 40, 60] {
        for _ in 0..3 {
            let initial = scramble(&goal, steps, &mut rng);
            let solution = Solver::new(initial.clone(), goal.clone())
                .unwrap()
                .run()
                .unwrap();

            assert_eq!(solution.path.len(), distances[initial.key()]);
            assert_eq!(replay(&initial, &solution.path).unwrap(), goal);
        }
    }
}

#[test]
fn test_admissible_heuristics_agree_on_length() {
    let goal = Board::solved(3).unwrap();
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..5 {
        let initial = scramble(&goal, 30, &mut rng);
        let lengths: Vec<usize> = [
            HeuristicKind::Manhattan,
            HeuristicKind::LinearConflict,
            HeuristicKind::MisplacedTiles,
        ]
        .into_iter()
        .map(|heuristic| {
            let config = SolverConfig {
                heuristic,
                ..Default::default()
            };
            Solver::with_config(initial.clone(), goal.clone(), config)
                .unwrap()
                .run()
                .unwrap()
                .path
                .len()
        })
        .collect();
        assert!(lengths.windows(2).all(|w| w[0] == w[1]), "{lengths:?}");
    }
}

#[test]
fn test_doubled_heuristic_path_is_valid_but_maybe_longer() {
    let goal = Board::solved(3).unwrap();
    let distances = bfs_distances(&goal);
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..5 {
        let initial = scramble(&goal, 40, &mut rng);
        let config = SolverConfig {
            heuristic: HeuristicKind::DoubledManhattan,
            ..Default::default()
        };
        let solution = Solver::with_config(initial.clone(), goal.clone(), config)
            .unwrap()
            .run()
            .unwrap();
        assert!(solution.path.len() >= distances[initial.key()]);
        assert_eq!(replay(&initial, &solution.path).unwrap(), goal);
    }
}

#[test]
fn test_no_board_is_popped_twice() {
    let goal = Board::solved(3).unwrap();
    let mut rng = StdRng::seed_from_u64(11);
    let initial = scramble(&goal, 50, &mut rng);

    let mut popped = HashSet::new();
    let mut repeats = 0;
    Solver::new(initial, goal)
        .unwrap()
        .run_with(|node| {
            if !popped.insert(node.state.key().clone()) {
                repeats += 1;
            }
        })
        .unwrap();
    assert_eq!(repeats, 0);
}

#[test]
fn test_2x2_distances_match_bfs() {
    let goal = Board::solved(2).unwrap();
    let distances = bfs_distances(&goal);
    assert_eq!(distances.len(), 12);

    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..12 {
        let initial = scramble(&goal, 7, &mut rng);
        let path = solve(initial.to_rows(), goal.to_rows()).unwrap();
        assert_eq!(path.len(), distances[initial.key()]);
    }

    let one = Board::from_rows(vec![vec![1, 2], vec![0, 3]]).unwrap();
    assert_eq!(solve(one.to_rows(), goal.to_rows()).unwrap().to_string(), "R");

    // the 2x2 state graph is a single 12-cycle, so this path is unique
    let three = Board::from_rows(vec![vec![3, 1], vec![0, 2]]).unwrap();
    assert_eq!(distances[three.key()], 3);
    assert_eq!(solve(three.to_rows(), goal.to_rows()).unwrap().to_string(), "URD");
}

#[test]
fn test_larger_board_with_custom_goal() {
    let goal = Board::from_rows(vec![
        vec![0, 1, 2, 3],
        vec![4, 5, 6, 7],
        vec![8, 9, 10, 11],
        vec![12, 13, 14, 15],
    ])
    .unwrap();
    let mut rng = StdRng::seed_from_u64(99);
    let initial = scramble(&goal, 24, &mut rng);

    let solution = Solver::new(initial.clone(), goal.clone())
        .unwrap()
        .run()
        .unwrap();
    assert!(solution.path.len() <= 24);
    assert_eq!(replay(&initial, &solution.path).unwrap(), goal);
}

#[test]
fn test_unreachable_matches_parity() {
    let goal = Board::solved(3).unwrap();
    let swapped = Board::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6], vec![8, 7, 0]]).unwrap();
    assert!(!is_reachable(&swapped, &goal));
    let err = solve(swapped.to_rows(), goal.to_rows()).unwrap_err();
    assert!(matches!(err, SolveError::Exhausted { .. }));
}

#[test]
fn test_invalid_input_rejected_before_search() {
    let err = solve(
        vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]],
        Board::solved(3).unwrap().to_rows(),
    )
    .unwrap_err();
    assert_eq!(err, SolveError::InvalidState(InvalidStateError::MissingBlank));

    let err = solve(
        vec![vec![1, 2, 3], vec![4, 5, 0]],
        Board::solved(3).unwrap().to_rows(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        SolveError::InvalidState(InvalidStateError::NotSquare { .. })
    ));

    let err = solve(
        Board::solved(2).unwrap().to_rows(),
        Board::solved(3).unwrap().to_rows(),
    )
    .unwrap_err();
    assert_eq!(err, SolveError::SizeMismatch { initial: 2, goal: 3 });
}

#[test]
fn test_concurrent_solvers_are_independent() {
    let goal = Board::solved(3).unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    let boards: Vec<Board> = (0..4).map(|_| scramble(&goal, 30, &mut rng)).collect();

    let handles: Vec<_> = boards
        .iter()
        .cloned()
        .map(|initial| {
            let goal = goal.clone();
            std::thread::spawn(move || Solver::new(initial, goal).unwrap().run().unwrap().path)
        })
        .collect();

    for (initial, handle) in boards.iter().zip(handles) {
        let path = handle.join().unwrap();
        let expected = Solver::new(initial.clone(), goal.clone())
            .unwrap()
            .run()
            .unwrap()
            .path;
        assert_eq!(path, expected);
    }
}
