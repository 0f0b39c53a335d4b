mod common;

use waypoint_lib::{optimize_tour, Error, SearchBudget, TourStrategy};

use common::fixture_map;

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn exact_strategies_agree_on_the_optimum() {
    let stops = ids(&["1", "6", "3", "9", "5"]);
    let brute = optimize_tour(
        fixture_map(),
        &stops,
        TourStrategy::BruteForce,
        &SearchBudget::unlimited(),
    )
    .unwrap();
    let pruned = optimize_tour(
        fixture_map(),
        &stops,
        TourStrategy::Backtracking,
        &SearchBudget::unlimited(),
    )
    .unwrap();
    assert!((brute.length - pruned.length).abs() < 1e-9);
    assert_eq!(brute.best().unwrap().stops, pruned.best().unwrap().stops);
}

#[test]
fn tours_start_and_end_at_the_first_stop() {
    let stops = ids(&["4", "1", "6", "9"]);
    let search = optimize_tour(
        fixture_map(),
        &stops,
        TourStrategy::Backtracking,
        &SearchBudget::unlimited(),
    )
    .unwrap();
    let best = search.best().unwrap();
    assert_eq!(best.stops.first().map(String::as_str), Some("4"));
    assert_eq!(best.stops.last().map(String::as_str), Some("4"));
    assert_eq!(best.stops.len(), stops.len() + 1);
}

#[test]
fn trace_improves_strictly_and_ends_at_the_result() {
    let stops = ids(&["1", "6", "3", "9", "5", "2"]);
    let search = optimize_tour(
        fixture_map(),
        &stops,
        TourStrategy::BruteForce,
        &SearchBudget::unlimited(),
    )
    .unwrap();
    assert!(!search.trace.is_empty());
    for pair in search.trace.windows(2) {
        assert!(pair[1].length < pair[0].length);
    }
    assert!((search.best().unwrap().length - search.length).abs() < f64::EPSILON);
}

#[test]
fn two_opt_stays_at_or_above_the_exact_optimum() {
    let stops = ids(&["1", "9", "6", "11", "3"]);
    let exact = optimize_tour(
        fixture_map(),
        &stops,
        TourStrategy::BruteForce,
        &SearchBudget::unlimited(),
    )
    .unwrap();
    let local = optimize_tour(
        fixture_map(),
        &stops,
        TourStrategy::TwoOpt,
        &SearchBudget::unlimited(),
    )
    .unwrap();
    assert!(local.length >= exact.length - 1e-9);
    // The trace always terminates at the reported tour, even without
    // improvements.
    assert!((local.best().unwrap().length - local.length).abs() < f64::EPSILON);
}

#[test]
fn tiny_step_budget_aborts_a_large_search() {
    let stops = ids(&["1", "2", "3", "4", "5", "6", "7", "8"]);
    let budget = SearchBudget::unlimited().max_steps(5);
    for strategy in [
        TourStrategy::BruteForce,
        TourStrategy::Backtracking,
        TourStrategy::TwoOpt,
    ] {
        assert!(matches!(
            optimize_tour(fixture_map(), &stops, strategy, &budget),
            Err(Error::SearchAborted)
        ));
    }
}

#[test]
fn degenerate_inputs_skip_the_search() {
    let empty = optimize_tour(
        fixture_map(),
        &[],
        TourStrategy::TwoOpt,
        &SearchBudget::unlimited(),
    )
    .unwrap();
    assert_eq!(empty.length, 0.0);
    assert!(empty.trace.is_empty());

    let single = optimize_tour(
        fixture_map(),
        &ids(&["6"]),
        TourStrategy::BruteForce,
        &SearchBudget::unlimited(),
    )
    .unwrap();
    assert_eq!(single.best().unwrap().stops, ids(&["6", "6"]));
}

#[test]
fn unknown_stop_is_rejected_before_searching() {
    assert!(matches!(
        optimize_tour(
            fixture_map(),
            &ids(&["1", "404"]),
            TourStrategy::Backtracking,
            &SearchBudget::unlimited(),
        ),
        Err(Error::UnknownId { id }) if id == "404"
    ));
}
