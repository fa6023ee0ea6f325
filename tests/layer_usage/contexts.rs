//! Context-specific layer state through the current context

use super::*;
use std::collections::HashMap;
use std::thread;
use strata_layers::{current_context, enter_context};

fn lines_in(states: &StateRegistry, context: &str) -> Vec<String> {
    states.for_context::<LogState>(context).read().lines
}

#[test]
fn test_logging_follows_current_context() {
    let states = setup();

    {
        let _scope = enter_context("ContextA");
        exec_add(&states, 1, 2).unwrap();
    }
    {
        let _scope = enter_context("ContextB");
        exec_add(&states, 3, 4).unwrap();
        exec_add(&states, 5, 6).unwrap();
    }

    assert_eq!(lines_in(&states, "ContextA"), vec!["1 + 2 = 3"]);
    assert_eq!(lines_in(&states, "ContextB"), vec!["3 + 4 = 7", "5 + 6 = 11"]);
    // Metrics is global regardless of context
    assert_eq!(states.global::<MetricsState>().read().calls, 3);
    assert_eq!(current_context(), "");
}

#[test]
fn test_nested_contexts_restore() {
    let states = setup();

    let outer = enter_context("outer");
    exec_add(&states, 1, 1).unwrap();
    {
        let inner = enter_context("inner");
        assert_eq!(inner.previous(), "outer");
        exec_add(&states, 2, 2).unwrap();
    }
    exec_add(&states, 3, 3).unwrap();
    drop(outer);

    assert_eq!(lines_in(&states, "outer"), vec!["1 + 1 = 2", "3 + 3 = 6"]);
    assert_eq!(lines_in(&states, "inner"), vec!["2 + 2 = 4"]);
}

#[test]
fn test_iterate_over_contexts() {
    let states = setup();
    for (context, n) in [("alpha", 1), ("beta", 2), ("gamma", 3)] {
        let _scope = enter_context(context);
        for i in 0..n {
            exec_add(&states, i, 0).unwrap();
        }
    }

    let mut seen = HashMap::new();
    states.iterate::<LogState>(|context, store| {
        seen.insert(context.to_string(), store.read().lines.len());
    });

    assert_eq!(seen.len(), 3);
    assert_eq!(seen["alpha"], 1);
    assert_eq!(seen["beta"], 2);
    assert_eq!(seen["gamma"], 3);
}

#[test]
fn test_remove_context_drops_only_that_context() {
    let states = setup();
    for context in ["keep", "drop"] {
        let _scope = enter_context(context);
        exec_add(&states, 1, 1).unwrap();
    }

    assert_eq!(states.remove_context("drop"), 1);
    assert!(!states.contains::<LogState>("drop"));
    assert_eq!(lines_in(&states, "keep"), vec!["1 + 1 = 2"]);
    assert!(lines_in(&states, "drop").is_empty());
}

#[test]
fn test_threads_log_into_their_own_context() {
    let states = setup();

    thread::scope(|s| {
        for worker in 0..4 {
            let states = &states;
            s.spawn(move || {
                StateRegistry::set_current_context(format!("worker-{worker}"));
                for i in 0..25 {
                    exec_add(states, worker, i).unwrap();
                }
            });
        }
    });

    for worker in 0..4 {
        let lines = lines_in(&states, &format!("worker-{worker}"));
        assert_eq!(lines.len(), 25);
        assert!(lines.iter().all(|l| l.starts_with(&format!("{worker} + "))));
    }
    assert_eq!(states.global::<MetricsState>().read().calls, 100);
}
