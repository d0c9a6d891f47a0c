//! # Property-Based Tests
//!
//! Stepper invariants over arbitrary sequence lengths and positions.

use metaval_core::{
    CompletionPolicy, MetavalError, StageIndicator, StageKey, StageSequence, Transition,
    WorkflowController, WorkflowPhase,
};
use proptest::prelude::*;

fn sequence_of(len: usize) -> StageSequence {
    let stages = (1..=len).map(|i| {
        let key = StageKey::ALL[(i - 1) % StageKey::ALL.len()];
        (format!("Stage {i}"), key)
    });
    StageSequence::new(stages).expect("non-empty sequence")
}

fn controller_at(len: usize, index: usize, policy: CompletionPolicy) -> WorkflowController {
    let mut controller = WorkflowController::with_policy(sequence_of(len), policy);
    controller.jump_to(index).expect("index in range");
    controller
}

/// (N, i) with 1 <= i <= N.
fn length_and_index() -> impl Strategy<Value = (usize, usize)> {
    (1usize..40).prop_flat_map(|n| (Just(n), 1..=n))
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Advancing moves forward by one, or completes once and resets from the
    /// final stage.
    #[test]
    fn advance_moves_forward_or_completes((n, i) in length_and_index()) {
        let mut controller = controller_at(n, i, CompletionPolicy::AutoReset);
        let transition = controller.advance();

        if i < n {
            prop_assert_eq!(transition, Transition::Moved { from: i, to: i + 1 });
            prop_assert_eq!(controller.completions(), 0);
        } else {
            prop_assert_eq!(transition, Transition::Completed { total: n });
            prop_assert_eq!(controller.completions(), 1);
        }
        let expected = if i < n { i + 1 } else { 1 };
        prop_assert_eq!(controller.current_index(), Some(expected));
    }

    /// Retreating moves back by one and is a no-op on stage 1.
    #[test]
    fn retreat_moves_back_or_stays((n, i) in length_and_index()) {
        let mut controller = controller_at(n, i, CompletionPolicy::AutoReset);
        let transition = controller.retreat();

        if i > 1 {
            prop_assert_eq!(transition, Transition::Moved { from: i, to: i - 1 });
            prop_assert_eq!(controller.current_index(), Some(i - 1));
        } else {
            prop_assert_eq!(transition, Transition::Unchanged);
            prop_assert_eq!(controller.current_index(), Some(1));
        }
        prop_assert_eq!(controller.completions(), 0);
    }

    /// Out-of-range jumps are rejected without mutation.
    #[test]
    fn jump_out_of_range_leaves_state((n, i) in length_and_index(), extra in 1usize..100) {
        let mut controller = controller_at(n, i, CompletionPolicy::AutoReset);
        let before = controller.clone();

        let too_far = n + extra;
        prop_assert!(
            matches!(
                controller.jump_to(too_far),
                Err(MetavalError::OutOfRange { index, total }) if index == too_far && total == n
            ),
            "jump beyond the last stage must be rejected"
        );
        prop_assert!(controller.jump_to(0).is_err());
        prop_assert_eq!(controller, before);
    }

    /// Any action sequence keeps the index within 1..=N.
    #[test]
    fn index_stays_in_bounds(
        n in 1usize..20,
        actions in proptest::collection::vec(0u8..4, 0..200),
    ) {
        let mut controller = WorkflowController::new(sequence_of(n));
        let mut completions = 0u64;

        for action in actions {
            match action {
                0 | 1 => {
                    if controller.advance().is_completion() {
                        completions += 1;
                    }
                }
                2 => {
                    controller.retreat();
                }
                _ => {
                    controller.restart();
                }
            }
            let index = controller.current_index().expect("auto-reset never rests in Completed");
            prop_assert!((1..=n).contains(&index));
        }
        prop_assert_eq!(controller.completions(), completions);
    }

    /// Durable completion holds until restart.
    #[test]
    fn durable_completion_is_sticky(n in 1usize..20, pokes in 0usize..10) {
        let mut controller = controller_at(n, n, CompletionPolicy::Durable);
        prop_assert!(controller.advance().is_completion());

        for _ in 0..pokes {
            prop_assert_eq!(controller.advance(), Transition::Unchanged);
            prop_assert_eq!(controller.retreat(), Transition::Unchanged);
        }
        prop_assert_eq!(controller.phase(), WorkflowPhase::Completed);
        prop_assert_eq!(controller.completions(), 1);

        controller.restart();
        prop_assert_eq!(controller.current_index(), Some(1));
    }

    /// Exactly one marker is current and the rest split around it.
    #[test]
    fn indicator_partitions_markers((n, i) in length_and_index()) {
        let markers = StageIndicator::markers(i, n, &[]);
        prop_assert_eq!(markers.len(), n);

        for marker in &markers {
            let expected = match marker.index.cmp(&i) {
                std::cmp::Ordering::Less => metaval_core::MarkerState::Completed,
                std::cmp::Ordering::Equal => metaval_core::MarkerState::Current,
                std::cmp::Ordering::Greater => metaval_core::MarkerState::Upcoming,
            };
            prop_assert_eq!(marker.state, expected);
            prop_assert_eq!(marker.connector_filled, marker.index < i && marker.index < n);
        }
    }
}
