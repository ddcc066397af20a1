//! Property-based tests for queue ordering, gesture exclusivity and pooling.
//!
//! Tests validate:
//! 1. A drain runs commands in the order they were appended
//! 2. Scaling and scrolling never hold at once, and the first claim sticks
//! 3. Scale/scroll reach the strategy unless exclusivity or `can_scale` drops them
//! 4. The content-view pool is LIFO and never grows past its capacity

mod common;

use common::{Spy, SpyLayout};
use gallery_engine::gesture::GestureState;
use gallery_engine::layout::LayoutManager;
use gallery_engine::model::{Command, StrategyKind};
use gallery_engine::pool::ResourcePool;
use gallery_engine::queue::CommandQueue;
use proptest::prelude::*;
use std::sync::Arc;
use std::thread;

// ===== Strategies =====

fn gesture_command() -> impl Strategy<Value = Command> {
    let coord = 0.0f32..1000.0;
    prop_oneof![
        (coord.clone(), coord.clone()).prop_map(|(x, y)| Command::Down { x, y }),
        Just(Command::Up),
        (coord.clone(), coord.clone()).prop_map(|(x, y)| Command::PointerDown { x, y }),
        Just(Command::PointerUp),
        (-50.0f32..50.0, -50.0f32..50.0).prop_map(|(dx, dy)| Command::Scroll {
            dx,
            dy,
            total_x: dx,
            total_y: dy,
            x: 500.0,
            y: 500.0,
        }),
        (coord.clone(), coord.clone()).prop_map(|(focus_x, focus_y)| Command::ScaleBegin {
            focus_x,
            focus_y
        }),
        (0.5f32..2.0).prop_map(|factor| Command::Scale {
            focus_x: 500.0,
            focus_y: 500.0,
            factor
        }),
        Just(Command::ScaleEnd),
        (coord.clone(), coord).prop_map(|(x, y)| Command::DoubleTapConfirmed { x, y }),
    ]
}

// ===== Property 1: FIFO drain =====

proptest! {
    #[test]
    fn drain_preserves_single_producer_order(xs in prop::collection::vec(0u16..1000, 0..64)) {
        let queue = CommandQueue::new(|| {});
        let posted: Vec<Command> = xs
            .iter()
            .map(|&x| Command::Down { x: f32::from(x), y: 0.0 })
            .collect();
        for &command in &posted {
            queue.post(command);
        }
        prop_assert_eq!(queue.drain(), posted);
        prop_assert_eq!(queue.pending_len(), 0);
    }

    #[test]
    fn drain_preserves_each_producers_order(counts in prop::collection::vec(0usize..40, 1..5)) {
        let queue = Arc::new(CommandQueue::new(|| {}));
        let producers: Vec<_> = counts
            .iter()
            .enumerate()
            .map(|(producer, &count)| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for seq in 0..count {
                        queue.post(Command::Down { x: producer as f32, y: seq as f32 });
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.join().unwrap();
        }

        let drained = queue.drain();
        prop_assert_eq!(drained.len(), counts.iter().sum::<usize>());
        for (producer, &count) in counts.iter().enumerate() {
            let seen: Vec<f32> = drained
                .iter()
                .filter_map(|command| match *command {
                    Command::Down { x, y } if x == producer as f32 => Some(y),
                    _ => None,
                })
                .collect();
            let expected: Vec<f32> = (0..count).map(|seq| seq as f32).collect();
            prop_assert_eq!(seen, expected);
        }
    }
}

// ===== Property 2 & 3: Gesture exclusivity and no silent drops =====

proptest! {
    #[test]
    fn scale_and_scroll_claims_are_exclusive_and_sticky(
        commands in prop::collection::vec(gesture_command(), 0..80),
        scalable in any::<bool>(),
    ) {
        let spy = Spy::new();
        spy.scalable.set(scalable);
        let mut layout = SpyLayout::new(StrategyKind::Pager, spy.clone());
        let mut state = GestureState::new();
        // Some(true) = scaling claimed, Some(false) = scrolling claimed.
        let mut claim: Option<bool> = None;

        for command in &commands {
            if matches!(command, Command::Down { .. }) {
                claim = None;
            }
            let target: &mut dyn LayoutManager = &mut layout;
            state.handle(command, Some(target));

            prop_assert!(!(state.is_scaling() && state.is_scrolling()));
            let now = if state.is_scaling() {
                Some(true)
            } else if state.is_scrolling() {
                Some(false)
            } else {
                None
            };
            if claim.is_some() {
                prop_assert_eq!(now, claim, "claim changed mid-sequence on {:?}", command);
            }
            claim = claim.or(now);
        }
    }

    #[test]
    fn scale_and_scroll_drop_only_for_exclusivity_or_refusal(
        commands in prop::collection::vec(gesture_command(), 0..80),
        scalable in any::<bool>(),
    ) {
        let spy = Spy::new();
        spy.scalable.set(scalable);
        let mut layout = SpyLayout::new(StrategyKind::Pager, spy.clone());
        let mut state = GestureState::new();
        let mut expected_scrolls = 0;
        let mut expected_scales = 0;

        for command in &commands {
            match command {
                Command::Scroll { .. } if !state.is_scaling() => expected_scrolls += 1,
                Command::ScaleBegin { .. } | Command::Scale { .. }
                    if !state.is_scrolling() && scalable =>
                {
                    expected_scales += 1
                }
                _ => {}
            }
            let target: &mut dyn LayoutManager = &mut layout;
            state.handle(command, Some(target));
        }

        prop_assert_eq!(spy.count(StrategyKind::Pager, "scroll"), expected_scrolls);
        prop_assert_eq!(spy.count(StrategyKind::Pager, "scale"), expected_scales);
    }
}

// ===== Property 4: Pool LIFO and overflow =====

proptest! {
    #[test]
    fn pool_hands_back_releases_in_reverse(k in 1usize..=5) {
        let mut pool = ResourcePool::new(5, 256.0, 48.0);
        let views: Vec<_> = (0..k).map(|_| pool.obtain_content_view()).collect();
        let released: Vec<u64> = views.iter().map(|view| view.id().get()).collect();
        for view in views {
            pool.release_content_view(view);
        }

        let obtained: Vec<u64> = (0..k).map(|_| pool.obtain_content_view().id().get()).collect();
        let mut expected = released;
        expected.reverse();
        prop_assert_eq!(obtained, expected);
    }

    #[test]
    fn pool_never_exceeds_capacity(n in 5usize..16) {
        let mut pool = ResourcePool::new(5, 256.0, 48.0);
        let views: Vec<_> = (0..n).map(|_| pool.obtain_content_view()).collect();
        for view in views {
            pool.release_content_view(view);
        }

        prop_assert_eq!(pool.pooled_content_views(), 5);
        prop_assert_eq!(pool.stats().discarded, n - 5);
        prop_assert_eq!(pool.stats().created, n);
    }
}
