//! Tests for the command queue and viewer handle.

use super::*;
use crate::model::LayoutMode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

fn counting_queue() -> (Arc<CommandQueue>, Arc<AtomicUsize>) {
    let wakes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&wakes);
    let queue = Arc::new(CommandQueue::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    }));
    (queue, wakes)
}

// ===== Ordering =====

#[test]
fn drain_returns_commands_in_post_order() {
    let (queue, _) = counting_queue();
    queue.post(Command::Down { x: 1.0, y: 1.0 });
    queue.post(Command::PointerUp);
    queue.post(Command::Up);

    assert_eq!(
        queue.drain(),
        vec![
            Command::Down { x: 1.0, y: 1.0 },
            Command::PointerUp,
            Command::Up
        ]
    );
    assert_eq!(queue.pending_len(), 0);
}

#[test]
fn drain_into_swaps_whole_list() {
    let (queue, _) = counting_queue();
    queue.post(Command::Up);
    queue.post(Command::ScaleEnd);

    let mut buffer = Vec::new();
    queue.drain_into(&mut buffer);
    assert_eq!(buffer, vec![Command::Up, Command::ScaleEnd]);
    assert_eq!(queue.pending_len(), 0);
}

#[test]
fn posts_during_replay_land_in_next_drain() {
    let (queue, _) = counting_queue();
    queue.post(Command::Up);

    let mut buffer = Vec::new();
    queue.drain_into(&mut buffer);
    for _ in buffer.drain(..) {
        // A handler posting while the batch is replayed.
        queue.post(Command::PointerUp);
    }
    assert_eq!(queue.drain(), vec![Command::PointerUp]);
}

#[test]
fn concurrent_posts_keep_per_thread_order() {
    let (queue, _) = counting_queue();
    let threads: Vec<_> = (0..4)
        .map(|t| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for i in 0..100 {
                    queue.post(Command::Down {
                        x: t as f32,
                        y: i as f32,
                    });
                }
            })
        })
        .collect();
    for handle in threads {
        handle.join().unwrap();
    }

    let drained = queue.drain();
    assert_eq!(drained.len(), 400);
    for t in 0..4 {
        let ys: Vec<f32> = drained
            .iter()
            .filter_map(|c| match c {
                Command::Down { x, y } if *x == t as f32 => Some(*y),
                _ => None,
            })
            .collect();
        let expected: Vec<f32> = (0..100).map(|i| i as f32).collect();
        assert_eq!(ys, expected);
    }
}

// ===== Waking =====

#[test]
fn every_post_wakes() {
    let (queue, wakes) = counting_queue();
    queue.post(Command::Up);
    queue.post(Command::Up);
    queue.wake();
    assert_eq!(wakes.load(Ordering::SeqCst), 3);
}

#[test]
fn poisoned_lock_is_recovered() {
    let (queue, _) = counting_queue();
    let poisoner = Arc::clone(&queue);
    let _ = thread::spawn(move || {
        let _guard = poisoner.pending.lock().unwrap();
        panic!("poison the queue");
    })
    .join();

    queue.post(Command::Up);
    assert_eq!(queue.drain(), vec![Command::Up]);
}

// ===== Handle =====

#[test]
fn handle_maps_callbacks_to_commands() {
    let (queue, _) = counting_queue();
    let handle = ViewerHandle::new(&queue);

    handle.on_down(5.0, 5.0);
    handle.on_scroll(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
    handle.on_scale_begin(7.0, 8.0);
    handle.set_layout_mode(LayoutMode::TopToBottom);

    assert_eq!(
        queue.drain(),
        vec![
            Command::Down { x: 5.0, y: 5.0 },
            Command::Scroll {
                dx: 1.0,
                dy: 2.0,
                total_x: 3.0,
                total_y: 4.0,
                x: 5.0,
                y: 6.0
            },
            Command::ScaleBegin {
                focus_x: 7.0,
                focus_y: 8.0
            },
            Command::SetLayoutMode {
                mode: LayoutMode::TopToBottom
            },
        ]
    );
}

#[test]
fn handle_is_noop_after_viewer_dropped() {
    let (queue, wakes) = counting_queue();
    let handle = ViewerHandle::new(&queue);
    drop(queue);

    assert!(!handle.is_connected());
    assert!(!handle.post(Command::Up));
    handle.on_fling(100.0, 0.0);
    handle.request_redraw();
    assert_eq!(wakes.load(Ordering::SeqCst), 0);
}

#[test]
fn handle_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ViewerHandle>();
    assert_send_sync::<CommandQueue>();
}
