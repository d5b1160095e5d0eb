//! Scheduling primitives: task turns and animation frames
//!
//! The controller never waits. It hands a `Continuation` to the scheduler and
//! the host calls `ScrollRestorationController::resume` with it once the
//! requested point in the event loop is reached.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::controller::Continuation;

/// Opaque id of a scheduled callback, usable for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackHandle(pub u64);

pub trait Scheduler {
    /// Run `continuation` on the next task turn (`setTimeout(.., 0)`)
    fn queue_task(&self, continuation: Continuation) -> CallbackHandle;

    /// Run `continuation` before the next frame is painted (`requestAnimationFrame`)
    fn request_animation_frame(&self, continuation: Continuation) -> CallbackHandle;

    /// Drop a pending callback. Unknown or already-run handles are ignored.
    fn cancel(&self, handle: CallbackHandle);
}

#[derive(Debug, Default)]
struct ClockState {
    next_id: u64,
    tasks: VecDeque<(CallbackHandle, Continuation)>,
    frame_callbacks: Vec<(CallbackHandle, Continuation)>,
    frames: u64,
    cancelled: u64,
}

impl ClockState {
    fn next_handle(&mut self) -> CallbackHandle {
        self.next_id += 1;
        CallbackHandle(self.next_id)
    }
}

/// Deterministic event loop queues.
///
/// Tasks and frame callbacks are only run when the host drains them with
/// `take_tasks` / `take_frame`, so tests control exactly when time advances.
/// Callbacks scheduled while a batch is running land in the next batch.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    state: Rc<RefCell<ClockState>>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every task queued so far, in queue order
    pub fn take_tasks(&self) -> Vec<Continuation> {
        let mut s = self.state.borrow_mut();
        s.tasks.drain(..).map(|(_, c)| c).collect()
    }

    /// Advance one frame and return the callbacks registered for it
    pub fn take_frame(&self) -> Vec<Continuation> {
        let mut s = self.state.borrow_mut();
        s.frames += 1;
        s.frame_callbacks.drain(..).map(|(_, c)| c).collect()
    }

    pub fn pending_tasks(&self) -> usize {
        self.state.borrow().tasks.len()
    }

    pub fn pending_frame_callbacks(&self) -> usize {
        self.state.borrow().frame_callbacks.len()
    }

    pub fn is_idle(&self) -> bool {
        let s = self.state.borrow();
        s.tasks.is_empty() && s.frame_callbacks.is_empty()
    }

    /// Frames advanced so far
    pub fn frame_count(&self) -> u64 {
        self.state.borrow().frames
    }

    /// Callbacks removed by `cancel`
    pub fn cancelled_count(&self) -> u64 {
        self.state.borrow().cancelled
    }
}

impl Scheduler for FrameClock {
    fn queue_task(&self, continuation: Continuation) -> CallbackHandle {
        let mut s = self.state.borrow_mut();
        let handle = s.next_handle();
        s.tasks.push_back((handle, continuation));
        handle
    }

    fn request_animation_frame(&self, continuation: Continuation) -> CallbackHandle {
        let mut s = self.state.borrow_mut();
        let handle = s.next_handle();
        s.frame_callbacks.push((handle, continuation));
        handle
    }

    fn cancel(&self, handle: CallbackHandle) {
        let mut s = self.state.borrow_mut();
        let before = s.tasks.len() + s.frame_callbacks.len();
        s.tasks.retain(|(h, _)| *h != handle);
        s.frame_callbacks.retain(|(h, _)| *h != handle);
        let removed = before - (s.tasks.len() + s.frame_callbacks.len());
        s.cancelled += removed as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_and_frames_are_separate_queues() {
        let clock = FrameClock::new();
        clock.queue_task(Continuation::ResetToTop { generation: 1 });
        clock.request_animation_frame(Continuation::RestoreTick { generation: 1 });
        assert_eq!(clock.pending_tasks(), 1);
        assert_eq!(clock.pending_frame_callbacks(), 1);

        let tasks = clock.take_tasks();
        assert_eq!(tasks, vec![Continuation::ResetToTop { generation: 1 }]);
        assert_eq!(clock.frame_count(), 0);

        let frame = clock.take_frame();
        assert_eq!(frame, vec![Continuation::RestoreTick { generation: 1 }]);
        assert_eq!(clock.frame_count(), 1);
        assert!(clock.is_idle());
    }

    #[test]
    fn cancel_removes_only_the_matching_callback() {
        let clock = FrameClock::new();
        let a = clock.request_animation_frame(Continuation::RestoreTick { generation: 1 });
        let _b = clock.request_animation_frame(Continuation::RestoreTick { generation: 2 });
        assert_ne!(a, _b);

        clock.cancel(a);
        clock.cancel(a);
        assert_eq!(clock.cancelled_count(), 1);
        assert_eq!(clock.take_frame(), vec![Continuation::RestoreTick { generation: 2 }]);
    }
}
