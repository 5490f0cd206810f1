//! Touch sensing bridge.
//!
//! The sensing library runs in its own interrupt and reports gestures through
//! a callback. Instead of passing a type-erased context pointer, the module
//! registers a typed closure with a [`TouchSense`] implementor. The closure
//! pushes into an [`EventQueue`] that the module drains from its own context.
//!
//! ```text
//!  touch ISR ──callback──> EventQueue::push ···> EventQueue::pop ──> UiRouter
//! ```

use alloc::boxed::Box;
use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use crate::events::TouchEvent;

/// Closure invoked by the sensing collaborator for each recognised gesture.
pub type TouchCallback = Box<dyn FnMut(TouchEvent) + Send>;

/// A touch sensing collaborator that reports gestures through a callback.
///
/// # Example
///
/// ```rust
/// use burstecho_platform::{TouchCallback, TouchEvent, TouchSense, SensorId};
///
/// #[derive(Default)]
/// struct Panel {
///     callback: Option<TouchCallback>,
/// }
///
/// impl TouchSense for Panel {
///     fn register(&mut self, callback: TouchCallback) {
///         self.callback = Some(callback);
///     }
/// }
///
/// impl Panel {
///     fn touch(&mut self, event: TouchEvent) {
///         if let Some(callback) = self.callback.as_mut() {
///             callback(event);
///         }
///     }
/// }
///
/// let mut panel = Panel::default();
/// panel.register(Box::new(|event| assert_eq!(event, TouchEvent::tap(SensorId::Aux1))));
/// panel.touch(TouchEvent::tap(SensorId::Aux1));
/// ```
pub trait TouchSense {
    /// Installs `callback`, replacing any earlier one.
    fn register(&mut self, callback: TouchCallback);
}

/// Fixed-capacity single-producer single-consumer queue of touch events.
///
/// Events are stored packed (see [`TouchEvent::to_code`]) in atomics, so one
/// context may push while another pops without a lock. A push into a full
/// queue drops the event.
#[derive(Debug)]
pub struct EventQueue<const N: usize> {
    slots: [AtomicU8; N],
    head: AtomicUsize,
    tail: AtomicUsize,
}

impl<const N: usize> EventQueue<N> {
    /// Creates an empty queue.
    pub const fn new() -> Self {
        Self {
            slots: [const { AtomicU8::new(0) }; N],
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    /// Appends `event`. Returns `false` if the queue was full.
    pub fn push(&self, event: TouchEvent) -> bool {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);
        if tail.wrapping_sub(head) >= N {
            return false;
        }
        self.slots[tail % N].store(event.to_code(), Ordering::Relaxed);
        self.tail.store(tail.wrapping_add(1), Ordering::Release);
        true
    }

    /// Removes the oldest event.
    pub fn pop(&self) -> Option<TouchEvent> {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        if head == tail {
            return None;
        }
        let code = self.slots[head % N].load(Ordering::Relaxed);
        self.head.store(head.wrapping_add(1), Ordering::Release);
        TouchEvent::from_code(code)
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Acquire);
        tail.wrapping_sub(head)
    }

    /// True if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of queued events.
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
