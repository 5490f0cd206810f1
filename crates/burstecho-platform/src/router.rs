//! Table-driven routing of touch events to engine actions.
//!
//! [`UiRouter`] holds a fixed-capacity binding table keyed on
//! `(menu, gesture, sensor)`. One lookup replaces a callback per sensor per
//! gesture; unbound combinations are simply ignored.
//!
//! # Example
//!
//! ```rust
//! use burstecho_platform::{MenuState, SensorId, TouchEvent, UiAction, UiRouter};
//!
//! let router = UiRouter::<16>::with_defaults();
//! let action = router.route(MenuState::Default, TouchEvent::tap(SensorId::Aux1));
//! assert_eq!(action, Some(UiAction::ManualBurst));
//! ```

use crate::events::{GestureKind, MenuState, SensorId, TouchEvent, UiAction};

/// One row of the binding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    /// Menu the binding applies in.
    pub menu: MenuState,
    /// Gesture and sensor that fire it.
    pub event: TouchEvent,
    /// Resulting action.
    pub action: UiAction,
}

impl Binding {
    /// Creates a binding.
    pub const fn new(menu: MenuState, event: TouchEvent, action: UiAction) -> Self {
        Self {
            menu,
            event,
            action,
        }
    }
}

/// Power-on bindings, all in the runtime menu.
pub const DEFAULT_BINDINGS: [Binding; 5] = [
    Binding::new(
        MenuState::Default,
        TouchEvent::tap(SensorId::Button1),
        UiAction::ToggleDelayMod,
    ),
    Binding::new(
        MenuState::Default,
        TouchEvent::tap(SensorId::Button4),
        UiAction::ToggleFeedbackMod,
    ),
    Binding::new(
        MenuState::Default,
        TouchEvent::tap(SensorId::Aux1),
        UiAction::ManualBurst,
    ),
    Binding::new(
        MenuState::Default,
        TouchEvent::hold(SensorId::Button1),
        UiAction::DisableDelayMod,
    ),
    Binding::new(
        MenuState::Default,
        TouchEvent::hold(SensorId::Button4),
        UiAction::DisableFeedbackMod,
    ),
];

/// Fixed-capacity `(menu, gesture, sensor) → action` table.
///
/// # Type Parameter
///
/// - `N`: Maximum number of bindings (compile-time constant for no_std support)
#[derive(Debug, Clone)]
pub struct UiRouter<const N: usize> {
    bindings: [Option<Binding>; N],
    count: usize,
}

impl<const N: usize> UiRouter<N> {
    /// Creates an empty router.
    pub const fn new() -> Self {
        Self {
            bindings: [None; N],
            count: 0,
        }
    }

    /// Creates a router holding [`DEFAULT_BINDINGS`] (as many as fit).
    pub fn with_defaults() -> Self {
        let mut router = Self::new();
        for binding in DEFAULT_BINDINGS {
            router.bind(binding);
        }
        router
    }

    /// Number of bindings.
    #[inline]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// True if nothing is bound.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Maximum number of bindings.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Adds or replaces the binding for `binding`'s key.
    ///
    /// Returns `false` if the table is full.
    pub fn bind(&mut self, binding: Binding) -> bool {
        for entry in self.bindings.iter_mut().flatten() {
            if entry.menu == binding.menu && entry.event == binding.event {
                entry.action = binding.action;
                return true;
            }
        }

        for slot in self.bindings.iter_mut() {
            if slot.is_none() {
                *slot = Some(binding);
                self.count += 1;
                return true;
            }
        }

        false
    }

    /// Removes the binding for `(menu, event)`. Returns `true` if one existed.
    pub fn unbind(&mut self, menu: MenuState, event: TouchEvent) -> bool {
        for slot in self.bindings.iter_mut() {
            if let Some(entry) = slot
                && entry.menu == menu
                && entry.event == event
            {
                *slot = None;
                self.count -= 1;
                return true;
            }
        }
        false
    }

    /// Looks up the action bound to `event` in `menu`.
    #[inline]
    pub fn route(&self, menu: MenuState, event: TouchEvent) -> Option<UiAction> {
        self.bindings
            .iter()
            .flatten()
            .find(|entry| entry.menu == menu && entry.event == event)
            .map(|entry| entry.action)
    }

    /// All bindings for `gesture` in `menu`.
    pub fn bindings_for(
        &self,
        menu: MenuState,
        gesture: GestureKind,
    ) -> impl Iterator<Item = &Binding> {
        self.bindings
            .iter()
            .flatten()
            .filter(move |entry| entry.menu == menu && entry.event.kind == gesture)
    }

    /// Removes every binding.
    pub fn clear(&mut self) {
        self.bindings = [None; N];
        self.count = 0;
    }
}

impl<const N: usize> Default for UiRouter<N> {
    fn default() -> Self {
        Self::with_defaults()
    }
}
