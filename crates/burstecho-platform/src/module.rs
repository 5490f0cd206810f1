//! The delay module as the hardware sees it: one entry point per interrupt.
//!
//! [`DelayModule::handle`] matches each [`InterruptEvent`] once. The slow
//! conversion, the main gate and the panel only publish to a [`ControlPort`];
//! each transfer interrupt pulls the port into the engine and then runs it
//! into the free half of the double buffer. Everything else is accepted and
//! ignored.
//!
//! ```text
//!  SlowConversion ──publish_controls──┐
//!  MainRising ──────request_burst─────┤  ControlPort ──sync──> transfer
//!  Touch / drain ───set_*/toggle_*────┘
//! ```

use alloc::sync::Arc;

use burstecho_core::{ControlPort, DelayEngine, EngineConfig, EngineError};

use crate::buffer::DoubleBuffer;
use crate::events::{InterruptEvent, MenuState, TouchEvent, UiAction};
use crate::router::UiRouter;
use crate::touch::{EventQueue, TouchSense};

/// Bindings the module's router can hold.
pub const ROUTER_CAPACITY: usize = 16;

/// Touch events buffered between slow ticks.
pub const TOUCH_QUEUE_CAPACITY: usize = 16;

/// Shared queue handed to the touch collaborator.
pub type TouchQueue = EventQueue<TOUCH_QUEUE_CAPACITY>;

/// Delay engine wired to its double buffer and panel.
///
/// # Example
///
/// ```rust
/// use burstecho_core::EngineConfig;
/// use burstecho_platform::{ControlFrame, DelayModule, InterruptEvent};
///
/// let mut module = DelayModule::<1>::new(EngineConfig::DEFAULT).unwrap();
///
/// module.handle(InterruptEvent::SlowConversion(ControlFrame::new(2048, 3000)));
/// module.set_input(1000);
/// module.handle(InterruptEvent::HalfTransfer);
/// module.handle(InterruptEvent::TransferComplete);
/// assert_eq!(module.output().len(), 2);
/// ```
#[derive(Debug)]
pub struct DelayModule<const BLOCK: usize> {
    engine: DelayEngine,
    buffer: DoubleBuffer<BLOCK>,
    router: UiRouter<ROUTER_CAPACITY>,
    menu: MenuState,
    touch_queue: Arc<TouchQueue>,
    port: Arc<ControlPort>,
    last_write_position: usize,
}

impl<const BLOCK: usize> DelayModule<BLOCK> {
    /// Builds the engine for `config`.
    ///
    /// `config.block_size` must equal `BLOCK`.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        if config.block_size != BLOCK {
            return Err(EngineError::InvalidBlockSize);
        }
        let engine = DelayEngine::new(config)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(block = BLOCK, "delay module ready");

        Ok(Self {
            engine,
            buffer: DoubleBuffer::new(),
            router: UiRouter::with_defaults(),
            menu: MenuState::Default,
            touch_queue: Arc::new(TouchQueue::new()),
            port: Arc::new(ControlPort::new(&config)),
            last_write_position: 0,
        })
    }

    /// Single dispatch entry for every hardware callback.
    pub fn handle(&mut self, event: InterruptEvent) {
        match event {
            InterruptEvent::HalfTransfer => self.run_block(0),
            InterruptEvent::TransferComplete => self.run_block(BLOCK),
            InterruptEvent::SlowConversion(frame) => {
                self.port.publish_controls(frame.cv, frame.knob);
                self.drain_touch();
            }
            InterruptEvent::MainRising => self.port.request_burst(),
            InterruptEvent::MainFalling => self.engine.gate_falling(),
            InterruptEvent::Touch(touch) => {
                self.dispatch_touch(touch);
            }
            InterruptEvent::AuxRising
            | InterruptEvent::AuxFalling
            | InterruptEvent::ButtonPressed
            | InterruptEvent::ButtonReleased
            | InterruptEvent::AuxTimer1
            | InterruptEvent::AuxTimer2
            | InterruptEvent::IoProcess => {}
        }
    }

    #[inline]
    fn run_block(&mut self, write_position: usize) {
        self.engine.sync(&self.port);
        let input = self.buffer.input();
        self.engine
            .process(input, self.buffer.output_mut(), write_position);
        self.last_write_position = write_position;
    }

    /// Routes one touch event through the binding table and applies the
    /// result. Returns the applied action, if any.
    pub fn dispatch_touch(&self, event: TouchEvent) -> Option<UiAction> {
        let action = self.router.route(self.menu, event)?;
        self.apply(action);
        Some(action)
    }

    /// Applies queued touch events. Returns how many were taken.
    pub fn drain_touch(&self) -> usize {
        let mut taken = 0;
        while let Some(event) = self.touch_queue.pop() {
            self.dispatch_touch(event);
            taken += 1;
        }
        taken
    }

    /// Publishes `action` to the control port; the engine picks it up on the
    /// next transfer.
    pub fn apply(&self, action: UiAction) {
        #[cfg(feature = "tracing")]
        tracing::debug!(?action, "ui action");

        match action {
            UiAction::ToggleDelayMod => {
                self.port.toggle_delay_mod();
            }
            UiAction::ToggleFeedbackMod => {
                self.port.toggle_feedback_mod();
            }
            UiAction::DisableDelayMod => self.port.set_delay_mod(false),
            UiAction::DisableFeedbackMod => self.port.set_feedback_mod(false),
            UiAction::ManualBurst => self.port.request_burst(),
        }
    }

    /// Registers a closure with `sense` that queues its gestures for the next
    /// slow tick.
    pub fn link_touch<T: TouchSense>(&self, sense: &mut T) {
        let queue = Arc::clone(&self.touch_queue);
        sense.register(alloc::boxed::Box::new(move |event| {
            queue.push(event);
        }));
    }

    /// Handle on the port the slower interrupts publish to.
    ///
    /// Anything written here reaches the engine at the start of the next
    /// transfer, whichever context wrote it.
    pub fn control_port(&self) -> Arc<ControlPort> {
        Arc::clone(&self.port)
    }

    /// Handle on the queue the touch closure fills.
    pub fn touch_queue(&self) -> Arc<TouchQueue> {
        Arc::clone(&self.touch_queue)
    }

    /// Latches the next input sample.
    #[inline]
    pub fn set_input(&mut self, sample: i32) {
        self.buffer.set_input(sample);
    }

    /// The whole output double buffer.
    pub fn output(&self) -> &[i32] {
        self.buffer.output()
    }

    /// The half written by the most recent transfer interrupt.
    pub fn last_block(&self) -> &[i32] {
        self.buffer.half(self.last_write_position)
    }

    /// Sets the menu used to route touch events.
    pub fn set_menu(&mut self, menu: MenuState) {
        self.menu = menu;
    }

    /// Current menu.
    pub fn menu(&self) -> MenuState {
        self.menu
    }

    /// The binding table.
    pub fn router(&self) -> &UiRouter<ROUTER_CAPACITY> {
        &self.router
    }

    /// Mutable binding table.
    pub fn router_mut(&mut self) -> &mut UiRouter<ROUTER_CAPACITY> {
        &mut self.router
    }

    /// The engine.
    pub fn engine(&self) -> &DelayEngine {
        &self.engine
    }

    /// Mutable engine.
    ///
    /// Mode flags set here are replaced by the port's on the next transfer.
    pub fn engine_mut(&mut self) -> &mut DelayEngine {
        &mut self.engine
    }

    /// Clears engine and buffers.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.port.clear_pending();
        self.buffer.clear();
        while self.touch_queue.pop().is_some() {}
        self.last_write_position = 0;
    }
}
