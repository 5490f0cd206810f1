//! Event vocabulary shared by the interrupt dispatcher and the touch UI.
//!
//! Every hardware callback the module reacts to is one [`InterruptEvent`]
//! variant, and every touch gesture is one tagged [`TouchEvent`]. Handlers
//! match on the tag instead of overriding one method per sensor.

/// Touch sensors and shift combinations on the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SensorId {
    /// Button 1.
    Button1 = 0,
    /// Button 2.
    Button2 = 1,
    /// Button 3.
    Button3 = 2,
    /// Button 4.
    Button4 = 3,
    /// Button 5.
    Button5 = 4,
    /// Button 6.
    Button6 = 5,
    /// Auxiliary touch 1.
    Aux1 = 6,
    /// Auxiliary touch 2.
    Aux2 = 7,
    /// Auxiliary touch 2, alternate (shifted) function.
    Aux2Alt = 8,
    /// Auxiliary touch 3.
    Aux3 = 9,
    /// Auxiliary touch 4.
    Aux4 = 10,
}

impl SensorId {
    /// Every sensor, in index order.
    pub const ALL: [Self; 11] = [
        Self::Button1,
        Self::Button2,
        Self::Button3,
        Self::Button4,
        Self::Button5,
        Self::Button6,
        Self::Aux1,
        Self::Aux2,
        Self::Aux2Alt,
        Self::Aux3,
        Self::Aux4,
    ];

    /// Sensor at `index`, if any.
    pub const fn from_index(index: u8) -> Option<Self> {
        if (index as usize) < Self::ALL.len() {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Zero-based index.
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// Kind of touch gesture recognised by the sensing collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GestureKind {
    /// Short touch.
    Tap = 0,
    /// Long touch.
    Hold = 1,
    /// The sensor's menu was entered.
    MenuEnter = 2,
}

impl GestureKind {
    const ALL: [Self; 3] = [Self::Tap, Self::Hold, Self::MenuEnter];
}

/// A tagged touch event: what happened, on which sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TouchEvent {
    /// Gesture kind.
    pub kind: GestureKind,
    /// Sensor the gesture happened on.
    pub target: SensorId,
}

impl TouchEvent {
    /// Creates an event.
    pub const fn new(kind: GestureKind, target: SensorId) -> Self {
        Self { kind, target }
    }

    /// Tap on `target`.
    pub const fn tap(target: SensorId) -> Self {
        Self::new(GestureKind::Tap, target)
    }

    /// Hold on `target`.
    pub const fn hold(target: SensorId) -> Self {
        Self::new(GestureKind::Hold, target)
    }

    /// Packs the event into one byte: kind in the high nibble, sensor in the
    /// low nibble.
    #[inline]
    pub const fn to_code(self) -> u8 {
        ((self.kind as u8) << 4) | self.target.index()
    }

    /// Inverse of [`TouchEvent::to_code`].
    pub const fn from_code(code: u8) -> Option<Self> {
        let kind = (code >> 4) as usize;
        if kind >= GestureKind::ALL.len() {
            return None;
        }
        match SensorId::from_index(code & 0x0F) {
            Some(target) => Some(Self::new(GestureKind::ALL[kind], target)),
            None => None,
        }
    }
}

/// UI menu the panel is in. Navigation between menus is owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MenuState {
    /// Runtime view.
    #[default]
    Default,
    /// Main mode selection.
    NewMode,
    /// Aux mode selection.
    NewAuxMode,
    /// Preset selection.
    Preset,
    /// A sensor's own menu.
    Sensor(SensorId),
}

/// Engine-level effect of a routed touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiAction {
    /// Flip delay (read-position) modulation.
    ToggleDelayMod,
    /// Flip feedback modulation.
    ToggleFeedbackMod,
    /// Force delay modulation off.
    DisableDelayMod,
    /// Force feedback modulation off.
    DisableFeedbackMod,
    /// Open a burst window as if the main gate rose.
    ManualBurst,
}

/// Raw readings of the slow control conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlFrame {
    /// Bipolar CV, centered at 2048.
    pub cv: i32,
    /// Time knob, 0-4095.
    pub knob: i32,
}

impl ControlFrame {
    /// Creates a frame.
    pub const fn new(cv: i32, knob: i32) -> Self {
        Self { cv, knob }
    }
}

/// Hardware callbacks delivered to the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptEvent {
    /// First half of the output double buffer is free.
    HalfTransfer,
    /// Second half of the output double buffer is free.
    TransferComplete,
    /// Slow ADC conversion finished.
    SlowConversion(ControlFrame),
    /// Main gate rising edge.
    MainRising,
    /// Main gate falling edge.
    MainFalling,
    /// Aux gate rising edge.
    AuxRising,
    /// Aux gate falling edge.
    AuxFalling,
    /// Panel button pressed.
    ButtonPressed,
    /// Panel button released.
    ButtonReleased,
    /// Auxiliary timer 1 elapsed.
    AuxTimer1,
    /// Auxiliary timer 2 elapsed.
    AuxTimer2,
    /// Generic I/O processing slot.
    IoProcess,
    /// Gesture from the touch sensing collaborator.
    Touch(TouchEvent),
}

impl InterruptEvent {
    /// True for the two buffer-transfer interrupts.
    #[inline]
    pub const fn is_transfer(&self) -> bool {
        matches!(self, Self::HalfTransfer | Self::TransferComplete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_for_every_event() {
        for kind in GestureKind::ALL {
            for target in SensorId::ALL {
                let event = TouchEvent::new(kind, target);
                assert_eq!(TouchEvent::from_code(event.to_code()), Some(event));
            }
        }
    }

    #[test]
    fn invalid_codes_are_rejected() {
        assert_eq!(TouchEvent::from_code(0x0B), None);
        assert_eq!(TouchEvent::from_code(0x30), None);
        assert_eq!(TouchEvent::from_code(0xFF), None);
    }

    #[test]
    fn sensor_indices_are_dense() {
        for (i, sensor) in SensorId::ALL.iter().enumerate() {
            assert_eq!(sensor.index() as usize, i);
            assert_eq!(SensorId::from_index(i as u8), Some(*sensor));
        }
        assert_eq!(SensorId::from_index(11), None);
    }

    #[test]
    fn transfer_classification() {
        assert!(InterruptEvent::HalfTransfer.is_transfer());
        assert!(InterruptEvent::TransferComplete.is_transfer());
        assert!(!InterruptEvent::MainRising.is_transfer());
        assert!(!InterruptEvent::SlowConversion(ControlFrame::default()).is_transfer());
    }
}
