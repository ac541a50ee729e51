//! Trigger output abstraction

/// The gate/trigger jack.
///
/// The sequencer calls [`trigger`](TriggerOutput::trigger) once per trigger
/// it schedules. Pulse width and spacing belong to the implementation; the
/// caller never waits on it and never observes the pin.
pub trait TriggerOutput {
    /// Emit one trigger pulse (or queue it behind a pulse already in flight).
    fn trigger(&mut self);
}

impl<T: TriggerOutput + ?Sized> TriggerOutput for &mut T {
    fn trigger(&mut self) {
        (**self).trigger();
    }
}
