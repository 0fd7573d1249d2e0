//! Collaborator traits the timer driver is written against.

/// Interrupt line number as seen by the interrupt controller.
pub type IrqNumber = u32;

/// Line-level control of an interrupt controller (NVIC on Cortex-M).
///
/// Several devices can share one controller, so implementations must be
/// callable from any task and from interrupt context.
pub trait InterruptController: Send + Sync {
    /// Unmask a line.
    fn enable_irq(&self, irq: IrqNumber);

    /// Mask a line. Pending state is kept.
    fn disable_irq(&self, irq: IrqNumber);

    /// Drop the pending state of a line.
    fn clear_pending(&self, irq: IrqNumber);

    /// Whether a line is currently unmasked.
    fn is_irq_enabled(&self, irq: IrqNumber) -> bool;
}
