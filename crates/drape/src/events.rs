//! Typed signals exchanged between the simulation components.
//!
//! Components receive a cloned [`EventBus`] at construction and publish into
//! it; the owner of the tick loop drains the bus and hands every event to each
//! subscriber before the tick returns.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimEvent {
    /// Wind turned on or off.
    WindBlowing(bool),
    /// User input started; cloth should settle and wind calm down.
    StormIsCalmingDown,
    /// Ease world gravity in (`true`) or drop it (`false`).
    ToggleGravity(bool),
    /// Per-tick scroll differential used for camera tilt and tile distortion.
    RotateCam { delta: f32 },
}

#[derive(Clone, Debug, Default)]
pub struct EventBus {
    queue: Rc<RefCell<VecDeque<SimEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, event: SimEvent) {
        self.queue.borrow_mut().push_back(event);
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Takes everything published so far, in order.
    pub fn drain(&self) -> Vec<SimEvent> {
        self.queue.borrow_mut().drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_one_queue() {
        let bus = EventBus::new();
        let publisher = bus.clone();
        publisher.publish(SimEvent::WindBlowing(true));
        publisher.publish(SimEvent::RotateCam { delta: 0.1 });

        assert_eq!(bus.len(), 2);
        assert_eq!(
            bus.drain(),
            vec![SimEvent::WindBlowing(true), SimEvent::RotateCam { delta: 0.1 }]
        );
        assert!(publisher.is_empty());
    }
}
