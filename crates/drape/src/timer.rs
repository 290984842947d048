/// Cancellable one-shot deadline polled against the frame clock.
///
/// Scheduling while a deadline is pending replaces it, so each owner holds at
/// most one outstanding callback of a given kind.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Deferred {
    due: Option<f32>,
}

impl Deferred {
    pub fn schedule(&mut self, now: f32, delay: f32) {
        self.due = Some(now + delay.max(0.0));
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    /// Returns `true` exactly once, on the first poll at or past the deadline.
    pub fn fire(&mut self, now: f32) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_deadline() {
        let mut timer = Deferred::default();
        timer.schedule(1.0, 0.5);
        assert!(!timer.fire(1.4));
        assert!(timer.fire(1.5));
        assert!(!timer.fire(2.0));
        assert!(!timer.is_pending());
    }

    #[test]
    fn test_reschedule_replaces_pending_deadline() {
        let mut timer = Deferred::default();
        timer.schedule(0.0, 1.0);
        timer.schedule(0.8, 1.0);
        assert!(!timer.fire(1.2));
        assert!(timer.fire(1.9));
    }

    #[test]
    fn test_cancel() {
        let mut timer = Deferred::default();
        timer.schedule(0.0, 0.1);
        timer.cancel();
        assert!(!timer.fire(10.0));
    }
}
