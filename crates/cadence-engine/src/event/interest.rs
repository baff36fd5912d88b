use std::cell::Cell;

use super::kind::EventType;

/// Direction of a pointer-interest change.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum InterestChange {
    Increased,
    Decreased,
}

/// Host hook told about pointer-category listener registrations.
///
/// A dispatcher calls this once per pointer listener added and once per
/// pointer listener removed, so a host can skip hit-testing entirely while
/// nobody listens.
pub trait PointerInterest {
    fn pointer_interest_changed(&self, ty: &EventType, change: InterestChange);
}

/// [`PointerInterest`] that keeps a running count of live pointer listeners.
#[derive(Debug, Default)]
pub struct PointerInterestCounter {
    count: Cell<usize>,
}

impl PointerInterestCounter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count.get()
    }

    #[inline]
    pub fn is_interested(&self) -> bool {
        self.count.get() > 0
    }
}

impl PointerInterest for PointerInterestCounter {
    fn pointer_interest_changed(&self, _ty: &EventType, change: InterestChange) {
        let count = self.count.get();
        self.count.set(match change {
            InterestChange::Increased => count + 1,
            InterestChange::Decreased => count.saturating_sub(1),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_never_goes_negative() {
        let counter = PointerInterestCounter::new();
        let ty = EventType::from("onMouseMove");
        counter.pointer_interest_changed(&ty, InterestChange::Increased);
        counter.pointer_interest_changed(&ty, InterestChange::Decreased);
        counter.pointer_interest_changed(&ty, InterestChange::Decreased);
        assert_eq!(counter.count(), 0);
        assert!(!counter.is_interested());
    }
}
