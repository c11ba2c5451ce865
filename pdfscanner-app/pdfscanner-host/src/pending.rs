/// Holds at most one value awaiting a consumer.
///
/// Storing overwrites whatever was there; taking drains it. Rapid successive
/// stores are lossy: only the latest survives.
#[derive(Debug)]
pub struct PendingSlot<T> {
    value: Option<T>,
}

impl<T> PendingSlot<T> {
    pub const fn new() -> Self {
        Self { value: None }
    }

    /// Store a value, returning the one it displaced.
    pub fn store(&mut self, value: T) -> Option<T> {
        self.value.replace(value)
    }

    /// Replace the slot wholesale, including clearing it with `None`.
    pub fn replace(&mut self, value: Option<T>) -> Option<T> {
        std::mem::replace(&mut self.value, value)
    }

    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }

    pub fn peek(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

impl<T> Default for PendingSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_drains() {
        let mut slot = PendingSlot::new();
        slot.store("/cache/a.pdf".to_string());
        assert_eq!(slot.take().as_deref(), Some("/cache/a.pdf"));
        assert_eq!(slot.take(), None);
        assert!(slot.is_empty());
    }

    #[test]
    fn test_last_write_wins() {
        let mut slot = PendingSlot::new();
        assert_eq!(slot.store(1), None);
        assert_eq!(slot.store(2), Some(1), "older value should be displaced");
        assert_eq!(slot.peek(), Some(&2));
        assert_eq!(slot.take(), Some(2));
    }

    #[test]
    fn test_replace_with_none_clears() {
        let mut slot = PendingSlot::new();
        slot.store('x');
        assert_eq!(slot.replace(None), Some('x'));
        assert!(slot.is_empty());
    }
}
