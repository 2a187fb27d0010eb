//! Trailing window over the most recent values.
//!
//! Provides O(1) push and a mean that is only reported once the window holds
//! its full length, which is how insufficient history is flagged.

use std::collections::VecDeque;

/// A fixed-length trailing window of values.
///
/// # Example
/// ```
/// use features::rolling::TrailingWindow;
///
/// let mut window = TrailingWindow::new(3);
/// window.push(1.0);
/// window.push(2.0);
/// assert_eq!(window.full_mean(), None);
///
/// window.push(3.0);
/// assert_eq!(window.full_mean(), Some(2.0));
///
/// window.push(4.0); // Drops 1.0
/// assert_eq!(window.full_mean(), Some(3.0));
/// ```
#[derive(Debug, Clone)]
pub struct TrailingWindow {
    data: VecDeque<f64>,
    capacity: usize,
}

impl TrailingWindow {
    /// Create a window of `capacity` values. A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a value, returning the one that fell out of the window.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        let removed = if self.data.len() >= self.capacity {
            self.data.pop_front()
        } else {
            None
        };
        self.data.push_back(value);
        removed
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.data.len() >= self.capacity
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Mean of the window, or `None` until it holds `capacity` values.
    ///
    /// Summed fresh on every call so long series accumulate no drift.
    pub fn full_mean(&self) -> Option<f64> {
        if !self.is_full() {
            return None;
        }
        Some(self.data.iter().sum::<f64>() / self.capacity as f64)
    }

    /// Most recent value.
    #[inline]
    pub fn last(&self) -> Option<f64> {
        self.data.back().copied()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_fills_then_slides() {
        let mut window = TrailingWindow::new(3);
        assert!(window.is_empty());
        assert_eq!(window.push(1.0), None);
        assert_eq!(window.push(2.0), None);
        assert!(!window.is_full());
        assert_eq!(window.push(3.0), None);
        assert!(window.is_full());
        assert_eq!(window.push(4.0), Some(1.0));
        assert_eq!(window.len(), 3);
        assert_eq!(window.last(), Some(4.0));
    }

    #[test]
    fn test_full_mean_only_when_full() {
        let mut window = TrailingWindow::new(2);
        window.push(10.0);
        assert_eq!(window.full_mean(), None);
        window.push(20.0);
        assert_eq!(window.full_mean(), Some(15.0));
        window.push(40.0);
        assert_eq!(window.full_mean(), Some(30.0));
    }

    #[test]
    fn test_zero_capacity_is_one() {
        let mut window = TrailingWindow::new(0);
        assert_eq!(window.capacity(), 1);
        window.push(7.0);
        assert_eq!(window.full_mean(), Some(7.0));
    }

    #[test]
    fn test_clear() {
        let mut window = TrailingWindow::new(2);
        window.push(1.0);
        window.push(2.0);
        window.clear();
        assert!(window.is_empty());
        assert_eq!(window.full_mean(), None);
    }
}
