//! Best-match accumulator used while scanning raster samples.

/// Running minimum over candidate samples.
///
/// Lives on the stack of a single query so concurrent queries never share it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    pub x: usize,
    pub y: usize,
    pub delta: f64,
}

impl Default for SearchResult {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            delta: f64::MAX,
        }
    }
}

impl SearchResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep (`x`, `y`) if `delta` beats the current best. Returns whether it did.
    #[inline]
    pub fn update(&mut self, x: usize, y: usize, delta: f64) -> bool {
        if delta < self.delta {
            self.x = x;
            self.y = y;
            self.delta = delta;
            true
        } else {
            false
        }
    }

    /// True once any candidate has been accepted.
    pub fn is_found(&self) -> bool {
        self.delta < f64::MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_keeps_minimum() {
        let mut result = SearchResult::new();
        assert!(!result.is_found());

        assert!(result.update(3, 4, 2.0));
        assert!(!result.update(5, 6, 2.0));
        assert!(result.update(1, 1, 0.5));
        assert!(!result.update(9, 9, f64::NAN));

        assert!(result.is_found());
        assert_eq!((result.x, result.y, result.delta), (1, 1, 0.5));
    }
}
