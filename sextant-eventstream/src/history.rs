use serde::{Deserialize, Serialize};

/// Browser-style history of view snapshots: push, back, forward and home, but no pop.
///
/// Pushing while positioned before the newest entry discards every later entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewHistoryStack<T> {
    elements: Vec<T>,
    position: Option<usize>,
}

impl<T> Default for ViewHistoryStack<T> {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
            position: None,
        }
    }
}

impl<T: Clone + PartialEq> ViewHistoryStack<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry at the current position, `None` when empty
    pub fn current(&self) -> Option<&T> {
        self.position.and_then(|pos| self.elements.get(pos))
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn forward(&mut self) -> Option<&T> {
        if let Some(pos) = self.position {
            if pos + 1 < self.elements.len() {
                self.position = Some(pos + 1);
            }
        }
        self.current()
    }

    pub fn back(&mut self) -> Option<&T> {
        if let Some(pos) = self.position {
            self.position = Some(pos.saturating_sub(1));
        }
        self.current()
    }

    pub fn push(&mut self, entry: T) -> Option<&T> {
        let keep = self.position.map_or(0, |pos| pos + 1);
        self.elements.truncate(keep);
        self.elements.push(entry);
        self.position = Some(self.elements.len() - 1);
        self.current()
    }

    /// Makes the first entry current again by pushing a copy of it.
    ///
    /// No push happens when the current entry already equals the first one.
    pub fn home(&mut self) -> Option<&T> {
        let first = self.elements.first()?.clone();
        if self.current() != Some(&first) {
            self.push(first);
        }
        self.current()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.position = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_of(n: i32) -> ViewHistoryStack<i32> {
        let mut stack = ViewHistoryStack::new();
        for i in 0..n {
            stack.push(i);
        }
        stack
    }

    #[test]
    fn test_empty_stack() {
        let mut stack: ViewHistoryStack<i32> = ViewHistoryStack::new();
        assert!(stack.is_empty());
        assert_eq!(stack.current(), None);
        assert_eq!(stack.back(), None);
        assert_eq!(stack.forward(), None);
        assert_eq!(stack.home(), None);
        assert_eq!(stack.position(), None);
    }

    #[test]
    fn test_back_and_forward_saturate() {
        let mut stack = stack_of(3);
        assert_eq!(stack.current(), Some(&2));
        assert_eq!(stack.forward(), Some(&2));
        assert_eq!(stack.back(), Some(&1));
        assert_eq!(stack.back(), Some(&0));
        assert_eq!(stack.back(), Some(&0));
        assert_eq!(stack.forward(), Some(&1));
    }

    #[test]
    fn test_push_discards_forward_entries() {
        let mut stack = stack_of(4);
        stack.back();
        stack.back();
        assert_eq!(stack.push(10), Some(&10));
        assert_eq!(stack.len(), 3);
        assert_eq!(stack.forward(), Some(&10));
        assert_eq!(stack.back(), Some(&1));
    }

    #[test]
    fn test_home_pushes_first_entry() {
        let mut stack = stack_of(3);
        assert_eq!(stack.home(), Some(&0));
        assert_eq!(stack.len(), 4);
        assert_eq!(stack.position(), Some(3));
        assert_eq!(stack.back(), Some(&2));
    }

    #[test]
    fn test_clear() {
        let mut stack = stack_of(2);
        stack.clear();
        assert!(stack.is_empty());
        assert_eq!(stack.current(), None);
        assert_eq!(stack.push(7), Some(&7));
        assert_eq!(stack.position(), Some(0));
    }
}
