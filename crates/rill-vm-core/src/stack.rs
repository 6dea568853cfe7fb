//! LIFO stack used to track open loops

/// Last-in-first-out stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack<T> {
    items: Vec<T>,
}

/// Stack of loop start positions
pub type LoopStack = Stack<usize>;

impl<T> Stack<T> {
    /// Create an empty stack
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a stack from values listed top first: `values[0]` is popped first
    pub fn from_top(values: impl IntoIterator<Item = T>) -> Self {
        let mut items: Vec<T> = values.into_iter().collect();
        items.reverse();
        Self { items }
    }

    /// Put a value on top
    #[inline]
    pub fn push(&mut self, value: T) {
        self.items.push(value);
    }

    /// Remove and return the top value
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Top value, kept on the stack
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    /// Number of values
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the stack has no values
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove every value
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Values from top to bottom
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter().rev()
    }

    /// Compare two stacks element by element with `cmp`
    pub fn equals_by<U>(&self, other: &Stack<U>, mut cmp: impl FnMut(&T, &U) -> bool) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| cmp(a, b))
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_order() {
        let mut stack = LoopStack::new();
        stack.push(1);
        stack.push(2);
        stack.push(3);
        assert_eq!(stack.len(), 3);
        assert_eq!(stack.pop(), Some(3));
        assert_eq!(stack.pop(), Some(2));
        assert_eq!(stack.pop(), Some(1));
        assert_eq!(stack.pop(), None);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_peek_keeps_value() {
        let mut stack = LoopStack::new();
        assert_eq!(stack.peek(), None);
        stack.push(10);
        assert_eq!(stack.peek(), Some(&10));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_from_top() {
        let mut stack = Stack::from_top([1, 2, 3]);
        assert_eq!(stack.peek(), Some(&1));
        assert_eq!(stack.pop(), Some(1));
        assert_eq!(stack.pop(), Some(2));
        assert_eq!(stack.pop(), Some(3));
    }

    #[test]
    fn test_equality() {
        let mut built = LoopStack::new();
        built.push(3);
        built.push(2);
        built.push(1);
        assert_eq!(built, Stack::from_top([1, 2, 3]));
        assert_ne!(built, Stack::from_top([1, 2]));
        assert_ne!(built, Stack::from_top([3, 2, 1]));
    }

    #[test]
    fn test_equals_by() {
        let positions = Stack::from_top([4usize, 0]);
        let labels = Stack::from_top(["4", "0"]);
        assert!(positions.equals_by(&labels, |p, l| p.to_string() == *l));
        assert!(!positions.equals_by(&Stack::from_top(["4"]), |p, l| p.to_string() == *l));
        assert!(LoopStack::new().equals_by(&Stack::<()>::new(), |_, _| false));
    }
}
