//! Utility types.

use std::{collections::VecDeque, fmt, hash::Hash};

type BuildHasher = std::hash::BuildHasherDefault<rustc_hash::FxHasher>;

pub type Map<K, V> = indexmap::IndexMap<K, V, BuildHasher>;
pub type Set<T> = indexmap::IndexSet<T, BuildHasher>;

/// A FIFO queue that ignores values already waiting in it.
#[derive(Debug)]
pub struct Queue<T> {
    queue: VecDeque<T>,
    pending: Set<T>,
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            pending: Set::default(),
        }
    }
}

impl<T> Queue<T>
where
    T: Clone + Eq + Hash,
{
    /// Enqueue a value, returning `false` if it is already pending.
    pub fn push(&mut self, value: T) -> bool {
        let added = self.pending.insert(value.clone());
        if added {
            self.queue.push_back(value);
        }
        added
    }

    pub fn pop(&mut self) -> Option<T> {
        let value = self.queue.pop_front()?;
        self.pending.swap_remove(&value);
        Some(value)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

pub fn display_fn<F>(f: F) -> impl fmt::Display
where
    F: Fn(&mut fmt::Formatter<'_>) -> fmt::Result,
{
    struct DisplayFn<F>(F);
    impl<F> fmt::Display for DisplayFn<F>
    where
        F: Fn(&mut fmt::Formatter<'_>) -> fmt::Result,
    {
        fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            (self.0)(formatter)
        }
    }
    DisplayFn(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_skips_pending_values() {
        let mut queue = Queue::default();
        assert!(queue.push(1));
        assert!(queue.push(2));
        assert!(!queue.push(1));
        assert_eq!(queue.pop(), Some(1));
        // once popped, the value may be queued again.
        assert!(queue.push(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn display_fn_forwards_formatter() {
        let shown = display_fn(|f| write!(f, "I{}", 3)).to_string();
        assert_eq!(shown, "I3");
    }
}
