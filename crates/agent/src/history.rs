//! Bounded conversation history
//!
//! A capacity-bounded FIFO of turns, owned by one session and injected
//! into its orchestrator. Appending beyond capacity evicts from the
//! front, so the generator always sees the most recent turns only.

use std::collections::VecDeque;

use parking_lot::Mutex;

use loan_advisor_core::Turn;

/// Default number of turns retained as generation context
pub const DEFAULT_CAPACITY: usize = 10;

/// Bounded, ordered store of conversation turns
///
/// Insertion order is chronological order. `append` and `snapshot`
/// serialize on an internal mutex so concurrent turns cannot interleave
/// context. There is no removal other than capacity eviction and no
/// reordering.
pub struct ConversationBuffer {
    capacity: usize,
    turns: Mutex<VecDeque<Turn>>,
}

impl ConversationBuffer {
    /// Create a buffer holding at most `capacity` turns
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            turns: Mutex::new(VecDeque::new()),
        }
    }

    /// Append a turn, evicting from the front while over capacity
    pub fn append(&self, turn: Turn) {
        let mut turns = self.turns.lock();
        turns.push_back(turn);
        while turns.len() > self.capacity {
            turns.pop_front();
        }
    }

    /// Immutable ordered view of the current turns, oldest first
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.lock().iter().cloned().collect()
    }

    /// Render the history as generation context
    ///
    /// Alternating `User: ...` / `AI: ...` lines, oldest first,
    /// newline-joined.
    pub fn render_context(&self) -> String {
        self.turns
            .lock()
            .iter()
            .map(|t| t.context_line())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.turns.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all turns (session reset)
    pub fn clear(&self) {
        self.turns.lock().clear();
    }
}

impl Default for ConversationBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_snapshot_order() {
        let buffer = ConversationBuffer::new(4);
        buffer.append(Turn::user("one"));
        buffer.append(Turn::assistant("two"));
        buffer.append(Turn::user("three"));

        let snapshot = buffer.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].raw_text, "one");
        assert_eq!(snapshot[2].raw_text, "three");
    }

    #[test]
    fn test_capacity_is_never_exceeded() {
        let buffer = ConversationBuffer::new(10);
        for i in 0..25 {
            buffer.append(Turn::user(format!("turn {}", i)));
            assert!(buffer.len() <= 10);
        }
    }

    #[test]
    fn test_eleven_appends_evict_the_first() {
        let buffer = ConversationBuffer::new(10);
        for i in 1..=11 {
            buffer.append(Turn::user(format!("turn {}", i)));
        }

        assert_eq!(buffer.len(), 10);
        let snapshot = buffer.snapshot();
        assert_eq!(snapshot[0].raw_text, "turn 2");
        assert_eq!(snapshot[9].raw_text, "turn 11");
    }

    #[test]
    fn test_render_context_format() {
        let buffer = ConversationBuffer::new(10);
        buffer.append(Turn::user("what is a loan"));
        buffer.append(Turn::assistant("a loan is borrowed money"));

        assert_eq!(
            buffer.render_context(),
            "User: what is a loan\nAI: a loan is borrowed money"
        );
    }

    #[test]
    fn test_clear() {
        let buffer = ConversationBuffer::new(10);
        buffer.append(Turn::user("hello"));
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.render_context(), "");
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let buffer = ConversationBuffer::new(0);
        buffer.append(Turn::user("kept"));
        assert_eq!(buffer.len(), 1);
    }
}
