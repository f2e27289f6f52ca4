//! Discovery queue
//!
//! Ordered list of candidate profiles with a cursor pointing at the one
//! being presented.

use devmatch_core::{User, UserId};

/// Candidate queue for the discovery feed
///
/// Structure:
/// ```text
///   - Alice
///   - Bob      <- cursor (presented)
///   - Carol    <- peek_next
/// ```
///
/// Invariant: `cursor <= len`, and `cursor < len` whenever the queue is
/// non-empty.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryQueue {
    candidates: Vec<User>,
    cursor: usize,
}

impl DiscoveryQueue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with a fresh feed page.
    ///
    /// If the presented candidate is still in the page the cursor follows
    /// it, otherwise the cursor resets to the front.
    pub fn replace(&mut self, candidates: Vec<User>) {
        let presented = self.current().map(|user| user.id.clone());
        self.candidates = candidates;
        self.cursor = presented
            .and_then(|id| self.position(&id))
            .unwrap_or(0);
    }

    /// Remove a candidate by id.
    ///
    /// Returns the removed candidate if it was queued
    pub fn remove(&mut self, id: &UserId) -> Option<User> {
        let index = self.position(id)?;
        let removed = self.candidates.remove(index);

        if index < self.cursor {
            self.cursor -= 1;
        }
        if self.cursor >= self.candidates.len() {
            self.cursor = 0;
        }

        Some(removed)
    }

    /// Put a candidate back under the cursor.
    ///
    /// A candidate still queued just gets the cursor; one dropped by a
    /// newer feed page is reinserted at the cursor position.
    pub fn restore(&mut self, candidate: User) {
        match self.position(&candidate.id) {
            Some(index) => self.cursor = index,
            None => {
                let index = self.cursor.min(self.candidates.len());
                self.candidates.insert(index, candidate);
                self.cursor = index;
            }
        }
    }

    /// Candidate currently presented
    pub fn current(&self) -> Option<&User> {
        self.candidates.get(self.cursor)
    }

    /// Candidate after the presented one (doesn't wrap)
    pub fn peek_next(&self) -> Option<&User> {
        self.candidates.get(self.cursor + 1)
    }

    pub fn contains(&self, id: &UserId) -> bool {
        self.position(id).is_some()
    }

    /// All queued candidates in order
    pub fn get_all(&self) -> &[User] {
        &self.candidates
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn clear(&mut self) {
        self.candidates.clear();
        self.cursor = 0;
    }

    fn position(&self, id: &UserId) -> Option<usize> {
        self.candidates.iter().position(|user| &user.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str) -> User {
        User::new(UserId::new(id), id, "Tester")
    }

    fn queue_of(ids: &[&str]) -> DiscoveryQueue {
        let mut queue = DiscoveryQueue::new();
        queue.replace(ids.iter().map(|id| candidate(id)).collect());
        queue
    }

    fn ids(queue: &DiscoveryQueue) -> Vec<&str> {
        queue.get_all().iter().map(|u| u.id.as_str()).collect()
    }

    #[test]
    fn create_empty_queue() {
        let queue = DiscoveryQueue::new();
        assert!(queue.is_empty());
        assert!(queue.current().is_none());
        assert_eq!(queue.cursor(), 0);
    }

    #[test]
    fn replace_presents_front() {
        let queue = queue_of(&["a", "b", "c"]);
        assert_eq!(queue.current().unwrap().id.as_str(), "a");
        assert_eq!(queue.peek_next().unwrap().id.as_str(), "b");
    }

    #[test]
    fn remove_presented_advances() {
        let mut queue = queue_of(&["a", "b"]);

        let removed = queue.remove(&UserId::new("a")).unwrap();

        assert_eq!(removed.id.as_str(), "a");
        assert_eq!(ids(&queue), vec!["b"]);
        assert_eq!(queue.current().unwrap().id.as_str(), "b");
    }

    #[test]
    fn replace_without_presented_resets_cursor() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.replace(vec![candidate("x"), candidate("b"), candidate("c")]);
        assert_eq!(queue.current().unwrap().id.as_str(), "x");
    }

    #[test]
    fn remove_before_cursor_keeps_presented() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.remove(&UserId::new("a"));
        queue.replace(vec![candidate("z"), candidate("b"), candidate("c")]);
        assert_eq!(queue.cursor(), 1);

        queue.remove(&UserId::new("z"));
        assert_eq!(queue.current().unwrap().id.as_str(), "b");
        assert_eq!(queue.cursor(), 0);
    }

    #[test]
    fn remove_last_wraps_cursor() {
        let mut queue = queue_of(&["a", "b"]);
        queue.remove(&UserId::new("a"));
        queue.replace(vec![candidate("c"), candidate("b")]);
        assert_eq!(queue.cursor(), 1);

        queue.remove(&UserId::new("b"));
        assert_eq!(queue.cursor(), 0);
        assert_eq!(queue.current().unwrap().id.as_str(), "c");
    }

    #[test]
    fn remove_unknown_is_noop() {
        let mut queue = queue_of(&["a"]);
        assert!(queue.remove(&UserId::new("zz")).is_none());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn replace_follows_presented_candidate() {
        let mut queue = queue_of(&["a", "b"]);
        queue.replace(vec![candidate("x"), candidate("y"), candidate("a")]);
        assert_eq!(queue.current().unwrap().id.as_str(), "a");
        assert!(queue.peek_next().is_none());
    }

    #[test]
    fn remove_everything_leaves_empty() {
        let mut queue = queue_of(&["a"]);
        queue.remove(&UserId::new("a"));
        assert!(queue.is_empty());
        assert!(queue.current().is_none());
        assert_eq!(queue.cursor(), 0);
    }

    #[test]
    fn clear_queue() {
        let mut queue = queue_of(&["a", "b"]);
        queue.clear();
        assert!(queue.is_empty());
        assert!(!queue.contains(&UserId::new("a")));
    }

    #[test]
    fn restore_moves_cursor_to_queued_candidate() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.remove(&UserId::new("a"));

        queue.restore(candidate("c"));

        assert_eq!(ids(&queue), vec!["b", "c"]);
        assert_eq!(queue.current().unwrap().id.as_str(), "c");
    }

    #[test]
    fn restore_reinserts_dropped_candidate_at_cursor() {
        let mut queue = queue_of(&["b", "c"]);

        queue.restore(candidate("a"));

        assert_eq!(ids(&queue), vec!["a", "b", "c"]);
        assert_eq!(queue.cursor(), 0);
        assert_eq!(queue.current().unwrap().id.as_str(), "a");
        assert_eq!(queue.peek_next().unwrap().id.as_str(), "b");
    }

    #[test]
    fn restore_into_empty_queue() {
        let mut queue = DiscoveryQueue::new();

        queue.restore(candidate("a"));

        assert_eq!(ids(&queue), vec!["a"]);
        assert_eq!(queue.current().unwrap().id.as_str(), "a");
    }
}
