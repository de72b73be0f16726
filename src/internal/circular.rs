//! Circular dependency detection infrastructure.

use crate::error::{DiError, DiResult};
use crate::key::Key;

/// Default bound on nested resolution depth.
pub(crate) const MAX_DEPTH: usize = 1024;

/// In-progress resolution path of a single top-level call.
///
/// The whole chain runs under the registry lock, so the path lives on the
/// caller's stack rather than in thread-local storage.
pub(crate) struct ResolutionPath {
    stack: Vec<Key>,
    max_depth: usize,
}

impl ResolutionPath {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            stack: Vec::new(),
            max_depth,
        }
    }

    /// Pushes `key`, failing if it is already being resolved or the path is too deep.
    pub(crate) fn enter(&mut self, key: Key) -> DiResult<()> {
        // Circular detection BEFORE pushing the new key
        if self.stack.contains(&key) {
            let mut path: Vec<&'static str> = self.stack.iter().map(Key::display_name).collect();
            path.push(key.display_name());
            return Err(DiError::Circular(path));
        }

        if self.stack.len() >= self.max_depth {
            return Err(DiError::DepthExceeded(self.stack.len()));
        }

        self.stack.push(key);
        Ok(())
    }

    pub(crate) fn leave(&mut self, key: Key) {
        let last = self.stack.pop();
        debug_assert_eq!(last, Some(key));
    }

    #[cfg(test)]
    fn depth(&self) -> usize {
        self.stack.len()
    }
}
