//! Depth-first, memoizing resolution over the locked tables.
//!
//! The walk keeps its pending factories on an explicit stack of frames, so
//! a long dependency chain costs heap, not thread stack.

use std::time::Instant;

use crate::error::{DiError, DiResult};
use crate::internal::ResolutionPath;
use crate::key::Key;
use crate::observer::Observers;
use crate::registration::{AnyArc, FactoryTable, InstanceTable, Registration};

/// One top-level resolution, holding the tables for its whole duration.
pub(crate) struct Resolution<'a> {
    factories: &'a FactoryTable,
    instances: &'a mut InstanceTable,
    observers: &'a Observers,
    path: ResolutionPath,
}

/// A factory waiting for its dependencies.
struct Frame<'a> {
    key: Key,
    registration: &'a Registration,
    deps: Vec<AnyArc>,
    started: Option<Instant>,
}

impl Frame<'_> {
    /// The next dependency still to be resolved, in declared order.
    fn pending(&self) -> Option<Key> {
        self.registration.dependencies.get(self.deps.len()).copied()
    }
}

impl<'a> Resolution<'a> {
    pub(crate) fn new(
        factories: &'a FactoryTable,
        instances: &'a mut InstanceTable,
        observers: &'a Observers,
        max_depth: usize,
    ) -> Self {
        Self {
            factories,
            instances,
            observers,
            path: ResolutionPath::new(max_depth),
        }
    }

    /// Resolves every key in order, stopping at the first failure.
    pub(crate) fn resolve_all(&mut self, keys: &[Key]) -> DiResult<Vec<AnyArc>> {
        keys.iter().map(|key| self.resolve(*key)).collect()
    }

    pub(crate) fn resolve(&mut self, key: Key) -> DiResult<AnyArc> {
        if let Some(instance) = self.instances.get(&key) {
            return Ok(instance.clone());
        }

        let mut stack = vec![self.begin(key)?];
        while let Some(mut frame) = stack.pop() {
            if let Some(dependency) = frame.pending() {
                if let Some(instance) = self.instances.get(&dependency) {
                    frame.deps.push(instance.clone());
                    stack.push(frame);
                    continue;
                }
                stack.push(frame);
                match self.begin(dependency) {
                    Ok(child) => stack.push(child),
                    Err(error) => return Err(self.unwind(stack, error)),
                }
                continue;
            }

            let instance = match self.finish(frame) {
                Ok(instance) => instance,
                Err(error) => return Err(self.unwind(stack, error)),
            };
            match stack.last_mut() {
                Some(parent) => parent.deps.push(instance),
                None => return Ok(instance),
            }
        }
        unreachable!("the root frame returns before the stack empties")
    }

    /// Looks up the factory for `key` and puts it on the resolution path.
    fn begin(&mut self, key: Key) -> DiResult<Frame<'a>> {
        let factories = self.factories;
        let registration = factories
            .get(&key)
            .ok_or(DiError::NotRegistered(key.display_name()))?;

        self.path.enter(key)?;

        let started = self.observers.has_observers().then(|| {
            self.observers.resolving(&key);
            Instant::now()
        });

        Ok(Frame {
            key,
            registration,
            deps: Vec::with_capacity(registration.dependencies.len()),
            started,
        })
    }

    /// Runs the factory of a frame whose dependencies are all resolved.
    fn finish(&mut self, frame: Frame<'a>) -> DiResult<AnyArc> {
        self.path.leave(frame.key);

        match (frame.registration.ctor)(frame.deps) {
            Ok(instance) => {
                self.instances.insert(frame.key, instance.clone());
                if let Some(started) = frame.started {
                    self.observers.resolved(&frame.key, started.elapsed());
                }
                Ok(instance)
            }
            Err(error) => {
                if frame.started.is_some() {
                    self.observers.failed(&frame.key, &error);
                }
                Err(error)
            }
        }
    }

    /// Pops every frame still waiting on the failed dependency, innermost first.
    fn unwind(&mut self, stack: Vec<Frame<'a>>, error: DiError) -> DiError {
        for frame in stack.into_iter().rev() {
            self.path.leave(frame.key);
            if frame.started.is_some() {
                self.observers.failed(&frame.key, &error);
            }
        }
        error
    }
}
