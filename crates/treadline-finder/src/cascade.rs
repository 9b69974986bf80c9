//! Generic linear cascade: an N-stage chooser where stage `k` may only be
//! filled once every stage before it is filled.
//!
//! Stages are numbered `1..=N`. Selecting a value for stage `k` clears every
//! stage after `k` and auto-advances to `k + 1`. On the last stage it marks the
//! flow complete instead. Any rejected transition leaves the state untouched.

use crate::error::FinderError;

/// Identity used for "already selected" checks.
///
/// Plain string choices compare by value. Reference objects compare by `_id`.
pub trait StageKey {
    fn stage_key(&self) -> &str;
}

impl StageKey for String {
    fn stage_key(&self) -> &str {
        self
    }
}

/// Outcome of a successful [`Cascade::select`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The flow moved on to the given stage.
    Advanced { to: usize },
    /// The terminal stage was filled; the flow is complete.
    Completed,
}

#[derive(Debug, Clone)]
pub struct Cascade<V> {
    labels: &'static [&'static str],
    values: Vec<Option<V>>,
    current: usize,
    complete: bool,
}

impl<V: StageKey + Clone> Cascade<V> {
    /// Creates a cascade in its initial state: stage 1, nothing chosen.
    ///
    /// `labels` names each stage for user-facing notices; its length is the
    /// number of stages.
    #[must_use]
    pub fn new(labels: &'static [&'static str]) -> Self {
        Self {
            labels,
            values: vec![None; labels.len()],
            current: 1,
            complete: false,
        }
    }

    #[must_use]
    pub fn stages(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn current_stage(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// The value chosen for `stage`, if any. Out-of-range stages read as `None`.
    #[must_use]
    pub fn value(&self, stage: usize) -> Option<&V> {
        stage
            .checked_sub(1)
            .and_then(|i| self.values.get(i))
            .and_then(Option::as_ref)
    }

    #[must_use]
    pub fn label(&self, stage: usize) -> Option<&'static str> {
        stage.checked_sub(1).and_then(|i| self.labels.get(i)).copied()
    }

    /// Whether `key` is the value currently chosen for `stage`.
    #[must_use]
    pub fn is_selected(&self, stage: usize, key: &str) -> bool {
        self.value(stage).is_some_and(|v| v.stage_key() == key)
    }

    /// Whether every stage before `stage` has a value.
    #[must_use]
    pub fn is_reachable(&self, stage: usize) -> bool {
        self.ensure_reachable(stage).is_ok()
    }

    /// Stage-indicator navigation. Rejected when any earlier stage is empty.
    ///
    /// # Errors
    ///
    /// [`FinderError::NoSuchStage`] for a stage outside `1..=N`,
    /// [`FinderError::StageLocked`] when an earlier stage is still empty.
    pub fn go_to(&mut self, stage: usize) -> Result<(), FinderError> {
        self.ensure_reachable(stage)?;
        self.current = stage;
        self.complete = false;
        Ok(())
    }

    /// Chooses `value` for `stage`.
    ///
    /// A different value clears every later stage. Re-choosing the value
    /// already held keeps them.
    ///
    /// # Errors
    ///
    /// Same as [`Cascade::go_to`], plus [`FinderError::EmptyValue`] for a
    /// blank value. The state is unchanged on error.
    pub fn select(&mut self, stage: usize, value: V) -> Result<Transition, FinderError> {
        self.ensure_reachable(stage)?;
        if value.stage_key().trim().is_empty() {
            return Err(FinderError::EmptyValue {
                stage_name: self.labels[stage - 1],
            });
        }

        let unchanged = self.is_selected(stage, value.stage_key());
        self.values[stage - 1] = Some(value);
        if !unchanged {
            for later in &mut self.values[stage..] {
                *later = None;
            }
        }

        if stage == self.stages() {
            self.current = stage;
            self.complete = true;
            Ok(Transition::Completed)
        } else {
            self.current = stage + 1;
            self.complete = false;
            Ok(Transition::Advanced { to: stage + 1 })
        }
    }

    /// Returns to the initial state.
    pub fn reset(&mut self) {
        self.values.iter_mut().for_each(|v| *v = None);
        self.current = 1;
        self.complete = false;
    }

    /// Hands the completed tuple to the caller.
    ///
    /// # Errors
    ///
    /// [`FinderError::Incomplete`] unless the terminal stage has been chosen.
    pub fn proceed(&self) -> Result<Vec<V>, FinderError> {
        if !self.complete {
            let missing = self
                .values
                .iter()
                .position(Option::is_none)
                .map_or(self.labels[self.stages() - 1], |i| self.labels[i]);
            return Err(FinderError::Incomplete { missing });
        }
        Ok(self.values.iter().flatten().cloned().collect())
    }

    /// # Errors
    ///
    /// [`FinderError::NoSuchStage`] or [`FinderError::StageLocked`], as for
    /// [`Cascade::go_to`].
    pub fn ensure_reachable(&self, stage: usize) -> Result<(), FinderError> {
        if stage == 0 || stage > self.stages() {
            return Err(FinderError::NoSuchStage {
                stage,
                stages: self.stages(),
            });
        }
        if let Some(missing) = self.values[..stage - 1].iter().position(Option::is_none) {
            return Err(FinderError::StageLocked {
                stage,
                stage_name: self.labels[stage - 1],
                missing: self.labels[missing],
            });
        }
        Ok(())
    }
}
