// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Reporting of ambiguous field references.
//!
//! When a partial or simple name matches more than one field, resolution picks
//! the first one in schema order and tells the schema's [`AmbiguityPolicy`].
//! The notice is informational: it never changes the result of a lookup.

use crate::schema::MatchTier;
use crate::*;
use alloc::sync::Arc;
use serde::{Deserialize, Serialize};

/// Details of a lookup that had several equally good candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousMatch {
    /// Textual form of the lookup key.
    pub key: StdString,
    /// The tier that produced the candidates.
    pub tier: MatchTier,
    /// Position of the field that was returned.
    pub chosen: usize,
    /// Positions of every candidate, in schema order. Includes `chosen`.
    pub candidates: Vec<usize>,
}

/// Strategy invoked for every ambiguous match.
pub trait AmbiguityPolicy: fmt::Debug + Send + Sync {
    fn on_ambiguous(&self, event: &AmbiguousMatch);
}

/// Logs a warning through `tracing`. This is the default policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct WarnOnAmbiguity;

impl AmbiguityPolicy for WarnOnAmbiguity {
    fn on_ambiguous(&self, event: &AmbiguousMatch) {
        tracing::warn!(
            key = %event.key,
            tier = %event.tier,
            chosen = event.chosen,
            candidates = ?event.candidates,
            "ambiguous field reference resolved to the first match"
        );
    }
}

/// Discards ambiguity notices.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreAmbiguity;

impl AmbiguityPolicy for IgnoreAmbiguity {
    fn on_ambiguous(&self, _event: &AmbiguousMatch) {}
}

/// Collects ambiguity notices for later inspection.
///
/// Clones share the same event list, so a caller can keep one handle and give
/// another to a schema builder.
#[derive(Debug, Clone, Default)]
pub struct RecordAmbiguity {
    // Always `Arc`, not the crate's `Rc` alias: policies are `Send + Sync`
    // even without the `arc` feature.
    events: Arc<spin::Mutex<Vec<AmbiguousMatch>>>,
}

impl RecordAmbiguity {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the events recorded so far.
    pub fn events(&self) -> Vec<AmbiguousMatch> {
        self.events.lock().clone()
    }

    /// Removes and returns the events recorded so far.
    pub fn take(&self) -> Vec<AmbiguousMatch> {
        core::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl AmbiguityPolicy for RecordAmbiguity {
    fn on_ambiguous(&self, event: &AmbiguousMatch) {
        self.events.lock().push(event.clone());
    }
}

/// Policy selection available to schema definitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AmbiguityMode {
    #[default]
    Warn,
    Ignore,
}

impl AmbiguityMode {
    pub(crate) fn policy(self) -> Rc<dyn AmbiguityPolicy> {
        match self {
            AmbiguityMode::Warn => Rc::new(WarnOnAmbiguity),
            AmbiguityMode::Ignore => Rc::new(IgnoreAmbiguity),
        }
    }
}
