//! Screen registry - which widgets live on a screen, in registration order.
//!
//! Non-owning: widgets belong to the application, the registry only holds
//! their [`WidgetHandle`]s. Entries are grouped by [`WidgetType`]; a global
//! sequence number keeps cross-type order for composition and teardown.

use std::collections::HashMap;

use crate::types::{SurfaceId, WidgetId, WidgetType};

/// A registered widget's identity and surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetHandle {
    pub id: WidgetId,
    pub kind: WidgetType,
    pub primary: SurfaceId,
    pub shadow: Option<SurfaceId>,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    seq: u64,
    handle: WidgetHandle,
}

// =============================================================================
// Registry
// =============================================================================

#[derive(Debug, Default)]
pub struct ScreenRegistry {
    by_type: HashMap<WidgetType, Vec<Entry>>,
    next_seq: u64,
}

impl ScreenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a widget after everything registered so far.
    pub fn register(&mut self, handle: WidgetHandle) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.by_type
            .entry(handle.kind)
            .or_default()
            .push(Entry { seq, handle });
    }

    /// Remove a widget. Returns false if it was not registered.
    pub fn unregister(&mut self, kind: WidgetType, id: WidgetId) -> bool {
        let Some(entries) = self.by_type.get_mut(&kind) else {
            return false;
        };
        let Some(pos) = entries.iter().position(|entry| entry.handle.id == id) else {
            return false;
        };
        // Vec::remove keeps the remaining order
        entries.remove(pos);
        if entries.is_empty() {
            self.by_type.remove(&kind);
        }
        true
    }

    /// Whether a widget is currently registered.
    pub fn contains(&self, kind: WidgetType, id: WidgetId) -> bool {
        self.by_type
            .get(&kind)
            .is_some_and(|entries| entries.iter().any(|entry| entry.handle.id == id))
    }

    /// Visit the widgets of one type in registration order.
    pub fn for_each(&self, kind: WidgetType, mut f: impl FnMut(&WidgetHandle)) {
        if let Some(entries) = self.by_type.get(&kind) {
            for entry in entries {
                f(&entry.handle);
            }
        }
    }

    /// Handles of one type in registration order.
    pub fn handles_of(&self, kind: WidgetType) -> Vec<WidgetHandle> {
        self.by_type
            .get(&kind)
            .map(|entries| entries.iter().map(|entry| entry.handle).collect())
            .unwrap_or_default()
    }

    /// Every handle, all types, in registration order.
    pub fn handles(&self) -> Vec<WidgetHandle> {
        let mut entries: Vec<Entry> = self.by_type.values().flatten().copied().collect();
        entries.sort_by_key(|entry| entry.seq);
        entries.into_iter().map(|entry| entry.handle).collect()
    }

    pub fn len(&self) -> usize {
        self.by_type.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.by_type.clear();
    }
}

// =============================================================================
// Tests
// =============================================================================
