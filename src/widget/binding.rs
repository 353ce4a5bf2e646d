//! Key binding table.
//!
//! Maps `(WidgetType, Key)` to a handler. Handlers that need application
//! state are bound with a context: the table keeps only a `Weak` to it and
//! hands it back, mutably borrowed, on every call. Once the context is
//! dropped the binding behaves as unbound.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::input::Key;
use crate::types::WidgetType;

/// A bound key handler. Returns None when it could not run (its context is
/// gone or busy); otherwise whether activation should stop.
pub type Handler<W> = Rc<dyn Fn(&mut W, Key) -> Option<bool>>;

/// A pre- or post-process hook.
pub type Hook<W> = Rc<dyn Fn(&mut W, Key) -> bool>;

// =============================================================================
// BindingTable
// =============================================================================

pub struct BindingTable<W: ?Sized> {
    entries: HashMap<(WidgetType, Key), Handler<W>>,
    pre_process: Option<Hook<W>>,
    post_process: Option<Hook<W>>,
}

impl<W: ?Sized + 'static> BindingTable<W> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            pre_process: None,
            post_process: None,
        }
    }

    /// Bind `key` to a handler that receives `context` on every call.
    ///
    /// The handler returns true to stop activation. Rebinding a key replaces
    /// the previous handler.
    pub fn bind<C: 'static>(
        &mut self,
        kind: WidgetType,
        key: Key,
        context: &Rc<RefCell<C>>,
        handler: impl Fn(&mut W, &mut C, Key) -> bool + 'static,
    ) {
        let context = Rc::downgrade(context);
        let entry: Handler<W> = Rc::new(move |widget: &mut W, key: Key| {
            let Some(context) = context.upgrade() else {
                debug!(%kind, %key, "binding context dropped");
                return None;
            };
            let Ok(mut guard) = context.try_borrow_mut() else {
                warn!(%kind, %key, "binding context busy, key treated as unbound");
                return None;
            };
            Some(handler(widget, &mut *guard, key))
        });
        self.entries.insert((kind, key), entry);
    }

    /// Bind `key` to a handler without a context.
    pub fn bind_fn(
        &mut self,
        kind: WidgetType,
        key: Key,
        handler: impl Fn(&mut W, Key) -> bool + 'static,
    ) {
        let entry: Handler<W> = Rc::new(move |widget: &mut W, key: Key| Some(handler(widget, key)));
        self.entries.insert((kind, key), entry);
    }

    /// Returns false if nothing was bound.
    pub fn unbind(&mut self, kind: WidgetType, key: Key) -> bool {
        self.entries.remove(&(kind, key)).is_some()
    }

    /// Remove every binding. Hooks are kept.
    pub fn clean(&mut self) {
        self.entries.clear();
    }

    /// Remove every binding and both hooks.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.pre_process = None;
        self.post_process = None;
    }

    pub fn is_bound(&self, kind: WidgetType, key: Key) -> bool {
        self.entries.contains_key(&(kind, key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The handler for a key, cloned out so the table is free while it runs.
    pub fn handler(&self, kind: WidgetType, key: Key) -> Option<Handler<W>> {
        self.entries.get(&(kind, key)).cloned()
    }

    // =========================================================================
    // Hooks
    // =========================================================================

    /// Run before every key; returning false swallows the key.
    pub fn set_pre_process(&mut self, hook: impl Fn(&mut W, Key) -> bool + 'static) {
        let hook: Hook<W> = Rc::new(hook);
        self.pre_process = Some(hook);
    }

    /// Run after every key that did not end activation.
    pub fn set_post_process(&mut self, hook: impl Fn(&mut W, Key) -> bool + 'static) {
        let hook: Hook<W> = Rc::new(hook);
        self.post_process = Some(hook);
    }

    pub fn pre_process(&self) -> Option<Hook<W>> {
        self.pre_process.clone()
    }

    pub fn post_process(&self) -> Option<Hook<W>> {
        self.post_process.clone()
    }
}

impl<W: ?Sized + 'static> Default for BindingTable<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: ?Sized> fmt::Debug for BindingTable<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingTable")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .field("pre_process", &self.pre_process.is_some())
            .field("post_process", &self.post_process.is_some())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
