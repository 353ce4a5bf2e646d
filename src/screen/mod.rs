//! Screen - the terminal, its widget surfaces, and the widget registry.
//!
//! A [`Screen`] is a cheap `Rc` handle; every widget on the screen holds a
//! clone. State lives behind a `RefCell` and no borrow outlives a single
//! method call, so handlers may freely call back into the screen.
//!
//! Widgets never touch the backend directly. They draw into their own
//! [`Surface`]s and the screen composes those, in registration order, into
//! one frame for the backend.

pub mod registry;
pub mod surface;

pub use registry::{ScreenRegistry, WidgetHandle};
pub use surface::Surface;

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::backend::Backend;
use crate::config::ScreenConfig;
use crate::error::{Result, WidgetError};
use crate::input::{InputEvent, Key};
use crate::renderer::FrameBuffer;
use crate::types::{BorderStyle, Rect, SurfaceId, WidgetId, WidgetType};

// =============================================================================
// State
// =============================================================================

struct ScreenState {
    backend: Box<dyn Backend>,
    width: u16,
    height: u16,
    config: ScreenConfig,
    surfaces: HashMap<SurfaceId, Surface>,
    registry: ScreenRegistry,
    next_widget: u64,
    next_surface: u64,
}

impl ScreenState {
    fn allocate_surface(&mut self, rect: Rect) -> Result<SurfaceId> {
        if rect.is_empty() {
            return Err(WidgetError::SurfaceAllocation {
                width: rect.width,
                height: rect.height,
            });
        }
        let id = SurfaceId(self.next_surface);
        self.next_surface += 1;
        self.surfaces.insert(id, Surface::new(id, rect));
        Ok(id)
    }

    fn release(&mut self, handle: &WidgetHandle) {
        self.surfaces.remove(&handle.primary);
        if let Some(shadow) = handle.shadow {
            self.surfaces.remove(&shadow);
        }
    }

    fn compose(&self) -> FrameBuffer {
        let mut frame = FrameBuffer::new(self.width, self.height);
        for handle in self.registry.handles() {
            let layers = handle.shadow.into_iter().chain(Some(handle.primary));
            for id in layers {
                if let Some(surface) = self.surfaces.get(&id) {
                    surface.compose_onto(&mut frame);
                }
            }
        }
        frame
    }
}

// =============================================================================
// Screen
// =============================================================================

/// Shared handle to a terminal screen.
#[derive(Clone)]
pub struct Screen {
    inner: Rc<RefCell<ScreenState>>,
}

impl Screen {
    /// Open a screen on `backend` with the default configuration.
    pub fn new(backend: impl Backend + 'static) -> Result<Self> {
        Self::with_config(backend, ScreenConfig::default())
    }

    pub fn with_config(backend: impl Backend + 'static, config: ScreenConfig) -> Result<Self> {
        let (width, height) = backend.size()?;
        debug!(width, height, "screen opened");

        Ok(Self {
            inner: Rc::new(RefCell::new(ScreenState {
                backend: Box::new(backend),
                width,
                height,
                config,
                surfaces: HashMap::new(),
                registry: ScreenRegistry::new(),
                next_widget: 0,
                next_surface: 0,
            })),
        })
    }

    // =========================================================================
    // Geometry & configuration
    // =========================================================================

    /// (width, height) in cells.
    pub fn size(&self) -> (u16, u16) {
        let state = self.inner.borrow();
        (state.width, state.height)
    }

    pub fn width(&self) -> u16 {
        self.inner.borrow().width
    }

    pub fn height(&self) -> u16 {
        self.inner.borrow().height
    }

    pub fn config(&self) -> ScreenConfig {
        self.inner.borrow().config.clone()
    }

    pub fn escape_key(&self) -> Key {
        self.inner.borrow().config.escape_key
    }

    pub fn refresh_key(&self) -> Key {
        self.inner.borrow().config.refresh_key
    }

    pub fn border(&self) -> BorderStyle {
        self.inner.borrow().config.border
    }

    /// Record a new terminal size. Widgets keep their bounds until moved.
    pub fn set_size(&self, width: u16, height: u16) {
        let mut state = self.inner.borrow_mut();
        state.width = width;
        state.height = height;
        debug!(width, height, "screen resized");
    }

    // =========================================================================
    // Widget lifecycle
    // =========================================================================

    /// Allocate a widget's surfaces and register it.
    ///
    /// The shadow surface, when requested, sits one cell right of and below
    /// the primary. Either both surfaces exist and the widget is registered,
    /// or nothing changed.
    pub fn attach(&self, kind: WidgetType, rect: Rect, shadow: bool) -> Result<WidgetHandle> {
        let mut state = self.inner.borrow_mut();

        let primary = state.allocate_surface(rect)?;
        let shadow = if shadow {
            let shadow_rect = Rect::new(
                rect.x.saturating_add(1),
                rect.y.saturating_add(1),
                rect.width,
                rect.height,
            );
            match state.allocate_surface(shadow_rect) {
                Ok(id) => Some(id),
                Err(err) => {
                    state.surfaces.remove(&primary);
                    return Err(err);
                }
            }
        } else {
            None
        };

        let id = WidgetId(state.next_widget);
        state.next_widget += 1;

        let handle = WidgetHandle {
            id,
            kind,
            primary,
            shadow,
        };
        state.registry.register(handle);
        debug!(%kind, id = id.0, ?rect, "widget attached");
        Ok(handle)
    }

    /// Unregister a widget and release its surfaces.
    ///
    /// Returns false if it was not attached (already detached, or torn down
    /// with the screen).
    pub fn detach(&self, handle: &WidgetHandle) -> bool {
        let mut state = self.inner.borrow_mut();
        if !state.registry.unregister(handle.kind, handle.id) {
            return false;
        }
        state.release(handle);
        debug!(kind = %handle.kind, id = handle.id.0, "widget detached");
        true
    }

    pub fn is_attached(&self, handle: &WidgetHandle) -> bool {
        self.inner.borrow().registry.contains(handle.kind, handle.id)
    }

    /// Visit registered widgets of one type in registration order.
    ///
    /// The registry is not borrowed while `f` runs.
    pub fn for_each(&self, kind: WidgetType, mut f: impl FnMut(&WidgetHandle)) {
        let handles = self.inner.borrow().registry.handles_of(kind);
        for handle in &handles {
            f(handle);
        }
    }

    /// All registered widgets, registration order.
    pub fn handles(&self) -> Vec<WidgetHandle> {
        self.inner.borrow().registry.handles()
    }

    pub fn widget_count(&self) -> usize {
        self.inner.borrow().registry.len()
    }

    /// Tear down every widget, newest first.
    ///
    /// Widgets still owned by the application see their own `destroy`
    /// become a no-op.
    pub fn destroy(&self) {
        let mut state = self.inner.borrow_mut();
        let handles = state.registry.handles();
        for handle in handles.iter().rev() {
            state.release(handle);
            trace!(kind = %handle.kind, id = handle.id.0, "widget torn down");
        }
        state.registry.clear();
        debug!(count = handles.len(), "screen destroyed");
    }

    // =========================================================================
    // Surfaces
    // =========================================================================

    /// Run `f` on a surface. Returns None if the surface is gone.
    ///
    /// `f` must not call back into the screen.
    pub fn with_surface<R>(&self, id: SurfaceId, f: impl FnOnce(&mut Surface) -> R) -> Option<R> {
        let mut state = self.inner.borrow_mut();
        state.surfaces.get_mut(&id).map(f)
    }

    pub fn move_surface(&self, id: SurfaceId, x: u16, y: u16) -> bool {
        self.with_surface(id, |surface| surface.move_to(x, y)).is_some()
    }

    /// Resize a surface, clearing its content.
    pub fn resize_surface(&self, id: SurfaceId, width: u16, height: u16) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.with_surface(id, |surface| surface.resize(width, height))
            .is_some()
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// The frame `refresh` would present, without presenting it.
    pub fn snapshot(&self) -> FrameBuffer {
        self.inner.borrow().compose()
    }

    /// Compose every widget (shadow first, then primary) and present.
    pub fn refresh(&self) -> Result<()> {
        let mut guard = self.inner.borrow_mut();
        let state = &mut *guard;
        let frame = state.compose();
        state.backend.present(&frame, &state.config.palette)?;
        trace!("screen refreshed");
        Ok(())
    }

    /// Blank every registered surface and present.
    pub fn erase(&self) -> Result<()> {
        {
            let mut state = self.inner.borrow_mut();
            for surface in state.surfaces.values_mut() {
                surface.buffer_mut().clear();
            }
        }
        self.refresh()
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Block on the backend for the next event.
    pub fn read_event(&self) -> Result<Option<InputEvent>> {
        let event = self.inner.borrow_mut().backend.read_event()?;
        trace!(?event, "event read");
        Ok(event)
    }

    pub fn beep(&self) -> Result<()> {
        self.inner.borrow_mut().backend.beep()?;
        Ok(())
    }
}

impl fmt::Debug for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(state) => f
                .debug_struct("Screen")
                .field("width", &state.width)
                .field("height", &state.height)
                .field("widgets", &state.registry.len())
                .finish(),
            Err(_) => f.write_str("Screen { <busy> }"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
