//! Widget core - the contract every widget implements.
//!
//! A widget composes a [`WidgetBase`] (screen, surfaces, box, title, exit
//! state) and a [`BindingTable`], and implements [`Widget`] for its drawing
//! and default key handling. Activation, injection and binding come for
//! free from the trait's provided methods.
//!
//! # Lifecycle
//!
//! ```text
//! new() ──► attached ──► activate() ──► Normal | EscapeHit | EarlyExit
//!              │                              │
//!              └────────── destroy() ◄────────┘   (also on Drop)
//! ```

pub mod activation;
pub mod binding;

pub use binding::{BindingTable, Handler, Hook};

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::error::Result;
use crate::input::Key;
use crate::layout;
use crate::markup::{self, StyledRun};
use crate::renderer::FrameBuffer;
use crate::screen::{Screen, WidgetHandle};
use crate::types::{Attr, ExitState, Orientation, Placement, Rect, StyledCell, WidgetType};

// =============================================================================
// KeyOutcome
// =============================================================================

/// What a key did to an activation.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome<T> {
    /// Keep reading keys.
    Continue,
    /// Stop with this exit state and, for a normal finish, the widget's value.
    Exit(ExitState, Option<T>),
}

// =============================================================================
// Widget trait
// =============================================================================

/// The capability set shared by all widgets.
pub trait Widget: Sized + 'static {
    /// Value handed back by a normal finish.
    type Output;

    /// Binding key namespace and registry group.
    const TYPE: WidgetType;

    fn base(&self) -> &WidgetBase;
    fn base_mut(&mut self) -> &mut WidgetBase;
    fn bindings(&self) -> &BindingTable<Self>;
    fn bindings_mut(&mut self) -> &mut BindingTable<Self>;

    /// Paint the widget onto its surfaces. Never resizes anything.
    fn draw(&mut self, boxed: bool) -> Result<()>;

    /// Key handling for keys with no binding.
    fn handle_key(&mut self, key: Key) -> Result<KeyOutcome<Self::Output>>;

    /// Blank the widget's surfaces.
    fn erase(&mut self) {
        self.base().erase();
    }

    /// Release surfaces, drop bindings and hooks, unregister. Idempotent.
    fn destroy(&mut self) {
        self.bindings_mut().clear();
        self.base_mut().destroy();
    }

    /// Run the modal key loop.
    ///
    /// `actions` are processed before any terminal input. Returns the value
    /// of a normal finish; check [`exit_state`](Self::exit_state) for how
    /// the loop ended.
    fn activate(&mut self, actions: &[Key]) -> Result<Option<Self::Output>> {
        activation::run(self, actions)
    }

    /// Feed a single key through hooks, bindings and default handling.
    fn inject(&mut self, key: Key) -> Result<KeyOutcome<Self::Output>> {
        activation::inject(self, key)
    }

    fn exit_state(&self) -> ExitState {
        self.base().exit_state()
    }

    /// Move the widget and redraw it.
    ///
    /// Only the position reflows. Sizes are resolved once at construction,
    /// including "screen minus N" requests, and keep their value after a
    /// resize.
    fn relocate(&mut self, x: Placement, y: Placement) -> Result<()> {
        self.base_mut().relocate(x, y);
        let boxed = self.base().is_boxed();
        self.draw(boxed)
    }

    /// Attribute for the widget's blank cells, applied from the next draw.
    fn set_background(&mut self, attr: Attr) {
        self.base_mut().set_background(attr);
    }

    // =========================================================================
    // Bindings
    // =========================================================================

    fn bind<C: 'static>(
        &mut self,
        kind: WidgetType,
        key: Key,
        context: &Rc<RefCell<C>>,
        handler: impl Fn(&mut Self, &mut C, Key) -> bool + 'static,
    ) {
        self.bindings_mut().bind(kind, key, context, handler);
    }

    fn bind_fn(
        &mut self,
        kind: WidgetType,
        key: Key,
        handler: impl Fn(&mut Self, Key) -> bool + 'static,
    ) {
        self.bindings_mut().bind_fn(kind, key, handler);
    }

    fn unbind(&mut self, kind: WidgetType, key: Key) -> bool {
        self.bindings_mut().unbind(kind, key)
    }

    fn clean_bindings(&mut self) {
        self.bindings_mut().clean();
    }

    fn is_bound(&self, kind: WidgetType, key: Key) -> bool {
        self.bindings().is_bound(kind, key)
    }

    fn set_pre_process(&mut self, hook: impl Fn(&mut Self, Key) -> bool + 'static) {
        self.bindings_mut().set_pre_process(hook);
    }

    fn set_post_process(&mut self, hook: impl Fn(&mut Self, Key) -> bool + 'static) {
        self.bindings_mut().set_post_process(hook);
    }
}

// =============================================================================
// WidgetBase
// =============================================================================

/// State every widget carries: where it lives and how it is framed.
#[derive(Debug)]
pub struct WidgetBase {
    screen: Screen,
    handle: Option<WidgetHandle>,
    rect: Rect,
    boxed: bool,
    border_size: u16,
    title: Vec<StyledRun>,
    title_pos: Vec<u16>,
    background: Attr,
    exit_state: ExitState,
}

impl WidgetBase {
    pub fn new(screen: &Screen, boxed: bool) -> Self {
        Self {
            screen: screen.clone(),
            handle: None,
            rect: Rect::default(),
            boxed,
            border_size: u16::from(boxed),
            title: Vec::new(),
            title_pos: Vec::new(),
            background: Attr::NORMAL,
            exit_state: ExitState::None,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn handle(&self) -> Option<&WidgetHandle> {
        self.handle.as_ref()
    }

    /// Screen-space bounds of the primary surface.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn is_boxed(&self) -> bool {
        self.boxed
    }

    /// 1 when boxed, else 0.
    pub fn border_size(&self) -> u16 {
        self.border_size
    }

    pub fn set_box(&mut self, boxed: bool) {
        self.boxed = boxed;
        self.border_size = u16::from(boxed);
    }

    pub fn background(&self) -> Attr {
        self.background
    }

    pub fn set_background(&mut self, attr: Attr) {
        self.background = attr;
    }

    /// A blank cell in the background attribute.
    pub fn blank_cell(&self) -> StyledCell {
        StyledCell::new(' ', self.background, 0)
    }

    pub fn exit_state(&self) -> ExitState {
        self.exit_state
    }

    pub fn set_exit_state(&mut self, state: ExitState) {
        self.exit_state = state;
    }

    // =========================================================================
    // Title
    // =========================================================================

    /// Compile a (multi-line) title and justify it inside `box_width`.
    ///
    /// Returns the number of title lines; empty markup clears the title.
    pub fn set_title(&mut self, markup: &str, box_width: u16) -> u16 {
        self.title.clear();
        self.title_pos.clear();
        if markup.is_empty() {
            return 0;
        }

        let inner = box_width.saturating_sub(2 * self.border_size);
        for run in markup::compile_lines(markup, Attr::NORMAL) {
            let pos = layout::justify(inner, run.width(), run.justify()) + self.border_size;
            self.title_pos.push(pos);
            self.title.push(run);
        }
        self.title_lines()
    }

    pub fn title_lines(&self) -> u16 {
        u16::try_from(self.title.len()).unwrap_or(u16::MAX)
    }

    pub fn title(&self) -> &[StyledRun] {
        &self.title
    }

    // =========================================================================
    // Surfaces
    // =========================================================================

    /// Allocate surfaces for `rect` and register with the screen.
    pub fn attach(&mut self, kind: WidgetType, rect: Rect, shadow: bool) -> Result<()> {
        let handle = self.screen.attach(kind, rect, shadow)?;
        self.handle = Some(handle);
        self.rect = rect;
        Ok(())
    }

    pub fn is_attached(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| self.screen.is_attached(handle))
    }

    /// Run `f` on the primary surface's cells.
    pub fn with_surface<R>(&self, f: impl FnOnce(&mut FrameBuffer) -> R) -> Option<R> {
        let handle = self.handle.as_ref()?;
        self.screen
            .with_surface(handle.primary, |surface| f(surface.buffer_mut()))
    }

    fn with_shadow<R>(&self, f: impl FnOnce(&mut FrameBuffer) -> R) -> Option<R> {
        let shadow = self.handle.as_ref()?.shadow?;
        self.screen
            .with_surface(shadow, |surface| f(surface.buffer_mut()))
    }

    /// Blank the primary surface, in the background attribute.
    pub fn clear(&self) {
        let blank = self.blank_cell();
        self.with_surface(|buffer| buffer.fill(blank));
    }

    /// Blank both surfaces, leaving nothing of the widget on screen.
    pub fn erase(&self) {
        self.with_surface(FrameBuffer::clear);
        self.with_shadow(FrameBuffer::clear);
    }

    // =========================================================================
    // Decorations
    // =========================================================================

    pub fn draw_box(&self) {
        let style = self.screen.border();
        self.with_surface(|buffer| buffer.draw_border(style, Attr::NORMAL, 0));
    }

    pub fn draw_title(&self) {
        self.with_surface(|buffer| {
            for (row, (run, &x)) in self.title.iter().zip(&self.title_pos).enumerate() {
                let y = self.border_size as i32 + row as i32;
                buffer.draw_run(x as i32, y, run, Orientation::Horizontal);
            }
        });
    }

    /// Draw the drop shadow: a dim line along the bottom and right edges of
    /// the shadow surface, which peeks out from under the primary.
    pub fn draw_shadow(&self) {
        let (horiz, vert, _, tr, br, bl) = self.screen.border().chars();
        self.with_shadow(|buffer| {
            let (width, height) = (buffer.width(), buffer.height());
            let x2 = width as i32 - 1;
            let y2 = height as i32 - 1;
            let cell = |ch| StyledCell::new(ch, Attr::DIM, 0);

            buffer.clear();
            buffer.draw_hline(1, y2, width.saturating_sub(2), cell(horiz));
            buffer.draw_vline(x2, 1, height.saturating_sub(2), cell(vert));
            buffer.set(x2, 0, cell(tr));
            buffer.set(0, y2, cell(bl));
            buffer.set(x2, y2, cell(br));
        });
    }

    // =========================================================================
    // Placement & teardown
    // =========================================================================

    /// Re-resolve the position against the current screen size and move
    /// both surfaces. The size is unchanged.
    pub fn relocate(&mut self, x: Placement, y: Placement) {
        let (screen_width, screen_height) = self.screen.size();
        let new_x = layout::resolve_position(screen_width, self.rect.width, x);
        let new_y = layout::resolve_position(screen_height, self.rect.height, y);

        if let Some(handle) = &self.handle {
            self.screen.move_surface(handle.primary, new_x, new_y);
            if let Some(shadow) = handle.shadow {
                self.screen
                    .move_surface(shadow, new_x.saturating_add(1), new_y.saturating_add(1));
            }
        }
        self.rect.x = new_x;
        self.rect.y = new_y;
        debug!(x = new_x, y = new_y, "widget relocated");
    }

    /// Release surfaces and unregister. A second call is a no-op.
    pub fn destroy(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        if self.screen.detach(&handle) {
            debug!(kind = %handle.kind, "widget destroyed");
        }
    }
}
