//! Histogram - a single filled bar with low/high/current labels.
//!
//! A display widget: it never reads keys on its own, and activating it just
//! draws it. The bar fills the field in proportion to `value / high`, and
//! blends over any label it crosses instead of hiding it.
//!
//! # Example
//!
//! ```
//! use spark_widgets::backend::TestBackend;
//! use spark_widgets::widgets::{Histogram, HistogramProps, ViewType};
//! use spark_widgets::{Screen, Widget};
//!
//! let backend = TestBackend::new(40, 10);
//! let screen = Screen::new(backend.clone()).unwrap();
//!
//! let mut volume = Histogram::new(&screen, HistogramProps {
//!     width: 22,
//!     height: 3,
//!     title: "<C></B>Volume<!B>".into(),
//!     ..Default::default()
//! }).unwrap();
//!
//! volume.set_view_type(ViewType::Percent);
//! volume.set_value(0, 10, 7);
//! volume.activate(&[]).unwrap();
//! screen.refresh().unwrap();
//!
//! assert_eq!(volume.bar_len(), 14);
//! ```

use tracing::{debug, trace};

use crate::error::{Result, WidgetError};
use crate::input::Key;
use crate::layout;
use crate::renderer::FrameBuffer;
use crate::screen::Screen;
use crate::types::{Attr, Orientation, Placement, Rect, StyledCell, WidgetType};
use crate::widget::{BindingTable, KeyOutcome, Widget, WidgetBase};

// =============================================================================
// Options
// =============================================================================

/// How the current value label is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewType {
    /// No labels at all.
    None,
    /// The raw value.
    #[default]
    Real,
    /// `value / high` as a percentage with one decimal.
    Percent,
    /// `value/high`.
    Fraction,
}

/// Where the labels sit relative to the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatsPosition {
    Left,
    Right,
    #[default]
    Top,
    Bottom,
    Center,
}

/// A label and its position on the widget's surface.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Label {
    pub text: String,
    pub x: i32,
    pub y: i32,
}

/// Construction options for [`Histogram`].
#[derive(Debug, Clone)]
pub struct HistogramProps {
    pub x: Placement,
    pub y: Placement,
    /// Requested box width (0 = full screen, negative = screen minus n).
    pub width: i32,
    /// Requested box height, not counting title lines.
    pub height: i32,
    pub orientation: Orientation,
    /// Title markup, one line per `\n`.
    pub title: String,
    pub boxed: bool,
    pub shadow: bool,
}

impl Default for HistogramProps {
    fn default() -> Self {
        Self {
            x: Placement::Center,
            y: Placement::Center,
            width: 0,
            height: 3,
            orientation: Orientation::Horizontal,
            title: String::new(),
            boxed: true,
            shadow: false,
        }
    }
}

// =============================================================================
// Histogram
// =============================================================================

pub struct Histogram {
    base: WidgetBase,
    bindings: BindingTable<Histogram>,
    box_width: u16,
    box_height: u16,
    field_width: u16,
    field_height: u16,
    orientation: Orientation,
    view_type: ViewType,
    stats_position: StatsPosition,
    stats_attr: Attr,
    filler: StyledCell,
    low: i64,
    high: i64,
    value: i64,
    percent: f64,
    bar_len: u16,
    low_label: Label,
    high_label: Label,
    current_label: Label,
}

impl Histogram {
    pub fn new(screen: &Screen, props: HistogramProps) -> Result<Self> {
        let (screen_width, screen_height) = screen.size();
        let mut base = WidgetBase::new(screen, props.boxed);

        let box_width = layout::resolve_dimension(screen_width, props.width);
        let requested_height = layout::resolve_dimension(screen_height, props.height);

        let title_lines = base.set_title(&props.title, box_width);
        let mut box_height = requested_height.saturating_add(title_lines);
        if box_height > screen_height {
            box_height = requested_height;
        }

        let border = base.border_size();
        let field_width = box_width as i32 - 2 * border as i32;
        let field_height = box_height as i32 - title_lines as i32 - 2 * border as i32;
        if field_width < 1 || field_height < 1 {
            return Err(WidgetError::TooSmall {
                widget: WidgetType::Histogram,
                width: box_width,
                height: box_height,
                min_width: 1 + 2 * border,
                min_height: 1 + title_lines + 2 * border,
            });
        }

        let rect = Rect::new(
            layout::resolve_position(screen_width, box_width, props.x),
            layout::resolve_position(screen_height, box_height, props.y),
            box_width,
            box_height,
        );
        base.attach(WidgetType::Histogram, rect, props.shadow)?;
        debug!(?rect, orientation = ?props.orientation, "histogram created");

        Ok(Self {
            base,
            bindings: BindingTable::new(),
            box_width,
            box_height,
            field_width: field_width as u16,
            field_height: field_height as u16,
            orientation: props.orientation,
            view_type: ViewType::default(),
            stats_position: StatsPosition::default(),
            stats_attr: Attr::NORMAL,
            filler: StyledCell::new('#', Attr::REVERSE, 0),
            low: 0,
            high: 0,
            value: 0,
            percent: 0.0,
            bar_len: 0,
            low_label: Label::default(),
            high_label: Label::default(),
            current_label: Label::default(),
        })
    }

    // =========================================================================
    // Values
    // =========================================================================

    /// Set range and value.
    ///
    /// `low > high` resets all three to 0; a value outside the range
    /// resets just the value.
    pub fn set_value(&mut self, low: i64, high: i64, value: i64) {
        if low > high {
            debug!(low, high, "histogram range inverted, reset to 0");
            self.low = 0;
            self.high = 0;
            self.value = 0;
        } else {
            self.low = low;
            self.high = high;
            self.value = if (low..=high).contains(&value) {
                value
            } else {
                debug!(low, high, value, "histogram value out of range, reset to 0");
                0
            };
        }

        self.percent = if self.high == 0 {
            0.0
        } else {
            self.value as f64 / self.high as f64
        };

        let field_len = match self.orientation {
            Orientation::Vertical => self.field_height,
            Orientation::Horizontal => self.field_width,
        };
        let bar = (self.percent * field_len as f64).round();
        self.bar_len = bar.clamp(0.0, field_len as f64) as u16;

        self.update_labels();
    }

    /// Set every display option at once.
    #[allow(clippy::too_many_arguments)]
    pub fn set(
        &mut self,
        view_type: ViewType,
        stats_position: StatsPosition,
        stats_attr: Attr,
        low: i64,
        high: i64,
        value: i64,
        filler: StyledCell,
        boxed: bool,
    ) {
        self.view_type = view_type;
        self.stats_position = stats_position;
        self.set_value(low, high, value);
        self.filler = filler;
        self.stats_attr = stats_attr;
        self.set_box(boxed);
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn low(&self) -> i64 {
        self.low
    }

    pub fn high(&self) -> i64 {
        self.high
    }

    /// `value / high`, or 0 when `high` is 0.
    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Bar length in cells.
    pub fn bar_len(&self) -> u16 {
        self.bar_len
    }

    // =========================================================================
    // Options
    // =========================================================================

    pub fn set_view_type(&mut self, view_type: ViewType) {
        self.view_type = view_type;
        self.update_labels();
    }

    pub fn view_type(&self) -> ViewType {
        self.view_type
    }

    pub fn set_stats_position(&mut self, position: StatsPosition) {
        self.stats_position = position;
        self.update_labels();
    }

    pub fn stats_position(&self) -> StatsPosition {
        self.stats_position
    }

    pub fn set_stats_attr(&mut self, attr: Attr) {
        self.stats_attr = attr;
    }

    pub fn stats_attr(&self) -> Attr {
        self.stats_attr
    }

    /// Cell used to paint the bar.
    pub fn set_filler(&mut self, filler: StyledCell) {
        self.filler = filler;
    }

    pub fn filler(&self) -> StyledCell {
        self.filler
    }

    pub fn set_box(&mut self, boxed: bool) {
        self.base.set_box(boxed);
    }

    pub fn is_boxed(&self) -> bool {
        self.base.is_boxed()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// (width, height) of the area inside the box and below the title.
    pub fn field_size(&self) -> (u16, u16) {
        (self.field_width, self.field_height)
    }

    pub fn low_label(&self) -> &Label {
        &self.low_label
    }

    pub fn high_label(&self) -> &Label {
        &self.high_label
    }

    pub fn current_label(&self) -> &Label {
        &self.current_label
    }

    // =========================================================================
    // Labels
    // =========================================================================

    fn current_text(&self) -> String {
        match self.view_type {
            ViewType::Percent => format!("{:3.1}%", self.percent * 100.0),
            ViewType::Fraction => format!("{}/{}", self.value, self.high),
            ViewType::Real | ViewType::None => self.value.to_string(),
        }
    }

    fn update_labels(&mut self) {
        if self.view_type == ViewType::None {
            self.low_label = Label::default();
            self.high_label = Label::default();
            self.current_label = Label::default();
            return;
        }

        let low = self.low.to_string();
        let high = self.high.to_string();
        let current = self.current_text();

        let t = self.base.title_lines() as i32;
        let b = self.base.border_size() as i32;
        let fw = self.field_width as i32;
        let fh = self.field_height as i32;
        let w = self.box_width as i32;
        let h = self.box_height as i32;
        let low_len = low.chars().count() as i32;
        let high_len = high.chars().count() as i32;
        let cur_len = current.chars().count() as i32;

        let (low_at, high_at, cur_at) = match self.orientation {
            Orientation::Vertical => {
                let x = match self.stats_position {
                    StatsPosition::Left | StatsPosition::Bottom => 1,
                    StatsPosition::Center => fw / 2 + 1,
                    StatsPosition::Right | StatsPosition::Top => fw,
                };
                (
                    (x, h - low_len - 1),
                    (x, t + 1),
                    (x, (fh - cur_len).div_euclid(2) + t + 1),
                )
            }
            Orientation::Horizontal => {
                let y = match self.stats_position {
                    StatsPosition::Top | StatsPosition::Right => t + 1,
                    StatsPosition::Center => fh / 2 + t + 1,
                    StatsPosition::Bottom | StatsPosition::Left => h - 2 * b,
                };
                (
                    (1, y),
                    (w - high_len - 1, y),
                    ((fw - cur_len).div_euclid(2) + 1, y),
                )
            }
        };

        self.low_label = Label {
            text: low,
            x: low_at.0,
            y: low_at.1,
        };
        self.high_label = Label {
            text: high,
            x: high_at.0,
            y: high_at.1,
        };
        self.current_label = Label {
            text: current,
            x: cur_at.0,
            y: cur_at.1,
        };
    }

    // =========================================================================
    // Drawing
    // =========================================================================

    fn draw_labels(&self, buffer: &mut FrameBuffer) {
        if self.view_type == ViewType::None {
            return;
        }
        for label in [&self.low_label, &self.current_label, &self.high_label] {
            if !label.text.is_empty() {
                buffer.write_text(
                    label.x,
                    label.y,
                    &label.text,
                    self.stats_attr,
                    0,
                    self.orientation,
                );
            }
        }
    }

    /// Paint the bar, keeping any glyph it crosses.
    fn draw_bar(&self, buffer: &mut FrameBuffer) {
        let bottom = self.box_height as i32 - 1;
        let (first_row, last_col) = match self.orientation {
            Orientation::Horizontal => (self.base.title_lines() as i32 + 1, self.bar_len as i32),
            Orientation::Vertical => (bottom - self.bar_len as i32, self.field_width as i32),
        };

        for y in first_row..bottom {
            for x in 1..=last_col {
                let Some(&under) = buffer.get(x, y) else {
                    continue;
                };
                let cell = if under.is_blank() {
                    self.filler
                } else {
                    under.blend(self.filler)
                };
                buffer.set(x, y, cell);
            }
        }
    }
}

// =============================================================================
// Widget
// =============================================================================

impl Widget for Histogram {
    type Output = ();
    const TYPE: WidgetType = WidgetType::Histogram;

    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn bindings(&self) -> &BindingTable<Self> {
        &self.bindings
    }

    fn bindings_mut(&mut self) -> &mut BindingTable<Self> {
        &mut self.bindings
    }

    fn draw(&mut self, boxed: bool) -> Result<()> {
        self.base.clear();
        if boxed {
            self.base.draw_box();
        }
        self.base.draw_shadow();
        self.base.draw_title();

        self.base.with_surface(|buffer| {
            self.draw_labels(buffer);
            self.draw_bar(buffer);
        });
        trace!(value = self.value, bar = self.bar_len, "histogram drawn");
        Ok(())
    }

    /// Display only: keys are ignored.
    fn handle_key(&mut self, _key: Key) -> Result<KeyOutcome<()>> {
        Ok(KeyOutcome::Continue)
    }

    /// Draws the histogram; there is nothing to interact with.
    fn activate(&mut self, _actions: &[Key]) -> Result<Option<()>> {
        let boxed = self.base.is_boxed();
        self.draw(boxed)?;
        Ok(None)
    }
}

impl Drop for Histogram {
    fn drop(&mut self) {
        Widget::destroy(self);
    }
}

// =============================================================================
// Tests
// =============================================================================
