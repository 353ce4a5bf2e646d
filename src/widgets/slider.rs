//! Numeric sliders - a labelled field stepping a bounded value.
//!
//! [`Slider<T>`] is generic over the stepped type: [`Scale`] steps integers,
//! [`FScale`] steps floats and displays a fixed number of digits. Both share
//! [`NumericField`] for the clamped arithmetic.
//!
//! Besides the stepping keys, a value can be typed into the field: digits
//! start an entry, `-` flips its sign, `.` adds a decimal point (floats
//! only) and Backspace deletes. Enter, or any stepping key, commits the
//! entry clamped into range.

use std::fmt;

use tracing::{debug, trace};

use crate::error::{Result, WidgetError};
use crate::input::Key;
use crate::layout;
use crate::markup::{self, StyledRun};
use crate::screen::Screen;
use crate::types::{Attr, ExitState, Orientation, Placement, Rect, StyledCell, WidgetType};
use crate::widget::{BindingTable, KeyOutcome, Widget, WidgetBase, activation};

/// Display precision cap for floating-point sliders.
pub const MAX_DIGITS: usize = 30;

// =============================================================================
// SliderValue
// =============================================================================

/// A number a slider can step.
pub trait SliderValue: Copy + PartialOrd + fmt::Debug + fmt::Display + 'static {
    /// Widget type of sliders over this number.
    const WIDGET_TYPE: WidgetType;

    /// Whether typed entries may carry a decimal point.
    const FRACTIONAL: bool;

    fn from_int(n: i32) -> Self;

    /// Parse a typed entry. None for anything that is not a finite number.
    fn parse(text: &str) -> Option<Self>;

    /// `self + step`, saturating where the type can overflow.
    fn step_up(self, step: Self) -> Self;

    /// `self - step`, saturating where the type can overflow.
    fn step_down(self, step: Self) -> Self;

    /// Display text with `digits` fractional digits.
    fn format(self, digits: usize) -> String;
}

impl SliderValue for i64 {
    const WIDGET_TYPE: WidgetType = WidgetType::Scale;
    const FRACTIONAL: bool = false;

    fn from_int(n: i32) -> Self {
        n as i64
    }

    fn parse(text: &str) -> Option<Self> {
        text.parse().ok()
    }

    fn step_up(self, step: Self) -> Self {
        self.saturating_add(step)
    }

    fn step_down(self, step: Self) -> Self {
        self.saturating_sub(step)
    }

    /// Integers have no fractional digits.
    fn format(self, _digits: usize) -> String {
        self.to_string()
    }
}

impl SliderValue for f64 {
    const WIDGET_TYPE: WidgetType = WidgetType::FScale;
    const FRACTIONAL: bool = true;

    fn from_int(n: i32) -> Self {
        n as f64
    }

    fn parse(text: &str) -> Option<Self> {
        text.parse::<f64>().ok().filter(|value| value.is_finite())
    }

    fn step_up(self, step: Self) -> Self {
        self + step
    }

    fn step_down(self, step: Self) -> Self {
        self - step
    }

    fn format(self, digits: usize) -> String {
        format!("{:.*}", digits.min(MAX_DIGITS), self)
    }
}

// =============================================================================
// NumericField
// =============================================================================

/// A value kept inside `[low, high]`, moved in steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericField<T> {
    low: T,
    high: T,
    current: T,
    step: T,
    fast_step: T,
}

impl<T: SliderValue> NumericField<T> {
    pub fn new(low: T, high: T, current: T, step: T, fast_step: T) -> Self {
        let mut field = Self {
            low,
            high,
            current,
            step,
            fast_step,
        };
        field.set_range(low, high);
        field.set_value(current);
        field
    }

    /// Set the bounds, swapping them if given in the wrong order. The
    /// current value is pulled back inside.
    pub fn set_range(&mut self, low: T, high: T) {
        if low <= high {
            self.low = low;
            self.high = high;
        } else {
            debug!(?low, ?high, "slider range inverted, swapped");
            self.low = high;
            self.high = low;
        }
        self.current = self.clamp(self.current);
    }

    /// Set the value, clamped into range.
    pub fn set_value(&mut self, value: T) {
        let clamped = self.clamp(value);
        if clamped != value {
            debug!(?value, ?clamped, "slider value clamped");
        }
        self.current = clamped;
    }

    pub fn increment(&mut self) {
        self.current = self.clamp(self.current.step_up(self.step));
    }

    pub fn decrement(&mut self) {
        self.current = self.clamp(self.current.step_down(self.step));
    }

    pub fn fast_increment(&mut self) {
        self.current = self.clamp(self.current.step_up(self.fast_step));
    }

    pub fn fast_decrement(&mut self) {
        self.current = self.clamp(self.current.step_down(self.fast_step));
    }

    pub fn to_low(&mut self) {
        self.current = self.low;
    }

    pub fn to_high(&mut self) {
        self.current = self.high;
    }

    pub fn set_step(&mut self, step: T) {
        self.step = step;
    }

    pub fn set_fast_step(&mut self, fast_step: T) {
        self.fast_step = fast_step;
    }

    pub fn low(&self) -> T {
        self.low
    }

    pub fn high(&self) -> T {
        self.high
    }

    pub fn current(&self) -> T {
        self.current
    }

    pub fn step(&self) -> T {
        self.step
    }

    pub fn fast_step(&self) -> T {
        self.fast_step
    }

    fn clamp(&self, value: T) -> T {
        if value < self.low {
            self.low
        } else if value > self.high {
            self.high
        } else {
            value
        }
    }
}

// =============================================================================
// Props
// =============================================================================

/// Construction options for [`Slider`].
#[derive(Debug, Clone)]
pub struct SliderProps<T> {
    pub x: Placement,
    pub y: Placement,
    /// Title markup, one line per `\n`.
    pub title: String,
    /// Markup shown left of the field.
    pub label: String,
    pub field_attr: Attr,
    /// Requested field width (0 = full screen, negative = screen minus n).
    pub field_width: i32,
    pub start: T,
    pub low: T,
    pub high: T,
    pub step: T,
    pub fast_step: T,
    /// Fractional digits shown by floating-point sliders.
    pub digits: usize,
    pub boxed: bool,
    pub shadow: bool,
}

impl<T: SliderValue> Default for SliderProps<T> {
    fn default() -> Self {
        Self {
            x: Placement::Center,
            y: Placement::Center,
            title: String::new(),
            label: String::new(),
            field_attr: Attr::NORMAL,
            field_width: 10,
            start: T::from_int(0),
            low: T::from_int(0),
            high: T::from_int(100),
            step: T::from_int(1),
            fast_step: T::from_int(10),
            digits: 2,
            boxed: true,
            shadow: false,
        }
    }
}

pub type ScaleProps = SliderProps<i64>;
pub type FScaleProps = SliderProps<f64>;

// =============================================================================
// Slider
// =============================================================================

pub struct Slider<T: SliderValue> {
    base: WidgetBase,
    bindings: BindingTable<Slider<T>>,
    field: NumericField<T>,
    label: StyledRun,
    field_attr: Attr,
    field_width: u16,
    digits: usize,
    /// Text typed into the field, not committed yet.
    entry: Option<String>,
}

/// Integer slider.
pub type Scale = Slider<i64>;

/// Floating-point slider.
pub type FScale = Slider<f64>;

impl<T: SliderValue> Slider<T> {
    pub fn new(screen: &Screen, props: SliderProps<T>) -> Result<Self> {
        let (screen_width, screen_height) = screen.size();
        let mut base = WidgetBase::new(screen, props.boxed);
        let border = base.border_size();

        let label = markup::compile(&props.label, Attr::NORMAL);
        let label_width = u16::try_from(label.width()).unwrap_or(u16::MAX);

        let mut field_width = layout::resolve_dimension(screen_width, props.field_width) as i32;
        let mut box_width = field_width + label_width as i32 + 2 * border as i32;

        // The title widens the box, never the field
        let title_width = markup::compile_lines(&props.title, Attr::NORMAL)
            .iter()
            .map(|run| run.width() as i32 + 2 * border as i32)
            .max()
            .unwrap_or(0);
        box_width = box_width.max(title_width);

        if box_width > screen_width as i32 {
            box_width = screen_width as i32;
            field_width = box_width - label_width as i32 - 2 * border as i32;
        }

        let box_width = box_width.clamp(0, u16::MAX as i32) as u16;
        let title_lines = base.set_title(&props.title, box_width);
        let box_height = 1 + title_lines + 2 * border;

        if field_width < 1 || box_height > screen_height {
            return Err(WidgetError::TooSmall {
                widget: T::WIDGET_TYPE,
                width: box_width,
                height: screen_height.min(box_height),
                min_width: label_width.saturating_add(1 + 2 * border),
                min_height: box_height,
            });
        }

        let rect = Rect::new(
            layout::resolve_position(screen_width, box_width, props.x),
            layout::resolve_position(screen_height, box_height, props.y),
            box_width,
            box_height,
        );
        base.attach(T::WIDGET_TYPE, rect, props.shadow)?;
        debug!(kind = %T::WIDGET_TYPE, ?rect, field_width, "slider created");

        Ok(Self {
            base,
            bindings: BindingTable::new(),
            field: NumericField::new(
                props.low,
                props.high,
                props.start,
                props.step,
                props.fast_step,
            ),
            label,
            field_attr: props.field_attr,
            field_width: field_width as u16,
            digits: props.digits.min(MAX_DIGITS),
            entry: None,
        })
    }

    // =========================================================================
    // Values
    // =========================================================================

    pub fn value(&self) -> T {
        self.field.current()
    }

    pub fn set_value(&mut self, value: T) {
        self.entry = None;
        self.field.set_value(value);
    }

    pub fn set_low_high(&mut self, low: T, high: T) {
        self.field.set_range(low, high);
    }

    pub fn low(&self) -> T {
        self.field.low()
    }

    pub fn high(&self) -> T {
        self.field.high()
    }

    /// Set range, value and box at once.
    pub fn set(&mut self, low: T, high: T, value: T, boxed: bool) {
        self.set_low_high(low, high);
        self.set_value(value);
        self.set_box(boxed);
    }

    pub fn set_step(&mut self, step: T) {
        self.field.set_step(step);
    }

    pub fn set_fast_step(&mut self, fast_step: T) {
        self.field.set_fast_step(fast_step);
    }

    pub fn field(&self) -> &NumericField<T> {
        &self.field
    }

    // =========================================================================
    // Display
    // =========================================================================

    /// Fractional digits shown, clamped to `[0, 30]`.
    pub fn set_digits(&mut self, digits: i32) {
        self.digits = digits.clamp(0, MAX_DIGITS as i32) as usize;
    }

    pub fn digits(&self) -> usize {
        self.digits
    }

    pub fn set_field_attr(&mut self, attr: Attr) {
        self.field_attr = attr;
    }

    pub fn field_attr(&self) -> Attr {
        self.field_attr
    }

    pub fn field_width(&self) -> u16 {
        self.field_width
    }

    pub fn set_box(&mut self, boxed: bool) {
        self.base.set_box(boxed);
    }

    pub fn is_boxed(&self) -> bool {
        self.base.is_boxed()
    }

    /// The current value, formatted.
    pub fn display_text(&self) -> String {
        self.field.current().format(self.digits)
    }

    /// The pending typed entry, if any.
    pub fn entry(&self) -> Option<&str> {
        self.entry.as_deref()
    }

    fn field_origin(&self) -> (i32, i32) {
        let border = self.base.border_size() as i32;
        let x = border + self.label.width() as i32;
        let y = self.base.title_lines() as i32 + border;
        (x, y)
    }

    /// Redraw the entry or the value, right-aligned with one trailing blank.
    ///
    /// Text wider than the field keeps its leading characters and never
    /// spills over the label.
    fn draw_field(&self) {
        let (x, y) = self.field_origin();
        let width = self.field_width as i32;
        let text = match &self.entry {
            Some(entry) => entry.clone(),
            None => self.display_text(),
        };
        let room = (self.field_width as usize).saturating_sub(1);
        let text: String = text.chars().take(room).collect();
        let len = text.chars().count() as i32;
        let attr = self.field_attr;
        let blank = self.base.blank_cell();

        self.base.with_surface(|buffer| {
            for col in x..x + width {
                buffer.set(col, y, blank);
            }
            let start = (x + width - len - 1).max(x);
            buffer.write_text(start, y, &text, attr, 0, Orientation::Horizontal);
        });
    }

    // =========================================================================
    // Typed entry
    // =========================================================================

    fn is_entry_char(&self, ch: char) -> bool {
        match ch {
            '1'..='9' => true,
            '.' => T::FRACTIONAL,
            // Outside an entry these are the to-low and step-down keys
            '0' | '-' => self.entry.is_some(),
            _ => false,
        }
    }

    fn type_char(&mut self, ch: char) -> Result<KeyOutcome<T>> {
        let mut text = self.entry.clone().unwrap_or_default();
        match ch {
            '-' => match text.strip_prefix('-') {
                Some(rest) => text = rest.to_string(),
                None => text.insert(0, '-'),
            },
            '.' if text.contains('.') => return self.reject(ch),
            _ => text.push(ch),
        }

        if text.chars().count() >= self.field_width as usize {
            return self.reject(ch);
        }
        trace!(entry = %text, "slider entry");
        self.entry = Some(text);
        self.draw_field();
        Ok(KeyOutcome::Continue)
    }

    /// Backspace: drop the last character, starting from the shown value
    /// when no entry is pending.
    fn delete_char(&mut self) -> Result<KeyOutcome<T>> {
        let mut text = match self.entry.take() {
            Some(text) => text,
            None => self.display_text(),
        };
        if text.pop().is_none() {
            self.entry = Some(text);
            self.base.screen().beep()?;
            return Ok(KeyOutcome::Continue);
        }
        self.entry = Some(text);
        self.draw_field();
        Ok(KeyOutcome::Continue)
    }

    fn reject(&self, ch: char) -> Result<KeyOutcome<T>> {
        trace!(%ch, "slider entry rejected");
        self.base.screen().beep()?;
        Ok(KeyOutcome::Continue)
    }

    /// Move a pending entry into the field, clamped. An entry that is not a
    /// number is discarded; returns false in that case.
    fn commit_entry(&mut self) -> bool {
        let Some(text) = self.entry.take() else {
            return true;
        };
        match T::parse(&text) {
            Some(value) => {
                self.field.set_value(value);
                true
            }
            None => {
                debug!(entry = %text, "slider entry is not a number, discarded");
                false
            }
        }
    }
}

// =============================================================================
// Widget
// =============================================================================

impl<T: SliderValue> Widget for Slider<T> {
    type Output = T;
    const TYPE: WidgetType = T::WIDGET_TYPE;

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

        let border = self.base.border_size() as i32;
        let row = self.base.title_lines() as i32 + border;
        self.base.with_surface(|buffer| {
            buffer.draw_run(border, row, &self.label, Orientation::Horizontal);
        });
        self.draw_field();
        Ok(())
    }

    /// Discards an entry left over from an earlier activation.
    fn activate(&mut self, actions: &[Key]) -> Result<Option<T>> {
        self.entry = None;
        activation::run(self, actions)
    }

    fn handle_key(&mut self, key: Key) -> Result<KeyOutcome<T>> {
        match key {
            Key::Char(ch) if self.is_entry_char(ch) => return self.type_char(ch),
            Key::Backspace => return self.delete_char(),
            Key::Enter | Key::Tab => {
                // An unparsable entry stays up for correction
                if self.entry.as_deref().is_some_and(|text| T::parse(text).is_none()) {
                    self.base.screen().beep()?;
                    return Ok(KeyOutcome::Continue);
                }
                self.commit_entry();
                self.draw_field();
                return Ok(KeyOutcome::Exit(ExitState::Normal, Some(self.field.current())));
            }
            _ => {}
        }

        let step: fn(&mut NumericField<T>) = match key {
            Key::Left | Key::Down | Key::Char('d' | '-') => NumericField::decrement,
            Key::Right | Key::Up | Key::Char('u' | '+') => NumericField::increment,
            Key::PageUp | Key::Char('U') => NumericField::fast_increment,
            Key::PageDown | Key::Char('D') => NumericField::fast_decrement,
            Key::Home | Key::Char('g' | '0') => NumericField::to_low,
            Key::End | Key::Char('G' | '$') => NumericField::to_high,
            _ => {
                trace!(%key, "slider ignored key");
                self.base.screen().beep()?;
                return Ok(KeyOutcome::Continue);
            }
        };
        // Steps start from the typed value
        self.commit_entry();
        step(&mut self.field);
        trace!(%key, value = %self.field.current(), "slider stepped");
        self.draw_field();
        Ok(KeyOutcome::Continue)
    }
}

impl<T: SliderValue> Drop for Slider<T> {
    fn drop(&mut self) {
        Widget::destroy(self);
    }
}

// =============================================================================
// Tests
// =============================================================================
