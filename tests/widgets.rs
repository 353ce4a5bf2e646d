//! Integration tests for widgets on a shared screen.
//!
//! Everything goes through the public API with a [`TestBackend`] standing in
//! for the terminal, so these cover the full path from queued input to the
//! presented frame.

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use spark_widgets::{
    ExitState, FScale, FScaleProps, Histogram, HistogramProps, Key, Placement, Scale, ScaleProps,
    Screen, TestBackend, ViewType, Widget, WidgetType,
};

fn setup(width: u16, height: u16) -> (Screen, TestBackend) {
    let backend = TestBackend::new(width, height);
    let screen = Screen::new(backend.clone()).expect("screen");
    (screen, backend)
}

fn scale(screen: &Screen) -> Scale {
    Scale::new(
        screen,
        ScaleProps {
            label: "Count ".into(),
            high: 10,
            ..Default::default()
        },
    )
    .expect("scale")
}

// =============================================================================
// Activation
// =============================================================================

#[test]
fn test_keys_read_from_backend() {
    let (screen, backend) = setup(40, 10);
    backend.push_keys([Key::Up, Key::Up, Key::Enter]);

    let mut slider = FScale::new(
        &screen,
        FScaleProps {
            label: "Level ".into(),
            high: 1.0,
            step: 0.25,
            ..Default::default()
        },
    )
    .expect("fscale");

    assert_eq!(slider.activate(&[]).unwrap(), Some(0.5));
    assert_eq!(slider.exit_state(), ExitState::Normal);
    assert_eq!(backend.pending(), 0);
    assert!(backend.present_count() >= 1);
}

#[test]
fn test_escape_from_backend() {
    let (screen, backend) = setup(40, 10);
    backend.push_keys([Key::Up, Key::Escape]);

    let mut widget = scale(&screen);
    assert_eq!(widget.activate(&[]).unwrap(), None);
    assert_eq!(widget.exit_state(), ExitState::EscapeHit);
    assert_eq!(widget.value(), 1);
}

#[test]
fn test_closed_input_exits_early() {
    let (screen, _) = setup(40, 10);
    let mut widget = scale(&screen);
    assert_eq!(widget.activate(&[Key::Up]).unwrap(), None);
    assert_eq!(widget.exit_state(), ExitState::EarlyExit);
}

// =============================================================================
// Bindings
// =============================================================================

#[test]
fn test_context_binding_until_dropped() {
    let (screen, backend) = setup(40, 10);
    let mut widget = scale(&screen);

    let seen = Rc::new(RefCell::new(Vec::new()));
    widget.bind(WidgetType::Scale, Key::Char('x'), &seen, |scale, seen: &mut Vec<i64>, _key| {
        seen.push(scale.value());
        false
    });

    let result = widget.activate(&[Key::Up, Key::Char('x'), Key::Up, Key::Enter]).unwrap();
    assert_eq!(result, Some(2));
    assert_eq!(*seen.borrow(), vec![1]);
    assert_eq!(backend.beep_count(), 0);

    // Without its context the key falls through to the slider, which beeps
    drop(seen);
    assert!(widget.is_bound(WidgetType::Scale, Key::Char('x')));
    widget.activate(&[Key::Char('x'), Key::Enter]).unwrap();
    assert_eq!(backend.beep_count(), 1);
}

#[test]
fn test_handler_sets_exit_state() {
    let (screen, _) = setup(40, 10);
    let mut widget = scale(&screen);
    widget.bind_fn(WidgetType::Scale, Key::Char('q'), |scale, _key| {
        scale.base_mut().set_exit_state(ExitState::Normal);
        true
    });

    assert_eq!(widget.activate(&[Key::Up, Key::Char('q')]).unwrap(), None);
    assert_eq!(widget.exit_state(), ExitState::Normal);
    assert_eq!(widget.value(), 1);
}

#[test]
fn test_pre_process_swallows_jump() {
    let (screen, _) = setup(40, 10);
    let mut widget = scale(&screen);
    widget.set_pre_process(|_scale, key| key != Key::Char('G'));

    assert_eq!(widget.activate(&[Key::Char('G'), Key::Up, Key::Enter]).unwrap(), Some(1));
}

// =============================================================================
// Screen
// =============================================================================

#[test]
fn test_histogram_reaches_the_terminal() {
    let (screen, backend) = setup(40, 10);
    let mut volume = Histogram::new(
        &screen,
        HistogramProps {
            x: Placement::Left,
            y: Placement::Top,
            width: 22,
            ..Default::default()
        },
    )
    .expect("histogram");

    volume.set_view_type(ViewType::Percent);
    volume.set_value(0, 10, 7);
    assert_eq!(volume.activate(&[]).unwrap(), None);
    screen.refresh().unwrap();

    assert_eq!(volume.bar_len(), 14);
    assert!(backend.row(1).contains("70.0%"));
    assert!(backend.row(0).starts_with('┌'));
}

#[test]
fn test_registry_order_survives_destroy() {
    let (screen, _) = setup(40, 20);
    let mut first = scale(&screen);
    let histogram = Histogram::new(&screen, HistogramProps::default()).expect("histogram");
    let third = scale(&screen);

    first.destroy();
    let kinds: Vec<_> = screen.handles().iter().map(|handle| handle.kind).collect();
    assert_eq!(kinds, vec![WidgetType::Histogram, WidgetType::Scale]);
    assert_eq!(screen.handles()[1], *third.base().handle().unwrap());

    drop(histogram);
    assert_eq!(screen.widget_count(), 1);
}

#[test]
fn test_screen_destroy_then_widget_destroy() {
    let (screen, _) = setup(40, 20);
    let mut widget = scale(&screen);
    let histogram = Histogram::new(&screen, HistogramProps::default()).expect("histogram");

    screen.destroy();
    assert_eq!(screen.widget_count(), 0);
    assert!(!widget.base().is_attached());

    widget.destroy();
    drop(histogram);
    assert_eq!(screen.widget_count(), 0);
}

#[test]
fn test_resize_event_updates_screen() {
    let (screen, backend) = setup(40, 10);
    let mut widget = scale(&screen);
    backend.resize(60, 20);
    backend.push_key(Key::Enter);

    assert_eq!(widget.activate(&[]).unwrap(), Some(0));
    assert_eq!(screen.size(), (60, 20));
}
