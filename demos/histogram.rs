//! Histogram Example - a scale driving three histograms.
//!
//! The scale's post-process hook pushes every new value into the histograms,
//! so the bars follow the slider while it is active.
//!
//! Run with: cargo run --example histogram

use std::cell::RefCell;
use std::rc::Rc;

use spark_widgets::backend::CrosstermBackend;
use spark_widgets::{
    Attr, Histogram, HistogramProps, Orientation, Placement, Result, Scale, ScaleProps, Screen,
    StatsPosition, StyledCell, ViewType, Widget,
};

fn histogram(
    screen: &Screen,
    y: i32,
    title: &str,
    view: ViewType,
    filler: StyledCell,
) -> Result<Histogram> {
    let mut histogram = Histogram::new(
        screen,
        HistogramProps {
            x: Placement::Center,
            y: Placement::At(y),
            width: -2,
            height: 3,
            orientation: Orientation::Horizontal,
            title: title.into(),
            boxed: true,
            shadow: true,
        },
    )?;
    histogram.set(view, StatsPosition::Top, Attr::BOLD, 0, 10, 0, filler, true);
    Ok(histogram)
}

fn run() -> Result<Option<i64>> {
    let screen = Screen::new(CrosstermBackend::new()?)?;

    let volume = StyledCell::new('#', Attr::REVERSE, 0);
    let bass = StyledCell::new(' ', Attr::REVERSE, 3);
    let treble = StyledCell::new(' ', Attr::REVERSE, 2);
    let bars = Rc::new(RefCell::new(vec![
        histogram(&screen, 1, "<C></5>Volume<!5>", ViewType::Percent, volume)?,
        histogram(&screen, 6, "<C></3>Bass<!3>", ViewType::Fraction, bass)?,
        histogram(&screen, 11, "<C></2>Treble<!2>", ViewType::Real, treble)?,
    ]));

    let mut level = Scale::new(
        &screen,
        ScaleProps {
            y: Placement::Bottom,
            title: "<C>Arrows step, </B>U<!B>/</B>D<!B> jump, Enter to finish".into(),
            label: "</B>Level<!B> ".into(),
            field_width: 6,
            low: 0,
            high: 10,
            step: 1,
            fast_step: 5,
            ..Default::default()
        },
    )?;

    let follow = Rc::clone(&bars);
    level.set_post_process(move |scale, _key| {
        for (index, bar) in follow.borrow_mut().iter_mut().enumerate() {
            let value = (scale.value() + index as i64).min(10);
            bar.set_value(0, 10, value);
            let _ = bar.activate(&[]);
        }
        true
    });

    for bar in bars.borrow_mut().iter_mut() {
        bar.activate(&[])?;
    }
    level.activate(&[])
}

fn main() {
    match run() {
        Ok(Some(value)) => println!("Level set to {value}"),
        Ok(None) => println!("Level unchanged."),
        Err(err) => {
            eprintln!("Cannot make the histograms: {err}");
            std::process::exit(1);
        }
    }
}
