//! Pre-process Example - refuse a key before the widget sees it.
//!
//! `G` would jump the scale to its maximum; the pre-process hook swallows it
//! (and `g`) and beeps instead.
//!
//! Run with: cargo run --example preprocess

use std::cell::Cell;
use std::rc::Rc;

use spark_widgets::backend::CrosstermBackend;
use spark_widgets::{ExitState, Key, Result, Scale, ScaleProps, Screen, Widget};

fn run(refused: &Rc<Cell<u32>>) -> Result<(ExitState, Option<i64>)> {
    let screen = Screen::new(CrosstermBackend::new()?)?;

    let mut widget = Scale::new(
        &screen,
        ScaleProps {
            title: "<C>Type in anything you want\n<C>but the dreaded letter </B>G<!B>!".into(),
            label: "</B>Value<!B> ".into(),
            field_width: 8,
            high: 1000,
            ..Default::default()
        },
    )?;

    let counter = Rc::clone(refused);
    widget.set_pre_process(move |scale, key| {
        if matches!(key, Key::Char('g' | 'G')) {
            counter.set(counter.get() + 1);
            let _ = scale.base().screen().beep();
            return false;
        }
        true
    });

    let value = widget.activate(&[])?;
    Ok((widget.exit_state(), value))
}

fn main() {
    let refused = Rc::new(Cell::new(0));

    match run(&refused) {
        Ok((ExitState::Normal, Some(value))) => println!("You picked {value}"),
        Ok((ExitState::EscapeHit, _)) => println!("You hit escape. No information passed back."),
        Ok(_) => println!("Nothing picked."),
        Err(err) => {
            eprintln!("Cannot create the scale: {err}");
            std::process::exit(1);
        }
    }
    if refused.get() > 0 {
        println!("I told you NOT to type G ({} times)", refused.get());
    }
}
