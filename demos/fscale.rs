//! FScale Example - pick a floating-point value.
//!
//! Run with: cargo run --example fscale -- [-l LOW] [-h HIGH] [-i INC] [-w WIDTH]

use spark_widgets::backend::CrosstermBackend;
use spark_widgets::{ExitState, FScale, FScaleProps, Result, Screen, Widget};

struct Params {
    low: f64,
    high: f64,
    inc: f64,
    width: i32,
}

fn parse_args() -> Params {
    let mut params = Params {
        low: -1.2,
        high: 2.4,
        inc: 0.2,
        width: 10,
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    for pair in args.chunks(2) {
        let [flag, value] = pair else { break };
        match flag.as_str() {
            "-l" => params.low = value.parse().unwrap_or(params.low),
            "-h" => params.high = value.parse().unwrap_or(params.high),
            "-i" => params.inc = value.parse().unwrap_or(params.inc),
            "-w" => params.width = value.parse().unwrap_or(params.width),
            other => eprintln!("ignoring unknown option {other}"),
        }
    }
    params
}

fn run(params: &Params) -> Result<(ExitState, Option<f64>)> {
    let screen = Screen::new(CrosstermBackend::new()?)?;

    let mut widget = FScale::new(
        &screen,
        FScaleProps {
            title: "<C>Select a value".into(),
            label: "</5>Current value".into(),
            field_width: params.width,
            start: params.low,
            low: params.low,
            high: params.high,
            step: params.inc,
            fast_step: params.inc * 2.0,
            digits: 1,
            ..Default::default()
        },
    )?;

    let selection = widget.activate(&[])?;
    Ok((widget.exit_state(), selection))
}

fn main() {
    let params = parse_args();

    match run(&params) {
        Ok((ExitState::Normal, Some(value))) => println!("You selected {value:.1}"),
        Ok((ExitState::EscapeHit, _)) => println!("You hit escape. No value selected."),
        Ok(_) => println!("No value selected."),
        Err(err) => {
            eprintln!("Cannot make the scale widget: {err}");
            std::process::exit(1);
        }
    }
}
