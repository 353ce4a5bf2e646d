//! Concrete widgets.
//!
//! - [`Histogram`]: display-only bar with low/high/current labels
//! - [`Scale`] / [`FScale`]: integer and floating-point sliders

pub mod histogram;
pub mod slider;

pub use histogram::{Histogram, HistogramProps, Label, StatsPosition, ViewType};
pub use slider::{
    FScale, FScaleProps, NumericField, Scale, ScaleProps, Slider, SliderProps, SliderValue,
};
