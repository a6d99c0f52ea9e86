//! Pipeflow Sense - Synthetic flow sensor
//!
//! Fabricates flow readings the way real hardware would report them:
//! an input flow hovering around a nominal rate, and an output flow that
//! occasionally sags to model a pipe leak.

pub mod sensor;

pub use sensor::FlowSensor;
