//! Actuator layer: turns an [`ActionSequence`] into timed color commands on a
//! single light group.
//!
//! [`ActionSequence`]: monitor_core::color::ActionSequence

pub mod actuator;
pub mod hue;
pub mod player;
pub mod sequencer;

pub use actuator::{Actuator, LogActuator};
pub use hue::HueGroup;
pub use player::SequencePlayer;
pub use sequencer::Sequencer;
