pub mod controller;
pub mod sequencer;

pub use controller::{ControllerSettings, QueryController};
pub use sequencer::{Lookup, Sequencer};
