//! Guided product finder: cascading vehicle and size selectors, the option
//! lists that feed each stage, and the saved-vehicle garage.

pub mod cascade;
pub mod error;
pub mod garage;
pub mod options;
pub mod size;
pub mod vehicle;

pub use cascade::{Cascade, StageKey, Transition};
pub use error::{FinderError, GarageError};
pub use garage::{Garage, GarageEvent, JsonFileStorage, MemoryStorage, VehicleStorage};
pub use options::{OptionSlot, OptionsState, Ticket};
pub use size::{SizeFinder, SizeStage};
pub use vehicle::{VehicleFinder, VehicleOptions, VehicleStage};
