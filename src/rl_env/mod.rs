pub mod config;
pub mod env;
pub mod errors;
pub mod spaces;
pub mod unittest_env;

pub use env::{Environment, StepInfo, Terminal};
pub use errors::EnvError;
pub use spaces::{SpaceSpecs, SpaceValues, TensorSpec, TensorValue, ValueType};
