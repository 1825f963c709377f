pub mod config;
mod error;
pub mod labels;
pub mod non_linear;
pub mod priors;
pub mod profiles;
pub mod visualize;

pub use config::{Config, ConfigLoader};
pub use error::Error;
pub use priors::PriorRegistry;
pub use profiles::{MassProfile, ProfileKind};
