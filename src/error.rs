use crate::{config::ConfigError, priors::PriorError, profiles::ProfileError};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error in the `config` module")]
    Config(#[from] ConfigError),
    #[error("Error in the `priors` module")]
    Prior(#[from] PriorError),
    #[error("Error in the `profiles` module")]
    Profile(#[from] ProfileError),
}
