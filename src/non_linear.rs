use serde::Deserialize;
use std::fmt;
use strum_macros::EnumIter;

/// Non-linear search families
#[derive(EnumIter, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchMethod {
    Nested,
    Mcmc,
    Optimizer,
}
impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMethod::Nested => write!(f, "nested"),
            SearchMethod::Mcmc => write!(f, "mcmc"),
            SearchMethod::Optimizer => write!(f, "optimizer"),
        }
    }
}

/// Nested sampling settings
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Nested {
    pub n_live_points: usize,
    pub evidence_tolerance: f64,
    pub sampling_efficiency: f64,
    pub multimodal: bool,
}
impl Default for Nested {
    fn default() -> Self {
        Self {
            n_live_points: 50,
            evidence_tolerance: 0.8,
            sampling_efficiency: 0.5,
            multimodal: true,
        }
    }
}

/// Ensemble MCMC settings
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Mcmc {
    pub n_walkers: usize,
    pub n_steps: usize,
    pub n_burn: usize,
}
impl Default for Mcmc {
    fn default() -> Self {
        Self {
            n_walkers: 50,
            n_steps: 2000,
            n_burn: 500,
        }
    }
}

/// Local optimizer settings
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Optimizer {
    pub n_restarts: usize,
    pub ftol: f64,
}
impl Default for Optimizer {
    fn default() -> Self {
        Self {
            n_restarts: 1,
            ftol: 1e-8,
        }
    }
}

/// Settings of every non-linear search family
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct NonLinear {
    pub nested: Nested,
    pub mcmc: Mcmc,
    pub optimizer: Optimizer,
}
impl NonLinear {
    pub fn validate(&self) -> Result<(), String> {
        if self.nested.n_live_points == 0 {
            return Err("nested sampling needs at least one live point".into());
        }
        if self.nested.evidence_tolerance <= 0f64 {
            return Err("nested sampling evidence tolerance must be positive".into());
        }
        if !(0f64..=1f64).contains(&self.nested.sampling_efficiency)
            || self.nested.sampling_efficiency == 0f64
        {
            return Err("nested sampling efficiency must be in (0, 1]".into());
        }
        if self.mcmc.n_walkers == 0 || self.mcmc.n_steps == 0 {
            return Err("mcmc needs walkers and steps".into());
        }
        if self.mcmc.n_burn >= self.mcmc.n_steps {
            return Err("mcmc burn-in must be shorter than the chain".into());
        }
        if self.optimizer.n_restarts == 0 {
            return Err("the optimizer needs at least one restart".into());
        }
        if self.optimizer.ftol <= 0f64 {
            return Err("the optimizer tolerance must be positive".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let settings: NonLinear = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, NonLinear::default());
        settings.validate().unwrap();
    }

    #[test]
    fn partial_document_overrides() {
        let settings: NonLinear =
            serde_json::from_str(r#"{"nested": {"n_live_points": 250}}"#).unwrap();
        assert_eq!(settings.nested.n_live_points, 250);
        assert_eq!(settings.nested.evidence_tolerance, 0.8);
        assert_eq!(settings.mcmc, Mcmc::default());
    }

    #[test]
    fn validation_rejects_degenerate_settings() {
        let mut settings = NonLinear::default();
        settings.mcmc.n_burn = settings.mcmc.n_steps;
        assert!(settings.validate().is_err());

        let mut settings = NonLinear::default();
        settings.nested.sampling_efficiency = 0.0;
        assert!(settings.validate().is_err());
    }
}
