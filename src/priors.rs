use itertools::Itertools;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum PriorError {
    #[error("no prior configured for `{profile}.{parameter}`")]
    UnknownParameter { profile: String, parameter: String },
    #[error("duplicate prior entry for `{profile}.{parameter}`")]
    Duplicate { profile: String, parameter: String },
    #[error("`{0}` prior bounds must satisfy lower < upper")]
    Bounds(String),
    #[error("log-uniform prior bounds must be positive")]
    LogBounds,
    #[error("gaussian prior sigma must be positive")]
    Sigma,
    #[error("prior width must be positive")]
    Width,
    #[error("prior limits must satisfy lower <= upper")]
    Limits,
    #[error("unit value {0} is outside the unit interval")]
    UnitInterval(f64),
    #[error("failed to write the prior table")]
    Csv(#[from] csv::Error),
}
type Result<T> = std::result::Result<T, PriorError>;

/// Default prior distribution of a model parameter
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum Prior {
    Uniform { lower: f64, upper: f64 },
    LogUniform { lower: f64, upper: f64 },
    Gaussian { mean: f64, sigma: f64 },
}
impl Prior {
    pub fn validate(&self) -> Result<()> {
        match *self {
            Prior::Uniform { lower, upper } => {
                if lower >= upper {
                    return Err(PriorError::Bounds("uniform".into()));
                }
            }
            Prior::LogUniform { lower, upper } => {
                if lower <= 0f64 || upper <= 0f64 {
                    return Err(PriorError::LogBounds);
                }
                if lower >= upper {
                    return Err(PriorError::Bounds("log-uniform".into()));
                }
            }
            Prior::Gaussian { sigma, .. } => {
                if sigma <= 0f64 {
                    return Err(PriorError::Sigma);
                }
            }
        }
        Ok(())
    }
    /// Maps a unit interval sample to a model value
    pub fn value_from_unit(&self, unit: f64) -> Result<f64> {
        match *self {
            Prior::Uniform { lower, upper } => {
                if !(0f64..=1f64).contains(&unit) {
                    return Err(PriorError::UnitInterval(unit));
                }
                Ok(lower + unit * (upper - lower))
            }
            Prior::LogUniform { lower, upper } => {
                if !(0f64..=1f64).contains(&unit) {
                    return Err(PriorError::UnitInterval(unit));
                }
                Ok(lower * (upper / lower).powf(unit))
            }
            Prior::Gaussian { mean, sigma } => {
                if unit <= 0f64 || unit >= 1f64 {
                    return Err(PriorError::UnitInterval(unit));
                }
                Ok(mean + sigma * inverse_normal_cdf(unit))
            }
        }
    }
    /// Half the span of the prior (the sigma for a gaussian)
    pub fn half_span(&self) -> f64 {
        match *self {
            Prior::Uniform { lower, upper } | Prior::LogUniform { lower, upper } => {
                0.5 * (upper - lower)
            }
            Prior::Gaussian { sigma, .. } => sigma,
        }
    }
}
impl fmt::Display for Prior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prior::Uniform { lower, upper } => write!(f, "Uniform[{}, {}]", lower, upper),
            Prior::LogUniform { lower, upper } => write!(f, "LogUniform[{}, {}]", lower, upper),
            Prior::Gaussian { mean, sigma } => write!(f, "Gaussian({}, {})", mean, sigma),
        }
    }
}

/// Hard physical bounds of a model parameter
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PriorLimits {
    pub lower: f64,
    pub upper: f64,
}
impl Default for PriorLimits {
    fn default() -> Self {
        Self {
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
        }
    }
}
impl PriorLimits {
    pub fn validate(&self) -> Result<()> {
        if self.lower > self.upper {
            return Err(PriorError::Limits);
        }
        Ok(())
    }
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lower, self.upper)
    }
}
impl fmt::Display for PriorLimits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

/// Width of the gaussian prior a parameter gets when linked across fits
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum PriorWidth {
    Absolute(f64),
    Relative(f64),
}
impl PriorWidth {
    pub fn validate(&self) -> Result<()> {
        let value = match self {
            PriorWidth::Absolute(value) | PriorWidth::Relative(value) => value,
        };
        if *value <= 0f64 {
            return Err(PriorError::Width);
        }
        Ok(())
    }
    /// Resolves to an absolute sigma about a best-fit value
    pub fn sigma(&self, best_fit: f64) -> f64 {
        match *self {
            PriorWidth::Absolute(value) => value,
            PriorWidth::Relative(value) => value * best_fit.abs(),
        }
    }
}
impl fmt::Display for PriorWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorWidth::Absolute(value) => write!(f, "{} (absolute)", value),
            PriorWidth::Relative(value) => write!(f, "{} (relative)", value),
        }
    }
}

/// A default prior together with its limits
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedPrior {
    pub prior: Prior,
    pub limits: PriorLimits,
}
impl BoundedPrior {
    pub fn value_from_unit(&self, unit: f64) -> Result<f64> {
        Ok(self.limits.clamp(self.prior.value_from_unit(unit)?))
    }
}

/// Nested (profile, parameter) tables as they appear in the configuration files
pub type PriorTable<T> = BTreeMap<String, BTreeMap<String, T>>;

/// An entry of the prior registry
pub struct PriorEntry<'a> {
    pub profile: &'a str,
    pub parameter: &'a str,
    pub prior: &'a Prior,
    pub limits: PriorLimits,
    pub width: Option<&'a PriorWidth>,
}

/// The prior defaults, limits and link widths of every model parameter
#[derive(Default, Debug)]
pub struct PriorRegistry {
    defaults: PriorTable<Prior>,
    limits: PriorTable<PriorLimits>,
    widths: PriorTable<PriorWidth>,
}
impl PriorRegistry {
    /// The registry shipped with the crate
    pub fn builtin() -> Self {
        use Prior::*;
        use PriorWidth::*;
        let positive = PriorLimits {
            lower: 0f64,
            upper: f64::INFINITY,
        };
        let mut registry = Self::default();
        registry.insert(
            "power_law",
            "einstein_radius",
            Uniform {
                lower: 0.0,
                upper: 4.0,
            },
            Some(positive),
            Some(Relative(0.25)),
        );
        registry.insert(
            "power_law",
            "slope",
            Gaussian {
                mean: 2.0,
                sigma: 0.2,
            },
            Some(PriorLimits {
                lower: 1.2,
                upper: 2.8,
            }),
            Some(Absolute(0.2)),
        );
        registry.insert(
            "hernquist",
            "mass",
            LogUniform {
                lower: 1e8,
                upper: 1e12,
            },
            Some(positive),
            Some(Relative(0.5)),
        );
        registry.insert(
            "hernquist",
            "effective_radius",
            Uniform {
                lower: 0.01,
                upper: 10.0,
            },
            Some(positive),
            Some(Relative(0.25)),
        );
        registry.insert(
            "nfw",
            "kappa_s",
            LogUniform {
                lower: 1e-3,
                upper: 1.0,
            },
            Some(positive),
            Some(Relative(0.5)),
        );
        registry.insert(
            "nfw",
            "scale_radius",
            Uniform {
                lower: 0.01,
                upper: 50.0,
            },
            Some(positive),
            Some(Relative(0.25)),
        );
        registry
    }
    fn insert(
        &mut self,
        profile: &str,
        parameter: &str,
        prior: Prior,
        limits: Option<PriorLimits>,
        width: Option<PriorWidth>,
    ) {
        self.defaults
            .entry(profile.into())
            .or_default()
            .insert(parameter.into(), prior);
        if let Some(limits) = limits {
            self.limits
                .entry(profile.into())
                .or_default()
                .insert(parameter.into(), limits);
        }
        if let Some(width) = width {
            self.widths
                .entry(profile.into())
                .or_default()
                .insert(parameter.into(), width);
        }
    }
    pub fn merge_defaults(&mut self, table: PriorTable<Prior>) -> Result<()> {
        for (profile, parameters) in table {
            for (parameter, prior) in parameters {
                let slot = self.defaults.entry(profile.clone()).or_default();
                if slot.insert(parameter.clone(), prior).is_some() {
                    return Err(PriorError::Duplicate { profile, parameter });
                }
            }
        }
        Ok(())
    }
    pub fn merge_limits(&mut self, table: PriorTable<PriorLimits>) -> Result<()> {
        for (profile, parameters) in table {
            for (parameter, limits) in parameters {
                let slot = self.limits.entry(profile.clone()).or_default();
                if slot.insert(parameter.clone(), limits).is_some() {
                    return Err(PriorError::Duplicate { profile, parameter });
                }
            }
        }
        Ok(())
    }
    pub fn merge_widths(&mut self, table: PriorTable<PriorWidth>) -> Result<()> {
        for (profile, parameters) in table {
            for (parameter, width) in parameters {
                let slot = self.widths.entry(profile.clone()).or_default();
                if slot.insert(parameter.clone(), width).is_some() {
                    return Err(PriorError::Duplicate { profile, parameter });
                }
            }
        }
        Ok(())
    }
    pub fn len(&self) -> usize {
        self.defaults.values().map(BTreeMap::len).sum()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn profiles(&self) -> impl Iterator<Item = &str> {
        self.defaults.keys().map(String::as_str)
    }
    pub fn iter(&self) -> impl Iterator<Item = PriorEntry<'_>> + '_ {
        self.defaults.iter().flat_map(move |(profile, parameters)| {
            parameters.iter().map(move |(parameter, prior)| PriorEntry {
                profile,
                parameter,
                prior,
                limits: self.limits_for(profile, parameter),
                width: self.width_for(profile, parameter),
            })
        })
    }
    /// Limits of a parameter, unbounded when none are configured
    pub fn limits_for(&self, profile: &str, parameter: &str) -> PriorLimits {
        self.limits
            .get(profile)
            .and_then(|parameters| parameters.get(parameter))
            .copied()
            .unwrap_or_default()
    }
    pub fn width_for(&self, profile: &str, parameter: &str) -> Option<&PriorWidth> {
        self.widths
            .get(profile)
            .and_then(|parameters| parameters.get(parameter))
    }
    /// The default prior of a parameter with its limits applied
    pub fn prior_for(&self, profile: &str, parameter: &str) -> Result<BoundedPrior> {
        let prior = self
            .defaults
            .get(profile)
            .and_then(|parameters| parameters.get(parameter))
            .ok_or_else(|| PriorError::UnknownParameter {
                profile: profile.into(),
                parameter: parameter.into(),
            })?;
        Ok(BoundedPrior {
            prior: prior.clone(),
            limits: self.limits_for(profile, parameter),
        })
    }
    /// The gaussian prior a parameter gets in the next fit of a sequence,
    /// centred on the best-fit value of the previous one
    pub fn linked_prior(&self, profile: &str, parameter: &str, best_fit: f64) -> Result<BoundedPrior> {
        let BoundedPrior { prior, limits } = self.prior_for(profile, parameter)?;
        let sigma = match self.width_for(profile, parameter) {
            Some(width) => width.sigma(best_fit),
            None => {
                log::debug!(
                    "no width configured for `{}.{}`, falling back to half the prior span",
                    profile,
                    parameter
                );
                prior.half_span()
            }
        };
        Ok(BoundedPrior {
            prior: Prior::Gaussian {
                mean: best_fit,
                sigma,
            },
            limits,
        })
    }
    pub fn validate(&self) -> Result<()> {
        for parameters in self.defaults.values() {
            for prior in parameters.values() {
                prior.validate()?;
            }
        }
        for parameters in self.limits.values() {
            for limits in parameters.values() {
                limits.validate()?;
            }
        }
        for parameters in self.widths.values() {
            for width in parameters.values() {
                width.validate()?;
            }
        }
        Ok(())
    }
    pub fn summary(&self) {
        println!("PRIORS:");
        println!(" - # of parameters: {}", self.len());
        println!(
            "    {:<18} {:<24} {:<14} {:<16}",
            "PARAMETER", "PRIOR", "LIMITS", "WIDTH"
        );
        for (profile, entries) in &self.iter().chunk_by(|entry| entry.profile) {
            println!(" - {}:", profile);
            for entry in entries {
                println!(
                    "    {:<18} {:<24} {:<14} {:<16}",
                    entry.parameter,
                    entry.prior.to_string(),
                    entry.limits.to_string(),
                    entry.width.map(|width| width.to_string()).unwrap_or_default()
                );
            }
        }
    }
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path.as_ref())?;
        wtr.write_record(["Profile", "Parameter", "Prior", "Lower limit", "Upper limit", "Width"])?;
        self.iter()
            .map(|entry| {
                wtr.write_record(&[
                    entry.profile.to_string(),
                    entry.parameter.to_string(),
                    entry.prior.to_string(),
                    entry.limits.lower.to_string(),
                    entry.limits.upper.to_string(),
                    entry.width.map(|width| width.to_string()).unwrap_or_default(),
                ])
            })
            .collect::<std::result::Result<Vec<()>, csv::Error>>()?;
        Ok(())
    }
}

// Acklam's rational approximation of the standard normal quantile,
// accurate to ~1e-9 over the open unit interval
fn inverse_normal_cdf(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    if p < P_LOW {
        let q = (-2f64 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1f64)
    } else if p <= 1f64 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1f64)
    } else {
        let q = (-2f64 * (1f64 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1f64)
    }
}
