use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::labels::{Formatter, LabelFormats, Labels};
use crate::non_linear::NonLinear;
use crate::priors::{Prior, PriorError, PriorLimits, PriorRegistry, PriorTable, PriorWidth};
use crate::profiles::{
    Hernquist, MassProfile, Nfw, ProfileKind, SphericalPowerLaw, DEFAULT_RADIAL_MINIMUM,
};
use crate::visualize::Visualize;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read the configuration file `{path}`")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse the configuration file `{path}`")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid category filter")]
    Filter(#[from] regex::Error),
    #[error("invalid prior table pattern")]
    Pattern(#[from] glob::PatternError),
    #[error("failed to scan the prior tables")]
    Scan(#[from] glob::GlobError),
    #[error("invalid prior table `{path}`")]
    PriorTable { path: PathBuf, source: PriorError },
    #[error("invalid `{category}` settings: {reason}")]
    Invalid { category: Category, reason: String },
    #[error(transparent)]
    Prior(#[from] PriorError),
}
type Result<T> = std::result::Result<T, ConfigError>;

/// The configuration categories and their location in the configuration directory
#[derive(EnumIter, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    General,
    NonLinear,
    Label,
    LabelFormat,
    RadialMinimum,
    Visualize,
    Priors,
}
impl Category {
    pub fn file(&self) -> &'static str {
        match self {
            Category::General => "general.json",
            Category::NonLinear => "non_linear.json",
            Category::Label => "label.json",
            Category::LabelFormat => "label_format.json",
            Category::RadialMinimum => "radial_minimum.json",
            Category::Visualize => "visualize",
            Category::Priors => "priors",
        }
    }
}
impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::General => write!(f, "general"),
            Category::NonLinear => write!(f, "non_linear"),
            Category::Label => write!(f, "label"),
            Category::LabelFormat => write!(f, "label_format"),
            Category::RadialMinimum => write!(f, "radial_minimum"),
            Category::Visualize => write!(f, "visualize"),
            Category::Priors => write!(f, "priors"),
        }
    }
}

/// Output settings of the general category
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Output {
    pub log_level: String,
    pub model_results_decimal_places: usize,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            log_level: String::from("info"),
            model_results_decimal_places: 4,
        }
    }
}

/// General settings
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct General {
    pub output: Output,
}

/// Radial floor of each mass profile family
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct RadialMinima(BTreeMap<String, f64>);
impl RadialMinima {
    /// The configured floor of a profile kind, the crate default otherwise
    pub fn for_kind(&self, kind: ProfileKind) -> f64 {
        self.0
            .get(&kind.to_string())
            .copied()
            .unwrap_or(DEFAULT_RADIAL_MINIMUM)
    }
}

/// The whole configuration tree
#[derive(Debug)]
pub struct Config {
    pub general: General,
    pub non_linear: NonLinear,
    pub visualize: Visualize,
    pub labels: Labels,
    pub label_formats: LabelFormats,
    pub radial_minima: RadialMinima,
    pub priors: PriorRegistry,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            general: Default::default(),
            non_linear: Default::default(),
            visualize: Default::default(),
            labels: Default::default(),
            label_formats: Default::default(),
            radial_minima: Default::default(),
            priors: PriorRegistry::builtin(),
        }
    }
}
impl Config {
    /// Result-line formatter combining the label tables and the general settings
    pub fn formatter(&self) -> Formatter<'_> {
        Formatter {
            labels: &self.labels,
            formats: &self.label_formats,
            default_decimals: self.general.output.model_results_decimal_places,
        }
    }
    /// Builds a mass profile from the mid-point of every parameter prior,
    /// with the configured radial minimum applied
    pub fn profile_from_midpoints(
        &self,
        kind: ProfileKind,
    ) -> std::result::Result<Box<dyn MassProfile>, PriorError> {
        let key = kind.to_string();
        let mid = |parameter: &str| -> std::result::Result<f64, PriorError> {
            self.priors.prior_for(&key, parameter)?.value_from_unit(0.5)
        };
        let radial_minimum = self.radial_minima.for_kind(kind);
        // unit critical surface density: convergence and surface density coincide
        Ok(match kind {
            ProfileKind::PowerLaw => Box::new(
                SphericalPowerLaw::new(mid("einstein_radius")?, mid("slope")?, 1f64)
                    .radial_minimum(radial_minimum),
            ),
            ProfileKind::Hernquist => Box::new(
                Hernquist::new(mid("mass")?, mid("effective_radius")?, 1f64)
                    .radial_minimum(radial_minimum),
            ),
            ProfileKind::Nfw => Box::new(
                Nfw::new(mid("kappa_s")?, mid("scale_radius")?, 1f64)
                    .radial_minimum(radial_minimum),
            ),
        })
    }
    pub fn summary(&self) {
        println!("CONFIGURATION SUMMARY:");
        println!(" - output:");
        println!("    log level      : {}", self.general.output.log_level);
        println!(
            "    result decimals: {}",
            self.general.output.model_results_decimal_places
        );
        println!(" - non-linear searches:");
        println!(
            "    {:<9}: {} live points, evidence tolerance {}, efficiency {}",
            "nested",
            self.non_linear.nested.n_live_points,
            self.non_linear.nested.evidence_tolerance,
            self.non_linear.nested.sampling_efficiency
        );
        println!(
            "    {:<9}: {} walkers x {} steps ({} burn-in)",
            "mcmc",
            self.non_linear.mcmc.n_walkers,
            self.non_linear.mcmc.n_steps,
            self.non_linear.mcmc.n_burn
        );
        println!(
            "    {:<9}: {} restart(s), ftol {}",
            "optimizer", self.non_linear.optimizer.n_restarts, self.non_linear.optimizer.ftol
        );
        println!(" - radial minima:");
        for kind in ProfileKind::iter() {
            println!("    {:<9}: {:e}", kind.to_string(), self.radial_minima.for_kind(kind));
        }
        println!(
            " - figures: {}x{} ({})",
            self.visualize.figures.width, self.visualize.figures.height, self.visualize.figures.format
        );
        self.priors.summary();
    }
}

/// Configuration directory loader
pub struct ConfigLoader {
    path: PathBuf,
    category_filter: String,
}
impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            path: PathBuf::from("config"),
            category_filter: String::from(r"\w+"),
        }
    }
}
impl ConfigLoader {
    pub fn data_path<P: AsRef<Path>>(self, path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..self
        }
    }
    pub fn category_filter<S: Into<String>>(self, category_filter: S) -> Self {
        Self {
            category_filter: category_filter.into(),
            ..self
        }
    }
    pub fn load(self) -> Result<Config> {
        let re = Regex::new(&self.category_filter)?;
        let mut config = Config::default();
        for category in Category::iter().filter(|category| re.is_match(&category.to_string())) {
            let path = self.path.join(category.file());
            match category {
                Category::General => config.general = read_json(&path)?,
                Category::NonLinear => config.non_linear = read_json(&path)?,
                Category::Label => config.labels = read_json(&path)?,
                Category::LabelFormat => config.label_formats = read_json(&path)?,
                Category::RadialMinimum => config.radial_minima = read_json(&path)?,
                Category::Visualize => {
                    config.visualize = Visualize {
                        general: read_json(&path.join("general.json"))?,
                        plots: read_json(&path.join("plots.json"))?,
                        figures: read_json(&path.join("figures.json"))?,
                        subplots: read_json(&path.join("subplots.json"))?,
                    }
                }
                Category::Priors => config.priors = load_priors(&path)?,
            }
        }
        config
            .non_linear
            .validate()
            .map_err(|reason| ConfigError::Invalid {
                category: Category::NonLinear,
                reason,
            })?;
        config.priors.validate()?;
        Ok(config)
    }
}

fn read_json<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    if !path.is_file() {
        log::warn!("`{}` not found, using built-in defaults", path.display());
        return Ok(T::default());
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = dir.join("*.json");
    let mut paths = vec![];
    for entry in glob::glob(&pattern.to_string_lossy())? {
        paths.push(entry?);
    }
    Ok(paths)
}

fn load_priors(dir: &Path) -> Result<PriorRegistry> {
    if !dir.is_dir() {
        log::warn!(
            "`{}` not found, using the built-in prior registry",
            dir.display()
        );
        return Ok(PriorRegistry::builtin());
    }
    let mut registry = PriorRegistry::default();
    for path in json_files(&dir.join("default"))? {
        let table: PriorTable<Prior> = read_json(&path)?;
        registry
            .merge_defaults(table)
            .map_err(|source| ConfigError::PriorTable { path, source })?;
    }
    for path in json_files(&dir.join("limit"))? {
        let table: PriorTable<PriorLimits> = read_json(&path)?;
        registry
            .merge_limits(table)
            .map_err(|source| ConfigError::PriorTable { path, source })?;
    }
    for path in json_files(&dir.join("width"))? {
        let table: PriorTable<PriorWidth> = read_json(&path)?;
        registry
            .merge_widths(table)
            .map_err(|source| ConfigError::PriorTable { path, source })?;
    }
    if registry.is_empty() {
        log::warn!("no prior defaults found in `{}`", dir.display());
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, file: &str, contents: &str) {
        let path = dir.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn missing_directory_yields_defaults() {
        let config = ConfigLoader::default()
            .data_path("no/such/directory")
            .load()
            .unwrap();
        assert_eq!(config.general, General::default());
        assert_eq!(config.priors.len(), 6);
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "general.json",
            r#"{"output": {"log_level": "debug", "model_results_decimal_places": 2}}"#,
        );
        write(
            dir.path(),
            "non_linear.json",
            r#"{"nested": {"n_live_points": 400}}"#,
        );
        write(dir.path(), "radial_minimum.json", r#"{"power_law": 1e-6}"#);
        write(dir.path(), "label.json", r#"{"einstein_radius": "θ_E"}"#);
        write(
            dir.path(),
            "label_format.json",
            r#"{"einstein_radius": {"decimals": 2}}"#,
        );
        write(dir.path(), "visualize/plots.json", r#"{"density": true}"#);
        write(
            dir.path(),
            "priors/default/mass_profiles.json",
            r#"{"power_law": {
                "einstein_radius": {"type": "Uniform", "lower": 0.0, "upper": 2.0},
                "slope": {"type": "Gaussian", "mean": 2.0, "sigma": 0.1}
            }}"#,
        );
        write(
            dir.path(),
            "priors/limit/mass_profiles.json",
            r#"{"power_law": {"einstein_radius": {"lower": 0.0}}}"#,
        );
        write(
            dir.path(),
            "priors/width/mass_profiles.json",
            r#"{"power_law": {"einstein_radius": {"Relative": 0.25}}}"#,
        );

        let config = ConfigLoader::default().data_path(dir.path()).load().unwrap();
        assert_eq!(config.general.output.log_level, "debug");
        assert_eq!(config.non_linear.nested.n_live_points, 400);
        assert_eq!(config.non_linear.mcmc.n_walkers, 50);
        assert_eq!(config.radial_minima.for_kind(ProfileKind::PowerLaw), 1e-6);
        assert_eq!(
            config.radial_minima.for_kind(ProfileKind::Nfw),
            DEFAULT_RADIAL_MINIMUM
        );
        assert!(config.visualize.plots.density);
        assert_eq!(config.priors.len(), 2);
        let bounded = config.priors.prior_for("power_law", "einstein_radius").unwrap();
        assert_eq!(bounded.limits.lower, 0.0);
        assert_eq!(config.formatter().line("einstein_radius", 1.234), "θ_E = 1.23");
    }

    #[test]
    fn malformed_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "general.json", "{output:");
        assert!(matches!(
            ConfigLoader::default().data_path(dir.path()).load(),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn category_filter_skips_categories() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "general.json", r#"{"output": {"log_level": "trace"}}"#);
        write(dir.path(), "non_linear.json", "{not json");
        let config = ConfigLoader::default()
            .data_path(dir.path())
            .category_filter("^general$")
            .load()
            .unwrap();
        assert_eq!(config.general.output.log_level, "trace");
        assert_eq!(config.non_linear, NonLinear::default());
    }

    #[test]
    fn duplicate_prior_tables_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let table = r#"{"power_law": {"slope": {"type": "Gaussian", "mean": 2.0, "sigma": 0.1}}}"#;
        write(dir.path(), "priors/default/a.json", table);
        write(dir.path(), "priors/default/b.json", table);
        assert!(matches!(
            ConfigLoader::default().data_path(dir.path()).load(),
            Err(ConfigError::PriorTable { .. })
        ));
    }

    #[test]
    fn invalid_settings_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "non_linear.json", r#"{"mcmc": {"n_steps": 0}}"#);
        assert!(matches!(
            ConfigLoader::default().data_path(dir.path()).load(),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn midpoint_profile() {
        let config = Config::default();
        let profile = config
            .profile_from_midpoints(ProfileKind::PowerLaw)
            .unwrap();
        // builtin priors: einstein radius Uniform[0, 4], slope Gaussian(2, 0.2)
        assert!((profile.deflection(0.7) - 2.0).abs() < 1e-9);
        assert!((profile.convergence(2.0) - 0.5).abs() < 1e-9);
    }
}
