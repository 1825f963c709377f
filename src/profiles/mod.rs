use nalgebra::Vector2;
use std::{fmt, str::FromStr};
use strum_macros::EnumIter;

mod power_law;
pub use power_law::*;
mod hernquist;
pub use hernquist::*;
mod nfw;
pub use nfw::*;

#[derive(thiserror::Error, Debug)]
pub enum ProfileError {
    #[error("unknown mass profile `{0}`")]
    UnknownKind(String),
}

/// Radial floor applied to every profile evaluation when none is configured
pub const DEFAULT_RADIAL_MINIMUM: f64 = 1e-8;

/// The mass profile families
#[derive(EnumIter, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProfileKind {
    PowerLaw,
    Hernquist,
    Nfw,
}
impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileKind::PowerLaw => write!(f, "power_law"),
            ProfileKind::Hernquist => write!(f, "hernquist"),
            ProfileKind::Nfw => write!(f, "nfw"),
        }
    }
}
impl FromStr for ProfileKind {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "power_law" => Ok(ProfileKind::PowerLaw),
            "hernquist" => Ok(ProfileKind::Hernquist),
            "nfw" => Ok(ProfileKind::Nfw),
            other => Err(ProfileError::UnknownKind(other.into())),
        }
    }
}

/// The radial quantities a mass profile evaluates
#[derive(EnumIter, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quantity {
    Density,
    SurfaceDensity,
    Convergence,
    Deflection,
}
impl Quantity {
    pub fn evaluate(&self, profile: &dyn MassProfile, radius: f64) -> f64 {
        match self {
            Quantity::Density => profile.density(radius),
            Quantity::SurfaceDensity => profile.surface_density(radius),
            Quantity::Convergence => profile.convergence(radius),
            Quantity::Deflection => profile.deflection(radius),
        }
    }
    pub fn axis_label(&self) -> &'static str {
        match self {
            Quantity::Density => "Density",
            Quantity::SurfaceDensity => "Surface mass density",
            Quantity::Convergence => "Convergence",
            Quantity::Deflection => "Deflection angle",
        }
    }
}
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Density => write!(f, "density"),
            Quantity::SurfaceDensity => write!(f, "surface_density"),
            Quantity::Convergence => write!(f, "convergence"),
            Quantity::Deflection => write!(f, "deflection"),
        }
    }
}

/// A spherically symmetric mass profile of a gravitational lens
pub trait MassProfile: Send + Sync {
    fn kind(&self) -> ProfileKind;
    /// Clamps a radius to the profile radial minimum
    fn clamp_radius(&self, radius: f64) -> f64;
    /// Volume mass density at `radius`
    fn density(&self, radius: f64) -> f64;
    /// Projected surface mass density at `radius`
    fn surface_density(&self, radius: f64) -> f64;
    /// Surface mass density in units of the critical surface density
    fn convergence(&self, radius: f64) -> f64;
    /// Deflection angle at `radius`
    fn deflection(&self, radius: f64) -> f64;

    fn density_profile(&self, radii: &[f64]) -> Vec<f64> {
        radii.iter().map(|&radius| self.density(radius)).collect()
    }
    fn surface_density_profile(&self, radii: &[f64]) -> Vec<f64> {
        radii
            .iter()
            .map(|&radius| self.surface_density(radius))
            .collect()
    }
    fn convergence_profile(&self, radii: &[f64]) -> Vec<f64> {
        radii
            .iter()
            .map(|&radius| self.convergence(radius))
            .collect()
    }
    fn deflection_profile(&self, radii: &[f64]) -> Vec<f64> {
        radii
            .iter()
            .map(|&radius| self.deflection(radius))
            .collect()
    }
    /// Deflection vector at a position in the lens plane
    fn deflection_xy(&self, position: Vector2<f64>) -> Vector2<f64> {
        let radius = self.clamp_radius(position.norm());
        position * (self.deflection(radius) / radius)
    }
}

// Auxiliary radial function shared by the Hernquist and NFW profiles,
// undefined at x = 1 where it is mapped to 0
pub(crate) fn radial_f(x: f64) -> f64 {
    if x < 1f64 {
        1f64 - (1f64 / x).acosh() / (1f64 - x * x).sqrt()
    } else if x > 1f64 {
        1f64 - (1f64 / x).acos() / (x * x - 1f64).sqrt()
    } else {
        0f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radial_f_vanishes_at_unity() {
        assert_eq!(radial_f(1.0), 0.0);
        assert!(radial_f(1.0 - 1e-3).abs() < 1e-2);
        assert!(radial_f(1.0 + 1e-3).abs() < 1e-2);
    }

    #[test]
    fn radial_f_far_field() {
        // acos(1/x)/sqrt(x^2-1) -> 0, so f -> 1
        assert!((radial_f(1e3) - 1.0).abs() < 1e-2);
    }

    #[test]
    fn kind_round_trip() {
        use strum::IntoEnumIterator;
        for kind in ProfileKind::iter() {
            assert_eq!(kind.to_string().parse::<ProfileKind>().unwrap(), kind);
        }
        assert!("sersic".parse::<ProfileKind>().is_err());
    }

    #[test]
    fn deflection_vector_is_radial() {
        let profile = SphericalPowerLaw::new(1.0, 2.0, 1.0);
        let position = Vector2::new(3.0, 4.0);
        let alpha = profile.deflection_xy(position);
        // isothermal: |alpha| equals the einstein radius
        assert!((alpha.norm() - 1.0).abs() < 1e-12);
        // aligned with the position vector
        assert!((alpha.normalize() - position.normalize()).norm() < 1e-12);
    }

    #[test]
    fn deflection_vector_at_origin() {
        let profile = SphericalPowerLaw::new(1.0, 2.0, 1.0);
        let alpha = profile.deflection_xy(Vector2::new(0.0, 0.0));
        assert_eq!(alpha, Vector2::new(0.0, 0.0));
    }
}
