use std::f64::consts::PI;

use super::{MassProfile, ProfileKind, DEFAULT_RADIAL_MINIMUM};

/// Spherical power-law mass profile
///
/// Scale-free density slope about the einstein radius; `slope = 2` is the
/// isothermal case.
#[derive(Debug, Clone)]
pub struct SphericalPowerLaw {
    pub einstein_radius: f64,
    pub slope: f64,
    pub critical_surface_density: f64,
    radial_minimum: f64,
}
impl SphericalPowerLaw {
    pub fn new(einstein_radius: f64, slope: f64, critical_surface_density: f64) -> Self {
        Self {
            einstein_radius,
            slope,
            critical_surface_density,
            radial_minimum: DEFAULT_RADIAL_MINIMUM,
        }
    }
    pub fn radial_minimum(self, value: f64) -> Self {
        Self {
            radial_minimum: value,
            ..self
        }
    }
    /// Mass enclosed within the einstein radius
    pub fn einstein_mass(&self) -> f64 {
        PI * self.einstein_radius.powi(2) * self.critical_surface_density
    }
}
impl MassProfile for SphericalPowerLaw {
    fn kind(&self) -> ProfileKind {
        ProfileKind::PowerLaw
    }
    fn clamp_radius(&self, radius: f64) -> f64 {
        radius.max(self.radial_minimum)
    }
    fn density(&self, radius: f64) -> f64 {
        let radius = self.clamp_radius(radius);
        self.critical_surface_density * (1f64 / radius).powf(self.slope)
    }
    fn surface_density(&self, radius: f64) -> f64 {
        self.critical_surface_density * self.convergence(radius)
    }
    fn convergence(&self, radius: f64) -> f64 {
        let radius = self.clamp_radius(radius);
        0.5 * (3f64 - self.slope) * (self.einstein_radius / radius).powf(self.slope - 1f64)
    }
    fn deflection(&self, radius: f64) -> f64 {
        let radius = self.clamp_radius(radius);
        self.einstein_radius * (self.einstein_radius / radius).powf(self.slope - 2f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deflection_at_einstein_radius() {
        for slope in [1.6, 2.0, 2.4] {
            let profile = SphericalPowerLaw::new(1.5, slope, 1.0);
            assert!((profile.deflection(1.5) - 1.5).abs() < 1e-12);
        }
    }

    #[test]
    fn isothermal_deflection_is_constant() {
        let profile = SphericalPowerLaw::new(1.2, 2.0, 1.0);
        assert!((profile.deflection(0.3) - 1.2).abs() < 1e-12);
        assert!((profile.deflection(30.0) - 1.2).abs() < 1e-12);
    }

    #[test]
    fn convergence_at_einstein_radius() {
        let profile = SphericalPowerLaw::new(2.0, 2.2, 1.0);
        assert!((profile.convergence(2.0) - 0.5 * (3.0 - 2.2)).abs() < 1e-12);
    }

    #[test]
    fn surface_density_scales_with_critical_density() {
        let profile = SphericalPowerLaw::new(1.0, 2.0, 2.5e9);
        assert!((profile.surface_density(1.0) - 2.5e9 * profile.convergence(1.0)).abs() < 1.0);
    }

    #[test]
    fn einstein_mass() {
        let profile = SphericalPowerLaw::new(2.0, 2.0, 3.0);
        assert!((profile.einstein_mass() - PI * 4.0 * 3.0).abs() < 1e-12);
    }

    #[test]
    fn radial_minimum_guards_the_origin() {
        let profile = SphericalPowerLaw::new(1.0, 2.4, 1.0).radial_minimum(1e-4);
        let at_origin = profile.deflection(0.0);
        assert!(at_origin.is_finite());
        assert_eq!(at_origin, profile.deflection(1e-4));
        assert!(profile.deflection(1e-6) == profile.deflection(1e-4));
    }
}
