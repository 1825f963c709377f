use std::f64::consts::PI;

use super::{radial_f, MassProfile, ProfileKind, DEFAULT_RADIAL_MINIMUM};

/// Hernquist stellar mass profile
#[derive(Debug, Clone)]
pub struct Hernquist {
    pub mass: f64,
    pub effective_radius: f64,
    pub critical_surface_density: f64,
    pub half_mass_radius: f64,
    pub scale_radius: f64,
    pub rho_s: f64,
    pub kappa_s: f64,
    radial_minimum: f64,
}
impl Hernquist {
    pub fn new(mass: f64, effective_radius: f64, critical_surface_density: f64) -> Self {
        let half_mass_radius = effective_radius * 1.33;
        let scale_radius = effective_radius / 1.8153;
        let rho_s = mass / (2f64 * PI * scale_radius.powi(3));
        let kappa_s = rho_s * scale_radius / critical_surface_density;
        Self {
            mass,
            effective_radius,
            critical_surface_density,
            half_mass_radius,
            scale_radius,
            rho_s,
            kappa_s,
            radial_minimum: DEFAULT_RADIAL_MINIMUM,
        }
    }
    pub fn radial_minimum(self, value: f64) -> Self {
        Self {
            radial_minimum: value,
            ..self
        }
    }
}
impl MassProfile for Hernquist {
    fn kind(&self) -> ProfileKind {
        ProfileKind::Hernquist
    }
    fn clamp_radius(&self, radius: f64) -> f64 {
        radius.max(self.radial_minimum)
    }
    fn density(&self, radius: f64) -> f64 {
        let x = self.clamp_radius(radius) / self.scale_radius;
        self.rho_s / (x * (1f64 + x).powi(3))
    }
    fn surface_density(&self, radius: f64) -> f64 {
        let x = self.clamp_radius(radius) / self.scale_radius;
        let f = radial_f(x);
        if f == 0f64 {
            return 0f64;
        }
        self.rho_s * self.scale_radius / (x * x - 1f64).powi(2)
            * (-3f64 + (1f64 - f) * (2f64 + x * x))
    }
    fn convergence(&self, radius: f64) -> f64 {
        let x = self.clamp_radius(radius) / self.scale_radius;
        let f = radial_f(x);
        if f == 0f64 {
            return 0f64;
        }
        self.kappa_s / (x * x - 1f64).powi(2) * (-3f64 + (1f64 - f) * (2f64 + x * x))
    }
    fn deflection(&self, radius: f64) -> f64 {
        let x = self.clamp_radius(radius) / self.scale_radius;
        let f = radial_f(x);
        if f == 0f64 {
            return 0f64;
        }
        2f64 * self.kappa_s * self.scale_radius * x * f / (x * x - 1f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_scales() {
        let profile = Hernquist::new(1e11, 1.8153, 1e9);
        assert!((profile.scale_radius - 1.0).abs() < 1e-12);
        assert!((profile.half_mass_radius - 1.33 * 1.8153).abs() < 1e-12);
        assert!((profile.rho_s - 1e11 / (2.0 * PI)).abs() < 1.0);
        assert!((profile.kappa_s - profile.rho_s * profile.scale_radius / 1e9).abs() < 1e-9);
    }

    #[test]
    fn density_at_scale_radius() {
        let profile = Hernquist::new(1e11, 2.0, 1e9);
        let expected = profile.rho_s / 8.0;
        assert!((profile.density(profile.scale_radius) - expected).abs() < expected * 1e-12);
    }

    #[test]
    fn scale_radius_sample_maps_to_zero() {
        let profile = Hernquist::new(1e11, 2.0, 1e9);
        assert_eq!(profile.convergence(profile.scale_radius), 0.0);
        assert_eq!(profile.surface_density(profile.scale_radius), 0.0);
        assert_eq!(profile.deflection(profile.scale_radius), 0.0);
    }

    #[test]
    fn convergence_decreases_outwards() {
        let profile = Hernquist::new(1e11, 2.0, 1e9);
        let kappa: Vec<_> = profile.convergence_profile(&[0.1, 0.5, 2.0, 5.0]);
        assert!(kappa.windows(2).all(|pair| pair[0] > pair[1]));
        assert!(kappa.iter().all(|&k| k > 0.0));
    }

    #[test]
    fn radial_minimum_guards_the_origin() {
        let profile = Hernquist::new(1e11, 2.0, 1e9).radial_minimum(1e-6);
        assert!(profile.density(0.0).is_finite());
        assert_eq!(profile.deflection(0.0), profile.deflection(1e-6));
    }
}
