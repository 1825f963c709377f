use std::f64::consts::PI;

use super::{radial_f, MassProfile, ProfileKind, DEFAULT_RADIAL_MINIMUM};

/// NFW dark-matter halo profile
#[derive(Debug, Clone)]
pub struct Nfw {
    pub kappa_s: f64,
    pub scale_radius: f64,
    pub critical_surface_density: f64,
    pub rho_s: f64,
    radial_minimum: f64,
}
impl Nfw {
    pub fn new(kappa_s: f64, scale_radius: f64, critical_surface_density: f64) -> Self {
        let rho_s = kappa_s * critical_surface_density / scale_radius;
        Self {
            kappa_s,
            scale_radius,
            critical_surface_density,
            rho_s,
            radial_minimum: DEFAULT_RADIAL_MINIMUM,
        }
    }
    /// Halo parameterized by its mass within the radius enclosing 200x the
    /// critical density of the universe at the lens redshift
    ///
    /// `critical_density` is the universe critical density at the lens
    /// redshift, `critical_surface_density` the lensing one; both are
    /// caller-supplied numbers, no cosmology is evaluated here.
    pub fn from_m200(
        m200: f64,
        concentration: f64,
        critical_density: f64,
        critical_surface_density: f64,
    ) -> Self {
        let r200 = (m200 / (1.333 * PI * 200f64 * critical_density)).powf(1f64 / 3f64);
        let scale_radius = r200 / concentration;
        let rho_s = m200
            / (4f64
                * PI
                * scale_radius.powi(3)
                * ((1f64 + concentration).ln() - concentration / (1f64 + concentration)));
        let kappa_s = rho_s * scale_radius / critical_surface_density;
        Self {
            kappa_s,
            scale_radius,
            critical_surface_density,
            rho_s,
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
impl MassProfile for Nfw {
    fn kind(&self) -> ProfileKind {
        ProfileKind::Nfw
    }
    fn clamp_radius(&self, radius: f64) -> f64 {
        radius.max(self.radial_minimum)
    }
    fn density(&self, radius: f64) -> f64 {
        let x = self.clamp_radius(radius) / self.scale_radius;
        self.rho_s / (x * (1f64 + x).powi(2))
    }
    fn surface_density(&self, radius: f64) -> f64 {
        let x = self.clamp_radius(radius) / self.scale_radius;
        let f = radial_f(x);
        if f == 0f64 {
            return 0f64;
        }
        2f64 * self.rho_s * self.scale_radius * f / (x * x - 1f64)
    }
    fn convergence(&self, radius: f64) -> f64 {
        let x = self.clamp_radius(radius) / self.scale_radius;
        let f = radial_f(x);
        if f == 0f64 {
            return 0f64;
        }
        2f64 * self.kappa_s * f / (x * x - 1f64)
    }
    fn deflection(&self, radius: f64) -> f64 {
        let x = self.clamp_radius(radius) / self.scale_radius;
        let f = radial_f(x);
        4f64 * self.kappa_s * self.scale_radius * ((x / 2f64).ln() + (1f64 - f)) / x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rho_s_kappa_s_consistency() {
        let profile = Nfw::new(0.2, 10.0, 2e9);
        assert!((profile.rho_s * profile.scale_radius / 2e9 - profile.kappa_s).abs() < 1e-12);

        let halo = Nfw::from_m200(1e14, 6.0, 140.0, 2e9);
        assert!(
            (halo.rho_s * halo.scale_radius / halo.critical_surface_density - halo.kappa_s).abs()
                < 1e-12
        );
    }

    #[test]
    fn from_m200_scales() {
        let halo = Nfw::from_m200(1e14, 6.0, 140.0, 2e9);
        let r200 = (1e14 / (1.333 * PI * 200.0 * 140.0)).powf(1.0 / 3.0);
        assert!((halo.scale_radius - r200 / 6.0).abs() < 1e-9);
        // an 8x heavier halo at fixed concentration is 2x larger
        let heavy = Nfw::from_m200(8e14, 6.0, 140.0, 2e9);
        assert!((heavy.scale_radius / halo.scale_radius - 2.0).abs() < 1e-9);
    }

    #[test]
    fn density_at_scale_radius() {
        let profile = Nfw::new(0.2, 10.0, 2e9);
        let expected = profile.rho_s / 4.0;
        assert!((profile.density(10.0) - expected).abs() < expected * 1e-12);
    }

    #[test]
    fn convergence_is_positive_both_sides_of_the_scale_radius() {
        let profile = Nfw::new(0.2, 10.0, 2e9);
        // x < 1: f < 0 and x^2 - 1 < 0
        assert!(profile.convergence(5.0) > 0.0);
        // x > 1: f > 0 and x^2 - 1 > 0
        assert!(profile.convergence(20.0) > 0.0);
        // x = 1 is mapped to 0
        assert_eq!(profile.convergence(10.0), 0.0);
    }

    #[test]
    fn radial_minimum_guards_the_origin() {
        let profile = Nfw::new(0.2, 10.0, 2e9).radial_minimum(1e-6);
        assert!(profile.deflection(0.0).is_finite());
        assert_eq!(profile.deflection(0.0), profile.deflection(1e-6));
    }
}
