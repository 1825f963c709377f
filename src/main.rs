use lens_model::{ConfigLoader, ProfileKind};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "lens-model",
    about = "Gravitational lens model configuration inspector"
)]
struct Opt {
    /// Path to the configuration directory
    #[structopt(long)]
    config: Option<String>,
    /// Category regular expression filter
    #[structopt(short, long)]
    category: Option<String>,
    /// Mass profile built from the prior mid-points: power_law, hernquist or nfw
    #[structopt(short, long)]
    profile: Option<ProfileKind>,
    /// Prior registry CSV export path
    #[structopt(long)]
    csv: Option<String>,
    /// Plot the configured radial quantities
    #[cfg(feature = "plot")]
    #[structopt(long)]
    plot: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opt = Opt::from_args();

    let mut loader = ConfigLoader::default();
    if let Some(arg) = opt.config {
        loader = loader.data_path(arg);
    }
    if let Some(arg) = opt.category {
        loader = loader.category_filter(arg);
    }
    let config = loader.load()?;

    if let Some(path) = opt.csv {
        config.priors.to_csv(&path)?;
        log::info!("prior registry written to `{}`", path);
    }

    match opt.profile {
        Some(kind) => {
            let profile = config.profile_from_midpoints(kind)?;
            let formatter = config.formatter();
            let key = kind.to_string();
            println!("{}:", kind);
            for entry in config.priors.iter().filter(|entry| entry.profile == key) {
                let value = config
                    .priors
                    .prior_for(&key, entry.parameter)?
                    .value_from_unit(0.5)?;
                println!(" - {}", formatter.line(entry.parameter, value));
            }
            println!(
                "    {:>10} {:>14} {:>14} {:>14}",
                "RADIUS", "CONVERGENCE", "SURF. DENSITY", "DEFLECTION"
            );
            for &radius in &log_radii(1e-2, 1e1, 10) {
                println!(
                    "    {:>10.4} {:>14.6e} {:>14.6e} {:>14.6e}",
                    radius,
                    profile.convergence(radius),
                    profile.surface_density(radius),
                    profile.deflection(radius)
                );
            }
        }
        None => config.summary(),
    }

    #[cfg(feature = "plot")]
    if opt.plot {
        use lens_model::visualize::plot_profiles;
        use strum::IntoEnumIterator;
        let profiles = ProfileKind::iter()
            .map(|kind| config.profile_from_midpoints(kind))
            .collect::<Result<Vec<_>, _>>()?;
        let radii = log_radii(1e-2, 1e2, 200);
        for quantity in config.visualize.plots.selected() {
            plot_profiles(&profiles, &radii, quantity, &config.visualize.figures);
        }
    }

    Ok(())
}

fn log_radii(inner: f64, outer: f64, n: usize) -> Vec<f64> {
    let step = (outer / inner).powf(1f64 / (n - 1) as f64);
    (0..n).map(|i| inner * step.powi(i as i32)).collect()
}
