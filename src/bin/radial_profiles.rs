use indicatif::ParallelProgressIterator;
use lens_model::{ConfigLoader, ProfileKind};
use rayon::prelude::*;
use structopt::StructOpt;
use strum::IntoEnumIterator;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "radial-profiles",
    about = "Tabulating the radial quantities of the mass profiles"
)]
struct Opt {
    /// Path to the configuration directory
    #[structopt(long)]
    config: Option<String>,
    /// Innermost radius
    #[structopt(long, default_value = "1e-3")]
    inner: f64,
    /// Outermost radius
    #[structopt(long, default_value = "1e2")]
    outer: f64,
    /// Number of radial samples
    #[structopt(short, long, default_value = "1000")]
    n_radii: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opt = Opt::from_args();

    let mut loader = ConfigLoader::default();
    if let Some(arg) = opt.config {
        loader = loader.data_path(arg);
    }
    let config = loader.load()?;

    let step = (opt.outer / opt.inner).powf(1f64 / (opt.n_radii - 1) as f64);
    let radii: Vec<f64> = (0..opt.n_radii)
        .map(|i| opt.inner * step.powi(i as i32))
        .collect();

    for kind in ProfileKind::iter() {
        let profile = config.profile_from_midpoints(kind)?;
        let rows: Vec<[f64; 5]> = radii
            .par_iter()
            .progress_count(radii.len() as u64)
            .map(|&radius| {
                [
                    radius,
                    profile.density(radius),
                    profile.surface_density(radius),
                    profile.convergence(radius),
                    profile.deflection(radius),
                ]
            })
            .collect();

        let filename = format!("{}.csv", kind);
        let mut wtr = csv::Writer::from_path(&filename)?;
        wtr.write_record([
            "Radius",
            "Density",
            "Surface density",
            "Convergence",
            "Deflection angle",
        ])?;
        for row in rows {
            wtr.write_record(row.iter().map(|value| value.to_string()))?;
        }
        wtr.flush()?;
        log::info!("`{}` written", filename);
    }

    Ok(())
}
