use lens_model::ConfigLoader;
use polars::prelude::*;

fn main() -> anyhow::Result<()> {
    // Loading the configuration tree, the built-in defaults fill in for
    // missing categories
    let config = ConfigLoader::default().data_path("config").load()?;

    println!("prior registry # of parameters: {}", config.priors.len());

    // For statistical analysis, the prior registry is best imported into a
    // polars dataframe
    let (mut profiles, mut parameters, mut priors) = (vec![], vec![], vec![]);
    let (mut lowers, mut uppers, mut widths) = (vec![], vec![], vec![]);
    for entry in config.priors.iter() {
        profiles.push(entry.profile.to_string());
        parameters.push(entry.parameter.to_string());
        priors.push(entry.prior.to_string());
        lowers.push(entry.limits.lower);
        uppers.push(entry.limits.upper);
        widths.push(entry.width.map(|width| width.to_string()).unwrap_or_default());
    }
    let df = df!(
        "profile" => profiles,
        "parameter" => parameters,
        "prior" => priors,
        "lower" => lowers,
        "upper" => uppers,
        "width" => widths,
    )?;
    println!("{}", df.head(None));

    Ok(())
}
