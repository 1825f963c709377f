use serde::Deserialize;

use crate::profiles::Quantity;

/// General visualization settings
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct VisualizeGeneral {
    pub backend: String,
    pub include_origin: bool,
}
impl Default for VisualizeGeneral {
    fn default() -> Self {
        Self {
            backend: String::from("svg"),
            include_origin: false,
        }
    }
}

/// Which radial quantities get a figure
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Plots {
    pub density: bool,
    pub surface_density: bool,
    pub convergence: bool,
    pub deflections: bool,
}
impl Default for Plots {
    fn default() -> Self {
        Self {
            density: false,
            surface_density: true,
            convergence: true,
            deflections: true,
        }
    }
}
impl Plots {
    /// The quantities selected for plotting
    pub fn selected(&self) -> Vec<Quantity> {
        let mut quantities = vec![];
        if self.density {
            quantities.push(Quantity::Density);
        }
        if self.surface_density {
            quantities.push(Quantity::SurfaceDensity);
        }
        if self.convergence {
            quantities.push(Quantity::Convergence);
        }
        if self.deflections {
            quantities.push(Quantity::Deflection);
        }
        quantities
    }
}

/// Single figure settings
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Figures {
    pub width: u32,
    pub height: u32,
    pub format: String,
}
impl Default for Figures {
    fn default() -> Self {
        Self {
            width: 768,
            height: 512,
            format: String::from("svg"),
        }
    }
}

/// Subplot grid settings
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Subplots {
    pub rows: usize,
    pub columns: usize,
    pub width: u32,
    pub height: u32,
}
impl Default for Subplots {
    fn default() -> Self {
        Self {
            rows: 2,
            columns: 2,
            width: 1024,
            height: 768,
        }
    }
}

/// The visualization configuration category
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Visualize {
    pub general: VisualizeGeneral,
    pub plots: Plots,
    pub figures: Figures,
    pub subplots: Subplots,
}

#[cfg(feature = "plot")]
pub use plot::plot_profiles;

#[cfg(feature = "plot")]
mod plot {
    use itertools::Itertools;
    use itertools::MinMaxResult::MinMax;
    use plotters::prelude::*;

    use super::Figures;
    use crate::profiles::{MassProfile, Quantity};

    /// Plots a radial quantity of a set of mass profiles to `<quantity>.svg`
    pub fn plot_profiles(
        profiles: &[Box<dyn MassProfile>],
        radii: &[f64],
        quantity: Quantity,
        figures: &Figures,
    ) {
        if profiles.is_empty() || radii.is_empty() {
            return;
        }

        let filename = format!("{}.svg", quantity);
        let plot =
            SVGBackend::new(&filename, (figures.width, figures.height)).into_drawing_area();
        plot.fill(&WHITE).unwrap();

        let values: Vec<Vec<f64>> = profiles
            .iter()
            .map(|profile| {
                radii
                    .iter()
                    .map(|&radius| quantity.evaluate(profile.as_ref(), radius))
                    .collect()
            })
            .collect();
        let (y_min, y_max) = match values.iter().flatten().minmax() {
            MinMax(min, max) => (*min, *max),
            _ => return,
        };
        let (x_min, x_max) = match radii.iter().minmax() {
            MinMax(min, max) => (*min, *max),
            _ => return,
        };

        let mut chart = ChartBuilder::on(&plot)
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .margin(10)
            .build_cartesian_2d((x_min..x_max).log_scale(), (y_min..y_max).log_scale())
            .unwrap();
        chart
            .configure_mesh()
            .x_desc("Radius")
            .y_desc(quantity.axis_label())
            .draw()
            .unwrap();

        let mut colors = colorous::TABLEAU10.iter().cycle();

        for (profile, values) in profiles.iter().zip(values.iter()) {
            let color = colors.next().unwrap();
            let rgb = RGBColor(color.r, color.g, color.b);
            chart
                .draw_series(LineSeries::new(
                    radii.iter().cloned().zip(values.iter().cloned()),
                    &rgb,
                ))
                .unwrap()
                .label(profile.kind().to_string())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &rgb));
        }
        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.8))
            .position(SeriesLabelPosition::UpperRight)
            .draw()
            .unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_selection() {
        let plots = Plots::default();
        assert_eq!(
            plots.selected(),
            vec![
                Quantity::SurfaceDensity,
                Quantity::Convergence,
                Quantity::Deflection
            ]
        );
    }

    #[test]
    fn partial_documents_load() {
        let plots: Plots = serde_json::from_str(r#"{"density": true}"#).unwrap();
        assert!(plots.density);
        assert!(plots.convergence);

        let figures: Figures = serde_json::from_str(r#"{"width": 1024}"#).unwrap();
        assert_eq!(figures.width, 1024);
        assert_eq!(figures.height, 512);
    }
}
