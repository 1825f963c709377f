use serde::Deserialize;
use std::collections::BTreeMap;

/// Parameter display labels, keyed by parameter name
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(transparent)]
pub struct Labels(BTreeMap<String, String>);
impl Labels {
    /// Label of a parameter, the parameter name itself when none is configured
    pub fn label_of<'a>(&'a self, parameter: &'a str) -> &'a str {
        self.0.get(parameter).map(String::as_str).unwrap_or(parameter)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// How a parameter value is rendered
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct LabelFormat {
    pub decimals: usize,
    pub scientific: bool,
}
impl Default for LabelFormat {
    fn default() -> Self {
        Self {
            decimals: 4,
            scientific: false,
        }
    }
}
impl LabelFormat {
    pub fn format(&self, value: f64) -> String {
        if self.scientific {
            format!("{:.*e}", self.decimals, value)
        } else {
            format!("{:.*}", self.decimals, value)
        }
    }
}

/// Per-parameter value formats
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(transparent)]
pub struct LabelFormats(BTreeMap<String, LabelFormat>);
impl LabelFormats {
    pub fn format_of(&self, parameter: &str) -> Option<&LabelFormat> {
        self.0.get(parameter)
    }
}

/// Renders `label = value` result lines from the label and format tables
pub struct Formatter<'a> {
    pub labels: &'a Labels,
    pub formats: &'a LabelFormats,
    pub default_decimals: usize,
}
impl Formatter<'_> {
    pub fn value(&self, parameter: &str, value: f64) -> String {
        match self.formats.format_of(parameter) {
            Some(format) => format.format(value),
            None => format!("{:.*}", self.default_decimals, value),
        }
    }
    pub fn line(&self, parameter: &str, value: f64) -> String {
        format!(
            "{} = {}",
            self.labels.label_of(parameter),
            self.value(parameter, value)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Labels {
        serde_json::from_str(r#"{"einstein_radius": "θ_E", "slope": "γ"}"#).unwrap()
    }

    fn formats() -> LabelFormats {
        serde_json::from_str(
            r#"{"einstein_radius": {"decimals": 2}, "mass": {"decimals": 3, "scientific": true}}"#,
        )
        .unwrap()
    }

    #[test]
    fn label_fallback() {
        let labels = labels();
        assert_eq!(labels.label_of("einstein_radius"), "θ_E");
        assert_eq!(labels.label_of("effective_radius"), "effective_radius");
    }

    #[test]
    fn value_formats() {
        assert_eq!(
            LabelFormat {
                decimals: 2,
                scientific: false
            }
            .format(1.2345),
            "1.23"
        );
        assert_eq!(
            LabelFormat {
                decimals: 3,
                scientific: true
            }
            .format(1.2344e11),
            "1.234e11"
        );
    }

    #[test]
    fn formatter_lines() {
        let labels = labels();
        let formats = formats();
        let formatter = Formatter {
            labels: &labels,
            formats: &formats,
            default_decimals: 4,
        };
        assert_eq!(formatter.line("einstein_radius", 1.2345), "θ_E = 1.23");
        assert_eq!(formatter.line("mass", 1.2344e11), "mass = 1.234e11");
        // no configured format: the general decimal places apply
        assert_eq!(formatter.line("slope", 2.0), "γ = 2.0000");
    }
}
