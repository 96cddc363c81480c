use super::datasource::{Datasource, Feature};
use image::Rgba;
use std::fmt;

/// Solid polygon fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonSymbolizer {
    pub fill: Rgba<u8>,
    /// Edge softness; 0.0 draws hard, aliased edges.
    pub gamma: f32,
}

impl PolygonSymbolizer {
    pub fn anti_alias(&self) -> bool {
        self.gamma > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// `[attribute] = 'value'`
    Equals { attribute: String, value: String },
}

impl Filter {
    pub fn equals(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Equals {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, feature: &Feature) -> bool {
        match self {
            Filter::Equals { attribute, value } => {
                feature.attribute(attribute).is_some_and(|v| v == value.as_str())
            }
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Equals { attribute, value } => write!(f, "[{}] = '{}'", attribute, value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub filter: Filter,
    pub symbolizer: PolygonSymbolizer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub name: String,
    pub rules: Vec<Rule>,
}

impl Style {
    /// Symbolizers of every rule whose filter accepts the feature, in rule
    /// order.
    pub fn symbolizers_for<'a>(
        &'a self,
        feature: &'a Feature,
    ) -> impl Iterator<Item = &'a PolygonSymbolizer> + 'a {
        self.rules
            .iter()
            .filter(move |rule| rule.filter.matches(feature))
            .map(|rule| &rule.symbolizer)
    }
}

#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    pub datasource: Datasource,
    /// Names of the styles applied to this layer, in drawing order.
    pub styles: Vec<String>,
}
