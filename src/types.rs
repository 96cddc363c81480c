use clap::ValueEnum;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct MunicipalityRecord {
    pub key: String,
    pub name: String,
    // Square kilometres
    pub area: f64,
    pub population: i64,
    pub population_density: f64,
}

/// The statistic a map is colored by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Attribute {
    #[value(name = "Population")]
    Population,
    #[value(name = "Area")]
    Area,
    #[value(name = "PopulationDensity")]
    PopulationDensity,
}

impl Attribute {
    pub fn value(self, record: &MunicipalityRecord) -> f64 {
        match self {
            Attribute::Population => record.population as f64,
            Attribute::Area => record.area,
            Attribute::PopulationDensity => record.population_density,
        }
    }

    /// Renders a value the way the attribute is stored: head counts as
    /// integers, areas and densities as floats.
    pub fn format_value(self, value: f64) -> String {
        match self {
            Attribute::Population if value.fract() == 0.0 => format!("{}", value as i64),
            _ => format!("{:?}", value),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Attribute::Population => "Population",
            Attribute::Area => "Area",
            Attribute::PopulationDensity => "PopulationDensity",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_reads_typed_field() {
        let record = MunicipalityRecord {
            key: "01001000".to_string(),
            name: "Flensburg".to_string(),
            area: 56.74,
            population: 91_113,
            population_density: 91_113.0 / 56.74,
        };

        assert_eq!(Attribute::Population.value(&record), 91_113.0);
        assert_eq!(Attribute::Area.value(&record), 56.74);
        assert_eq!(Attribute::PopulationDensity.value(&record), 91_113.0 / 56.74);
    }

    #[test]
    fn population_formats_as_integer() {
        assert_eq!(Attribute::Population.format_value(91_113.0), "91113");
        assert_eq!(Attribute::Population.format_value(2.5), "2.5");
        assert_eq!(Attribute::Area.format_value(100.0), "100.0");
        assert_eq!(Attribute::PopulationDensity.format_value(20.0), "20.0");
    }

    #[test]
    fn attribute_names_match_command_line() {
        assert_eq!(
            Attribute::from_str("PopulationDensity", false),
            Ok(Attribute::PopulationDensity)
        );
        assert!(Attribute::from_str("Density", false).is_err());
        assert_eq!(Attribute::Area.to_string(), "Area");
    }
}
