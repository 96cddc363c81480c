use crate::cli::Cli;
use crate::color::ColorMapping;
use crate::config::RenderConfig;
use crate::data;
use crate::map::{Datasource, Filter, Layer, Map, Rule, Style};
use crate::types::{Attribute, MunicipalityRecord};
use anyhow::{Context, Result};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub borders: Vec<f64>,
    /// Hits per color bucket.
    pub usage: Vec<usize>,
    pub rules: usize,
    pub unmatched: usize,
    pub shapes: usize,
}

/// One rule per municipality that falls into a color bucket. Municipalities
/// without a bucket get no rule and keep the background color.
pub fn build_style(
    name: &str,
    municipalities: &[MunicipalityRecord],
    attribute: Attribute,
    join_attribute: &str,
    color_mapping: &mut ColorMapping,
) -> Style {
    let rules = municipalities
        .iter()
        .filter_map(|m| {
            let value = attribute.value(m);
            debug!("{}: {}", m.name, value);
            let bucket = color_mapping.lookup(value)?;
            Some(Rule {
                filter: Filter::equals(join_attribute, m.key.as_str()),
                symbolizer: bucket.symbolizer,
            })
        })
        .collect();

    Style {
        name: name.to_string(),
        rules,
    }
}

pub fn render_map(cli: &Cli, config: &RenderConfig) -> Result<RenderSummary> {
    // 1. Load Data
    let municipalities = data::load_municipalities(&cli.places)?;

    // 2. Color Buckets
    let borders = cli
        .method
        .lower_borders(&municipalities, cli.attribute, cli.num_colors)
        .with_context(|| {
            format!("Failed to compute {} borders for {}", cli.method, cli.attribute)
        })?;
    let mut color_mapping = ColorMapping::new(&borders)?;

    // 3. Style
    let style = build_style(
        &config.style_name,
        &municipalities,
        cli.attribute,
        &config.join_attribute,
        &mut color_mapping,
    );
    let rules = style.rules.len();
    let unmatched = municipalities.len() - rules;
    if unmatched > 0 {
        info!("{} municipalities fall below every color border", unmatched);
    }

    color_mapping.print_key();

    // 4. Render
    let datasource = Datasource::from_path(&cli.borders, &[config.join_attribute.clone()])
        .with_context(|| format!("Failed to load borders: {:?}", cli.borders))?;
    let shapes = datasource.len();
    let layer = Layer {
        name: config.layer_name.clone(),
        datasource,
        styles: vec![style.name.clone()],
    };

    let map = Map::new(
        cli.width,
        cli.height,
        config.background_color()?,
        vec![style],
        vec![layer],
    );
    let viewport = map.zoom_all()?;
    map.render_to_file(&viewport, &cli.image)
        .with_context(|| format!("Failed to render map to {:?}", cli.image))?;

    info!("Rendered {} rules over {} shapes to {:?}", rules, shapes, cli.image);

    Ok(RenderSummary {
        borders,
        usage: color_mapping.usage(),
        rules,
        unmatched,
        shapes,
    })
}
