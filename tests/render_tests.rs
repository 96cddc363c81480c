//! End-to-end rendering tests: places JSON + GeoJSON borders in, PNG out.

use choropleth::cli::Cli;
use choropleth::config::RenderConfig;
use choropleth::render::render_map;
use clap::Parser;
use image::Rgba;
use std::fs;
use std::path::{Path, PathBuf};

const GREY: Rgba<u8> = Rgba([211, 211, 211, 255]);

const PLACES: &str = r#"[
    {"MunicipalityKey": "01", "Name": "Alpha", "Area": "10", "Population": "100"},
    {"MunicipalityKey": "02", "Name": "Beta", "Area": 20, "Population": 200},
    {"MunicipalityKey": "02", "Name": "Beta (duplicate)", "Area": 2, "Population": 5000},
    {"MunicipalityKey": "03", "Name": "Gamma", "Area": "30.0", "Population": "900"},
    {"MunicipalityKey": "05", "Name": "Too Big", "Area": "1200", "Population": "10"}
]"#;

/// Four unit squares in a row; "04" has no statistics.
fn borders_geojson() -> String {
    let features: Vec<String> = ["01", "02", "03", "04"]
        .iter()
        .enumerate()
        .map(|(i, ags)| {
            let (x0, x1) = (i as f64, i as f64 + 1.0);
            let ring = format!("[[{x0},0],[{x1},0],[{x1},1],[{x0},1],[{x0},0]]");
            format!(
                r#"{{"type": "Feature", "properties": {{"AGS": "{ags}"}},
                    "geometry": {{"type": "Polygon", "coordinates": [{ring}]}}}}"#
            )
        })
        .collect();
    format!(r#"{{"type": "FeatureCollection", "features": [{}]}}"#, features.join(","))
}

struct Fixture {
    _dir: tempfile::TempDir,
    places: PathBuf,
    borders: PathBuf,
    image: PathBuf,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let places = dir.path().join("places.json");
    let borders = dir.path().join("borders.geojson");
    let image = dir.path().join("map.png");
    fs::write(&places, PLACES).unwrap();
    fs::write(&borders, borders_geojson()).unwrap();
    Fixture {
        _dir: dir,
        places,
        borders,
        image,
    }
}

fn cli(num_colors: &str, method: &str, attribute: &str, f: &Fixture) -> Cli {
    let path = |p: &Path| p.to_str().unwrap().to_string();
    Cli::try_parse_from([
        "choropleth".to_string(),
        num_colors.to_string(),
        method.to_string(),
        attribute.to_string(),
        "80".to_string(),
        "20".to_string(),
        path(&f.places),
        path(&f.borders),
        path(&f.image),
    ])
    .unwrap()
}

/// Fill color at the centre of square `i`.
fn square_color(image: &image::RgbaImage, i: u32) -> Rgba<u8> {
    *image.get_pixel(i * 20 + 10, 10)
}

#[test]
fn quantiles_by_density() {
    let f = fixture();
    let args = cli("2", "quantiles", "PopulationDensity", &f);
    let summary = render_map(&args, &RenderConfig::default()).unwrap();

    assert_eq!(summary.borders, vec![10.0, 30.0]);
    assert_eq!(summary.usage, vec![2, 1]);
    assert_eq!(summary.rules, 3);
    assert_eq!(summary.unmatched, 0);
    assert_eq!(summary.shapes, 4);

    let image = image::open(&f.image).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (80, 20));
    assert_eq!(square_color(&image, 0), Rgba([255, 0, 0, 255]));
    assert_eq!(square_color(&image, 1), Rgba([255, 0, 0, 255]));
    // second of two buckets: 50% red
    assert_eq!(square_color(&image, 2), Rgba([128, 0, 0, 255]));
    assert_eq!(square_color(&image, 3), GREY);
}

#[test]
fn equal_value_ranges() {
    let f = fixture();
    let args = cli("3", "values", "PopulationDensity", &f);
    let summary = render_map(&args, &RenderConfig::default()).unwrap();

    assert_eq!(summary.borders, vec![0.0, 10.0, 20.0]);
    assert_eq!(summary.usage, vec![0, 2, 1]);
    assert_eq!(summary.usage.iter().sum::<usize>(), summary.rules);

    let image = image::open(&f.image).unwrap().to_rgba8();
    // 66.7% and 33.3% red
    assert_eq!(square_color(&image, 0), Rgba([170, 0, 0, 255]));
    assert_eq!(square_color(&image, 2), Rgba([85, 0, 0, 255]));
    assert_eq!(square_color(&image, 3), GREY);
}

#[test]
fn custom_join_attribute_and_background() {
    let f = fixture();
    let config: RenderConfig = toml::from_str(
        r##"
        background = "#ffffff"
        join_attribute = "RS"
        "##,
    )
    .unwrap();

    let summary = render_map(&cli("1", "quantiles", "Area", &f), &config).unwrap();
    assert_eq!(summary.borders, vec![10.0]);

    // No shape carries an RS attribute, so nothing is colored.
    let image = image::open(&f.image).unwrap().to_rgba8();
    for i in 0..4 {
        assert_eq!(square_color(&image, i), Rgba([255, 255, 255, 255]));
    }
}

#[test]
fn quantile_overflow_aborts_before_writing() {
    let f = fixture();
    // ceil(3 / 5) = 1, so border 3 needs value index 3 of 3
    let args = cli("5", "quantiles", "Population", &f);
    let err = render_map(&args, &RenderConfig::default()).unwrap_err();
    assert!(format!("{:#}", err).contains("only 3 values exist"));
    assert!(!f.image.exists());
}

#[test]
fn missing_borders_file_fails() {
    let f = fixture();
    fs::remove_file(&f.borders).unwrap();
    let err = render_map(&cli("2", "quantiles", "Area", &f), &RenderConfig::default()).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to load borders"));
}
