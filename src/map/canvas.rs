use super::error::{MapError, MapResult};
use super::style::{Layer, PolygonSymbolizer, Style};
use geo::algorithm::bounding_rect::BoundingRect;
use geo::{Coord, MultiPolygon, Rect};
use image::{DynamicImage, Rgba, RgbaImage};
use std::path::Path;
use tiny_skia::{Color, FillRule, Paint, Path as SkiaPath, PathBuilder, Pixmap, Transform};
use tracing::debug;

/// Maps world coordinates onto canvas pixels. The extent is scaled
/// uniformly and centred, so the shapes keep their aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub extent: Rect<f64>,
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Viewport {
    pub fn fit(extent: Rect<f64>, width: u32, height: u32) -> Self {
        let (w, h) = (width as f64, height as f64);
        let scale_x = if extent.width() > 0.0 { w / extent.width() } else { f64::INFINITY };
        let scale_y = if extent.height() > 0.0 { h / extent.height() } else { f64::INFINITY };
        let mut scale = scale_x.min(scale_y);
        if !scale.is_finite() {
            scale = 1.0;
        }

        Self {
            extent,
            scale,
            offset_x: (w - extent.width() * scale) / 2.0,
            offset_y: (h - extent.height() * scale) / 2.0,
        }
    }

    /// Pixel position of a world coordinate; y grows downward.
    pub fn to_pixel(&self, coord: Coord<f64>) -> (f32, f32) {
        let x = self.offset_x + (coord.x - self.extent.min().x) * self.scale;
        let y = self.offset_y + (self.extent.max().y - coord.y) * self.scale;
        (x as f32, y as f32)
    }
}

pub struct Map {
    width: u32,
    height: u32,
    background: Rgba<u8>,
    styles: Vec<Style>,
    layers: Vec<Layer>,
}

impl Map {
    pub fn new(
        width: u32,
        height: u32,
        background: Rgba<u8>,
        styles: Vec<Style>,
        layers: Vec<Layer>,
    ) -> Self {
        Self {
            width,
            height,
            background,
            styles,
            layers,
        }
    }

    /// Viewport showing the content of every layer.
    pub fn zoom_all(&self) -> MapResult<Viewport> {
        let extent = self
            .layers
            .iter()
            .flat_map(|layer| layer.datasource.features())
            .filter_map(|feature| feature.geometry.bounding_rect())
            .reduce(union)
            .ok_or(MapError::EmptyExtent)?;

        debug!(
            "Zooming to extent ({}, {}) - ({}, {})",
            extent.min().x,
            extent.min().y,
            extent.max().x,
            extent.max().y
        );
        Ok(Viewport::fit(extent, self.width, self.height))
    }

    pub fn render(&self, viewport: &Viewport) -> MapResult<RgbaImage> {
        let mut pixmap = Pixmap::new(self.width, self.height).ok_or(MapError::InvalidCanvas {
            width: self.width,
            height: self.height,
        })?;
        let [r, g, b, a] = self.background.0;
        pixmap.fill(Color::from_rgba8(r, g, b, a));

        for layer in &self.layers {
            let styles = self.layer_styles(layer)?;

            for feature in layer.datasource.features() {
                let mut symbolizers = styles
                    .iter()
                    .flat_map(|style| style.symbolizers_for(feature))
                    .peekable();
                if symbolizers.peek().is_none() {
                    continue;
                }

                let Some(path) = polygon_path(&feature.geometry, viewport) else {
                    continue;
                };
                for symbolizer in symbolizers {
                    fill(&mut pixmap, &path, symbolizer);
                }
            }
        }

        let mut image = RgbaImage::new(self.width, self.height);
        for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Ok(image)
    }

    /// Renders and writes the image; the format follows the file extension.
    pub fn render_to_file(&self, viewport: &Viewport, path: &Path) -> MapResult<()> {
        let image = self.render(viewport)?;
        DynamicImage::ImageRgba8(image).to_rgb8().save(path)?;
        Ok(())
    }

    fn layer_styles(&self, layer: &Layer) -> MapResult<Vec<&Style>> {
        layer
            .styles
            .iter()
            .map(|name| {
                self.styles
                    .iter()
                    .find(|s| &s.name == name)
                    .ok_or_else(|| MapError::UnknownStyle {
                        layer: layer.name.clone(),
                        style: name.clone(),
                    })
            })
            .collect()
    }
}

fn union(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        Coord {
            x: a.min().x.min(b.min().x),
            y: a.min().y.min(b.min().y),
        },
        Coord {
            x: a.max().x.max(b.max().x),
            y: a.max().y.max(b.max().y),
        },
    )
}

/// One path holding every ring; filled even-odd so interiors become holes.
fn polygon_path(geometry: &MultiPolygon<f64>, viewport: &Viewport) -> Option<SkiaPath> {
    let mut pb = PathBuilder::new();

    for polygon in geometry {
        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            let mut coords = ring.coords().map(|c| viewport.to_pixel(*c));
            let Some((x, y)) = coords.next() else {
                continue;
            };
            pb.move_to(x, y);
            for (x, y) in coords {
                pb.line_to(x, y);
            }
            pb.close();
        }
    }

    pb.finish()
}

fn fill(pixmap: &mut Pixmap, path: &SkiaPath, symbolizer: &PolygonSymbolizer) {
    let [r, g, b, a] = symbolizer.fill.0;
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = symbolizer.anti_alias();

    pixmap.fill_path(path, &paint, FillRule::EvenOdd, Transform::identity(), None);
}
