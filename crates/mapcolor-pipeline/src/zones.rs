//! Zone extraction: turn a bitmap map into a small region adjacency graph.
//!
//! A map image is a set of regions separated by lines of a border
//! color. [`ZoneGraphBuilder`] derives the graph that DSatur colors:
//!
//! 1. **Pixel graph** -- one vertex per non-border pixel, keyed by its
//!    linear index `y * width + x`, with an edge to the left and upper
//!    neighbor when those are non-border too (4-connectivity).
//! 2. **Zones** -- connected components of the pixel graph, numbered in
//!    row-major discovery order.
//! 3. **Zone graph** -- one vertex per zone, and an edge between two
//!    zones whenever, along some row or column, a pixel of one and a
//!    pixel of the other are separated only by a run of border pixels
//!    no longer than the configured border thickness.
//!
//! Pixels of different zones are never 4-adjacent (border pixels are
//! excluded from the pixel graph), so step 3 is what makes regions
//! facing each other across a drawn line count as neighbors.

use image::{Rgb, RgbImage};

use crate::connectivity::ConnectivityInspector;
use crate::events::{NoopObserver, Observer, PipelineEvent};
use crate::graph::Graph;
use crate::types::{Dimensions, GraphError, PipelineConfig, PipelineError};

/// Decides which pixels belong to the border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderMatcher {
    color: Rgb<u8>,
    tolerance: u8,
}

impl BorderMatcher {
    /// Match `color` exactly.
    #[must_use]
    pub const fn exact(color: Rgb<u8>) -> Self {
        Self {
            color,
            tolerance: 0,
        }
    }

    /// Match any pixel within `tolerance` of `color` on every channel.
    #[must_use]
    pub const fn with_tolerance(color: Rgb<u8>, tolerance: u8) -> Self {
        Self { color, tolerance }
    }

    /// The reference border color.
    #[must_use]
    pub const fn color(&self) -> Rgb<u8> {
        self.color
    }

    /// Whether `pixel` is a border pixel.
    #[must_use]
    pub fn is_border(&self, pixel: &Rgb<u8>) -> bool {
        self.color
            .0
            .iter()
            .zip(pixel.0.iter())
            .all(|(&a, &b)| a.abs_diff(b) <= self.tolerance)
    }
}

/// Inclusive pixel bounding box of a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneBounds {
    /// Leftmost column.
    pub min_x: u32,
    /// Topmost row.
    pub min_y: u32,
    /// Rightmost column.
    pub max_x: u32,
    /// Bottom row.
    pub max_y: u32,
}

/// One maximal 4-connected region of non-border pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    id: usize,
    pixels: Vec<usize>,
    bounds: ZoneBounds,
}

impl Zone {
    #[allow(clippy::cast_possible_truncation)]
    fn new(id: usize, pixels: Vec<usize>, dimensions: Dimensions) -> Self {
        let width = (dimensions.width as usize).max(1);
        // Coordinates come from indices below width * height, so they fit in u32.
        let coords = pixels.iter().map(|&p| ((p % width) as u32, (p / width) as u32));
        let bounds = coords.fold(
            ZoneBounds {
                min_x: u32::MAX,
                min_y: u32::MAX,
                max_x: 0,
                max_y: 0,
            },
            |b, (x, y)| ZoneBounds {
                min_x: b.min_x.min(x),
                min_y: b.min_y.min(y),
                max_x: b.max_x.max(x),
                max_y: b.max_y.max(y),
            },
        );
        Self { id, pixels, bounds }
    }

    /// Zone number (vertex id in the zone graph).
    #[must_use]
    pub const fn id(&self) -> usize {
        self.id
    }

    /// Linear pixel indices, in breadth-first discovery order.
    #[must_use]
    pub fn pixels(&self) -> &[usize] {
        &self.pixels
    }

    /// Number of pixels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Always `false` for zones produced by the builder.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Bounding box.
    #[must_use]
    pub const fn bounds(&self) -> ZoneBounds {
        self.bounds
    }
}

/// The zone graph of an image plus the zone-to-pixel mapping needed to
/// paint zones back onto the image.
#[derive(Debug, Clone)]
pub struct ZoneMap {
    graph: Graph<usize>,
    zones: Vec<Zone>,
    /// Zone per pixel, `None` for border pixels.
    labels: Vec<Option<usize>>,
    dimensions: Dimensions,
}

impl ZoneMap {
    pub(crate) const fn new(
        graph: Graph<usize>,
        zones: Vec<Zone>,
        labels: Vec<Option<usize>>,
        dimensions: Dimensions,
    ) -> Self {
        Self {
            graph,
            zones,
            labels,
            dimensions,
        }
    }

    /// Zone adjacency graph; vertices are zone ids `0..zone_count()`.
    #[must_use]
    pub const fn graph(&self) -> &Graph<usize> {
        &self.graph
    }

    /// All zones, indexed by id.
    #[must_use]
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Zone with the given id.
    #[must_use]
    pub fn zone(&self, id: usize) -> Option<&Zone> {
        self.zones.get(id)
    }

    /// Number of zones.
    #[must_use]
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Zone containing pixel `(x, y)`, or `None` for border pixels and
    /// out-of-bounds coordinates.
    #[must_use]
    pub fn zone_of_pixel(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.dimensions.width || y >= self.dimensions.height {
            return None;
        }
        self.labels
            .get(self.dimensions.linear_index(x, y))
            .copied()
            .flatten()
    }

    /// Zone per pixel in row-major order.
    #[must_use]
    pub fn labels(&self) -> &[Option<usize>] {
        &self.labels
    }

    /// Number of border pixels.
    #[must_use]
    pub fn border_pixel_count(&self) -> usize {
        self.labels.iter().filter(|l| l.is_none()).count()
    }

    /// Dimensions of the source image.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }
}

/// Builds a [`ZoneMap`] from an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneGraphBuilder {
    matcher: BorderMatcher,
    border_thickness: u32,
}

impl ZoneGraphBuilder {
    /// Exact-match `border_color` with the default border thickness.
    #[must_use]
    pub const fn new(border_color: Rgb<u8>) -> Self {
        Self {
            matcher: BorderMatcher::exact(border_color),
            border_thickness: PipelineConfig::DEFAULT_BORDER_THICKNESS,
        }
    }

    /// Builder matching the border settings of `config`.
    #[must_use]
    pub const fn from_config(config: &PipelineConfig) -> Self {
        Self {
            matcher: BorderMatcher::with_tolerance(config.border_rgb(), config.color_tolerance),
            border_thickness: config.border_thickness,
        }
    }

    /// Treat pixels within `tolerance` of the border color as border.
    #[must_use]
    pub const fn with_color_tolerance(mut self, tolerance: u8) -> Self {
        self.matcher = BorderMatcher::with_tolerance(self.matcher.color(), tolerance);
        self
    }

    /// Widest border band two zones may face each other across.
    ///
    /// With `0`, no zones are ever adjacent.
    #[must_use]
    pub const fn with_border_thickness(mut self, thickness: u32) -> Self {
        self.border_thickness = thickness;
        self
    }

    /// The border matcher in use.
    #[must_use]
    pub const fn matcher(&self) -> BorderMatcher {
        self.matcher
    }

    /// Run all three steps.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Graph`] if a graph invariant is violated,
    /// which indicates a bug rather than bad input.
    pub fn build(&self, image: &RgbImage) -> Result<ZoneMap, PipelineError> {
        self.build_observed(image, &mut NoopObserver)
    }

    /// Run all three steps, reporting zone events to `observer`.
    ///
    /// # Errors
    ///
    /// See [`build`](Self::build).
    pub fn build_observed(
        &self,
        image: &RgbImage,
        observer: &mut dyn Observer<usize>,
    ) -> Result<ZoneMap, PipelineError> {
        let dimensions = Dimensions::of(image);
        let pixel_graph = self.pixel_graph(image)?;
        let (zones, labels) = Self::identify_zones(&pixel_graph, dimensions, observer);
        let graph = self.zone_graph(&zones, &labels, dimensions, observer)?;
        Ok(ZoneMap::new(graph, zones, labels, dimensions))
    }

    /// Step 1: the 4-connectivity graph of non-border pixels.
    ///
    /// # Errors
    ///
    /// Only on an internal invariant violation.
    pub fn pixel_graph(&self, image: &RgbImage) -> Result<Graph<usize>, GraphError> {
        let dimensions = Dimensions::of(image);
        let width = dimensions.width as usize;
        let mut graph = Graph::with_capacity(dimensions.pixel_count());

        for (x, y, pixel) in image.enumerate_pixels() {
            if self.matcher.is_border(pixel) {
                continue;
            }
            let id = dimensions.linear_index(x, y);
            graph.add_vertex(id);
            if x > 0 && !self.matcher.is_border(image.get_pixel(x - 1, y)) {
                graph.add_edge(id, id - 1)?;
            }
            if y > 0 && !self.matcher.is_border(image.get_pixel(x, y - 1)) {
                graph.add_edge(id, id - width)?;
            }
        }
        Ok(graph)
    }

    /// Step 2: group the pixel graph into zones.
    ///
    /// Returns the zones (indexed by id) and the zone label of every
    /// pixel, `None` for border pixels.
    pub fn identify_zones(
        pixel_graph: &Graph<usize>,
        dimensions: Dimensions,
        observer: &mut dyn Observer<usize>,
    ) -> (Vec<Zone>, Vec<Option<usize>>) {
        let mut labels = vec![None; dimensions.pixel_count()];
        let zones: Vec<Zone> = ConnectivityInspector::new(pixel_graph)
            .connected_sets()
            .into_iter()
            .enumerate()
            .map(|(id, pixels)| {
                for &p in &pixels {
                    if let Some(slot) = labels.get_mut(p) {
                        *slot = Some(id);
                    }
                }
                Zone::new(id, pixels, dimensions)
            })
            .collect();

        observer.on_event(&PipelineEvent::ZonesIdentified { count: zones.len() });
        (zones, labels)
    }

    /// Step 3: connect zones facing each other across a thin border band.
    ///
    /// # Errors
    ///
    /// Only on an internal invariant violation.
    pub fn zone_graph(
        &self,
        zones: &[Zone],
        labels: &[Option<usize>],
        dimensions: Dimensions,
        observer: &mut dyn Observer<usize>,
    ) -> Result<Graph<usize>, GraphError> {
        let mut graph = Graph::with_capacity(zones.len());
        for zone in zones {
            graph.add_vertex(zone.id);
        }

        let width = dimensions.width as usize;
        let height = dimensions.height as usize;
        let thickness = self.border_thickness as usize;
        let label = |x: usize, y: usize| labels.get(y * width + x).copied().flatten();

        let mut link = |a: usize, b: usize| -> Result<(), GraphError> {
            let (a, b) = (a.min(b), a.max(b));
            if graph.add_edge(a, b)? {
                observer.on_event(&PipelineEvent::ZonesAdjacent { a, b });
            }
            Ok(())
        };

        for y in 0..height {
            link_across_line((0..width).map(|x| label(x, y)), thickness, &mut link)?;
        }
        for x in 0..width {
            link_across_line((0..height).map(|y| label(x, y)), thickness, &mut link)?;
        }

        Ok(graph)
    }
}

/// Walk one row or column and call `link` for every pair of distinct
/// zones separated by a border run of length `1..=thickness`.
fn link_across_line<I, F>(line: I, thickness: usize, link: &mut F) -> Result<(), GraphError>
where
    I: IntoIterator<Item = Option<usize>>,
    F: FnMut(usize, usize) -> Result<(), GraphError>,
{
    let mut previous = None;
    let mut gap = 0usize;
    for label in line {
        match label {
            None => gap += 1,
            Some(zone) => {
                if let Some(prev) = previous
                    && prev != zone
                    && (1..=thickness).contains(&gap)
                {
                    link(prev, zone)?;
                }
                previous = Some(zone);
                gap = 0;
            }
        }
    }
    Ok(())
}
