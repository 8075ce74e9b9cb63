//! mapcolor-pipeline: Pure map coloring pipeline (sans-IO).
//!
//! Colors the regions of a bitmap map so that no two neighboring
//! regions share a color:
//! decode -> pixel graph -> zones -> zone adjacency -> DSatur -> render.
//!
//! The graph layer ([`Graph`], [`ConnectivityInspector`],
//! [`DSaturColoring`]) is generic over the vertex type and usable on its
//! own; the image layer builds a `Graph<usize>` of zone ids and feeds it
//! through the same code.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and rasters and returns structured data. Nothing is
//! logged here; callers observe progress through [`Observer`].

pub mod connectivity;
pub mod decode;
pub mod diagnostics;
pub mod dsatur;
pub mod events;
pub mod graph;
pub mod reference;
pub mod render;
pub mod samples;
pub mod types;
pub mod zones;

pub use connectivity::ConnectivityInspector;
pub use dsatur::{Coloring, DSaturColoring, VertexColoring, VertexOrdering};
pub use events::{NoopObserver, Observer, PipelineEvent};
pub use graph::{Graph, Vertex};
pub use render::Palette;
pub use types::{
    Dimensions, GraphError, MapColoring, PipelineConfig, PipelineError, ProcessResult, Rgb,
    RgbImage,
};
pub use zones::{BorderMatcher, Zone, ZoneGraphBuilder, ZoneMap};

/// Find the zones of a decoded map image and color them.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] if `config` fails
/// [`PipelineConfig::validate`].
pub fn color_map(image: &RgbImage, config: &PipelineConfig) -> Result<MapColoring, PipelineError> {
    color_map_observed(image, config, &mut NoopObserver)
}

/// [`color_map`], reporting zone, coloring, and validation events to
/// `observer`.
///
/// # Errors
///
/// See [`color_map`].
pub fn color_map_observed(
    image: &RgbImage,
    config: &PipelineConfig,
    observer: &mut dyn Observer<usize>,
) -> Result<MapColoring, PipelineError> {
    config.validate()?;
    let zone_map = ZoneGraphBuilder::from_config(config).build_observed(image, observer)?;
    let coloring = DSaturColoring::new(zone_map.graph())
        .with_ordering(config.ordering)
        .get_coloring_observed(observer);
    report_conflicts(zone_map.graph(), &coloring, observer);
    Ok(MapColoring { zone_map, coloring })
}

/// Run the full pipeline on encoded image bytes.
///
/// # Pipeline steps
///
/// 1. Decode image to RGB
/// 2. Build the pixel graph of non-border pixels
/// 3. Group pixels into zones
/// 4. Connect zones facing each other across a border band
/// 5. DSatur coloring, then a proper-coloring check
/// 6. Paint every zone with its palette color
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] if `config` is invalid.
/// Returns [`PipelineError::EmptyInput`] if `image_bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is unrecognized.
pub fn process(image_bytes: &[u8], config: &PipelineConfig) -> Result<ProcessResult, PipelineError> {
    process_observed(image_bytes, config, &mut NoopObserver)
}

/// [`process`], reporting events to `observer`.
///
/// # Errors
///
/// See [`process`].
pub fn process_observed(
    image_bytes: &[u8],
    config: &PipelineConfig,
    observer: &mut dyn Observer<usize>,
) -> Result<ProcessResult, PipelineError> {
    config.validate()?;
    let image = decode::decode_rgb(image_bytes)?;
    let dimensions = Dimensions::of(&image);
    let map = color_map_observed(&image, config, observer)?;
    let rendered = render::recolor(&image, &map.zone_map, &map.coloring, &config.palette);
    Ok(ProcessResult {
        map,
        rendered,
        dimensions,
    })
}

/// Emit an [`ImproperEdge`](PipelineEvent::ImproperEdge) event for every
/// edge whose endpoints share a color, and return how many there were.
pub(crate) fn report_conflicts<V: Vertex>(
    graph: &Graph<V>,
    coloring: &Coloring<V>,
    observer: &mut dyn Observer<V>,
) -> usize {
    let conflicts = coloring.conflicts(graph);
    for &(a, b, color) in &conflicts {
        observer.on_event(&PipelineEvent::ImproperEdge { a, b, color });
    }
    conflicts.len()
}
