//! Pipeline diagnostics: timing, counts, and other metrics for each stage.
//!
//! [`process_with_diagnostics`] runs the same stages as
//! [`process`](crate::process) and records how long each took and what
//! it produced. Timestamps come from a caller-supplied [`Clock`] so the
//! pipeline itself stays free of platform time sources;
//! [`SystemClock`] is backed by the `web-time` crate, which uses
//! `performance.now()` on WASM and `std::time::Instant` on native.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::decode::decode_rgb;
use crate::dsatur::DSaturColoring;
use crate::events::Observer;
use crate::render::recolor;
use crate::types::{Dimensions, MapColoring, PipelineConfig, PipelineError, ProcessResult};
use crate::zones::{Zone, ZoneGraphBuilder, ZoneMap};

/// Source of monotonic timestamps.
pub trait Clock {
    /// Opaque timestamp type.
    type Instant;

    /// Current timestamp.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// [`Clock`] backed by [`web_time::Instant`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Instant = web_time::Instant;

    fn now(&self) -> web_time::Instant {
        web_time::Instant::now()
    }

    fn elapsed(&self, since: &web_time::Instant) -> Duration {
        since.elapsed()
    }
}

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDiagnostics {
    /// Stage 0: image decoding.
    pub decode: StageDiagnostics,
    /// Stage 1: pixel graph construction.
    pub pixel_graph: StageDiagnostics,
    /// Stage 2: grouping pixels into zones.
    pub zone_identification: StageDiagnostics,
    /// Stage 3: zone adjacency detection.
    pub zone_adjacency: StageDiagnostics,
    /// Stage 4: DSatur coloring and validation.
    pub coloring: StageDiagnostics,
    /// Stage 5: painting zones onto the output image.
    pub render: StageDiagnostics,
    /// Total wall-clock duration of the entire pipeline (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts across all stages.
    pub summary: PipelineSummary,
}

/// Diagnostics for a single pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics that vary by pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Image decoding metrics.
    Decode {
        /// Size of the input image bytes.
        input_bytes: usize,
        /// Decoded image width in pixels.
        width: u32,
        /// Decoded image height in pixels.
        height: u32,
        /// Total pixel count (`width * height`).
        pixel_count: u64,
    },
    /// Pixel graph metrics.
    PixelGraph {
        /// Non-border pixels (graph vertices).
        vertex_count: usize,
        /// 4-neighbor links between non-border pixels.
        edge_count: usize,
        /// Pixels matching the border color.
        border_pixel_count: usize,
    },
    /// Zone identification metrics.
    ZoneIdentification {
        /// Number of zones found.
        zone_count: usize,
        /// Pixels in the smallest zone.
        min_zone_pixels: usize,
        /// Pixels in the largest zone.
        max_zone_pixels: usize,
        /// Mean pixels per zone.
        mean_zone_pixels: f64,
    },
    /// Zone adjacency metrics.
    ZoneAdjacency {
        /// Border band width used.
        border_thickness: u32,
        /// Number of adjacent zone pairs.
        adjacency_count: usize,
        /// Most neighbors of any single zone.
        max_degree: usize,
    },
    /// Coloring metrics.
    Coloring {
        /// Vertex ordering used.
        ordering: String,
        /// Distinct colors used.
        color_count: usize,
        /// Adjacent zone pairs sharing a color (always 0 for DSatur).
        conflict_count: usize,
    },
    /// Render metrics.
    Render {
        /// Entries in the palette.
        palette_size: usize,
        /// Pixels repainted with a zone color.
        painted_pixel_count: usize,
    },
}

/// High-level summary counts for the entire pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Source image width in pixels.
    pub image_width: u32,
    /// Source image height in pixels.
    pub image_height: u32,
    /// Total pixel count.
    pub pixel_count: u64,
    /// Number of zones.
    pub zone_count: usize,
    /// Number of adjacent zone pairs.
    pub adjacency_count: usize,
    /// Distinct colors used.
    pub color_count: usize,
}

/// Run the full pipeline and collect per-stage diagnostics.
///
/// Produces the same [`ProcessResult`] as [`process`](crate::process)
/// for the same inputs.
///
/// # Errors
///
/// Same as [`process`](crate::process).
pub fn process_with_diagnostics<C: Clock>(
    image_bytes: &[u8],
    config: &PipelineConfig,
    clock: &C,
    observer: &mut dyn Observer<usize>,
) -> Result<(ProcessResult, PipelineDiagnostics), PipelineError> {
    config.validate()?;
    let total_start = clock.now();

    // 0. Decode.
    let start = clock.now();
    let image = decode_rgb(image_bytes)?;
    let dimensions = Dimensions::of(&image);
    let decode = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Decode {
            input_bytes: image_bytes.len(),
            width: dimensions.width,
            height: dimensions.height,
            pixel_count: dimensions.pixel_count() as u64,
        },
    };

    let builder = ZoneGraphBuilder::from_config(config);

    // 1. Pixel graph.
    let start = clock.now();
    let pixel_graph = builder.pixel_graph(&image)?;
    let pixel_graph_diag = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::PixelGraph {
            vertex_count: pixel_graph.vertex_count(),
            edge_count: pixel_graph.edge_count(),
            border_pixel_count: dimensions.pixel_count() - pixel_graph.vertex_count(),
        },
    };

    // 2. Zones.
    let start = clock.now();
    let (zones, labels) = ZoneGraphBuilder::identify_zones(&pixel_graph, dimensions, observer);
    drop(pixel_graph);
    let stats = zone_stats(&zones);
    let zone_identification = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::ZoneIdentification {
            zone_count: zones.len(),
            min_zone_pixels: stats.min,
            max_zone_pixels: stats.max,
            mean_zone_pixels: stats.mean,
        },
    };

    // 3. Adjacency.
    let start = clock.now();
    let graph = builder.zone_graph(&zones, &labels, dimensions, observer)?;
    let zone_adjacency = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::ZoneAdjacency {
            border_thickness: config.border_thickness,
            adjacency_count: graph.edge_count(),
            max_degree: graph.max_degree(),
        },
    };
    let zone_map = ZoneMap::new(graph, zones, labels, dimensions);

    // 4. Coloring and validation.
    let start = clock.now();
    let coloring = DSaturColoring::new(zone_map.graph())
        .with_ordering(config.ordering)
        .get_coloring_observed(observer);
    let conflict_count = crate::report_conflicts(zone_map.graph(), &coloring, observer);
    let coloring_diag = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Coloring {
            ordering: config.ordering.name().to_string(),
            color_count: coloring.number_of_colors(),
            conflict_count,
        },
    };

    // 5. Render.
    let start = clock.now();
    let rendered = recolor(&image, &zone_map, &coloring, &config.palette);
    let render = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Render {
            palette_size: config.palette.len(),
            painted_pixel_count: dimensions.pixel_count() - zone_map.border_pixel_count(),
        },
    };

    let summary = PipelineSummary {
        image_width: dimensions.width,
        image_height: dimensions.height,
        pixel_count: dimensions.pixel_count() as u64,
        zone_count: zone_map.zone_count(),
        adjacency_count: zone_map.graph().edge_count(),
        color_count: coloring.number_of_colors(),
    };

    let diagnostics = PipelineDiagnostics {
        decode,
        pixel_graph: pixel_graph_diag,
        zone_identification,
        zone_adjacency,
        coloring: coloring_diag,
        render,
        total_duration: clock.elapsed(&total_start),
        summary,
    };

    let result = ProcessResult {
        map: MapColoring { zone_map, coloring },
        rendered,
        dimensions,
    };
    Ok((result, diagnostics))
}

impl PipelineDiagnostics {
    /// Per-stage `(name, diagnostics)` pairs in pipeline order.
    #[must_use]
    pub fn stages(&self) -> [(&'static str, &StageDiagnostics); 6] {
        [
            ("Decode", &self.decode),
            ("Pixel Graph", &self.pixel_graph),
            ("Zone Identification", &self.zone_identification),
            ("Zone Adjacency", &self.zone_adjacency),
            ("Coloring", &self.coloring),
            ("Render", &self.render),
        ]
    }

    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Pipeline Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Image: {}x{} ({} pixels)",
            self.summary.image_width, self.summary.image_height, self.summary.pixel_count,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<24} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);
        for (name, diag) in self.stages() {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<24} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        lines.push(format!(
            "Zones: {}  |  Adjacencies: {}  |  Colors: {}",
            self.summary.zone_count, self.summary.adjacency_count, self.summary.color_count,
        ));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
pub(crate) fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Decode {
            input_bytes,
            width,
            height,
            ..
        } => format!("{input_bytes} bytes -> {width}x{height}"),
        StageMetrics::PixelGraph {
            vertex_count,
            edge_count,
            border_pixel_count,
        } => format!("{vertex_count} pixels, {edge_count} links, {border_pixel_count} border"),
        StageMetrics::ZoneIdentification {
            zone_count,
            min_zone_pixels,
            max_zone_pixels,
            mean_zone_pixels,
        } => format!(
            "{zone_count} zones (min={min_zone_pixels} max={max_zone_pixels} mean={mean_zone_pixels:.1} px)",
        ),
        StageMetrics::ZoneAdjacency {
            border_thickness,
            adjacency_count,
            max_degree,
        } => format!("thickness={border_thickness} {adjacency_count} pairs, max degree {max_degree}"),
        StageMetrics::Coloring {
            ordering,
            color_count,
            conflict_count,
        } => format!("{ordering} {color_count} colors, {conflict_count} conflicts"),
        StageMetrics::Render {
            palette_size,
            painted_pixel_count,
        } => format!("palette={palette_size} painted={painted_pixel_count}"),
    }
}

/// Size statistics for a set of zones.
struct ZoneStats {
    min: usize,
    max: usize,
    mean: f64,
}

fn zone_stats(zones: &[Zone]) -> ZoneStats {
    let total: usize = zones.iter().map(Zone::len).sum();
    let min = zones.iter().map(Zone::len).min().unwrap_or(0);
    let max = zones.iter().map(Zone::len).max().unwrap_or(0);
    #[allow(clippy::cast_precision_loss)]
    let mean = if zones.is_empty() {
        0.0
    } else {
        total as f64 / zones.len() as f64
    };
    ZoneStats { min, max, mean }
}
