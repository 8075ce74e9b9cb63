//! Shared types for the mapcolor pipeline.

use serde::{Deserialize, Serialize};

use crate::dsatur::{Coloring, VertexOrdering};
use crate::render::Palette;
use crate::zones::ZoneMap;

/// Re-export `RgbImage` so downstream crates can pass rasters in and
/// out of the pipeline without depending on `image` directly.
pub use image::RgbImage;

/// Re-export `Rgb` for building border colors and palettes.
pub use image::Rgb;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Dimensions of an image.
    #[must_use]
    pub fn of(image: &RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }

    /// Total pixel count (`width * height`).
    #[must_use]
    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Linear pixel index (`y * width + x`).
    #[must_use]
    pub fn linear_index(self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Configuration for the map coloring pipeline.
///
/// # Invariants
///
/// `border_thickness` must be at least 1 and `palette` must not be
/// empty. [`validate`](Self::validate) checks both; every pipeline entry
/// point calls it before doing any work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// RGB color of the lines separating map regions.
    pub border_color: [u8; 3],

    /// Maximum per-channel difference from `border_color` for a pixel
    /// still to count as border. `0` means exact equality.
    pub color_tolerance: u8,

    /// Widest border band, in pixels, that two zones may face each
    /// other across and still be considered adjacent.
    pub border_thickness: u32,

    /// Vertex processing order for DSatur.
    pub ordering: VertexOrdering,

    /// Lookup table from color index to output RGB.
    pub palette: Palette,
}

impl PipelineConfig {
    /// Default border color: black.
    pub const DEFAULT_BORDER_COLOR: [u8; 3] = [0, 0, 0];

    /// Default color tolerance: exact match.
    pub const DEFAULT_COLOR_TOLERANCE: u8 = 0;

    /// Default border band thickness in pixels.
    pub const DEFAULT_BORDER_THICKNESS: u32 = 1;

    /// Default vertex ordering.
    pub const DEFAULT_ORDERING: VertexOrdering = VertexOrdering::StaticDegree;

    /// Check the configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if `border_thickness` is
    /// zero or the palette is empty.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.border_thickness == 0 {
            return Err(PipelineError::InvalidConfig(
                "border_thickness must be at least 1".to_string(),
            ));
        }
        if self.palette.is_empty() {
            return Err(PipelineError::InvalidConfig(
                "palette must contain at least one color".to_string(),
            ));
        }
        Ok(())
    }

    /// The border color as an `image` pixel.
    #[must_use]
    pub const fn border_rgb(&self) -> Rgb<u8> {
        Rgb(self.border_color)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            border_color: Self::DEFAULT_BORDER_COLOR,
            color_tolerance: Self::DEFAULT_COLOR_TOLERANCE,
            border_thickness: Self::DEFAULT_BORDER_THICKNESS,
            ordering: Self::DEFAULT_ORDERING,
            palette: Palette::default(),
        }
    }
}

/// Zones of a map image together with their coloring.
#[derive(Debug, Clone)]
pub struct MapColoring {
    /// The zone graph and the zone-to-pixel mapping.
    pub zone_map: ZoneMap,
    /// Color index per zone.
    pub coloring: Coloring<usize>,
}

/// Result of running the full pipeline on encoded image bytes.
///
/// Does not derive `PartialEq` because the zone graph does not
/// implement it.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    /// Zones and their coloring.
    pub map: MapColoring,
    /// The input image with every zone painted in its palette color.
    pub rendered: RgbImage,
    /// Dimensions of the source image in pixels.
    pub dimensions: Dimensions,
}

/// Errors raised by [`Graph`](crate::graph::Graph) operations.
///
/// Vertex identifiers are captured through their `Debug` rendering so
/// the error type stays independent of the vertex type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// An edge would join a vertex to itself.
    #[error("self-loop on vertex {vertex} is not allowed in a simple graph")]
    SelfLoop {
        /// The offending vertex.
        vertex: String,
    },

    /// An edge references a vertex that was never added.
    #[error("edge {edge} references unknown vertex {missing}")]
    UnknownEndpoint {
        /// The requested edge.
        edge: String,
        /// The endpoint that is not in the graph.
        missing: String,
    },

    /// A query named a vertex that was never added.
    #[error("unknown vertex {vertex}")]
    UnknownVertex {
        /// The vertex that was queried.
        vertex: String,
    },
}

/// Errors that can occur during pipeline processing.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Pipeline configuration is invalid.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    /// A graph invariant was violated while building the pixel or zone graph.
    #[error("graph construction failed: {0}")]
    Graph(#[from] GraphError),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_linear_index_is_row_major() {
        let d = Dimensions {
            width: 4,
            height: 3,
        };
        assert_eq!(d.linear_index(0, 0), 0);
        assert_eq!(d.linear_index(3, 0), 3);
        assert_eq!(d.linear_index(0, 1), 4);
        assert_eq!(d.linear_index(2, 2), 10);
        assert_eq!(d.pixel_count(), 12);
    }

    #[test]
    fn pipeline_config_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.border_color, [0, 0, 0]);
        assert_eq!(config.color_tolerance, 0);
        assert_eq!(config.border_thickness, 1);
        assert_eq!(config.ordering, VertexOrdering::StaticDegree);
        assert_eq!(config.palette.len(), 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_border_thickness_is_invalid() {
        let config = PipelineConfig {
            border_thickness: 0,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn empty_palette_is_invalid() {
        let config = PipelineConfig {
            palette: Palette::new(Vec::new()),
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn pipeline_config_serde_round_trip() {
        let config = PipelineConfig {
            border_color: [255, 255, 255],
            color_tolerance: 12,
            border_thickness: 4,
            ordering: VertexOrdering::DynamicSaturation,
            palette: Palette::new(vec![[1, 2, 3], [4, 5, 6]]),
        };
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn partial_config_json_uses_defaults() {
        let config: PipelineConfig = serde_json::from_str(r#"{"border_thickness": 3}"#).unwrap();
        assert_eq!(config.border_thickness, 3);
        assert_eq!(config.border_color, PipelineConfig::DEFAULT_BORDER_COLOR);
    }

    #[test]
    fn error_display_messages() {
        assert_eq!(
            PipelineError::EmptyInput.to_string(),
            "input image data is empty"
        );
        assert_eq!(
            PipelineError::InvalidConfig("bad".to_string()).to_string(),
            "invalid pipeline configuration: bad",
        );
        let graph_err = GraphError::UnknownVertex {
            vertex: "42".to_string(),
        };
        assert_eq!(graph_err.to_string(), "unknown vertex 42");
        assert_eq!(
            PipelineError::from(graph_err).to_string(),
            "graph construction failed: unknown vertex 42",
        );
    }
}
