//! Paint a colored zone map back onto its source image.

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::dsatur::Coloring;
use crate::zones::ZoneMap;

/// Ordered lookup table from color index to output RGB.
///
/// Indices wrap around, so a coloring that needs more colors than the
/// palette holds still renders, with reused colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(Vec<[u8; 3]>);

impl Palette {
    /// Blue, red, green, yellow, cyan, pink, orange, magenta.
    pub const DEFAULT_COLORS: [[u8; 3]; 8] = [
        [0, 0, 255],
        [255, 0, 0],
        [0, 255, 0],
        [255, 255, 0],
        [0, 255, 255],
        [255, 175, 175],
        [255, 200, 0],
        [255, 0, 255],
    ];

    /// Palette from explicit RGB triples.
    #[must_use]
    pub const fn new(colors: Vec<[u8; 3]>) -> Self {
        Self(colors)
    }

    /// Number of distinct entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the palette has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// RGB for color `index`, wrapping modulo the palette length.
    ///
    /// `None` only for an empty palette.
    #[must_use]
    pub fn color(&self, index: usize) -> Option<Rgb<u8>> {
        let slot = index.checked_rem(self.0.len())?;
        self.0.get(slot).copied().map(Rgb)
    }

    /// The raw entries.
    #[must_use]
    pub fn colors(&self) -> &[[u8; 3]] {
        &self.0
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self(Self::DEFAULT_COLORS.to_vec())
    }
}

/// Copy `image` and paint every zone pixel with its zone's palette color.
///
/// Border pixels and zones missing from `coloring` keep their original
/// color, as does everything when the palette is empty.
#[must_use]
pub fn recolor(
    image: &RgbImage,
    zone_map: &ZoneMap,
    coloring: &Coloring<usize>,
    palette: &Palette,
) -> RgbImage {
    let mut out = image.clone();
    let labels = zone_map.labels();
    for (i, pixel) in out.pixels_mut().enumerate() {
        let paint = labels
            .get(i)
            .copied()
            .flatten()
            .and_then(|zone| coloring.color_of(&zone))
            .and_then(|color| palette.color(color));
        if let Some(rgb) = paint {
            *pixel = rgb;
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dsatur::DSaturColoring;
    use crate::zones::ZoneGraphBuilder;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    fn split_image() -> RgbImage {
        RgbImage::from_fn(5, 2, |x, _| if x == 2 { BLACK } else { WHITE })
    }

    #[test]
    fn default_palette_has_eight_colors() {
        let p = Palette::default();
        assert_eq!(p.len(), 8);
        assert_eq!(p.color(0), Some(Rgb([0, 0, 255])));
        assert_eq!(p.color(1), Some(Rgb([255, 0, 0])));
    }

    #[test]
    fn palette_wraps_around() {
        let p = Palette::new(vec![[1, 1, 1], [2, 2, 2]]);
        assert_eq!(p.color(2), p.color(0));
        assert_eq!(p.color(5), p.color(1));
    }

    #[test]
    fn empty_palette_has_no_colors() {
        assert_eq!(Palette::new(Vec::new()).color(0), None);
    }

    #[test]
    fn palette_serializes_as_plain_list() {
        let p = Palette::new(vec![[1, 2, 3]]);
        assert_eq!(serde_json::to_string(&p).unwrap(), "[[1,2,3]]");
    }

    #[test]
    fn recolor_paints_zones_and_keeps_borders() {
        let image = split_image();
        let map = ZoneGraphBuilder::new(BLACK).build(&image).unwrap();
        let coloring = DSaturColoring::new(map.graph()).get_coloring();
        let palette = Palette::default();
        let out = recolor(&image, &map, &coloring, &palette);

        assert_eq!(*out.get_pixel(2, 0), BLACK);
        assert_eq!(*out.get_pixel(2, 1), BLACK);
        let left = *out.get_pixel(0, 0);
        let right = *out.get_pixel(4, 1);
        assert_ne!(left, right);
        assert_eq!(*out.get_pixel(1, 1), left);
        assert_eq!(*out.get_pixel(3, 0), right);
    }

    #[test]
    fn recolor_with_empty_palette_is_identity() {
        let image = split_image();
        let map = ZoneGraphBuilder::new(BLACK).build(&image).unwrap();
        let coloring = DSaturColoring::new(map.graph()).get_coloring();
        let out = recolor(&image, &map, &coloring, &Palette::new(Vec::new()));
        assert_eq!(out, image);
    }
}
