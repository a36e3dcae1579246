use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Genre → colour mapping
// ---------------------------------------------------------------------------

/// Fixed colours for the common IMDb genres so they stay recognisable across
/// charts and filter changes.
const GENRE_COLORS: &[(&str, Color32)] = &[
    ("Drama", Color32::from_rgb(0xE5, 0x39, 0x35)),
    ("Action", Color32::from_rgb(0x1E, 0x88, 0xE5)),
    ("Comedy", Color32::from_rgb(0xFF, 0xB3, 0x00)),
    ("Crime", Color32::from_rgb(0x54, 0x6E, 0x7A)),
    ("Thriller", Color32::from_rgb(0x8E, 0x24, 0xAA)),
    ("Romance", Color32::from_rgb(0xD8, 0x1B, 0x60)),
    ("Adventure", Color32::from_rgb(0x43, 0xA0, 0x47)),
    ("Sci-Fi", Color32::from_rgb(0x03, 0x9B, 0xE5)),
    ("Horror", Color32::from_rgb(0x6D, 0x4C, 0x41)),
    ("Western", Color32::from_rgb(0xA1, 0x88, 0x7F)),
    ("Animation", Color32::from_rgb(0x00, 0xAC, 0xC1)),
    ("Family", Color32::from_rgb(0x7C, 0xB3, 0x42)),
    ("Mystery", Color32::from_rgb(0x39, 0x49, 0xAB)),
    ("Fantasy", Color32::from_rgb(0xD5, 0x00, 0xF9)),
    ("Biography", Color32::from_rgb(0x75, 0x75, 0x75)),
    ("Music", Color32::from_rgb(0xF0, 0x62, 0x92)),
    ("War", Color32::from_rgb(0x55, 0x6B, 0x2F)),
    ("History", Color32::from_rgb(0x8D, 0x6E, 0x63)),
    ("Sport", Color32::from_rgb(0xC0, 0xCA, 0x33)),
    ("Musical", Color32::from_rgb(0xBA, 0x68, 0xC8)),
    ("Film-Noir", Color32::from_rgb(0x37, 0x47, 0x4F)),
    ("Documentary", Color32::from_rgb(0xFF, 0x8F, 0x00)),
    ("Unknown", Color32::from_rgb(0xBD, 0xBD, 0xBD)),
];

/// Maps genres to stable colours: fixed entries for the common genres,
/// generated hues for whatever else the dataset contains.
#[derive(Debug, Clone)]
pub struct GenreColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl GenreColors {
    /// Build a colour map for the dataset's genre set.
    pub fn new(genres: &BTreeSet<String>) -> Self {
        let fixed: BTreeMap<&str, Color32> = GENRE_COLORS.iter().copied().collect();
        let leftover: Vec<&String> = genres
            .iter()
            .filter(|g| !fixed.contains_key(g.as_str()))
            .collect();
        let extra_palette = generate_palette(leftover.len());

        let mut mapping = BTreeMap::new();
        for genre in genres {
            if let Some(&c) = fixed.get(genre.as_str()) {
                mapping.insert(genre.clone(), c);
            }
        }
        for (genre, color) in leftover.into_iter().zip(extra_palette) {
            mapping.insert(genre.clone(), color);
        }

        GenreColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a genre.
    pub fn color_for(&self, genre: &str) -> Color32 {
        self.mapping
            .get(genre)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_genres_keep_their_colours() {
        let genres: BTreeSet<String> =
            ["Drama", "Comedy", "Oddity"].iter().map(|s| s.to_string()).collect();
        let colors = GenreColors::new(&genres);
        assert_eq!(colors.color_for("Drama"), Color32::from_rgb(0xE5, 0x39, 0x35));
        // Unmapped dataset genres get a generated colour, not the fallback.
        assert_ne!(colors.color_for("Oddity"), Color32::GRAY);
        // Genres absent from the dataset fall back to gray.
        assert_eq!(colors.color_for("NotThere"), Color32::GRAY);
    }
}
