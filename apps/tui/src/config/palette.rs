use crate::domain::genre_index;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Fixed colour cycle for the genre chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartPalette {
    colors: [Rgb; 10],
}

pub const DEFAULT_PALETTE: ChartPalette = ChartPalette {
    colors: [
        Rgb(0x71, 0x69, 0x7A),
        Rgb(0xB3, 0xD7, 0xC0),
        Rgb(0x5B, 0xB8, 0xC0),
        Rgb(0xFA, 0xA9, 0x16),
        Rgb(0x2A, 0x57, 0xB0),
        Rgb(0x6B, 0x4E, 0x71),
        Rgb(0xFA, 0xB2, 0xEA),
        Rgb(0x30, 0x52, 0x52),
        Rgb(0x1D, 0x33, 0x54),
        Rgb(0xF6, 0x35, 0x4F),
    ],
};

impl Default for ChartPalette {
    fn default() -> Self {
        DEFAULT_PALETTE
    }
}

impl ChartPalette {
    pub const fn color_at(&self, index: usize) -> Rgb {
        self.colors[index % self.colors.len()]
    }

    /// Known genres keep their colour across responses; unknown ones fall
    /// back to their position in the ranked list.
    pub fn color_for(&self, genre: &str, rank: usize) -> Rgb {
        self.color_at(genre_index(genre).unwrap_or(rank))
    }
}
