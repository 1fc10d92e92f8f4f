use curveplay_core::canvas::{BORDER_COLOUR, NORMAL_COLOUR};
use curveplay_core::Colour;
use ratatui::style::Color;

/// Runtime theme with configurable colors
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub grey1: Color,
    pub grey2: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Default to Gruvbox Dark
        Self {
            bg0: Color::Rgb(0x28, 0x28, 0x28),
            bg2: Color::Rgb(0x45, 0x40, 0x3d),
            fg0: Color::Rgb(0xd4, 0xbe, 0x98),
            grey1: Color::Rgb(0x92, 0x83, 0x74),
            grey2: Color::Rgb(0xa8, 0x99, 0x84),
        }
    }
}

impl Theme {
    /// Terminal color for an engine colour. The engine's two stock colours
    /// map onto the palette; anything else is passed through as RGB.
    pub fn colour(&self, colour: Colour) -> Color {
        if colour == NORMAL_COLOUR {
            self.fg0
        } else if colour == BORDER_COLOUR {
            self.grey1
        } else {
            let (r, g, b) = colour.to_rgb8();
            Color::Rgb(r, g, b)
        }
    }
}
