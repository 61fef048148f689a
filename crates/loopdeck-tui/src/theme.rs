use ratatui::style::Color;

/// Colors used by the carousel widgets
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg0: Color,
    pub bg2: Color,
    pub fg0: Color,
    pub grey1: Color,
    pub grey2: Color,

    /// Border of ordinary cards
    pub card: Color,
    /// Border of the centered card
    pub centered: Color,
    /// Border of the slow-scroll target
    pub slow_target: Color,
    /// Status bar highlight while a reset is pending or running
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Gruvbox Material dark
        Self {
            bg0: Color::Rgb(0x28, 0x28, 0x28),
            bg2: Color::Rgb(0x45, 0x40, 0x3d),
            fg0: Color::Rgb(0xd4, 0xbe, 0x98),
            grey1: Color::Rgb(0x92, 0x83, 0x74),
            grey2: Color::Rgb(0xa8, 0x99, 0x84),
            card: Color::Rgb(0x7c, 0x6f, 0x64),
            centered: Color::Rgb(0x89, 0xb4, 0x82),
            slow_target: Color::Rgb(0x7d, 0xae, 0xa3),
            warning: Color::Rgb(0xe7, 0x8a, 0x4e),
        }
    }
}
