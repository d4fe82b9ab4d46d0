pub mod catppuccin {
    use nu_ansi_term::Color;
    pub struct Mocha;
    impl Mocha {
        // Base colors
        pub const CRUST: Color = Color::Rgb(17, 17, 27);
        pub const TEXT: Color = Color::Rgb(205, 214, 244);
        pub const SURFACE2: Color = Color::Rgb(88, 91, 112);

        // Accents
        pub const RED: Color = Color::Rgb(243, 139, 168);
        pub const GREEN: Color = Color::Rgb(166, 227, 161);
        pub const YELLOW: Color = Color::Rgb(249, 226, 175);
        pub const BLUE: Color = Color::Rgb(137, 180, 250);
        pub const MAUVE: Color = Color::Rgb(203, 166, 247);
        pub const PINK: Color = Color::Rgb(245, 194, 231);
        pub const PEACH: Color = Color::Rgb(250, 179, 135);
        pub const TEAL: Color = Color::Rgb(148, 226, 213);
        pub const SKY: Color = Color::Rgb(137, 220, 235);
    }
}

use nu_ansi_term::{Color, Style};

use catppuccin::Mocha as P;

/// Number of value ranges an image cell can fall into.
pub const SHADE_COUNT: usize = 8;

/// Fill colors for image cells, indexed by `value / 32`.
pub const SHADES: [Color; SHADE_COUNT] = [
    P::SURFACE2, // 0..=31
    P::RED,      // 32..=63
    P::GREEN,    // 64..=95
    P::YELLOW,   // 96..=127
    P::BLUE,     // 128..=159
    P::MAUVE,    // 160..=191
    P::TEAL,     // 192..=223
    P::TEXT,     // 224..=255
];

/// The value range an image cell falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shade(u8);

impl Shade {
    /// Bucket `value` into one of [`SHADE_COUNT`] equal ranges of 32 values.
    pub fn of(value: u8) -> Self {
        Shade(value / 32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn color(self) -> Color {
        SHADES[self.index()]
    }
}

/// Label backgrounds used by the `#` and `@` diagnostics.
pub struct Highlights;

impl Highlights {
    pub const TITLE: Color = P::TEXT;
    pub const SNAPSHOT_TITLE: Color = P::PINK;
    pub const POINTER_LOCATION: Color = P::BLUE;
    pub const POINTER_VALUE: Color = P::RED;
    pub const MEMORY_USAGE: Color = P::GREEN;
    pub const NON_ZERO: Color = P::SKY;
    pub const ERROR: Color = P::PEACH;
}

/// Dark text on a colored label, so labels stay readable on any background.
pub fn label(bg: Color) -> Style {
    Style::new().fg(P::CRUST).on(bg)
}

pub fn banner(bg: Color) -> Style {
    label(bg).bold()
}

pub fn value() -> Style {
    Style::new().bold()
}
