use crate::settings::Theme;

pub type Rgb = (u8, u8, u8);

/// Colours for one theme. Inner shades give the blocky retro bevel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub grid: Rgb,
    pub body: Rgb,
    pub body_inner: Rgb,
    pub head: Rgb,
    pub head_inner: Rgb,
    pub food: Rgb,
    pub food_inner: Rgb,
    pub eye: Rgb,
    pub pupil: Rgb,
}

const LIGHT: Palette = Palette {
    background: (0xd4, 0xcf, 0xba),
    grid: (0xb8, 0xb3, 0xa0),
    body: (0x33, 0x88, 0x33),
    body_inner: (0x44, 0xaa, 0x44),
    head: (0x22, 0x66, 0x22),
    head_inner: (0x33, 0xaa, 0x33),
    food: (0xcc, 0x22, 0x00),
    food_inner: (0xff, 0x66, 0x44),
    eye: (0xff, 0xff, 0xff),
    pupil: (0x00, 0x00, 0x00),
};

const DARK: Palette = Palette {
    background: (0x1a, 0x1a, 0x2e),
    grid: (0x2a, 0x2a, 0x44),
    body: (0x44, 0xcc, 0x66),
    body_inner: (0x66, 0xee, 0x88),
    head: (0x22, 0xaa, 0x44),
    head_inner: (0x44, 0xdd, 0x66),
    food: (0xff, 0x44, 0x44),
    food_inner: (0xff, 0x88, 0x88),
    eye: (0xff, 0xff, 0xff),
    pupil: (0x00, 0x00, 0x00),
};

impl Palette {
    pub fn for_theme(theme: Theme) -> &'static Palette {
        match theme {
            Theme::Light => &LIGHT,
            Theme::Dark => &DARK,
        }
    }
}

/// CSS colour string, e.g. `#d4cfba`.
pub fn hex((r, g, b): Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}
