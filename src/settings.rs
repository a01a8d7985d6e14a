use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Side length of the square play field, in cells.
pub const GRID_SIZE: i32 = 20;

pub const SLOW_TICK_MS: u32 = 200;
pub const NORMAL_TICK_MS: u32 = 150;
pub const FAST_TICK_MS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseSettingError {
    UnknownSpeed(String),
    UnknownFood(String),
    UnknownTheme(String),
    UnknownDirection(String),
}

impl fmt::Display for ParseSettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseSettingError::UnknownSpeed(s) => {
                write!(f, "unknown speed '{}' (expected slow, normal or fast)", s)
            }
            ParseSettingError::UnknownFood(s) => {
                write!(f, "unknown food '{}' (expected angela or tangyuan)", s)
            }
            ParseSettingError::UnknownTheme(s) => {
                write!(f, "unknown theme '{}' (expected light or dark)", s)
            }
            ParseSettingError::UnknownDirection(s) => write!(f, "unknown direction '{}'", s),
        }
    }
}

impl std::error::Error for ParseSettingError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Speed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl Speed {
    pub fn tick_ms(&self) -> u32 {
        match self {
            Speed::Slow => SLOW_TICK_MS,
            Speed::Normal => NORMAL_TICK_MS,
            Speed::Fast => FAST_TICK_MS,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms() as u64)
    }
}

impl FromStr for Speed {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slow" => Ok(Speed::Slow),
            "normal" => Ok(Speed::Normal),
            "fast" => Ok(Speed::Fast),
            other => Err(ParseSettingError::UnknownSpeed(other.to_string())),
        }
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Speed::Slow => "slow",
            Speed::Normal => "normal",
            Speed::Fast => "fast",
        })
    }
}

/// Which sprite stands in for the food. Purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FoodSkin {
    #[default]
    Angela,
    Tangyuan,
}

impl FoodSkin {
    pub fn display_name(&self) -> &'static str {
        match self {
            FoodSkin::Angela => "Angela",
            FoodSkin::Tangyuan => "Tangyuan",
        }
    }

    pub fn asset_path(&self) -> &'static str {
        match self {
            FoodSkin::Angela => "assets/angela.png",
            FoodSkin::Tangyuan => "assets/tangyuan.png",
        }
    }
}

impl FromStr for FoodSkin {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "angela" => Ok(FoodSkin::Angela),
            "tangyuan" => Ok(FoodSkin::Tangyuan),
            other => Err(ParseSettingError::UnknownFood(other.to_string())),
        }
    }
}

impl fmt::Display for FoodSkin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FoodSkin::Angela => "angela",
            FoodSkin::Tangyuan => "tangyuan",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(&self) -> bool {
        *self == Theme::Dark
    }
}

impl FromStr for Theme {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ParseSettingError::UnknownTheme(other.to_string())),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        })
    }
}

/// Choices made on the start screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    pub speed: Speed,
    pub food: FoodSkin,
    pub theme: Theme,
}
