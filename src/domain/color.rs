use crate::domain::color::Color::{Hex, RGB};
use thiserror::Error;

#[derive(PartialEq, Clone, Debug)]
pub enum Color {
    RGB(u8, u8, u8),
    Hex(String),
}

impl Color {
    pub fn to_rgb(self) -> Result<Color, ColorConversionError> {
        match self {
            RGB(_, _, _) => Ok(self),
            Hex(value) => {
                let (r, g, b) = hex_to_rgb(&value)?;
                Ok(RGB(r, g, b))
            }
        }
    }

    /// The hex form as a plain string, e.g. `#1a2b3c`.
    pub fn hex_string(self) -> String {
        match self {
            RGB(r, g, b) => format!("#{:02x}{:02x}{:02x}", r, g, b),
            Hex(value) => value,
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ColorConversionError {
    #[error("invalid hexadecimal value '{0}'")]
    InvalidHexFormat(String),
}

// Accepts `#rrggbb` and the `#rgb` shorthand, with or without the leading '#'.
fn hex_to_rgb(hex: &str) -> Result<(u8, u8, u8), ColorConversionError> {
    let digits = hex.trim().trim_start_matches('#');
    let invalid = || ColorConversionError::InvalidHexFormat(hex.to_string());

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let expanded = match digits.len() {
        6 => digits.to_string(),
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        _ => return Err(invalid()),
    };

    let red = u8::from_str_radix(&expanded[0..2], 16).map_err(|_| invalid())?;
    let green = u8::from_str_radix(&expanded[2..4], 16).map_err(|_| invalid())?;
    let blue = u8::from_str_radix(&expanded[4..6], 16).map_err(|_| invalid())?;

    Ok((red, green, blue))
}
