use crate::domain::color::Color;

/// Clear channel reading of a black surface.
const CLEAR_AT_BLACK: f64 = 300.0;
/// Clear channel reading of a white surface.
const CLEAR_AT_WHITE: f64 = 400.0;
const CLEAR_DIFF: f64 = CLEAR_AT_WHITE - CLEAR_AT_BLACK;

/// One reading of the four-channel light sensor.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct RawColorSample {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
    pub clear: u16,
}

/// Converts a raw light sample into a calibrated `#rrggbb` color.
///
/// The red, green and blue channels only determine the hue; brightness comes from the clear channel,
/// scaled between the black and white calibration points. Readings at or below the black point give
/// black, readings above the white point keep amplifying until the channels saturate at 255.
///
/// A sample whose red, green and blue channels are all zero has no hue, so every channel contributes
/// zero and the result is black regardless of the clear channel.
pub fn normalize(sample: &RawColorSample) -> String {
    let sum = sample.red as f64 + sample.green as f64 + sample.blue as f64;
    let clear_normalized = ((sample.clear as f64 - CLEAR_AT_BLACK) / CLEAR_DIFF).max(0.0);

    let channel = |value: u16| -> u8 {
        let ratio = if sum == 0.0 { 0.0 } else { value as f64 / sum };
        (ratio * 255.0 * 3.0 * clear_normalized).min(255.0).round().clamp(0.0, 255.0) as u8
    };

    Color::RGB(channel(sample.red), channel(sample.green), channel(sample.blue)).hex_string()
}
