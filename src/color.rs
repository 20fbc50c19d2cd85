use egui::Color32;

use crate::ConfigurationError;

/// Parses `#rgb`, `#rrggbb`, `#rrggbbaa` or one of the basic CSS color names.
pub fn parse_color(input: &str) -> Result<Color32, ConfigurationError> {
    let input = input.trim();
    let invalid = || ConfigurationError::InvalidColor(input.to_string());

    let hex = match input.strip_prefix('#') {
        Some(hex) => hex,
        None => return named(input).ok_or_else(invalid),
    };

    if !hex.is_ascii() {
        return Err(invalid());
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    let short = |s: &str| channel(s).map(|c| c << 4 | c);

    Ok(match hex.len() {
        3 => Color32::from_rgb(short(&hex[0..1])?, short(&hex[1..2])?, short(&hex[2..3])?),
        6 => Color32::from_rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?),
        8 => Color32::from_rgba_unmultiplied(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            channel(&hex[6..8])?,
        ),
        _ => return Err(invalid()),
    })
}

fn named(name: &str) -> Option<Color32> {
    Some(match &*name.to_ascii_lowercase() {
        "black" => Color32::BLACK,
        "white" => Color32::WHITE,
        "red" => Color32::from_rgb(0xFF, 0x00, 0x00),
        "green" => Color32::from_rgb(0x00, 0x80, 0x00),
        "blue" => Color32::from_rgb(0x00, 0x00, 0xFF),
        "yellow" => Color32::from_rgb(0xFF, 0xFF, 0x00),
        "purple" => Color32::from_rgb(0x80, 0x00, 0x80),
        "orange" => Color32::from_rgb(0xFF, 0xA5, 0x00),
        "gray" | "grey" => Color32::from_rgb(0x80, 0x80, 0x80),
        "pink" => Color32::from_rgb(0xFF, 0xC0, 0xCB),
        "cyan" | "aqua" => Color32::from_rgb(0x00, 0xFF, 0xFF),
        "magenta" | "fuchsia" => Color32::from_rgb(0xFF, 0x00, 0xFF),
        "gold" => Color32::from_rgb(0xFF, 0xD7, 0x00),
        "transparent" => Color32::TRANSPARENT,
        _ => return None,
    })
}
