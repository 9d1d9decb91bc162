/// Accepts `#rrggbb` or one of a handful of names. Returns `None` for anything else.
pub(crate) fn parse_color(raw: &str) -> Option<[u8; 4]> {
    let value = raw.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex_rgb(hex);
    }
    let rgb = match value.to_ascii_lowercase().as_str() {
        "black" => [0, 0, 0],
        "white" => [255, 255, 255],
        "gray" | "grey" => [128, 128, 128],
        "red" => [255, 0, 0],
        "green" => [0, 128, 0],
        "blue" => [0, 0, 255],
        "yellow" => [255, 255, 0],
        "orange" => [255, 165, 0],
        "purple" => [128, 0, 128],
        "brown" => [139, 69, 19],
        _ => return None,
    };
    Some([rgb[0], rgb[1], rgb[2], 255])
}

fn parse_hex_rgb(hex: &str) -> Option<[u8; 4]> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some([channel(0..2)?, channel(2..4)?, channel(4..6)?, 255])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse_to_opaque_rgba() {
        assert_eq!(parse_color("#1a2B3c"), Some([0x1a, 0x2b, 0x3c, 255]));
    }

    #[test]
    fn named_colors_are_case_insensitive() {
        assert_eq!(parse_color("Blue"), Some([0, 0, 255, 255]));
        assert_eq!(parse_color(" grey "), Some([128, 128, 128, 255]));
    }

    #[test]
    fn malformed_colors_are_rejected() {
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#gg0000"), None);
        assert_eq!(parse_color("teal-ish"), None);
    }
}
