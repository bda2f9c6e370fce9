pub fn parse_hex_color(text: &str) -> Option<[u8; 3]> {
    let digits = text.trim().strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

pub fn format_hex_color(rgb: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_accent_colors() {
        assert_eq!(parse_hex_color("#00FFD1"), Some([0, 255, 209]));
        assert_eq!(parse_hex_color(" #ff8000 "), Some([255, 128, 0]));
    }

    #[test]
    fn rejects_malformed_colors() {
        for text in ["00FFD1", "#00FFD", "#00FFD1AA", "#GG0000", "#ééé", ""] {
            assert_eq!(parse_hex_color(text), None, "{text:?}");
        }
    }

    #[test]
    fn formats_round_trip() {
        assert_eq!(format_hex_color([0, 255, 209]), "#00FFD1");
    }
}
