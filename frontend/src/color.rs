/// Fill used for categories that never had a color configured.
pub const DEFAULT_CATEGORY_COLOR: &str = "#6c757d";

/// Delta applied to a bar's fill to obtain its outline.
pub const BORDER_DARKEN: i32 = -20;

/// Shifts every channel of a hex color by `amount`, clamping to `0..=255`.
///
/// Accepts `#rrggbb`, `rrggbb` and the three digit shorthand. The result keeps
/// the `#` prefix only if the input had it and is always six lowercase digits.
/// Returns `None` when the input is not a hex color.
pub fn adjust_color(color: &str, amount: i32) -> Option<String> {
    let (prefix, digits) = match color.strip_prefix('#') {
        Some(rest) => ("#", rest),
        None => ("", color),
    };

    let packed = parse_hex(digits)?;
    let r = shift_channel(packed >> 16, amount);
    let g = shift_channel((packed >> 8) & 0xff, amount);
    let b = shift_channel(packed & 0xff, amount);

    Some(format!("{}{:06x}", prefix, (r << 16) | (g << 8) | b))
}

pub fn darken(color: &str) -> Option<String> {
    adjust_color(color, BORDER_DARKEN)
}

fn parse_hex(digits: &str) -> Option<u32> {
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        6 => u32::from_str_radix(digits, 16).ok(),
        3 => {
            let doubled: String = digits.chars().flat_map(|c| [c, c]).collect();
            u32::from_str_radix(&doubled, 16).ok()
        }
        _ => None,
    }
}

fn shift_channel(channel: u32, amount: i32) -> u32 {
    (channel as i32 + amount).clamp(0, 255) as u32
}
