//! Compiled-in visual theme

use ratatui::style::Color;

/// Theme record. The CSS-flavoured fields are kept as authored; the
/// terminal renderer only consumes the colour ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppTheme {
    pub id: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub border_radius: &'static str,
    pub font_family: &'static str,
    pub window_bg: &'static str,
    pub glass_blur: &'static str,
}

pub const DARK_THEME: AppTheme = AppTheme {
    id: "dark",
    primary: "#000000",
    secondary: "#111111",
    accent: "#00ffff",
    border_radius: "32px",
    font_family: "Inter, system-ui, sans-serif",
    window_bg: "bg-slate-900/80",
    glass_blur: "backdrop-blur-3xl",
};

impl AppTheme {
    pub fn accent_color(&self) -> Color {
        parse_hex_color(self.accent).unwrap_or(Color::Cyan)
    }

    pub fn primary_color(&self) -> Color {
        parse_hex_color(self.primary).unwrap_or(Color::Black)
    }

    pub fn secondary_color(&self) -> Color {
        parse_hex_color(self.secondary).unwrap_or(Color::DarkGray)
    }
}

/// Parse `#rrggbb` into an RGB colour.
fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_theme_colors() {
        assert_eq!(DARK_THEME.accent_color(), Color::Rgb(0, 255, 255));
        assert_eq!(DARK_THEME.secondary_color(), Color::Rgb(0x11, 0x11, 0x11));
    }

    #[test]
    fn test_bad_hex_falls_back() {
        assert_eq!(parse_hex_color("cyan"), None);
        assert_eq!(parse_hex_color("#0ff"), None);
        let theme = AppTheme {
            accent: "#zzzzzz",
            ..DARK_THEME
        };
        assert_eq!(theme.accent_color(), Color::Cyan);
    }
}
