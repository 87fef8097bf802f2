use glance_core::Appearance;

/// An sRGB colour with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1.0 }
    }

    pub const RED: Color = Color::rgb(0xff, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);

    /// Parse `rrggbb` (leading `#` optional). Invalid input yields black.
    pub fn hex(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#');
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .unwrap_or(0)
        };
        Self::rgb(channel(0..2), channel(2..4), channel(4..6))
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// `#rrggbb`; alpha is emitted separately as an opacity attribute.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn is_opaque(self) -> bool {
        self.alpha >= 1.0
    }
}

/// A colour pair picked by the current [`Appearance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicColor {
    pub light: Color,
    pub dark: Color,
}

impl DynamicColor {
    pub fn new(light: &str, dark: &str) -> Self {
        Self {
            light: Color::hex(light),
            dark: Color::hex(dark),
        }
    }

    pub fn resolve(self, appearance: Appearance) -> Color {
        match appearance {
            Appearance::Light => self.light,
            Appearance::Dark => self.dark,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Color::hex("8fec74"), Color::rgb(0x8f, 0xec, 0x74));
        assert_eq!(Color::hex("#00539f"), Color::rgb(0x00, 0x53, 0x9f));
        assert_eq!(Color::hex("zz"), Color::BLACK);
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(Color::rgb(0x1f, 0x1f, 0x1f).to_hex(), "#1f1f1f");
    }

    #[test]
    fn test_dynamic_resolve() {
        let c = DynamicColor::new("f2e269", "333333");
        assert_eq!(c.resolve(Appearance::Light), Color::hex("f2e269"));
        assert_eq!(c.resolve(Appearance::Dark), Color::hex("333333"));
    }

    #[test]
    fn test_alpha_is_clamped() {
        assert_eq!(Color::WHITE.with_alpha(3.0).alpha, 1.0);
        assert!(!Color::WHITE.with_alpha(0.5).is_opaque());
    }
}
