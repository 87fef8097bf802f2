use glance_render::DynamicColor;

/// Phone-with-signal glyph, tinted with the icon colour.
pub const ICON_PNG_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAACAAAAAgBAMAAACBVGfHAAAAAXNSR0IArs4c6QAAACFQTFRFR3BMAFKgAFOiAFKhAFKgAFOhAFKhAFKhAFOiAFKhAFKgDCW0lQAAAAp0Uk5TAOIQsMw5TWQdg1zIliwAAAEQSURBVCiRdVG7bgJBDFyBgFCexCtXnRReKUMXOiIKoDpEQxkor+LRURGKSKnT0a2OEMVfmfHsnQCdcGN7dsce28bcse7hJm1/Dyqvy0vemQjstEnzQl/E80XiMAEWiOefLyI1lxfxWOU/+05gCv4b/DNxY3KoIA2N1hIHcCXt8GNctIJrKvBH8pHUSAHLjk9yJqzWoyBff2rNofyS04/RBLLjw8xJiE6BeYAsPK+p8sPuCYBZ9DYJoBR8NDsdbaqRFoWevDzOW1oUba2vs0HMgAIjGX15IalCYU3oXdQDLe6mLqFrWcZbCl5xfBu6Z3HjY0H1bgJU0xUOXZ6sUJfsrHZ1BlZIz5A5VPaU2WNf2T821oV4fZix7wAAAABJRU5ErkJggg==";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MobileTheme {
    pub gradient_start: DynamicColor,
    pub gradient_end: DynamicColor,
    pub text: DynamicColor,
    pub gauge: DynamicColor,
    pub icon: DynamicColor,
}

pub fn mobile_theme() -> MobileTheme {
    MobileTheme {
        gradient_start: DynamicColor::new("a0c1b9", "00203d"),
        gradient_end: DynamicColor::new("70a0af", "000000"),
        text: DynamicColor::new("000000", "c2e1ff"),
        gauge: DynamicColor::new("00539f", "00539f"),
        icon: DynamicColor::new("00539f", "00539f"),
    }
}
