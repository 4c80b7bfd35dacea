use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 120, g: 200, b: 255 };
pub const ACCENT: Color = Color::TrueColor { r: 255, g: 200, b: 90 };
pub const SEPARATOR: Color = Color::TrueColor { r: 110, g: 110, b: 120 };
pub const TEXT_DEFAULT: Color = Color::TrueColor { r: 220, g: 220, b: 225 };

pub const IPV4_ADDR: Color = Color::TrueColor { r: 110, g: 230, b: 140 };
pub const IPV4_PREFIX: Color = Color::TrueColor { r: 60, g: 170, b: 90 };
pub const IPV6_ADDR: Color = Color::TrueColor { r: 190, g: 150, b: 255 };
pub const IPV6_PREFIX: Color = Color::TrueColor { r: 140, g: 100, b: 210 };
pub const MAC_ADDR: Color = Color::TrueColor { r: 255, g: 160, b: 120 };

pub const UNKNOWN_VALUE: Color = Color::BrightBlack;
