use std::str::FromStr;

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Side,
    Extra,
}

impl MouseButton {
    /// Core protocol button number, as carried in the `detail` field of button events
    pub fn to_detail(self) -> u8 {
        match self {
            MouseButton::Left => 1,
            MouseButton::Middle => 2,
            MouseButton::Right => 3,
            MouseButton::Side => 8,
            MouseButton::Extra => 9,
        }
    }
}

impl FromStr for MouseButton {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" | "primary" | "1" => Ok(MouseButton::Left),
            "middle" | "2" => Ok(MouseButton::Middle),
            "right" | "3" => Ok(MouseButton::Right),
            "side" | "back" | "8" => Ok(MouseButton::Side),
            "extra" | "forward" | "9" => Ok(MouseButton::Extra),
            _ => Err(format!("Unknown mouse button: {}", s)),
        }
    }
}

impl std::fmt::Display for MouseButton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MouseButton::Left => "left",
            MouseButton::Middle => "middle",
            MouseButton::Right => "right",
            MouseButton::Side => "side",
            MouseButton::Extra => "extra",
        };
        f.write_str(name)
    }
}
