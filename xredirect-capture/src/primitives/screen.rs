//! Screen geometry.

/// Screen dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScreenDimensions {
    pub width: u32,
    pub height: u32,
}

impl ScreenDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for ScreenDimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_as_wxh() {
        assert_eq!(ScreenDimensions::new(2, 3).to_string(), "2x3");
        assert_eq!(ScreenDimensions::new(1920, 1080).to_string(), "1920x1080");
    }
}
