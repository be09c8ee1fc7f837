//! HTML marker icons.

use serde::{Deserialize, Serialize};

/// A marker icon rendered from an HTML fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerIcon {
    /// Classes on the icon's wrapper element
    pub class_name: String,
    pub html: String,
    /// Icon box in pixels (width, height)
    pub size: (u32, u32),
    /// Pixel within the icon box placed at the marker's coordinate
    pub anchor: (i32, i32),
}

impl MarkerIcon {
    pub fn new(class_name: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            html: html.into(),
            size: (0, 0),
            anchor: (0, 0),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn with_anchor(mut self, x: i32, y: i32) -> Self {
        self.anchor = (x, y);
        self
    }

    /// Anchor at the center of the icon box.
    pub fn centered(self) -> Self {
        let (w, h) = self.size;
        let x = (w as f64 / 2.0).round() as i32;
        let y = (h as f64 / 2.0).round() as i32;
        self.with_anchor(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_anchor() {
        let icon = MarkerIcon::new("m", "<div></div>").with_size(75, 60).centered();
        assert_eq!(icon.anchor, (38, 30));
    }
}
