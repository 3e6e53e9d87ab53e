use serde::{Deserialize, Serialize};

/// RGBA color tuple (red, green, blue, alpha) with values in 0.0..=1.0.
pub type Rgba = (f32, f32, f32, f32);

/// Line rendering style of a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
    DashDot,
}

impl LineStyle {
    /// Parses a dialog token ("-", "--", ":", "-."). Returns `None` for
    /// unknown tokens; the empty token is handled by the caller.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "-" => Some(Self::Solid),
            "--" => Some(Self::Dashed),
            ":" => Some(Self::Dotted),
            "-." => Some(Self::DashDot),
            _ => None,
        }
    }
}

/// Marker glyph drawn at trace points and used for head markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Marker {
    Circle,
    Cross,
    Plus,
    Asterisk,
    Square,
    Diamond,
}

impl Marker {
    /// Parses a dialog token ("o", "x", "+", "*", "s", "d"). Returns `None`
    /// for unknown tokens; the empty token means "no marker" upstream.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "o" => Some(Self::Circle),
            "x" => Some(Self::Cross),
            "+" => Some(Self::Plus),
            "*" => Some(Self::Asterisk),
            "s" => Some(Self::Square),
            "d" => Some(Self::Diamond),
            _ => None,
        }
    }
}

/// Resolved appearance of one trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceStyle {
    pub line: LineStyle,
    pub marker: Option<Marker>,
    pub color: Rgba,
}

/// Line colors cycled over object index.
const LINE_PALETTE: [Rgba; 7] = [
    (0.00, 0.45, 0.74, 1.0), // blue
    (0.85, 0.33, 0.10, 1.0), // orange
    (0.93, 0.69, 0.13, 1.0), // yellow
    (0.49, 0.18, 0.56, 1.0), // purple
    (0.47, 0.67, 0.19, 1.0), // green
    (0.30, 0.75, 0.93, 1.0), // cyan
    (0.64, 0.08, 0.18, 1.0), // red
];

/// Head marker shapes, cycled independently of line colors.
const MARKER_PALETTE: [Marker; 6] = [
    Marker::Circle,
    Marker::Cross,
    Marker::Plus,
    Marker::Asterisk,
    Marker::Square,
    Marker::Diamond,
];

/// Line color for the object with the given zero-based index.
pub fn line_color(index: usize) -> Rgba {
    LINE_PALETTE[index % LINE_PALETTE.len()]
}

/// Head marker shape for the object with the given zero-based index.
pub fn head_shape(index: usize) -> Marker {
    MARKER_PALETTE[index % MARKER_PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_palette_cycles() {
        assert_eq!(line_color(0), line_color(7));
        assert_eq!(line_color(3), line_color(10));
        assert_ne!(line_color(0), line_color(1));
    }

    #[test]
    fn test_marker_palette_cycles() {
        assert_eq!(head_shape(0), Marker::Circle);
        assert_eq!(head_shape(6), Marker::Circle);
        assert_eq!(head_shape(1), head_shape(7));
    }

    #[test]
    fn test_palettes_are_distinct_spaces() {
        // Shape palette has its own period, independent of line colors.
        assert_ne!(LINE_PALETTE.len(), 0);
        assert_ne!(MARKER_PALETTE.len(), LINE_PALETTE.len());
    }

    #[test]
    fn test_line_style_tokens() {
        assert_eq!(LineStyle::from_token("-"), Some(LineStyle::Solid));
        assert_eq!(LineStyle::from_token("--"), Some(LineStyle::Dashed));
        assert_eq!(LineStyle::from_token(":"), Some(LineStyle::Dotted));
        assert_eq!(LineStyle::from_token("-."), Some(LineStyle::DashDot));
        assert_eq!(LineStyle::from_token("~"), None);
    }

    #[test]
    fn test_marker_tokens() {
        assert_eq!(Marker::from_token("o"), Some(Marker::Circle));
        assert_eq!(Marker::from_token("d"), Some(Marker::Diamond));
        assert_eq!(Marker::from_token("q"), None);
    }
}
