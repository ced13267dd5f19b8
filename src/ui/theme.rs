//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::DeltaBadge;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights, the key metric marker and trend lines.
    pub highlight: Color,
    /// Color for desirable changes.
    pub good: Color,
    /// Color for undesirable changes.
    pub bad: Color,
    /// Color for comparison series and secondary text.
    pub muted: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for category rows.
    pub category: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active horizon tab.
    pub tab_active: Style,
    /// Style for inactive horizon tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        Self {
            highlight: Color::Cyan,
            good: Color::Green,
            bad: Color::Red,
            muted: Color::Gray,
            border: Color::Gray,
            header: bold.fg(Color::Cyan),
            category: bold,
            selected: bold.bg(Color::DarkGray),
            tab_active: bold.fg(Color::Cyan),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        Self {
            highlight: Color::Blue,
            good: Color::Green,
            bad: Color::Red,
            muted: Color::DarkGray,
            border: Color::DarkGray,
            header: bold.fg(Color::Blue),
            category: bold,
            selected: bold.bg(Color::LightBlue),
            tab_active: bold.fg(Color::Blue),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Style for a delta badge: good or bad after inversion.
    pub fn delta_style(&self, badge: &DeltaBadge) -> Style {
        if badge.is_good {
            Style::default().fg(self.good)
        } else {
            Style::default().fg(self.bad)
        }
    }

    /// Style for the comparison series and other secondary text.
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted).add_modifier(Modifier::DIM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DeltaMode, MetricValue, ValueFormat};

    #[test]
    fn test_delta_style_follows_inversion() {
        let theme = Theme::dark();
        let value = MetricValue::new(110.0, 100.0, ValueFormat::Number);

        let normal = DeltaBadge::new(&value, DeltaMode::Pct, false);
        assert_eq!(theme.delta_style(&normal).fg, Some(Color::Green));

        let inverted = DeltaBadge::new(&value, DeltaMode::Pct, true);
        assert_eq!(theme.delta_style(&inverted).fg, Some(Color::Red));
    }
}
