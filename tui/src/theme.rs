//! Color theme for the Resonant Notepad TUI.
//!
//! Kanagawa Wave palette by default with an optional high-contrast override.
//! The status bar background follows the harmony band.

use ratatui::style::{Color, Modifier, Style};

use notepad_app::UiOptions;
use notepad_types::HarmonyBand;

mod colors {
    use super::Color;

    // === Backgrounds (Sumi Ink) ===
    pub const BG_DARK: Color = Color::Rgb(22, 22, 29);
    pub const BG_PANEL: Color = Color::Rgb(31, 31, 40);
    pub const BG_BORDER: Color = Color::Rgb(84, 84, 109);

    // === Foregrounds (Fuji) ===
    pub const TEXT_PRIMARY: Color = Color::Rgb(220, 215, 186);
    pub const TEXT_MUTED: Color = Color::Rgb(114, 113, 105);
    pub const TEXT_ON_BAND: Color = Color::Rgb(22, 22, 29);

    // === Accents ===
    pub const PRIMARY: Color = Color::Rgb(149, 127, 184);
    pub const ACCENT: Color = Color::Rgb(127, 180, 202);
    pub const PEACH: Color = Color::Rgb(255, 160, 102);

    // === Harmony bands (status bar) ===
    pub const BAND_LOW: Color = Color::Rgb(255, 221, 221);
    pub const BAND_MID: Color = Color::Rgb(255, 248, 221);
    pub const BAND_HIGH: Color = Color::Rgb(221, 255, 221);
}

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_dark: Color,
    pub bg_panel: Color,
    pub bg_border: Color,
    pub text_primary: Color,
    pub text_muted: Color,
    pub text_on_band: Color,
    pub primary: Color,
    pub accent: Color,
    pub peach: Color,
    pub band_low: Color,
    pub band_mid: Color,
    pub band_high: Color,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg_dark: colors::BG_DARK,
            bg_panel: colors::BG_PANEL,
            bg_border: colors::BG_BORDER,
            text_primary: colors::TEXT_PRIMARY,
            text_muted: colors::TEXT_MUTED,
            text_on_band: colors::TEXT_ON_BAND,
            primary: colors::PRIMARY,
            accent: colors::ACCENT,
            peach: colors::PEACH,
            band_low: colors::BAND_LOW,
            band_mid: colors::BAND_MID,
            band_high: colors::BAND_HIGH,
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            bg_dark: Color::Black,
            bg_panel: Color::Black,
            bg_border: Color::Gray,
            text_primary: Color::White,
            text_muted: Color::Gray,
            text_on_band: Color::Black,
            primary: Color::White,
            accent: Color::Cyan,
            peach: Color::Yellow,
            band_low: Color::Red,
            band_mid: Color::Yellow,
            band_high: Color::Green,
        }
    }

    #[must_use]
    pub const fn band(&self, band: HarmonyBand) -> Color {
        match band {
            HarmonyBand::Low => self.band_low,
            HarmonyBand::Mid => self.band_mid,
            HarmonyBand::High => self.band_high,
        }
    }
}

#[must_use]
pub fn palette(options: UiOptions) -> Palette {
    if options.high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

pub mod styles {
    use super::{HarmonyBand, Modifier, Palette, Style};

    #[must_use]
    pub fn status_bar(palette: &Palette, band: HarmonyBand) -> Style {
        Style::default()
            .fg(palette.text_on_band)
            .bg(palette.band(band))
    }

    #[must_use]
    pub fn section_title(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn active_tab(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    #[must_use]
    pub fn inactive_tab(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn preview_heading(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.peach)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn prompt(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.bg_dark)
            .bg(palette.accent)
            .add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_colors_differ() {
        let palette = Palette::standard();
        assert_ne!(palette.band(HarmonyBand::Low), palette.band(HarmonyBand::Mid));
        assert_ne!(palette.band(HarmonyBand::Mid), palette.band(HarmonyBand::High));
    }

    #[test]
    fn high_contrast_uses_named_colors() {
        let palette = palette(UiOptions {
            ascii_only: false,
            high_contrast: true,
        });
        assert_eq!(palette.band(HarmonyBand::Low), Color::Red);
        assert_eq!(palette.bg_dark, Color::Black);
    }
}
