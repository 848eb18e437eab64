// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Larissa-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Larissa and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::{env, error::Error, fmt};

use ratatui::style::{Color, Modifier, Style};

use crate::render::LineKind;

const PALETTE_ENV: &str = "LARISSA_PALETTE";

/// Color treatments for the pager: one per content class, one for link
/// entries, plus chrome. The defaults follow the 16-color terminal palette;
/// `LARISSA_PALETTE` overrides them with concrete RGB values.
#[derive(Debug, Clone, Default)]
pub struct TuiTheme {
    palette: Option<PagerPalette>,
}

impl TuiTheme {
    pub fn from_env() -> Result<Self, ThemeError> {
        let palette = palette_override_from_env()?;
        Ok(Self { palette })
    }

    fn base_style(&self) -> Style {
        match &self.palette {
            Some(palette) => Style::default().fg(palette.fg).bg(palette.bg),
            None => Style::default(),
        }
    }

    pub fn content_style(&self, kind: LineKind) -> Style {
        match kind {
            LineKind::Plain => self.base_style(),
            LineKind::Heading => self
                .base_style()
                .fg(self.palette_color(|palette| palette.heading, Color::Cyan))
                .add_modifier(Modifier::BOLD),
            LineKind::FrontMatter => self
                .base_style()
                .fg(self.palette_color(|palette| palette.front_matter, Color::DarkGray)),
            LineKind::CodeBlock => self
                .base_style()
                .fg(self.palette_color(|palette| palette.code_block, Color::Yellow)),
        }
    }

    pub fn link_style(&self) -> Style {
        self.base_style().fg(self.palette_color(|palette| palette.link, Color::LightBlue))
    }

    pub fn border_style(&self) -> Style {
        self.base_style().fg(Color::DarkGray)
    }

    pub fn selection_style(&self) -> Style {
        self.base_style().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    }

    pub fn toast_style(&self) -> Style {
        self.base_style().fg(Color::Red)
    }

    pub fn footer_key_style(&self) -> Style {
        self.base_style().fg(Color::Cyan)
    }

    pub fn footer_label_style(&self) -> Style {
        self.base_style().fg(Color::Gray)
    }

    fn palette_color(&self, pick: impl Fn(&PagerPalette) -> Color, fallback: Color) -> Color {
        match &self.palette {
            Some(palette) => pick(palette),
            None => fallback,
        }
    }
}

#[derive(Debug, Clone)]
struct PagerPalette {
    fg: Color,
    bg: Color,
    heading: Color,
    front_matter: Color,
    code_block: Color,
    link: Color,
}

impl PagerPalette {
    const CSV_LEN: usize = 6;

    fn parse_csv(value: &str) -> Result<Self, String> {
        let parts: Vec<&str> = value.split(',').map(|part| part.trim()).collect();
        if parts.len() != Self::CSV_LEN {
            return Err(format!(
                "expected {} comma-separated colors (fg,bg,heading,frontmatter,code,link), got {}",
                Self::CSV_LEN,
                parts.len()
            ));
        }

        Ok(Self {
            fg: parse_palette_color(parts[0])?,
            bg: parse_palette_color(parts[1])?,
            heading: parse_palette_color(parts[2])?,
            front_matter: parse_palette_color(parts[3])?,
            code_block: parse_palette_color(parts[4])?,
            link: parse_palette_color(parts[5])?,
        })
    }
}

fn palette_override_from_env() -> Result<Option<PagerPalette>, ThemeError> {
    let value = match env::var(PALETTE_ENV) {
        Ok(value) => value,
        Err(env::VarError::NotPresent) => return Ok(None),
        Err(env::VarError::NotUnicode(_)) => {
            return Err(ThemeError::InvalidEnv {
                name: PALETTE_ENV.to_string(),
                value: "<non-unicode>".to_string(),
            });
        }
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let parsed = PagerPalette::parse_csv(trimmed).map_err(|error| ThemeError::InvalidEnv {
        name: PALETTE_ENV.to_string(),
        value: format!("{trimmed} ({error})"),
    })?;

    Ok(Some(parsed))
}

fn parse_palette_color(value: &str) -> Result<Color, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("empty color".to_string());
    }

    let hex = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(format!("invalid hex color: {trimmed} (expected #RRGGBB)"));
    }
    let rgb = u32::from_str_radix(hex, 16).map_err(|_| format!("invalid hex color: {trimmed}"))?;
    let r = ((rgb >> 16) & 0xFF) as u8;
    let g = ((rgb >> 8) & 0xFF) as u8;
    let b = (rgb & 0xFF) as u8;
    Ok(Color::Rgb(r, g, b))
}

#[derive(Debug, Clone)]
pub enum ThemeError {
    InvalidEnv { name: String, value: String },
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnv { name, value } => write!(f, "invalid env {name}={value}"),
        }
    }
}

impl Error for ThemeError {}
