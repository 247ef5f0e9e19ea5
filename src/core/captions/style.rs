//! Subtitle Styling and ASS Rendering
//!
//! A style variant is a named screen position plus font/color/margin
//! attributes. The same timed entries are rendered once per configured
//! position into standalone Advanced SubStation Alpha (ASS) tracks, which
//! the video editor then burns into video copies.

use serde::{Deserialize, Serialize};

use super::SubtitleEntry;

/// Screen position of a rendered subtitle track, on the ASS numpad layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenPosition {
    BottomLeft,
    BottomCenter,
    BottomRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    TopLeft,
    TopCenter,
    TopRight,
}

impl ScreenPosition {
    /// ASS `Alignment` value (numpad layout, 1 = bottom left).
    pub fn ass_alignment(&self) -> u8 {
        match self {
            ScreenPosition::BottomLeft => 1,
            ScreenPosition::BottomCenter => 2,
            ScreenPosition::BottomRight => 3,
            ScreenPosition::MiddleLeft => 4,
            ScreenPosition::MiddleCenter => 5,
            ScreenPosition::MiddleRight => 6,
            ScreenPosition::TopLeft => 7,
            ScreenPosition::TopCenter => 8,
            ScreenPosition::TopRight => 9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenPosition::BottomLeft => "bottom_left",
            ScreenPosition::BottomCenter => "bottom_center",
            ScreenPosition::BottomRight => "bottom_right",
            ScreenPosition::MiddleLeft => "middle_left",
            ScreenPosition::MiddleCenter => "middle_center",
            ScreenPosition::MiddleRight => "middle_right",
            ScreenPosition::TopLeft => "top_left",
            ScreenPosition::TopCenter => "top_center",
            ScreenPosition::TopRight => "top_right",
        }
    }
}

impl std::fmt::Display for ScreenPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RGBA color for ASS styling. Alpha 0 is opaque, 255 fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// ASS color literal: `&HAABBGGRR`.
    pub fn to_ass(self) -> String {
        format!("&H{:02X}{:02X}{:02X}{:02X}", self.a, self.b, self.g, self.r)
    }
}

/// Font/color/margin attributes shared by all rendered variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtitleStyle {
    pub font_name: String,
    pub font_size: u32,
    pub primary_color: Color,
    pub secondary_color: Color,
    pub outline_color: Color,
    pub back_color: Color,
    pub bold: bool,
    pub italic: bool,
    pub border_style: u8,
    pub outline: f64,
    pub shadow: f64,
    pub margin_l: u32,
    pub margin_r: u32,
    pub margin_v: u32,
}

impl Default for SubtitleStyle {
    fn default() -> Self {
        Self {
            font_name: "Verdana".to_string(),
            font_size: 18,
            primary_color: Color::rgba(255, 255, 0, 0),
            secondary_color: Color::rgba(255, 255, 0, 0),
            outline_color: Color::rgba(0, 0, 0, 0),
            back_color: Color::rgba(0, 0, 0, 128),
            bold: false,
            italic: false,
            border_style: 1,
            outline: 0.3,
            shadow: 1.0,
            margin_l: 10,
            margin_r: 10,
            margin_v: 20,
        }
    }
}

/// Renders one styled ASS track containing `entries` at `position`.
pub fn render_ass(entries: &[SubtitleEntry], style: &SubtitleStyle, position: ScreenPosition) -> String {
    let mut output = String::from(
        "[Script Info]\n\
         ScriptType: v4.00+\n\
         WrapStyle: 0\n\
         PlayResX: 384\n\
         PlayResY: 288\n\
         ScaledBorderAndShadow: yes\n\n",
    );

    output.push_str(
        "[V4+ Styles]\n\
         Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, \
         BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, \
         BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding\n",
    );
    output.push_str(&format!(
        "Style: Default,{},{},{},{},{},{},{},{},0,0,100,100,0,0,{},{},{},{},{},{},{},1\n\n",
        style.font_name,
        style.font_size,
        style.primary_color.to_ass(),
        style.secondary_color.to_ass(),
        style.outline_color.to_ass(),
        style.back_color.to_ass(),
        ass_bool(style.bold),
        ass_bool(style.italic),
        style.border_style,
        style.outline,
        style.shadow,
        position.ass_alignment(),
        style.margin_l,
        style.margin_r,
        style.margin_v,
    ));

    output.push_str(
        "[Events]\n\
         Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n",
    );
    for entry in entries {
        output.push_str(&format!(
            "Dialogue: 0,{},{},Default,,0,0,0,,{}\n",
            format_ass_timestamp(entry.start_sec),
            format_ass_timestamp(entry.end_sec),
            entry.text.replace('\n', "\\N"),
        ));
    }

    output
}

fn ass_bool(value: bool) -> i8 {
    if value {
        -1
    } else {
        0
    }
}

/// Formats seconds as an ASS timestamp (`H:MM:SS.cc`, centiseconds).
fn format_ass_timestamp(seconds: f64) -> String {
    let total_cs = (seconds * 100.0).round() as u64;
    let cs = total_cs % 100;
    let total_secs = total_cs / 100;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;

    format!("{}:{:02}:{:02}.{:02}", hours, mins, secs, cs)
}
