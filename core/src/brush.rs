use serde::{Deserialize, Serialize};
use tiny_skia::{BlendMode, Color, LineCap, LineJoin, Paint, Stroke};

pub const MIN_BRUSH_SIZE: u32 = 1;
pub const MAX_BRUSH_SIZE: u32 = 60;
pub const DEFAULT_BRUSH_SIZE: u32 = 6;
pub const DEFAULT_COLOR: Rgb = Rgb {
    r: 0x1f,
    g: 0x1f,
    b: 0x1f,
};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parses `#rrggbb` or `#rgb`, the forms a color input reports.
    pub fn parse_hex(value: &str) -> Option<Self> {
        let hex = value.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            6 => Some(Self {
                r: u8::from_str_radix(&hex[0..2], 16).ok()?,
                g: u8::from_str_radix(&hex[2..4], 16).ok()?,
                b: u8::from_str_radix(&hex[4..6], 16).ok()?,
            }),
            3 => {
                let channel = |index: usize| {
                    u8::from_str_radix(&hex[index..index + 1], 16)
                        .ok()
                        .map(|v| v * 17)
                };
                Some(Self {
                    r: channel(0)?,
                    g: channel(1)?,
                    b: channel(2)?,
                })
            }
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    #[default]
    Draw,
    Erase,
}

impl ToolMode {
    /// Anything other than `erase` draws.
    pub fn from_control(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("erase") {
            ToolMode::Erase
        } else {
            ToolMode::Draw
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToolState {
    pub color: Rgb,
    pub size: u32,
    pub mode: ToolMode,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR,
            size: DEFAULT_BRUSH_SIZE,
            mode: ToolMode::Draw,
        }
    }
}

impl ToolState {
    /// Builds a tool snapshot from raw control values, falling back to the
    /// defaults for anything unparseable.
    pub fn from_controls(color: &str, size: &str, mode: &str) -> Self {
        let size = size
            .trim()
            .parse::<f64>()
            .ok()
            .map(sanitize_size)
            .unwrap_or(DEFAULT_BRUSH_SIZE);
        Self {
            color: Rgb::parse_hex(color).unwrap_or(DEFAULT_COLOR),
            size,
            mode: ToolMode::from_control(mode),
        }
    }
}

pub fn sanitize_size(size: f64) -> u32 {
    if !size.is_finite() {
        return DEFAULT_BRUSH_SIZE;
    }
    (size.round() as i64).clamp(MIN_BRUSH_SIZE as i64, MAX_BRUSH_SIZE as i64) as u32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compositing {
    /// Paint over existing content.
    SourceOver,
    /// Subtract coverage from existing alpha.
    DestinationOut,
}

impl From<Compositing> for BlendMode {
    fn from(value: Compositing) -> Self {
        match value {
            Compositing::SourceOver => BlendMode::SourceOver,
            Compositing::DestinationOut => BlendMode::DestinationOut,
        }
    }
}

/// Rendering parameters for one stroke segment, in backing-store pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrushParams {
    pub width: f32,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub compositing: Compositing,
    pub color: Rgb,
}

impl BrushParams {
    /// Width scales with the pixel ratio so the apparent thickness stays the
    /// same on every display.
    pub fn configure(tools: &ToolState, dpr: f64) -> Self {
        let width = (tools.size as f64 * dpr) as f32;
        match tools.mode {
            ToolMode::Draw => Self {
                width,
                line_cap: LineCap::Round,
                line_join: LineJoin::Round,
                compositing: Compositing::SourceOver,
                color: tools.color,
            },
            ToolMode::Erase => Self {
                width,
                line_cap: LineCap::Round,
                line_join: LineJoin::Round,
                compositing: Compositing::DestinationOut,
                color: Rgb { r: 0, g: 0, b: 0 },
            },
        }
    }

    pub(crate) fn paint(&self) -> Paint<'static> {
        let mut paint = Paint {
            anti_alias: true,
            blend_mode: self.compositing.into(),
            ..Default::default()
        };
        paint.set_color(Color::from_rgba8(self.color.r, self.color.g, self.color.b, 255));
        paint
    }

    pub(crate) fn stroke(&self) -> Stroke {
        Stroke {
            width: self.width,
            line_cap: self.line_cap,
            line_join: self.line_join,
            ..Default::default()
        }
    }
}
