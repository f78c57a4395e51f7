//! QR bitmap drawing behind a narrow `draw(payload, target, options)` seam.
use qrcode::{Color, EcLevel, QrCode};
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, thiserror::Error)]
pub enum DrawError {
    #[error("encode QR bitmap: {0}")]
    Encode(#[from] qrcode::types::QrError),
    #[error("write QR bitmap: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid QR options: {0}")]
    Options(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCorrection {
    L,
    M,
    Q,
    H,
}

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::L => EcLevel::L,
            ErrorCorrection::M => EcLevel::M,
            ErrorCorrection::Q => EcLevel::Q,
            ErrorCorrection::H => EcLevel::H,
        }
    }
}

/// Output encoding for a drawn bitmap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QrFormat {
    /// Half-block characters, two modules per text row.
    #[default]
    Terminal,
    Svg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrOptions {
    /// Pixels per module (SVG only).
    pub scale: u32,
    /// Quiet zone width in modules.
    pub margin: u32,
    pub error_correction: ErrorCorrection,
    pub format: QrFormat,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            scale: 10,
            margin: 1,
            error_correction: ErrorCorrection::L,
            format: QrFormat::Terminal,
        }
    }
}

pub trait QrDrawer {
    fn draw(
        &self,
        payload: &str,
        target: &mut dyn Write,
        options: &QrOptions,
    ) -> Result<(), DrawError>;
}

/// Drawer backed by the `qrcode` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct QrCodeDrawer;

impl QrDrawer for QrCodeDrawer {
    fn draw(
        &self,
        payload: &str,
        target: &mut dyn Write,
        options: &QrOptions,
    ) -> Result<(), DrawError> {
        if options.scale == 0 {
            return Err(DrawError::Options("scale must be at least 1".to_string()));
        }
        let code = QrCode::with_error_correction_level(
            payload.as_bytes(),
            options.error_correction.into(),
        )?;
        let grid = ModuleGrid::new(&code, options.margin as usize);
        match options.format {
            QrFormat::Terminal => grid.write_terminal(target)?,
            QrFormat::Svg => grid.write_svg(target, options.scale as usize)?,
        }
        Ok(())
    }
}

/// Dark/light modules with the quiet zone already applied.
///
/// The `qrcode` renderers only offer a fixed four-module quiet zone, and a
/// one-module margin is half a `Dense1x2` text row, so both outputs are drawn
/// from this grid instead.
struct ModuleGrid {
    size: usize,
    dark: Vec<bool>,
}

impl ModuleGrid {
    fn new(code: &QrCode, margin: usize) -> Self {
        let width = code.width();
        let size = width + margin * 2;
        let mut dark = vec![false; size * size];
        for (idx, color) in code.to_colors().into_iter().enumerate() {
            if color == Color::Dark {
                let (row, col) = (idx / width, idx % width);
                dark[(row + margin) * size + col + margin] = true;
            }
        }
        Self { size, dark }
    }

    fn is_dark(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size && self.dark[row * self.size + col]
    }

    fn write_terminal(&self, out: &mut dyn Write) -> std::io::Result<()> {
        for row in (0..self.size).step_by(2) {
            let line: String = (0..self.size)
                .map(|col| match (self.is_dark(row, col), self.is_dark(row + 1, col)) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                })
                .collect();
            writeln!(out, "{}", line.trim_end())?;
        }
        Ok(())
    }

    fn write_svg(&self, out: &mut dyn Write, scale: usize) -> std::io::Result<()> {
        let px = self.size * scale;
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{px}" height="{px}" viewBox="0 0 {px} {px}" shape-rendering="crispEdges">"#
        )?;
        writeln!(out, r##"<rect width="100%" height="100%" fill="#ffffff"/>"##)?;
        write!(out, r##"<path fill="#000000" d=""##)?;
        for row in 0..self.size {
            for col in 0..self.size {
                if self.is_dark(row, col) {
                    write!(
                        out,
                        "M{x} {y}h{scale}v{scale}h-{scale}z",
                        x = col * scale,
                        y = row * scale
                    )?;
                }
            }
        }
        writeln!(out, r#""/>"#)?;
        writeln!(out, "</svg>")?;
        Ok(())
    }
}
