//! The verification code printed on every page: a QR code of the record's
//! content hash, drawn as filled vector squares.

use crate::error::RenderError;
use lopdf::Object;
use lopdf::content::Operation;
use qrcode::{Color, EcLevel, QrCode, Version};
use titlepress_types::Rect;

pub const QR_VERSION: i16 = 6;
/// Light modules around the symbol, in modules.
pub const QUIET_ZONE: usize = 2;

#[derive(Debug, Clone)]
pub struct VerificationCode {
    width: usize,
    dark: Vec<bool>,
}

impl VerificationCode {
    pub fn encode(payload: &str) -> Result<Self, RenderError> {
        let code = QrCode::with_version(payload.as_bytes(), Version::Normal(QR_VERSION), EcLevel::M)
            .map_err(|e| RenderError::VerificationCode(e.to_string()))?;
        let dark = code.to_colors().into_iter().map(|c| c == Color::Dark).collect();
        Ok(Self {
            width: code.width(),
            dark,
        })
    }

    /// Modules per side, quiet zone excluded.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, row: usize, col: usize) -> bool {
        self.dark[row * self.width + col]
    }

    /// Draws the code into `region` (top-left page space) on a white
    /// background. Adjacent dark modules in a row share one rectangle.
    pub fn draw(&self, region: Rect, page_height: f32, ops: &mut Vec<Operation>) {
        let module = region.width.min(region.height) / (self.width + 2 * QUIET_ZONE) as f32;
        let real = |v: f32| Object::Real(v);

        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new("g", vec![real(1.0)]));
        ops.push(Operation::new(
            "re",
            vec![
                real(region.x),
                real(page_height - region.bottom()),
                real(region.width),
                real(region.height),
            ],
        ));
        ops.push(Operation::new("f", vec![]));
        ops.push(Operation::new("g", vec![real(0.0)]));

        for row in 0..self.width {
            let top = region.y + (row + QUIET_ZONE) as f32 * module;
            let mut col = 0;
            while col < self.width {
                if !self.is_dark(row, col) {
                    col += 1;
                    continue;
                }
                let start = col;
                while col < self.width && self.is_dark(row, col) {
                    col += 1;
                }
                ops.push(Operation::new(
                    "re",
                    vec![
                        real(region.x + (start + QUIET_ZONE) as f32 * module),
                        real(page_height - top - module),
                        real((col - start) as f32 * module),
                        real(module),
                    ],
                ));
            }
        }
        ops.push(Operation::new("f", vec![]));
        ops.push(Operation::new("Q", vec![]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn test_version_six_symbol() {
        let code = VerificationCode::encode(HASH).unwrap();
        assert_eq!(code.width(), 41);
        // Finder pattern corners are dark.
        assert!(code.is_dark(0, 0));
        assert!(code.is_dark(0, 40));
        assert!(code.is_dark(40, 0));
    }

    #[test]
    fn test_draw_stays_inside_region() {
        let code = VerificationCode::encode(HASH).unwrap();
        let region = Rect::new(500.0, 700.0, 64.0, 64.0);
        let mut ops = Vec::new();
        code.draw(region, 792.0, &mut ops);

        assert_eq!(ops.first().map(|o| o.operator.as_str()), Some("q"));
        assert_eq!(ops.last().map(|o| o.operator.as_str()), Some("Q"));
        for op in ops.iter().filter(|o| o.operator == "re") {
            let v: Vec<f32> = op.operands.iter().map(|o| o.as_float().unwrap()).collect();
            assert!(v[0] >= 500.0 - 1e-3 && v[0] + v[2] <= 564.0 + 1e-3);
            assert!(v[1] >= 792.0 - 764.0 - 1e-3 && v[1] + v[3] <= 92.0 + 1e-3);
        }
    }

    #[test]
    fn test_same_hash_same_modules() {
        let a = VerificationCode::encode(HASH).unwrap();
        let b = VerificationCode::encode(HASH).unwrap();
        assert_eq!(a.dark, b.dark);
    }
}
