#![deny(unsafe_code)]
//! Block-average mosaic.
//!
//! The source is cropped to the largest size divisible by `block_size`
//! (dropping a partial right/bottom margin), cut into square blocks, and
//! every block is repainted with its per-channel mean (integer division, so
//! the mean truncates). Unlike the other generators this one filters an
//! existing image instead of synthesizing from scratch; loading the source
//! from disk is left to the caller.

use art_forge_core::error::GenError;
use art_forge_core::params::{schema_of, IntParam, TextParam};
use art_forge_core::{CancelToken, Canvas, Generator, Rgb, Xorshift64};
use log::debug;
use serde_json::{json, Value};

pub const SOURCE: TextParam = TextParam::new("source", true, "Path of the image to pixelate");
const BLOCK_SIZE: IntParam = IntParam::new("block_size", 10, 1, 4096, "Edge of each square block (px)");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MosaicParams {
    pub source: String,
    pub block_size: usize,
}

impl MosaicParams {
    pub fn from_json(params: &Value) -> Result<Self, GenError> {
        let source = SOURCE
            .read(params)?
            .ok_or_else(|| GenError::invalid(SOURCE.name, "is required"))?;
        Ok(Self {
            source,
            block_size: BLOCK_SIZE.read_usize(params)?,
        })
    }
}

pub fn param_schema() -> Value {
    schema_of(&[&SOURCE, &BLOCK_SIZE])
}

/// Size of the cropped output for a `width × height` source.
///
/// Returns `GenError::InvalidParameter` for a zero block size and for
/// sources smaller than one block in either direction.
pub fn cropped_size(width: usize, height: usize, block: usize) -> Result<(usize, usize), GenError> {
    if block == 0 {
        return Err(GenError::invalid(BLOCK_SIZE.name, "must be >= 1, got 0"));
    }
    let (w, h) = (width - width % block, height - height % block);
    if w == 0 || h == 0 {
        return Err(GenError::invalid(
            BLOCK_SIZE.name,
            format!("{block} is larger than the {width}x{height} source"),
        ));
    }
    Ok((w, h))
}

/// Mean color of the `block × block` square whose top-left is `(x0, y0)`.
fn block_mean(source: &Canvas, x0: usize, y0: usize, block: usize) -> Rgb {
    let mut sums = [0u64; 3];
    for y in y0..y0 + block {
        let row = &source.pixels()[y * source.width() + x0..y * source.width() + x0 + block];
        for p in row {
            sums[0] += u64::from(p.r);
            sums[1] += u64::from(p.g);
            sums[2] += u64::from(p.b);
        }
    }
    let count = (block * block) as u64;
    Rgb::new(
        (sums[0] / count) as u8,
        (sums[1] / count) as u8,
        (sums[2] / count) as u8,
    )
}

/// Pixelates `source` into `block × block` tiles of their mean color.
pub fn mosaic_canvas(
    source: &Canvas,
    block: usize,
    cancel: &CancelToken,
) -> Result<Canvas, GenError> {
    let (width, height) = cropped_size(source.width(), source.height(), block)?;
    let mut out = Canvas::new(width, height)?;
    for y0 in (0..height).step_by(block) {
        cancel.check()?;
        for x0 in (0..width).step_by(block) {
            out.fill_rect(x0, y0, block, block, block_mean(source, x0, y0, block));
        }
    }
    debug!(
        "mosaic: {}x{} blocks of {block}px",
        width / block,
        height / block
    );
    Ok(out)
}

/// Mosaic generator over an already-loaded source canvas.
pub struct BlockMosaic {
    params: MosaicParams,
    source: Canvas,
}

impl BlockMosaic {
    /// Validates the block size against the source dimensions up front.
    pub fn new(params: MosaicParams, source: Canvas) -> Result<Self, GenError> {
        cropped_size(source.width(), source.height(), params.block_size)?;
        Ok(Self { params, source })
    }

    pub fn source(&self) -> &Canvas {
        &self.source
    }
}

impl Generator for BlockMosaic {
    fn name(&self) -> &'static str {
        "mosaic"
    }

    fn render(&self, _rng: &mut Xorshift64, cancel: &CancelToken) -> Result<Canvas, GenError> {
        mosaic_canvas(&self.source, self.params.block_size, cancel)
    }

    fn params(&self) -> Value {
        json!({
            "source": self.params.source,
            "block_size": self.params.block_size,
        })
    }

    fn param_schema(&self) -> Value {
        param_schema()
    }

    fn file_prefix(&self) -> &'static str {
        "mosaic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: usize, height: usize) -> Canvas {
        let bytes: Vec<u8> = (0..width * height)
            .flat_map(|i| {
                let (x, y) = (i % width, i / width);
                let v = if (x + y) % 2 == 0 { 200 } else { 50 };
                [v, (x * 7 % 256) as u8, (y * 13 % 256) as u8]
            })
            .collect();
        Canvas::from_rgb_bytes(width, height, &bytes).unwrap()
    }

    fn mosaic(source: &Canvas, block: usize) -> Canvas {
        mosaic_canvas(source, block, &CancelToken::new()).unwrap()
    }

    #[test]
    fn solid_source_stays_solid_at_cropped_size() {
        let color = Rgb::new(12, 34, 56);
        let source = Canvas::filled(23, 17, color).unwrap();
        let out = mosaic(&source, 5);
        assert_eq!((out.width(), out.height()), (20, 15));
        assert!(out.pixels().iter().all(|&p| p == color));
    }

    #[test]
    fn blocks_are_uniform_and_counted() {
        let source = checker(37, 26);
        let block = 6;
        let out = mosaic(&source, block);
        let (bw, bh) = (37 / block, 26 / block);
        assert_eq!((out.width(), out.height()), (bw * block, bh * block));

        let mut distinct_blocks = 0;
        for by in 0..bh {
            for bx in 0..bw {
                let first = out.get(bx * block, by * block).unwrap();
                for y in 0..block {
                    for x in 0..block {
                        assert_eq!(out.get(bx * block + x, by * block + y), Some(first));
                    }
                }
                distinct_blocks += 1;
            }
        }
        assert_eq!(distinct_blocks, (37 / 6) * (26 / 6));
    }

    #[test]
    fn mean_truncates() {
        // Two pixels of 0 and two of 255 average to 127.5 -> 127.
        let bytes = [0, 0, 0, 255, 255, 255, 255, 255, 255, 0, 0, 1];
        let source = Canvas::from_rgb_bytes(2, 2, &bytes).unwrap();
        let out = mosaic(&source, 2);
        assert_eq!(out.get(0, 0), Some(Rgb::new(127, 127, 127)));
    }

    #[test]
    fn block_size_one_is_identity() {
        let source = checker(9, 4);
        assert_eq!(mosaic(&source, 1), source);
    }

    #[test]
    fn zero_or_oversized_block_is_invalid() {
        let source = checker(8, 8);
        let cancel = CancelToken::new();
        assert!(matches!(
            mosaic_canvas(&source, 0, &cancel),
            Err(GenError::InvalidParameter { .. })
        ));
        assert!(matches!(
            mosaic_canvas(&source, 9, &cancel),
            Err(GenError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn params_require_source_and_reject_zero_block() {
        assert!(MosaicParams::from_json(&json!({"block_size": 4})).is_err());
        assert!(matches!(
            MosaicParams::from_json(&json!({"source": "a.png", "block_size": 0})),
            Err(GenError::InvalidParameter { .. })
        ));
        let p = MosaicParams::from_json(&json!({"source": "a.png"})).unwrap();
        assert_eq!(p.block_size, 10);
    }

    #[test]
    fn generator_validates_against_source_size() {
        let params = MosaicParams {
            source: "in-memory".into(),
            block_size: 20,
        };
        assert!(BlockMosaic::new(params.clone(), checker(10, 10)).is_err());
        let gen = BlockMosaic::new(params, checker(45, 41)).unwrap();
        let out = gen.render(&mut Xorshift64::new(1), &CancelToken::new()).unwrap();
        assert_eq!((out.width(), out.height()), (40, 40));
        assert_eq!(gen.params()["block_size"], 20);
    }

    #[test]
    fn cancellation_is_honoured() {
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(matches!(
            mosaic_canvas(&checker(8, 8), 2, &cancel),
            Err(GenError::Cancelled)
        ));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn output_size_and_block_uniformity(
                w in 1_usize..60,
                h in 1_usize..60,
                block in 1_usize..12,
            ) {
                prop_assume!(block <= w && block <= h);
                let out = mosaic(&checker(w, h), block);
                prop_assert_eq!(out.width(), w - w % block);
                prop_assert_eq!(out.height(), h - h % block);
                for y in 0..out.height() {
                    for x in 0..out.width() {
                        let anchor = out.get(x - x % block, y - y % block);
                        prop_assert_eq!(out.get(x, y), anchor);
                    }
                }
            }

            #[test]
            fn solid_color_any_block(r: u8, g: u8, b: u8, block in 1_usize..9) {
                let color = Rgb::new(r, g, b);
                let out = mosaic(&Canvas::filled(20, 13, color).unwrap(), block);
                prop_assert!(out.pixels().iter().all(|&p| p == color));
            }
        }
    }
}
