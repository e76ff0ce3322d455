//! # BMP 头部解析模块
//!
//! 只读取容量规划所需的几个字段：宽度、高度、每像素位数和压缩方式。
//! 头部本身在编码时原样复制，这里不做任何修改。

use crate::constants::{
    BITS_PER_PIXEL_OFFSET, BMP_HEADER_SIZE, BYTES_PER_PIXEL, COMPRESSION_OFFSET, HEIGHT_OFFSET,
    SUPPORTED_BITS_PER_PIXEL, WIDTH_OFFSET,
};
use crate::error::StegoError;
use image::ImageFormat;

/// 从 BMP 头部读取的几何信息。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpInfo {
    /// 图像宽度 (像素)。
    pub width: u32,
    /// 高度的绝对值；自上而下存储的位图在头部中记为负数。
    pub height: u32,
    /// 每像素位数，解析成功时总是 24。
    pub bits_per_pixel: u16,
    capacity: u64,
}

impl BmpInfo {
    /// 解析载体开头的头部。
    ///
    /// # Errors
    ///
    /// 数据不足 54 字节、内容不是 BMP、或不是未压缩的 24 位位图时返回
    /// [`StegoError::InvalidCarrier`]。
    pub fn parse(data: &[u8]) -> Result<Self, StegoError> {
        let header = data.get(..BMP_HEADER_SIZE).ok_or_else(|| {
            StegoError::InvalidCarrier(format!(
                "expected at least {BMP_HEADER_SIZE} header bytes, found {}",
                data.len()
            ))
        })?;

        match image::guess_format(header) {
            Ok(ImageFormat::Bmp) => {}
            _ => {
                return Err(StegoError::InvalidCarrier(
                    "file content is not a BMP image".to_string(),
                ));
            }
        }

        let width = read_u32_le(header, WIDTH_OFFSET);
        let height = (read_u32_le(header, HEIGHT_OFFSET) as i32).unsigned_abs();
        let bits_per_pixel = u16::from_le_bytes([
            header[BITS_PER_PIXEL_OFFSET],
            header[BITS_PER_PIXEL_OFFSET + 1],
        ]);
        let compression = read_u32_le(header, COMPRESSION_OFFSET);

        if bits_per_pixel != SUPPORTED_BITS_PER_PIXEL || compression != 0 {
            return Err(StegoError::InvalidCarrier(format!(
                "only uncompressed {SUPPORTED_BITS_PER_PIXEL}-bit bitmaps are supported \
                 (found {bits_per_pixel}-bit, compression {compression})"
            )));
        }

        let capacity = u64::from(width)
            .checked_mul(u64::from(height))
            .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL))
            .ok_or_else(|| {
                StegoError::InvalidCarrier(format!(
                    "image dimensions {width}x{height} are too large"
                ))
            })?;

        Ok(Self {
            width,
            height,
            bits_per_pixel,
            capacity,
        })
    }

    /// 像素区域可用于隐写的字节数：`宽 × 高 × 3`，解析时已确认不会溢出。
    pub fn capacity(&self) -> u64 {
        self.capacity
    }
}

fn read_u32_le(header: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        header[offset],
        header[offset + 1],
        header[offset + 2],
        header[offset + 3],
    ])
}
