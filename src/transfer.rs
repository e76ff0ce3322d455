//! # 图像头部传输模块
//!
//! 头部区域原样复制，不参与位打包；编码结束后，像素区域中未使用的
//! 剩余字节也原样复制到输出。

use crate::constants::BMP_HEADER_SIZE;
use crate::error::StegoError;
use std::io::{self, Read, Seek, SeekFrom, Write};
use tracing::trace;

/// 将 `source` 开头的 54 字节原样复制到 `destination`。
///
/// # Errors
///
/// 载体不足 54 字节或无法读取时返回读取错误，写入失败时返回
/// [`StegoError::UnwritableOutput`]。
pub fn copy_header<R, W>(source: &mut R, destination: &mut W) -> Result<(), StegoError>
where
    R: Read + Seek,
    W: Write,
{
    source
        .seek(SeekFrom::Start(0))
        .map_err(StegoError::UnreadableCarrier)?;

    let mut header = [0u8; BMP_HEADER_SIZE];
    source
        .read_exact(&mut header)
        .map_err(StegoError::from_carrier_read)?;
    destination
        .write_all(&header)
        .map_err(StegoError::UnwritableOutput)?;

    trace!(bytes = BMP_HEADER_SIZE, "header copied");
    Ok(())
}

/// 将读取位置移动到头部之后，不解析头部内容。
///
/// # Errors
///
/// 定位失败时返回 [`StegoError::UnreadableCarrier`]。
pub fn skip_header<R: Seek>(source: &mut R) -> Result<(), StegoError> {
    source
        .seek(SeekFrom::Start(BMP_HEADER_SIZE as u64))
        .map_err(StegoError::UnreadableCarrier)?;
    Ok(())
}

/// 将 `source` 中剩余的所有字节原样复制到 `destination`，返回复制的字节数。
///
/// # Errors
///
/// 读取失败时返回 [`StegoError::UnreadableCarrier`]，写入失败时返回
/// [`StegoError::UnwritableOutput`]。
pub fn copy_tail<R: Read, W: Write>(source: &mut R, destination: &mut W) -> Result<u64, StegoError> {
    let mut buffer = [0u8; 8192];
    let mut copied = 0u64;

    loop {
        let read = match source.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(StegoError::UnreadableCarrier(e)),
        };
        destination
            .write_all(&buffer[..read])
            .map_err(StegoError::UnwritableOutput)?;
        copied += read as u64;
    }

    trace!(bytes = copied, "tail copied");
    Ok(copied)
}
