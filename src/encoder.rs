//! # 容器编码模块
//!
//! 按固定顺序将容器写入载体的像素区域：
//! 头部 → 签名 → 扩展名长度 → 扩展名 → 载荷长度 → 载荷 → 剩余字节。
//! 每一步都从源载体读取下一个未使用的窗口，嵌入数据后按源顺序写入输出。

use crate::bitpack::{ByteWindow, WordWindow, pack, pack32};
use crate::constants::{BITS_PER_BYTE, LENGTH_WINDOW_SIZE};
use crate::container::ContainerFormat;
use crate::error::StegoError;
use crate::transfer::{copy_header, copy_tail};
use std::io::{Read, Seek, Write};
use tracing::{debug, trace};

/// 载荷一次读取的块大小。
const PAYLOAD_CHUNK: usize = 4096;

/// 编码状态机的各个阶段，严格按声明顺序推进。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeStage {
    HeaderCopied,
    SignatureWritten,
    ExtensionLengthWritten,
    ExtensionWritten,
    PayloadLengthWritten,
    PayloadWritten,
    TailCopied,
}

/// 一次成功编码的统计信息。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSummary {
    /// 写入的载荷字节数。
    pub payload_len: u32,
    /// 容器占用的像素字节数。
    pub pixel_bytes_used: u64,
    /// 原样复制的剩余字节数。
    pub tail_bytes: u64,
}

/// 容器编码器。
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    format: ContainerFormat,
}

impl Encoder {
    /// 使用指定的容器格式创建编码器。
    pub fn new(format: ContainerFormat) -> Self {
        Self { format }
    }

    /// 编码器写入的容器格式。
    pub fn format(&self) -> &ContainerFormat {
        &self.format
    }

    /// 将 `payload` 中恰好 `payload_len` 个字节隐藏到 `carrier` 中，结果写入 `output`。
    ///
    /// `pixel_bytes` 是载体像素区域的字节数 (通常为 `宽 × 高 × 3`)，
    /// 在写入任何字节之前用它做容量检查。
    ///
    /// # Errors
    ///
    /// 参见 [`Encoder::encode_with_progress`]。
    pub fn encode<C, P, W>(
        &self,
        carrier: &mut C,
        pixel_bytes: u64,
        payload: &mut P,
        payload_len: u64,
        output: &mut W,
    ) -> Result<EncodeSummary, StegoError>
    where
        C: Read + Seek,
        P: Read,
        W: Write,
    {
        self.encode_with_progress(carrier, pixel_bytes, payload, payload_len, output, |_| {})
    }

    /// 与 [`Encoder::encode`] 相同，每完成一个阶段调用一次 `on_stage`。
    ///
    /// # Errors
    ///
    /// 以下两种情况在写入任何字节之前返回错误：
    /// * `payload_len` 超出 32 位长度字段 ([`StegoError::LengthOutOfRange`])。
    /// * `pixel_bytes` 不足以容纳容器 ([`StegoError::InsufficientCapacity`])。
    ///
    /// 以下情况将立即返回错误，输出可能不完整：
    /// * 载体在容器写完之前耗尽 ([`StegoError::Io`])。
    /// * 载荷少于声明的长度 ([`StegoError::Io`])。
    /// * 读取载体或写入输出失败。
    pub fn encode_with_progress<C, P, W, F>(
        &self,
        carrier: &mut C,
        pixel_bytes: u64,
        payload: &mut P,
        payload_len: u64,
        output: &mut W,
        mut on_stage: F,
    ) -> Result<EncodeSummary, StegoError>
    where
        C: Read + Seek,
        P: Read,
        W: Write,
        F: FnMut(EncodeStage),
    {
        let declared_len =
            u32::try_from(payload_len).map_err(|_| StegoError::LengthOutOfRange(payload_len))?;
        self.format.check_capacity(pixel_bytes, payload_len)?;

        let mut advance = |stage: EncodeStage| {
            debug!(?stage, "encoder advanced");
            on_stage(stage);
        };

        copy_header(carrier, output)?;
        advance(EncodeStage::HeaderCopied);

        embed_bytes(carrier, output, self.format.signature())?;
        advance(EncodeStage::SignatureWritten);

        embed_word(carrier, output, self.format.extension_len())?;
        advance(EncodeStage::ExtensionLengthWritten);

        embed_bytes(carrier, output, self.format.extension().as_bytes())?;
        advance(EncodeStage::ExtensionWritten);

        embed_word(carrier, output, declared_len)?;
        advance(EncodeStage::PayloadLengthWritten);

        embed_payload(carrier, payload, payload_len, output)?;
        advance(EncodeStage::PayloadWritten);

        let tail_bytes = copy_tail(carrier, output)?;
        advance(EncodeStage::TailCopied);

        Ok(EncodeSummary {
            payload_len: declared_len,
            pixel_bytes_used: self.format.required_bytes(payload_len).unwrap_or(u64::MAX),
            tail_bytes,
        })
    }
}

/// 读取下一个 8 字节窗口，嵌入一个字节后写出。
fn embed_byte<R: Read, W: Write>(carrier: &mut R, output: &mut W, value: u8) -> Result<(), StegoError> {
    let mut window: ByteWindow = [0; BITS_PER_BYTE];
    carrier
        .read_exact(&mut window)
        .map_err(StegoError::from_carrier_read)?;
    pack(value, &mut window);
    output
        .write_all(&window)
        .map_err(StegoError::UnwritableOutput)
}

fn embed_bytes<R: Read, W: Write>(carrier: &mut R, output: &mut W, data: &[u8]) -> Result<(), StegoError> {
    data.iter()
        .try_for_each(|&value| embed_byte(carrier, output, value))?;
    trace!(bytes = data.len(), "field embedded");
    Ok(())
}

/// 读取下一个 32 字节窗口，嵌入一个 32 位长度字段后写出。
fn embed_word<R: Read, W: Write>(carrier: &mut R, output: &mut W, value: u32) -> Result<(), StegoError> {
    let mut window: WordWindow = [0; LENGTH_WINDOW_SIZE];
    carrier
        .read_exact(&mut window)
        .map_err(StegoError::from_carrier_read)?;
    pack32(value, &mut window);
    output
        .write_all(&window)
        .map_err(StegoError::UnwritableOutput)?;
    trace!(value, "length field embedded");
    Ok(())
}

fn embed_payload<R, P, W>(
    carrier: &mut R,
    payload: &mut P,
    payload_len: u64,
    output: &mut W,
) -> Result<(), StegoError>
where
    R: Read,
    P: Read,
    W: Write,
{
    let mut chunk = [0u8; PAYLOAD_CHUNK];
    let mut remaining = payload_len;

    while remaining > 0 {
        let want = remaining.min(PAYLOAD_CHUNK as u64) as usize;
        payload.read_exact(&mut chunk[..want])?;
        embed_bytes(carrier, output, &chunk[..want])?;
        remaining -= want as u64;
    }

    Ok(())
}
