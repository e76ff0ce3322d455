//! # 容器解码模块
//!
//! 与编码顺序对称地读取像素区域，但签名、扩展名长度和扩展名都要逐字段校验，
//! 任一字段不符即终止，不产生任何载荷输出。

use crate::bitpack::{ByteWindow, WordWindow, unpack, unpack32};
use crate::constants::{BITS_PER_BYTE, LENGTH_WINDOW_SIZE};
use crate::container::ContainerFormat;
use crate::error::StegoError;
use crate::transfer::skip_header;
use std::io::{Read, Seek, Write};
use tracing::{debug, trace};

/// 载荷一次写出的块大小。
const PAYLOAD_CHUNK: usize = 4096;

/// 解码状态机的各个阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStage {
    HeaderSkipped,
    SignatureVerified,
    ExtensionLengthVerified,
    ExtensionVerified,
    PayloadLengthRead { payload_len: u32 },
    PayloadExtracted,
}

/// 容器解码器。
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    format: ContainerFormat,
}

impl Decoder {
    /// 使用指定的容器格式创建解码器。
    pub fn new(format: ContainerFormat) -> Self {
        Self { format }
    }

    /// 解码时用于校验的容器格式。
    pub fn format(&self) -> &ContainerFormat {
        &self.format
    }

    /// 从 `carrier` 中提取载荷写入 `output`，返回载荷字节数。
    ///
    /// # Errors
    ///
    /// 参见 [`Decoder::decode_with_progress`]。
    pub fn decode<C, W>(&self, carrier: &mut C, output: &mut W) -> Result<u32, StegoError>
    where
        C: Read + Seek,
        W: Write,
    {
        self.decode_with_progress(carrier, output, |_| {})
    }

    /// 与 [`Decoder::decode`] 相同，每完成一个阶段调用一次 `on_stage`。
    ///
    /// # Errors
    ///
    /// * [`StegoError::SignatureMismatch`]、[`StegoError::ExtensionLengthMismatch`]、
    ///   [`StegoError::ExtensionMismatch`]：载体中没有本格式的有效容器。
    /// * [`StegoError::Io`]：在载荷读完之前载体已耗尽。
    /// * [`StegoError::UnwritableOutput`]：写入 `output` 失败。
    pub fn decode_with_progress<C, W, F>(
        &self,
        carrier: &mut C,
        output: &mut W,
        mut on_stage: F,
    ) -> Result<u32, StegoError>
    where
        C: Read + Seek,
        W: Write,
        F: FnMut(DecodeStage),
    {
        let mut advance = |stage: DecodeStage| {
            debug!(?stage, "decoder advanced");
            on_stage(stage);
        };

        skip_header(carrier)?;
        advance(DecodeStage::HeaderSkipped);

        self.verify_signature(carrier)?;
        advance(DecodeStage::SignatureVerified);

        let expected_len = self.format.extension_len();
        let found_len = extract_word(carrier)?;
        if found_len != expected_len {
            return Err(StegoError::ExtensionLengthMismatch {
                expected: expected_len,
                found: found_len,
            });
        }
        advance(DecodeStage::ExtensionLengthVerified);

        self.verify_extension(carrier)?;
        advance(DecodeStage::ExtensionVerified);

        let payload_len = extract_word(carrier)?;
        advance(DecodeStage::PayloadLengthRead { payload_len });

        extract_payload(carrier, payload_len, output)?;
        advance(DecodeStage::PayloadExtracted);

        Ok(payload_len)
    }

    fn verify_signature<R: Read>(&self, carrier: &mut R) -> Result<(), StegoError> {
        for (index, &expected) in self.format.signature().iter().enumerate() {
            let found = extract_byte(carrier)?;
            if found != expected {
                return Err(StegoError::SignatureMismatch {
                    index,
                    expected,
                    found,
                });
            }
        }
        Ok(())
    }

    fn verify_extension<R: Read>(&self, carrier: &mut R) -> Result<(), StegoError> {
        let expected = self.format.extension();
        let found = (0..expected.len())
            .map(|_| extract_byte(carrier))
            .collect::<Result<Vec<u8>, StegoError>>()?;

        if found != expected.as_bytes() {
            return Err(StegoError::ExtensionMismatch {
                expected: expected.to_string(),
                found: String::from_utf8_lossy(&found).into_owned(),
            });
        }
        Ok(())
    }
}

/// 读取下一个 8 字节窗口并还原一个字节。
fn extract_byte<R: Read>(carrier: &mut R) -> Result<u8, StegoError> {
    let mut window: ByteWindow = [0; BITS_PER_BYTE];
    carrier
        .read_exact(&mut window)
        .map_err(StegoError::from_carrier_read)?;
    Ok(unpack(&window))
}

/// 读取下一个 32 字节窗口并还原一个 32 位长度字段。
fn extract_word<R: Read>(carrier: &mut R) -> Result<u32, StegoError> {
    let mut window: WordWindow = [0; LENGTH_WINDOW_SIZE];
    carrier
        .read_exact(&mut window)
        .map_err(StegoError::from_carrier_read)?;
    let value = unpack32(&window);
    trace!(value, "length field extracted");
    Ok(value)
}

fn extract_payload<R: Read, W: Write>(
    carrier: &mut R,
    payload_len: u32,
    output: &mut W,
) -> Result<(), StegoError> {
    let mut chunk = Vec::with_capacity(PAYLOAD_CHUNK);

    for _ in 0..payload_len {
        chunk.push(extract_byte(carrier)?);
        if chunk.len() == PAYLOAD_CHUNK {
            output
                .write_all(&chunk)
                .map_err(StegoError::UnwritableOutput)?;
            chunk.clear();
        }
    }

    output
        .write_all(&chunk)
        .map_err(StegoError::UnwritableOutput)?;
    output.flush().map_err(StegoError::UnwritableOutput)
}
