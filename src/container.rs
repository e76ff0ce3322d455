//! # 容器格式模块
//!
//! 描述嵌入在像素区域中的容器：签名和扩展名。
//! 两者在编码和解码两端必须一致，解码时逐字段校验。

use crate::capacity;
use crate::constants::{DEFAULT_EXTENSION, SIGNATURE};
use crate::error::StegoError;

/// 容器的格式参数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerFormat {
    signature: Vec<u8>,
    extension: String,
}

impl Default for ContainerFormat {
    fn default() -> Self {
        Self {
            signature: SIGNATURE.to_vec(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl ContainerFormat {
    /// 使用自定义签名和扩展名创建格式。
    ///
    /// # Errors
    ///
    /// 签名为空，或扩展名长度超出 32 位长度字段时返回错误。
    pub fn new(signature: impl Into<Vec<u8>>, extension: impl Into<String>) -> Result<Self, StegoError> {
        let signature = signature.into();
        let extension = extension.into();

        if signature.is_empty() {
            return Err(StegoError::InvalidFormat(
                "container signature must not be empty".to_string(),
            ));
        }
        u32::try_from(extension.len())
            .map_err(|_| StegoError::LengthOutOfRange(extension.len() as u64))?;

        Ok(Self {
            signature,
            extension,
        })
    }

    /// 使用默认签名和指定扩展名创建格式。
    pub fn with_extension(extension: impl Into<String>) -> Result<Self, StegoError> {
        Self::new(SIGNATURE, extension)
    }

    /// 容器开头的魔术签名。
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// 写入容器并在解码时校验的扩展名。
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// 扩展名长度，即写入扩展名长度字段的值。
    pub fn extension_len(&self) -> u32 {
        // 构造时已校验
        self.extension.len() as u32
    }

    /// 容纳 `payload_len` 字节载荷所需的像素字节数。
    pub fn required_bytes(&self, payload_len: u64) -> Option<u64> {
        capacity::required_bytes(
            self.signature.len() as u64,
            self.extension.len() as u64,
            payload_len,
        )
    }

    /// 检查像素区域是否足以容纳 `payload_len` 字节的载荷。
    ///
    /// # Errors
    ///
    /// 容量不足时返回 [`StegoError::InsufficientCapacity`]。
    pub fn check_capacity(&self, pixel_bytes: u64, payload_len: u64) -> Result<(), StegoError> {
        if capacity::can_embed(
            pixel_bytes,
            self.signature.len() as u64,
            self.extension.len() as u64,
            payload_len,
        ) {
            Ok(())
        } else {
            Err(StegoError::InsufficientCapacity {
                required: self.required_bytes(payload_len).unwrap_or(u64::MAX),
                available: pixel_bytes,
            })
        }
    }
}
