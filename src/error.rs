//! # 错误类型模块
//!
//! [`StegoError`] 覆盖了从读取载体到校验容器字段的所有失败情形。
//! 核心函数一律返回 `Result<T, StegoError>`，由调用方决定如何报告。

use std::io;
use thiserror::Error;

/// 隐写编码或解码过程中可能出现的错误。
#[derive(Debug, Error)]
pub enum StegoError {
    /// 无法读取载体图像。
    #[error("unable to read carrier image: {0}")]
    UnreadableCarrier(#[source] io::Error),

    /// 无法写入输出目标。
    #[error("unable to write output: {0}")]
    UnwritableOutput(#[source] io::Error),

    /// 载体的像素区域不足以容纳整个容器。
    #[error("carrier is too small: {required} pixel bytes required, {available} available")]
    InsufficientCapacity { required: u64, available: u64 },

    /// 签名字节与预期不符，载体中没有本格式的容器。
    #[error("signature mismatch at byte {index}: expected {expected:#04x}, found {found:#04x}")]
    SignatureMismatch { index: usize, expected: u8, found: u8 },

    /// 扩展名长度字段与预期不符。
    #[error("extension length mismatch: expected {expected}, found {found}")]
    ExtensionLengthMismatch { expected: u32, found: u32 },

    /// 扩展名字节与预期不符。
    #[error("extension mismatch: expected {expected:?}, found {found:?}")]
    ExtensionMismatch { expected: String, found: String },

    /// 长度超出 32 位长度字段的表示范围。
    #[error("length {0} does not fit in a 32-bit length field")]
    LengthOutOfRange(u64),

    /// 容器格式参数无效。
    #[error("invalid container format: {0}")]
    InvalidFormat(String),

    /// 载体头部无效或不受支持。
    #[error("invalid carrier: {0}")]
    InvalidCarrier(String),

    /// 超出预期范围的读写 (例如在载体末尾之后继续读取)。
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl StegoError {
    /// 将读取载体时的 I/O 错误归类：越界读取 (`UnexpectedEof`) 视为 [`StegoError::Io`]，
    /// 其余视为载体不可读。
    pub(crate) fn from_carrier_read(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => Self::Io(err),
            _ => Self::UnreadableCarrier(err),
        }
    }
}
