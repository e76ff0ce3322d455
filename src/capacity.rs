//! # 容量规划模块
//!
//! 在写入任何载体字节之前，判断像素区域能否容纳签名、元数据和载荷。

use crate::constants::{BITS_PER_BYTE, LENGTH_FIELD_SIZE};
use tracing::debug;

/// 隐藏整个容器所需的像素字节数：
/// `8 × (签名长度 + 4 + 扩展名长度 + 4 + 载荷长度)`。
///
/// 结果超出 `u64` 时返回 `None`。
pub fn required_bytes(signature_len: u64, extension_len: u64, payload_len: u64) -> Option<u64> {
    let length_fields = 2 * LENGTH_FIELD_SIZE as u64;
    signature_len
        .checked_add(length_fields)?
        .checked_add(extension_len)?
        .checked_add(payload_len)?
        .checked_mul(BITS_PER_BYTE as u64)
}

/// 当且仅当像素字节数严格大于所需字节数时返回 `true`。
pub fn can_embed(
    carrier_pixel_bytes: u64,
    signature_len: u64,
    extension_len: u64,
    payload_len: u64,
) -> bool {
    let fits = required_bytes(signature_len, extension_len, payload_len)
        .is_some_and(|required| carrier_pixel_bytes > required);

    debug!(
        carrier_pixel_bytes,
        signature_len, extension_len, payload_len, fits, "capacity check"
    );

    fits
}
