//! # 位打包模块
//!
//! 将一个数据字节 (或 32 位整数) 按最高位优先的顺序拆开，
//! 依次写入窗口中每个载体字节的最低有效位，其余 7 位保持不变。

use crate::constants::{BITS_PER_BYTE, LENGTH_WINDOW_SIZE};

/// 隐藏一个字节所用的载体窗口。
pub type ByteWindow = [u8; BITS_PER_BYTE];

/// 隐藏一个 32 位长度字段所用的载体窗口。
pub type WordWindow = [u8; LENGTH_WINDOW_SIZE];

/// 将 `value` 的第 i 位 (i = 0 为最高位) 写入 `window[i]` 的最低有效位。
pub fn pack(value: u8, window: &mut ByteWindow) {
    for (i, byte) in window.iter_mut().enumerate() {
        let bit = (value >> (BITS_PER_BYTE - 1 - i)) & 0x1;
        *byte = (*byte & 0xFE) | bit;
    }
}

/// 读取窗口中每个字节的最低有效位，按顺序组合为一个字节。`pack` 的逆运算。
pub fn unpack(window: &ByteWindow) -> u8 {
    window
        .iter()
        .fold(0u8, |acc, &byte| (acc << 1) | (byte & 0x1))
}

/// 与 [`pack`] 相同的方案，作用于 32 位无符号整数和 32 字节窗口，仅用于长度字段。
pub fn pack32(value: u32, window: &mut WordWindow) {
    for (i, byte) in window.iter_mut().enumerate() {
        let bit = ((value >> (LENGTH_WINDOW_SIZE - 1 - i)) & 0x1) as u8;
        *byte = (*byte & 0xFE) | bit;
    }
}

/// [`pack32`] 的逆运算。
pub fn unpack32(window: &WordWindow) -> u32 {
    window
        .iter()
        .fold(0u32, |acc, &byte| (acc << 1) | u32::from(byte & 0x1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_then_unpack_is_identity_for_every_byte() {
        for initial in [0x00u8, 0xFF, 0xA5, 0x5A] {
            for value in 0..=u8::MAX {
                let mut window = [initial; BITS_PER_BYTE];
                pack(value, &mut window);
                assert_eq!(unpack(&window), value, "initial {initial:#04x}");
            }
        }
    }

    #[test]
    fn pack_only_touches_the_lowest_bit() {
        let original: ByteWindow = [0x10, 0x21, 0x32, 0x43, 0x54, 0x65, 0x76, 0x87];
        let mut window = original;
        pack(0b1010_0110, &mut window);

        for (before, after) in original.iter().zip(window.iter()) {
            assert_eq!(before & 0xFE, after & 0xFE);
        }
    }

    #[test]
    fn pack_is_most_significant_bit_first() {
        let mut window = [0u8; BITS_PER_BYTE];
        pack(0b1000_0001, &mut window);
        assert_eq!(window, [1, 0, 0, 0, 0, 0, 0, 1]);

        pack(b'#', &mut window);
        assert_eq!(window, [0, 0, 1, 0, 0, 0, 1, 1]);
    }

    #[test]
    fn pack32_layout_and_inverse() {
        let mut window = [0xFEu8; LENGTH_WINDOW_SIZE];
        pack32(4, &mut window);
        assert_eq!(window[29], 0xFF);
        assert_eq!(window[28..].iter().filter(|&&b| b & 1 == 1).count(), 1);
        assert_eq!(unpack32(&window), 4);

        for value in [0, 1, 0x8000_0000, 0xDEAD_BEEF, u32::MAX] {
            pack32(value, &mut window);
            assert_eq!(unpack32(&window), value);
        }
    }
}
