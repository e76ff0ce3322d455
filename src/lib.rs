//! # bmp_lsb 库
//!
//! 本库包含 BMP LSB 隐写工具的核心逻辑：位打包、容量规划、
//! 容器编解码以及头部传输，命令行相关的处理位于 `cli` 和 `handler`。

// 声明库包含的所有模块。

pub mod bitpack;
pub mod bmp;
pub mod capacity;
pub mod cli;
pub mod constants;
pub mod container;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod handler;
pub mod transfer;

pub use container::ContainerFormat;
pub use decoder::{DecodeStage, Decoder};
pub use encoder::{EncodeStage, EncodeSummary, Encoder};
pub use error::StegoError;
