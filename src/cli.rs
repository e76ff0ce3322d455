//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use crate::constants::DEFAULT_EXTENSION;
use clap::Parser;
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在 24 位 BMP 图像中隐藏或恢复秘密文件。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在 24 位 BMP 图像中隐藏或恢复秘密文件。\n每个秘密比特占用一个像素字节的最低位，容器以魔术签名开头，解码时逐字段校验。"
)]
pub struct Cli {
    /// 输出调试日志 (也可通过 RUST_LOG 环境变量控制)。
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：encode (编码) 和 decode (解码)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 将秘密文件隐藏到 BMP 图像中。
    #[command(visible_alias = "e")]
    Encode(EncodeArgs),

    /// 从经过隐写的 BMP 图像中恢复秘密文件。
    #[command(visible_alias = "d")]
    Decode(DecodeArgs),
}

/// 'encode' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct EncodeArgs {
    /// 用于隐写的源 BMP 图像路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的秘密文件路径，扩展名必须与 --extension 一致。
    #[arg(short, long)]
    pub secret: PathBuf,

    /// 隐写结果的输出路径，默认为源图像所在目录下的 stego.bmp。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 容器中记录并在解码时校验的扩展名。
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'decode' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct DecodeArgs {
    /// 已隐藏数据的 BMP 图像路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复结果的输出路径，默认为图像所在目录下的 decode 加扩展名。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 期望的扩展名，必须与编码时一致。
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}
