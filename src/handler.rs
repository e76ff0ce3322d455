//! # 命令处理逻辑模块
//!
//! 包含处理 `encode` 和 `decode` 子命令的高级业务逻辑。
//! 本模块负责校验文件扩展名、确定默认输出路径、协调文件 I/O、
//! 调用核心编解码器以及向用户报告进度。

use crate::bmp::BmpInfo;
use crate::cli::{DecodeArgs, EncodeArgs};
use crate::constants::{CARRIER_EXTENSION, DEFAULT_DECODE_STEM, DEFAULT_STEGO_NAME};
use crate::container::ContainerFormat;
use crate::decoder::{DecodeStage, Decoder};
use crate::encoder::{EncodeStage, Encoder};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// 处理 'Encode' 命令的执行逻辑。
///
/// 负责校验输入、读取图像和秘密文件、检查隐写空间是否足够、调用编码器，
/// 最后将结果写入目标图像文件。整个结果在内存中生成，失败时不会留下不完整的输出文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径和选项的 `EncodeArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 源图像不是 `.bmp`，或秘密文件的扩展名与 `--extension` 不符。
/// * 输出文件已存在且未指定 `--force`。
/// * 无法读取输入的图像或秘密文件，或图像不是未压缩的 24 位 BMP。
/// * 图像没有足够的空间来隐藏秘密文件。
/// * 编码器在执行过程中失败，或无法写入目标图像文件。
pub fn handle_encode(args: EncodeArgs) -> Result<()> {
    ensure_extension(&args.image, CARRIER_EXTENSION)?;
    ensure_extension(&args.secret, &args.extension)?;

    let container = ContainerFormat::with_extension(args.extension.as_str())
        .context("Invalid container extension.")?;
    let dest = args
        .output
        .unwrap_or_else(|| sibling(&args.image, DEFAULT_STEGO_NAME));
    ensure_can_write(&dest, args.force)?;

    let picture = fs::read(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;
    let info = BmpInfo::parse(&picture).with_context(|| {
        format!(
            "Unsupported source image: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let secret = fs::read(&args.secret).with_context(|| {
        format!(
            "Unable to read secret file: {}",
            args.secret.to_string_lossy().red().bold()
        )
    })?;

    println!("Source image width = {}", info.width.to_string().green());
    println!("Source image height = {}", info.height.to_string().green());

    let payload_len = secret.len() as u64;
    container
        .check_capacity(info.capacity(), payload_len)
        .with_context(|| {
            format!(
                "Not enough space in the image to hide the secret file. \nRequired: {}, Available: {}",
                container
                    .required_bytes(payload_len)
                    .map_or_else(|| "overflow".to_string(), |n| n.to_string())
                    .red()
                    .bold(),
                info.capacity().to_string().green().bold()
            )
        })?;
    println!("Secret data can be encoded in {}", args.image.to_string_lossy().green());

    let mut stego = Vec::with_capacity(picture.len());
    let summary = Encoder::new(container)
        .encode_with_progress(
            &mut Cursor::new(picture.as_slice()),
            info.capacity(),
            &mut secret.as_slice(),
            payload_len,
            &mut stego,
            |stage| println!("{}", encode_stage_message(stage)),
        )
        .with_context(|| {
            format!(
                "Failed to hide the secret file in '{}'. \nThe image file may be truncated or corrupt.",
                args.image.to_string_lossy().red().bold()
            )
        })?;

    fs::write(&dest, stego).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "{} bytes have been successfully hidden and saved: {}",
        summary.payload_len.to_string().green(),
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Decode' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用解码器逐字段校验并提取载荷，
/// 最后将恢复的内容写入目标文件。只有解码完全成功时才会创建输出文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径和选项的 `DecodeArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 图像不是 `.bmp`，或输出文件已存在且未指定 `--force`。
/// * 无法读取输入的图像文件。
/// * 图像中没有本格式的容器 (签名、扩展名长度或扩展名不符)，或数据被截断。
/// * 无法写入到目标文件。
pub fn handle_decode(args: DecodeArgs) -> Result<()> {
    ensure_extension(&args.image, CARRIER_EXTENSION)?;

    let container = ContainerFormat::with_extension(args.extension.as_str())
        .context("Invalid container extension.")?;
    let dest = args.output.unwrap_or_else(|| {
        sibling(
            &args.image,
            &format!(
                "{DEFAULT_DECODE_STEM}.{}",
                container.extension().trim_start_matches('.')
            ),
        )
    });
    ensure_can_write(&dest, args.force)?;

    let picture = fs::read(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;
    BmpInfo::parse(&picture).with_context(|| {
        format!(
            "Unsupported stego image: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let expected_extension = container.extension().to_string();
    let mut secret = Vec::new();
    Decoder::new(container)
        .decode_with_progress(&mut Cursor::new(picture.as_slice()), &mut secret, |stage| {
            println!("{}", decode_stage_message(stage, &expected_extension))
        })
        .with_context(|| {
            format!(
                "Failed to recover hidden data from '{}'. \nThe image may not contain a hidden message or is corrupted.",
                args.image.to_string_lossy().red().bold()
            )
        })?;

    fs::write(&dest, secret).with_context(|| {
        format!(
            "Unable to write to target file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The hidden data has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

fn encode_stage_message(stage: EncodeStage) -> &'static str {
    match stage {
        EncodeStage::HeaderCopied => "Header of source image copied to stego image",
        EncodeStage::SignatureWritten => "Magic string encoded",
        EncodeStage::ExtensionLengthWritten => "Secret file extension size encoded",
        EncodeStage::ExtensionWritten => "Secret file extension encoded",
        EncodeStage::PayloadLengthWritten => "Secret file size encoded",
        EncodeStage::PayloadWritten => "Secret data encoded",
        EncodeStage::TailCopied => "Copied remaining data of source image",
    }
}

fn decode_stage_message(stage: DecodeStage, extension: &str) -> String {
    match stage {
        DecodeStage::HeaderSkipped => "Skipped header of stego image".to_string(),
        DecodeStage::SignatureVerified => "Magic string verified".to_string(),
        DecodeStage::ExtensionLengthVerified => {
            format!("Size of file extension matched as {} bytes", extension.len())
        }
        DecodeStage::ExtensionVerified => format!("File extension matched as {extension}"),
        DecodeStage::PayloadLengthRead { payload_len } => format!(
            "Size of secret data to be decoded is {} bytes",
            payload_len.to_string().green()
        ),
        DecodeStage::PayloadExtracted => "Secret data decoded".to_string(),
    }
}

/// 检查 `path` 的文件名是否以 `expected` 结尾 (不区分大小写，可带前导点)。
///
/// 按文件名后缀比较，因此 `.tar.gz` 这样的多段扩展名也能匹配。
fn ensure_extension(path: &Path, expected: &str) -> Result<()> {
    let expected = expected.trim_start_matches('.');
    let suffix = format!(".{}", expected.to_ascii_lowercase());
    let matches = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_ascii_lowercase)
        .is_some_and(|name| name.len() > suffix.len() && name.ends_with(&suffix));

    anyhow::ensure!(
        matches,
        "Unexpected file extension: {} (expected .{})",
        path.to_string_lossy().red().bold(),
        expected.green().bold()
    );
    Ok(())
}

/// 输出文件已存在时，除非指定了 `--force`，否则拒绝覆盖。
fn ensure_can_write(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 与 `path` 同目录、名为 `file_name` 的路径。
fn sibling(path: &Path, file_name: &str) -> PathBuf {
    path.parent()
        .map_or_else(|| PathBuf::from(file_name), |dir| dir.join(file_name))
}
