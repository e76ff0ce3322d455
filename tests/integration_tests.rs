use bmp_lsb::{
    cli::{DecodeArgs, EncodeArgs},
    constants::{BMP_HEADER_SIZE, DEFAULT_EXTENSION},
    handler::{handle_decode, handle_encode},
    ContainerFormat,
};
use image::{ImageBuffer, Rgb};
use rand::RngCore;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// 一个辅助函数，用于创建一个带有随机像素的 24 位 BMP 测试图像
fn create_test_image(path: &Path, width: u32, height: u32) {
    let mut img_buf = ImageBuffer::new(width, height);
    let mut raw_pixels = vec![0u8; (width * height * 3) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);

    img_buf
        .pixels_mut()
        .zip(raw_pixels.chunks_exact(3))
        .for_each(|(pixel, chunk)| {
            *pixel = Rgb([chunk[0], chunk[1], chunk[2]]);
        });

    img_buf.save(path).expect("Failed to create test image.");
}

fn encode_args(image: &Path, secret: &Path, output: Option<PathBuf>) -> EncodeArgs {
    EncodeArgs {
        image: image.to_path_buf(),
        secret: secret.to_path_buf(),
        output,
        extension: DEFAULT_EXTENSION.to_string(),
        force: false,
    }
}

fn decode_args(image: &Path, output: Option<PathBuf>) -> DecodeArgs {
    DecodeArgs {
        image: image.to_path_buf(),
        output,
        extension: DEFAULT_EXTENSION.to_string(),
        force: false,
    }
}

/// 验证从编码到解码的完整流程
#[test]
fn test_handle_encode_and_decode_integration() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let cover_path = dir.path().join("cover.bmp");
    let stego_path = dir.path().join("hidden.bmp");
    let secret_path = dir.path().join("secret.txt");
    let decoded_path = dir.path().join("recovered.txt");

    create_test_image(&cover_path, 100, 100);
    let original_text = "This is a test message for the handler! 这是一个给处理器的测试信息！";
    fs::write(&secret_path, original_text)?;

    // 2. 测试 handle_encode
    handle_encode(encode_args(&cover_path, &secret_path, Some(stego_path.clone())))?;
    assert!(stego_path.exists(), "Stego image should be created.");

    // 3. 测试 handle_decode
    handle_decode(decode_args(&stego_path, Some(decoded_path.clone())))?;
    assert!(decoded_path.exists(), "Decoded file should be created.");

    // 4. 验证结果
    let recovered_text = fs::read_to_string(&decoded_path)?;
    assert_eq!(
        original_text, recovered_text,
        "Recovered text must match the original."
    );

    Ok(())
}

/// 验证头部和未使用的尾部字节保持不变，文件长度不变
#[test]
fn test_header_and_tail_are_preserved() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let cover_path = dir.path().join("cover.bmp");
    let stego_path = dir.path().join("stego_out.bmp");
    let secret_path = dir.path().join("secret.txt");

    create_test_image(&cover_path, 64, 64);
    let secret = b"header and tail stay untouched";
    fs::write(&secret_path, secret)?;

    handle_encode(encode_args(&cover_path, &secret_path, Some(stego_path.clone())))?;

    let cover = fs::read(&cover_path)?;
    let stego = fs::read(&stego_path)?;
    let used = BMP_HEADER_SIZE
        + ContainerFormat::default()
            .required_bytes(secret.len() as u64)
            .unwrap() as usize;

    assert_eq!(cover.len(), stego.len());
    assert_eq!(cover[..BMP_HEADER_SIZE], stego[..BMP_HEADER_SIZE]);
    assert_eq!(cover[used..], stego[used..]);
    // 像素区域内只有最低位可能被改变
    assert!(
        cover[BMP_HEADER_SIZE..used]
            .iter()
            .zip(&stego[BMP_HEADER_SIZE..used])
            .all(|(a, b)| a & 0xFE == b & 0xFE)
    );

    Ok(())
}

/// 验证当用户不提供输出路径时，是否能正确生成默认路径并完成操作
#[test]
fn test_handle_encode_and_decode_with_defaults() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let cover_path = dir.path().join("beautiful.bmp");
    let secret_path = dir.path().join("secret.txt");

    create_test_image(&cover_path, 100, 100);
    let original_text = "Testing default path generation. 测试默认路径生成。";
    fs::write(&secret_path, original_text)?;

    // 2. 测试 handle_encode，不提供输出路径
    handle_encode(encode_args(&cover_path, &secret_path, None))?;

    let expected_stego_path = dir.path().join("stego.bmp");
    assert!(
        expected_stego_path.exists(),
        "Default stego image should be created at: {:?}",
        expected_stego_path
    );

    // 3. 测试 handle_decode，不提供输出路径
    handle_decode(decode_args(&expected_stego_path, None))?;

    let expected_decoded_path = dir.path().join("decode.txt");
    assert!(
        expected_decoded_path.exists(),
        "Default decoded file should be created at: {:?}",
        expected_decoded_path
    );

    // 4. 验证结果
    let recovered_text = fs::read_to_string(&expected_decoded_path)?;
    assert_eq!(original_text, recovered_text);

    Ok(())
}

/// 验证覆盖保护机制以及 `--force` 标志是否按预期工作
#[test]
fn test_overwrite_protection_and_force_flag() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let image_path = dir.path().join("image.bmp");
    let secret_path = dir.path().join("secret.txt");
    let dest_path = dir.path().join("dest.bmp");

    create_test_image(&image_path, 50, 50);
    fs::write(&secret_path, "some text")?;

    // 2. 场景一：测试覆盖保护
    fs::write(&dest_path, "this is a dummy file to be overwritten")?;

    let result = handle_encode(encode_args(&image_path, &secret_path, Some(dest_path.clone())));
    assert!(
        result.is_err(),
        "Execution should fail without --force when file exists."
    );
    if let Err(e) = result {
        assert!(e.to_string().contains("Output file already exists"));
    }

    // 3. 场景二：测试强制覆盖
    let mut with_force = encode_args(&image_path, &secret_path, Some(dest_path.clone()));
    with_force.force = true;
    handle_encode(with_force)?;

    let content = fs::read(&dest_path)?;
    assert_ne!(content, b"this is a dummy file to be overwritten");
    assert_eq!(content.len(), fs::read(&image_path)?.len());

    Ok(())
}

/// 验证空间不足时的错误处理，且不会留下输出文件
#[test]
fn test_handle_encode_not_enough_space() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("small.bmp");
    let secret_path = dir.path().join("large.txt");
    let dest_path = dir.path().join("dest.bmp");

    create_test_image(&image_path, 10, 10);
    fs::write(&secret_path, "a".repeat(5000))?;

    let result = handle_encode(encode_args(&image_path, &secret_path, Some(dest_path.clone())));

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("Not enough space"));
    }
    assert!(!dest_path.exists(), "No partial output should be left behind.");

    Ok(())
}

/// 2×2 的图像只有 12 个像素字节，连一个字节的载荷都放不下
#[test]
fn test_tiny_image_cannot_hold_one_byte() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("tiny.bmp");
    let secret_path = dir.path().join("a.txt");

    create_test_image(&image_path, 2, 2);
    fs::write(&secret_path, "A")?;

    let err = handle_encode(encode_args(&image_path, &secret_path, None)).unwrap_err();
    let root = err
        .root_cause()
        .downcast_ref::<bmp_lsb::StegoError>()
        .expect("root cause should be a StegoError");
    assert!(matches!(
        root,
        bmp_lsb::StegoError::InsufficientCapacity {
            required: 120,
            available: 12
        }
    ));

    Ok(())
}

/// 空载荷应当能编码，并解码为空文件
#[test]
fn test_empty_secret_round_trip() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let cover_path = dir.path().join("cover.bmp");
    let secret_path = dir.path().join("empty.txt");
    let decoded_path = dir.path().join("out.txt");

    create_test_image(&cover_path, 20, 20);
    fs::write(&secret_path, "")?;

    handle_encode(encode_args(&cover_path, &secret_path, None))?;
    handle_decode(decode_args(
        &dir.path().join("stego.bmp"),
        Some(decoded_path.clone()),
    ))?;

    assert!(fs::read(&decoded_path)?.is_empty());
    Ok(())
}

/// 未经隐写的图像解码失败，且不会创建输出文件
#[test]
fn test_decode_rejects_plain_image() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("plain.bmp");
    let decoded_path = dir.path().join("decode.txt");

    create_test_image(&image_path, 30, 30);
    // 让签名区域的最低位全部为 0，保证签名一定不匹配
    let mut bytes = fs::read(&image_path)?;
    bytes[BMP_HEADER_SIZE..BMP_HEADER_SIZE + 16]
        .iter_mut()
        .for_each(|b| *b &= 0xFE);
    fs::write(&image_path, bytes)?;

    let result = handle_decode(decode_args(&image_path, None));
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("may not contain a hidden message"));
    }
    assert!(!decoded_path.exists());

    Ok(())
}

/// 自定义扩展名必须在两端一致
#[test]
fn test_custom_extension_must_match_on_decode() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let cover_path = dir.path().join("cover.bmp");
    let secret_path = dir.path().join("table.csv");
    let stego_path = dir.path().join("stego.bmp");

    create_test_image(&cover_path, 40, 40);
    fs::write(&secret_path, "a,b,c\n1,2,3\n")?;

    let mut args = encode_args(&cover_path, &secret_path, None);
    args.extension = ".csv".to_string();
    handle_encode(args)?;

    assert!(handle_decode(decode_args(&stego_path, None)).is_err());

    let mut args = decode_args(&stego_path, None);
    args.extension = ".csv".to_string();
    handle_decode(args)?;
    assert_eq!(
        fs::read_to_string(dir.path().join("decode.csv"))?,
        "a,b,c\n1,2,3\n"
    );

    Ok(())
}

/// 扩展名校验：载体必须是 .bmp，秘密文件必须匹配 --extension
#[test]
fn test_extension_checks() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let cover_path = dir.path().join("cover.bmp");
    let png_path = dir.path().join("cover.png");
    let secret_path = dir.path().join("secret.md");

    create_test_image(&cover_path, 20, 20);
    fs::copy(&cover_path, &png_path)?;
    fs::write(&secret_path, "# title")?;

    let result = handle_encode(encode_args(&cover_path, &secret_path, None));
    assert!(result.is_err());

    let txt_path = dir.path().join("secret.txt");
    fs::write(&txt_path, "text")?;
    let result = handle_encode(encode_args(&png_path, &txt_path, None));
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("Unexpected file extension"));
    }

    Ok(())
}

/// 多段扩展名 (如 `.tar.gz`) 可以完整往返，默认输出名也带上完整扩展名
#[test]
fn test_multi_part_extension_round_trip() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let cover_path = dir.path().join("cover.bmp");
    let secret_path = dir.path().join("backup.tar.gz");
    let payload: Vec<u8> = (0..=255u8).collect();

    create_test_image(&cover_path, 60, 60);
    fs::write(&secret_path, &payload)?;

    let mut args = encode_args(&cover_path, &secret_path, None);
    args.extension = ".tar.gz".to_string();
    handle_encode(args)?;

    let mut args = decode_args(&dir.path().join("stego.bmp"), None);
    args.extension = ".tar.gz".to_string();
    handle_decode(args)?;

    assert_eq!(fs::read(dir.path().join("decode.tar.gz"))?, payload);
    Ok(())
}
