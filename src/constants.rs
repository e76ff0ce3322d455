/// BMP 文件的标准头部大小 (字节)。
/// 14 字节文件头 + 40 字节 BITMAPINFOHEADER，编码时原样复制，不参与隐写。
pub const BMP_HEADER_SIZE: usize = 54;

/// BMP 头部中图像宽度字段的偏移量 (小端 32 位)。
pub const WIDTH_OFFSET: usize = 18;

/// BMP 头部中图像高度字段的偏移量 (小端 32 位，负值表示自上而下的位图)。
pub const HEIGHT_OFFSET: usize = 22;

/// BMP 头部中每像素位数字段的偏移量 (小端 16 位)。
pub const BITS_PER_PIXEL_OFFSET: usize = 28;

/// BMP 头部中压缩方式字段的偏移量 (小端 32 位，0 表示 BI_RGB 未压缩)。
pub const COMPRESSION_OFFSET: usize = 30;

/// 唯一支持的像素格式：24 位真彩色。
pub const SUPPORTED_BITS_PER_PIXEL: u16 = 24;

/// 每个像素占用的字节数 (B, G, R)。
pub const BYTES_PER_PIXEL: u64 = 3;

/// 一个数据字节的位数，也是隐藏一个字节所需的像素字节数。
pub const BITS_PER_BYTE: usize = 8;

/// 长度字段 (扩展名长度、载荷长度) 的字节宽度。
pub const LENGTH_FIELD_SIZE: usize = 4;

/// 隐藏一个 32 位长度字段所需的像素字节数。
pub const LENGTH_WINDOW_SIZE: usize = LENGTH_FIELD_SIZE * BITS_PER_BYTE;

/// 标识本容器格式的魔术签名。
pub const SIGNATURE: &[u8] = b"#*";

/// 默认的秘密文件扩展名。
pub const DEFAULT_EXTENSION: &str = ".txt";

/// 载体图像必须使用的文件扩展名。
pub const CARRIER_EXTENSION: &str = "bmp";

/// 未指定输出路径时，编码结果的默认文件名。
pub const DEFAULT_STEGO_NAME: &str = "stego.bmp";

/// 未指定输出路径时，解码结果的默认文件名主干 (后接扩展名)。
pub const DEFAULT_DECODE_STEM: &str = "decode";
