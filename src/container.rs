//! WAVE 容器模型
//!
//! 持有完整字节缓冲区与扫描得到的布局；每次替换缓冲区都同时替换布局。

use std::io::Read;
use std::time::Duration;

use crate::chunk::{self, ChunkLayout};
use crate::error::Result;
use crate::format::WaveFormat;
use crate::repair;
use crate::splice::{self, Placement, SilenceSplice};

/// 解析选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// 检测到流式占位大小时自动修复（默认开启）
    pub automatic_repair: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            automatic_repair: true,
        }
    }
}

/// 已解析的 RIFF/WAVE 容器
#[derive(Debug, Clone)]
pub struct WaveContainer {
    bytes: Vec<u8>,
    layout: ChunkLayout,
    repaired: bool,
}

impl WaveContainer {
    /// 以默认选项解析。
    ///
    /// # Errors
    /// 容器签名错误、缺少 `fmt `/`data` chunk 或修复失败时返回错误。
    pub fn parse(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        Self::parse_with(bytes, ParseOptions::default())
    }

    /// 解析，必要时修复头部大小字段。
    ///
    /// # Errors
    /// 容器签名错误、缺少 `fmt `/`data` chunk 或修复失败时返回错误。
    pub fn parse_with(bytes: impl Into<Vec<u8>>, options: ParseOptions) -> Result<Self> {
        let bytes = bytes.into();
        let layout = chunk::scan(&bytes)?;

        if options.automatic_repair && layout.needs_repair(bytes.len()) {
            log::debug!(
                "streaming wave header detected (riff size {:#010X}, data size {:#010X})",
                layout.riff_size,
                layout.data_size
            );
            let repaired = repair::repair(bytes, layout.data_offset)?;
            // 重新扫描，确保修复后的偏移与缓冲区一致
            let layout = chunk::scan(&repaired)?;
            return Ok(Self {
                bytes: repaired,
                layout,
                repaired: true,
            });
        }

        Ok(Self {
            bytes,
            layout,
            repaired: false,
        })
    }

    /// 先把字节源完整读入内存再解析。
    ///
    /// # Errors
    /// 读取失败或解析失败时返回错误。
    pub fn from_reader<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::parse_with(bytes, options)
    }

    #[must_use]
    pub const fn format(&self) -> &WaveFormat {
        &self.layout.format
    }

    /// 时长秒数：`data` 长度 / 每秒平均字节数，字节率为 0 时返回 0。
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_secs(&self) -> f64 {
        let rate = self.layout.format.average_bytes_per_second();
        if rate == 0 {
            return 0.0;
        }
        self.data_len() as f64 / f64::from(rate)
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration_secs())
    }

    /// 完整容器字节（自动修复开启时已修复）
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// `data` 正文，按声明长度截取，不超过缓冲区末尾
    #[must_use]
    pub fn pcm(&self) -> &[u8] {
        crate::slice::take(
            crate::slice::skip(&self.bytes, self.layout.data_offset as u64),
            self.data_len(),
        )
    }

    /// `data` chunk 声明长度
    #[must_use]
    pub fn data_len(&self) -> u64 {
        u64::from(self.layout.data_size)
    }

    #[must_use]
    pub const fn data_offset(&self) -> usize {
        self.layout.data_offset
    }

    #[must_use]
    pub const fn format_offset(&self) -> usize {
        self.layout.format_offset
    }

    /// RIFF 头中声明的大小
    #[must_use]
    pub const fn declared_riff_size(&self) -> u32 {
        self.layout.riff_size
    }

    /// 当前头部是否仍带有占位或越界的大小字段
    #[must_use]
    pub fn needs_repair(&self) -> bool {
        self.layout.needs_repair(self.bytes.len())
    }

    /// 构造时是否执行过修复
    #[must_use]
    pub const fn was_repaired(&self) -> bool {
        self.repaired
    }

    /// 在 `data` 首/尾插入（正数）或移除（负数）静音。
    ///
    /// # Errors
    /// 见 [`splice::splice`]。失败时容器保持原状。
    pub fn splice(&mut self, seconds: f64, placement: Placement) -> Result<&[u8]> {
        splice::splice(self, SilenceSplice::new(seconds, placement))
    }

    pub(crate) const fn layout(&self) -> &ChunkLayout {
        &self.layout
    }

    /// 同时替换缓冲区与布局；构造时的修复标记保持不变。
    pub(crate) fn replace(&mut self, bytes: Vec<u8>, layout: ChunkLayout) {
        self.bytes = bytes;
        self.layout = layout;
    }
}
