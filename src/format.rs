//! `fmt ` chunk 格式描述
//!
//! ```text
//! ┌────────┬──────────┬────────────┬───────────┬─────────────┬──────┬───────────┬───────────┐
//! │  Tag   │ Channels │ SampleRate │ ByteRate  │ BlockAlign  │ Bits │ ExtraSize │ Extra...  │
//! │ 2 bytes│ 2 bytes  │  4 bytes   │  4 bytes  │  2 bytes    │  2   │ 2 (可选)  │ N (可选)  │
//! └────────┴──────────┴────────────┴───────────┴─────────────┴──────┴───────────┴───────────┘
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::chunk::{read_u16_le, read_u32_le, FMT_SIG};
use crate::error::{Error, Result};

pub const WAVE_FORMAT_PCM: u16 = 0x0001;
pub const WAVE_FORMAT_EXTENSIBLE: u16 = 0xFFFE;

/// 最小 PCM 格式正文长度
pub const MIN_FORMAT_LEN: usize = 16;
/// 带 extra-size 字段的格式正文长度
pub const EXTENDED_FORMAT_LEN: usize = 18;

/// 编码标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaveEncoding {
    /// 线性 PCM
    Pcm,
    /// `WAVE_FORMAT_EXTENSIBLE`
    Extensible,
    /// 其他编码，仅保留原始标签
    Other(u16),
}

impl WaveEncoding {
    #[must_use]
    pub const fn from_tag(tag: u16) -> Self {
        match tag {
            WAVE_FORMAT_PCM => Self::Pcm,
            WAVE_FORMAT_EXTENSIBLE => Self::Extensible,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub const fn tag(self) -> u16 {
        match self {
            Self::Pcm => WAVE_FORMAT_PCM,
            Self::Extensible => WAVE_FORMAT_EXTENSIBLE,
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for WaveEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pcm => write!(f, "Pcm"),
            Self::Extensible => write!(f, "Extensible"),
            Self::Other(tag) => write!(f, "0x{tag:04X}"),
        }
    }
}

/// 音频格式描述
///
/// 相等性与哈希只覆盖六个核心字段，extra 字节不参与比较。
#[derive(Debug, Clone)]
pub struct WaveFormat {
    encoding: WaveEncoding,
    channels: u16,
    sample_rate: u32,
    average_bytes_per_second: u32,
    block_align: u16,
    bits_per_sample: u16,
    extra: Vec<u8>,
    /// 声明的 extra-size 与 chunk 长度不一致时记录原声明值
    extra_size_mismatch: Option<u16>,
}

impl WaveFormat {
    /// 构造 PCM 格式，block align 与字节率由参数推导。
    ///
    /// # Errors
    /// 声道数为 0 或 block align 超出 16 位范围时返回错误。
    pub fn pcm(sample_rate: u32, bits_per_sample: u16, channels: u16) -> Result<Self> {
        if channels < 1 {
            return Err(Error::InvalidInput(
                "channels must be 1 or greater".to_string(),
            ));
        }
        let block_align = channels.checked_mul(bits_per_sample / 8).ok_or_else(|| {
            Error::InvalidInput(format!(
                "block align overflow: {channels} channels x {bits_per_sample} bits"
            ))
        })?;
        let average_bytes_per_second = sample_rate
            .checked_mul(u32::from(block_align))
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "byte rate overflow: {sample_rate} Hz x {block_align} bytes"
                ))
            })?;

        Ok(Self {
            encoding: WaveEncoding::Pcm,
            channels,
            sample_rate,
            average_bytes_per_second,
            block_align,
            bits_per_sample,
            extra: Vec::new(),
            extra_size_mismatch: None,
        })
    }

    /// 从 `fmt ` chunk 正文解析（chunk 头已剥离，`body.len()` 即 chunk 长度）。
    ///
    /// extra-size 字段与 `len - 18` 不一致时不报错，以计算值为准并记录告警。
    ///
    /// # Errors
    /// 正文不足 16 字节时返回 [`Error::MalformedFormatChunk`]。
    pub fn parse(body: &[u8]) -> Result<Self> {
        let length = body.len();
        let malformed = || Error::MalformedFormatChunk {
            length: length as u64,
        };
        if length < MIN_FORMAT_LEN {
            return Err(malformed());
        }

        let tag = read_u16_le(body, 0).ok_or_else(malformed)?;
        let channels = read_u16_le(body, 2).ok_or_else(malformed)?;
        let sample_rate = read_u32_le(body, 4).ok_or_else(malformed)?;
        let average_bytes_per_second = read_u32_le(body, 8).ok_or_else(malformed)?;
        let block_align = read_u16_le(body, 12).ok_or_else(malformed)?;
        let bits_per_sample = read_u16_le(body, 14).ok_or_else(malformed)?;

        let (extra, extra_size_mismatch) = if length > MIN_FORMAT_LEN {
            read_extra(body)
        } else {
            (Vec::new(), None)
        };

        Ok(Self {
            encoding: WaveEncoding::from_tag(tag),
            channels,
            sample_rate,
            average_bytes_per_second,
            block_align,
            bits_per_sample,
            extra,
            extra_size_mismatch,
        })
    }

    /// 序列化为 18 字节及以上的正文布局，总是写出 extra-size 字段。
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(EXTENDED_FORMAT_LEN + self.extra.len());
        out.extend_from_slice(&self.encoding.tag().to_le_bytes());
        out.extend_from_slice(&self.channels.to_le_bytes());
        out.extend_from_slice(&self.sample_rate.to_le_bytes());
        out.extend_from_slice(&self.average_bytes_per_second.to_le_bytes());
        out.extend_from_slice(&self.block_align.to_le_bytes());
        out.extend_from_slice(&self.bits_per_sample.to_le_bytes());
        // 超过 u16 的 extra 在重新解析时会按 chunk 长度纠正
        let extra_size = u16::try_from(self.extra.len()).unwrap_or(u16::MAX);
        out.extend_from_slice(&extra_size.to_le_bytes());
        out.extend_from_slice(&self.extra);
        out
    }

    /// 写出完整的 `fmt ` chunk（id + 长度 + 正文）。
    ///
    /// # Errors
    /// 正文长度超出 32 位时返回 [`Error::SizeOverflow`]。
    pub fn write_chunk(&self, out: &mut Vec<u8>) -> Result<()> {
        let body = self.to_bytes();
        let size = u32::try_from(body.len()).map_err(|_| Error::SizeOverflow(body.len() as u64))?;
        out.extend_from_slice(&FMT_SIG);
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(&body);
        Ok(())
    }

    #[must_use]
    pub const fn encoding(&self) -> WaveEncoding {
        self.encoding
    }

    #[must_use]
    pub const fn channels(&self) -> u16 {
        self.channels
    }

    #[must_use]
    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// 每秒平均字节数，时长换算的唯一除数
    #[must_use]
    pub const fn average_bytes_per_second(&self) -> u32 {
        self.average_bytes_per_second
    }

    #[must_use]
    pub const fn block_align(&self) -> u16 {
        self.block_align
    }

    /// 每样本位数，部分编码为 0
    #[must_use]
    pub const fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    #[must_use]
    pub fn extra(&self) -> &[u8] {
        &self.extra
    }

    #[must_use]
    pub fn extra_size(&self) -> usize {
        self.extra.len()
    }

    /// extra-size 字段被纠正时返回文件中的原声明值
    #[must_use]
    pub const fn extra_size_mismatch(&self) -> Option<u16> {
        self.extra_size_mismatch
    }
}

/// 读取 extra-size 字段与其后的 extra 字节，返回 (extra, 被纠正的声明值)。
fn read_extra(body: &[u8]) -> (Vec<u8>, Option<u16>) {
    let Some(declared) = read_u16_le(body, MIN_FORMAT_LEN) else {
        log::warn!(
            "format chunk has {} stray byte(s) after the 16-byte header",
            body.len() - MIN_FORMAT_LEN
        );
        return (Vec::new(), None);
    };

    let computed = body.len() - EXTENDED_FORMAT_LEN;
    let mismatch = if usize::from(declared) == computed {
        None
    } else {
        log::warn!("format chunk mismatch: extra size declared {declared}, using {computed}");
        Some(declared)
    };
    let extra = body
        .get(EXTENDED_FORMAT_LEN..)
        .map(<[u8]>::to_vec)
        .unwrap_or_default();
    (extra, mismatch)
}

impl PartialEq for WaveFormat {
    fn eq(&self, other: &Self) -> bool {
        self.encoding == other.encoding
            && self.channels == other.channels
            && self.sample_rate == other.sample_rate
            && self.average_bytes_per_second == other.average_bytes_per_second
            && self.block_align == other.block_align
            && self.bits_per_sample == other.bits_per_sample
    }
}

impl Eq for WaveFormat {}

impl Hash for WaveFormat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.encoding.hash(state);
        self.channels.hash(state);
        self.sample_rate.hash(state);
        self.average_bytes_per_second.hash(state);
        self.block_align.hash(state);
        self.bits_per_sample.hash(state);
    }
}

impl fmt::Display for WaveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.encoding {
            // extensible 只是在 PCM 头后追加字段
            WaveEncoding::Pcm | WaveEncoding::Extensible => write!(
                f,
                "{} bit PCM: {}kHz {} channels",
                self.bits_per_sample,
                self.sample_rate / 1000,
                self.channels
            ),
            WaveEncoding::Other(_) => write!(f, "{}", self.encoding),
        }
    }
}
