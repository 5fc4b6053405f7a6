//! wavsplice - RIFF/WAVE 修复与静音拼接
//!
//! 面向管道编码器输出的 PCM WAVE：头部大小字段常为 `0xFFFFFFFF` 占位。
//! 本库定位 `fmt ` 与 `data` chunk，按缓冲区真实长度修复大小字段，
//! 并在 `data` 首尾按字节精确插入或移除静音。
//!
//! # 容器布局
//!
//! ```text
//! ┌────────┬──────────┬────────┬──────────────────┬──────────────────┬─────┐
//! │ "RIFF" │ size - 8 │ "WAVE" │ "fmt " len body  │ "data" len PCM   │ ... │
//! │ 4 bytes│ 4 bytes  │ 4 bytes│ 8 + 16..N bytes  │ 8 + len bytes    │     │
//! └────────┴──────────┴────────┴──────────────────┴──────────────────┴─────┘
//! ```
//!
//! # Example
//!
//! ```
//! use wavsplice::{Placement, WaveContainer, WaveFormat};
//!
//! let format = WaveFormat::pcm(16_000, 16, 1).unwrap();
//! let mut bytes = b"RIFF\xFF\xFF\xFF\xFFWAVE".to_vec();
//! format.write_chunk(&mut bytes).unwrap();
//! bytes.extend_from_slice(b"data\xFF\xFF\xFF\xFF");
//! bytes.extend_from_slice(&[0_u8; 32_000]);
//!
//! // 流式占位大小在解析时自动修复
//! let mut wave = WaveContainer::parse(bytes).unwrap();
//! assert_eq!(wave.duration_secs(), 1.0);
//!
//! // 末尾追加 0.5 秒静音
//! wave.splice(0.5, Placement::AtEnd).unwrap();
//! assert_eq!(wave.data_len(), 48_000);
//! ```

pub mod chunk;
pub mod container;
pub mod error;
pub mod format;
pub mod repair;
pub mod slice;
pub mod splice;

#[cfg(feature = "settings")]
pub mod settings;

// Re-exports
pub use chunk::{scan, ChunkLayout};
pub use container::{ParseOptions, WaveContainer};
pub use error::{Error, Result};
pub use format::{WaveEncoding, WaveFormat};
pub use repair::{needs_repair, repair};
pub use slice::{big_skip, big_take};
pub use splice::{splice, Placement, SilenceSplice};

#[cfg(feature = "settings")]
pub use settings::Settings;

/// 以默认选项解析容器
///
/// # Errors
/// 见 [`WaveContainer::parse`]。
pub fn parse(bytes: impl Into<Vec<u8>>) -> Result<WaveContainer> {
    WaveContainer::parse(bytes)
}
