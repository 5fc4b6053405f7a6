//! 静音插入/移除
//!
//! 时长按 `seconds × 每秒平均字节数` 截断为整数字节，插入与移除共用同一换算。
//! 新缓冲区完整构建并通过修复与重新扫描后才替换容器内容。
//! 正文区域经 [`slice::big_skip`]/[`slice::big_take`] 按 64 位计数截取。

use crate::chunk::{self, ChunkLayout, CHUNK_HEADER_LEN, DATA_SIG};
use crate::container::WaveContainer;
use crate::error::{Error, Result};
use crate::format::WaveFormat;
use crate::repair;
use crate::slice;

/// 静音插入位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "settings", derive(serde::Serialize, serde::Deserialize))]
pub enum Placement {
    /// `data` 开头
    #[cfg_attr(feature = "settings", serde(rename = "beginning"))]
    AtBeginning,
    /// `data` 末尾
    #[default]
    #[cfg_attr(feature = "settings", serde(rename = "end"))]
    AtEnd,
}

/// 一次静音拼接请求，负秒数表示移除
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SilenceSplice {
    pub seconds: f64,
    pub placement: Placement,
}

impl SilenceSplice {
    #[must_use]
    pub const fn new(seconds: f64, placement: Placement) -> Self {
        Self { seconds, placement }
    }

    /// 换算为有符号字节数（向零截断）。
    ///
    /// # Errors
    /// 字节率为 0 时返回 [`Error::NoFormatAvailable`]，秒数非有限值时返回
    /// [`Error::InvalidSilenceDuration`]。
    #[allow(clippy::cast_possible_truncation)]
    pub fn byte_len(&self, format: &WaveFormat) -> Result<i64> {
        let rate = format.average_bytes_per_second();
        if rate == 0 {
            return Err(Error::NoFormatAvailable);
        }
        if !self.seconds.is_finite() {
            return Err(Error::InvalidSilenceDuration(self.seconds));
        }
        // `as` 对超范围值饱和，后续长度校验会拒绝
        Ok((self.seconds * f64::from(rate)).trunc() as i64)
    }
}

/// 对容器执行静音拼接，返回修复后的完整字节。
///
/// # Errors
/// - 无可用字节率：[`Error::NoFormatAvailable`]
/// - 移除量超过 `data` 长度：[`Error::RemovalExceedsPayload`]
/// - 结果超出 32 位 RIFF 大小：[`Error::SizeOverflow`]
///
/// 任一失败都不会修改容器。
pub fn splice(container: &mut WaveContainer, request: SilenceSplice) -> Result<&[u8]> {
    let silence_len = request.byte_len(container.format())?;
    let bytes = container.bytes();
    let data_offset = container.data_offset();
    let payload_len =
        slice::take(slice::skip(bytes, data_offset as u64), container.data_len()).len();
    let available = payload_len as u64;

    let header = rebuild_header(bytes, container.layout())?;
    let new_data_offset = header.len();

    let mut out = if silence_len >= 0 {
        let silence = silence_len.unsigned_abs();
        let total = header.len() as u64 + available + silence;
        let capacity = checked_container_len(total)?;

        let mut out = Vec::with_capacity(capacity);
        out.extend_from_slice(&header);
        match request.placement {
            Placement::AtBeginning => {
                out.resize(capacity - payload_len, 0);
                out.extend(payload(bytes, data_offset, 0, available));
            }
            Placement::AtEnd => {
                out.extend(payload(bytes, data_offset, 0, available));
                out.resize(capacity, 0);
            }
        }
        out
    } else {
        let removal = silence_len.unsigned_abs();
        if removal > available {
            return Err(Error::RemovalExceedsPayload {
                requested: removal,
                available,
            });
        }
        let kept_len = available - removal;
        let skipped = match request.placement {
            Placement::AtBeginning => removal,
            Placement::AtEnd => 0,
        };
        let mut out = Vec::with_capacity(header.len() + usize::try_from(kept_len).unwrap_or(0));
        out.extend_from_slice(&header);
        out.extend(payload(bytes, data_offset, skipped, kept_len));
        out
    };

    out = repair::repair(out, new_data_offset)?;
    let layout = chunk::scan(&out)?;
    if layout.data_offset != new_data_offset {
        return Err(Error::InvalidDataOffset {
            offset: layout.data_offset,
            len: out.len(),
        });
    }

    log::debug!(
        "spliced {silence_len} bytes {:?}: data length {} -> {}",
        request.placement,
        available,
        layout.data_size
    );
    container.replace(out, layout);
    Ok(container.bytes())
}

/// `data` 正文之前的全部字节。
///
/// `fmt ` 位于 `data` 之后时会随尾部一起被丢弃，因此在 `data` chunk 头之前
/// 重新写出格式 chunk。`data` 长度字段留给修复步骤重写。
fn rebuild_header(bytes: &[u8], layout: &ChunkLayout) -> Result<Vec<u8>> {
    if layout.format_offset < layout.data_offset {
        return Ok(slice::take(bytes, layout.data_offset as u64).to_vec());
    }
    let data_header = layout.data_offset - CHUNK_HEADER_LEN;
    let mut header = slice::take(bytes, data_header as u64).to_vec();
    layout.format.write_chunk(&mut header)?;
    header.extend_from_slice(&DATA_SIG);
    header.extend_from_slice(&0_u32.to_le_bytes());
    Ok(header)
}

/// 从 `data` 正文中跳过 `skip` 字节后取 `take` 字节
fn payload(
    bytes: &[u8],
    data_offset: usize,
    skip: u64,
    take: u64,
) -> impl Iterator<Item = u8> + '_ {
    slice::big_take(
        slice::big_skip(bytes.iter().copied(), data_offset as u64 + skip),
        take,
    )
}

/// 拼接后的总长度必须能写进 RIFF size 字段
fn checked_container_len(total: u64) -> Result<usize> {
    if total.saturating_sub(8) > u64::from(u32::MAX) {
        return Err(Error::SizeOverflow(total));
    }
    usize::try_from(total).map_err(|_| Error::SizeOverflow(total))
}
