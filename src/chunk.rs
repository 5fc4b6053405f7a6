//! RIFF/WAVE 顶层 chunk 扫描
//!
//! 只定位 `fmt ` 与 `data` 两个 chunk，其余 chunk 按声明长度跳过。

use crate::error::{Error, Result};
use crate::format::WaveFormat;
use crate::repair;

pub(crate) const RIFF_SIG: [u8; 4] = *b"RIFF";
pub(crate) const WAVE_SIG: [u8; 4] = *b"WAVE";
pub(crate) const FMT_SIG: [u8; 4] = *b"fmt ";
pub(crate) const DATA_SIG: [u8; 4] = *b"data";

/// `"RIFF"` + size + `"WAVE"`
pub const PREAMBLE_LEN: usize = 12;
/// chunk id + 声明长度
pub const CHUNK_HEADER_LEN: usize = 8;

/// 扫描得到的容器布局
///
/// 偏移均指向 chunk 正文（跳过 8 字节 chunk 头）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkLayout {
    /// RIFF 头中声明的大小（可能是流式占位值）
    pub riff_size: u32,
    /// 解析后的格式描述
    pub format: WaveFormat,
    /// `fmt ` 正文起始偏移
    pub format_offset: usize,
    /// `data` 正文起始偏移
    pub data_offset: usize,
    /// `data` 声明长度（修复前不可信）
    pub data_size: u32,
}

impl ChunkLayout {
    /// 声明的 `data` 长度是否越过缓冲区末尾。
    #[must_use]
    pub fn data_overruns(&self, buffer_len: usize) -> bool {
        self.data_offset as u64 + u64::from(self.data_size) > buffer_len as u64
    }

    /// 头部大小字段是否需要按缓冲区真实长度重写。
    #[must_use]
    pub fn needs_repair(&self, buffer_len: usize) -> bool {
        repair::needs_repair(self.riff_size, self.data_size) || self.data_overruns(buffer_len)
    }
}

/// 扫描 RIFF/WAVE 缓冲区，定位 `fmt ` 与 `data` chunk。
///
/// 两个 chunk 的先后顺序不限；找齐后立即停止，剩余不足 8 字节时结束。
///
/// # Errors
/// 前导签名不符、缺少 `fmt `/`data` chunk 或格式 chunk 损坏时返回错误。
pub fn scan(bytes: &[u8]) -> Result<ChunkLayout> {
    if bytes.get(0..4) != Some(&RIFF_SIG[..]) {
        return Err(Error::NotRiffContainer);
    }
    if bytes.get(8..12) != Some(&WAVE_SIG[..]) {
        return Err(Error::NotWaveContainer);
    }
    let riff_size = read_u32_le(bytes, 4).ok_or(Error::NotWaveContainer)?;

    let total = bytes.len() as u64;
    let mut cursor = PREAMBLE_LEN as u64;
    let mut format: Option<(WaveFormat, usize)> = None;
    let mut data: Option<(usize, u32)> = None;

    while cursor + CHUNK_HEADER_LEN as u64 <= total {
        // cursor <= total, 必然落在 usize 范围内
        let Ok(header_offset) = usize::try_from(cursor) else {
            break;
        };
        let Some((id, size)) = read_chunk_header(bytes, header_offset) else {
            break;
        };
        let body_offset = header_offset + CHUNK_HEADER_LEN;

        match id {
            FMT_SIG => {
                let body = chunk_body(bytes, body_offset, size).ok_or(
                    Error::MalformedFormatChunk {
                        length: u64::from(size),
                    },
                )?;
                format = Some((WaveFormat::parse(body)?, body_offset));
            }
            DATA_SIG => data = Some((body_offset, size)),
            _ => log::debug!(
                "skipping chunk '{}' ({size} bytes) at offset {header_offset}",
                fourcc_to_string(id)
            ),
        }

        if format.is_some() && data.is_some() {
            break;
        }
        cursor = body_offset as u64 + u64::from(size);
    }

    let (format, format_offset) = format.ok_or(Error::MissingFormatChunk)?;
    let (data_offset, data_size) = data.ok_or(Error::MissingDataChunk)?;

    Ok(ChunkLayout {
        riff_size,
        format,
        format_offset,
        data_offset,
        data_size,
    })
}

fn read_chunk_header(bytes: &[u8], header_offset: usize) -> Option<([u8; 4], u32)> {
    let id = bytes.get(header_offset..header_offset + 4)?;
    let size = read_u32_le(bytes, header_offset + 4)?;
    Some(([id[0], id[1], id[2], id[3]], size))
}

fn chunk_body(bytes: &[u8], body_offset: usize, size: u32) -> Option<&[u8]> {
    let end = body_offset.checked_add(usize::try_from(size).ok()?)?;
    bytes.get(body_offset..end)
}

pub(crate) fn read_u16_le(input: &[u8], at: usize) -> Option<u16> {
    let raw = input.get(at..at.checked_add(2)?)?;
    Some(u16::from_le_bytes([raw[0], raw[1]]))
}

pub(crate) fn read_u32_le(input: &[u8], at: usize) -> Option<u32> {
    let raw = input.get(at..at.checked_add(4)?)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

/// 覆写 `at` 处的 4 字节小端字段，越界时返回 `false`。
pub(crate) fn write_u32_le(output: &mut [u8], at: usize, value: u32) -> bool {
    let Some(end) = at.checked_add(4) else {
        return false;
    };
    match output.get_mut(at..end) {
        Some(dst) => {
            dst.copy_from_slice(&value.to_le_bytes());
            true
        }
        None => false,
    }
}

fn fourcc_to_string(id: [u8; 4]) -> String {
    String::from_utf8_lossy(&id).to_string()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn pcm_fmt_body(channels: u16, sample_rate: u32, bits: u16) -> Vec<u8> {
        let block_align = channels * (bits / 8);
        let mut fmt = Vec::new();
        fmt.extend_from_slice(&1_u16.to_le_bytes()); // PCM
        fmt.extend_from_slice(&channels.to_le_bytes());
        fmt.extend_from_slice(&sample_rate.to_le_bytes());
        fmt.extend_from_slice(&(sample_rate * u32::from(block_align)).to_le_bytes());
        fmt.extend_from_slice(&block_align.to_le_bytes());
        fmt.extend_from_slice(&bits.to_le_bytes());
        fmt
    }

    pub(crate) fn push_chunk(dst: &mut Vec<u8>, id: [u8; 4], payload: &[u8], size: Option<u32>) {
        dst.extend_from_slice(&id);
        let size_u32 = size.unwrap_or_else(|| u32::try_from(payload.len()).unwrap_or(0));
        dst.extend_from_slice(&size_u32.to_le_bytes());
        dst.extend_from_slice(payload);
    }

    pub(crate) fn wrap_riff(chunks: &[u8], riff_size: Option<u32>) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&RIFF_SIG);
        let size = riff_size.unwrap_or_else(|| u32::try_from(chunks.len() + 4).unwrap_or(0));
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(&WAVE_SIG);
        out.extend_from_slice(chunks);
        out
    }

    /// 16 kHz 单声道 16-bit，`data` 长度可指定占位值
    pub(crate) fn build_mono_wave(payload: &[u8], streaming: bool) -> Vec<u8> {
        let mut chunks = Vec::new();
        push_chunk(&mut chunks, FMT_SIG, &pcm_fmt_body(1, 16_000, 16), None);
        let data_size = streaming.then_some(u32::MAX);
        push_chunk(&mut chunks, DATA_SIG, payload, data_size);
        wrap_riff(&chunks, streaming.then_some(u32::MAX))
    }

    #[test]
    fn scan_locates_fmt_and_data() {
        let bytes = build_mono_wave(&[1, 2, 3, 4], false);
        let layout = scan(&bytes);
        assert!(layout.is_ok());
        let Ok(layout) = layout else {
            return;
        };
        assert_eq!(layout.format_offset, 20);
        assert_eq!(layout.data_offset, 44);
        assert_eq!(layout.data_size, 4);
        assert_eq!(layout.riff_size, 40);
        assert_eq!(layout.format.sample_rate(), 16_000);
        assert!(!layout.needs_repair(bytes.len()));
    }

    #[test]
    fn scan_skips_unknown_chunks_in_any_order() {
        let mut chunks = Vec::new();
        push_chunk(&mut chunks, *b"LIST", b"INFOISFT", None);
        push_chunk(&mut chunks, DATA_SIG, &[9, 9], None);
        push_chunk(&mut chunks, *b"zzzz", &[1, 2, 3], None);
        push_chunk(&mut chunks, FMT_SIG, &pcm_fmt_body(2, 44_100, 16), None);
        let bytes = wrap_riff(&chunks, None);

        let layout = scan(&bytes);
        assert!(layout.is_ok());
        let Ok(layout) = layout else {
            return;
        };
        assert_eq!(layout.data_offset, 12 + 16 + 8);
        assert_eq!(layout.data_size, 2);
        assert_eq!(layout.format.channels(), 2);
        assert!(layout.format_offset > layout.data_offset);
    }

    #[test]
    fn scan_rejects_non_riff() {
        let mut bytes = build_mono_wave(&[0; 8], false);
        bytes[0..4].copy_from_slice(b"RIFX");
        assert!(matches!(scan(&bytes), Err(Error::NotRiffContainer)));
        assert!(matches!(scan(b"RI"), Err(Error::NotRiffContainer)));
    }

    #[test]
    fn scan_rejects_non_wave() {
        let mut bytes = build_mono_wave(&[0; 8], false);
        bytes[8..12].copy_from_slice(b"AVI ");
        assert!(matches!(scan(&bytes), Err(Error::NotWaveContainer)));
        assert!(matches!(scan(b"RIFF\0\0\0\0"), Err(Error::NotWaveContainer)));
    }

    #[test]
    fn scan_reports_missing_chunks() {
        let mut only_fmt = Vec::new();
        push_chunk(&mut only_fmt, FMT_SIG, &pcm_fmt_body(1, 8_000, 8), None);
        assert!(matches!(
            scan(&wrap_riff(&only_fmt, None)),
            Err(Error::MissingDataChunk)
        ));

        let mut only_data = Vec::new();
        push_chunk(&mut only_data, DATA_SIG, &[0; 4], None);
        assert!(matches!(
            scan(&wrap_riff(&only_data, None)),
            Err(Error::MissingFormatChunk)
        ));
    }

    #[test]
    fn scan_stops_on_truncated_trailer() {
        let mut bytes = build_mono_wave(&[0; 4], false);
        // 截断的 chunk 头不足 8 字节
        let mut trailing = wrap_riff(&[], None);
        trailing.extend_from_slice(b"fmt \x10\0");
        assert!(matches!(scan(&trailing), Err(Error::MissingFormatChunk)));

        bytes.extend_from_slice(b"JUN");
        assert!(scan(&bytes).is_ok());
    }

    #[test]
    fn scan_rejects_short_or_truncated_fmt() {
        let mut short = Vec::new();
        push_chunk(&mut short, FMT_SIG, &[0; 14], None);
        push_chunk(&mut short, DATA_SIG, &[0; 4], None);
        assert!(matches!(
            scan(&wrap_riff(&short, None)),
            Err(Error::MalformedFormatChunk { length: 14 })
        ));

        let mut truncated = Vec::new();
        push_chunk(&mut truncated, FMT_SIG, &pcm_fmt_body(1, 8_000, 8), Some(40));
        assert!(matches!(
            scan(&wrap_riff(&truncated, None)),
            Err(Error::MalformedFormatChunk { length: 40 })
        ));
    }

    #[test]
    fn streaming_sentinels_need_repair() {
        let bytes = build_mono_wave(&[0; 6], true);
        let layout = scan(&bytes);
        assert!(layout.is_ok());
        let Ok(layout) = layout else {
            return;
        };
        assert_eq!(layout.riff_size, u32::MAX);
        assert_eq!(layout.data_size, u32::MAX);
        assert!(layout.data_overruns(bytes.len()));
        assert!(layout.needs_repair(bytes.len()));
    }

    #[test]
    fn field_helpers_respect_bounds() {
        let mut buf = [0_u8; 6];
        assert!(write_u32_le(&mut buf, 2, 0xAABB_CCDD));
        assert_eq!(read_u32_le(&buf, 2), Some(0xAABB_CCDD));
        assert_eq!(read_u16_le(&buf, 4), Some(0xAABB));
        assert!(!write_u32_le(&mut buf, 3, 1));
        assert_eq!(read_u32_le(&buf, 3), None);
    }
}
