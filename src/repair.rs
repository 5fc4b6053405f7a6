//! 流式写出的 WAVE 头修复
//!
//! 管道编码器在总长度未知时写入 `0xFFFFFFFF` 占位，这里以缓冲区真实长度为准重写。

use crate::chunk::{self, CHUNK_HEADER_LEN, PREAMBLE_LEN};
use crate::error::{Error, Result};

/// 流式占位大小
pub const STREAMING_SIZE_SENTINEL: u32 = u32::MAX;

/// RIFF size 字段偏移
const RIFF_SIZE_OFFSET: usize = 4;

/// 声明的大小字段是否为流式占位值。
#[must_use]
pub const fn needs_repair(declared_riff_size: u32, declared_data_len: u32) -> bool {
    declared_riff_size == STREAMING_SIZE_SENTINEL || declared_data_len == STREAMING_SIZE_SENTINEL
}

/// 按缓冲区真实长度重写 RIFF size 与 `data` 长度字段。
///
/// 两处写入无条件执行；`data` 被视为延伸到缓冲区末尾。
///
/// # Errors
/// `data_offset` 不在合法范围，或长度超出 32 位字段时返回错误，此时不产生部分修改的结果。
pub fn repair(mut buffer: Vec<u8>, data_offset: usize) -> Result<Vec<u8>> {
    let len = buffer.len();
    if data_offset < PREAMBLE_LEN + CHUNK_HEADER_LEN || data_offset > len {
        return Err(Error::InvalidDataOffset {
            offset: data_offset,
            len,
        });
    }

    let riff_size = u32::try_from(len - 8).map_err(|_| Error::SizeOverflow(len as u64))?;
    let data_len =
        u32::try_from(len - data_offset).map_err(|_| Error::SizeOverflow(len as u64))?;

    // 上面已校验偏移，两次写入不会越界
    let riff_written = chunk::write_u32_le(&mut buffer, RIFF_SIZE_OFFSET, riff_size);
    let data_written = chunk::write_u32_le(&mut buffer, data_offset - 4, data_len);
    if !(riff_written && data_written) {
        return Err(Error::InvalidDataOffset {
            offset: data_offset,
            len,
        });
    }

    log::debug!("repaired wave header: riff size {riff_size}, data length {data_len}");
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::read_u32_le;
    use crate::chunk::tests::build_mono_wave;

    #[test]
    fn sentinel_detection() {
        assert!(needs_repair(u32::MAX, 10));
        assert!(needs_repair(36, u32::MAX));
        assert!(!needs_repair(36, 0));
    }

    #[test]
    fn repair_rewrites_both_size_fields() {
        let bytes = build_mono_wave(&[5; 100], true);
        let total = bytes.len();
        let repaired = repair(bytes, 44);
        assert!(repaired.is_ok());
        let Ok(repaired) = repaired else {
            return;
        };
        assert_eq!(repaired.len(), total);
        assert_eq!(read_u32_le(&repaired, 4), u32::try_from(total - 8).ok());
        assert_eq!(read_u32_le(&repaired, 40), u32::try_from(total - 44).ok());
        assert_eq!(read_u32_le(&repaired, 40), Some(100));
        assert!(repaired[44..].iter().all(|b| *b == 5));
    }

    #[test]
    fn repair_is_idempotent() {
        let once = repair(build_mono_wave(&[1, 2, 3, 4, 5, 6], true), 44);
        assert!(once.is_ok());
        let Ok(once) = once else {
            return;
        };
        let twice = repair(once.clone(), 44);
        assert!(twice.is_ok());
        if let Ok(twice) = twice {
            assert_eq!(twice, once);
        }
    }

    #[test]
    fn repair_rejects_offsets_outside_buffer() {
        let bytes = build_mono_wave(&[0; 4], false);
        assert!(matches!(
            repair(bytes.clone(), 4),
            Err(Error::InvalidDataOffset { offset: 4, .. })
        ));
        assert!(matches!(
            repair(bytes, 1000),
            Err(Error::InvalidDataOffset { offset: 1000, .. })
        ));
    }
}
