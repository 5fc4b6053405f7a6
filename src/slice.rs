//! 64 位安全的 skip/take
//!
//! 音频字节数可能超出 32 位计数参数。跳过操作按固定段长拆成
//! `count / segment` 次整段跳过加一次余数跳过，合并效果与单次 `count` 相同。

/// 单段最大长度，对应 32 位有符号计数上限
pub const SEGMENT_LEN: u64 = 0x7FFF_FFFF;

/// 惰性跳过前 `count` 个元素的迭代器。
#[derive(Debug, Clone)]
pub struct BigSkip<I> {
    iter: I,
    remaining: u64,
    segment: u64,
}

impl<I: Iterator> Iterator for BigSkip<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_pending()?;
        self.iter.next()
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.skip_pending()?;
        self.iter.nth(n)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.iter.size_hint();
        let skipped = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (
            lower.saturating_sub(skipped),
            upper.map(|u| u.saturating_sub(skipped)),
        )
    }
}

impl<I: Iterator> BigSkip<I> {
    /// 按段消耗尚未跳过的元素，底层迭代器提前耗尽时返回 `None`。
    fn skip_pending(&mut self) -> Option<()> {
        while self.remaining > 0 {
            let step = self.remaining.min(self.segment);
            self.remaining -= step;
            // nth(k) 消耗 k + 1 个元素
            let last = usize::try_from(step - 1).ok()?;
            self.iter.nth(last)?;
        }
        Some(())
    }
}

/// 惰性保留前 `count` 个元素的迭代器。
#[derive(Debug, Clone)]
pub struct BigTake<I> {
    iter: I,
    remaining: u64,
}

impl<I: Iterator> Iterator for BigTake<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.iter.next()
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        if n as u64 >= self.remaining {
            if self.remaining > 0 {
                let last = usize::try_from(self.remaining - 1).unwrap_or(usize::MAX);
                self.iter.nth(last);
            }
            self.remaining = 0;
            return None;
        }
        self.remaining -= n as u64 + 1;
        self.iter.nth(n)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let cap = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        let (lower, upper) = self.iter.size_hint();
        (lower.min(cap), Some(upper.map_or(cap, |u| u.min(cap))))
    }
}

/// 跳过前 `count` 个元素。
#[must_use]
pub fn big_skip<I: IntoIterator>(items: I, count: u64) -> BigSkip<I::IntoIter> {
    big_skip_segmented(items, SEGMENT_LEN, count)
}

/// 以指定段长跳过，段长为 0 时按 1 处理。
pub(crate) fn big_skip_segmented<I: IntoIterator>(
    items: I,
    segment: u64,
    count: u64,
) -> BigSkip<I::IntoIter> {
    BigSkip {
        iter: items.into_iter(),
        remaining: count,
        segment: segment.max(1),
    }
}

/// 只保留前 `count` 个元素。
#[must_use]
pub fn big_take<I: IntoIterator>(items: I, count: u64) -> BigTake<I::IntoIter> {
    BigTake {
        iter: items.into_iter(),
        remaining: count,
    }
}

/// 字节切片版 skip，超出长度时返回空切片。
#[must_use]
pub fn skip(bytes: &[u8], count: u64) -> &[u8] {
    usize::try_from(count)
        .ok()
        .and_then(|n| bytes.get(n..))
        .unwrap_or_default()
}

/// 字节切片版 take，超出长度时返回整个切片。
#[must_use]
pub fn take(bytes: &[u8], count: u64) -> &[u8] {
    let n = usize::try_from(count).map_or(bytes.len(), |n| n.min(bytes.len()));
    bytes.get(..n).unwrap_or(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 逐个元素计数的参考实现
    fn linear_window(items: &[u32], skip_count: u64, take_count: u64) -> Vec<u32> {
        let mut out = Vec::new();
        let mut index = 0_u64;
        for item in items {
            if index >= skip_count && index < skip_count + take_count {
                out.push(*item);
            }
            index += 1;
        }
        out
    }

    #[test]
    fn segmented_skip_matches_linear_scan() {
        let items: Vec<u32> = (0..50).map(|i| i * 3 + 1).collect();
        for segment in [1, 3, 7, 64] {
            for skip_count in [0, 1, 6, 7, 8, 21, 49, 50, 51, 200] {
                for take_count in [0, 1, 5, 14, 100] {
                    let got: Vec<u32> = big_take(
                        big_skip_segmented(items.iter().copied(), segment, skip_count),
                        take_count,
                    )
                    .collect();
                    assert_eq!(
                        got,
                        linear_window(&items, skip_count, take_count),
                        "segment={segment} skip={skip_count} take={take_count}"
                    );
                }
            }
        }
    }

    #[test]
    fn skip_beyond_32_bit_boundary() {
        let skip_count = (1_u64 << 31) + 7;
        let got: Vec<u64> = big_take(big_skip(0_u64.., skip_count), 5).collect();
        let expected: Vec<u64> = (skip_count..skip_count + 5).collect();
        assert_eq!(got, expected);

        let twice = (1_u64 << 32) + 3;
        let got: Vec<u64> = big_take(big_skip(0_u64.., twice), 2).collect();
        assert_eq!(got, vec![twice, twice + 1]);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn take_beyond_32_bit_boundary() {
        let take_count = (1_u64 << 32) + 3;
        let mut window = big_take(big_skip(0_u64.., 10), take_count);
        let last_index = usize::try_from(take_count - 1).unwrap_or(usize::MAX);
        assert_eq!(window.nth(last_index), Some(10 + take_count - 1));
        assert_eq!(window.next(), None);
    }

    #[test]
    fn byte_slices_clamp_to_length() {
        let bytes = [1_u8, 2, 3, 4, 5];
        assert_eq!(skip(&bytes, 2), &[3, 4, 5]);
        assert_eq!(take(&bytes, 2), &[1, 2]);
        assert!(skip(&bytes, 5).is_empty());
        assert!(skip(&bytes, u64::MAX).is_empty());
        assert_eq!(take(&bytes, u64::MAX), &bytes);
        assert_eq!(take(skip(&bytes, 1), 3), &[2, 3, 4]);
    }
}
