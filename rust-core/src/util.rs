//! Index helpers shared by every range-taking operation

use std::ops::Range;

/// Clamp a caller-supplied `[start, end)` range against a buffer of `len` items
///
/// Lenient convention: a `start` outside `[0, len]` becomes `0` and an `end`
/// outside `[0, len]` becomes `len`. Nothing is ever rejected. A range that is
/// still inverted after clamping is treated as empty.
///
/// # Arguments
/// * `start` - Requested start index (inclusive, may be negative)
/// * `end` - Requested end index (exclusive, may be negative)
/// * `len` - Length of the buffer being indexed
pub fn clamp_range(start: i64, end: i64, len: usize) -> Range<usize> {
    let len_i = len as i64;

    let start = if start < 0 || start > len_i { 0 } else { start as usize };
    let end = if end < 0 || end > len_i { len } else { end as usize };

    start..end.max(start)
}

/// Wrap any integer index onto `[0, len)`, treating the buffer as periodic
///
/// Returns `None` for an empty buffer.
pub fn wrap_index(idx: i64, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(idx.rem_euclid(len as i64) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_in_range() {
        assert_eq!(clamp_range(2, 5, 10), 2..5);
        assert_eq!(clamp_range(0, 10, 10), 0..10);
    }

    #[test]
    fn test_clamp_out_of_range() {
        assert_eq!(clamp_range(-1, 5, 10), 0..5);
        assert_eq!(clamp_range(11, 5, 10), 0..5);
        assert_eq!(clamp_range(3, -7, 10), 3..10);
        assert_eq!(clamp_range(3, 42, 10), 3..10);
        assert_eq!(clamp_range(-3, -7, 10), 0..10);
    }

    #[test]
    fn test_clamp_inverted_is_empty() {
        let r = clamp_range(7, 2, 10);
        assert!(r.is_empty());
        assert_eq!(r.start, 7);
    }

    #[test]
    fn test_wrap_index() {
        assert_eq!(wrap_index(0, 8), Some(0));
        assert_eq!(wrap_index(8, 8), Some(0));
        assert_eq!(wrap_index(9, 8), Some(1));
        assert_eq!(wrap_index(-1, 8), Some(7));
        assert_eq!(wrap_index(-17, 8), Some(7));
        assert_eq!(wrap_index(3, 0), None);
    }
}
