//! Page arithmetic for 1-based page cursors.

use std::ops::Range;

/// Number of page buttons for `total` rows: `ceil(total / page_size)`.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Row index range shown on `page`, clipped to `total`.
///
/// Page 0 and pages past the end yield an empty range.
pub fn page_range(page: usize, page_size: usize, total: usize) -> Range<usize> {
    if page == 0 {
        return 0..0;
    }
    let start = (page - 1).saturating_mul(page_size).min(total);
    let end = page.saturating_mul(page_size).min(total);
    start..end
}

/// Pulls a cursor back onto the last page when it fell off the end.
///
/// Never returns less than 1, so an emptied table still sits on page 1.
pub fn clamp_page(page: usize, total: usize, page_size: usize) -> usize {
    let last = page_count(total, page_size).max(1);
    page.clamp(1, last)
}

#[cfg(test)]
mod tests {
    use super::{clamp_page, page_count, page_range};

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 5), 0);
        assert_eq!(page_count(5, 5), 1);
        assert_eq!(page_count(6, 5), 2);
    }

    #[test]
    fn page_range_clips_last_page() {
        assert_eq!(page_range(1, 5, 7), 0..5);
        assert_eq!(page_range(2, 5, 7), 5..7);
        assert_eq!(page_range(3, 5, 7), 7..7);
        assert_eq!(page_range(0, 5, 7), 0..0);
    }

    #[test]
    fn clamp_page_stays_on_page_one_when_empty() {
        assert_eq!(clamp_page(3, 10, 5), 2);
        assert_eq!(clamp_page(2, 0, 5), 1);
        assert_eq!(clamp_page(1, 6, 5), 1);
    }
}
