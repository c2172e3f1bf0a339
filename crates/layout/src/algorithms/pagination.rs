//! Row pagination as a left-to-right fold.
use std::ops::Range;
use titlepress_types::EPSILON;

pub struct BreakAnalysis {
    pub should_break: bool,
    pub remaining_height: f32,
}

/// Checks whether a block of `child_height` fits below `cursor_y` when the
/// usable space ends at `limit`.
pub fn check_child_fit(cursor_y: f32, child_height: f32, limit: f32) -> BreakAnalysis {
    let available = (limit - cursor_y).max(0.0);
    BreakAnalysis {
        should_break: child_height > available + EPSILON,
        remaining_height: available,
    }
}

/// A row that cannot fit even on an empty page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowTooTall {
    pub row: usize,
    pub height: f32,
    pub available: f32,
}

#[derive(Debug)]
struct Fold {
    fragments: Vec<Range<usize>>,
    start: usize,
    used: f32,
    capacity: f32,
    fresh: bool,
}

/// Splits rows into page fragments.
///
/// The first fragment has `first_capacity` points of room, every later one
/// `fresh_capacity`. Rows are placed greedily. When a break would leave a
/// non-final fragment holding fewer than `min_rows` rows:
///
/// - on the first fragment, the short group moves to the next page when it
///   fits there with the next row, leaving the first fragment empty;
/// - on a later fragment, trailing rows of the previous fragment move
///   forward to join the group, as long as the previous fragment keeps
///   `min_rows` rows and the joined group fits on one page.
///
/// Always returns at least one fragment; fragments are contiguous and cover
/// every row in order.
pub fn paginate_rows(
    heights: &[f32],
    first_capacity: f32,
    fresh_capacity: f32,
    min_rows: usize,
) -> Result<Vec<Range<usize>>, RowTooTall> {
    let init = Fold {
        fragments: Vec::new(),
        start: 0,
        used: 0.0,
        capacity: first_capacity.max(0.0),
        fresh: false,
    };

    let mut fold = heights
        .iter()
        .enumerate()
        .try_fold(init, |mut fold, (i, &height)| {
            if height > fresh_capacity + EPSILON {
                return Err(RowTooTall {
                    row: i,
                    height,
                    available: fresh_capacity,
                });
            }
            if !check_child_fit(fold.used, height, fold.capacity).should_break {
                fold.used += height;
                return Ok(fold);
            }

            let group = i - fold.start;
            let short = group > 0 && group < min_rows;
            let pull_back =
                short && !fold.fresh && fold.used + height <= fresh_capacity + EPSILON;

            if pull_back {
                fold.fragments.push(fold.start..fold.start);
                fold.used += height;
            } else {
                if short && fold.fresh {
                    borrow_rows(heights, &mut fold, i, fresh_capacity, min_rows);
                }
                fold.fragments.push(fold.start..i);
                fold.start = i;
                fold.used = height;
            }
            fold.capacity = fresh_capacity;
            fold.fresh = true;
            Ok(fold)
        })?;

    fold.fragments.push(fold.start..heights.len());
    Ok(fold.fragments)
}

/// Moves the fewest trailing rows of the previous fragment into the group
/// `fold.start..end` that bring it up to `min_rows`. Leaves the fold as it
/// is when no such move fits.
fn borrow_rows(heights: &[f32], fold: &mut Fold, end: usize, capacity: f32, min_rows: usize) {
    let Some(prev) = fold.fragments.last_mut() else {
        return;
    };
    if prev.end != fold.start {
        return;
    }
    let group_height: f32 = heights[fold.start..end].iter().sum();
    let spare = prev.len().saturating_sub(min_rows);
    let mut moved = 0.0;
    let count = (1..=spare)
        .take_while(|&k| {
            moved += heights[fold.start - k];
            moved + group_height <= capacity + EPSILON
        })
        .find(|&k| end - fold.start + k >= min_rows);
    if let Some(k) = count {
        prev.end -= k;
        fold.start -= k;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_rows_two_per_page() {
        let pages = paginate_rows(&[10.0; 3], 20.0, 20.0, 2).unwrap();
        assert_eq!(pages, vec![0..2, 2..3]);
    }

    #[test]
    fn test_everything_fits() {
        let pages = paginate_rows(&[10.0; 4], 100.0, 100.0, 2).unwrap();
        assert_eq!(pages, vec![0..4]);
    }

    #[test]
    fn test_no_rows() {
        let pages = paginate_rows(&[], 10.0, 10.0, 2).unwrap();
        assert_eq!(pages, vec![0..0]);
    }

    #[test]
    fn test_short_group_is_pulled_to_next_page() {
        // Only one row fits under the first page's other content.
        let pages = paginate_rows(&[10.0; 5], 10.0, 30.0, 2).unwrap();
        assert_eq!(pages, vec![0..0, 0..3, 3..5]);
    }

    #[test]
    fn test_short_group_kept_when_pull_back_cannot_help() {
        // A fresh page holds a single row, so nothing is gained by moving.
        let pages = paginate_rows(&[10.0; 3], 10.0, 10.0, 2).unwrap();
        assert_eq!(pages, vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn test_no_room_on_first_page() {
        let pages = paginate_rows(&[10.0; 2], 0.0, 20.0, 2).unwrap();
        assert_eq!(pages, vec![0..0, 0..2]);
    }

    #[test]
    fn test_row_taller_than_page() {
        let err = paginate_rows(&[10.0, 50.0], 100.0, 40.0, 2).unwrap_err();
        assert_eq!(err.row, 1);
        assert_eq!(err.height, 50.0);
    }

    #[test]
    fn test_later_short_group_borrows_from_previous_fragment() {
        // The 50pt row ends the first page's run early, and a lone row would
        // follow it onto the second page.
        let heights = [10.0, 10.0, 10.0, 10.0, 10.0, 50.0, 20.0, 20.0, 20.0];
        let pages = paginate_rows(&heights, 60.0, 60.0, 2).unwrap();
        assert_eq!(pages, vec![0..4, 4..6, 6..9]);
    }

    #[test]
    fn test_borrowing_keeps_previous_fragment_full_enough() {
        // The previous fragment has only two rows, so it cannot give any away.
        let heights = [25.0, 25.0, 50.0, 20.0];
        let pages = paginate_rows(&heights, 60.0, 60.0, 2).unwrap();
        assert_eq!(pages, vec![0..2, 2..3, 3..4]);
    }

    #[test]
    fn test_non_final_fragments_respect_min_rows() {
        let heights = [12.0, 30.0, 12.0, 12.0, 12.0, 30.0, 12.0, 12.0];
        let pages = paginate_rows(&heights, 40.0, 60.0, 2).unwrap();
        let last = pages.len() - 1;
        for (i, range) in pages.iter().enumerate() {
            if i != last && !range.is_empty() {
                assert!(range.len() >= 2, "fragment {} = {:?}", i, range);
            }
        }
        let covered: usize = pages.iter().map(|r| r.len()).sum();
        assert_eq!(covered, heights.len());
    }

    #[test]
    fn test_mixed_heights_avoid_lone_rows_when_possible() {
        let heights = [10.0, 10.0, 10.0, 10.0, 10.0, 50.0, 20.0, 20.0, 20.0, 35.0, 10.0, 10.0];
        let pages = paginate_rows(&heights, 60.0, 60.0, 2).unwrap();
        let last = pages.len() - 1;
        for (i, range) in pages.iter().enumerate() {
            if i != last && !range.is_empty() {
                assert!(range.len() >= 2, "fragment {} = {:?}", i, range);
            }
            let used: f32 = heights[range.clone()].iter().sum();
            assert!(used <= 60.0 + EPSILON, "fragment {} = {:?} uses {}", i, range, used);
        }
        let covered: Vec<usize> = pages.into_iter().flatten().collect();
        assert_eq!(covered, (0..heights.len()).collect::<Vec<_>>());
    }
}
