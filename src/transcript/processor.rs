//! Pure transforms over an in-memory cue list.
//!
//! Three independent, composable transforms applied in a fixed order when a
//! request asks for more than one: time-range filter, then text search, then
//! segmentation. None of them raise domain errors; an empty result is a
//! valid outcome.

use crate::transcript::{Cue, SearchOptions, SegmentMethod, SegmentOptions, TimeRange, TranscriptOptions};

/// Keep cues inside the requested window.
///
/// A cue qualifies when it starts at or after `start` (default 0) and, if an
/// `end` is given, finishes at or before it.
pub fn filter_time_range(cues: &[Cue], range: &TimeRange) -> Vec<Cue> {
    let start = range.start.unwrap_or(0.0);
    cues.iter()
        .filter(|cue| {
            cue.start_seconds() >= start
                && range.end.is_none_or(|end| cue.end_seconds() <= end)
        })
        .cloned()
        .collect()
}

/// Keep cues matching the query, expanded by `context_lines` cues on each
/// side of every match.
///
/// Matching is substring containment, case-insensitive unless requested
/// otherwise. Zero matches yield an empty list. Output order matches input
/// order with no duplicates.
pub fn filter_search(cues: &[Cue], search: &SearchOptions) -> Vec<Cue> {
    let query = if search.case_sensitive {
        search.query.clone()
    } else {
        search.query.to_lowercase()
    };

    let match_indices: Vec<usize> = cues
        .iter()
        .enumerate()
        .filter(|(_, cue)| {
            if search.case_sensitive {
                cue.text.contains(&query)
            } else {
                cue.text.to_lowercase().contains(&query)
            }
        })
        .map(|(i, _)| i)
        .collect();

    if match_indices.is_empty() {
        return Vec::new();
    }

    let mut included = vec![false; cues.len()];
    for &idx in &match_indices {
        let lo = idx.saturating_sub(search.context_lines);
        let hi = (idx + search.context_lines).min(cues.len() - 1);
        for flag in &mut included[lo..=hi] {
            *flag = true;
        }
    }

    cues.iter()
        .zip(included)
        .filter(|(_, keep)| *keep)
        .map(|(cue, _)| cue.clone())
        .collect()
}

/// Group cues into `count` contiguous segments.
///
/// A no-op grouping (one segment holding everything) unless
/// `1 < count < cues.len()`.
pub fn segment_cues(cues: &[Cue], options: &SegmentOptions) -> Vec<Vec<Cue>> {
    if options.count <= 1 || options.count >= cues.len() {
        return vec![cues.to_vec()];
    }

    match options.method {
        SegmentMethod::Equal => segment_equal(cues, options.count),
        SegmentMethod::Smart => segment_smart(cues, options.count),
    }
}

/// Contiguous chunks of `ceil(n / count)` cues; the last chunk may be short.
fn segment_equal(cues: &[Cue], count: usize) -> Vec<Vec<Cue>> {
    let chunk_size = cues.len().div_ceil(count);
    cues.chunks(chunk_size).map(|c| c.to_vec()).collect()
}

/// Duration-proportional grouping: close a segment once it has accumulated
/// an equal share of the total spoken duration, except the final segment,
/// which absorbs everything left. Always yields exactly `count` segments.
fn segment_smart(cues: &[Cue], count: usize) -> Vec<Vec<Cue>> {
    let total_ms: u64 = cues.iter().map(|c| c.duration_ms).sum();
    let target = total_ms as f64 / count as f64;

    let mut segments: Vec<Vec<Cue>> = Vec::with_capacity(count);
    let mut current: Vec<Cue> = Vec::new();
    let mut accumulated = 0.0;

    for cue in cues {
        accumulated += cue.duration_ms as f64;
        current.push(cue.clone());

        if accumulated >= target && segments.len() < count - 1 {
            segments.push(std::mem::take(&mut current));
            accumulated = 0.0;
        }
    }
    segments.push(current);

    // Uneven content can leave fewer closings than requested; pad with
    // empty trailing segments so the count contract holds.
    while segments.len() < count {
        segments.push(Vec::new());
    }
    segments
}

/// Apply the requested transforms in pipeline order and flatten the result.
///
/// Segmentation here acts as a grouping marker for downstream labelling,
/// not a reordering, so flattening reproduces filtered input order.
pub fn apply_filters(cues: &[Cue], options: &TranscriptOptions) -> Vec<Cue> {
    let mut result = match &options.time_range {
        Some(range) => filter_time_range(cues, range),
        None => cues.to_vec(),
    };

    if let Some(search) = &options.search {
        result = filter_search(&result, search);
    }

    if let Some(segment) = &options.segment {
        result = segment_cues(&result, segment).into_iter().flatten().collect();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::OutputFormat;

    /// `n` cues, 5 s apart, 4 s long each.
    fn spaced_cues(n: usize) -> Vec<Cue> {
        (0..n)
            .map(|i| Cue::new(format!("cue {}", i), i as u64 * 5000, 4000))
            .collect()
    }

    #[test]
    fn test_time_range_no_bounds_is_identity() {
        let cues = spaced_cues(10);
        let out = filter_time_range(&cues, &TimeRange { start: Some(0.0), end: None });
        assert_eq!(out, cues);
    }

    #[test]
    fn test_time_range_start_only() {
        let cues = spaced_cues(10);
        let out = filter_time_range(&cues, &TimeRange { start: Some(20.0), end: None });
        assert_eq!(out.len(), 6);
        assert_eq!(out[0].offset_ms, 20_000);
    }

    #[test]
    fn test_time_range_end_excludes_overrunning_cue() {
        let cues = spaced_cues(10);
        // Cue at 20s runs until 24s, so end=23 drops it.
        let out = filter_time_range(&cues, &TimeRange { start: None, end: Some(23.0) });
        assert_eq!(out.last().unwrap().offset_ms, 15_000);
    }

    #[test]
    fn test_search_case_insensitive_by_default() {
        let cues = vec![
            Cue::new("Hello World", 0, 1000),
            Cue::new("other", 1000, 1000),
        ];
        let search = SearchOptions {
            query: "hello".to_string(),
            case_sensitive: false,
            context_lines: 0,
        };
        let out = filter_search(&cues, &search);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "Hello World");
    }

    #[test]
    fn test_search_case_sensitive() {
        let cues = vec![Cue::new("Hello", 0, 1000)];
        let search = SearchOptions {
            query: "hello".to_string(),
            case_sensitive: true,
            context_lines: 0,
        };
        assert!(filter_search(&cues, &search).is_empty());
    }

    #[test]
    fn test_search_no_match_is_empty() {
        let cues = spaced_cues(5);
        let search = SearchOptions {
            query: "missing".to_string(),
            case_sensitive: false,
            context_lines: 3,
        };
        assert!(filter_search(&cues, &search).is_empty());
    }

    #[test]
    fn test_search_context_expansion_bounded_and_deduplicated() {
        let mut cues = spaced_cues(7);
        cues[1].text = "needle one".to_string();
        cues[3].text = "needle two".to_string();
        let search = SearchOptions {
            query: "needle".to_string(),
            case_sensitive: false,
            context_lines: 1,
        };
        // Windows [0..=2] and [2..=4] overlap at index 2; union has 5 cues.
        let out = filter_search(&cues, &search);
        assert_eq!(out.len(), 5);
        let offsets: Vec<u64> = out.iter().map(|c| c.offset_ms).collect();
        assert_eq!(offsets, vec![0, 5000, 10_000, 15_000, 20_000]);
    }

    #[test]
    fn test_search_context_respects_list_edges() {
        let mut cues = spaced_cues(3);
        cues[0].text = "needle".to_string();
        let search = SearchOptions {
            query: "needle".to_string(),
            case_sensitive: false,
            context_lines: 5,
        };
        assert_eq!(filter_search(&cues, &search).len(), 3);
    }

    #[test]
    fn test_equal_segmentation_round_trips() {
        let cues = spaced_cues(20);
        let options = SegmentOptions { method: SegmentMethod::Equal, count: 4 };
        let segments = segment_cues(&cues, &options);
        assert_eq!(segments.len(), 4);
        assert!(segments.iter().all(|s| s.len() == 5));

        let flat: Vec<Cue> = segments.into_iter().flatten().collect();
        assert_eq!(flat, cues);
    }

    #[test]
    fn test_equal_segmentation_uneven_last_chunk() {
        let cues = spaced_cues(10);
        let options = SegmentOptions { method: SegmentMethod::Equal, count: 3 };
        let segments = segment_cues(&cues, &options);
        // ceil(10/3) = 4, so 4 + 4 + 2.
        assert_eq!(segments.iter().map(Vec::len).collect::<Vec<_>>(), vec![4, 4, 2]);
    }

    #[test]
    fn test_smart_segmentation_exact_count_and_coverage() {
        let cues = spaced_cues(20);
        for count in 2..20 {
            let options = SegmentOptions { method: SegmentMethod::Smart, count };
            let segments = segment_cues(&cues, &options);
            assert_eq!(segments.len(), count, "count={}", count);
            let flat: Vec<Cue> = segments.into_iter().flatten().collect();
            assert_eq!(flat, cues, "count={}", count);
        }
    }

    #[test]
    fn test_smart_segmentation_uneven_durations() {
        // One giant cue followed by tiny ones; the final segment still
        // absorbs every remaining cue.
        let mut cues = vec![Cue::new("long", 0, 100_000)];
        for i in 0..5 {
            cues.push(Cue::new(format!("short {}", i), 100_000 + i * 1000, 500));
        }
        let options = SegmentOptions { method: SegmentMethod::Smart, count: 3 };
        let segments = segment_cues(&cues, &options);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].len(), 1);
        let flat: Vec<Cue> = segments.into_iter().flatten().collect();
        assert_eq!(flat, cues);
    }

    #[test]
    fn test_segmentation_noop_for_degenerate_counts() {
        let cues = spaced_cues(5);
        for count in [0, 1, 5, 6] {
            let options = SegmentOptions { method: SegmentMethod::Equal, count };
            let segments = segment_cues(&cues, &options);
            assert_eq!(segments.len(), 1);
            assert_eq!(segments[0], cues);
        }
    }

    #[test]
    fn test_apply_filters_pipeline_order() {
        let mut cues = spaced_cues(10);
        cues[6].text = "needle".to_string();
        let options = TranscriptOptions {
            time_range: Some(TimeRange { start: Some(10.0), end: None }),
            search: Some(SearchOptions {
                query: "needle".to_string(),
                case_sensitive: false,
                context_lines: 1,
            }),
            format: OutputFormat::Raw,
            ..Default::default()
        };
        let out = apply_filters(&cues, &options);
        // Time filter keeps indices 2..=9, search keeps the needle at
        // original index 6 plus one neighbor each side.
        assert_eq!(out.len(), 3);
        assert_eq!(out[1].text, "needle");
    }
}
