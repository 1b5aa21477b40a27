//! Timeline layout engine.
//!
//! Maps dates to pixel coordinates for the occupancy chart: a fixed one-year
//! window anchored three months in the past, one fixed-height lane per
//! property, bars clipped to the window, a one-pixel seam between abutting
//! bars, and same-day turnover markers.
//!
//! Everything here is pure geometry over [`chrono::NaiveDate`]; the HTML
//! serializer consumes the output without recomputing any of it.

use crate::booking::{BlockedRange, Booking};
use chrono::{Datelike, Days, NaiveDate};

/// Default UI scale (1.5 ≈ 150% zoom).
pub const DEFAULT_SCALE: f64 = 1.5;

/// Days the window reaches back from today.
const WINDOW_BACK_DAYS: u64 = 90;

/// Total window span in days.
const WINDOW_SPAN_DAYS: u64 = 365;

/// Pixels trimmed off a bar that abuts its successor.
const ADJACENCY_TRIM_PX: f64 = 1.0;

/// The visible date window: one year starting three months before today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// First visible date.
    pub start: NaiveDate,
    /// Last visible date, inclusive.
    pub end: NaiveDate,
}

impl Window {
    /// Window for a run happening on `today`. Recomputed every run, never
    /// persisted.
    #[must_use]
    pub fn around(today: NaiveDate) -> Self {
        let start = today - Days::new(WINDOW_BACK_DAYS);
        let end = start + Days::new(WINDOW_SPAN_DAYS);
        Self { start, end }
    }

    /// Number of days spanned.
    #[inline]
    #[must_use]
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Whether `date` falls inside the window.
    #[inline]
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Clip an inclusive span to the window. `None` when the span lies
    /// entirely outside.
    #[must_use]
    pub fn clip(&self, start: NaiveDate, end: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        if end < self.start || start > self.end {
            return None;
        }
        Some((start.max(self.start), end.min(self.end)))
    }

    /// All dates in the window, inclusive of both ends.
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(|d| *d <= self.end)
    }

    /// First-of-month dates whose month intersects the window. The first
    /// entry may lie before `start`; its grid line simply falls off-canvas.
    #[must_use]
    pub fn month_starts(&self) -> Vec<NaiveDate> {
        let mut months = Vec::new();
        let mut m = self.start.with_day(1).unwrap_or(self.start);
        while m <= self.end {
            months.push(m);
            match m.checked_add_months(chrono::Months::new(1)) {
                Some(next) => m = next,
                None => break,
            }
        }
        months
    }
}

/// Pixel geometry of the chart, derived from the UI scale, the window and
/// the lane count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// UI scale factor.
    pub scale: f64,
    /// Visible window.
    pub window: Window,
    /// Width of one day column.
    pub day_w: f64,
    /// Height of one property lane.
    pub row_h: f64,
    /// Vertical gap inside a lane (bar height = `row_h - gap`).
    pub gap: f64,
    /// Height of the header band (month names, day numbers).
    pub top_h: f64,
    /// Width of the left label column.
    pub label_w: f64,
    /// Width of the scrollable chart area.
    pub chart_w: f64,
    /// Total document height.
    pub height: f64,
}

impl Geometry {
    /// Build the geometry.
    ///
    /// `max_name_chars` is the length of the longest property display name;
    /// it drives the label-column width, clamped to `[96·s, 200·s]`.
    #[must_use]
    pub fn new(scale: f64, window: Window, lane_count: usize, max_name_chars: usize) -> Self {
        let char_px = 6.0 * scale;
        let label_w = (max_name_chars as f64 * char_px + 12.0 * scale)
            .floor()
            .clamp(96.0 * scale, 200.0 * scale);
        let day_w = 16.0 * scale;
        let row_h = 24.0 * scale;
        let top_h = 52.0 * scale;
        let chart_w = (window.days().max(1) as f64) * day_w;
        Self {
            scale,
            window,
            day_w,
            row_h,
            gap: 6.0 * scale,
            top_h,
            label_w,
            chart_w,
            height: top_h + lane_count as f64 * row_h,
        }
    }

    /// X coordinate of a date within the chart area.
    #[inline]
    #[must_use]
    pub fn day_x(&self, date: NaiveDate) -> f64 {
        (date - self.window.start).num_days() as f64 * self.day_w
    }

    /// Top Y coordinate of a lane.
    #[inline]
    #[must_use]
    pub fn row_y(&self, row: usize) -> f64 {
        self.top_h + row as f64 * self.row_h
    }

    /// Height of a bar within a lane.
    #[inline]
    #[must_use]
    pub fn bar_height(&self) -> f64 {
        self.row_h - self.gap
    }

    /// Whether a bar is wide enough to carry a text label.
    #[inline]
    #[must_use]
    pub fn shows_label(&self, bar_width: f64) -> bool {
        bar_width >= 40.0 * self.scale
    }

    /// Pixel budget available for a bar's label text.
    #[inline]
    #[must_use]
    pub fn label_budget(&self, bar_width: f64) -> f64 {
        bar_width - 8.0 * self.scale
    }

    /// Average label character width in pixels.
    #[inline]
    #[must_use]
    pub fn label_char_px(&self) -> f64 {
        6.5 * self.scale
    }

    /// Day-number tick interval: every day at full zoom, sparser when day
    /// columns get narrow.
    #[must_use]
    pub fn day_tick_interval(&self) -> u32 {
        if self.day_w >= 14.0 * self.scale {
            1
        } else if self.day_w >= 8.0 * self.scale {
            2
        } else {
            5
        }
    }

    /// Horizontal scroll offset that puts `today − 5 days` at the left edge.
    #[must_use]
    pub fn scroll_offset(&self, today: NaiveDate) -> f64 {
        let days = ((today - self.window.start).num_days() - 5).max(0);
        days as f64 * self.day_w
    }

    /// Geometry of one span bar, clipped to the window. `None` when the span
    /// is entirely outside. Width is inclusive of the end date and never
    /// narrower than one day column.
    #[must_use]
    pub fn span_bar(&self, row: usize, start: NaiveDate, end: NaiveDate) -> Option<BarGeometry> {
        let (clip_start, clip_end) = self.window.clip(start, end)?;
        let days = (clip_end - clip_start).num_days() + 1;
        Some(BarGeometry {
            x: self.day_x(clip_start),
            y: self.row_y(row),
            width: self.day_w.max(days as f64 * self.day_w),
            height: self.bar_height(),
            clip_start,
            clip_end,
            trimmed: false,
        })
    }

    /// Lay out one lane's bookings.
    ///
    /// `bookings` must be sorted by `(start, end)`. Applies the adjacency
    /// trim (one pixel off a bar whose unclipped end equals the next
    /// booking's start, unless the end was clipped away) and collects
    /// same-day turnover dates that fall inside the window.
    #[must_use]
    pub fn lay_out_bookings(&self, row: usize, bookings: &[Booking]) -> LaneBars {
        let mut bars = Vec::new();
        let mut turnovers = Vec::new();
        for (i, booking) in bookings.iter().enumerate() {
            let next_start = bookings.get(i + 1).map(|b| b.start);
            if let Some(mut bar) = self.span_bar(row, booking.start, booking.end) {
                if bar.clip_end == booking.end && next_start == Some(booking.end) {
                    bar.width = self.day_w.max(bar.width - ADJACENCY_TRIM_PX);
                    bar.trimmed = true;
                }
                bars.push((i, bar));
            }
            if next_start == Some(booking.end) && self.window.contains(booking.end) {
                turnovers.push(booking.end);
            }
        }
        LaneBars { bars, turnovers }
    }

    /// Lay out one lane's blocked ranges: identical clip and width rules,
    /// no trim, no turnover detection.
    #[must_use]
    pub fn lay_out_blocked(&self, row: usize, blocked: &[BlockedRange]) -> Vec<(usize, BarGeometry)> {
        blocked
            .iter()
            .enumerate()
            .filter_map(|(i, b)| self.span_bar(row, b.start, b.end).map(|bar| (i, bar)))
            .collect()
    }
}

/// Pixel geometry of one rendered bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    /// Left edge within the chart area.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Bar width after clipping and trimming.
    pub width: f64,
    /// Bar height.
    pub height: f64,
    /// First rendered date (clipped; the booking key keeps the real start).
    pub clip_start: NaiveDate,
    /// Last rendered date (clipped).
    pub clip_end: NaiveDate,
    /// Whether the adjacency trim was applied.
    pub trimmed: bool,
}

/// Laid-out bars of one lane plus its turnover dates. Bar tuples carry the
/// index into the input slice so the serializer can reach the source record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaneBars {
    /// `(input index, geometry)` for every visible bar.
    pub bars: Vec<(usize, BarGeometry)>,
    /// Dates with a same-day departure/arrival pair, inside the window.
    pub turnovers: Vec<NaiveDate>,
}

/// Truncate `text` to fit `max_px` at `px_per_char`, appending `…` when
/// shortened.
///
/// Returns an empty string when not even one character plus the ellipsis
/// fits; a shown label therefore always keeps at least one real character,
/// and a truncated label never exceeds the character budget.
#[must_use]
pub fn ellipsize(text: &str, max_px: f64, px_per_char: f64) -> String {
    if max_px <= 0.0 {
        return String::new();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let max_chars = (max_px / px_per_char) as usize;
    if max_chars == 0 {
        return String::new();
    }
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars < 2 {
        // No room for a character and the ellipsis.
        return String::new();
    }
    let mut out: String = text.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn booking(start: NaiveDate, end: NaiveDate) -> Booking {
        Booking {
            property: "P".to_string(),
            guest: "G".to_string(),
            start,
            end,
            guest_count: None,
            animal_count: None,
        }
    }

    fn geometry() -> Geometry {
        // Window 2024-10-03 .. 2025-10-03 (today 2025-01-01).
        Geometry::new(1.0, Window::around(d(2025, 1, 1)), 3, 12)
    }

    #[test]
    fn test_window_span() {
        let w = Window::around(d(2025, 1, 1));
        assert_eq!(w.start, d(2024, 10, 3));
        assert_eq!(w.days(), 365);
        assert!(w.contains(w.start) && w.contains(w.end));
    }

    #[test]
    fn test_clip_outside_and_straddling() {
        let w = Window::around(d(2025, 1, 1));
        assert_eq!(w.clip(d(2020, 1, 1), d(2020, 2, 1)), None, "fully before");
        assert_eq!(w.clip(d(2030, 1, 1), d(2030, 2, 1)), None, "fully after");
        let (s, e) = w.clip(d(2024, 9, 1), d(2024, 10, 10)).unwrap();
        assert_eq!(s, w.start, "straddling the left edge clips to window start");
        assert_eq!(e, d(2024, 10, 10));
    }

    #[test]
    fn test_bar_width_is_inclusive_of_end_date() {
        let g = geometry();
        let bar = g.span_bar(0, d(2025, 1, 1), d(2025, 1, 1)).unwrap();
        assert!((bar.width - g.day_w).abs() < f64::EPSILON, "one-day booking spans one column");
        let bar = g.span_bar(0, d(2025, 1, 1), d(2025, 1, 5)).unwrap();
        assert!((bar.width - 5.0 * g.day_w).abs() < f64::EPSILON);
    }

    #[test]
    fn test_turnover_and_trim() {
        let g = geometry();
        let lane = g.lay_out_bookings(
            0,
            &[
                booking(d(2025, 1, 1), d(2025, 1, 5)),
                booking(d(2025, 1, 5), d(2025, 1, 10)),
            ],
        );
        assert_eq!(
            lane.turnovers,
            vec![d(2025, 1, 5)],
            "exactly one turnover marker at the shared date"
        );
        let (_, first) = lane.bars[0];
        assert!(first.trimmed, "abutting bar must be trimmed");
        assert!(
            (first.width - (5.0 * g.day_w - 1.0)).abs() < f64::EPSILON,
            "trim takes one pixel off the first bar"
        );
        let (_, second) = lane.bars[1];
        assert!(!second.trimmed, "last bar has no successor to abut");
    }

    #[test]
    fn test_no_trim_when_end_clipped() {
        let g = geometry();
        let end = g.window.end + Days::new(10);
        // First booking runs past the window; its rendered end is the clip,
        // not the real end, so no seam is cut.
        let lane = g.lay_out_bookings(
            0,
            &[booking(d(2025, 9, 1), end), booking(end, end + Days::new(3))],
        );
        assert_eq!(lane.bars.len(), 1, "successor starts after the window");
        assert!(!lane.bars[0].1.trimmed);
        assert!(lane.turnovers.is_empty(), "turnover date outside the window");
    }

    #[test]
    fn test_gap_between_bookings_is_not_a_turnover() {
        let g = geometry();
        let lane = g.lay_out_bookings(
            0,
            &[
                booking(d(2025, 1, 1), d(2025, 1, 5)),
                booking(d(2025, 1, 6), d(2025, 1, 10)),
            ],
        );
        assert!(lane.turnovers.is_empty());
        assert!(!lane.bars[0].1.trimmed);
    }

    #[test]
    fn test_booking_outside_window_dropped() {
        let g = geometry();
        let lane = g.lay_out_bookings(0, &[booking(d(2020, 1, 1), d(2020, 1, 5))]);
        assert!(lane.bars.is_empty());
        assert!(lane.turnovers.is_empty());
    }

    #[test]
    fn test_straddling_booking_clips_to_window_start() {
        let g = geometry();
        let lane = g.lay_out_bookings(
            0,
            &[booking(g.window.start - Days::new(5), g.window.start + Days::new(2))],
        );
        let (_, bar) = lane.bars[0];
        assert_eq!(bar.clip_start, g.window.start);
        assert!((bar.x).abs() < f64::EPSILON, "clipped bar starts at the left edge");
    }

    #[test]
    fn test_blocked_layout_has_no_trim_or_turnover() {
        let g = geometry();
        let blocked = vec![
            BlockedRange {
                property: "P".to_string(),
                start: d(2025, 1, 1),
                end: d(2025, 1, 5),
            },
            BlockedRange {
                property: "P".to_string(),
                start: d(2025, 1, 5),
                end: d(2025, 1, 8),
            },
        ];
        let bars = g.lay_out_blocked(0, &blocked);
        assert_eq!(bars.len(), 2);
        assert!(bars.iter().all(|(_, b)| !b.trimmed));
    }

    #[test]
    fn test_label_column_clamp() {
        let w = Window::around(d(2025, 1, 1));
        let narrow = Geometry::new(1.0, w, 1, 2);
        assert!((narrow.label_w - 96.0).abs() < f64::EPSILON, "short names clamp up to the minimum");
        let wide = Geometry::new(1.0, w, 1, 60);
        assert!((wide.label_w - 200.0).abs() < f64::EPSILON, "long names clamp down to the maximum");
    }

    #[test]
    fn test_month_starts_cover_window() {
        let w = Window::around(d(2025, 1, 1));
        let months = w.month_starts();
        assert_eq!(months.first(), Some(&d(2024, 10, 1)));
        assert_eq!(months.last(), Some(&d(2025, 10, 1)));
        assert_eq!(months.len(), 13);
        assert!(months.iter().all(|m| chrono::Datelike::day(m) == 1));
    }

    #[test]
    fn test_scroll_offset_targets_five_days_before_today() {
        let g = geometry();
        let expected = (90 - 5) as f64 * g.day_w;
        assert!((g.scroll_offset(d(2025, 1, 1)) - expected).abs() < f64::EPSILON);
        // A today before the window start cannot scroll negative.
        assert!((Geometry::new(1.0, g.window, 1, 4).scroll_offset(g.window.start)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ellipsize_short_text_untouched() {
        assert_eq!(ellipsize("Meyer", 100.0, 6.5), "Meyer");
    }

    #[test]
    fn test_ellipsize_truncates_with_ellipsis() {
        let out = ellipsize("Familie Petersen-Lührs", 39.0, 6.5);
        assert_eq!(out, "Famil…", "6-char budget keeps 5 chars plus the ellipsis");
    }

    #[test]
    fn test_ellipsize_no_budget() {
        assert_eq!(ellipsize("Meyer", 0.0, 6.5), "");
        assert_eq!(ellipsize("Meyer", -4.0, 6.5), "");
        assert_eq!(ellipsize("Meyer", 3.0, 6.5), "", "budget below one character");
    }

    proptest! {
        #[test]
        fn prop_ellipsize_respects_budget(text in ".{0,64}", max_px in 0.0f64..400.0) {
            let px_per_char = 6.5;
            let out = ellipsize(&text, max_px, px_per_char);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let budget = (max_px / px_per_char) as usize;
            prop_assert!(out.chars().count() <= budget);
            if out.chars().count() < text.chars().count() && !out.is_empty() {
                prop_assert!(out.ends_with('…'), "truncated labels end in an ellipsis");
                prop_assert!(out.chars().count() >= 2, "a shown truncated label keeps a real character");
            }
        }

        #[test]
        fn prop_bar_never_narrower_than_one_day(offset in 0i64..400, len in 0i64..60) {
            let g = geometry();
            let start = g.window.start + Days::new(offset as u64);
            let end = start + Days::new(len as u64);
            if let Some(bar) = g.span_bar(0, start, end) {
                prop_assert!(bar.width >= g.day_w - f64::EPSILON);
                prop_assert!(bar.clip_start >= g.window.start && bar.clip_end <= g.window.end);
            }
        }
    }
}
