//! Plain-text dump of the call tree.
//!
//! Walks the tree depth-first through a [`ProfileCursor`] and writes one
//! block per parent: a header with the parent's total running time, one
//! line per child with its share of the parent, per-frame cost and call
//! count, and a closing `unaccounted` line for time the children do not
//! explain. The report is what a "dump profiling data" console command
//! prints after a run.

use std::fmt;
use std::time::Duration;

use crate::cursor::{ProfileCursor, RegionStats};
use crate::session::ProfileSession;

const RULE_WIDTH: usize = 48;

/// Sibling ordering for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportOrder {
    /// First-discovery order, matching the tree's child lists.
    #[default]
    Discovery,
    /// Greatest accumulated time first; ties keep discovery order.
    HottestFirst,
}

/// Render the full report into `out`.
pub fn write_report(
    session: &ProfileSession,
    out: &mut impl fmt::Write,
    order: ReportOrder,
) -> fmt::Result {
    let mut cursor = session.cursor();
    write_level(session, &mut cursor, out, order, 0)
}

/// Render the full report as a string.
pub fn render_report(session: &ProfileSession, order: ReportOrder) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(session, &mut out, order);
    out
}

fn write_level(
    session: &ProfileSession,
    cursor: &mut ProfileCursor<'_>,
    out: &mut impl fmt::Write,
    order: ReportOrder,
    depth: usize,
) -> fmt::Result {
    if cursor.child_count() == 0 {
        return Ok(());
    }

    // The root's own counters never accumulate; its running time is the
    // measurement window itself.
    let parent_time = if cursor.is_root() {
        session.time_since_reset()
    } else {
        cursor.parent_stats().time
    };
    let frames = session.frames_since_reset().max(1);

    let indent = "  ".repeat(depth);
    writeln!(out, "{indent}{}", "-".repeat(RULE_WIDTH))?;
    if cursor.is_root() {
        writeln!(
            out,
            "{indent}{} (total: {} over {} frames)",
            cursor.parent_stats().name,
            format_ms(parent_time),
            session.frames_since_reset(),
        )?;
    } else {
        writeln!(
            out,
            "{indent}{} (total: {})",
            cursor.parent_stats().name,
            format_ms(parent_time),
        )?;
    }

    let mut entries: Vec<(usize, RegionStats<'_>)> = Vec::with_capacity(cursor.child_count());
    cursor.first();
    while let Some(stats) = cursor.current() {
        entries.push((entries.len(), stats));
        cursor.next();
    }
    if order == ReportOrder::HottestFirst {
        // Stable sort: equal times keep discovery order.
        entries.sort_by(|a, b| b.1.time.cmp(&a.1.time));
    }

    let mut accounted = Duration::ZERO;
    for (index, stats) in &entries {
        accounted += stats.time;
        let per_frame = stats.time / u32::try_from(frames).unwrap_or(u32::MAX);
        writeln!(
            out,
            "{indent}{index} -- {} ({:.1}%) :: {}/frame ({} calls)",
            stats.name,
            percent_of(stats.time, parent_time),
            format_ms(per_frame),
            stats.calls,
        )?;
    }

    let unaccounted = parent_time.saturating_sub(accounted);
    writeln!(
        out,
        "{indent}unaccounted ({:.1}%) :: {}",
        percent_of(unaccounted, parent_time),
        format_ms(unaccounted),
    )?;

    for (index, _) in &entries {
        if cursor.enter_child(*index).is_ok() {
            write_level(session, cursor, out, order, depth + 1)?;
            cursor.enter_parent();
        }
    }
    Ok(())
}

fn format_ms(time: Duration) -> String {
    format!("{:.3} ms", time.as_secs_f64() * 1000.0)
}

fn percent_of(part: Duration, whole: Duration) -> f64 {
    if whole.is_zero() {
        0.0
    } else {
        part.as_secs_f64() / whole.as_secs_f64() * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Two frames: update { physics, ai } and render, with render hottest.
    fn sample_session() -> ProfileSession {
        let clock = ManualClock::new();
        let mut session = ProfileSession::with_clock(Box::new(clock.clone()));
        for _ in 0..2 {
            session.begin("update");
            session.begin("physics");
            clock.advance(ms(2));
            session.end();
            session.begin("ai");
            clock.advance(ms(1));
            session.end();
            session.end();
            session.begin("render");
            clock.advance(ms(5));
            session.end();
            session.advance_frame();
        }
        session
    }

    #[test]
    fn lists_every_region_with_calls() {
        let session = sample_session();
        let report = render_report(&session, ReportOrder::Discovery);

        assert!(report.contains("root (total: 16.000 ms over 2 frames)"));
        assert!(report.contains("update (37.5%) :: 3.000 ms/frame (2 calls)"));
        assert!(report.contains("render (62.5%) :: 5.000 ms/frame (2 calls)"));
        assert!(report.contains("physics"));
        assert!(report.contains("ai"));
    }

    #[test]
    fn nested_levels_are_indented() {
        let session = sample_session();
        let report = render_report(&session, ReportOrder::Discovery);

        // The update block sits one level deep.
        assert!(report.contains("\n  update (total: 6.000 ms)"));
        assert!(report.contains("\n  0 -- physics"));
    }

    #[test]
    fn unaccounted_remainder_is_reported() {
        let session = sample_session();
        let report = render_report(&session, ReportOrder::Discovery);

        // 16 ms window, 6 + 10 accounted at the top level.
        assert!(report.contains("unaccounted (0.0%) :: 0.000 ms"));
        // Inside update: 6 ms total, 4 + 2 in children.
        assert!(report.contains("  unaccounted (0.0%) :: 0.000 ms"));
    }

    #[test]
    fn hottest_first_reorders_siblings() {
        let session = sample_session();
        let report = render_report(&session, ReportOrder::HottestFirst);

        let render_at = report.find("-- render").expect("render line");
        let update_at = report.find("-- update").expect("update line");
        assert!(render_at < update_at, "hottest sibling should print first");
        // Discovery indices are preserved even when reordered.
        assert!(report.contains("1 -- render"));
        assert!(report.contains("0 -- update"));
    }

    #[test]
    fn empty_session_renders_nothing() {
        let session = ProfileSession::new();
        assert_eq!(render_report(&session, ReportOrder::Discovery), "");
    }

    #[test]
    fn write_report_into_string_sink() {
        let session = sample_session();
        let mut out = String::new();
        write_report(&session, &mut out, ReportOrder::Discovery).expect("fmt");
        assert!(!out.is_empty());
    }
}
