//! Sequence clustering of consecutive same-speaker quotes
//!
//! Partitions an ordered visible-quote list into runs of temporally
//! adjacent quotes from the same participant and session, so surfaces
//! can suppress the redundant speaker badge inside a continuous
//! utterance that was split into multiple quote records. Labels are
//! derived fresh on every visibility change and never stored.

use crate::store::QuoteView;
use serde::Serialize;

/// A quote's position within its cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterPosition {
    /// A run of one; show the speaker badge
    Solo,
    /// Opens a run of two or more; show the speaker badge
    First,
    /// Interior of a run; badge suppressed
    Middle,
    /// Closes a run; badge suppressed
    Last,
}

impl ClusterPosition {
    /// True for the positions where the speaker badge is shown.
    pub fn shows_speaker_badge(&self) -> bool {
        matches!(self, ClusterPosition::Solo | ClusterPosition::First)
    }
}

/// Label each quote's position in its cluster.
///
/// Input is the ordered visible list for one display group. A quote
/// joins the preceding quote's cluster iff they share participant and
/// session, neither start timecode is the `0` sentinel, and the gap
/// from the previous quote's end (or start, when its end is
/// unavailable) to this quote's start is at most `gap_seconds`.
pub fn label_positions(quotes: &[QuoteView], gap_seconds: f64) -> Vec<ClusterPosition> {
    let n = quotes.len();
    if n == 0 {
        return Vec::new();
    }

    // joins[i] = quote i continues the cluster of quote i-1
    let mut joins = vec![false; n];
    for i in 1..n {
        joins[i] = continues_cluster(&quotes[i - 1], &quotes[i], gap_seconds);
    }

    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let joins_previous = joins[i];
        let next_joins = i + 1 < n && joins[i + 1];
        let label = match (joins_previous, next_joins) {
            (false, false) => ClusterPosition::Solo,
            (false, true) => ClusterPosition::First,
            (true, true) => ClusterPosition::Middle,
            (true, false) => ClusterPosition::Last,
        };
        labels.push(label);
    }
    labels
}

fn continues_cluster(previous: &QuoteView, current: &QuoteView, gap_seconds: f64) -> bool {
    if previous.participant_id != current.participant_id
        || previous.session_id != current.session_id
    {
        return false;
    }
    // Zero-timecode quotes carry no reliable time reference; always solo.
    if previous.has_no_timecode() || current.has_no_timecode() {
        return false;
    }

    let previous_end = if previous.end_timecode == 0.0 {
        previous.start_timecode
    } else {
        previous.end_timecode
    };

    current.start_timecode - previous_end <= gap_seconds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SEQUENCE_GAP_SECONDS;
    use crate::store::{Overlay, QuoteRecord, QuoteView};

    fn quote(id: &str, participant: &str, session: &str, start: f64, end: f64) -> QuoteView {
        let record =
            QuoteRecord::new(id, participant, session, "text").with_timecodes(start, end);
        let overlay = Overlay::seeded_from(&record);
        QuoteView::merge(&record, &overlay)
    }

    fn labels(quotes: &[QuoteView]) -> Vec<ClusterPosition> {
        label_positions(quotes, DEFAULT_SEQUENCE_GAP_SECONDS)
    }

    #[test]
    fn empty_list_yields_no_labels() {
        assert!(labels(&[]).is_empty());
    }

    #[test]
    fn single_quote_is_solo() {
        let quotes = vec![quote("q1", "p1", "s1", 10.0, 12.0)];
        assert_eq!(labels(&quotes), vec![ClusterPosition::Solo]);
    }

    #[test]
    fn run_of_three_within_gap() {
        // Gaps of 9 and 12 seconds, both within 17.5
        let quotes = vec![
            quote("q1", "p1", "s1", 10.0, 10.0),
            quote("q2", "p1", "s1", 19.0, 19.0),
            quote("q3", "p1", "s1", 31.0, 31.0),
        ];
        assert_eq!(
            labels(&quotes),
            vec![
                ClusterPosition::First,
                ClusterPosition::Middle,
                ClusterPosition::Last,
            ]
        );
    }

    #[test]
    fn gap_beyond_threshold_starts_new_cluster() {
        let quotes = vec![
            quote("q1", "p1", "s1", 10.0, 10.0),
            quote("q2", "p1", "s1", 19.0, 19.0),
            quote("q3", "p1", "s1", 31.0, 31.0),
            // 55 - 31 = 24 > 17.5: new cluster
            quote("q4", "p1", "s1", 55.0, 55.0),
        ];
        assert_eq!(
            labels(&quotes),
            vec![
                ClusterPosition::First,
                ClusterPosition::Middle,
                ClusterPosition::Last,
                ClusterPosition::Solo,
            ]
        );
    }

    #[test]
    fn gap_measured_from_end_timecode_when_available() {
        // Start-to-start gap is 20s (> 17.5) but end-to-start gap is 5s
        let quotes = vec![
            quote("q1", "p1", "s1", 10.0, 25.0),
            quote("q2", "p1", "s1", 30.0, 35.0),
        ];
        assert_eq!(
            labels(&quotes),
            vec![ClusterPosition::First, ClusterPosition::Last]
        );
    }

    #[test]
    fn different_participant_never_clusters() {
        let quotes = vec![
            quote("q1", "p1", "s1", 10.0, 12.0),
            quote("q2", "p2", "s1", 13.0, 15.0),
        ];
        assert_eq!(
            labels(&quotes),
            vec![ClusterPosition::Solo, ClusterPosition::Solo]
        );
    }

    #[test]
    fn different_session_never_clusters() {
        let quotes = vec![
            quote("q1", "p1", "s1", 10.0, 12.0),
            quote("q2", "p1", "s2", 13.0, 15.0),
        ];
        assert_eq!(
            labels(&quotes),
            vec![ClusterPosition::Solo, ClusterPosition::Solo]
        );
    }

    #[test]
    fn zero_timecode_quotes_are_always_solo() {
        // Same participant/session, zero apparent gap, but both carry
        // the no-timecode sentinel.
        let quotes = vec![
            quote("q1", "p1", "s1", 0.0, 0.0),
            quote("q2", "p1", "s1", 0.0, 0.0),
        ];
        assert_eq!(
            labels(&quotes),
            vec![ClusterPosition::Solo, ClusterPosition::Solo]
        );

        // A sentinel on either side also breaks the run
        let quotes = vec![
            quote("q1", "p1", "s1", 10.0, 12.0),
            quote("q2", "p1", "s1", 0.0, 0.0),
            quote("q3", "p1", "s1", 13.0, 14.0),
        ];
        assert_eq!(
            labels(&quotes),
            vec![
                ClusterPosition::Solo,
                ClusterPosition::Solo,
                ClusterPosition::Solo,
            ]
        );
    }

    #[test]
    fn two_runs_back_to_back() {
        let quotes = vec![
            quote("q1", "p1", "s1", 10.0, 12.0),
            quote("q2", "p1", "s1", 15.0, 18.0),
            quote("q3", "p2", "s1", 20.0, 22.0),
            quote("q4", "p2", "s1", 25.0, 28.0),
        ];
        assert_eq!(
            labels(&quotes),
            vec![
                ClusterPosition::First,
                ClusterPosition::Last,
                ClusterPosition::First,
                ClusterPosition::Last,
            ]
        );
    }

    #[test]
    fn badge_shown_only_on_solo_and_first() {
        assert!(ClusterPosition::Solo.shows_speaker_badge());
        assert!(ClusterPosition::First.shows_speaker_badge());
        assert!(!ClusterPosition::Middle.shows_speaker_badge());
        assert!(!ClusterPosition::Last.shows_speaker_badge());
    }

    #[test]
    fn custom_gap_threshold_is_respected() {
        let quotes = vec![
            quote("q1", "p1", "s1", 10.0, 10.0),
            quote("q2", "p1", "s1", 19.0, 19.0),
        ];
        // 9-second gap fails a 5-second threshold
        assert_eq!(
            label_positions(&quotes, 5.0),
            vec![ClusterPosition::Solo, ClusterPosition::Solo]
        );
    }
}
