//! Shared fixtures for integration tests

use quoteboard::{MemorySink, OverlaySeed, QuoteRecord, QuoteboardApi, Tag, TagProposal};
use std::sync::Arc;

/// A timecoded quote from one participant in one session.
pub fn timed_quote(
    id: &str,
    participant: &str,
    session: &str,
    text: &str,
    start: f64,
    end: f64,
) -> QuoteRecord {
    QuoteRecord::new(id, participant, session, text).with_timecodes(start, end)
}

/// A small interview corpus: two participants, one session, a mix of
/// tags, timecodes, a seeded star, and a pending proposal.
pub fn interview_corpus() -> Vec<QuoteRecord> {
    vec![
        timed_quote(
            "q1",
            "alice",
            "s1",
            "The onboarding was really smooth",
            10.0,
            14.0,
        )
        .with_tag(Tag::new("UX").with_colour("warm", 0)),
        timed_quote("q2", "alice", "s1", "I got lost in the settings", 19.0, 24.0)
            .with_tag(Tag::new("UX"))
            .with_tag(Tag::new("Navigation")),
        timed_quote("q3", "alice", "s1", "Then it clicked for me", 31.0, 33.0),
        timed_quote("q4", "alice", "s1", "Pricing felt steep", 55.0, 58.0)
            .with_tag(Tag::new("Pricing"))
            .with_sentiment("negative"),
        timed_quote("q5", "bob", "s1", "Smooth is not the word I would use", 60.0, 64.0)
            .with_seed(OverlaySeed {
                starred: true,
                ..Default::default()
            })
            .with_proposal(TagProposal::new("prop-1", "UX")),
    ]
}

/// An API over a MemorySink, populated with the interview corpus.
pub fn corpus_api() -> (QuoteboardApi, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let api = QuoteboardApi::new(sink.clone());
    api.init_from_quotes(interview_corpus(), false);
    (api, sink)
}

/// Let detached persistence tasks run to completion.
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}
