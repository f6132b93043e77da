//! Base quote records as fetched from the document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a quote
///
/// Serializes as a plain string (the DOM id assigned by the document,
/// e.g. "quote-7f3a"). Uniqueness is guaranteed by the document for the
/// lifetime of the store; re-registering an existing id overwrites the
/// base record (last write wins).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(String);

impl QuoteId {
    /// Create a QuoteId from a string
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QuoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for QuoteId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for QuoteId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A codebook tag applied to a quote
///
/// Colour metadata is display-only and travels with the tag so surfaces
/// can render it without a codebook lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name as shown in the codebook
    pub name: String,
    /// Codebook group the tag belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Colour palette identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colour_set: Option<String>,
    /// Index into the colour palette
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colour_index: Option<u32>,
}

impl Tag {
    /// Create a tag with a name and no colour metadata
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group_id: None,
            colour_set: None,
            colour_index: None,
        }
    }

    /// Set the codebook group
    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    /// Set the colour palette and index
    pub fn with_colour(mut self, colour_set: impl Into<String>, colour_index: u32) -> Self {
        self.colour_set = Some(colour_set.into());
        self.colour_index = Some(colour_index);
        self
    }
}

/// A pending tag suggestion awaiting accept/deny
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagProposal {
    /// Server-assigned proposal id
    pub id: String,
    /// Suggested tag name
    pub name: String,
    /// Codebook group the tag would inherit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Colour palette the tag would inherit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colour_set: Option<String>,
    /// Colour index the tag would inherit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colour_index: Option<u32>,
}

impl TagProposal {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            group_id: None,
            colour_set: None,
            colour_index: None,
        }
    }

    /// Materialize this proposal as a tag, inheriting group/colour metadata.
    pub fn into_tag(self, name: impl Into<String>) -> Tag {
        Tag {
            name: name.into(),
            group_id: self.group_id,
            colour_set: self.colour_set,
            colour_index: self.colour_index,
        }
    }
}

/// Server-seeded initial overlay values
///
/// These are the persisted star/hidden/edit/badge values the server
/// returns with each quote; the overlay is initialized from them at
/// insertion time. Tags seed from the record's `original_tags`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlaySeed {
    #[serde(default)]
    pub starred: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deleted_badges: Vec<String>,
}

/// An immutable base quote record, set once per fetch
///
/// A `start_timecode` of `0.0` is a sentinel meaning "no reliable
/// timecode"; such quotes never participate in sequence clustering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// Globally unique key
    pub dom_id: QuoteId,
    /// Speaker identifier
    pub participant_id: String,
    /// Recording session identifier
    pub session_id: String,
    /// Original quote text
    pub text: String,
    /// Start of the quoted span, in seconds (0.0 = no timecode)
    #[serde(default)]
    pub start_timecode: f64,
    /// End of the quoted span, in seconds (0.0 = unavailable)
    #[serde(default)]
    pub end_timecode: f64,
    /// Upstream sentiment classification, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
    /// Tags as originally fetched (never mutated)
    #[serde(default)]
    pub original_tags: Vec<Tag>,
    /// Pending tag suggestions
    #[serde(default)]
    pub proposed_tags: Vec<TagProposal>,
    /// Server-persisted overlay values used to seed the overlay
    #[serde(default)]
    pub seed: OverlaySeed,
    /// When this record was fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
}

impl QuoteRecord {
    /// Create a record with the required identity fields
    pub fn new(
        dom_id: impl Into<QuoteId>,
        participant_id: impl Into<String>,
        session_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            dom_id: dom_id.into(),
            participant_id: participant_id.into(),
            session_id: session_id.into(),
            text: text.into(),
            start_timecode: 0.0,
            end_timecode: 0.0,
            sentiment: None,
            original_tags: Vec::new(),
            proposed_tags: Vec::new(),
            seed: OverlaySeed::default(),
            fetched_at: Some(Utc::now()),
        }
    }

    /// Set start/end timecodes (seconds)
    pub fn with_timecodes(mut self, start: f64, end: f64) -> Self {
        self.start_timecode = start;
        self.end_timecode = end;
        self
    }

    /// Set the sentiment badge
    pub fn with_sentiment(mut self, sentiment: impl Into<String>) -> Self {
        self.sentiment = Some(sentiment.into());
        self
    }

    /// Add an original tag
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.original_tags.push(tag);
        self
    }

    /// Add a pending tag proposal
    pub fn with_proposal(mut self, proposal: TagProposal) -> Self {
        self.proposed_tags.push(proposal);
        self
    }

    /// Set the server-seeded overlay values
    pub fn with_seed(mut self, seed: OverlaySeed) -> Self {
        self.seed = seed;
        self
    }

    /// True when this quote carries no reliable time reference.
    pub fn has_no_timecode(&self) -> bool {
        self.start_timecode == 0.0
    }
}
