//! The three join predicates behind a common trait.

use super::MatchType;
use crate::record::Record;

/// One join rule between a reference record and a source record.
///
/// `group_label` and `source_label` return `None` when the field they read
/// is absent; such records never take part in the strategy.
pub trait MatchStrategy: Send + Sync {
    /// Which strategy this is.
    fn match_type(&self) -> MatchType;

    /// Join predicate.
    fn matches(&self, reference: &Record, source: &Record) -> bool;

    /// Reference-side label that (with the reference metrics) keys a group.
    fn group_label<'a>(&self, reference: &'a Record) -> Option<&'a str>;

    /// Source-side label reported as the group's representative.
    fn source_label<'a>(&self, source: &'a Record) -> Option<&'a str>;
}

/// Exact, case-sensitive identifier equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdMatch;

/// Reference identifier contained anywhere in the source display name.
///
/// Not token aware: a short identifier can match inside an unrelated longer
/// name.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdInNameMatch;

/// Source display name begins with the reference display name.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixNameMatch;

impl MatchStrategy for IdMatch {
    fn match_type(&self) -> MatchType {
        MatchType::IdMatch
    }

    fn matches(&self, reference: &Record, source: &Record) -> bool {
        match (&reference.identifier, &source.identifier) {
            (Some(r), Some(s)) => r == s,
            _ => false,
        }
    }

    fn group_label<'a>(&self, reference: &'a Record) -> Option<&'a str> {
        reference.identifier.as_deref()
    }

    fn source_label<'a>(&self, source: &'a Record) -> Option<&'a str> {
        source.identifier.as_deref()
    }
}

impl MatchStrategy for IdInNameMatch {
    fn match_type(&self) -> MatchType {
        MatchType::IdInNameMatch
    }

    fn matches(&self, reference: &Record, source: &Record) -> bool {
        match (&reference.identifier, &source.display_name) {
            (Some(id), Some(name)) => name.contains(id.as_str()),
            _ => false,
        }
    }

    fn group_label<'a>(&self, reference: &'a Record) -> Option<&'a str> {
        reference.identifier.as_deref()
    }

    fn source_label<'a>(&self, source: &'a Record) -> Option<&'a str> {
        source.display_name.as_deref()
    }
}

impl MatchStrategy for PrefixNameMatch {
    fn match_type(&self) -> MatchType {
        MatchType::PrefixNameMatch
    }

    // Byte prefix equality on valid UTF-8 is the same as comparing the first
    // `len(reference name)` characters.
    fn matches(&self, reference: &Record, source: &Record) -> bool {
        match (&reference.display_name, &source.display_name) {
            (Some(r), Some(s)) => s.starts_with(r.as_str()),
            _ => false,
        }
    }

    fn group_label<'a>(&self, reference: &'a Record) -> Option<&'a str> {
        reference.display_name.as_deref()
    }

    fn source_label<'a>(&self, source: &'a Record) -> Option<&'a str> {
        source.display_name.as_deref()
    }
}

static ID_MATCH: IdMatch = IdMatch;
static ID_IN_NAME_MATCH: IdInNameMatch = IdInNameMatch;
static PREFIX_NAME_MATCH: PrefixNameMatch = PrefixNameMatch;

/// The strategy implementation for a [`MatchType`].
pub fn strategy_for(match_type: MatchType) -> &'static dyn MatchStrategy {
    match match_type {
        MatchType::IdMatch => &ID_MATCH,
        MatchType::IdInNameMatch => &ID_IN_NAME_MATCH,
        MatchType::PrefixNameMatch => &PREFIX_NAME_MATCH,
    }
}
