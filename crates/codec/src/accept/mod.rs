//! `Accept` header parsing and server driven content negotiation.
//!
//! Negotiation picks, from a list of concrete mime types the server can produce, the one the
//! client prefers most:
//!
//! 1. every candidate is matched against all media ranges of the header; the most specific
//!    matching range (`type/subtype` over `type/*` over `*/*`) decides the candidate's quality,
//!    and among equally specific ranges the highest quality counts;
//! 2. candidates without a matching range, or whose deciding range has `q=0`, are never selected;
//! 3. the remaining candidates are ranked by quality, then by how specific their deciding range
//!    is, then by the position of that range in the header, and finally by candidate order.
//!
//! Media type parameters other than `q` are parsed but ignored, registry candidates carry none.
//!
//! Parsing is total: segments that are not media ranges are skipped, so a hostile or broken
//! header can only result in "no match".
//!
//! # Example
//!
//! ```
//! use micro_rest_codec::accept::AcceptHeader;
//!
//! let accept = AcceptHeader::parse("application/x-yaml;q=0.8, application/json");
//! let candidates = ["application/x-yaml", "application/json"];
//!
//! assert_eq!(accept.negotiate(candidates), Some("application/json"));
//! ```

mod media_range;

pub use media_range::MAX_QUALITY;
pub use media_range::MediaRange;
pub use media_range::Specificity;

use mime::Mime;
use std::cmp::{Ordering, Reverse};
use tracing::trace;

/// A parsed `Accept` header, ranges kept in header order.
#[derive(Debug, Clone, Default)]
pub struct AcceptHeader {
    ranges: Vec<MediaRange>,
}

/// The media range that decides how acceptable one candidate is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preference {
    pub quality: u16,
    pub specificity: Specificity,
    pub position: usize,
}

impl Preference {
    /// Ranking key, larger is better.
    fn rank(&self) -> (u16, Specificity, Reverse<usize>) {
        (self.quality, self.specificity, Reverse(self.position))
    }
}

impl AcceptHeader {
    pub fn parse(header: &str) -> Self {
        let ranges = header
            .split(',')
            .enumerate()
            .filter_map(|(position, segment)| MediaRange::parse(segment, position))
            .collect();

        Self { ranges }
    }

    pub fn ranges(&self) -> &[MediaRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// How acceptable `candidate` is, or `None` if no range covers it at all.
    pub fn preference(&self, candidate: &str) -> Option<Preference> {
        let candidate = candidate.parse::<Mime>().ok()?;

        self.ranges
            .iter()
            .filter(|range| range.matches(&candidate))
            .max_by(|a, b| a.precedence(b))
            .map(|range| Preference {
                quality: range.quality(),
                specificity: range.specificity(),
                position: range.position(),
            })
    }

    /// Picks the most acceptable of `candidates`; earlier candidates win remaining ties.
    pub fn negotiate<'a, I>(&self, candidates: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut best: Option<(&'a str, Preference)> = None;

        for candidate in candidates {
            let Some(preference) = self.preference(candidate) else {
                continue;
            };
            if preference.quality == 0 {
                trace!(candidate, "candidate explicitly not acceptable");
                continue;
            }

            let replace = match &best {
                None => true,
                Some((_, current)) => preference.rank().cmp(&current.rank()) == Ordering::Greater,
            };
            if replace {
                best = Some((candidate, preference));
            }
        }

        best.map(|(candidate, _)| candidate)
    }
}

/// Shorthand for [`AcceptHeader::parse`] followed by [`AcceptHeader::negotiate`].
pub fn negotiate<'a, I>(header: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    AcceptHeader::parse(header).negotiate(candidates)
}
