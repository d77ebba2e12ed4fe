use mime::Mime;
use std::cmp::Ordering;

/// Quality values are kept in thousandths, the precision RFC 9110 allows for `q`.
pub const MAX_QUALITY: u16 = 1000;

/// How closely a [`MediaRange`] describes a concrete mime type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Specificity {
    /// `*/*`
    Any,
    /// `type/*`
    Type,
    /// `type/subtype`
    Exact,
}

/// One entry of an `Accept` header, e.g. `application/xml;q=0.9`.
#[derive(Debug, Clone)]
pub struct MediaRange {
    mime: Mime,
    quality: u16,
    position: usize,
}

impl MediaRange {
    /// Parses one comma separated segment. Returns `None` for segments that are not a media range.
    ///
    /// A missing or unparseable `q` parameter means full quality.
    pub fn parse(segment: &str, position: usize) -> Option<Self> {
        let segment = normalize(segment);
        // some clients send a bare `*`
        let segment = if segment == "*" { "*/*" } else { segment.as_str() };

        let mime = segment.parse::<Mime>().ok()?;
        if mime.type_() == mime::STAR && mime.subtype() != mime::STAR {
            return None;
        }

        let quality = mime.get_param("q").map_or(MAX_QUALITY, |q| parse_quality(q.as_str()));
        Some(Self { mime, quality, position })
    }

    /// The range as written, without parameters.
    pub fn essence(&self) -> &str {
        self.mime.essence_str()
    }

    /// Quality in thousandths, `0..=1000`.
    pub fn quality(&self) -> u16 {
        self.quality
    }

    /// Zero based position of this range in its header.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn specificity(&self) -> Specificity {
        if self.mime.type_() == mime::STAR {
            Specificity::Any
        } else if self.mime.subtype() == mime::STAR {
            Specificity::Type
        } else {
            Specificity::Exact
        }
    }

    /// Checks whether this range covers `candidate`, a `type/subtype` without wildcards.
    pub fn matches(&self, candidate: &Mime) -> bool {
        match self.specificity() {
            Specificity::Any => true,
            Specificity::Type => self.mime.type_() == candidate.type_(),
            Specificity::Exact => {
                self.mime.type_() == candidate.type_() && self.mime.subtype() == candidate.subtype()
            }
        }
    }

    /// Orders two ranges that both match the same candidate: the more specific range decides the
    /// candidate's quality, and among equally specific ranges the higher quality wins. Media type
    /// parameters other than `q` do not count, candidates never carry any.
    pub(crate) fn precedence(&self, other: &Self) -> Ordering {
        self.specificity()
            .cmp(&other.specificity())
            .then_with(|| self.quality.cmp(&other.quality))
            .then_with(|| other.position.cmp(&self.position))
    }
}

/// Drops the optional whitespace RFC 9110 allows around `;` and `=`, and parameters without a
/// value. A valueless `q` thus falls back to full quality.
fn normalize(segment: &str) -> String {
    let mut parts = segment.split(';').map(str::trim);
    let mut normalized = parts.next().unwrap_or_default().to_string();

    for param in parts {
        if let Some((name, value)) = param.split_once('=') {
            let (name, value) = (name.trim(), value.trim());
            if !name.is_empty() && !value.is_empty() {
                normalized.push(';');
                normalized.push_str(name);
                normalized.push('=');
                normalized.push_str(value);
            }
        }
    }

    normalized
}

fn parse_quality(raw: &str) -> u16 {
    match raw.trim().parse::<f32>() {
        Ok(q) if q.is_finite() => {
            let clamped = q.clamp(0.0, 1.0);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "value is clamped to 0..=1000")]
            let thousandths = (clamped * f32::from(MAX_QUALITY)).round() as u16;
            thousandths
        }
        _ => MAX_QUALITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(s: &str) -> MediaRange {
        MediaRange::parse(s, 0).unwrap()
    }

    #[test]
    fn parse_quality_values() {
        assert_eq!(range("application/json").quality(), 1000);
        assert_eq!(range("application/json;q=0.8").quality(), 800);
        assert_eq!(range("application/json; q=0").quality(), 0);
        assert_eq!(range("application/json;q=0.125").quality(), 125);
    }

    #[test]
    fn unparseable_quality_is_full_quality() {
        assert_eq!(range("application/json;q=abc").quality(), 1000);
        assert_eq!(range("application/json;q=NaN").quality(), 1000);
    }

    #[test]
    fn whitespace_around_parameters() {
        let range = range("application/json ; q=0.5");

        assert_eq!(range.essence(), "application/json");
        assert_eq!(range.quality(), 500);
        assert_eq!(MediaRange::parse(" text/html ;level = 1 ;  q = 0.2 ", 0).unwrap().quality(), 200);
    }

    #[test]
    fn quality_without_value_is_full_quality() {
        assert_eq!(range("application/json;q").quality(), 1000);
        assert_eq!(range("application/json;q=").quality(), 1000);
        assert_eq!(range("application/json; ;q=0.3").quality(), 300);
    }

    #[test]
    fn out_of_range_quality_is_clamped() {
        assert_eq!(range("application/json;q=7").quality(), 1000);
        assert_eq!(range("application/json;q=-1").quality(), 0);
    }

    #[test]
    fn specificity() {
        assert_eq!(range("*/*").specificity(), Specificity::Any);
        assert_eq!(range("*").specificity(), Specificity::Any);
        assert_eq!(range("application/*").specificity(), Specificity::Type);
        assert_eq!(range("application/json").specificity(), Specificity::Exact);
    }

    #[test]
    fn malformed_segments_are_rejected() {
        assert!(MediaRange::parse("", 0).is_none());
        assert!(MediaRange::parse("json", 0).is_none());
        assert!(MediaRange::parse("*/json", 0).is_none());
    }

    #[test]
    fn matches() {
        let json: Mime = "application/json".parse().unwrap();
        let html: Mime = "text/html".parse().unwrap();

        assert!(range("*/*").matches(&json));
        assert!(range("application/*").matches(&json));
        assert!(!range("text/*").matches(&json));
        assert!(range("application/json").matches(&json));
        assert!(range("APPLICATION/JSON").matches(&json));
        assert!(!range("application/json").matches(&html));
    }

    #[test]
    fn precedence_prefers_specific_ranges() {
        let exact = MediaRange::parse("application/json;q=0", 0).unwrap();
        let any = MediaRange::parse("*/*", 1).unwrap();

        assert_eq!(exact.precedence(&any), Ordering::Greater);
    }

    #[test]
    fn precedence_ignores_extension_params() {
        let with_level = MediaRange::parse("application/json;level=1;q=0.3", 0).unwrap();
        let plain = MediaRange::parse("application/json;q=0.9", 1).unwrap();

        assert_eq!(with_level.precedence(&plain), Ordering::Less);
    }

    #[test]
    fn precedence_prefers_higher_quality_when_equally_specific() {
        let low = MediaRange::parse("application/json;q=0.5", 0).unwrap();
        let high = MediaRange::parse("application/json;q=0.9", 1).unwrap();

        assert_eq!(low.precedence(&high), Ordering::Less);
    }
}
