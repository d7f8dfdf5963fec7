//! `Accept` header parsing and representation selection.
//!
//! [`AcceptPreference`] holds the media ranges a client declared, in header
//! order. [`AcceptPreference::representation`] resolves them to either
//! [`Representation::Json`] or [`Representation::Html`]. HTML is the fallback
//! for every header that does not clearly prefer JSON, including an absent or
//! empty one.

use std::convert::Infallible;
use std::str::FromStr;

use axum::extract::FromRequestParts;
use axum::http::header::ACCEPT;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use mime::Mime;

/// Media type served on the JSON path.
pub const APPLICATION_JSON: &str = "application/json";

/// Media type served on the HTML path.
pub const TEXT_HTML: &str = "text/html";

/// The two representations a negotiated handler can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Representation {
    /// Render the named template with the mapping as variables.
    #[default]
    Html,
    /// Serialize the mapping as a JSON document.
    Json,
}

impl Representation {
    /// The `Content-Type` header value used for this representation.
    pub fn content_type(self) -> &'static str {
        match self {
            Representation::Html => "text/html; charset=utf-8",
            Representation::Json => APPLICATION_JSON,
        }
    }
}

/// One element of an `Accept` header, e.g. `application/json;q=0.9`.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRange {
    /// Main type, lowercased (`*` for wildcards).
    pub kind: String,
    /// Subtype, lowercased (`*` for wildcards).
    pub subtype: String,
    /// Quality weight in `[0, 1]`.
    pub quality: f32,
}

impl MediaRange {
    /// Parses a single comma-separated element. Returns `None` for malformed
    /// input so the caller can skip it.
    pub fn parse(element: &str) -> Option<Self> {
        let mime = Mime::from_str(element.trim()).ok()?;
        let kind = mime.type_().as_str().to_ascii_lowercase();
        let subtype = mime.subtype().as_str().to_ascii_lowercase();
        if kind == "*" && subtype != "*" {
            return None;
        }

        let quality = match mime
            .params()
            .find(|(name, _)| name.as_str().eq_ignore_ascii_case("q"))
        {
            Some((_, value)) => {
                let parsed: f32 = value.as_str().parse().ok()?;
                if !parsed.is_finite() {
                    return None;
                }
                parsed.clamp(0.0, 1.0)
            }
            None => 1.0,
        };

        Some(MediaRange {
            kind,
            subtype,
            quality,
        })
    }

    /// How specifically this range matches `media_type`, or `None` when it
    /// does not match. Exact matches score 2, `type/*` scores 1, `*/*` 0.
    fn specificity_for(&self, media_type: &str) -> Option<u8> {
        let (kind, subtype) = media_type.split_once('/')?;
        match (self.kind.as_str(), self.subtype.as_str()) {
            ("*", "*") => Some(0),
            (k, "*") if k == kind => Some(1),
            (k, s) if k == kind && s == subtype => Some(2),
            _ => None,
        }
    }
}

/// The weight a header assigns to one candidate media type.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Weight {
    quality: f32,
    specificity: u8,
    position: usize,
}

/// The ordered media ranges from a request's `Accept` header(s).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcceptPreference {
    ranges: Vec<MediaRange>,
}

impl AcceptPreference {
    /// Parses a raw header value. Malformed elements are dropped.
    pub fn parse(value: &str) -> Self {
        let ranges = split_elements(value)
            .into_iter()
            .filter_map(MediaRange::parse)
            .collect();
        AcceptPreference { ranges }
    }

    /// Reads every `Accept` header line in order. Values that are not visible
    /// ASCII are ignored.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let ranges = headers
            .get_all(ACCEPT)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(split_elements)
            .filter_map(MediaRange::parse)
            .collect();
        AcceptPreference { ranges }
    }

    /// The parsed media ranges, in header order.
    pub fn ranges(&self) -> &[MediaRange] {
        &self.ranges
    }

    /// True when no usable media range was supplied.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Picks the representation to serve.
    ///
    /// Each candidate is governed by its most specific matching range. JSON
    /// wins only with a non-zero weight that beats HTML on quality, then on
    /// specificity, then on header position. Every other case yields HTML.
    pub fn representation(&self) -> Representation {
        let Some(json) = self.weight_of(APPLICATION_JSON) else {
            return Representation::Html;
        };
        if json.quality <= 0.0 {
            return Representation::Html;
        }
        let Some(html) = self.weight_of(TEXT_HTML) else {
            return Representation::Json;
        };

        let json_wins = if json.quality != html.quality {
            json.quality > html.quality
        } else if json.specificity != html.specificity {
            json.specificity > html.specificity
        } else {
            json.position < html.position
        };

        if json_wins {
            Representation::Json
        } else {
            Representation::Html
        }
    }

    fn weight_of(&self, media_type: &str) -> Option<Weight> {
        let mut best: Option<Weight> = None;
        for (position, range) in self.ranges.iter().enumerate() {
            let Some(specificity) = range.specificity_for(media_type) else {
                continue;
            };
            if best.map_or(true, |b| specificity > b.specificity) {
                best = Some(Weight {
                    quality: range.quality,
                    specificity,
                    position,
                });
            }
        }
        best
    }
}

/// Splits a header value on commas that sit outside quoted strings.
fn split_elements(value: &str) -> Vec<&str> {
    let mut elements = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;
    for (i, c) in value.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ',' if !quoted => {
                elements.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    elements.push(&value[start..]);
    elements
}

/// Lets handlers take the preference as an extractor and call
/// [`crate::Negotiator::respond`] themselves.
impl<S> FromRequestParts<S> for AcceptPreference
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(AcceptPreference::from_headers(&parts.headers))
    }
}
