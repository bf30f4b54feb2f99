//! Relative time offsets such as `2d3h25m` or `+1h40m`.
//!
//! An offset is a sum of `<integer><unit>` components, with units `d`, `h`
//! and `m`, written in any order without separators. Without a sign the
//! offset points into the past; a leading `+` points into the future.
//!
//! Parsing is permissive: characters that are not part of a component are
//! skipped, and a token without any component is a zero offset.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;

/// Pre-compiled regex for a single `<integer><unit>` component.
static COMPONENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]+)([dhm])").unwrap());

/// Pre-compiled regex for a token made only of offset components.
static OFFSET_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?(?:[0-9]+[dhm])+$").unwrap());

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Which side of "now" an offset lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `now - delta`.
    Past,
    /// `now + delta`.
    Future,
}

/// A signed duration relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    pub direction: Direction,
    pub delta: Duration,
}

impl Offset {
    /// Parses an offset token. Never fails; see the module docs.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        let direction = if token.starts_with('+') {
            Direction::Future
        } else {
            Direction::Past
        };

        let mut seconds: i64 = 0;
        for caps in COMPONENT_RE.captures_iter(token) {
            let unit = match &caps[2] {
                "d" => SECONDS_PER_DAY,
                "h" => SECONDS_PER_HOUR,
                _ => SECONDS_PER_MINUTE,
            };
            let component = caps[1]
                .parse::<i64>()
                .ok()
                .and_then(|n| n.checked_mul(unit));
            match component.and_then(|c| seconds.checked_add(c)) {
                Some(total) => seconds = total,
                None => tracing::warn!(component = &caps[0], "ignoring oversized offset component"),
            }
        }

        let delta = Duration::try_seconds(seconds).unwrap_or_else(|| {
            tracing::warn!(token, "offset out of range, using zero");
            Duration::zero()
        });

        Self { direction, delta }
    }

    /// Resolves the offset against `now`.
    ///
    /// Results outside the representable time range fall back to `now`.
    pub fn resolve(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let resolved = match self.direction {
            Direction::Past => now.checked_sub_signed(self.delta),
            Direction::Future => now.checked_add_signed(self.delta),
        };
        resolved.unwrap_or(now)
    }
}

/// Resolves an optional offset token against `now`; `None` resolves to `now`.
pub fn resolve_offset(token: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    token.map_or(now, |token| Offset::parse(token).resolve(now))
}

/// Returns `true` if the whole token is written as an offset.
///
/// Used to tell an offset argument apart from the first word of a message.
pub fn looks_like_offset(token: &str) -> bool {
    OFFSET_TOKEN_RE.is_match(token)
}
