//! Item transformation
//!
//! Derives the computed fields of a [`DataItemOut`] from a validated
//! [`DataItemIn`]. The only impure input is the current time, which is
//! read through a [`Clock`] so tests can pin it.

use chrono::{DateTime, Utc};
use ingestor_common::{
    datetime::{format_iso8601, now_utc},
    types::{DataItemIn, DataItemOut},
};
use regex::Regex;
use std::sync::LazyLock;

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]+").unwrap());

/// Source of "now" for the transform.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current UTC instant, at microsecond precision
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock used in production
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        now_utc()
    }
}

/// Lowercase `name`, collapse every run of non-alphanumerics to one hyphen,
/// and strip hyphens from both ends.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    NON_ALPHANUMERIC
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Transform one item against the system clock.
pub fn transform_item(item: DataItemIn) -> DataItemOut {
    transform_item_with(item, &SystemClock)
}

/// Transform one item against `clock`.
///
/// A missing `timestamp` defaults to `clock.now()`, sampled before
/// `received_at` and independently of it.
pub fn transform_item_with(item: DataItemIn, clock: &dyn Clock) -> DataItemOut {
    let timestamp = item.timestamp.unwrap_or_else(|| clock.now());
    let received_at = clock.now();

    DataItemOut {
        slug: slugify(&item.name),
        name_upper: item.name.to_uppercase(),
        value_times_two: item.value * 2.0,
        sk: format_iso8601(&received_at),
        received_at,
        timestamp: Some(timestamp),
        id: item.id,
        name: item.name,
        value: item.value,
        metadata: item.metadata,
    }
}
