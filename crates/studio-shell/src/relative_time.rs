use std::{collections::BTreeMap, sync::RwLock};

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitNames {
    pub singular: &'static str,
    pub plural: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativeTimeLocale {
    pub tag: &'static str,
    pub now: &'static str,
    pub past_template: &'static str,
    pub future_template: &'static str,
    /// Second, minute, hour, day, week, month, year.
    pub units: [UnitNames; 7],
}

pub fn english() -> RelativeTimeLocale {
    RelativeTimeLocale {
        tag: "en",
        now: "just now",
        past_template: "{} ago",
        future_template: "in {}",
        units: [
            UnitNames { singular: "second", plural: "seconds" },
            UnitNames { singular: "minute", plural: "minutes" },
            UnitNames { singular: "hour", plural: "hours" },
            UnitNames { singular: "day", plural: "days" },
            UnitNames { singular: "week", plural: "weeks" },
            UnitNames { singular: "month", plural: "months" },
            UnitNames { singular: "year", plural: "years" },
        ],
    }
}

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Picks the largest unit that fits; under 5 seconds reads as "now".
fn bucket(seconds: i64) -> Option<(usize, i64)> {
    if seconds < 5 {
        return None;
    }
    let (unit, size) = match seconds {
        s if s < MINUTE => (0, 1),
        s if s < HOUR => (1, MINUTE),
        s if s < DAY => (2, HOUR),
        s if s < WEEK => (3, DAY),
        s if s < MONTH => (4, WEEK),
        s if s < YEAR => (5, MONTH),
        _ => (6, YEAR),
    };
    Some((unit, seconds / size))
}

#[derive(Debug, Default)]
pub struct RelativeTimeLocales {
    locales: RwLock<BTreeMap<&'static str, RelativeTimeLocale>>,
}

impl RelativeTimeLocales {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_locale(&self, locale: RelativeTimeLocale) {
        if let Ok(mut locales) = self.locales.write() {
            locales.insert(locale.tag, locale);
        }
    }

    pub fn registered(&self) -> Vec<&'static str> {
        self.locales
            .read()
            .map(|locales| locales.keys().copied().collect())
            .unwrap_or_default()
    }

    /// `None` when `tag` has not been registered.
    pub fn format(&self, now: DateTime<Utc>, then: DateTime<Utc>, tag: &str) -> Option<String> {
        let locales = self.locales.read().ok()?;
        let locale = locales.get(tag)?;

        let delta = now.signed_duration_since(then).num_seconds();
        let Some((unit, count)) = bucket(delta.abs()) else {
            return Some(locale.now.to_string());
        };
        let names = locale.units[unit];
        let phrase = format!(
            "{count} {}",
            if count == 1 { names.singular } else { names.plural }
        );
        let template = if delta >= 0 {
            locale.past_template
        } else {
            locale.future_template
        };
        Some(template.replacen("{}", &phrase, 1))
    }
}
