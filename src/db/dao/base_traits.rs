use chrono::{SubsecRound, TimeDelta, Utc};
use sea_orm::entity::prelude::DateTimeWithTimeZone;

/// Active models that carry `created_at` / `updated_at` columns.
pub trait TimestampedActiveModel {
    fn set_created_at(&mut self, ts: DateTimeWithTimeZone);
    fn set_updated_at(&mut self, ts: DateTimeWithTimeZone);
    fn updated_at(&self) -> Option<DateTimeWithTimeZone>;
}

/// Current UTC time at the precision every supported store keeps.
pub fn now() -> DateTimeWithTimeZone {
    Utc::now().trunc_subsecs(6).fixed_offset()
}

/// `updated_at` for a write happening at `now`. Never returns a value at or
/// before `previous`, so two writes inside one clock tick still order.
pub fn next_updated_at(
    previous: Option<DateTimeWithTimeZone>,
    now: DateTimeWithTimeZone,
) -> DateTimeWithTimeZone {
    match previous {
        Some(previous) if now <= previous => previous + TimeDelta::microseconds(1),
        _ => now,
    }
}

/// Stamps a row about to be inserted: both columns get the same instant.
pub fn stamp_created<A: TimestampedActiveModel>(active: &mut A) -> DateTimeWithTimeZone {
    let ts = now();
    active.set_created_at(ts);
    active.set_updated_at(ts);
    ts
}

/// Stamps a row about to be written back. `created_at` is left alone.
pub fn stamp_updated<A: TimestampedActiveModel>(active: &mut A) -> DateTimeWithTimeZone {
    let ts = next_updated_at(active.updated_at(), now());
    active.set_updated_at(ts);
    ts
}
