//! Walks a series in position order, one occurrence start at a time.
//!
//! The cursor knows nothing about windows or exceptions. It applies the series'
//! own bounds: `until` stops before a later start, `occurrence_count` stops
//! after the last counted position.

use almanac_core::types::WeekStart;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};

use super::calendar;
use crate::spec::{RecurrenceSpec, RecurrenceType};
use crate::weekday;

/// Start of one occurrence and its series position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub position: u32,
    pub start: DateTime<Utc>,
}

/// Per-type stepping rule.
#[derive(Debug, Clone, Copy)]
enum Pattern {
    Daily,
    Weekly { mask: u8, week_start: WeekStart },
    /// Month-stepped rules; `step` is in months (12 × interval for yearly).
    MonthDay { base: i64, step: i64, day: u8 },
    NthWeekday { base: i64, step: i64, mask: u8, nth: u8 },
}

impl Pattern {
    /// Returns `None` when the spec lacks a field its type needs.
    fn from_spec(spec: &RecurrenceSpec, week_start: WeekStart) -> Option<Self> {
        let interval = i64::from(spec.interval);
        let anchor_month = calendar::month_index(spec.recurring_start.date_naive());

        let (base, step) = match spec.recurrence_type {
            RecurrenceType::None => return None,
            RecurrenceType::Daily => return Some(Self::Daily),
            RecurrenceType::Weekly => {
                let mask = spec.weekday_mask.filter(|m| weekday::is_valid(*m))?;
                return Some(Self::Weekly { mask, week_start });
            }
            RecurrenceType::Monthly => (anchor_month, interval),
            RecurrenceType::Yearly => {
                let month = i64::from(spec.month?);
                let year = i64::from(spec.recurring_start.year());
                (year * 12 + month - 1, interval * 12)
            }
        };

        let day = spec.day_in_month?;
        Some(match spec.weekday_mask {
            Some(mask) if weekday::is_valid(mask) => Self::NthWeekday {
                base,
                step,
                mask,
                nth: day,
            },
            Some(_) => return None,
            None => Self::MonthDay { base, step, day },
        })
    }
}

/// Iterator over the candidates of one series.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    spec: &'a RecurrenceSpec,
    pattern: Pattern,
    anchor: NaiveDateTime,
    /// Next period to look at: day step, week block or month step.
    period: i64,
    /// Day within the current week block (weekly only).
    slot: i64,
    /// Position of the last yielded candidate.
    position: u32,
    done: bool,
}

impl<'a> Cursor<'a> {
    /// ## Summary
    /// Creates a cursor at the beginning of a series.
    ///
    /// Returns `None` for non-recurring specs, a zero interval, or a spec missing
    /// a field its type requires.
    #[must_use]
    pub fn new(spec: &'a RecurrenceSpec, week_start: WeekStart) -> Option<Self> {
        if spec.interval == 0 {
            return None;
        }
        Some(Self {
            spec,
            pattern: Pattern::from_spec(spec, week_start)?,
            anchor: spec.recurring_start.naive_utc(),
            period: 0,
            slot: 0,
            position: 0,
            done: false,
        })
    }

    fn anchor_date(&self) -> NaiveDate {
        self.anchor.date()
    }

    fn anchor_time(&self) -> NaiveTime {
        self.anchor.time()
    }

    /// ## Summary
    /// Jumps ahead so the next candidates start shortly before `target`.
    ///
    /// Only daily and weekly series jump, since their positions can be counted
    /// without walking; month-stepped series are cheap enough to walk. Never
    /// skips past an occurrence starting at or after `target`, and does nothing
    /// once iteration has begun.
    pub fn skip_toward(&mut self, target: DateTime<Utc>) {
        if self.position != 0 || target <= self.spec.recurring_start {
            return;
        }
        let interval = i64::from(self.spec.interval);
        let anchor_date = self.anchor_date();
        let days = target
            .date_naive()
            .signed_duration_since(anchor_date)
            .num_days();

        match self.pattern {
            Pattern::Daily => {
                let periods = days / interval - 1;
                if let Ok(position) = u32::try_from(periods)
                    && periods > 0
                {
                    self.period = periods;
                    self.position = position;
                }
            }
            Pattern::Weekly { mask, week_start } => {
                let week0 = calendar::week_begin(anchor_date, week_start);
                let blocks = target
                    .date_naive()
                    .signed_duration_since(week0)
                    .num_days()
                    / (7 * interval);
                let skip = blocks - 1;
                if skip >= 1 {
                    self.jump_to_block(skip, mask, week_start);
                }
            }
            Pattern::MonthDay { .. } | Pattern::NthWeekday { .. } => {}
        }
    }

    /// ## Summary
    /// Jumps ahead so the next candidate is at or shortly before `position`.
    ///
    /// Daily and weekly positions are counted directly; other series and
    /// cursors that have already yielded are left alone.
    pub fn skip_to_position(&mut self, position: u32) {
        if self.position != 0 || position <= 1 {
            return;
        }
        match self.pattern {
            Pattern::Daily => {
                self.period = i64::from(position - 1);
                self.position = position - 1;
            }
            Pattern::Weekly { mask, week_start } => {
                let (first_block, per_block) = self.block_sizes(mask, week_start);
                let target = i64::from(position);
                if per_block > 0 && target > first_block {
                    let block = (target - first_block - 1) / per_block + 1;
                    self.jump_to_block(block, mask, week_start);
                }
            }
            Pattern::MonthDay { .. } | Pattern::NthWeekday { .. } => {}
        }
    }

    /// Matching days in the anchor's own block and in every later block.
    fn block_sizes(&self, mask: u8, week_start: WeekStart) -> (i64, i64) {
        let anchor_date = self.anchor_date();
        let week0 = calendar::week_begin(anchor_date, week_start);
        let first_block = (0..7)
            .map(|offset| week0 + TimeDelta::days(offset))
            .filter(|day| *day >= anchor_date && weekday::contains(mask, day.weekday()))
            .count();
        let per_block = weekday::days(mask).len();
        (
            i64::try_from(first_block).unwrap_or(0),
            i64::try_from(per_block).unwrap_or(0),
        )
    }

    /// Moves a weekly cursor to the start of week block `block` (at least 1),
    /// counting the positions of every block before it.
    fn jump_to_block(&mut self, block: i64, mask: u8, week_start: WeekStart) {
        let (first_block, per_block) = self.block_sizes(mask, week_start);
        let consumed = per_block
            .checked_mul(block - 1)
            .and_then(|rest| first_block.checked_add(rest))
            .and_then(|total| u32::try_from(total).ok());
        if let Some(position) = consumed {
            self.period = block;
            self.slot = 0;
            self.position = position;
        }
    }

    fn next_start(&mut self) -> Option<NaiveDateTime> {
        let interval = i64::from(self.spec.interval);
        match self.pattern {
            Pattern::Daily => {
                let offset = self.period.checked_mul(interval)?;
                self.period += 1;
                self.anchor.checked_add_signed(TimeDelta::try_days(offset)?)
            }
            Pattern::Weekly { mask, week_start } => {
                let anchor_date = self.anchor_date();
                let week0 = calendar::week_begin(anchor_date, week_start);
                loop {
                    let block_offset = self.period.checked_mul(7 * interval)?;
                    while self.slot < 7 {
                        let day = week0.checked_add_signed(TimeDelta::try_days(
                            block_offset.checked_add(self.slot)?,
                        )?)?;
                        self.slot += 1;
                        if day >= anchor_date && weekday::contains(mask, day.weekday()) {
                            return Some(day.and_time(self.anchor_time()));
                        }
                    }
                    self.slot = 0;
                    self.period += 1;
                }
            }
            Pattern::MonthDay { base, step, day } => loop {
                let (year, month) = self.next_month(base, step)?;
                let start = calendar::clamped_day(year, month, day)?.and_time(self.anchor_time());
                if start >= self.anchor {
                    return Some(start);
                }
            },
            Pattern::NthWeekday {
                base,
                step,
                mask,
                nth,
            } => loop {
                let (year, month) = self.next_month(base, step)?;
                let start = calendar::nth_matching_day(year, month, mask, nth)?
                    .and_time(self.anchor_time());
                if start >= self.anchor {
                    return Some(start);
                }
            },
        }
    }

    fn next_month(&mut self, base: i64, step: i64) -> Option<(i32, u32)> {
        let index = base.checked_add(self.period.checked_mul(step)?)?;
        self.period += 1;
        calendar::year_month(index)
    }
}

impl Iterator for Cursor<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        if self.done {
            return None;
        }

        let Some(start) = self.next_start().map(|naive| naive.and_utc()) else {
            self.done = true;
            return None;
        };
        if self.spec.until.is_some_and(|until| start > until) {
            self.done = true;
            return None;
        }
        let Some(position) = self.position.checked_add(1) else {
            self.done = true;
            return None;
        };
        if self.spec.occurrence_count.is_some_and(|count| position > count) {
            self.done = true;
            return None;
        }

        self.position = position;
        Some(Candidate { position, start })
    }
}
