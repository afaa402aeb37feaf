//! Local calendar and wall clock.
//!
//! All day-level comparisons go through a [`Calendar`], which fixes both the
//! time zone used to turn instants into calendar days and the "now" against
//! which past dates and overdue deadlines are judged.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};

/// A time zone paired with a fixed current instant.
#[derive(Debug, Clone)]
pub struct Calendar<Tz: TimeZone> {
    tz: Tz,
    now: DateTime<Tz>,
}

impl Calendar<Local> {
    /// Calendar in the system time zone at the current wall-clock time.
    pub fn local() -> Self {
        Self::new(Local, Utc::now())
    }
}

impl<Tz: TimeZone> Calendar<Tz> {
    /// Create a calendar in `tz` where the current instant is `now`.
    pub fn new(tz: Tz, now: DateTime<Utc>) -> Self {
        let now = now.with_timezone(&tz);
        Self { tz, now }
    }

    /// The current instant.
    pub fn now(&self) -> DateTime<Utc> {
        self.now.with_timezone(&Utc)
    }

    /// Today's date in this calendar's time zone.
    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    /// The local calendar day an instant falls on.
    pub fn local_day(&self, instant: &DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    /// True for days strictly before today; today itself is not past.
    pub fn is_past(&self, day: NaiveDate) -> bool {
        day < self.today()
    }

    /// Whole days from today until the local day of `instant`.
    ///
    /// Returns `None` when that day is already behind us; today yields
    /// `Some(0)`.
    pub fn days_until(&self, instant: &DateTime<Utc>) -> Option<i64> {
        let days = (self.local_day(instant) - self.today()).num_days();
        (days >= 0).then_some(days)
    }

    /// The instant at wall-clock `time` on `day` in this calendar's zone.
    ///
    /// An ambiguous local time resolves to its earlier instant; a time
    /// skipped by a DST jump yields `None`.
    pub fn instant_at(&self, day: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
        self.tz
            .from_local_datetime(&day.and_time(time))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    }
}
