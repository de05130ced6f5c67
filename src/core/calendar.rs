//! Preventive maintenance calendar projection
//!
//! Weeks start on Sunday. The grid is read-only.

use chrono::{Datelike, Days, NaiveDate};
use clap::ValueEnum;

use crate::entities::{CalendarEvent, RequestStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventColor {
    Overdue,
    Repaired,
    Default,
}

impl EventColor {
    /// Overdue beats repaired
    pub fn for_event(event: &CalendarEvent) -> Self {
        if event.is_overdue {
            EventColor::Overdue
        } else if event.status == RequestStatus::Repaired {
            EventColor::Repaired
        } else {
            EventColor::Default
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            EventColor::Overdue => "#dc3545",
            EventColor::Repaired => "#28a745",
            EventColor::Default => "#007bff",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CalendarView {
    #[default]
    Month,
    Week,
    Day,
}

#[derive(Debug, Clone)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// False for padding days outside the displayed month
    pub in_range: bool,
    pub events: Vec<CalendarEvent>,
}

#[derive(Debug, Clone)]
pub struct CalendarGrid {
    pub view: CalendarView,
    pub anchor: NaiveDate,
    /// One row per week; a day view has a single one-day row
    pub weeks: Vec<Vec<CalendarDay>>,
}

fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_sunday() as u64;
    date - Days::new(offset)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn last_of_month(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    first
        .checked_add_months(chrono::Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(first)
}

/// Date window (inclusive) shown by `view` around `anchor`
pub fn visible_range(view: CalendarView, anchor: NaiveDate) -> (NaiveDate, NaiveDate) {
    match view {
        CalendarView::Day => (anchor, anchor),
        CalendarView::Week => {
            let start = week_start(anchor);
            (start, start + Days::new(6))
        }
        CalendarView::Month => {
            let start = week_start(first_of_month(anchor));
            let last = last_of_month(anchor);
            let end = week_start(last) + Days::new(6);
            (start, end)
        }
    }
}

impl CalendarGrid {
    pub fn project(events: &[CalendarEvent], view: CalendarView, anchor: NaiveDate) -> Self {
        let (start, end) = visible_range(view, anchor);
        let month = (anchor.year(), anchor.month());

        let mut weeks = Vec::new();
        let mut week = Vec::new();
        for date in start.iter_days().take_while(|d| *d <= end) {
            let in_range = match view {
                CalendarView::Month => (date.year(), date.month()) == month,
                _ => true,
            };
            let day_events = events.iter().filter(|e| e.start == date).cloned().collect();
            week.push(CalendarDay {
                date,
                in_range,
                events: day_events,
            });
            if week.len() == 7 {
                weeks.push(std::mem::take(&mut week));
            }
        }
        if !week.is_empty() {
            weeks.push(week);
        }

        Self { view, anchor, weeks }
    }

    pub fn visible_range(&self) -> (NaiveDate, NaiveDate) {
        visible_range(self.view, self.anchor)
    }

    pub fn days(&self) -> impl Iterator<Item = &CalendarDay> {
        self.weeks.iter().flatten()
    }

    pub fn event_count(&self) -> usize {
        self.days().map(|d| d.events.len()).sum()
    }
}
