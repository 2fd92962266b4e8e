use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use shared_utils::Month;

use crate::models::{MyShift, ScheduleDay};

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const CELL_WIDTH: usize = 18;

/// What a calendar cell knows about its day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayInfo {
    pub assigned: bool,
    pub member_id: Option<String>,
    pub member_name: Option<String>,
    pub center_name: Option<String>,
    pub busy: bool,
}

impl DayInfo {
    pub fn busy() -> Self {
        Self { busy: true, ..Self::default() }
    }
}

impl From<&ScheduleDay> for DayInfo {
    fn from(day: &ScheduleDay) -> Self {
        match day.assignee() {
            Some(member_id) => Self {
                assigned: true,
                member_id: Some(member_id.to_string()),
                member_name: day.medic_name(),
                ..Self::default()
            },
            None => Self::default(),
        }
    }
}

impl From<&MyShift> for DayInfo {
    fn from(shift: &MyShift) -> Self {
        Self {
            assigned: true,
            center_name: shift.center_name.clone().or_else(|| Some(shift.center_id.clone())),
            ..Self::default()
        }
    }
}

/// Keys a center's month by date.
pub fn center_day_map(days: &[ScheduleDay]) -> BTreeMap<NaiveDate, DayInfo> {
    days.iter().map(|day| (day.date, DayInfo::from(day))).collect()
}

/// Whether a grid reacts to clicks. An explicit override beats the lead flag.
/// With `disable_past` set, days before that date never react.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickPolicy {
    pub is_lead: bool,
    pub clickable: Option<bool>,
    pub disable_past: Option<NaiveDate>,
}

impl ClickPolicy {
    pub fn for_lead(is_lead: bool) -> Self {
        Self { is_lead, ..Self::default() }
    }

    pub fn forced(clickable: bool) -> Self {
        Self { clickable: Some(clickable), ..Self::default() }
    }

    pub fn not_before(self, today: NaiveDate) -> Self {
        Self { disable_past: Some(today), ..self }
    }

    pub fn allows_click(&self) -> bool {
        self.clickable.unwrap_or(self.is_lead)
    }

    pub fn allows_click_on(&self, date: NaiveDate) -> bool {
        self.allows_click() && self.disable_past.map_or(true, |today| date >= today)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub info: Option<DayInfo>,
}

pub type Week = [Option<DayCell>; 7];

/// Monday-first weeks covering a month, blanks on both ends.
#[derive(Debug, Clone)]
pub struct MonthGrid {
    month: Month,
    weeks: Vec<Week>,
    policy: ClickPolicy,
}

impl MonthGrid {
    pub fn build(month: Month, days: &BTreeMap<NaiveDate, DayInfo>, policy: ClickPolicy) -> Self {
        let leading = month.first_day().weekday().num_days_from_monday() as usize;

        let mut cells: Vec<Option<DayCell>> = vec![None; leading];
        cells.extend(month.days().map(|date| {
            Some(DayCell {
                date,
                info: days.get(&date).cloned(),
            })
        }));
        while cells.len() % 7 != 0 {
            cells.push(None);
        }

        let weeks = cells
            .chunks(7)
            .map(|chunk| {
                let mut week: Week = Default::default();
                for (slot, cell) in week.iter_mut().zip(chunk) {
                    *slot = cell.clone();
                }
                week
            })
            .collect();

        Self {
            month,
            weeks,
            policy,
        }
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn label(&self) -> String {
        self.month.label()
    }

    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    pub fn cells(&self) -> impl Iterator<Item = &Option<DayCell>> {
        self.weeks.iter().flat_map(|week| week.iter())
    }

    pub fn cell_count(&self) -> usize {
        self.weeks.len() * 7
    }

    pub fn is_clickable(&self) -> bool {
        self.policy.allows_click()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayCell> {
        self.cells().flatten().find(|cell| cell.date == date)
    }

    /// Runs `on_click` for a day of this month, unless the grid is read-only
    /// or the day is in the past.
    pub fn click<R, F>(&self, date: NaiveDate, on_click: F) -> Option<R>
    where
        F: FnOnce(NaiveDate, Option<&DayInfo>) -> R,
    {
        if !self.policy.allows_click_on(date) {
            return None;
        }
        let cell = self.day(date)?;
        Some(on_click(cell.date, cell.info.as_ref()))
    }

    pub fn render(&self) -> String {
        self.render_with(default_label)
    }

    pub fn render_with<F>(&self, label_for: F) -> String
    where
        F: Fn(&DayInfo) -> String,
    {
        let rule = vec!["-".repeat(CELL_WIDTH); 7].join("+");
        let mut out = String::new();

        out.push_str(&format!("{:^width$}\n", self.label(), width = rule.len()));
        out.push_str(&join_row(WEEKDAYS.iter().map(|d| d.to_string())));
        out.push_str(&rule);
        out.push('\n');

        for week in &self.weeks {
            let mut numbers = Vec::with_capacity(7);
            let mut statuses = Vec::with_capacity(7);
            let mut badges = Vec::with_capacity(7);

            for cell in week {
                match cell {
                    None => {
                        numbers.push(String::new());
                        statuses.push(String::new());
                        badges.push(String::new());
                    }
                    Some(cell) => {
                        numbers.push(cell.date.day().to_string());
                        statuses.push(match &cell.info {
                            Some(info) if info.assigned => label_for(info),
                            _ => "Unassigned".to_string(),
                        });
                        badges.push(match &cell.info {
                            Some(info) if info.busy => "Busy".to_string(),
                            _ => String::new(),
                        });
                    }
                }
            }

            out.push_str(&join_row(numbers));
            out.push_str(&join_row(statuses));
            out.push_str(&join_row(badges));
            out.push_str(&rule);
            out.push('\n');
        }

        out
    }
}

/// `Assigned: <name>`, falling back to the member id, then the center.
pub fn default_label(info: &DayInfo) -> String {
    match (&info.member_name, &info.member_id, &info.center_name) {
        (Some(name), _, _) | (None, Some(name), _) => format!("Assigned: {}", name),
        (None, None, Some(center)) => format!("Shift: {}", center),
        (None, None, None) => "Assigned".to_string(),
    }
}

fn fit(text: &str) -> String {
    let clipped: String = text.chars().take(CELL_WIDTH).collect();
    format!("{:<width$}", clipped, width = CELL_WIDTH)
}

fn join_row<I: IntoIterator<Item = String>>(cols: I) -> String {
    let row = cols.into_iter().map(|col| fit(&col)).collect::<Vec<_>>().join("|");
    format!("{}\n", row.trim_end())
}
