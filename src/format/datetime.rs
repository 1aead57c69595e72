//! Date and time formatting in the en-US conventions.
//!
//! Callers pass only the options they care about; everything else comes from
//! the per-function defaults (`Jun 15, 2024` for dates, `02:05 PM` for times).

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};

/// Rendered for text that is not a recognizable date
pub const INVALID_DATE: &str = "Invalid Date";

const MONTHS_LONG: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

const WEEKDAYS_LONG: [&str; 7] = [
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];

/// A date as received from the portal: already typed, or still text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateValue {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Text(String),
}

impl DateValue {
    /// Empty text counts as no date at all
    pub fn is_empty(&self) -> bool {
        matches!(self, DateValue::Text(text) if text.trim().is_empty())
    }

    /// Resolve to a local date-time; `None` for unparseable text
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        match self {
            DateValue::Date(date) => Some(date.and_time(NaiveTime::MIN)),
            DateValue::DateTime(datetime) => Some(*datetime),
            DateValue::Text(text) => parse_text(text.trim()),
        }
    }
}

fn parse_text(text: &str) -> Option<NaiveDateTime> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.with_timezone(&Local).naive_local());
    }

    // ISO text with an offset but without seconds, e.g. `2024-06-15T14:05Z`
    let with_offset = match text.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{}+00:00", rest),
        None => text.to_string(),
    };
    for pattern in ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%dT%H:%M%z", "%Y-%m-%d %H:%M%:z", "%Y-%m-%d %H:%M:%S%.f%:z"] {
        if let Ok(datetime) = DateTime::parse_from_str(&with_offset, pattern) {
            return Some(datetime.with_timezone(&Local).naive_local());
        }
    }

    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, pattern) {
            return Some(datetime);
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

impl From<NaiveDate> for DateValue {
    fn from(date: NaiveDate) -> Self {
        DateValue::Date(date)
    }
}

impl From<NaiveDateTime> for DateValue {
    fn from(datetime: NaiveDateTime) -> Self {
        DateValue::DateTime(datetime)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateValue {
    fn from(datetime: DateTime<Tz>) -> Self {
        DateValue::DateTime(datetime.with_timezone(&Local).naive_local())
    }
}

impl From<&str> for DateValue {
    fn from(text: &str) -> Self {
        DateValue::Text(text.to_string())
    }
}

impl From<String> for DateValue {
    fn from(text: String) -> Self {
        DateValue::Text(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericStyle {
    Numeric,
    TwoDigit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Long,
    Short,
    Narrow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthStyle {
    Numeric,
    TwoDigit,
    Long,
    Short,
    Narrow,
}

/// Which components to render and how; `None` leaves a component out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateTimeOptions {
    pub weekday: Option<TextStyle>,
    pub year: Option<NumericStyle>,
    pub month: Option<MonthStyle>,
    pub day: Option<NumericStyle>,
    pub hour: Option<NumericStyle>,
    pub minute: Option<NumericStyle>,
    pub second: Option<NumericStyle>,
    /// 12-hour clock with AM/PM; defaults to true
    pub hour12: Option<bool>,
}

impl DateTimeOptions {
    /// Default options of [`format_date`]
    pub fn date_defaults() -> Self {
        Self {
            year: Some(NumericStyle::Numeric),
            month: Some(MonthStyle::Short),
            day: Some(NumericStyle::Numeric),
            ..Default::default()
        }
    }

    /// Default options of [`format_time`]
    pub fn time_defaults() -> Self {
        Self {
            hour: Some(NumericStyle::TwoDigit),
            minute: Some(NumericStyle::TwoDigit),
            ..Default::default()
        }
    }

    /// Fill every unset field of `self` from `defaults`
    pub fn merged_over(self, defaults: DateTimeOptions) -> Self {
        Self {
            weekday: self.weekday.or(defaults.weekday),
            year: self.year.or(defaults.year),
            month: self.month.or(defaults.month),
            day: self.day.or(defaults.day),
            hour: self.hour.or(defaults.hour),
            minute: self.minute.or(defaults.minute),
            second: self.second.or(defaults.second),
            hour12: self.hour12.or(defaults.hour12),
        }
    }

    fn has_date(&self) -> bool {
        self.weekday.is_some() || self.year.is_some() || self.month.is_some() || self.day.is_some()
    }

    fn has_time(&self) -> bool {
        self.hour.is_some() || self.minute.is_some() || self.second.is_some()
    }
}

/// Format the date part of `value`; empty for a missing value
pub fn format_date(value: Option<&DateValue>, options: &DateTimeOptions) -> String {
    render(value, options.merged_over(DateTimeOptions::date_defaults()))
}

/// Format the time part of `value`; empty for a missing value
pub fn format_time(value: Option<&DateValue>, options: &DateTimeOptions) -> String {
    render(value, options.merged_over(DateTimeOptions::time_defaults()))
}

fn render(value: Option<&DateValue>, options: DateTimeOptions) -> String {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return String::new();
    };
    let Some(datetime) = value.to_naive() else {
        return INVALID_DATE.to_string();
    };

    let date = options.has_date().then(|| render_date(&datetime, &options));
    let time = options.has_time().then(|| render_time(&datetime, &options));

    match (date, time) {
        (Some(date), Some(time)) => format!("{}, {}", date, time),
        (Some(date), None) => date,
        (None, Some(time)) => time,
        (None, None) => String::new(),
    }
}

fn numeric(value: u32, style: NumericStyle) -> String {
    match style {
        NumericStyle::Numeric => value.to_string(),
        NumericStyle::TwoDigit => format!("{:02}", value % 100),
    }
}

fn render_date(datetime: &NaiveDateTime, options: &DateTimeOptions) -> String {
    let weekday = options.weekday.map(|style| {
        let name = WEEKDAYS_LONG[datetime.weekday().num_days_from_monday() as usize];
        abbreviate(name, style)
    });

    let year = options.year.map(|style| match style {
        NumericStyle::Numeric => datetime.year().to_string(),
        NumericStyle::TwoDigit => format!("{:02}", datetime.year().rem_euclid(100)),
    });
    let day = options.day.map(|style| numeric(datetime.day(), style));

    let body = match options.month {
        Some(MonthStyle::Long) | Some(MonthStyle::Short) | Some(MonthStyle::Narrow) => {
            let style = match options.month {
                Some(MonthStyle::Long) => TextStyle::Long,
                Some(MonthStyle::Short) => TextStyle::Short,
                _ => TextStyle::Narrow,
            };
            let month = abbreviate(MONTHS_LONG[datetime.month0() as usize], style);

            match (day, year) {
                (Some(day), Some(year)) => format!("{} {}, {}", month, day, year),
                (Some(day), None) => format!("{} {}", month, day),
                (None, Some(year)) => format!("{} {}", month, year),
                (None, None) => month,
            }
        }
        numeric_month => {
            let month = numeric_month.map(|style| match style {
                MonthStyle::TwoDigit => format!("{:02}", datetime.month()),
                _ => datetime.month().to_string(),
            });
            [month, day, year].into_iter().flatten().collect::<Vec<_>>().join("/")
        }
    };

    match weekday {
        Some(weekday) if body.is_empty() => weekday,
        Some(weekday) => format!("{}, {}", weekday, body),
        None => body,
    }
}

fn render_time(datetime: &NaiveDateTime, options: &DateTimeOptions) -> String {
    let hour12 = options.hour12.unwrap_or(true);
    let mut parts = Vec::with_capacity(3);

    if let Some(style) = options.hour {
        let hour = if hour12 {
            match datetime.hour() % 12 {
                0 => 12,
                h => h,
            }
        } else {
            datetime.hour()
        };
        parts.push(numeric(hour, style));
    }

    // Minutes and seconds following another component are always padded
    if let Some(style) = options.minute {
        let style = if parts.is_empty() { style } else { NumericStyle::TwoDigit };
        parts.push(numeric(datetime.minute(), style));
    }
    if let Some(style) = options.second {
        let style = if parts.is_empty() { style } else { NumericStyle::TwoDigit };
        parts.push(numeric(datetime.second(), style));
    }

    let clock = parts.join(":");
    if hour12 && options.hour.is_some() {
        let meridiem = if datetime.hour() < 12 { "AM" } else { "PM" };
        format!("{} {}", clock, meridiem)
    } else {
        clock
    }
}

fn abbreviate(name: &str, style: TextStyle) -> String {
    match style {
        TextStyle::Long => name.to_string(),
        TextStyle::Short => name.chars().take(3).collect(),
        TextStyle::Narrow => name.chars().take(1).collect(),
    }
}
