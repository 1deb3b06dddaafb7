use chrono::{Days, NaiveDate, Utc};
use std::fmt::Display;
use std::str::FromStr;

/// Parameters of a todo list request. Both are always sent, empty when unused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TodoQuery {
    pub search: String,
    /// `YYYY-MM-DD`, or empty for no date filter.
    pub todo_date: String,
}

impl TodoQuery {
    pub fn new(search: impl Into<String>, filter: DateFilter) -> Self {
        Self {
            search: search.into(),
            todo_date: filter.value(),
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_filter(mut self, filter: DateFilter) -> Self {
        self.todo_date = filter.value();
        self
    }

    pub fn pairs(&self) -> [(&'static str, &str); 2] {
        [("search", self.search.as_str()), ("todo_date", self.todo_date.as_str())]
    }
}

/// The deadline filter offered next to the search box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DateFilter {
    #[default]
    All,
    Today,
    InDays(u32),
}

impl DateFilter {
    /// Presets in the order they are offered, after "All".
    pub const PRESETS: [DateFilter; 4] = [
        DateFilter::Today,
        DateFilter::InDays(5),
        DateFilter::InDays(10),
        DateFilter::InDays(30),
    ];

    pub fn label(&self) -> String {
        match self {
            DateFilter::All => "All Todos".to_string(),
            DateFilter::Today | DateFilter::InDays(0) => "Deadline Today".to_string(),
            DateFilter::InDays(days) => format!("Expires in {days} Days"),
        }
    }

    /// Query value relative to `today`; empty for [`DateFilter::All`].
    pub fn resolve(&self, today: NaiveDate) -> String {
        let days = match self {
            DateFilter::All => return String::new(),
            DateFilter::Today => 0,
            DateFilter::InDays(days) => *days,
        };
        today
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MAX)
            .format("%Y-%m-%d")
            .to_string()
    }

    /// Query value relative to [`today`].
    pub fn value(&self) -> String {
        self.resolve(today())
    }
}

impl Display for DateFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// Accepts `all`, `today`, or a day count such as `5` or `5d`.
impl FromStr for DateFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "" | "all" => Ok(DateFilter::All),
            "today" => Ok(DateFilter::Today),
            other => other
                .trim_end_matches('d')
                .parse()
                .map(DateFilter::InDays)
                .map_err(|_| format!("unknown date filter `{other}` (try all, today, 5d)")),
        }
    }
}

/// The current UTC date. Filters resolve against it and the listing banner shows it.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// "Monday"
pub fn day_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

/// "March 1, 2024"
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn march_1() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_presets_resolve_relative_to_today() {
        let values: Vec<String> = DateFilter::PRESETS
            .iter()
            .map(|filter| filter.resolve(march_1()))
            .collect();
        assert_eq!(values, ["2024-03-01", "2024-03-06", "2024-03-11", "2024-03-31"]);
        assert_eq!(DateFilter::All.resolve(march_1()), "");
    }

    #[test]
    fn test_today_filter_uses_utc_day() {
        let before = Utc::now().date_naive();
        let value = DateFilter::Today.value();
        let after = Utc::now().date_naive();

        assert!(value == before.format("%Y-%m-%d").to_string() || value == after.format("%Y-%m-%d").to_string());
        assert!(today() == before || today() == after);
    }

    #[test]
    fn test_labels() {
        assert_eq!(DateFilter::All.label(), "All Todos");
        assert_eq!(DateFilter::Today.label(), "Deadline Today");
        assert_eq!(DateFilter::InDays(10).label(), "Expires in 10 Days");
    }

    #[test]
    fn test_parse() {
        assert_eq!("all".parse::<DateFilter>(), Ok(DateFilter::All));
        assert_eq!("Today".parse::<DateFilter>(), Ok(DateFilter::Today));
        assert_eq!("5d".parse::<DateFilter>(), Ok(DateFilter::InDays(5)));
        assert_eq!("30".parse::<DateFilter>(), Ok(DateFilter::InDays(30)));
        assert!("soon".parse::<DateFilter>().is_err());
    }

    #[test]
    fn test_query_pairs_are_always_present() {
        let query = TodoQuery::default().with_search("milk");
        assert_eq!(query.pairs(), [("search", "milk"), ("todo_date", "")]);
    }

    #[test]
    fn test_banner_dates() {
        assert_eq!(day_name(march_1()), "Friday");
        assert_eq!(long_date(march_1()), "March 1, 2024");
    }
}
