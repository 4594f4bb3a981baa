use std::collections::HashSet;
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
#[error("Invalid day '{0}'. Accepted values: 'monday' through 'sunday'")]
pub struct DayParseError(String);

#[derive(Debug, thiserror::Error)]
#[error("Invalid menu '{0}'. Accepted values: 'today', 'tomorrow' or a day of the week")]
pub struct MenuTypeParseError(String);

/// Days of the week in scrape order. The source site publishes one page per
/// day and the week starts on Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const WEEK: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wednesday",
            Day::Thursday => "thursday",
            Day::Friday => "friday",
            Day::Saturday => "saturday",
            Day::Sunday => "sunday",
        }
    }
}

impl From<chrono::Weekday> for Day {
    fn from(weekday: chrono::Weekday) -> Self {
        Day::WEEK[weekday.num_days_from_monday() as usize]
    }
}

impl FromStr for Day {
    type Err = DayParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Day::WEEK
            .into_iter()
            .find(|d| d.slug() == lower)
            .ok_or_else(|| DayParseError(s.to_string()))
    }
}

impl Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A page to scrape: one per day of the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayConfig {
    pub day: Day,
    pub url: String,
}

impl DayConfig {
    /// The seven day pages hosted under `base_url`, Monday first.
    pub fn week(base_url: &str) -> Vec<DayConfig> {
        let base = base_url.trim_end_matches('/');
        Day::WEEK
            .into_iter()
            .map(|day| DayConfig {
                day,
                url: format!("{}/canteen-{}", base, day.slug()),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuRecord {
    pub location: String,
    pub menu: String,
}

impl Display for MenuRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.location.is_empty() {
            writeln!(f, "── (no location)")?;
        } else {
            writeln!(f, "── {}", self.location)?;
        }
        for line in self.menu.lines() {
            writeln!(f, "   {}", line)?;
        }
        Ok(())
    }
}

/// One scraped day, stored verbatim as `<day>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayResult {
    pub day: String,
    pub url: String,
    pub timestamp: String,
    pub locations: Vec<MenuRecord>,
}

impl Display for DayResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "┌─ {} ─ {}", self.day, self.url)?;
        writeln!(f, "│  Scraped: {}", self.timestamp)?;
        writeln!(f, "└─ {} location(s)", self.locations.len())?;
        for record in &self.locations {
            write!(f, "{}", record)?;
        }
        Ok(())
    }
}

/// Location names discovered while walking one page. Every entry has been
/// through [`crate::parser::normalize_location`].
pub type LocationSet = HashSet<String>;

/// Names a stored menu file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuType {
    Today,
    Tomorrow,
    Day(Day),
}

impl MenuType {
    pub fn slug(&self) -> &'static str {
        match self {
            MenuType::Today => "today",
            MenuType::Tomorrow => "tomorrow",
            MenuType::Day(day) => day.slug(),
        }
    }

    /// Heading used when the menu is announced.
    pub fn title(&self) -> String {
        match self {
            MenuType::Today => "Today's menu".to_string(),
            MenuType::Tomorrow => "Tomorrow's menu".to_string(),
            MenuType::Day(day) => format!("{}'s menu", day.name()),
        }
    }
}

impl FromStr for MenuType {
    type Err = MenuTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" => Ok(MenuType::Today),
            "tomorrow" => Ok(MenuType::Tomorrow),
            other => other
                .parse::<Day>()
                .map(MenuType::Day)
                .map_err(|_| MenuTypeParseError(s.to_string())),
        }
    }
}

impl Display for MenuType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_urls_are_monday_first() {
        let week = DayConfig::week("http://canteen.example/");
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].day, Day::Monday);
        assert_eq!(week[0].url, "http://canteen.example/canteen-monday");
        assert_eq!(week[6].day, Day::Sunday);
        assert_eq!(week[6].url, "http://canteen.example/canteen-sunday");
    }

    #[test]
    fn test_day_from_chrono_weekday() {
        assert_eq!(Day::from(chrono::Weekday::Mon), Day::Monday);
        assert_eq!(Day::from(chrono::Weekday::Sun), Day::Sunday);
    }

    #[test]
    fn test_menu_type_parsing() {
        assert_eq!("today".parse::<MenuType>().unwrap(), MenuType::Today);
        assert_eq!("Tomorrow".parse::<MenuType>().unwrap(), MenuType::Tomorrow);
        assert_eq!(
            "WEDNESDAY".parse::<MenuType>().unwrap(),
            MenuType::Day(Day::Wednesday)
        );
        assert!("someday".parse::<MenuType>().is_err());
    }

    #[test]
    fn test_menu_type_titles() {
        assert_eq!(MenuType::Today.title(), "Today's menu");
        assert_eq!(MenuType::Day(Day::Friday).title(), "Friday's menu");
    }

    #[test]
    fn test_day_result_json_shape() {
        let result = DayResult {
            day: "Monday".into(),
            url: "http://canteen.example/canteen-monday".into(),
            timestamp: "Mon Oct 12 12:00:00 2026".into(),
            locations: vec![MenuRecord {
                location: "Grill".into(),
                menu: "Burgers".into(),
            }],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["day"], "Monday");
        assert_eq!(value["locations"][0]["location"], "Grill");
        assert_eq!(value["locations"][0]["menu"], "Burgers");
    }
}
