use std::fmt::Display;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Weekday;
use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::types::{Day, DayResult, MenuType};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to access {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("Invalid menu file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Cannot write '{alias}': no menu was scraped for {day}")]
    MissingDay { alias: MenuType, day: Day },
    #[error("Expected {expected} days to build aliases, got {actual}")]
    IncompleteWeek { expected: usize, actual: usize },
    #[error("No ingredient given to search for")]
    EmptyIngredient,
    #[error("Invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Index into the Monday-first week of `today`. The week is numbered from
/// Sunday = 0 and shifted back by one day.
pub fn today_index(today: Weekday) -> usize {
    ((today.num_days_from_sunday() + 6) % 7) as usize
}

/// Index into the Monday-first week of the day after `today`.
pub fn tomorrow_index(today: Weekday) -> usize {
    (today.num_days_from_sunday() % 7) as usize
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngredientMatch {
    pub day: String,
    pub location: String,
}

impl Display for IngredientMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.day, self.location)
    }
}

/// Flat directory of `<menu type>.json` files.
#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, menu: MenuType) -> PathBuf {
        self.dir.join(format!("{}.json", menu.slug()))
    }

    fn write(&self, menu: MenuType, result: &DayResult) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path_for(menu);
        let json = serde_json::to_string(result).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        log::info!("Wrote {} menu to {}", result.day, path.display());
        Ok(path)
    }

    pub fn write_day(&self, day: Day, result: &DayResult) -> Result<PathBuf, StoreError> {
        self.write(MenuType::Day(day), result)
    }

    /// Writes `today.json` and `tomorrow.json` from a Monday-first week.
    /// `week` holds `None` for days that failed to scrape. Both aliases are
    /// attempted; the first failure is returned.
    pub fn write_aliases(
        &self,
        week: &[Option<DayResult>],
        today: Weekday,
    ) -> Result<(), StoreError> {
        if week.len() != Day::WEEK.len() {
            return Err(StoreError::IncompleteWeek {
                expected: Day::WEEK.len(),
                actual: week.len(),
            });
        }

        let aliases = [
            (MenuType::Today, today_index(today)),
            (MenuType::Tomorrow, tomorrow_index(today)),
        ];

        let mut first_error = None;
        for (alias, index) in aliases {
            let written = match &week[index] {
                Some(result) => self.write(alias, result).map(|_| ()),
                None => Err(StoreError::MissingDay {
                    alias,
                    day: Day::WEEK[index],
                }),
            };
            if let Err(e) = written {
                log::error!("{}", e);
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    pub fn read(&self, menu: MenuType) -> Result<DayResult, StoreError> {
        let path = self.path_for(menu);
        let json = fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| StoreError::Json { path, source })
    }

    /// Every (day, location) whose location or menu mentions `ingredient` as
    /// a whole word. Days without a stored file are skipped.
    pub fn search(&self, ingredient: &str) -> Result<Vec<IngredientMatch>, StoreError> {
        let pattern = ingredient_pattern(ingredient)?;
        let mut matches = Vec::new();

        for day in Day::WEEK {
            let result = match self.read(MenuType::Day(day)) {
                Ok(result) => result,
                Err(StoreError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                    log::debug!("No stored menu for {}", day);
                    continue;
                }
                Err(e) => return Err(e),
            };

            matches.extend(
                result
                    .locations
                    .iter()
                    .filter(|record| {
                        pattern.is_match(&record.location) || pattern.is_match(&record.menu)
                    })
                    .map(|record| IngredientMatch {
                        day: result.day.clone(),
                        location: record.location.clone(),
                    }),
            );
        }

        Ok(matches)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Word boundaries are only required on a side that ends in a word
/// character, so markers such as "(v)" or "gf*" still match.
fn ingredient_pattern(ingredient: &str) -> Result<Regex, StoreError> {
    let ingredient = ingredient.trim();
    let (Some(first), Some(last)) = (ingredient.chars().next(), ingredient.chars().last()) else {
        return Err(StoreError::EmptyIngredient);
    };

    let start = if is_word_char(first) { r"\b" } else { "" };
    let end = if is_word_char(last) { r"\b" } else { "" };

    Ok(RegexBuilder::new(&format!("{}{}{}", start, regex::escape(ingredient), end))
        .case_insensitive(true)
        .build()?)
}
