//! User-entered hypotheses over completion records.
//!
//! A hypothesis is a `{field, operator, value}` triple entered in the UI. It is
//! compiled once into a [`Hypothesis`] that can be evaluated against every
//! record, or rejected with a [`ValidationError`] that is shown to the user.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::time::{calendar_date, midnight_at, parse_calendar_date};
use crate::models::CompletionRecord;

/// Record attribute a hypothesis looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HypothesisField {
    Worker,
    Date,
}

/// Raw hypothesis as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HypothesisConfig {
    pub field: HypothesisField,
    #[serde(default = "default_operator")]
    pub operator: String,
    #[serde(default)]
    pub value: String,
}

fn default_operator() -> String {
    "==".to_string()
}

impl HypothesisConfig {
    pub fn new(field: HypothesisField, operator: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field,
            operator: operator.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Comparison {
    pub fn parse(operator: &str) -> Result<Self, ValidationError> {
        match operator.trim() {
            "==" | "=" => Ok(Self::Eq),
            "!=" => Ok(Self::Ne),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Ge),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Le),
            other => Err(ValidationError::UnknownOperator(other.to_string())),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }

    fn holds<T: PartialOrd>(self, left: &T, right: &T) -> bool {
        match self {
            Self::Eq => left == right,
            Self::Ne => left != right,
            Self::Gt => left > right,
            Self::Ge => left >= right,
            Self::Lt => left < right,
            Self::Le => left <= right,
        }
    }
}

/// A validated hypothesis, ready to evaluate.
#[derive(Debug, Clone, PartialEq)]
pub enum Hypothesis {
    /// Some listed worker's name contains `needle`, ignoring case and accents.
    Worker { value: String, needle: String },
    /// The completion timestamp compares to `date` with `comparison`.
    Date {
        comparison: Comparison,
        date: NaiveDate,
        midnight: DateTime<Utc>,
        offset: FixedOffset,
    },
}

impl Hypothesis {
    /// Validate `config`. Calendar dates are taken in `offset`.
    pub fn compile(config: &HypothesisConfig, offset: FixedOffset) -> Result<Self, ValidationError> {
        let comparison = Comparison::parse(&config.operator)?;
        let value = config.value.trim();

        match config.field {
            HypothesisField::Worker => {
                if comparison != Comparison::Eq {
                    return Err(ValidationError::UnsupportedWorkerOperator(
                        config.operator.trim().to_string(),
                    ));
                }
                if value.is_empty() {
                    return Err(ValidationError::EmptyWorkerValue);
                }
                Ok(Self::Worker {
                    value: value.to_string(),
                    needle: fold(value),
                })
            }
            HypothesisField::Date => {
                if value.is_empty() {
                    return Err(ValidationError::EmptyDateValue);
                }
                let date = parse_calendar_date(value, offset)
                    .ok_or_else(|| ValidationError::InvalidDate(value.to_string()))?;
                let midnight = midnight_at(date, offset)
                    .ok_or_else(|| ValidationError::InvalidDate(value.to_string()))?;
                Ok(Self::Date {
                    comparison,
                    date,
                    midnight,
                    offset,
                })
            }
        }
    }

    pub fn description(&self) -> String {
        self.to_string()
    }

    pub fn matches(&self, record: &CompletionRecord) -> bool {
        match self {
            Self::Worker { needle, .. } => record.workers().any(|w| fold(w).contains(needle.as_str())),
            Self::Date {
                comparison,
                date,
                midnight,
                offset,
            } => {
                let Some(completed_at) = record.completed_at else {
                    return false;
                };
                match comparison {
                    Comparison::Eq | Comparison::Ne => {
                        comparison.holds(&calendar_date(completed_at, *offset), date)
                    }
                    _ => comparison.holds(&completed_at, midnight),
                }
            }
        }
    }
}

impl fmt::Display for Hypothesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Worker { value, .. } => write!(f, "worker == \"{}\"", value),
            Self::Date {
                comparison, date, ..
            } => write!(f, "date {} {}", comparison.symbol(), date.format("%Y-%m-%d")),
        }
    }
}

/// Lowercase and strip Latin diacritics so "José" and "jose" compare equal.
pub fn fold(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'ā' => 'a',
            'é' | 'è' | 'ê' | 'ë' | 'ē' | 'ę' => 'e',
            'í' | 'ì' | 'î' | 'ï' | 'ī' => 'i',
            'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ø' | 'ō' => 'o',
            'ú' | 'ù' | 'û' | 'ü' | 'ū' => 'u',
            'ý' | 'ÿ' => 'y',
            'ñ' | 'ń' => 'n',
            'ç' | 'ć' | 'č' => 'c',
            'š' | 'ś' => 's',
            'ž' | 'ź' | 'ż' => 'z',
            'ł' => 'l',
            other => other,
        })
        .collect()
}
