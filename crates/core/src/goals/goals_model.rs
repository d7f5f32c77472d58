//! Goals domain models.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DATE_FORMAT;
use crate::errors::{Result, ValidationError};

/// Domain model representing a savings goal.
///
/// Status is never stored on the record; see [`crate::goals::GoalProgress`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub category: String,
    pub target_amount: Decimal,
    pub saved_amount: Decimal,
    pub deadline: NaiveDate,
    pub created_at: NaiveDate,
    /// Store-maintained revision, bumped on every successful update.
    #[serde(default)]
    pub version: i64,
}

impl Goal {
    /// Returns a copy of this goal with the patch's fields applied.
    /// `id`, `created_at` and `version` are left to the store.
    pub fn apply_patch(&self, patch: &GoalPatch) -> Goal {
        let mut goal = self.clone();
        if let Some(name) = &patch.name {
            goal.name = name.trim().to_string();
        }
        if let Some(category) = &patch.category {
            goal.category = category.trim().to_string();
        }
        if let Some(target_amount) = patch.target_amount {
            goal.target_amount = target_amount;
        }
        if let Some(saved_amount) = patch.saved_amount {
            goal.saved_amount = saved_amount;
        }
        if let Some(deadline) = patch.deadline {
            goal.deadline = deadline;
        }
        goal
    }
}

/// Input model for creating a new goal. The store assigns the id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub name: String,
    pub category: String,
    pub target_amount: Decimal,
    #[serde(default)]
    pub saved_amount: Decimal,
    pub deadline: NaiveDate,
    pub created_at: NaiveDate,
}

impl NewGoal {
    /// Checks the invariants of an already-typed record, as received by a store.
    pub fn validate(&self) -> Result<()> {
        require_text("name", Some(&self.name))?;
        require_text("category", Some(&self.category))?;
        require_non_negative("targetAmount", self.target_amount)?;
        Ok(())
    }
}

/// User-authored goal form, every field as entered.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GoalDraft {
    pub name: Option<String>,
    pub category: Option<String>,
    pub target_amount: Option<String>,
    pub deadline: Option<String>,
}

impl GoalDraft {
    pub fn new(name: &str, category: &str, target_amount: &str, deadline: &str) -> Self {
        GoalDraft {
            name: Some(name.to_string()),
            category: Some(category.to_string()),
            target_amount: Some(target_amount.to_string()),
            deadline: Some(deadline.to_string()),
        }
    }

    /// Turns the draft into a record ready for the store.
    ///
    /// Fails on the first missing or malformed field; `saved_amount` starts at
    /// zero and `created_at` is `today`.
    pub fn validate(&self, today: NaiveDate) -> Result<NewGoal> {
        let name = require_text("name", self.name.as_deref())?;
        let category = require_text("category", self.category.as_deref())?;
        let target_amount = parse_amount("targetAmount", self.target_amount.as_deref())?;
        let deadline = parse_date("deadline", self.deadline.as_deref())?;

        Ok(NewGoal {
            name,
            category,
            target_amount,
            saved_amount: Decimal::ZERO,
            deadline,
            created_at: today,
        })
    }

    /// Converts an edit form into a patch. Absent fields stay untouched,
    /// present ones are validated like a new draft.
    pub fn into_patch(self) -> Result<GoalPatch> {
        let patch = GoalPatch {
            name: self
                .name
                .as_deref()
                .map(|n| require_text("name", Some(n)))
                .transpose()?,
            category: self
                .category
                .as_deref()
                .map(|c| require_text("category", Some(c)))
                .transpose()?,
            target_amount: self
                .target_amount
                .as_deref()
                .map(|a| parse_amount("targetAmount", Some(a)))
                .transpose()?,
            saved_amount: None,
            deadline: self
                .deadline
                .as_deref()
                .map(|d| parse_date("deadline", Some(d)))
                .transpose()?,
        };
        patch.validate()?;
        Ok(patch)
    }
}

/// Partial update of a goal. Only the fields that are set are sent.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
}

impl GoalPatch {
    /// Patch that only overwrites the saved amount.
    pub fn saved_amount(saved_amount: Decimal) -> Self {
        GoalPatch {
            saved_amount: Some(saved_amount),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.target_amount.is_none()
            && self.saved_amount.is_none()
            && self.deadline.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(
                ValidationError::InvalidInput("Patch has no fields to update".to_string()).into(),
            );
        }
        if let Some(name) = &self.name {
            require_text("name", Some(name))?;
        }
        if let Some(category) = &self.category {
            require_text("category", Some(category))?;
        }
        if let Some(target_amount) = self.target_amount {
            require_non_negative("targetAmount", target_amount)?;
        }
        Ok(())
    }
}

fn require_text(field: &str, value: Option<&str>) -> Result<String> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(ValidationError::MissingField(field.to_string()).into()),
    }
}

fn require_non_negative(field: &str, amount: Decimal) -> Result<Decimal> {
    if amount < Decimal::ZERO {
        return Err(ValidationError::InvalidInput(format!(
            "{} must not be negative, got {}",
            field, amount
        ))
        .into());
    }
    Ok(amount)
}

fn parse_amount(field: &str, raw: Option<&str>) -> Result<Decimal> {
    let raw = require_text(field, raw)?;
    let amount = Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| {
            ValidationError::InvalidInput(format!("{} is not a number: '{}'", field, raw))
        })?;
    require_non_negative(field, amount)
}

fn parse_date(field: &str, raw: Option<&str>) -> Result<NaiveDate> {
    let raw = require_text(field, raw)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|_| {
        ValidationError::InvalidInput(format!(
            "{} must be a calendar date (YYYY-MM-DD), got '{}'",
            field, raw
        ))
        .into()
    })
}
