//! Database models for goals.

use chrono::NaiveDate;
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::StorageError;
use goal_planner_core::goals::{Goal, GoalPatch, NewGoal};

/// Database model for goals. Amounts are stored as decimal strings.
#[derive(Queryable, Identifiable, Selectable, Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GoalDB {
    pub id: String,
    pub name: String,
    pub category: String,
    pub target_amount: String,
    pub saved_amount: String,
    pub deadline: NaiveDate,
    pub created_at: NaiveDate,
    pub version: i64,
}

/// Changeset for a goal update; unset fields are left untouched.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::goals)]
pub struct GoalChangesetDB {
    pub name: Option<String>,
    pub category: Option<String>,
    pub target_amount: Option<String>,
    pub saved_amount: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub version: Option<i64>,
}

fn parse_amount(field: &str, value: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(value).map_err(|e| {
        StorageError::SerializationError(format!("Invalid {} '{}': {}", field, value, e))
    })
}

// Conversion to domain models
impl TryFrom<GoalDB> for Goal {
    type Error = StorageError;

    fn try_from(db: GoalDB) -> Result<Self, Self::Error> {
        Ok(Self {
            target_amount: parse_amount("target_amount", &db.target_amount)?,
            saved_amount: parse_amount("saved_amount", &db.saved_amount)?,
            id: db.id,
            name: db.name,
            category: db.category,
            deadline: db.deadline,
            created_at: db.created_at,
            version: db.version,
        })
    }
}

impl GoalDB {
    pub fn from_new_goal(id: String, domain: NewGoal) -> Self {
        Self {
            id,
            name: domain.name.trim().to_string(),
            category: domain.category.trim().to_string(),
            target_amount: domain.target_amount.to_string(),
            saved_amount: domain.saved_amount.to_string(),
            deadline: domain.deadline,
            created_at: domain.created_at,
            version: 1,
        }
    }
}

impl GoalChangesetDB {
    pub fn from_patch(patch: GoalPatch, next_version: i64) -> Self {
        Self {
            name: patch.name.map(|n| n.trim().to_string()),
            category: patch.category.map(|c| c.trim().to_string()),
            target_amount: patch.target_amount.map(|a| a.to_string()),
            saved_amount: patch.saved_amount.map(|a| a.to_string()),
            deadline: patch.deadline,
            version: Some(next_version),
        }
    }
}
