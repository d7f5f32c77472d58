use goal_planner_core::errors::{Error, Result};
use goal_planner_core::goals::{Goal, GoalPatch, GoalStoreTrait, NewGoal};

use super::model::{GoalChangesetDB, GoalDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::goals;
use crate::schema::goals::dsl::*;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;

use std::sync::Arc;
use uuid::Uuid;

pub struct GoalRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl GoalRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        GoalRepository { pool, writer }
    }

    pub fn load_goals_impl(&self) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let goals_db = goals
            .order((created_at.asc(), name.asc()))
            .select(GoalDB::as_select())
            .load::<GoalDB>(&mut conn)
            .into_core()?;
        goals_db
            .into_iter()
            .map(|g| Goal::try_from(g).map_err(Error::from))
            .collect()
    }

    pub fn get_goal_impl(&self, goal_id: &str) -> Result<Goal> {
        let mut conn = get_connection(&self.pool)?;
        find_goal(&mut conn, goal_id)
    }
}

fn find_goal(conn: &mut SqliteConnection, goal_id: &str) -> Result<Goal> {
    let goal_db = goals
        .find(goal_id)
        .select(GoalDB::as_select())
        .first::<GoalDB>(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| Error::NotFound(goal_id.to_string()))?;
    Ok(Goal::try_from(goal_db)?)
}

#[async_trait]
impl GoalStoreTrait for GoalRepository {
    async fn list_goals(&self) -> Result<Vec<Goal>> {
        self.load_goals_impl()
    }

    async fn get_goal(&self, goal_id: &str) -> Result<Goal> {
        self.get_goal_impl(goal_id)
    }

    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal> {
        new_goal.validate()?;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Goal> {
                let new_goal_db = GoalDB::from_new_goal(Uuid::new_v4().to_string(), new_goal);
                let result_db = diesel::insert_into(goals::table)
                    .values(&new_goal_db)
                    .returning(GoalDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Goal::try_from(result_db)?)
            })
            .await
    }

    async fn update_goal(
        &self,
        goal_id: &str,
        patch: GoalPatch,
        expected_version: Option<i64>,
    ) -> Result<Goal> {
        patch.validate()?;
        let goal_id_owned = goal_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Goal> {
                let current = find_goal(conn, &goal_id_owned)?;
                if let Some(expected) = expected_version {
                    if current.version != expected {
                        return Err(Error::Conflict(format!(
                            "goal {} is at version {}, expected {}",
                            goal_id_owned, current.version, expected
                        )));
                    }
                }

                let changeset = GoalChangesetDB::from_patch(patch, current.version + 1);
                let result_db = diesel::update(goals.find(goal_id_owned.as_str()))
                    .set(&changeset)
                    .returning(GoalDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                let updated = Goal::try_from(result_db)?;
                debug!(
                    "Goal {} updated to version {}",
                    updated.id, updated.version
                );
                Ok(updated)
            })
            .await
    }

    async fn delete_goal(&self, goal_id: &str) -> Result<()> {
        let goal_id_owned = goal_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let deleted = diesel::delete(goals.find(goal_id_owned.as_str()))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if deleted == 0 {
                    return Err(Error::NotFound(goal_id_owned));
                }
                Ok(())
            })
            .await
    }
}
