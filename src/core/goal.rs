//! Savings goals - target amounts the user is saving towards by a date.
//!
//! Goals sit next to the budget and never feed the balance computation.

use crate::{
    entities::{SavingsGoal, savings_goal},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// Fields of a goal being created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    /// Goal name
    pub name: String,
    /// Amount to reach
    pub target_amount: f64,
    /// Date to reach it by
    pub target_date: NaiveDate,
    /// Free-form description
    pub description: String,
}

/// Creates a goal with nothing saved yet.
#[instrument(skip(db))]
pub async fn create_goal(
    db: &DatabaseConnection,
    user_id: &str,
    goal: NewGoal,
) -> Result<savings_goal::Model> {
    let name = goal.name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput {
            message: "Goal name is required".to_string(),
        });
    }
    if !goal.target_amount.is_finite() || goal.target_amount <= 0.0 {
        return Err(Error::InvalidInput {
            message: format!("Goal target must be a positive amount, got {}", goal.target_amount),
        });
    }

    let created = savings_goal::ActiveModel {
        user_id: Set(user_id.to_string()),
        name: Set(name.to_string()),
        target_amount: Set(goal.target_amount),
        current_amount: Set(0.0),
        target_date: Set(goal.target_date),
        description: Set(goal.description),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Created savings goal '{}' ({})", created.name, created.id);
    Ok(created)
}

/// Goals of the user, soonest target first.
pub async fn list_goals(db: &DatabaseConnection, user_id: &str) -> Result<Vec<savings_goal::Model>> {
    SavingsGoal::find()
        .filter(savings_goal::Column::UserId.eq(user_id))
        .order_by_asc(savings_goal::Column::TargetDate)
        .order_by_asc(savings_goal::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn find_goal(db: &DatabaseConnection, user_id: &str, id: i64) -> Result<savings_goal::Model> {
    SavingsGoal::find_by_id(id)
        .filter(savings_goal::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::GoalNotFound { id })
}

/// Records how much has been saved towards a goal.
#[instrument(skip(db))]
pub async fn update_goal_progress(
    db: &DatabaseConnection,
    user_id: &str,
    id: i64,
    current_amount: f64,
) -> Result<savings_goal::Model> {
    if !current_amount.is_finite() || current_amount < 0.0 {
        return Err(Error::InvalidInput {
            message: format!("Saved amount must be zero or more, got {current_amount}"),
        });
    }

    let mut active: savings_goal::ActiveModel = find_goal(db, user_id, id).await?.into();
    active.current_amount = Set(current_amount);
    Ok(active.update(db).await?)
}

/// Deletes a goal.
pub async fn delete_goal(db: &DatabaseConnection, user_id: &str, id: i64) -> Result<()> {
    let result = SavingsGoal::delete_many()
        .filter(savings_goal::Column::Id.eq(id))
        .filter(savings_goal::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(Error::GoalNotFound { id });
    }
    info!("Deleted savings goal {}", id);
    Ok(())
}

/// Saved amount as a percent of the target. Can exceed 100.
#[must_use]
pub fn goal_progress(goal: &savings_goal::Model) -> f64 {
    if goal.target_amount == 0.0 {
        return 0.0;
    }
    goal.current_amount / goal.target_amount * 100.0
}

/// Days from `today` to the target date, negative once it has passed.
#[must_use]
pub fn days_until_target(goal: &savings_goal::Model, today: NaiveDate) -> i64 {
    (goal.target_date - today).num_days()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    fn emergency_fund() -> NewGoal {
        NewGoal {
            name: " Emergency Fund ".to_string(),
            target_amount: 10_000.0,
            target_date: ymd(2024, 12, 31),
            description: "Six months of expenses".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_goals() -> Result<()> {
        let db = setup_test_db().await?;
        let later = create_goal(&db, TEST_USER, emergency_fund()).await?;
        let sooner = create_goal(
            &db,
            TEST_USER,
            NewGoal {
                name: "Vacation".to_string(),
                target_amount: 3_000.0,
                target_date: ymd(2024, 8, 1),
                description: String::new(),
            },
        )
        .await?;
        create_goal(&db, "someone-else", emergency_fund()).await?;

        assert_eq!(later.name, "Emergency Fund");
        assert_eq!(later.current_amount, 0.0);

        let goals = list_goals(&db, TEST_USER).await?;
        let ids: Vec<i64> = goals.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![sooner.id, later.id]);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_goal_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let blank = NewGoal {
            name: "  ".to_string(),
            ..emergency_fund()
        };
        assert!(matches!(
            create_goal(&db, TEST_USER, blank).await,
            Err(Error::InvalidInput { .. })
        ));

        let zero = NewGoal {
            target_amount: 0.0,
            ..emergency_fund()
        };
        assert!(matches!(
            create_goal(&db, TEST_USER, zero).await,
            Err(Error::InvalidInput { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_progress() -> Result<()> {
        let db = setup_test_db().await?;
        let goal = create_goal(&db, TEST_USER, emergency_fund()).await?;

        let updated = update_goal_progress(&db, TEST_USER, goal.id, 2_500.0).await?;
        assert_eq!(updated.current_amount, 2_500.0);
        assert_eq!(goal_progress(&updated), 25.0);

        let result = update_goal_progress(&db, "someone-else", goal.id, 1.0).await;
        assert!(matches!(result, Err(Error::GoalNotFound { id }) if id == goal.id));

        let result = update_goal_progress(&db, TEST_USER, goal.id, -5.0).await;
        assert!(matches!(result, Err(Error::InvalidInput { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_goal() -> Result<()> {
        let db = setup_test_db().await?;
        let goal = create_goal(&db, TEST_USER, emergency_fund()).await?;

        delete_goal(&db, TEST_USER, goal.id).await?;
        assert!(list_goals(&db, TEST_USER).await?.is_empty());
        assert!(matches!(
            delete_goal(&db, TEST_USER, goal.id).await,
            Err(Error::GoalNotFound { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_days_until_target() -> Result<()> {
        let db = setup_test_db().await?;
        let goal = create_goal(&db, TEST_USER, emergency_fund()).await?;
        assert_eq!(days_until_target(&goal, ymd(2024, 12, 1)), 30);
        assert_eq!(days_until_target(&goal, ymd(2025, 1, 2)), -2);
        Ok(())
    }
}
