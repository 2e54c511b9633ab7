use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pyrolink_error::StorageResult;
use pyrolink_models::{
    domain::prelude::{correlation_token, NewCommand},
    entities::command::{
        ActiveModel as CommandActiveModel, Column as CommandColumn, Entity as Command,
        Model as CommandModel,
    },
    enums::command::CommandStatus,
    CommandStore,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use serde_json::Value as Json;

/// A lost claim race means re-querying; pathological contention gives up
/// and reports no content, which the relay resolves on its next poll.
const CLAIM_MAX_ATTEMPTS: usize = 4;

/// Command queue over sea-orm
pub struct SqlCommandStore {
    db: DatabaseConnection,
}

impl SqlCommandStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommandStore for SqlCommandStore {
    async fn create(&self, command: NewCommand) -> StorageResult<CommandModel> {
        let now = Utc::now();
        let active = CommandActiveModel {
            id: NotSet,
            device_id: Set(command.device_id),
            origin_device_id: Set(command.origin_device_id),
            network_id: Set(command.network_id),
            kind: Set(command.kind),
            priority: Set(command.priority),
            status: Set(CommandStatus::Pending),
            token: Set(correlation_token()),
            payload: Set(command.payload),
            response: NotSet,
            error_text: NotSet,
            retry_count: Set(0),
            max_retries: Set(command.max_retries),
            created_at: Set(Some(now)),
            dispatched_at: NotSet,
            completed_at: NotSet,
            updated_at: Set(Some(now)),
        };

        Ok(active.insert(&self.db).await?)
    }

    async fn find_by_id(&self, id: i32) -> StorageResult<Option<CommandModel>> {
        Ok(Command::find_by_id(id).one(&self.db).await?)
    }

    async fn claim_next_pending(
        &self,
        network_id: i32,
        poller_id: i32,
    ) -> StorageResult<Option<CommandModel>> {
        // Selection and the state flip are separate statements. The flip is
        // guarded on status, so when a concurrent poller wins the row the
        // affected count is zero and the next candidate is tried.
        for _ in 0..CLAIM_MAX_ATTEMPTS {
            let Some(candidate) = Command::find()
                .filter(CommandColumn::Status.eq(CommandStatus::Pending))
                .filter(CommandColumn::NetworkId.eq(network_id))
                .filter(
                    Condition::any()
                        .add(CommandColumn::OriginDeviceId.is_null())
                        .add(CommandColumn::OriginDeviceId.eq(poller_id)),
                )
                .order_by_desc(CommandColumn::Priority)
                .order_by_asc(CommandColumn::CreatedAt)
                .order_by_asc(CommandColumn::Id)
                .one(&self.db)
                .await?
            else {
                return Ok(None);
            };

            let now = Utc::now();
            let claimed = Command::update_many()
                .set(CommandActiveModel {
                    status: Set(CommandStatus::Processing),
                    dispatched_at: Set(Some(now)),
                    ..Default::default()
                })
                .filter(CommandColumn::Id.eq(candidate.id))
                .filter(CommandColumn::Status.eq(CommandStatus::Pending))
                .exec(&self.db)
                .await?;

            if claimed.rows_affected == 1 {
                return Ok(Some(CommandModel {
                    status: CommandStatus::Processing,
                    dispatched_at: Some(now),
                    ..candidate
                }));
            }
        }

        Ok(None)
    }

    async fn finalize(
        &self,
        id: i32,
        success: bool,
        response: Option<Json>,
        error_text: Option<String>,
    ) -> StorageResult<bool> {
        let status = if success {
            CommandStatus::Completed
        } else {
            CommandStatus::Failed
        };

        let result = Command::update_many()
            .set(CommandActiveModel {
                status: Set(status),
                response: Set(response),
                error_text: Set(error_text),
                completed_at: Set(Some(Utc::now())),
                ..Default::default()
            })
            .filter(CommandColumn::Id.eq(id))
            .filter(
                CommandColumn::Status
                    .is_in([CommandStatus::Pending, CommandStatus::Processing]),
            )
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    async fn find_stale_processing(
        &self,
        cutoff: DateTime<Utc>,
    ) -> StorageResult<Vec<CommandModel>> {
        Ok(Command::find()
            .filter(CommandColumn::Status.eq(CommandStatus::Processing))
            .filter(CommandColumn::DispatchedAt.lt(cutoff))
            .order_by_asc(CommandColumn::DispatchedAt)
            .all(&self.db)
            .await?)
    }

    async fn requeue(&self, command: &CommandModel) -> StorageResult<bool> {
        // The snapshot's retry_count is trustworthy under the status guard:
        // only a requeue bumps it, and a requeue flips status away from
        // processing first.
        let result = Command::update_many()
            .set(CommandActiveModel {
                status: Set(CommandStatus::Pending),
                retry_count: Set(command.retry_count + 1),
                dispatched_at: Set(None),
                ..Default::default()
            })
            .filter(CommandColumn::Id.eq(command.id))
            .filter(CommandColumn::Status.eq(CommandStatus::Processing))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    async fn time_out(&self, command: &CommandModel, error_text: &str) -> StorageResult<bool> {
        let result = Command::update_many()
            .set(CommandActiveModel {
                status: Set(CommandStatus::TimedOut),
                error_text: Set(Some(error_text.to_string())),
                completed_at: Set(Some(Utc::now())),
                ..Default::default()
            })
            .filter(CommandColumn::Id.eq(command.id))
            .filter(CommandColumn::Status.eq(CommandStatus::Processing))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }
}
