use uuid::Uuid;

use crate::{api::error, modules::user::model::InsertUser, modules::user::schema::UserEntity};

#[async_trait::async_trait]
pub trait UserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserEntity>, error::SystemError>;

    /// Case-insensitive exact match.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, error::SystemError>;

    async fn create(&self, user: &InsertUser) -> Result<UserEntity, error::SystemError>;

    /// Users whose name contains `query` (case-insensitive), ordered by name.
    async fn search_by_name(
        &self,
        query: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserEntity>, error::SystemError>;

    async fn count_by_name(&self, query: &str) -> Result<i64, error::SystemError>;
}
