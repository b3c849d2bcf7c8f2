//! Generic repository base for SeaORM entities with UUID primary keys.
//!
//! Domain crates wrap [`BaseRepository`] to share the common CRUD plumbing
//! (insert, find, update, delete) while keeping entity-specific queries in
//! their own repositories.

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    PrimaryKeyTrait,
};
use std::marker::PhantomData;
use uuid::Uuid;

/// Generic repository over a SeaORM entity with a UUID primary key.
///
/// # Example
/// ```ignore
/// use database::BaseRepository;
///
/// pub struct PgUserRepository {
///     base: BaseRepository<entity::Entity>,
/// }
///
/// impl PgUserRepository {
///     pub fn new(db: DatabaseConnection) -> Self {
///         Self { base: BaseRepository::new(db) }
///     }
/// }
/// ```
pub struct BaseRepository<E: EntityTrait> {
    db: DatabaseConnection,
    _entity: PhantomData<E>,
}

impl<E> BaseRepository<E>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
    E::Model: IntoActiveModel<E::ActiveModel>,
    E::ActiveModel: ActiveModelBehavior<Entity = E> + Send,
{
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    /// Access the underlying connection for entity-specific queries.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Insert a new record and return the stored model.
    pub async fn insert(&self, model: E::ActiveModel) -> Result<E::Model, DbErr> {
        model.insert(&self.db).await
    }

    /// Find a record by its UUID primary key.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<E::Model>, DbErr> {
        E::find_by_id(id).one(&self.db).await
    }

    /// Fetch all records of this entity.
    pub async fn find_all(&self) -> Result<Vec<E::Model>, DbErr> {
        E::find().all(&self.db).await
    }

    /// Check whether a record with the given id exists.
    pub async fn exists_by_id(&self, id: Uuid) -> Result<bool, DbErr> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    /// Update an existing record and return the stored model.
    ///
    /// The active model must carry the primary key as a set value.
    pub async fn update(&self, model: E::ActiveModel) -> Result<E::Model, DbErr> {
        model.update(&self.db).await
    }

    /// Delete a record by id, returning the number of rows affected.
    pub async fn delete_by_id(&self, id: Uuid) -> Result<u64, DbErr> {
        let result = E::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}
