//! Generic, tenant-aware data access for every museum-scoped entity.
//!
//! One repository serves all entity types through the capability traits in
//! [`super::capabilities`]. Reads hand back owned, detached models; nothing is
//! written unless one of the explicit write calls is made. Each call on a
//! `MuseumRepo<DatabaseConnection>` commits on its own. Use [`MuseumRepo::begin`]
//! to group several writes into one atomic unit of work.

use super::capabilities::{IdentifiedEntity, MuseumOwned, MuseumScopedEntity};
use entity::museum;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, Value,
};
use thiserror::Error;

pub type ModelOf<E> = <E as EntityTrait>::Model;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: String, id: String },

    #[error("more than one {entity} row has id {id}")]
    DuplicateIdentity { entity: String, id: i32 },

    #[error("row belongs to museum {found:?}, expected museum {expected}")]
    TenantMismatch { expected: i32, found: Option<i32> },

    #[error(transparent)]
    Db(#[from] DbErr),
}

#[derive(Debug, Clone, Default)]
pub struct MuseumRepo<C = DatabaseConnection> {
    pub db_session: C,
}

impl MuseumRepo<DatabaseConnection> {
    pub fn new(db_session: DatabaseConnection) -> Self {
        Self { db_session }
    }

    /// Opens a unit of work. Nothing written through the returned repository
    /// is visible to other connections until [`MuseumRepo::commit`].
    pub async fn begin(&self) -> Result<MuseumRepo<DatabaseTransaction>, RepoError> {
        let txn = self.db_session.begin().await?;
        Ok(MuseumRepo { db_session: txn })
    }
}

impl MuseumRepo<DatabaseTransaction> {
    pub async fn commit(self) -> Result<(), RepoError> {
        self.db_session.commit().await?;
        Ok(())
    }

    pub async fn rollback(self) -> Result<(), RepoError> {
        self.db_session.rollback().await?;
        Ok(())
    }
}

fn entity_name<E: EntityTrait>() -> String {
    E::default().table_name().to_string()
}

fn describe_key(value: ActiveValue<Value>) -> String {
    match value.into_value() {
        Some(Value::Int(Some(id))) => id.to_string(),
        Some(other) => format!("{other:?}"),
        None => "unset".to_string(),
    }
}

impl<C: ConnectionTrait> MuseumRepo<C> {
    /// Persists a new row and returns it with its generated identity.
    pub async fn insert<A>(&self, active_model: A) -> Result<ModelOf<A::Entity>, RepoError>
    where
        A: ActiveModelTrait + ActiveModelBehavior + Send,
        ModelOf<A::Entity>: IntoActiveModel<A>,
    {
        Ok(active_model.insert(&self.db_session).await?)
    }

    /// Inserts a row on behalf of `museum`. An unset `museum_id` is filled in;
    /// one naming any other museum is rejected.
    pub async fn insert_scoped<A>(
        &self,
        museum: &museum::Model,
        mut active_model: A,
    ) -> Result<ModelOf<A::Entity>, RepoError>
    where
        A: ActiveModelTrait + ActiveModelBehavior + Send,
        A::Entity: MuseumScopedEntity,
        ModelOf<A::Entity>: IntoActiveModel<A>,
    {
        let column = A::Entity::museum_column();
        match active_model.get(column) {
            ActiveValue::Set(value) | ActiveValue::Unchanged(value) => {
                let found = match value {
                    Value::Int(id) => id,
                    _ => None,
                };
                if found != Some(museum.id) {
                    return Err(RepoError::TenantMismatch {
                        expected: museum.id,
                        found,
                    });
                }
            }
            ActiveValue::NotSet => active_model.set(column, museum.id.into()),
        }
        self.insert(active_model).await
    }

    /// Any one row of the entity, or `None` when the table is empty.
    pub async fn get_first_entity<E: EntityTrait>(&self) -> Result<Option<ModelOf<E>>, RepoError> {
        Ok(E::find().one(&self.db_session).await?)
    }

    /// The row with identity `id`, regardless of museum.
    pub async fn get_entity<E: IdentifiedEntity>(
        &self,
        id: i32,
    ) -> Result<Option<ModelOf<E>>, RepoError> {
        let mut rows = E::find()
            .filter(E::id_column().eq(id))
            .limit(2u64)
            .all(&self.db_session)
            .await?;
        if rows.len() > 1 {
            return Err(RepoError::DuplicateIdentity {
                entity: entity_name::<E>(),
                id,
            });
        }
        Ok(rows.pop())
    }

    /// The row with identity `id` if, and only if, it belongs to `museum`.
    pub async fn get_scoped_entity<E: MuseumScopedEntity>(
        &self,
        museum: &museum::Model,
        id: i32,
    ) -> Result<Option<ModelOf<E>>, RepoError> {
        Ok(E::find()
            .filter(E::id_column().eq(id))
            .filter(E::museum_column().eq(museum.id))
            .one(&self.db_session)
            .await?)
    }

    pub async fn get_entities<E: MuseumScopedEntity>(
        &self,
        museum: &museum::Model,
    ) -> Result<Vec<ModelOf<E>>, RepoError> {
        Ok(E::find()
            .filter(E::museum_column().eq(museum.id))
            .all(&self.db_session)
            .await?)
    }

    /// Every row of the entity, ordered by id. Used for global reference data.
    pub async fn get_all_entities_as_no_tracking<E: IdentifiedEntity>(
        &self,
    ) -> Result<Vec<ModelOf<E>>, RepoError> {
        Ok(E::find()
            .order_by_asc(E::id_column())
            .all(&self.db_session)
            .await?)
    }

    /// The museum's rows ordered by id, for rendering.
    pub async fn get_entities_as_no_tracking<E: MuseumScopedEntity>(
        &self,
        museum: &museum::Model,
    ) -> Result<Vec<ModelOf<E>>, RepoError> {
        Ok(E::find()
            .filter(E::museum_column().eq(museum.id))
            .order_by_asc(E::id_column())
            .all(&self.db_session)
            .await?)
    }

    /// The museum that owns `owned`.
    pub async fn get_museum<M: MuseumOwned>(&self, owned: &M) -> Result<museum::Model, RepoError> {
        museum::Entity::find_by_id(owned.museum_id())
            .one(&self.db_session)
            .await?
            .ok_or_else(|| RepoError::NotFound {
                entity: entity_name::<museum::Entity>(),
                id: owned.museum_id().to_string(),
            })
    }

    /// Existence check that counts instead of loading the row.
    pub async fn entity_exists<E: IdentifiedEntity>(&self, id: i32) -> Result<bool, RepoError> {
        let count = E::find()
            .filter(E::id_column().eq(id))
            .count(&self.db_session)
            .await?;
        Ok(count > 0)
    }

    /// Writes every column of the row back, whichever fields changed.
    pub async fn update<A>(&self, active_model: A) -> Result<ModelOf<A::Entity>, RepoError>
    where
        A: ActiveModelTrait + ActiveModelBehavior + Send,
        A::Entity: IdentifiedEntity,
        ModelOf<A::Entity>: IntoActiveModel<A>,
    {
        let active_model = active_model.reset_all();
        let id = describe_key(active_model.get(A::Entity::id_column()));
        match active_model.update(&self.db_session).await {
            Ok(model) => Ok(model),
            Err(DbErr::RecordNotUpdated) => Err(RepoError::NotFound {
                entity: entity_name::<A::Entity>(),
                id,
            }),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn delete<A>(&self, active_model: A) -> Result<u64, RepoError>
    where
        A: ActiveModelTrait + ActiveModelBehavior + Send,
        A::Entity: IdentifiedEntity,
    {
        let id = describe_key(active_model.get(A::Entity::id_column()));
        let result = active_model.delete(&self.db_session).await?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound {
                entity: entity_name::<A::Entity>(),
                id,
            });
        }
        Ok(result.rows_affected)
    }

    /// Deletes by identity. A missing id is an error, never a silent no-op.
    pub async fn delete_by_id<E: IdentifiedEntity>(&self, id: i32) -> Result<u64, RepoError> {
        if self.get_entity::<E>(id).await?.is_none() {
            return Err(RepoError::NotFound {
                entity: entity_name::<E>(),
                id: id.to_string(),
            });
        }
        let result = E::delete_many()
            .filter(E::id_column().eq(id))
            .exec(&self.db_session)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn delete_scoped<E: MuseumScopedEntity>(
        &self,
        museum: &museum::Model,
        id: i32,
    ) -> Result<u64, RepoError> {
        let result = E::delete_many()
            .filter(E::id_column().eq(id))
            .filter(E::museum_column().eq(museum.id))
            .exec(&self.db_session)
            .await?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound {
                entity: entity_name::<E>(),
                id: id.to_string(),
            });
        }
        Ok(result.rows_affected)
    }

    /// Rows matching `condition`, for association tables without an identity column.
    pub async fn get_matching<E: EntityTrait>(
        &self,
        condition: Condition,
    ) -> Result<Vec<ModelOf<E>>, RepoError> {
        Ok(E::find().filter(condition).all(&self.db_session).await?)
    }

    /// Deletes association rows matching `condition`; zero matches is not an error.
    pub async fn delete_matching<E: EntityTrait>(&self, condition: Condition) -> Result<u64, RepoError> {
        let result = E::delete_many()
            .filter(condition)
            .exec(&self.db_session)
            .await?;
        Ok(result.rows_affected)
    }
}
