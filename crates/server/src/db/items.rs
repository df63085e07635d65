//! Item repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use stockroom_core::{ItemId, ItemStatus, UserId};

use super::RepositoryError;
use crate::models::{CreateItemInput, Item, UpdateItemInput};

/// Internal row type for item queries.
#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: i64,
    owner_id: i64,
    sku: String,
    name: String,
    quantity: i64,
    min_stock: i64,
    category: Option<String>,
    location: Option<String>,
    notes: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ItemRow> for Item {
    type Error = RepositoryError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let status: ItemStatus = row.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid status in database: {e}"))
        })?;

        Ok(Self {
            id: ItemId::new(row.id),
            owner_id: UserId::new(row.owner_id),
            sku: row.sku,
            name: row.name,
            quantity: row.quantity,
            min_stock: row.min_stock,
            category: row.category,
            location: row.location,
            notes: row.notes,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const ITEM_COLUMNS: &str =
    "id, owner_id, sku, name, quantity, min_stock, category, location, notes, status, \
     created_at, updated_at";

/// Repository for item database operations.
pub struct ItemRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ItemRepository<'a> {
    /// Create a new item repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List every item, most recently updated first.
    ///
    /// Visibility is global: no owner filtering.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Item>, RepositoryError> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items ORDER BY updated_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Item::try_from).collect()
    }

    /// Create a new item owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if this owner already has an item
    /// with the same SKU.
    pub async fn create(
        &self,
        owner: UserId,
        input: &CreateItemInput,
    ) -> Result<Item, RepositoryError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "INSERT INTO items \
             (owner_id, sku, name, quantity, min_stock, category, location, notes, status, \
              created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10) \
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(owner.as_i64())
        .bind(&input.sku)
        .bind(&input.name)
        .bind(input.quantity)
        .bind(input.min_stock)
        .bind(&input.category)
        .bind(&input.location)
        .bind(&input.notes)
        .bind(input.status.as_str())
        .bind(now)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique_violation(e, "sku already exists"))?;

        row.try_into()
    }

    /// Apply a partial update to an item and bump its updated timestamp.
    ///
    /// Returns `None` if no item has this id. Last write wins; there is no
    /// version token, so two concurrent updates silently overwrite each
    /// other at the field level.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a SKU change collides with an
    /// existing (owner, sku) pair.
    pub async fn update(
        &self,
        id: ItemId,
        input: &UpdateItemInput,
    ) -> Result<Option<Item>, RepositoryError> {
        let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new("UPDATE items SET updated_at = ");
        qb.push_bind(Utc::now());

        if let Some(name) = &input.name {
            qb.push(", name = ").push_bind(name);
        }
        if let Some(sku) = &input.sku {
            qb.push(", sku = ").push_bind(sku);
        }
        if let Some(quantity) = input.quantity {
            qb.push(", quantity = ").push_bind(quantity);
        }
        if let Some(min_stock) = input.min_stock {
            qb.push(", min_stock = ").push_bind(min_stock);
        }
        if let Some(category) = &input.category {
            qb.push(", category = ").push_bind(category);
        }
        if let Some(location) = &input.location {
            qb.push(", location = ").push_bind(location);
        }
        if let Some(notes) = &input.notes {
            qb.push(", notes = ").push_bind(notes);
        }
        if let Some(status) = input.status {
            qb.push(", status = ").push_bind(status.as_str());
        }

        qb.push(" WHERE id = ").push_bind(id.as_i64());
        qb.push(format!(" RETURNING {ITEM_COLUMNS}"));

        let row = qb
            .build_query_as::<ItemRow>()
            .fetch_optional(self.pool)
            .await
            .map_err(|e| RepositoryError::from_unique_violation(e, "sku already exists"))?;

        row.map(Item::try_from).transpose()
    }

    /// Delete an item, scoped to its owner.
    ///
    /// Returns `false` both when the id does not exist and when it belongs
    /// to a different owner; callers cannot distinguish the two.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ItemId, owner: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?1 AND owner_id = ?2")
            .bind(id.as_i64())
            .bind(owner.as_i64())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::UserRepository;
    use stockroom_core::{Email, Role};

    async fn seed_user(pool: &SqlitePool, email: &str) -> UserId {
        UserRepository::new(pool)
            .create(&Email::parse(email).unwrap(), None, "hash", Role::Admin)
            .await
            .unwrap()
            .id
    }

    fn widget() -> CreateItemInput {
        CreateItemInput {
            name: "Widget".to_owned(),
            sku: "W-1".to_owned(),
            quantity: 5,
            min_stock: 2,
            category: Some("hardware".to_owned()),
            location: None,
            notes: None,
            status: ItemStatus::Active,
        }
    }

    #[sqlx::test]
    async fn test_create_round_trips_fields(pool: SqlitePool) {
        let owner = seed_user(&pool, "a@x.com").await;
        let repo = ItemRepository::new(&pool);

        let item = repo.create(owner, &widget()).await.unwrap();
        assert_eq!(item.owner_id, owner);
        assert_eq!(item.sku, "W-1");
        assert_eq!(item.quantity, 5);
        assert_eq!(item.min_stock, 2);
        assert_eq!(item.category.as_deref(), Some("hardware"));
        assert_eq!(item.status, ItemStatus::Active);

        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed.first().unwrap().id, item.id);
    }

    #[sqlx::test]
    async fn test_duplicate_sku_same_owner_conflicts(pool: SqlitePool) {
        let owner = seed_user(&pool, "a@x.com").await;
        let repo = ItemRepository::new(&pool);

        repo.create(owner, &widget()).await.unwrap();
        let err = repo.create(owner, &widget()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[sqlx::test]
    async fn test_same_sku_different_owner_is_allowed(pool: SqlitePool) {
        let a = seed_user(&pool, "a@x.com").await;
        let b = seed_user(&pool, "b@x.com").await;
        let repo = ItemRepository::new(&pool);

        repo.create(a, &widget()).await.unwrap();
        assert!(repo.create(b, &widget()).await.is_ok());
    }

    #[sqlx::test]
    async fn test_update_applies_given_fields_only(pool: SqlitePool) {
        let owner = seed_user(&pool, "a@x.com").await;
        let repo = ItemRepository::new(&pool);
        let item = repo.create(owner, &widget()).await.unwrap();

        let updated = repo
            .update(
                item.id,
                &UpdateItemInput {
                    quantity: Some(1),
                    ..UpdateItemInput::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.quantity, 1);
        assert_eq!(updated.name, "Widget");
        assert_eq!(updated.sku, "W-1");
        assert!(updated.updated_at >= item.updated_at);
    }

    #[sqlx::test]
    async fn test_update_missing_id_is_none(pool: SqlitePool) {
        let repo = ItemRepository::new(&pool);
        let result = repo
            .update(ItemId::new(999), &UpdateItemInput::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[sqlx::test]
    async fn test_list_orders_by_most_recently_updated(pool: SqlitePool) {
        let owner = seed_user(&pool, "a@x.com").await;
        let repo = ItemRepository::new(&pool);

        let first = repo.create(owner, &widget()).await.unwrap();
        let second = repo
            .create(
                owner,
                &CreateItemInput {
                    sku: "W-2".to_owned(),
                    ..widget()
                },
            )
            .await
            .unwrap();

        // Touch the first item so it becomes the most recent.
        repo.update(
            first.id,
            &UpdateItemInput {
                quantity: Some(9),
                ..UpdateItemInput::default()
            },
        )
        .await
        .unwrap();

        let listed = repo.list().await.unwrap();
        let ids: Vec<_> = listed.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[sqlx::test]
    async fn test_delete_is_owner_scoped(pool: SqlitePool) {
        let a = seed_user(&pool, "a@x.com").await;
        let b = seed_user(&pool, "b@x.com").await;
        let repo = ItemRepository::new(&pool);
        let item = repo.create(a, &widget()).await.unwrap();

        // Another owner's delete affects nothing.
        assert!(!repo.delete(item.id, b).await.unwrap());
        assert_eq!(repo.list().await.unwrap().len(), 1);

        assert!(repo.delete(item.id, a).await.unwrap());
        assert!(repo.list().await.unwrap().is_empty());

        // Repeating the delete reports nothing removed.
        assert!(!repo.delete(item.id, a).await.unwrap());
    }
}
