//! Inventory item domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{ItemId, ItemStatus, UserId};

use super::validate::{FieldIssue, check_len_range, check_max_len, check_non_negative};

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 120;
const SKU_MIN: usize = 2;
const SKU_MAX: usize = 80;
const SHORT_TEXT_MAX: usize = 80;
const NOTES_MAX: usize = 240;

/// An inventory item.
///
/// Items are globally visible to every authenticated user; `owner_id` only
/// scopes delete eligibility.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique item ID.
    pub id: ItemId,
    /// User who created the item.
    pub owner_id: UserId,
    /// Stock keeping unit, unique per owner.
    pub sku: String,
    /// Item name.
    pub name: String,
    /// Units on hand.
    pub quantity: i64,
    /// Low-stock threshold.
    pub min_stock: i64,
    /// Optional category label.
    pub category: Option<String>,
    /// Optional storage location.
    pub location: Option<String>,
    /// Optional free-form notes.
    pub notes: Option<String>,
    /// Lifecycle status.
    pub status: ItemStatus,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
    /// When the item was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemInput {
    pub name: String,
    pub sku: String,
    pub quantity: i64,
    /// Defaults to 0 when omitted.
    #[serde(default)]
    pub min_stock: i64,
    pub category: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    /// Defaults to ACTIVE when omitted.
    #[serde(default)]
    pub status: ItemStatus,
}

impl CreateItemInput {
    /// Validate the item fields.
    ///
    /// # Errors
    ///
    /// Returns one issue per offending field.
    pub fn validate(&self) -> Result<(), Vec<FieldIssue>> {
        let mut issues = Vec::new();

        check_len_range(&mut issues, "name", &self.name, NAME_MIN, NAME_MAX);
        check_len_range(&mut issues, "sku", &self.sku, SKU_MIN, SKU_MAX);
        check_non_negative(&mut issues, "quantity", self.quantity);
        check_non_negative(&mut issues, "minStock", self.min_stock);
        check_max_len(&mut issues, "category", self.category.as_deref(), SHORT_TEXT_MAX);
        check_max_len(&mut issues, "location", self.location.as_deref(), SHORT_TEXT_MAX);
        check_max_len(&mut issues, "notes", self.notes.as_deref(), NOTES_MAX);

        if issues.is_empty() { Ok(()) } else { Err(issues) }
    }
}

/// Input for a partial item update.
///
/// Every field is optional; present fields obey the same constraints as
/// create. Absent and `null` optional-text fields are indistinguishable
/// here, so a PATCH cannot clear `category`/`location`/`notes` to null
/// while setting them to a new value works.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemInput {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub quantity: Option<i64>,
    pub min_stock: Option<i64>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub status: Option<ItemStatus>,
}

impl UpdateItemInput {
    /// Validate the provided fields.
    ///
    /// # Errors
    ///
    /// Returns one issue per offending field.
    pub fn validate(&self) -> Result<(), Vec<FieldIssue>> {
        let mut issues = Vec::new();

        if let Some(name) = &self.name {
            check_len_range(&mut issues, "name", name, NAME_MIN, NAME_MAX);
        }
        if let Some(sku) = &self.sku {
            check_len_range(&mut issues, "sku", sku, SKU_MIN, SKU_MAX);
        }
        if let Some(quantity) = self.quantity {
            check_non_negative(&mut issues, "quantity", quantity);
        }
        if let Some(min_stock) = self.min_stock {
            check_non_negative(&mut issues, "minStock", min_stock);
        }
        check_max_len(&mut issues, "category", self.category.as_deref(), SHORT_TEXT_MAX);
        check_max_len(&mut issues, "location", self.location.as_deref(), SHORT_TEXT_MAX);
        check_max_len(&mut issues, "notes", self.notes.as_deref(), NOTES_MAX);

        if issues.is_empty() { Ok(()) } else { Err(issues) }
    }
}
