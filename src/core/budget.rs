//! Budget business logic - line totals, event summaries and budget item mutations.
//!
//! Every budget item mutation re-synchronizes the event, since the presence of
//! budget lines is what moves an event into `geracao_orcamento`.

use crate::{
    core::progress::sync_event_progress,
    entities::{BudgetItem, Event, budget_item},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Fields accepted when creating a budget item.
#[derive(Debug, Clone, Default)]
pub struct NewBudgetItem {
    /// Event the line is budgeted for
    pub event_id: i64,
    /// Category
    pub category: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Number of units
    pub quantity: Option<f64>,
    /// Price per unit
    pub unit_value: Option<f64>,
    /// Explicit total, overrides quantity times unit value when positive
    pub total_value: Option<f64>,
    /// Supplier
    pub supplier: Option<String>,
    /// Owning team
    pub team_id: Option<i64>,
}

/// Aggregated amounts of a set of budget items.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BudgetTotals {
    /// Sum of every line
    pub total: f64,
    /// Sum of approved lines
    pub approved: f64,
    /// Sum of lines not yet approved
    pub pending: f64,
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Total of one budget line.
///
/// The stored total wins when it is a positive number; otherwise quantity times
/// unit value, with missing or non-numeric values counting as zero.
#[must_use]
pub fn line_total(total_value: Option<f64>, quantity: Option<f64>, unit_value: Option<f64>) -> f64 {
    match total_value {
        Some(stored) if stored.is_finite() && stored > 0.0 => stored,
        _ => finite_or_zero(quantity) * finite_or_zero(unit_value),
    }
}

/// Total of a stored budget item, see [`line_total`].
#[must_use]
pub fn effective_total(item: &budget_item::Model) -> f64 {
    line_total(item.total_value, item.quantity, item.unit_value)
}

/// Sums budget items into overall, approved and pending amounts.
#[must_use]
pub fn summarize(items: &[budget_item::Model]) -> BudgetTotals {
    let (total, approved) = items.iter().fold((0.0, 0.0), |(total, approved), item| {
        let line = effective_total(item);
        (total + line, if item.approved { approved + line } else { approved })
    });

    BudgetTotals {
        total,
        approved,
        pending: total - approved,
    }
}

fn validate_amount(field: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => {
            Err(Error::validation(format!("Invalid {field}: {v}")))
        }
        _ => Ok(()),
    }
}

/// Creates a budget item and re-synchronizes its event.
///
/// Only an explicit total is stored; otherwise [`effective_total`] derives it from
/// quantity and unit value. A given quantity must be positive.
pub async fn create_budget_item(
    db: &DatabaseConnection,
    new: NewBudgetItem,
) -> Result<budget_item::Model> {
    if let Some(quantity) = new.quantity {
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(Error::validation(format!("Invalid quantity: {quantity}")));
        }
    }
    validate_amount("unit value", new.unit_value)?;
    validate_amount("total value", new.total_value)?;

    Event::find_by_id(new.event_id)
        .one(db)
        .await?
        .ok_or(Error::EventNotFound { id: new.event_id })?;

    let now = Utc::now();
    let total = line_total(new.total_value, new.quantity, new.unit_value);
    let item = budget_item::ActiveModel {
        event_id: Set(new.event_id),
        category: Set(super::non_blank(new.category)),
        description: Set(super::non_blank(new.description)),
        quantity: Set(new.quantity),
        unit_value: Set(new.unit_value),
        total_value: Set(new.total_value),
        supplier: Set(super::non_blank(new.supplier)),
        approved: Set(false),
        team_id: Set(new.team_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = item.insert(db).await?;
    info!(
        "Created budget item {} ({:.2}) for event {}",
        created.id, total, created.event_id
    );

    let _ = sync_event_progress(db, Some(created.event_id)).await;
    Ok(created)
}

/// Marks a budget line as approved or not and re-synchronizes its event.
pub async fn set_budget_item_approved(
    db: &DatabaseConnection,
    item_id: i64,
    approved: bool,
) -> Result<budget_item::Model> {
    let item = BudgetItem::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or(Error::BudgetItemNotFound { id: item_id })?;

    let mut item: budget_item::ActiveModel = item.into();
    item.approved = Set(approved);
    item.updated_at = Set(Utc::now());
    let updated = item.update(db).await?;

    let _ = sync_event_progress(db, Some(updated.event_id)).await;
    Ok(updated)
}

/// Deletes a budget item and re-synchronizes its event.
pub async fn delete_budget_item(db: &DatabaseConnection, item_id: i64) -> Result<()> {
    let item = BudgetItem::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or(Error::BudgetItemNotFound { id: item_id })?;
    let event_id = item.event_id;

    item.delete(db).await?;
    info!("Deleted budget item {} from event {}", item_id, event_id);

    let _ = sync_event_progress(db, Some(event_id)).await;
    Ok(())
}

/// Budget items of an event, newest first.
pub async fn get_budget_items_for_event(
    db: &DatabaseConnection,
    event_id: i64,
) -> Result<Vec<budget_item::Model>> {
    BudgetItem::find()
        .filter(budget_item::Column::EventId.eq(event_id))
        .order_by_desc(budget_item::Column::CreatedAt)
        .order_by_desc(budget_item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Totals of an event's budget.
pub async fn budget_totals_for_event(db: &DatabaseConnection, event_id: i64) -> Result<BudgetTotals> {
    let items = get_budget_items_for_event(db, event_id).await?;
    Ok(summarize(&items))
}
