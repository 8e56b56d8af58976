use std::collections::BTreeSet;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Result};
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{pooled_connection::bb8::Pool, AsyncConnection, AsyncPgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use picking_core::{build_plan, OrderInput, PickPlan, SkippedLine};

use crate::models::*;
use crate::schema::*;

type DbPool = Pool<AsyncPgConnection>;

pub const DEFAULT_MAX_ITEMS: i32 = 50;
pub const RECENT_LIST_LIMIT: i64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PickingStrategy {
    Single,
    #[default]
    Batch,
    // Accepted for compatibility; falls through to the default ordering.
    Zone,
}

impl PickingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PickingStrategy::Single => "SINGLE",
            PickingStrategy::Batch => "BATCH",
            PickingStrategy::Zone => "ZONE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PickPriority {
    #[default]
    Fifo,
    Priority,
    Customer,
}

impl PickPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            PickPriority::Fifo => "FIFO",
            PickPriority::Priority => "PRIORITY",
            PickPriority::Customer => "CUSTOMER",
        }
    }
}

/// Wire format of `POST /api/picking/generate`. Every field is optional on
/// the wire; defaults match the original endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateRequest {
    pub order_ids: Option<Vec<Uuid>>,
    pub max_items: i32,
    pub picking_strategy: PickingStrategy,
    pub priority: PickPriority,
    pub assign_to: Option<String>,
}

impl Default for GenerateRequest {
    fn default() -> Self {
        Self {
            order_ids: None,
            max_items: DEFAULT_MAX_ITEMS,
            picking_strategy: PickingStrategy::default(),
            priority: PickPriority::default(),
            assign_to: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("No allocated orders found")]
    NoCandidateOrders,
    #[error("No pick items could be generated")]
    NothingToPick(Vec<SkippedLine>),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedItem {
    pub pick_sequence: i32,
    pub order_number: String,
    pub sku: String,
    pub location: String,
    pub zone: String,
    pub quantity_to_pick: i32,
}

#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub pick_list_id: Uuid,
    pub batch_number: String,
    pub status: String,
    pub assigned_to: Option<String>,
    pub total_items: i32,
    pub items: Vec<GeneratedItem>,
    pub skipped: Vec<SkippedLine>,
}

#[derive(Debug, Clone)]
pub struct PickListOverview {
    pub pick_list: PickList,
    pub progress_percent: i32,
}

pub struct PickListGenerator {
    pool: DbPool,
}

impl PickListGenerator {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Runs the whole generation flow: load candidates, plan, persist.
    ///
    /// Per-line shortfalls are carried through as warnings; only an empty
    /// candidate set, an empty plan, or a failed write transaction is an
    /// error. Reads happen outside the transaction; the conditional
    /// reservation updates inside it catch any generator that raced us.
    pub async fn generate(
        &self,
        request: &GenerateRequest,
        generated_by: &str,
    ) -> Result<GenerationOutcome, GenerateError> {
        let candidates = self.load_candidate_orders(request).await?;
        if candidates.is_empty() {
            return Err(GenerateError::NoCandidateOrders);
        }

        let inputs = self.load_order_inputs(&candidates).await?;
        let plan = build_plan(&inputs, request.max_items);

        for line in &plan.skipped {
            warn!(sku = %line.sku, reason = %line.reason, "pick line skipped");
        }
        if plan.tasks.is_empty() {
            return Err(GenerateError::NothingToPick(plan.skipped));
        }

        let outcome = self.persist_plan(&plan, request, generated_by).await?;
        info!(
            batch = %outcome.batch_number,
            items = outcome.total_items,
            skipped = outcome.skipped.len(),
            "pick list generated"
        );
        Ok(outcome)
    }

    async fn load_candidate_orders(&self, request: &GenerateRequest) -> Result<Vec<Order>> {
        let mut conn = self.pool.get().await?;

        let mut query = orders::table
            .filter(orders::status.eq("ALLOCATED"))
            .into_boxed();

        if let Some(ids) = &request.order_ids {
            query = query.filter(orders::id.eq_any(ids.clone()));
        }

        query = match request.priority {
            PickPriority::Fifo => query.order(orders::created_at.asc()),
            _ => query.order(orders::total_amount.desc()),
        };

        if request.picking_strategy == PickingStrategy::Single {
            query = query.limit(1);
        }

        Ok(query.load::<Order>(&mut conn).await?)
    }

    async fn load_order_inputs(&self, candidates: &[Order]) -> Result<Vec<OrderInput>> {
        let mut conn = self.pool.get().await?;
        let ids: Vec<Uuid> = candidates.iter().map(|o| o.id).collect();

        let items = order_items::table
            .filter(order_items::order_id.eq_any(&ids))
            .load::<OrderItem>(&mut conn)
            .await?;

        let backs = back_orders::table
            .filter(back_orders::order_id.eq_any(&ids))
            .filter(back_orders::status.eq("ALLOCATED"))
            .load::<BackOrder>(&mut conn)
            .await?;

        let reservations = inventory_reservations::table
            .filter(inventory_reservations::order_id.eq_any(&ids))
            .filter(inventory_reservations::status.eq("ACTIVE"))
            .load::<InventoryReservation>(&mut conn)
            .await?;

        Ok(candidates
            .iter()
            .map(|order| OrderInput {
                order_id: order.id,
                order_number: order.order_number.clone(),
                lines: items
                    .iter()
                    .filter(|i| i.order_id == order.id)
                    .map(Into::into)
                    .collect(),
                back_orders: backs
                    .iter()
                    .filter(|b| b.order_id == order.id)
                    .map(Into::into)
                    .collect(),
                reservations: reservations
                    .iter()
                    .filter(|r| r.order_id == order.id)
                    .map(Into::into)
                    .collect(),
            })
            .collect())
    }

    async fn persist_plan(
        &self,
        plan: &PickPlan,
        request: &GenerateRequest,
        generated_by: &str,
    ) -> Result<GenerationOutcome> {
        let mut conn = self.pool.get().await?;

        let pick_list_id = Uuid::new_v4();
        let batch_number = batch_number_now();
        let status = if request.assign_to.is_some() {
            "ASSIGNED"
        } else {
            "PENDING"
        };

        let new_list = NewPickList {
            id: pick_list_id,
            batch_number: batch_number.clone(),
            status: status.to_string(),
            assigned_to: request.assign_to.clone(),
            total_items: plan.tasks.len() as i32,
            notes: Some(format!(
                "strategy={} priority={}",
                request.picking_strategy.as_str(),
                request.priority.as_str()
            )),
        };

        let new_items: Vec<NewPickListItem> = plan
            .tasks
            .iter()
            .enumerate()
            .map(|(i, task)| NewPickListItem {
                id: Uuid::new_v4(),
                pick_list_id,
                order_id: task.order_id,
                product_variant_id: task.product_variant_id,
                sku: task.sku.clone(),
                location: task.location.clone(),
                quantity_to_pick: task.quantity_to_pick,
                pick_sequence: (i + 1) as i32,
            })
            .collect();

        let touched_orders: Vec<Uuid> = plan
            .tasks
            .iter()
            .map(|t| t.order_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let skipped_skus: Vec<String> = plan.skipped.iter().map(|s| s.sku.clone()).collect();
        let event = NewPickEvent {
            id: Uuid::new_v4(),
            pick_list_id,
            event_type: "PICK_STARTED".to_string(),
            payload: serde_json::json!({
                "batchNumber": batch_number,
                "totalItems": new_items.len(),
                "skippedSkus": skipped_skus,
                "generatedBy": generated_by,
            }),
        };

        let tasks = plan.tasks.clone();
        conn.transaction::<_, anyhow::Error, _>(|conn| {
            Box::pin(async move {
                // Conditional consumption: the read-time quantity acts as a
                // version stamp. Zero rows updated means another generator
                // drew from this reservation since we read it.
                for task in &tasks {
                    let updated = if task.quantity_to_pick == task.reservation_quantity {
                        diesel::update(
                            inventory_reservations::table
                                .filter(inventory_reservations::id.eq(task.reservation_id))
                                .filter(inventory_reservations::status.eq("ACTIVE"))
                                .filter(inventory_reservations::quantity.eq(task.reservation_quantity)),
                        )
                        .set(inventory_reservations::status.eq("CONSUMED"))
                        .execute(conn)
                        .await?
                    } else {
                        diesel::update(
                            inventory_reservations::table
                                .filter(inventory_reservations::id.eq(task.reservation_id))
                                .filter(inventory_reservations::status.eq("ACTIVE"))
                                .filter(inventory_reservations::quantity.eq(task.reservation_quantity)),
                        )
                        .set(
                            inventory_reservations::quantity
                                .eq(inventory_reservations::quantity - task.quantity_to_pick),
                        )
                        .execute(conn)
                        .await?
                    };

                    if updated == 0 {
                        return Err(anyhow!(
                            "reservation {} changed concurrently",
                            task.reservation_id
                        ));
                    }
                }

                diesel::insert_into(pick_lists::table)
                    .values(&new_list)
                    .execute(conn)
                    .await?;

                diesel::insert_into(pick_list_items::table)
                    .values(&new_items)
                    .execute(conn)
                    .await?;

                diesel::update(orders::table.filter(orders::id.eq_any(&touched_orders)))
                    .set((
                        orders::status.eq("PICKING"),
                        orders::updated_at.eq(Some(Utc::now())),
                    ))
                    .execute(conn)
                    .await?;

                diesel::update(
                    back_orders::table
                        .filter(back_orders::order_id.eq_any(&touched_orders))
                        .filter(back_orders::status.eq("ALLOCATED")),
                )
                .set(back_orders::status.eq("PICKING"))
                .execute(conn)
                .await?;

                diesel::insert_into(pick_events::table)
                    .values(&event)
                    .execute(conn)
                    .await?;

                Ok(())
            })
        })
        .await?;

        let items = plan
            .tasks
            .iter()
            .enumerate()
            .map(|(i, task)| GeneratedItem {
                pick_sequence: (i + 1) as i32,
                order_number: task.order_number.clone(),
                sku: task.sku.clone(),
                location: task.location.clone(),
                zone: task.zone.clone(),
                quantity_to_pick: task.quantity_to_pick,
            })
            .collect();

        Ok(GenerationOutcome {
            pick_list_id,
            batch_number,
            status: status.to_string(),
            assigned_to: request.assign_to.clone(),
            total_items: plan.tasks.len() as i32,
            items,
            skipped: plan.skipped.clone(),
        })
    }

    /// Latest pick lists with a coarse completion figure, newest first.
    pub async fn list_recent(
        &self,
        status: Option<String>,
        assigned_to: Option<String>,
    ) -> Result<Vec<PickListOverview>> {
        let mut conn = self.pool.get().await?;

        let mut query = pick_lists::table.into_boxed();
        if let Some(status) = status {
            query = query.filter(pick_lists::status.eq(status));
        }
        if let Some(assigned_to) = assigned_to {
            query = query.filter(pick_lists::assigned_to.eq(assigned_to));
        }

        let lists = query
            .order(pick_lists::created_at.desc())
            .limit(RECENT_LIST_LIMIT)
            .load::<PickList>(&mut conn)
            .await?;

        let ids: Vec<Uuid> = lists.iter().map(|l| l.id).collect();
        let items = pick_list_items::table
            .filter(pick_list_items::pick_list_id.eq_any(&ids))
            .select((
                pick_list_items::pick_list_id,
                pick_list_items::quantity_to_pick,
                pick_list_items::quantity_picked,
            ))
            .load::<(Uuid, i32, i32)>(&mut conn)
            .await?;

        Ok(lists
            .into_iter()
            .map(|list| {
                let (done, total) = items
                    .iter()
                    .filter(|(id, _, _)| *id == list.id)
                    .fold((0usize, 0usize), |(done, total), (_, to_pick, picked)| {
                        (done + usize::from(picked >= to_pick), total + 1)
                    });
                PickListOverview {
                    pick_list: list,
                    progress_percent: progress_percent(done, total),
                }
            })
            .collect())
    }
}

/// Batch numbers are `PL-` plus the last six digits of the epoch millis.
pub fn batch_number_now() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("PL-{:06}", millis % 1_000_000)
}

pub fn progress_percent(done: usize, total: usize) -> i32 {
    if total == 0 {
        0
    } else {
        (done * 100 / total) as i32
    }
}
