//! Read-side views over the history log.
//!
//! Stores return logs in append order; every sort here is stable so entries
//! sharing a timestamp keep that order.

use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;

use super::{HistoryAction, HistoryLog, Product, ProductId};

/// Title shown in the audit trail when the product row no longer exists.
pub const UNKNOWN_PRODUCT_TITLE: &str = "Produto Deletado/Desconhecido";

/// Icon shown next to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActionIcon {
    Package,
    User,
    ArrowRightLeft,
    Circle,
}

/// Accent colour of the timeline marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActionColor {
    Blue,
    Orange,
    Green,
    Gray,
}

/// Badge style used in the audit table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    Outline,
    Default,
    Secondary,
    Destructive,
}

/// Display attributes of a history action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionPresentation {
    /// Portuguese label used in the audit trail.
    #[schema(value_type = String)]
    pub label: &'static str,
    /// English caption used in timelines.
    #[schema(value_type = String)]
    pub caption: &'static str,
    pub icon: ActionIcon,
    pub color: ActionColor,
    pub tone: BadgeTone,
}

/// Presentation for `action`.
///
/// # Examples
/// ```
/// use inventory::domain::HistoryAction;
/// use inventory::domain::history_projection::present;
///
/// assert_eq!(present(HistoryAction::Returned).label, "Devolução");
/// ```
pub fn present(action: HistoryAction) -> ActionPresentation {
    let (label, caption, icon, color, tone) = match action {
        HistoryAction::Created => (
            "Criação",
            "Product Registered",
            ActionIcon::Package,
            ActionColor::Blue,
            BadgeTone::Outline,
        ),
        HistoryAction::Assigned => (
            "Atribuição",
            "Delivered to Employee",
            ActionIcon::User,
            ActionColor::Orange,
            BadgeTone::Default,
        ),
        HistoryAction::Returned => (
            "Devolução",
            "Returned to Stock",
            ActionIcon::ArrowRightLeft,
            ActionColor::Green,
            BadgeTone::Secondary,
        ),
        HistoryAction::Consumed => (
            "Consumo",
            "Consumption",
            ActionIcon::Circle,
            ActionColor::Gray,
            BadgeTone::Destructive,
        ),
        HistoryAction::Deleted => (
            "Excluído",
            "Deleted",
            ActionIcon::Circle,
            ActionColor::Gray,
            BadgeTone::Destructive,
        ),
    };
    ActionPresentation {
        label,
        caption,
        icon,
        color,
        tone,
    }
}

/// A log entry with its presentation attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub log: HistoryLog,
    pub presentation: ActionPresentation,
}

impl From<HistoryLog> for HistoryEntry {
    fn from(log: HistoryLog) -> Self {
        let presentation = present(log.action);
        Self { log, presentation }
    }
}

/// A history entry enriched with the product title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub entry: HistoryEntry,
    pub product_title: String,
}

impl AuditEntry {
    fn matches(&self, needle: &str) -> bool {
        let action = self.entry.log.action;
        [
            self.entry.log.actor().unwrap_or_default(),
            action.as_str(),
            self.entry.presentation.label,
            self.product_title.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Logs of one product, oldest first.
pub fn product_timeline(product_id: ProductId, logs: Vec<HistoryLog>) -> Vec<HistoryLog> {
    let mut timeline: Vec<HistoryLog> = logs
        .into_iter()
        .filter(|log| log.product_id == Some(product_id))
        .collect();
    timeline.sort_by_key(|log| log.date);
    timeline
}

/// Every log, newest first, with presentation attached.
pub fn global_feed(logs: Vec<HistoryLog>) -> Vec<HistoryEntry> {
    let mut logs = logs;
    logs.reverse();
    logs.sort_by(|a, b| b.date.cmp(&a.date));
    logs.into_iter().map(HistoryEntry::from).collect()
}

/// Global feed joined with product titles and filtered by `search`.
///
/// Soft-deleted rows still resolve their title; rows removed by a merge fall
/// back to [`UNKNOWN_PRODUCT_TITLE`].
pub fn audit_trail(
    logs: Vec<HistoryLog>,
    products: &[Product],
    search: Option<&str>,
) -> Vec<AuditEntry> {
    let titles: HashMap<ProductId, &str> = products
        .iter()
        .map(|product| (product.id, product.title.as_str()))
        .collect();
    let needle = search
        .map(|text| text.trim().to_lowercase())
        .filter(|text| !text.is_empty());

    global_feed(logs)
        .into_iter()
        .map(|entry| {
            let product_title = entry
                .log
                .product_id
                .and_then(|id| titles.get(&id).copied())
                .unwrap_or(UNKNOWN_PRODUCT_TITLE)
                .to_owned();
            AuditEntry {
                entry,
                product_title,
            }
        })
        .filter(|audit| needle.as_deref().is_none_or(|needle| audit.matches(needle)))
        .collect()
}
