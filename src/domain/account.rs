use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fixed identifier assigned to every account. This demo has no id generation.
pub const ACCOUNT_ID: u64 = 1;

/// Plain account record: an identifier, a display name and a decimal balance.
/// Absent payload fields fall back to their defaults (empty name, zero balance).
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Account {
    pub id: u64,
    pub name: String,
    #[schema(value_type = String)]
    pub balance: Decimal,
}
