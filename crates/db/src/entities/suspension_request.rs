//! Suspension request entity for the two-gate approval workflow.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Workflow state of a suspension request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum SuspensionStatus {
    /// Awaiting the manager's decision.
    #[sea_orm(string_value = "pending_manager")]
    PendingManager,
    /// Manager approved; awaiting the shop owner.
    #[sea_orm(string_value = "pending_owner")]
    PendingOwner,
    /// Manager rejected.
    #[sea_orm(string_value = "rejected_manager")]
    RejectedManager,
    /// Shop owner approved.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Shop owner rejected.
    #[sea_orm(string_value = "rejected_owner")]
    RejectedOwner,
}

/// Outcome recorded by the manager gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ManagerDecision {
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "suspension_request")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Employee proposed for suspension
    pub employee_id: String,

    /// User who filed the request
    pub requester_id: String,

    /// Manager who reviewed the request (set at review)
    #[sea_orm(nullable)]
    pub manager_id: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub reason: String,

    pub status: SuspensionStatus,

    #[sea_orm(nullable)]
    pub manager_status: Option<ManagerDecision>,

    #[sea_orm(column_type = "Text", nullable)]
    pub manager_note: Option<String>,

    #[sea_orm(nullable)]
    pub manager_reviewed_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id"
    )]
    Employee,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RequesterId",
        to = "super::user::Column::Id"
    )]
    Requester,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ManagerId",
        to = "super::user::Column::Id"
    )]
    Manager,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
