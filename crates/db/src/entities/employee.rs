//! Employee entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employment record linking a user to a shop.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employee")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// The user account of this employee.
    pub user_id: String,
    /// Tenant (shop) the employee works for.
    pub shop_id: String,
    /// Direct manager (a user id).
    #[sea_orm(nullable)]
    pub manager_id: Option<String>,
    #[sea_orm(nullable)]
    pub position: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::suspension_request::Entity")]
    SuspensionRequests,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::suspension_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SuspensionRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
