//! Entity module - Contains all SeaORM entity definitions for the event store.
//! These entities mirror the hosted backend tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod approval;
pub mod budget_item;
pub mod department;
pub mod event;
pub mod profile;
pub mod task;
pub mod team;

// Re-export specific types to avoid conflicts
pub use approval::{
    ApprovalStatus, Column as ApprovalColumn, Entity as Approval, Model as ApprovalModel,
};
pub use budget_item::{
    Column as BudgetItemColumn, Entity as BudgetItem, Model as BudgetItemModel,
};
pub use department::{
    Column as DepartmentColumn, Entity as Department, Model as DepartmentModel,
};
pub use event::{
    AUTO_STATUSES, Column as EventColumn, Entity as Event, EventStatus, Model as EventModel,
    Priority,
};
pub use profile::{Column as ProfileColumn, Entity as Profile, Model as ProfileModel};
pub use task::{Column as TaskColumn, Entity as Task, Model as TaskModel, TaskStatus};
pub use team::{Column as TeamColumn, Entity as Team, Model as TeamModel};
