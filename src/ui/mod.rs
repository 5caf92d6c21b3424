pub mod contact;
pub mod conversation;
pub mod plain;
pub mod sidebar;
