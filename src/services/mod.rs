//! services/mod.rs
//! Las etapas del pipeline de recordatorios.

pub mod due_filter_service;
pub mod email_service;
pub mod notification_service;
pub mod reminder_service;
pub mod reminder_store_service;
