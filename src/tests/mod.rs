//! tests/mod.rs
//! Pruebas del pipeline de recordatorios.

mod email_service_tests;
mod support;
