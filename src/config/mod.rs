//! config/mod.rs
//! Configuración de la aplicación (store, remitente, transporte de correo).

pub mod app_config;
