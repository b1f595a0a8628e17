//! École Portal - backend du portail scolaire
//!
//! Serveur Actix Web pour les rôles admin, prof et élève : comptes, classes,
//! cours, devoirs, quiz, avis, agenda et messagerie.
//!
//! # Architecture
//! - `cache`: cache des sessions (Moka/Redis)
//! - `config`: configuration
//! - `entity`: entités SeaORM
//! - `errors`: erreurs internes
//! - `middlewares`: authentification, rôles, limitation de débit
//! - `models`: modèles d'API
//! - `routes`: routage HTTP
//! - `runtime`: démarrage et arrêt
//! - `services`: logique métier
//! - `storage`: persistance (SeaORM)
//! - `utils`: utilitaires

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
