//! Wire models for the admin deploy-changes API

pub mod models;
