//! Collaborators the navigation menu talks to

pub mod admin;
pub mod deploy_api;
pub mod prompter;
