pub mod auth;
pub mod modals;
pub mod panels;
