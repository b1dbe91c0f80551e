pub mod account_handlers;
pub mod auth_handlers;
pub mod form_handlers;
pub mod home;
pub mod oauth_handlers;
pub mod public_handlers;
