pub mod account_routes;
pub mod admin_routes;
pub mod advert_routes;
pub mod application_routes;
pub mod health;
pub mod quiz_routes;
