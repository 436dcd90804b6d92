pub mod account;
pub mod advert;
pub mod answer;
pub mod application;
pub mod category;
pub mod pending_account;
pub mod question;
pub mod test_result;
pub mod token;
