pub mod account_service;
pub mod advert_service;
pub mod application_service;
pub mod grading_service;
pub mod mail_service;
pub mod quiz_service;
