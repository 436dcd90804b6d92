pub mod account_dto;
pub mod advert_dto;
pub mod application_dto;
pub mod quiz_dto;
