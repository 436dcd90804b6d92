pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    account_service::AccountService, advert_service::AdvertService,
    application_service::ApplicationService, mail_service::MailService, quiz_service::QuizService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub account_service: AccountService,
    pub advert_service: AdvertService,
    pub application_service: ApplicationService,
    pub quiz_service: QuizService,
    pub mail_service: MailService,
}

impl AppState {
    pub fn new(pool: PgPool, mail_service: MailService) -> Self {
        let account_service = AccountService::new(pool.clone());
        let advert_service = AdvertService::new(pool.clone());
        let application_service = ApplicationService::new(pool.clone(), mail_service.clone());
        let quiz_service = QuizService::new(pool.clone());

        Self {
            pool,
            account_service,
            advert_service,
            application_service,
            quiz_service,
            mail_service,
        }
    }
}
