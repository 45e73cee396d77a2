use std::sync::Arc;

use market::{Database, PriceClient};

pub mod command;
pub mod config;
pub mod notifier;
pub mod schedule;

pub struct Data {
    pub db: Arc<Database>,
    pub price_client: Arc<PriceClient>,
}

pub type Error = anyhow::Error;
pub type Context<'a> = poise::Context<'a, Data, Error>;
