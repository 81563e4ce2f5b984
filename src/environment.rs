use std::sync::Arc;

use log::Logger;

use crate::db::Db;
use crate::errors::ShipError;
use crate::filter::{Page, ShipOrder};
use crate::urls::Urls;

pub type SafeDb = dyn Db + Send + Sync;

#[derive(Clone)]
pub struct Environment {
    pub logger: Arc<Logger>,
    pub db: Arc<SafeDb>,
    pub urls: Arc<Urls>,
    pub config: Config,
}

impl Environment {
    pub fn new(logger: Arc<Logger>, db: Arc<SafeDb>, urls: Arc<Urls>, config: Config) -> Self {
        Self {
            logger,
            db,
            urls,
            config,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub(crate) default_page_size: u32,
}

impl Config {
    /// Fails if `default_page_size` couldn't describe a valid page.
    pub fn new(default_page_size: u32) -> Result<Self, ShipError> {
        Page::new(0, default_page_size, ShipOrder::default())?;

        Ok(Self { default_page_size })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_page_size: 3,
        }
    }
}
