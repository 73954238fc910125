use actix::prelude::*;

use crate::config::Config;
use crate::db;

#[derive(Clone)]
pub struct AppData {
    pub cfg: Config,
    pub db: db::Helper,
}

impl AppData {
    pub fn new(cfg: Config) -> Result<Self, diesel::result::ConnectionError> {
        // Test DB connection now
        drop(db::Executor::connect(&cfg.sqlite_db)?);

        // A single thread keeps one shared connection; the mailbox serializes
        // all queries against it.
        let sqlite_db = cfg.sqlite_db.clone();
        let executor = SyncArbiter::start(1, move || {
            db::Executor::connect(&sqlite_db).expect("DB connection failed")
        });

        Ok(AppData {
            cfg,
            db: db::Helper::new(executor),
        })
    }
}
