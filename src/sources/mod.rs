use crate::model::Entry;
use anyhow::Result;

pub trait Source {
    fn scan(&self) -> Result<Vec<Entry>>;
}

pub mod desktop;
