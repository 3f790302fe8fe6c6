use crate::models::AppData;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::{Mutex, Notify};

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
    pub reminder_wake: Arc<Notify>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            reminder_wake: Arc::new(Notify::new()),
        }
    }
}
