use crate::routines::RoutineAdvisor;
use crate::storage::RecordStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<RecordStore>>,
    pub advisor: Arc<RoutineAdvisor>,
}

impl AppState {
    pub fn new(store: RecordStore, advisor: RoutineAdvisor) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            advisor: Arc::new(advisor),
        }
    }
}
