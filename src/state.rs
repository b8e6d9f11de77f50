use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct AppState {
    pub uploads_root: Arc<PathBuf>,
    pub chunk_size: usize,
}
