pub mod batch;
pub mod pool;

pub use batch::{render_batch, RenderJob};
pub use pool::WorkerPool;
