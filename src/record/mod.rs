pub mod model;
pub mod pool;

pub use model::Record;
pub use pool::RecordPool;
