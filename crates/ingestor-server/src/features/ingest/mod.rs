pub mod command;
pub mod routes;
pub mod transform;

pub use command::IngestResponse;
pub use routes::ingest_routes;
pub use transform::{slugify, transform_item, transform_item_with, Clock, SystemClock};
