pub mod handlers;
pub mod item_id;
pub mod sessions;
pub mod store;
