pub mod record;
pub mod resource;
pub mod utils;

// Re-export handler functions for use in routing
pub use record::delete as record_delete;
pub use record::get as record_get;
pub use record::put as record_put;

pub use resource::get as resource_get;
pub use resource::post as resource_post;
