mod frustum;

pub use frustum::is_aabb_visible;
