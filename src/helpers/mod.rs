pub mod device_links;
pub mod distance;
pub mod handler_404;
pub mod photo_url;
