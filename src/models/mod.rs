pub mod subscription;
pub mod video;
pub mod watch_status;

pub use subscription::Subscription;
pub use video::Video;
pub use watch_status::WatchStatus;
