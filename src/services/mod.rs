pub mod feed;
pub mod mediathek;
pub mod watch_filter;

pub use feed::FeedService;
pub use mediathek::{MediathekClient, VideoSource};
