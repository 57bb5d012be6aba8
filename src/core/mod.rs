pub mod calculator;
pub mod clock;
pub mod feed;
pub mod log;
pub mod options;
pub mod poller;
pub mod session;
pub mod ticker;
pub mod timer;
