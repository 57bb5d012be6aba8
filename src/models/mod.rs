pub mod contributor;
pub mod task;
pub mod task_option;
pub mod tracking_record;
pub mod work_session;
