/// ANSI color helper utilities for terminal output.
use crate::core::calculator::budget::Band;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const WHITE: &str = "\x1b[37m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

/// Budget band colours: green / yellow / red.
pub fn color_for_band(band: Band) -> &'static str {
    match band {
        Band::Nominal => GREEN,
        Band::Warning => YELLOW,
        Band::Critical => RED,
    }
}

/// Colour stored with a task option (`task_options.color`).
pub fn color_by_name(name: &str) -> &'static str {
    match name.to_lowercase().as_str() {
        "red" => RED,
        "green" => GREEN,
        "yellow" => YELLOW,
        "blue" => BLUE,
        "cyan" => CYAN,
        "magenta" => MAGENTA,
        "grey" | "gray" => GREY,
        _ => WHITE,
    }
}

pub fn paint(value: &str, color: &str) -> String {
    format!("{color}{value}{RESET}")
}

/// Running timers in green, idle ones greyed out.
pub fn colorize_running(value: &str, running: bool) -> String {
    if running {
        paint(value, GREEN)
    } else {
        paint(value, GREY)
    }
}
