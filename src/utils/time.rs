use chrono::Duration;

/// This is the standard way of showing tracked time in tasktimer: `HH:MM:SS`, with hours
/// growing past two digits when needed.
pub fn format_elapsed(duration: Duration) -> String {
    let total = duration.num_milliseconds().max(0);
    let second = total / 1000 % 60;
    let minute = total / (1000 * 60) % 60;
    let hour = total / (1000 * 60 * 60);

    format!("{hour:02}:{minute:02}:{second:02}")
}
