pub fn human_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    match bytes {
        b if b >= TB => format!("{:.1}T", b as f64 / TB as f64),
        b if b >= GB => format!("{:.1}G", b as f64 / GB as f64),
        b if b >= MB => format!("{:.1}M", b as f64 / MB as f64),
        b if b >= KB => format!("{:.1}K", b as f64 / KB as f64),
        _ => format!("{}B", bytes),
    }
}

pub fn human_time(timestamp: i64, default: &str) -> String {
    if timestamp == 0 {
        return default.to_string();
    }

    match chrono::DateTime::from_timestamp(timestamp, 0) {
        Some(dt) => {
            let diff = chrono::Utc::now().signed_duration_since(dt);

            if diff.num_days() > 365 {
                ago(diff.num_days() / 365, "year")
            } else if diff.num_days() > 30 {
                ago(diff.num_days() / 30, "month")
            } else if diff.num_days() > 0 {
                ago(diff.num_days(), "day")
            } else if diff.num_hours() > 0 {
                ago(diff.num_hours(), "hour")
            } else if diff.num_minutes() > 0 {
                ago(diff.num_minutes(), "minute")
            } else {
                "just now".to_string()
            }
        }
        None => default.to_string(),
    }
}

fn ago(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{} {} ago", n, unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}
