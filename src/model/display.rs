//! Display-friendly derivations computed from raw media attributes.
//!
//! Everything here is a pure function of its input so that the live path and
//! the sync job derive identical strings for identical raw values.

const MB: f64 = 1_000_000.0;
const GB: f64 = 1_000_000_000.0;
const TB: f64 = 1_000_000_000_000.0;

/// Formats a duration in milliseconds as `XhYm` or `Ym`.
///
/// Minutes are rounded to the nearest whole minute; any positive duration
/// that would round down to zero is reported as one minute.
pub fn human_readable_duration(total_milliseconds: i64) -> String {
    let total_milliseconds = total_milliseconds.max(0);
    let mut total_minutes = (total_milliseconds as f64 / 60_000.0).round() as i64;
    if total_minutes == 0 && total_milliseconds > 0 {
        total_minutes = 1;
    }
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if hours > 0 {
        format!("{}h{}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Formats a byte count using the largest of MB/GB/TB, two decimals.
pub fn human_readable_size(total_bytes: i64) -> String {
    let bytes = total_bytes as f64;
    if bytes >= TB {
        format!("{:.2} TB", bytes / TB)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes / GB)
    } else {
        format!("{:.2} MB", bytes / MB)
    }
}

pub fn format_resolution(resolution: &str) -> String {
    let resolution = resolution.trim().to_lowercase();
    if resolution == "4k" {
        "2160p".to_string()
    } else if !resolution.is_empty() && resolution.chars().all(|c| c.is_ascii_digit()) {
        format!("{}p", resolution)
    } else {
        resolution
    }
}

pub fn format_codec(codec: &str) -> String {
    codec.trim().to_uppercase()
}

/// Joins list-valued attributes as `"a, b, c"`, skipping blank entries.
pub fn join_list<I, S>(items: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = items
        .into_iter()
        .filter_map(|item| {
            let item = item.as_ref().trim();
            (!item.is_empty()).then(|| item.to_string())
        })
        .collect::<Vec<_>>();
    if joined.is_empty() {
        None
    } else {
        Some(joined.join(", "))
    }
}

/// `"Name as Role"` when a role is known, otherwise just the name.
pub fn format_actor(name: &str, role: Option<&str>) -> String {
    match role.map(str::trim).filter(|r| !r.is_empty()) {
        Some(role) => format!("{} as {}", name.trim(), role),
        None => name.trim().to_string(),
    }
}

/// Attributes hashed into a content fingerprint.
#[derive(Debug, Clone, Copy, Default)]
pub struct FingerprintInput<'a> {
    pub size_bytes: Option<i64>,
    pub duration: Option<i64>,
    pub codec: Option<&'a str>,
    pub resolution: Option<&'a str>,
    pub container: Option<&'a str>,
    pub title: Option<&'a str>,
    pub year: Option<i32>,
}

/// MD5 hex digest over `size|duration|codec|resolution|container|title|year`.
///
/// Absent values render as `None`, the same text the sync job hashes, so live
/// and mirrored fingerprints of an unchanged item compare equal.
pub fn media_fingerprint(input: &FingerprintInput<'_>) -> String {
    fn part<T: ToString>(value: Option<T>) -> String {
        value
            .map(|v| v.to_string())
            .unwrap_or_else(|| "None".to_string())
    }
    let hash_string = format!(
        "{}|{}|{}|{}|{}|{}|{}",
        part(input.size_bytes),
        part(input.duration),
        part(input.codec),
        part(input.resolution),
        part(input.container),
        part(input.title),
        part(input.year),
    );
    format!("{:x}", md5::compute(hash_string.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_under_an_hour() {
        assert_eq!(human_readable_duration(45 * 60 * 1000), "45m");
        assert_eq!(human_readable_duration(59 * 60 * 1000 + 10_000), "59m");
    }

    #[test]
    fn duration_over_an_hour() {
        assert_eq!(human_readable_duration(136 * 60 * 1000), "2h16m");
        assert_eq!(human_readable_duration(60 * 60 * 1000), "1h0m");
        // 59m40s rounds up into the next hour
        assert_eq!(human_readable_duration(59 * 60 * 1000 + 40_000), "1h0m");
    }

    #[test]
    fn short_duration_is_at_least_a_minute() {
        assert_eq!(human_readable_duration(12_000), "1m");
        assert_eq!(human_readable_duration(500), "1m");
        assert_eq!(human_readable_duration(1), "1m");
        assert_eq!(human_readable_duration(0), "0m");
        assert_eq!(human_readable_duration(-5_000), "0m");
    }

    #[test]
    fn size_picks_largest_unit() {
        assert_eq!(human_readable_size(734_003_200), "734.00 MB");
        assert_eq!(human_readable_size(5_200_000_000), "5.20 GB");
        assert_eq!(human_readable_size(1_500_000_000_000), "1.50 TB");
        assert_eq!(human_readable_size(0), "0.00 MB");
    }

    #[test]
    fn resolution_and_codec_formatting() {
        assert_eq!(format_resolution("4k"), "2160p");
        assert_eq!(format_resolution("4K"), "2160p");
        assert_eq!(format_resolution("1080"), "1080p");
        assert_eq!(format_resolution("SD"), "sd");
        assert_eq!(format_codec("h264"), "H264");
    }

    #[test]
    fn list_joining_and_actors() {
        assert_eq!(
            join_list(["Action", " ", "Sci-Fi"]),
            Some("Action, Sci-Fi".to_string())
        );
        assert_eq!(join_list(Vec::<String>::new()), None);
        assert_eq!(
            format_actor("Keanu Reeves", Some("Neo")),
            "Keanu Reeves as Neo"
        );
        assert_eq!(format_actor("Keanu Reeves", Some("")), "Keanu Reeves");
        assert_eq!(format_actor("Keanu Reeves", None), "Keanu Reeves");
    }

    #[test]
    fn fingerprint_is_stable_and_sensitive() {
        let input = FingerprintInput {
            size_bytes: Some(1_000),
            duration: Some(2_000),
            codec: Some("H264"),
            resolution: Some("1080p"),
            container: Some("mkv"),
            title: Some("The Matrix"),
            year: Some(1999),
        };
        let first = media_fingerprint(&input);
        assert_eq!(first, media_fingerprint(&input));
        assert_eq!(first.len(), 32);
        assert_eq!(
            first,
            format!(
                "{:x}",
                md5::compute("1000|2000|H264|1080p|mkv|The Matrix|1999")
            )
        );

        let changed = FingerprintInput {
            size_bytes: Some(1_001),
            ..input
        };
        assert_ne!(first, media_fingerprint(&changed));
    }

    #[test]
    fn fingerprint_renders_absent_values_as_none() {
        let input = FingerprintInput {
            size_bytes: Some(0),
            duration: Some(0),
            title: Some("Intro"),
            ..Default::default()
        };
        assert_eq!(
            media_fingerprint(&input),
            format!("{:x}", md5::compute("0|0|None|None|None|Intro|None"))
        );
    }
}
