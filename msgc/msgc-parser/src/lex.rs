/// The ROS1 comment marker.
pub const COMMENT_MARKER: char = '#';

/// The line separating request and response in a `.srv` file.
pub const SERVICE_SEPARATOR: &str = "---";

/// Split a raw line into its semantic content and the verbatim comment after `#`.
pub fn split_comment(line: &str) -> (&str, Option<&str>) {
    match line.find(COMMENT_MARKER) {
        Some(idx) => (&line[..idx], Some(&line[idx + 1..])),
        None => (line, None),
    }
}

pub fn is_service_separator(line: &str) -> bool {
    split_comment(line).0.trim() == SERVICE_SEPARATOR
}
