//! Hex formatting for trace output.

/// Formats bytes as lowercase colon-separated hex, e.g. `00:1c:00`.
pub(crate) fn hex_dump(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}
