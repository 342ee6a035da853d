//! Thread network dataset parsing.
//!
//! A Thread device console prints the active dataset as human-readable
//! `Key: Value` lines. The operator pastes that block into the wizard and
//! this module turns it into structured fields:
//!
//! ```text
//! Active Timestamp: 1
//! Network Name: ESP-Thread-1234
//! Ext PAN ID: 1111111122222222
//! PAN ID: 0x1234
//! Network Key: 00112233445566778899aabbccddeeff
//! Channel: 15
//! Mesh Local Prefix: fd11:22::/64
//! ```
//!
//! Parsing never fails: fields that are missing from the paste stay empty,
//! and the original lines are kept so they can be echoed back verbatim for
//! the bulk-paste reentry method. Whether a paste is acceptable at all
//! (e.g. contains the `Active Timestamp:` marker) is the capture step's
//! call, not the parser's.

/// Raw multi-line console text as pasted by the operator.
///
/// Immutable once captured; one capture attempt produces one `RawDataset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDataset {
    lines: Vec<String>,
}

impl RawDataset {
    /// Capture from individually collected input lines.
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Capture from a single free-form text block.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: split_lines(text),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The paste rejoined with newlines, as written to `thread_dataset.txt`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Caller-side validity policy: a real `dataset` command dump starts
    /// with this marker. The parser itself does not care.
    pub fn has_active_timestamp(&self) -> bool {
        self.lines.iter().any(|l| l.contains("Active Timestamp:"))
    }

    pub fn parse(&self) -> ParsedDataset {
        ParsedDataset::parse(&self.text())
    }
}

/// Structured view of a pasted dataset.
///
/// All fields default to empty when absent from the input; absence is not
/// an error. `lines` is the full original split, colon-bearing or not, in
/// original order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDataset {
    pub network_name: String,
    pub ext_pan_id: String,
    pub pan_id: String,
    pub network_key: String,
    pub channel: String,
    pub mesh_local_prefix: String,
    pub lines: Vec<String>,
}

/// Split pasted text into lines.
///
/// The block is trimmed first, so an empty or whitespace-only paste yields
/// no lines at all (rather than a single empty line). Trailing `\r` from
/// CRLF console output is dropped per line.
fn split_lines(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
        .collect()
}

/// Normalize a key for matching: trim, lowercase, drop interior spaces.
/// "Network Name", "networkname" and " NETWORK NAME " all match.
fn normalize_key(key: &str) -> String {
    key.trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

impl ParsedDataset {
    /// Extract the six recognized fields from pasted console text.
    ///
    /// Only the first `:` on a line separates key from value; later colons
    /// belong to the value (mesh-local prefixes are IPv6 addresses). Lines
    /// without a `:` are skipped for extraction but kept in `lines`. When
    /// a key repeats, the last occurrence wins.
    pub fn parse(raw: &str) -> Self {
        let lines = split_lines(raw);
        let mut parsed = Self {
            lines: lines.clone(),
            ..Self::default()
        };

        for line in &lines {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match normalize_key(key).as_str() {
                "networkname" => parsed.network_name = value.to_string(),
                "extpanid" => parsed.ext_pan_id = value.to_string(),
                "panid" => parsed.pan_id = value.to_string(),
                "networkkey" => parsed.network_key = value.to_string(),
                "channel" => parsed.channel = value.to_string(),
                "meshlocalprefix" => {
                    // The console appends the prefix length; the `dataset
                    // meshlocalprefix` command wants it without.
                    parsed.mesh_local_prefix =
                        value.trim_end_matches("/64").trim().to_string();
                }
                _ => {}
            }
        }

        parsed
    }

    /// Named fields in display order, for echoing back to the operator.
    pub fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("Network Name", self.network_name.as_str()),
            ("Ext PAN ID", self.ext_pan_id.as_str()),
            ("PAN ID", self.pan_id.as_str()),
            ("Network Key", self.network_key.as_str()),
            ("Channel", self.channel.as_str()),
            ("Mesh Local Prefix", self.mesh_local_prefix.as_str()),
        ]
    }

    /// Flat `field: value` serialization (one field per line, raw lines
    /// excluded), as saved next to the dataset file.
    pub fn to_file_contents(&self) -> String {
        format!(
            "network_name: {}\next_pan_id: {}\npan_id: {}\nnetwork_key: {}\nchannel: {}\nmesh_local_prefix: {}\n",
            self.network_name,
            self.ext_pan_id,
            self.pan_id,
            self.network_key,
            self.channel,
            self.mesh_local_prefix,
        )
    }

    /// The `dataset <key> <value>` command sequence for setting each field
    /// individually on a CLI device console. Empty fields are skipped;
    /// `dataset commit active` is the caller's job.
    pub fn cli_commands(&self) -> Vec<String> {
        let keys = [
            ("networkname", &self.network_name),
            ("extpanid", &self.ext_pan_id),
            ("panid", &self.pan_id),
            ("networkkey", &self.network_key),
            ("channel", &self.channel),
            ("meshlocalprefix", &self.mesh_local_prefix),
        ];
        keys.iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| format!("dataset {k} {v}"))
            .collect()
    }

    /// The colon-bearing subset of the original lines, for the bulk
    /// `dataset set active -` paste method.
    pub fn reentry_lines(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|l| l.contains(':'))
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Active Timestamp: 1\n\
                          Network Name: ESP-Thread-1234\n\
                          Ext PAN ID: 1111111122222222\n\
                          PAN ID: 0x1234\n\
                          Network Key: 00112233445566778899aabbccddeeff\n\
                          Channel: 15\n\
                          Mesh Local Prefix: fd11:22::/64";

    #[test]
    fn parses_full_console_dump() {
        let d = ParsedDataset::parse(SAMPLE);
        assert_eq!(d.network_name, "ESP-Thread-1234");
        assert_eq!(d.ext_pan_id, "1111111122222222");
        assert_eq!(d.pan_id, "0x1234");
        assert_eq!(d.network_key, "00112233445566778899aabbccddeeff");
        assert_eq!(d.channel, "15");
        assert_eq!(d.mesh_local_prefix, "fd11:22::");
        assert_eq!(d.lines.len(), 7);
        assert_eq!(d.lines[0], "Active Timestamp: 1");
        assert_eq!(d.lines[6], "Mesh Local Prefix: fd11:22::/64");
    }

    #[test]
    fn empty_input_yields_empty_fields_and_no_lines() {
        // Chosen convention: an empty (or whitespace-only) paste splits
        // into zero lines, not a single empty one.
        let d = ParsedDataset::parse("");
        assert_eq!(d, ParsedDataset::default());
        assert!(d.lines.is_empty());

        let d = ParsedDataset::parse("   \n  \n");
        assert!(d.lines.is_empty());
        assert_eq!(d.network_name, "");
    }

    #[test]
    fn key_matching_is_case_and_space_insensitive() {
        let a = ParsedDataset::parse("Network Name: Foo");
        let b = ParsedDataset::parse("networkname:Foo");
        let c = ParsedDataset::parse("  NETWORK  NAME  :  Foo  ");
        assert_eq!(a.network_name, "Foo");
        assert_eq!(b.network_name, "Foo");
        assert_eq!(c.network_name, "Foo");
    }

    #[test]
    fn unrecognized_keys_are_ignored() {
        let d = ParsedDataset::parse("Active Timestamp: 1\nPSKc: deadbeef\nNetwork: Foo");
        assert_eq!(d, ParsedDataset {
            lines: vec![
                "Active Timestamp: 1".to_string(),
                "PSKc: deadbeef".to_string(),
                "Network: Foo".to_string(),
            ],
            ..ParsedDataset::default()
        });
    }

    #[test]
    fn no_partial_key_matches() {
        // "networkname2" is not "networkname"; matching is exact.
        let d = ParsedDataset::parse("Network Name 2: Foo\nChannel Mask: 0x07fff800");
        assert_eq!(d.network_name, "");
        assert_eq!(d.channel, "");
    }

    #[test]
    fn last_occurrence_wins() {
        let d = ParsedDataset::parse("Channel: 11\nChannel: 15");
        assert_eq!(d.channel, "15");
    }

    #[test]
    fn only_first_colon_splits() {
        let d = ParsedDataset::parse("Mesh Local Prefix: fd00:db8:a0:0::/64");
        assert_eq!(d.mesh_local_prefix, "fd00:db8:a0:0::");
    }

    #[test]
    fn prefix_suffix_stripped_with_surrounding_whitespace() {
        let d = ParsedDataset::parse("Mesh Local Prefix: fd00:1234:: /64 ");
        assert_eq!(d.mesh_local_prefix, "fd00:1234::");

        // No /64 present: value kept as-is.
        let d = ParsedDataset::parse("Mesh Local Prefix: fd00:1234::");
        assert_eq!(d.mesh_local_prefix, "fd00:1234::");
    }

    #[test]
    fn lines_without_colon_are_retained_but_extract_nothing() {
        let d = ParsedDataset::parse("Done\nChannel: 15\n> ");
        assert_eq!(d.channel, "15");
        assert_eq!(d.lines, vec!["Done", "Channel: 15", ">"]);
    }

    #[test]
    fn crlf_input_parses_like_lf() {
        let d = ParsedDataset::parse("Network Name: Foo\r\nChannel: 15\r\n");
        assert_eq!(d.network_name, "Foo");
        assert_eq!(d.channel, "15");
        assert_eq!(d.lines, vec!["Network Name: Foo", "Channel: 15"]);
    }

    #[test]
    fn round_trip_through_lines_is_stable() {
        let first = ParsedDataset::parse(SAMPLE);
        let rejoined = first.lines.join("\n");
        let second = ParsedDataset::parse(&rejoined);
        assert_eq!(first, second);
    }

    #[test]
    fn raw_dataset_marker_check() {
        let raw = RawDataset::from_text(SAMPLE);
        assert!(raw.has_active_timestamp());
        assert!(!RawDataset::from_text("Channel: 15").has_active_timestamp());
        assert!(RawDataset::from_text("").is_empty());
    }

    #[test]
    fn raw_dataset_from_lines_round_trips_text() {
        let raw = RawDataset::from_lines(vec![
            "Channel: 15".to_string(),
            "PAN ID: 0x1234".to_string(),
        ]);
        assert_eq!(raw.text(), "Channel: 15\nPAN ID: 0x1234");
        assert_eq!(raw.parse().channel, "15");
        assert_eq!(raw.parse().pan_id, "0x1234");
    }

    #[test]
    fn file_serialization_lists_one_field_per_line() {
        let d = ParsedDataset::parse(SAMPLE);
        let contents = d.to_file_contents();
        assert!(contents.contains("network_name: ESP-Thread-1234\n"));
        assert!(contents.contains("mesh_local_prefix: fd11:22::\n"));
        // Raw lines are not part of the flat file.
        assert!(!contents.contains("Active Timestamp"));
        assert_eq!(contents.lines().count(), 6);
    }

    #[test]
    fn cli_commands_skip_empty_fields() {
        let d = ParsedDataset::parse("Network Name: Foo\nChannel: 15");
        assert_eq!(
            d.cli_commands(),
            vec!["dataset networkname Foo", "dataset channel 15"]
        );
    }

    #[test]
    fn reentry_lines_keep_only_colon_bearing_lines() {
        let d = ParsedDataset::parse("Done\nChannel: 15\nPAN ID: 0x1234");
        assert_eq!(d.reentry_lines(), vec!["Channel: 15", "PAN ID: 0x1234"]);
    }
}
