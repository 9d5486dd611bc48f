// Missing section, missing key, and unparseable lines all yield None.
// Metadata problems never fail planning.
pub fn keyfile_value(input: &str, section: &str, key: &str) -> Option<String> {
    let mut in_section = false;

    for line in input.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            in_section = header.trim() == section;
            continue;
        }

        if !in_section {
            continue;
        }

        let Some((candidate, value)) = line.split_once('=') else {
            continue;
        };
        if candidate.trim() == key {
            return Some(value.trim().to_string());
        }
    }

    None
}

pub fn runtime_from_metadata(metadata: &str) -> Option<String> {
    keyfile_value(metadata, "Application", "runtime")
}
