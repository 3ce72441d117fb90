//! YAML output formatting shared by the metadata store and the manifest

/// Insert an empty line before every entry of `section` after the first,
/// so each group reads as its own block in diffs.
///
/// `section` is the key holding the list (e.g. `groups:`), or `None` when the
/// document itself is a top-level sequence.
pub fn space_entries(yaml: &str, section: Option<&str>) -> String {
    let mut formatted: Vec<String> = Vec::new();
    let mut in_section = section.is_none();
    let mut seen_entry = false;

    for line in yaml.lines() {
        if let Some(key) = section {
            if !line.starts_with(' ') && !line.starts_with('-') {
                in_section = line.starts_with(key);
                seen_entry = false;
            }
        }

        // serde_yaml emits list items of a top-level key without indentation
        if in_section && line.starts_with("- ") {
            if seen_entry && formatted.last().is_some_and(|l| !l.is_empty()) {
                formatted.push(String::new());
            }
            seen_entry = true;
        }
        formatted.push(line.to_string());
    }

    format!("{}\n", formatted.join("\n"))
}
