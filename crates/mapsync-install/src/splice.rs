const INDENT: &str = "    ";

/// Insert `entries` as quoted list items just before the last `]` of `content`.
///
/// Each entry lands on its own line as `    "<entry>",`. Content without a `]`,
/// or an empty entry list, is returned unchanged.
pub fn splice_entries(content: &[u8], entries: &[String]) -> Vec<u8> {
    let Some(at) = content.iter().rposition(|&b| b == b']') else {
        return content.to_vec();
    };
    if entries.is_empty() {
        return content.to_vec();
    }

    let mut block = String::from("\n");
    for entry in entries {
        block.push_str(INDENT);
        block.push('"');
        block.push_str(entry);
        block.push_str("\",\n");
    }

    let mut spliced = Vec::with_capacity(content.len() + block.len());
    spliced.extend_from_slice(&content[..at]);
    spliced.extend_from_slice(block.as_bytes());
    spliced.extend_from_slice(&content[at..]);
    spliced
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splice_before_last_bracket() {
        let content = b"[servers]\nlist = [\n    \"a.example:1\",\n]\n";
        let spliced = splice_entries(content, &["b.example:2".into(), "c.example:3".into()]);

        assert_eq!(
            String::from_utf8(spliced).unwrap(),
            "[servers]\nlist = [\n    \"a.example:1\",\n\n    \"b.example:2\",\n    \"c.example:3\",\n]\n"
        );
    }

    #[test]
    fn test_no_bracket_or_no_entries() {
        assert_eq!(splice_entries(b"plain", &["x".into()]), b"plain");
        assert_eq!(splice_entries(b"list = []", &[]), b"list = []");
    }
}
