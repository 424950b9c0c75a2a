/// Marker opening every block.
pub const SENTENCE_MARKER: &str = "#::snt";

/// One block as written: the sentence and its graph lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    pub sentence: String,
    /// Non-blank lines after the marker, trimmed.
    pub graph_lines: Vec<String>,
}

impl RawBlock {
    pub fn graph_text(&self) -> String {
        self.graph_lines.join("\n")
    }
}

/// Splits corpus text into blocks.
///
/// Lines before the first marker are ignored, as are blank lines and other
/// `#` comment lines. A marker with no graph lines after it yields no
/// block.
pub fn split_blocks(text: &str) -> Vec<RawBlock> {
    scan_blocks(text, false)
}

/// Like [`split_blocks`], but a marker with no graph lines still yields an
/// empty block, so block `i` is always the `i`-th marker of the file.
pub fn split_blocks_aligned(text: &str) -> Vec<RawBlock> {
    scan_blocks(text, true)
}

fn scan_blocks(text: &str, keep_empty: bool) -> Vec<RawBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<RawBlock> = None;

    for line in text.lines().map(str::trim) {
        if let Some(sentence) = line.strip_prefix(SENTENCE_MARKER) {
            if let Some(block) = current.take() {
                if keep_empty || !block.graph_lines.is_empty() {
                    blocks.push(block);
                }
            }
            current = Some(RawBlock {
                sentence: sentence.trim().to_string(),
                graph_lines: Vec::new(),
            });
        } else if line.is_empty() || line.starts_with('#') {
            continue;
        } else if let Some(block) = current.as_mut() {
            block.graph_lines.push(line.to_string());
        }
    }

    if let Some(block) = current {
        if keep_empty || !block.graph_lines.is_empty() {
            blocks.push(block);
        }
    }
    blocks
}

/// Renders `(sentence, graph)` pairs as blocks, each followed by a blank
/// line.
pub fn write_blocks<'a, I>(blocks: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = String::new();
    for (sentence, graph) in blocks {
        out.push_str(SENTENCE_MARKER);
        out.push(' ');
        out.push_str(sentence);
        out.push('\n');
        out.push_str(graph);
        out.push_str("\n\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORPUS: &str = "header noise
#::snt tôi yêu hoa
(y / yêu
    :agent (t / tôi)
    :patient (h / hoa))

# ::id 7
#::snt câu rỗng

#::snt núi cao
(n / núi :mod (c / cao))
";

    #[test]
    fn splits_on_markers() {
        let blocks = split_blocks(CORPUS);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].sentence, "tôi yêu hoa");
        assert_eq!(
            blocks[0].graph_lines,
            vec!["(y / yêu", ":agent (t / tôi)", ":patient (h / hoa))"]
        );
        assert_eq!(blocks[1].sentence, "núi cao");
        assert_eq!(blocks[1].graph_text(), "(n / núi :mod (c / cao))");
    }

    #[test]
    fn aligned_split_keeps_empty_blocks() {
        let blocks = split_blocks_aligned(CORPUS);
        let sentences: Vec<&str> = blocks.iter().map(|b| b.sentence.as_str()).collect();
        assert_eq!(sentences, vec!["tôi yêu hoa", "câu rỗng", "núi cao"]);
        assert!(blocks[1].graph_lines.is_empty());
    }

    #[test]
    fn empty_text_has_no_blocks() {
        assert!(split_blocks("").is_empty());
        assert!(split_blocks("(a / alpha)\n").is_empty());
    }

    #[test]
    fn written_blocks_split_back() {
        let text = write_blocks([("một", "(m / một)"), ("hai", "(h / hai)")]);
        assert_eq!(text, "#::snt một\n(m / một)\n\n#::snt hai\n(h / hai)\n\n");
        let blocks = split_blocks(&text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].graph_text(), "(h / hai)");
    }
}
