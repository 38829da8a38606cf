use super::{Header, RenderStrategy};
use crate::config::DumpConfig;
use crate::escape::{escape_preview, escape_text};
use crate::value::MethodHandle;

const INDENT: &str = "  ";

pub const SEEN_PLACEHOLDER: &str = "(...)";
pub const DEPTH_LIMIT_PLACEHOLDER: &str = "(recursion limit reached)";

/// Rendered lines of one value. The first line is the one that sits after
/// the parent's label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    lines: Vec<String>,
}

impl TextNode {
    fn line(text: impl Into<String>) -> Self {
        Self {
            lines: vec![text.into()],
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_string(self) -> String {
        self.lines.join("\n")
    }
}

/// Builds an indented, log-friendly tree. Not meant to be parsed.
#[derive(Debug, Clone)]
pub struct TextStrategy {
    max_depth: usize,
    preview_chars: usize,
}

impl TextStrategy {
    pub fn new(config: &DumpConfig) -> Self {
        Self {
            max_depth: config.text_max_depth,
            preview_chars: config.string_preview_chars,
        }
    }

    fn block(
        header: &Header<'_>,
        children: impl IntoIterator<Item = (String, TextNode)>,
    ) -> TextNode {
        let (open, close) = header_text(header);
        let mut lines = Vec::new();
        for (label, child) in children {
            let mut child_lines = child.lines.into_iter();
            if let Some(first) = child_lines.next() {
                lines.push(format!("{INDENT}{label}{first}"));
            }
            lines.extend(child_lines.map(|line| format!("{INDENT}{line}")));
        }
        if lines.is_empty() {
            return TextNode::line(format!("{open}{close}"));
        }
        lines.insert(0, open);
        lines.push(close.to_string());
        TextNode { lines }
    }
}

fn header_text(header: &Header<'_>) -> (String, &'static str) {
    match header {
        Header::Array { len } => (format!("array({len}) ["), "]"),
        Header::Instance { id, object_name } => (
            format!("instance #{id} {} {{", escape_text(object_name)),
            "}",
        ),
        Header::Object { name: Some(name) } => (format!("struct {} {{", escape_text(name)), "}"),
        Header::Object { name: None } => ("struct {".to_string(), "}"),
        Header::List { handle, len } => (
            format!("ds_list {} ({len}) [", escape_text(handle)),
            "]",
        ),
        Header::Map { handle, len } => (
            format!("ds_map {} ({len}) {{", escape_text(handle)),
            "}",
        ),
    }
}

/// Joins a map key and value into one node: `<key> => <value>`.
fn join_entry(key: TextNode, value: TextNode) -> TextNode {
    let mut lines = key.lines;
    let mut value_lines = value.lines.into_iter();
    let last = lines.pop().unwrap_or_default();
    let first = value_lines.next().unwrap_or_default();
    lines.push(format!("{last} => {first}"));
    lines.extend(value_lines);
    TextNode { lines }
}

impl RenderStrategy for TextStrategy {
    type Node = TextNode;

    fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn undefined(&mut self) -> TextNode {
        TextNode::line("undefined")
    }

    fn method(&mut self, method: &MethodHandle) -> TextNode {
        match &method.name {
            Some(name) => TextNode::line(format!("<method {}>", escape_text(name))),
            None => TextNode::line("<method>"),
        }
    }

    fn pointer(&mut self, address: u64) -> TextNode {
        TextNode::line(format!("<pointer {address:#x}>"))
    }

    fn boolean(&mut self, value: bool) -> TextNode {
        TextNode::line(value.to_string())
    }

    fn number(&mut self, value: f64) -> TextNode {
        TextNode::line(value.to_string())
    }

    fn int64(&mut self, value: i64) -> TextNode {
        TextNode::line(format!("int64({value})"))
    }

    fn string(&mut self, value: &str) -> TextNode {
        let (escaped, truncated) = escape_preview(value, self.preview_chars);
        if truncated {
            TextNode::line(format!("\"{escaped}\"..."))
        } else {
            TextNode::line(format!("\"{escaped}\""))
        }
    }

    fn foreign_reference(&mut self, descriptor: &str) -> TextNode {
        TextNode::line(format!("<reference \"{}\">", escape_text(descriptor)))
    }

    fn invalid_reference(&mut self, descriptor: &str) -> TextNode {
        TextNode::line(format!("<invalid reference \"{}\">", escape_text(descriptor)))
    }

    fn seen(&mut self) -> TextNode {
        TextNode::line(SEEN_PLACEHOLDER)
    }

    fn depth_limit(&mut self) -> TextNode {
        TextNode::line(DEPTH_LIMIT_PLACEHOLDER)
    }

    fn sequence(&mut self, header: &Header<'_>, items: Vec<TextNode>) -> TextNode {
        Self::block(
            header,
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (format!("[{index}]: "), item)),
        )
    }

    fn members(&mut self, header: &Header<'_>, members: Vec<(&str, TextNode)>) -> TextNode {
        Self::block(
            header,
            members
                .into_iter()
                .map(|(name, value)| (format!("{}: ", escape_text(name)), value)),
        )
    }

    fn entries(&mut self, header: &Header<'_>, entries: Vec<(TextNode, TextNode)>) -> TextNode {
        Self::block(
            header,
            entries
                .into_iter()
                .map(|(key, value)| (String::new(), join_entry(key, value))),
        )
    }
}
