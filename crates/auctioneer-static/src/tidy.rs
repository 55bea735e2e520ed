//! HTML normalization.
//!
//! Documents are parsed with html5ever, which repairs the tree and reports
//! parse errors, and then printed back out with one block element per line.
//! Inline content stays on its parent's line with whitespace runs collapsed.

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Elements that start their own line.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "base", "blockquote", "body", "caption", "col", "colgroup",
    "dd", "details", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form",
    "h1", "h2", "h3", "h4", "h5", "h6", "head", "header", "hr", "html", "li", "link", "main",
    "meta", "nav", "noscript", "ol", "p", "pre", "script", "section", "style", "summary",
    "table", "tbody", "td", "tfoot", "th", "thead", "title", "tr", "ul",
];

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose text is written out unescaped. `noscript` belongs here
/// because documents are parsed with scripting enabled.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "iframe", "noembed", "noframes", "noscript", "plaintext", "script", "style", "xmp",
];

/// Elements whose whitespace is significant.
const PREFORMATTED_ELEMENTS: &[&str] = &["pre", "textarea"];

/// Output options for [`tidy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TidyOptions {
    /// Spaces per nesting level
    pub indent: usize,
    /// Self-close void elements (`<br />`)
    pub xhtml: bool,
}

impl Default for TidyOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            xhtml: false,
        }
    }
}

/// A normalized document and the parse problems found along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tidied {
    pub document: String,
    pub warnings: Vec<String>,
}

/// Parse and pretty-print an HTML document.
///
/// Never fails: malformed input is repaired the way a browser would and
/// each repair is listed in [`Tidied::warnings`]. Lines are never wrapped.
pub fn tidy(html: &str, options: TidyOptions) -> Tidied {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
    let warnings = dom.errors.iter().map(|e| e.to_string()).collect();

    let mut printer = Printer {
        options,
        out: String::new(),
    };
    printer.children(&dom.document, 0);

    Tidied {
        document: printer.out,
        warnings,
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum TextMode {
    Collapse,
    Preserve,
    Raw,
}

struct Printer {
    options: TidyOptions,
    out: String,
}

impl Printer {
    /// Print the children of a block node, each block child on its own line
    /// and each run of inline children joined onto one line.
    fn children(&mut self, parent: &Handle, depth: usize) {
        let mut run = String::new();

        for child in child_nodes(parent).iter() {
            if is_block(child) {
                self.flush_run(&mut run, depth);
                self.block(child, depth);
            } else {
                self.inline(child, &mut run, TextMode::Collapse);
            }
        }
        self.flush_run(&mut run, depth);
    }

    fn flush_run(&mut self, run: &mut String, depth: usize) {
        let text = run.trim();
        if !text.is_empty() {
            self.line(depth, text);
        }
        run.clear();
    }

    fn block(&mut self, handle: &Handle, depth: usize) {
        match &handle.data {
            NodeData::Doctype { name, .. } => {
                self.line(depth, &format!("<!DOCTYPE {}>", name));
            }
            NodeData::Comment { contents } => {
                self.line(depth, &format!("<!--{}-->", contents));
            }
            NodeData::Element { name, .. } => {
                let tag = &*name.local;
                let open = self.open_tag(handle);

                if VOID_ELEMENTS.contains(&tag) {
                    self.line(depth, &open);
                } else if RAW_TEXT_ELEMENTS.contains(&tag) {
                    let mut body = String::new();
                    for child in child_nodes(handle).iter() {
                        self.inline(child, &mut body, TextMode::Raw);
                    }
                    if body.trim().is_empty() {
                        self.line(depth, &format!("{}</{}>", open, tag));
                    } else {
                        self.line(depth, &open);
                        self.reindent(&body, depth + 1);
                        self.line(depth, &format!("</{}>", tag));
                    }
                } else if PREFORMATTED_ELEMENTS.contains(&tag) {
                    let mut line = String::new();
                    self.inline(handle, &mut line, TextMode::Collapse);
                    self.line(depth, &line);
                } else if child_nodes(handle).iter().any(is_block) {
                    self.line(depth, &open);
                    self.children(handle, depth + 1);
                    self.line(depth, &format!("</{}>", tag));
                } else {
                    let mut inner = String::new();
                    for child in child_nodes(handle).iter() {
                        self.inline(child, &mut inner, TextMode::Collapse);
                    }
                    self.line(depth, &format!("{}{}</{}>", open, inner.trim(), tag));
                }
            }
            NodeData::Document => self.children(handle, depth),
            NodeData::Text { .. } => {
                let mut run = String::new();
                self.inline(handle, &mut run, TextMode::Collapse);
                self.flush_run(&mut run, depth);
            }
            NodeData::ProcessingInstruction { .. } => {}
        }
    }

    /// Serialize a node onto a single line.
    fn inline(&self, handle: &Handle, out: &mut String, mode: TextMode) {
        match &handle.data {
            NodeData::Text { contents } => {
                let text = contents.borrow();
                match mode {
                    TextMode::Raw => out.push_str(&text),
                    TextMode::Preserve => escape_text(&text, out, false),
                    TextMode::Collapse => escape_text(&text, out, true),
                }
            }
            NodeData::Comment { contents } => {
                out.push_str("<!--");
                out.push_str(contents);
                out.push_str("-->");
            }
            NodeData::Element { name, .. } => {
                let tag = &*name.local;
                out.push_str(&self.open_tag(handle));
                if VOID_ELEMENTS.contains(&tag) {
                    return;
                }

                let child_mode = if RAW_TEXT_ELEMENTS.contains(&tag) {
                    TextMode::Raw
                } else if PREFORMATTED_ELEMENTS.contains(&tag) {
                    TextMode::Preserve
                } else {
                    mode
                };

                // html5ever drops one newline right after <pre>
                if child_mode == TextMode::Preserve
                    && mode != TextMode::Preserve
                    && starts_with_newline(handle)
                {
                    out.push('\n');
                }

                for child in child_nodes(handle).iter() {
                    self.inline(child, out, child_mode);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            NodeData::Document | NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => {}
        }
    }

    fn open_tag(&self, handle: &Handle) -> String {
        let NodeData::Element { name, attrs, .. } = &handle.data else {
            return String::new();
        };

        let tag = &*name.local;
        let mut out = format!("<{}", tag);
        for attr in attrs.borrow().iter() {
            out.push(' ');
            if let Some(prefix) = &attr.name.prefix {
                out.push_str(prefix);
                out.push(':');
            }
            out.push_str(&attr.name.local);
            out.push_str("=\"");
            escape_attribute(&attr.value, &mut out);
            out.push('"');
        }

        if self.options.xhtml && VOID_ELEMENTS.contains(&tag) {
            out.push_str(" />");
        } else {
            out.push('>');
        }
        out
    }

    /// Write raw text block content, dedented and then indented to `depth`.
    fn reindent(&mut self, body: &str, depth: usize) {
        let lines: Vec<&str> = body.lines().collect();
        let first = lines.iter().position(|l| !l.trim().is_empty()).unwrap_or(0);
        let last = lines
            .iter()
            .rposition(|l| !l.trim().is_empty())
            .unwrap_or(0);
        let lines = &lines[first..=last];

        // Only ASCII space and tab count towards the margin, so slicing by
        // byte stays on a char boundary.
        let margin = lines
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.len() - l.trim_start_matches([' ', '\t']).len())
            .min()
            .unwrap_or(0);

        for line in lines {
            if line.trim().is_empty() {
                self.out.push('\n');
            } else {
                self.line(depth, line[margin..].trim_end());
            }
        }
    }

    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth * self.options.indent {
            self.out.push(' ');
        }
        self.out.push_str(text);
        self.out.push('\n');
    }
}

/// Child nodes of `handle`. A `<template>` keeps its children in a separate
/// document fragment.
fn child_nodes(handle: &Handle) -> Vec<Handle> {
    if let NodeData::Element {
        template_contents, ..
    } = &handle.data
    {
        if let Some(fragment) = template_contents.borrow().as_ref() {
            return fragment.children.borrow().clone();
        }
    }
    handle.children.borrow().clone()
}

fn is_block(handle: &Handle) -> bool {
    match &handle.data {
        NodeData::Element { name, .. } => BLOCK_ELEMENTS.contains(&&*name.local),
        NodeData::Doctype { .. } | NodeData::Comment { .. } | NodeData::Document => true,
        NodeData::Text { .. } | NodeData::ProcessingInstruction { .. } => false,
    }
}

fn starts_with_newline(handle: &Handle) -> bool {
    match handle.children.borrow().first().map(|c| &c.data) {
        Some(NodeData::Text { contents }) => contents.borrow().starts_with('\n'),
        _ => false,
    }
}

fn escape_text(text: &str, out: &mut String, collapse: bool) {
    let mut in_space = false;
    for c in text.chars() {
        if collapse && c.is_ascii_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}
