//! Formatting of the "Example Usage" section of a resource doc.
//!
//! Fenced examples are pulled out of the surrounding prose, each HCL body is
//! passed through a [`BlockFormatter`] and the pieces are put back together
//! with one blank line between a label and its block.

use once_cell::sync::Lazy;
use regex::Regex;

/// Prose, optional `hcl` tag and body of each fenced block.
static EXAMPLE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?si)([^`]+)?```(hcl)?(.*?)```").expect("Invalid example block regex")
});

static ASSIGN_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?:[A-Za-z_][A-Za-z0-9_\-]*|"[^"]*")$"#).expect("Invalid assignment key regex")
});

static HEREDOC_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<<(-?)([A-Za-z_][A-Za-z0-9_]*)\s*$").expect("Invalid heredoc regex")
});

const INDENT: &str = "  ";

/// Formats the body of a single HCL code block.
pub trait BlockFormatter {
    fn format_block(&self, body: &str) -> String;
}

/// Reformat every fenced example in `s` with the built-in formatter.
pub fn format_hcl(s: &str) -> String {
    format_hcl_with(s, &CanonicalFormatter)
}

/// Reformat every fenced example in `s` with `formatter`.
///
/// Text outside of a fence that is not directly followed by one is dropped,
/// and input without any fence yields an empty string.
pub fn format_hcl_with(s: &str, formatter: &dyn BlockFormatter) -> String {
    let blocks: Vec<String> = EXAMPLE_BLOCK
        .captures_iter(s.trim())
        .map(|caps| {
            let prose = caps.get(1).map_or("", |m| m.as_str()).trim();
            let prose = if prose.is_empty() {
                String::new()
            } else {
                format!("\n{}\n\n", prose)
            };
            let body = caps.get(3).map_or("", |m| m.as_str()).trim();
            format!("{}```hcl\n{}\n```", prose, formatter.format_block(body))
        })
        .collect();

    blocks.join("\n").trim().to_string()
}

/// Built-in formatter producing `terraform fmt` style output: two-space
/// indentation and aligned `=` within runs of single-line assignments.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalFormatter;

impl BlockFormatter for CanonicalFormatter {
    fn format_block(&self, body: &str) -> String {
        render(&layout(body))
    }
}

#[derive(Debug, PartialEq)]
enum FmtLine {
    Blank,
    Verbatim(String),
    Text {
        indent: usize,
        text: String,
    },
    Assign {
        indent: usize,
        key: String,
        value: String,
        comment: Option<String>,
        align: bool,
    },
}

#[derive(Debug, Default)]
struct LineScan {
    net: i32,
    assign: Option<usize>,
    /// Start of a trailing `#` or `//` comment.
    comment: Option<usize>,
    heredoc: Option<String>,
    opens_comment: bool,
}

#[derive(Clone, Copy)]
enum Mode {
    Code,
    Str,
    /// Inside `${ ... }`, counting unclosed inner braces.
    Template(u32),
}

/// Scan one line for bracket changes outside strings and comments, and for
/// the first top-level `=` that is not part of an operator.
fn scan_line(line: &str) -> LineScan {
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut scan = LineScan::default();
    let mut stack = vec![Mode::Code];
    let mut depth = 0i32;
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];
        let next = chars.get(i + 1).map(|&(_, n)| n);
        let prev = if i > 0 { Some(chars[i - 1].1) } else { None };

        match stack.last().copied() {
            Some(Mode::Str) => match c {
                '\\' => i += 1,
                '"' => {
                    stack.pop();
                }
                '$' | '%' if next == Some('{') => {
                    stack.push(Mode::Template(0));
                    i += 1;
                }
                _ => {}
            },
            Some(Mode::Template(nested)) => match c {
                '"' => stack.push(Mode::Str),
                '{' => {
                    stack.pop();
                    stack.push(Mode::Template(nested + 1));
                }
                '}' => {
                    stack.pop();
                    if nested > 0 {
                        stack.push(Mode::Template(nested - 1));
                    }
                }
                _ => {}
            },
            Some(Mode::Code) | None => match c {
                '"' => stack.push(Mode::Str),
                '#' => {
                    scan.comment = Some(pos);
                    break;
                }
                '/' if next == Some('/') => {
                    scan.comment = Some(pos);
                    break;
                }
                '/' if next == Some('*') => match line[pos + 2..].find("*/") {
                    Some(end) => {
                        let resume = pos + 2 + end + 2;
                        while i + 1 < chars.len() && chars[i + 1].0 < resume {
                            i += 1;
                        }
                    }
                    None => {
                        scan.opens_comment = true;
                        break;
                    }
                },
                '{' | '[' | '(' => {
                    depth += 1;
                    scan.net += 1;
                }
                '}' | ']' | ')' => {
                    depth -= 1;
                    scan.net -= 1;
                }
                '<' if next == Some('<') => {
                    if let Some(caps) = HEREDOC_START.captures(&line[pos..]) {
                        if caps.get(0).map(|m| m.start()) == Some(0) {
                            scan.heredoc = Some(caps[2].to_string());
                            break;
                        }
                    }
                    i += 1;
                }
                '=' if depth == 0
                    && scan.assign.is_none()
                    && !matches!(prev, Some('=' | '!' | '<' | '>'))
                    && !matches!(next, Some('=' | '>')) =>
                {
                    scan.assign = Some(pos);
                }
                _ => {}
            },
        }
        i += 1;
    }

    scan
}

/// Ensure exactly one space between a block header and its opening brace.
fn normalize_header(text: &str) -> String {
    match text.strip_suffix('{') {
        Some(head) => {
            let head = head.trim_end();
            match head.chars().last() {
                Some(c) if c.is_alphanumeric() || c == '"' || c == '_' || c == '-' => {
                    format!("{} {{", head)
                }
                _ => text.to_string(),
            }
        }
        None => text.to_string(),
    }
}

fn layout(body: &str) -> Vec<FmtLine> {
    let mut lines = Vec::new();
    // Open bracket counts per indent level.
    let mut indents: Vec<i32> = Vec::new();
    let mut heredoc: Option<String> = None;
    let mut in_comment = false;

    for raw in body.lines() {
        if let Some(terminator) = heredoc.as_deref() {
            let closed = raw.trim() == terminator;
            lines.push(FmtLine::Verbatim(raw.trim_end().to_string()));
            if closed {
                heredoc = None;
            }
            continue;
        }

        let text = raw.trim();
        if text.is_empty() {
            lines.push(FmtLine::Blank);
            continue;
        }

        if in_comment {
            in_comment = !text.contains("*/");
            lines.push(FmtLine::Text {
                indent: indents.len(),
                text: text.to_string(),
            });
            continue;
        }

        let scan = scan_line(text);
        in_comment = scan.opens_comment;

        if scan.net < 0 {
            let mut closed = -scan.net;
            while closed > 0 {
                let Some(top) = indents.last_mut() else { break };
                if closed >= *top {
                    closed -= *top;
                    indents.pop();
                } else {
                    *top -= closed;
                    closed = 0;
                }
            }
        }
        let indent = indents.len();
        if scan.net > 0 {
            indents.push(scan.net);
        }

        let code_end = scan.comment.unwrap_or(text.len());
        let assignment = scan.assign.and_then(|pos| {
            let key = text[..pos].trim();
            ASSIGN_KEY
                .is_match(key)
                .then(|| (key.to_string(), text[pos + 1..code_end].trim().to_string()))
        });

        match assignment {
            Some((key, value)) => lines.push(FmtLine::Assign {
                indent,
                key,
                value,
                comment: scan.comment.map(|pos| text[pos..].to_string()),
                align: scan.net == 0 && scan.heredoc.is_none(),
            }),
            None => lines.push(FmtLine::Text {
                indent,
                text: normalize_header(text),
            }),
        }

        heredoc = scan.heredoc;
    }

    lines
}

fn render(lines: &[FmtLine]) -> String {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        match &lines[i] {
            FmtLine::Blank => out.push(String::new()),
            FmtLine::Verbatim(text) => out.push(text.clone()),
            FmtLine::Text { indent, text } => out.push(format!("{}{}", INDENT.repeat(*indent), text)),
            FmtLine::Assign {
                indent,
                align: true,
                ..
            } => {
                let end = alignment_run_end(lines, i, *indent);
                let width = lines[i..end]
                    .iter()
                    .filter_map(|line| match line {
                        FmtLine::Assign { key, .. } => Some(key.chars().count()),
                        _ => None,
                    })
                    .max()
                    .unwrap_or(0);
                let rows: Vec<(String, Option<&str>)> = lines[i..end]
                    .iter()
                    .filter_map(|line| match line {
                        FmtLine::Assign {
                            key,
                            value,
                            comment,
                            ..
                        } => {
                            let pad = " ".repeat(width - key.chars().count());
                            Some((assignment(*indent, key, &pad, value), comment.as_deref()))
                        }
                        _ => None,
                    })
                    .collect();
                out.extend(align_comments(&rows));
                i = end;
                continue;
            }
            FmtLine::Assign {
                indent,
                key,
                value,
                comment,
                ..
            } => {
                let line = assignment(*indent, key, "", value);
                out.push(match comment {
                    Some(comment) => format!("{} {}", line, comment),
                    None => line,
                });
            }
        }
        i += 1;
    }

    out.join("\n").trim().to_string()
}

fn alignment_run_end(lines: &[FmtLine], start: usize, indent: usize) -> usize {
    let mut end = start;
    while let Some(FmtLine::Assign {
        indent: level,
        align: true,
        ..
    }) = lines.get(end)
    {
        if *level != indent {
            break;
        }
        end += 1;
    }
    end
}

/// Pad trailing comments of consecutive commented rows to one column.
fn align_comments(rows: &[(String, Option<&str>)]) -> Vec<String> {
    let mut out = Vec::with_capacity(rows.len());
    let mut i = 0;

    while i < rows.len() {
        if rows[i].1.is_none() {
            out.push(rows[i].0.clone());
            i += 1;
            continue;
        }
        let end = rows[i..]
            .iter()
            .position(|(_, comment)| comment.is_none())
            .map_or(rows.len(), |n| i + n);
        let width = rows[i..end]
            .iter()
            .map(|(code, _)| code.chars().count())
            .max()
            .unwrap_or(0);
        for (code, comment) in &rows[i..end] {
            let pad = " ".repeat(width - code.chars().count());
            out.push(format!("{}{} {}", code, pad, comment.unwrap_or_default()));
        }
        i = end;
    }

    out
}

fn assignment(indent: usize, key: &str, pad: &str, value: &str) -> String {
    let line = format!("{}{}{} = {}", INDENT.repeat(indent), key, pad, value);
    line.trim_end().to_string()
}
