//! # Template Language
//!
//! A deliberately small mustache-style language. Pages only ever print
//! session figures, loop over savings rows and call the calculator, so that
//! is all it can do.
//!
//! ```text
//! {{ annual-income }}                         print a field (HTML escaped)
//! {{ savings.0.name }}                        numeric segments index lists
//! {{#each savings}} {{ .name }} {{/each}}     loop; `.x` is relative to the item
//! {{ . }}                                     the current item itself
//! {{ annualSaveRate income expenses }}        call a capability with money args
//! {{> content }}                              layout slot for the page body
//! ```
//!
//! ## Compile Once, Render Many
//! ```text
//!   layout source ──┐
//!                   ├──► parse ──► splice page into slot ──► Template
//!   page source ────┘      │                                   │
//!                          └─ function names resolved here     │
//!                                                              ▼
//!                                         render(&serde_json::Value) ──► String
//! ```
//!
//! Printable values are strings, numbers, booleans, null (prints nothing)
//! and money objects (`{"minor":..,"currency":..}`), which print with their
//! currency symbol.

use serde::Deserialize;
use serde_json::Value;

use picofi_core::Money;

use crate::error::{CompileError, DataError};
use crate::functions::{Capability, FunctionTable};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

// =============================================================================
// Field Paths
// =============================================================================

/// A dotted field path, either from the data root or from the current
/// `#each` item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    raw: String,
    relative: bool,
    segments: Vec<String>,
}

impl Path {
    pub fn parse(raw: &str) -> Result<Self, CompileError> {
        let invalid = || CompileError::InvalidPath {
            path: raw.to_string(),
        };

        let (relative, rest) = match raw.strip_prefix('.') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        if rest.is_empty() {
            // `.` alone is the current item; an empty root path is not a path
            return if relative {
                Ok(Path {
                    raw: raw.to_string(),
                    relative,
                    segments: Vec::new(),
                })
            } else {
                Err(invalid())
            };
        }

        let mut segments = Vec::new();
        for segment in rest.split('.') {
            let valid = !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
            if !valid {
                return Err(invalid());
            }
            segments.push(segment.to_string());
        }

        Ok(Path {
            raw: raw.to_string(),
            relative,
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn resolve<'v>(&self, root: &'v Value, current: &'v Value) -> Option<&'v Value> {
        let start = if self.relative { current } else { root };
        self.segments
            .iter()
            .try_fold(start, |value, segment| match value {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
    }

    fn missing(&self) -> DataError {
        DataError::MissingField {
            path: self.raw.clone(),
        }
    }
}

// =============================================================================
// Compiled Nodes
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Value(Path),
    Call { capability: Capability, args: Vec<Path> },
    Each { path: Path, body: Vec<Node> },
    Slot,
}

/// A compiled page: layout and page body merged, function calls resolved.
#[derive(Debug, Clone)]
pub struct Template {
    nodes: Vec<Node>,
    functions: FunctionTable,
}

impl Template {
    /// Compiles a single source with no layout.
    pub fn compile(source: &str, functions: &FunctionTable) -> Result<Self, CompileError> {
        Ok(Template {
            nodes: parse(source, functions)?,
            functions: functions.clone(),
        })
    }

    /// Compiles `page` into the `{{> content }}` slot of `layout`.
    pub fn compile_with_layout(
        layout: &str,
        page: &str,
        functions: &FunctionTable,
    ) -> Result<Self, CompileError> {
        let mut nodes = parse(layout, functions)?;
        let body = parse(page, functions)?;

        if !splice(&mut nodes, &body) {
            return Err(CompileError::MissingSlot);
        }

        Ok(Template {
            nodes,
            functions: functions.clone(),
        })
    }

    pub fn render(&self, data: &Value) -> Result<String, DataError> {
        let mut out = String::new();
        render_nodes(&self.nodes, &self.functions, data, data, &mut out)?;
        Ok(out)
    }
}

fn splice(nodes: &mut Vec<Node>, body: &[Node]) -> bool {
    let mut found = false;
    let mut i = 0;
    while i < nodes.len() {
        if matches!(nodes[i], Node::Slot) {
            nodes.splice(i..=i, body.iter().cloned());
            i += body.len();
            found = true;
            continue;
        }
        if let Node::Each { body: inner, .. } = &mut nodes[i] {
            found |= splice(inner, body);
        }
        i += 1;
    }
    found
}

// =============================================================================
// Parser
// =============================================================================

struct Frame {
    each: Option<(Path, usize)>,
    nodes: Vec<Node>,
}

fn parse(source: &str, functions: &FunctionTable) -> Result<Vec<Node>, CompileError> {
    let mut stack = vec![Frame {
        each: None,
        nodes: Vec::new(),
    }];
    let mut pos = 0;

    while let Some(found) = source[pos..].find(OPEN) {
        let open = pos + found;
        if open > pos {
            push(&mut stack, Node::Text(source[pos..open].to_string()));
        }

        let inner_start = open + OPEN.len();
        let close = source[inner_start..]
            .find(CLOSE)
            .map(|i| inner_start + i)
            .ok_or(CompileError::Unterminated { offset: open })?;
        pos = close + CLOSE.len();

        let tag = source[inner_start..close].trim();
        if tag.is_empty() {
            return Err(CompileError::EmptyTag { offset: open });
        }

        if let Some(block) = tag.strip_prefix('#') {
            let (keyword, rest) = split_word(block);
            if keyword != "each" {
                return Err(CompileError::UnknownBlock {
                    tag: tag.to_string(),
                    offset: open,
                });
            }
            stack.push(Frame {
                each: Some((Path::parse(rest)?, open)),
                nodes: Vec::new(),
            });
        } else if let Some(block) = tag.strip_prefix('/') {
            if block.trim() != "each" {
                return Err(CompileError::UnknownBlock {
                    tag: tag.to_string(),
                    offset: open,
                });
            }
            if stack.len() == 1 {
                return Err(CompileError::UnexpectedClose { offset: open });
            }
            if let Some(Frame {
                each: Some((path, _)),
                nodes,
            }) = stack.pop()
            {
                push(&mut stack, Node::Each { path, body: nodes });
            }
        } else if let Some(partial) = tag.strip_prefix('>') {
            if partial.trim() != "content" {
                return Err(CompileError::UnknownBlock {
                    tag: tag.to_string(),
                    offset: open,
                });
            }
            push(&mut stack, Node::Slot);
        } else {
            push(&mut stack, expression(tag, open, functions)?);
        }
    }

    if pos < source.len() {
        push(&mut stack, Node::Text(source[pos..].to_string()));
    }

    match stack.pop() {
        Some(Frame {
            each: Some((_, offset)),
            ..
        }) => Err(CompileError::UnclosedEach { offset }),
        Some(frame) => Ok(frame.nodes),
        None => Ok(Vec::new()),
    }
}

fn push(stack: &mut [Frame], node: Node) {
    if let Some(frame) = stack.last_mut() {
        frame.nodes.push(node);
    }
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

fn expression(tag: &str, offset: usize, functions: &FunctionTable) -> Result<Node, CompileError> {
    let mut tokens = tag.split_whitespace();
    let head = tokens.next().unwrap_or_default();
    let rest: Vec<&str> = tokens.collect();

    if let Some(capability) = functions.resolve(head) {
        if rest.len() != capability.arity() {
            return Err(CompileError::Arity {
                function: capability.name(),
                expected: capability.arity(),
                found: rest.len(),
            });
        }
        let args = rest
            .into_iter()
            .map(Path::parse)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Node::Call { capability, args });
    }

    if !rest.is_empty() {
        return Err(CompileError::UnknownFunction {
            name: head.to_string(),
            offset,
        });
    }

    Ok(Node::Value(Path::parse(head)?))
}

// =============================================================================
// Rendering
// =============================================================================

fn render_nodes(
    nodes: &[Node],
    functions: &FunctionTable,
    root: &Value,
    current: &Value,
    out: &mut String,
) -> Result<(), DataError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Value(path) => {
                let value = path.resolve(root, current).ok_or_else(|| path.missing())?;
                escape_into(&printable(value, path)?, out);
            }
            Node::Call { capability, args } => {
                let mut amounts = Vec::with_capacity(args.len());
                for path in args {
                    let value = path.resolve(root, current).ok_or_else(|| path.missing())?;
                    let amount = Money::deserialize(value).map_err(|_| DataError::BadArgument {
                        function: capability.name(),
                        path: path.as_str().to_string(),
                    })?;
                    amounts.push(amount);
                }
                escape_into(&functions.call(*capability, &amounts), out);
            }
            Node::Each { path, body } => {
                let value = path.resolve(root, current).ok_or_else(|| path.missing())?;
                let Value::Array(items) = value else {
                    return Err(DataError::NotIterable {
                        path: path.as_str().to_string(),
                    });
                };
                for item in items {
                    render_nodes(body, functions, root, item, out)?;
                }
            }
            // Only reachable when a template without layout has a slot
            Node::Slot => {}
        }
    }
    Ok(())
}

fn printable(value: &Value, path: &Path) -> Result<String, DataError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        Value::Object(_) => Money::deserialize(value)
            .map(|money| money.to_string())
            .map_err(|_| DataError::NotPrintable {
                path: path.as_str().to_string(),
            }),
        Value::Array(_) => Err(DataError::NotPrintable {
            path: path.as_str().to_string(),
        }),
    }
}

fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use picofi_core::{Calculator, Currency};
    use serde_json::json;

    fn table() -> FunctionTable {
        FunctionTable::new(Calculator::new(Currency::Eur))
    }

    fn render(source: &str, data: Value) -> Result<String, DataError> {
        Template::compile(source, &table()).unwrap().render(&data)
    }

    fn eur(major: i64) -> Value {
        json!({ "minor": major * 100, "currency": "EUR" })
    }

    #[test]
    fn test_prints_and_escapes_fields() {
        let out = render(
            "<p>{{ name }} / {{ count }} / {{ flag }} / {{ nothing }}</p>",
            json!({ "name": "<Tom & \"Jerry\">", "count": 3, "flag": true, "nothing": null }),
        )
        .unwrap();
        assert_eq!(out, "<p>&lt;Tom &amp; &quot;Jerry&quot;&gt; / 3 / true / </p>");
    }

    #[test]
    fn test_prints_money_with_symbol() {
        let out = render("{{ income }}", json!({ "income": eur(70_000) })).unwrap();
        assert_eq!(out, "€70,000.00");
    }

    #[test]
    fn test_each_with_relative_and_root_paths() {
        let data = json!({
            "title": "Rows",
            "savings": [
                { "name": "Deposit", "amount": eur(15_000) },
                { "name": "Stocks", "amount": eur(4_000) },
            ],
        });
        let out = render(
            "{{#each savings}}[{{ .name }} {{ .amount }} {{ title }}]{{/each}}",
            data,
        )
        .unwrap();
        assert_eq!(out, "[Deposit €15,000.00 Rows][Stocks €4,000.00 Rows]");
    }

    #[test]
    fn test_nested_each_and_current_item() {
        let data = json!({ "groups": [ { "tags": ["a", "b"] }, { "tags": [] } ] });
        let out = render("{{#each groups}}({{#each .tags}}{{ . }}{{/each}}){{/each}}", data).unwrap();
        assert_eq!(out, "(ab)()");
    }

    #[test]
    fn test_numeric_segment_indexes_lists() {
        let data = json!({ "savings": [ { "name": "First" } ] });
        assert_eq!(render("{{ savings.0.name }}", data).unwrap(), "First");
    }

    #[test]
    fn test_calls_capabilities() {
        let data = json!({ "income": eur(100_000), "expenses": eur(20_000) });
        let out = render(
            "{{ annualSaveRate income expenses }} {{ annualSaveRatePercent income expenses }}",
            data,
        )
        .unwrap();
        assert_eq!(out, "€80,000.00 80.00%");
    }

    #[test]
    fn test_calculation_errors_render_inline() {
        let data = json!({ "income": eur(-5), "expenses": eur(0) });
        let out = render("{{ annualSaveRate income expenses }}", data).unwrap();
        assert_eq!(out, "error: income can&#39;t be negative, don&#39;t include debt here");
    }

    #[test]
    fn test_compile_errors() {
        let t = table();
        assert_eq!(
            Template::compile("a {{ b", &t).unwrap_err(),
            CompileError::Unterminated { offset: 2 }
        );
        assert_eq!(
            Template::compile("{{  }}", &t).unwrap_err(),
            CompileError::EmptyTag { offset: 0 }
        );
        assert_eq!(
            Template::compile("{{ launchRockets a b }}", &t).unwrap_err(),
            CompileError::UnknownFunction {
                name: "launchRockets".to_string(),
                offset: 0
            }
        );
        assert_eq!(
            Template::compile("{{ annualSaveRate income }}", &t).unwrap_err(),
            CompileError::Arity {
                function: "annualSaveRate",
                expected: 2,
                found: 1
            }
        );
        assert!(matches!(
            Template::compile("{{ a..b }}", &t).unwrap_err(),
            CompileError::InvalidPath { .. }
        ));
        assert!(matches!(
            Template::compile("{{#if x}}{{/if}}", &t).unwrap_err(),
            CompileError::UnknownBlock { .. }
        ));
        assert_eq!(
            Template::compile("x{{/each}}", &t).unwrap_err(),
            CompileError::UnexpectedClose { offset: 1 }
        );
        assert_eq!(
            Template::compile("{{#each rows}}", &t).unwrap_err(),
            CompileError::UnclosedEach { offset: 0 }
        );
    }

    #[test]
    fn test_function_names_need_the_table() {
        let empty = FunctionTable::empty(Calculator::new(Currency::Eur));
        assert!(matches!(
            Template::compile("{{ annualSaveRate income expenses }}", &empty),
            Err(CompileError::UnknownFunction { .. })
        ));
    }

    #[test]
    fn test_layout_slot() {
        let t = table();
        let template =
            Template::compile_with_layout("<main>{{> content }}</main>", "<h1>{{ title }}</h1>", &t)
                .unwrap();
        assert_eq!(
            template.render(&json!({ "title": "Hi" })).unwrap(),
            "<main><h1>Hi</h1></main>"
        );

        assert_eq!(
            Template::compile_with_layout("<main></main>", "x", &t).unwrap_err(),
            CompileError::MissingSlot
        );
    }

    #[test]
    fn test_data_errors() {
        assert_eq!(
            render("{{ missing }}", json!({})).unwrap_err(),
            DataError::MissingField {
                path: "missing".to_string()
            }
        );
        assert_eq!(
            render("{{#each rows}}{{/each}}", json!({ "rows": 3 })).unwrap_err(),
            DataError::NotIterable {
                path: "rows".to_string()
            }
        );
        assert_eq!(
            render("{{ rows }}", json!({ "rows": [1] })).unwrap_err(),
            DataError::NotPrintable {
                path: "rows".to_string()
            }
        );
        assert_eq!(
            render(
                "{{ annualSaveRate income expenses }}",
                json!({ "income": "lots", "expenses": eur(1) })
            )
            .unwrap_err(),
            DataError::BadArgument {
                function: "annualSaveRate",
                path: "income".to_string()
            }
        );
    }
}
