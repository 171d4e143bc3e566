//! Console input parsing
//!
//! Two entry points: [`split_args`] tokenizes a command line preserving
//! quoted substrings, and [`parse_method_call`] recognizes the
//! `<Class>.method(args)` sugar form.

/// A parsed `<Class>.method(args)` call
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub class_name: String,
    pub method: String,
    pub args: Vec<String>,
}

/// Split a command line into whitespace-separated tokens
///
/// Double- or single-quoted substrings are kept as one token with the
/// quotes stripped, so `update User 1 name "My House"` yields five tokens.
pub fn split_args(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut has_token = false;

    for ch in line.chars() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                } else {
                    current.push(ch);
                }
            }
            None => match ch {
                '"' | '\'' => {
                    quote = Some(ch);
                    has_token = true;
                }
                c if c.is_whitespace() => {
                    if has_token {
                        args.push(std::mem::take(&mut current));
                        has_token = false;
                    }
                }
                c => {
                    current.push(c);
                    has_token = true;
                }
            },
        }
    }
    if has_token {
        args.push(current);
    }
    args
}

/// Parse a `<Class>.method(args)` line
///
/// Returns None when the line is not a well-formed call (no dot, no
/// parenthesized tail, empty class or method name). Arguments are split on
/// top-level commas with surrounding quotes stripped; validation of the
/// class name and method happens in the console, not here.
pub fn parse_method_call(line: &str) -> Option<MethodCall> {
    let line = line.trim();
    let rest = line.strip_suffix(')')?;
    let dot = rest.find('.')?;
    let class_name = &rest[..dot];
    let call = &rest[dot + 1..];
    let open = call.find('(')?;
    let method = &call[..open];
    let inner = &call[open + 1..];

    if class_name.is_empty()
        || method.is_empty()
        || !is_identifier(class_name)
        || !is_identifier(method)
        || has_unquoted_paren(inner)
    {
        return None;
    }

    Some(MethodCall {
        class_name: class_name.to_string(),
        method: method.to_string(),
        args: split_call_args(inner),
    })
}

/// Stray parentheses in the argument list mean the call is malformed
fn has_unquoted_paren(inner: &str) -> bool {
    let mut quote: Option<char> = None;
    for ch in inner.chars() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                '(' | ')' => return true,
                _ => {}
            },
        }
    }
    false
}

fn is_identifier(token: &str) -> bool {
    token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split a call's argument list on top-level commas
///
/// Commas inside quotes do not split; each piece is trimmed and stripped of
/// one pair of surrounding quotes. An empty argument (`show("")`) is a real
/// argument; only an entirely blank list yields no arguments.
fn split_call_args(inner: &str) -> Vec<String> {
    if inner.trim().is_empty() {
        return Vec::new();
    }
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in inner.chars() {
        match quote {
            Some(q) => {
                current.push(ch);
                if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '"' | '\'' => {
                    quote = Some(ch);
                    current.push(ch);
                }
                ',' => pieces.push(std::mem::take(&mut current)),
                c => current.push(c),
            },
        }
    }
    pieces.push(current);

    pieces
        .iter()
        .map(|piece| strip_quotes(piece.trim()).to_string())
        .collect()
}

fn strip_quotes(token: &str) -> &str {
    for quote in ['"', '\''] {
        if token.len() >= 2 && token.starts_with(quote) && token.ends_with(quote) {
            return &token[1..token.len() - 1];
        }
    }
    token
}
