//! Classifies a completion request by scanning the text left of the
//! cursor. Pure function over `&str`, no AST dependency — a small
//! hand-written scanner rather than a regex, so the cost is predictable
//! and there's no backtracking.

#[derive(Debug, Clone, PartialEq)]
pub enum CompletionContext {
    /// `recv.partial_field` — completion candidates are fields of the
    /// receiver's inferred type.
    Member { receiver: String, prefix: String },
    /// Cursor inside a balanced `(...)` call with `name:`-style tokens
    /// already present — candidates are the remaining named parameters.
    Arg { already_supplied: Vec<String>, prefix: String },
    /// Trailing identifier prefix with no `.` or open call in scope.
    Lexical { prefix: String },
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Scans backward from `cursor` (a byte offset into `text`) over
/// identifier characters, returning the prefix collected.
fn scan_ident_prefix(text: &str, cursor: usize) -> (usize, String) {
    let bytes = text.as_bytes();
    let mut i = cursor;
    while i > 0 {
        let c = text[..i].chars().last().unwrap();
        if is_ident_char(c) {
            i -= c.len_utf8();
        } else {
            break;
        }
    }
    let _ = bytes;
    (i, text[i..cursor].to_string())
}

pub fn classify(text: &str, cursor: usize) -> CompletionContext {
    let cursor = cursor.min(text.len());
    let (prefix_start, prefix) = scan_ident_prefix(text, cursor);

    // Member: immediately preceding the prefix is a `.`.
    if prefix_start > 0 && text[..prefix_start].ends_with('.') {
        let dot_at = prefix_start - 1;
        let (recv_start, receiver) = scan_ident_prefix(text, dot_at);
        let _ = recv_start;
        return CompletionContext::Member { receiver, prefix };
    }

    // Arg: walk backward counting parens; if we're inside an unbalanced
    // `(`, collect any `name:` tokens already present between the open
    // paren and the cursor.
    if let Some(open_paren) = find_enclosing_open_paren(&text[..prefix_start]) {
        let call_body = &text[open_paren + 1..prefix_start];
        let already_supplied = extract_named_args(call_body);
        return CompletionContext::Arg { already_supplied, prefix };
    }

    CompletionContext::Lexical { prefix }
}

/// Name of the function whose argument list encloses `cursor`, if any.
/// Used to resolve which function's parameters back an `Arg` completion —
/// `classify` itself only reports the already-supplied names, not the
/// callee, since it has no `Env` to resolve against.
pub fn enclosing_callee_name(text: &str, cursor: usize) -> Option<String> {
    let cursor = cursor.min(text.len());
    let (prefix_start, _) = scan_ident_prefix(text, cursor);
    let open_paren = find_enclosing_open_paren(&text[..prefix_start])?;
    let (_, name) = scan_ident_prefix(text, open_paren);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Scans `before` right-to-left tracking paren depth; returns the byte
/// offset of the nearest unmatched `(`, if any.
fn find_enclosing_open_paren(before: &str) -> Option<usize> {
    let mut depth = 0i32;
    for (i, c) in before.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' => {
                if depth == 0 {
                    return Some(i);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}

/// Pulls out `name` from every `name:` token in a call argument list,
/// ignoring string-literal contents.
fn extract_named_args(call_body: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut in_string = false;
    let mut chars = call_body.char_indices().peekable();
    let mut word_start: Option<usize> = None;
    while let Some((i, c)) = chars.next() {
        if in_string {
            if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            c if is_ident_char(c) => {
                if word_start.is_none() {
                    word_start = Some(i);
                }
            }
            ':' => {
                if let Some(start) = word_start.take() {
                    out.push(call_body[start..i].to_string());
                }
            }
            _ => word_start = None,
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_member_access() {
        let ctx = classify("container.fr", 12);
        assert_eq!(
            ctx,
            CompletionContext::Member { receiver: "container".into(), prefix: "fr".into() }
        );
    }

    #[test]
    fn classifies_arg_position_excluding_supplied_names() {
        let ctx = classify(r#"container.withExec(args: ["ls"], st"#, 35);
        assert_eq!(
            ctx,
            CompletionContext::Arg { already_supplied: vec!["args".into()], prefix: "st".into() }
        );
    }

    #[test]
    fn classifies_lexical_identifier() {
        let ctx = classify("let a = con", 11);
        assert_eq!(ctx, CompletionContext::Lexical { prefix: "con".into() });
    }

    #[test]
    fn balanced_parens_before_cursor_do_not_count_as_open() {
        // `foo(1, 2)` is closed by the time we reach `.ba`, so this is a
        // member access, not an arg position inside `foo(...)`.
        let ctx = classify("foo(1, 2).ba", 12);
        assert_eq!(ctx, CompletionContext::Member { receiver: "".into(), prefix: "ba".into() });
    }

    #[test]
    fn enclosing_callee_name_resolves_the_open_call() {
        let name = enclosing_callee_name(r#"withExec(args: ["ls"], st"#, 25);
        assert_eq!(name, Some("withExec".to_string()));
    }

    #[test]
    fn enclosing_callee_name_is_none_outside_a_call() {
        assert_eq!(enclosing_callee_name("let a = con", 11), None);
    }
}
