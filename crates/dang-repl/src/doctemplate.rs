//! The doc template shared between the completion detail bubble and doc
//! browser detail columns (spec.md §4.9): signature, word-wrapped doc
//! text, an argument list, and an optional block-argument section.

use unicode_width::UnicodeWidthStr;

pub struct DocArg {
    pub name: String,
    pub ty: String,
}

pub struct DocTemplate {
    pub signature: String,
    pub doc: Option<String>,
    pub args: Vec<DocArg>,
    pub block_arg: Option<String>,
}

/// Greedy word-wrap to `width` visible columns.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate_width = if current.is_empty() {
            word.width()
        } else {
            current.width() + 1 + word.width()
        };
        if candidate_width > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

impl DocTemplate {
    pub fn render(&self, width: u16) -> Vec<String> {
        let width = width.max(20) as usize;
        let mut lines = vec![self.signature.clone()];
        if let Some(doc) = &self.doc {
            lines.push(String::new());
            lines.extend(wrap(doc, width));
        }
        if !self.args.is_empty() {
            lines.push(String::new());
            for arg in &self.args {
                lines.push(format!("  {}: {}", arg.name, arg.ty));
            }
        }
        if let Some(block) = &self.block_arg {
            lines.push(String::new());
            lines.push(format!("  block: {block}"));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_signature_first() {
        let tmpl = DocTemplate { signature: "fn foo(): Int".into(), doc: None, args: Vec::new(), block_arg: None };
        assert_eq!(tmpl.render(40)[0], "fn foo(): Int");
    }

    #[test]
    fn wraps_doc_text_at_width() {
        let tmpl = DocTemplate {
            signature: "fn foo(): Int".into(),
            doc: Some("one two three four five six seven eight".into()),
            args: Vec::new(),
            block_arg: None,
        };
        let lines = tmpl.render(15);
        assert!(lines.iter().skip(2).all(|l| l.width() <= 15));
    }

    #[test]
    fn args_section_lists_each_arg() {
        let tmpl = DocTemplate {
            signature: "fn withEnvVariable(name: String, value: String): Container".into(),
            doc: None,
            args: vec![
                DocArg { name: "name".into(), ty: "String".into() },
                DocArg { name: "value".into(), ty: "String".into() },
            ],
            block_arg: None,
        };
        let lines = tmpl.render(60);
        assert!(lines.iter().any(|l| l.contains("name: String")));
        assert!(lines.iter().any(|l| l.contains("value: String")));
    }

    #[test]
    fn block_arg_section_is_optional() {
        let tmpl = DocTemplate { signature: "x".into(), doc: None, args: Vec::new(), block_arg: Some("() -> Unit".into()) };
        assert!(tmpl.render(40).iter().any(|l| l.contains("() -> Unit")));
    }
}
