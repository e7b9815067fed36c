//! SQL identifier quoting.
//!
//! Column and table names come from metadata this crate does not own, so they are
//! never spliced into SQL verbatim. Every identifier part is rendered double-quoted
//! with embedded `"` doubled, which also preserves mixed case (`"articleID"`).
//!
//! - Column names are taken literally: [`Ident::column`]
//! - Table names may be schema-qualified (`shop.s_articles_img`) and may use quoted
//!   parts (`"My Schema".items`): [`Ident::table`]

use crate::error::{BindError, BindResult};

/// A SQL identifier made of one or more dot-separated parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    parts: Vec<String>,
}

impl Ident {
    /// A single-part identifier taken literally (dots are part of the name).
    pub fn column(name: &str) -> BindResult<Self> {
        check_part(name)?;
        Ok(Self {
            parts: vec![name.to_string()],
        })
    }

    /// A schema-qualified name from literal parts.
    pub fn qualified(schema: &str, name: &str) -> BindResult<Self> {
        check_part(schema)?;
        check_part(name)?;
        Ok(Self {
            parts: vec![schema.to_string(), name.to_string()],
        })
    }

    /// Parse a possibly schema-qualified table name.
    ///
    /// Unquoted parts are split on `.`; quoted parts may contain anything but NUL,
    /// with `""` standing for a literal quote.
    pub fn table(s: &str) -> BindResult<Self> {
        if s.is_empty() {
            return Err(BindError::validation("Identifier cannot be empty"));
        }

        let mut parts = Vec::new();
        let mut chars = s.chars().peekable();

        loop {
            let mut name = String::new();
            if chars.peek() == Some(&'"') {
                chars.next();
                loop {
                    match chars.next() {
                        Some('"') if chars.peek() == Some(&'"') => {
                            chars.next();
                            name.push('"');
                        }
                        Some('"') => break,
                        Some(c) => name.push(c),
                        None => return Err(BindError::validation("Unclosed quoted identifier")),
                    }
                }
            } else {
                while let Some(&c) = chars.peek() {
                    if c == '.' {
                        break;
                    }
                    if c == '"' {
                        return Err(BindError::validation(format!(
                            "Unexpected quote in identifier '{s}'"
                        )));
                    }
                    name.push(c);
                    chars.next();
                }
            }
            check_part(&name)?;
            parts.push(name);

            match chars.next() {
                None => break,
                Some('.') => {
                    if chars.peek().is_none() {
                        return Err(BindError::validation("Trailing '.' in identifier"));
                    }
                }
                Some(c) => {
                    return Err(BindError::validation(format!(
                        "Expected '.' between identifier parts, got '{c}'"
                    )));
                }
            }
        }

        Ok(Self { parts })
    }

    /// The unquoted parts.
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Render the identifier as quoted SQL.
    pub fn to_sql(&self) -> String {
        let cap = self.parts.iter().map(|p| p.len() + 3).sum();
        let mut out = String::with_capacity(cap);
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push('"');
            for ch in part.chars() {
                if ch == '"' {
                    out.push('"');
                }
                out.push(ch);
            }
            out.push('"');
        }
    }
}

impl std::fmt::Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_sql())
    }
}

fn check_part(name: &str) -> BindResult<()> {
    if name.is_empty() {
        return Err(BindError::validation("Empty identifier segment"));
    }
    if name.contains('\0') {
        return Err(BindError::validation(
            "Identifier cannot contain NUL character",
        ));
    }
    Ok(())
}
