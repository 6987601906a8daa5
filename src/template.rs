//! Rendering of the `environment-url-template` input.
//!
//! Supports the Mustache variable tags only: `{{name}}` is HTML-escaped the
//! way mustache.js escapes, `{{{name}}}` and `{{& name}}` are inserted raw.
//! Unknown names render as an empty string and `{{! comments }}` render
//! nothing. Sections, partials and delimiter changes are rejected.

use crate::error::{Error, Result};

/// Values available to the environment URL template
#[derive(Debug, Clone)]
pub struct TemplateParams<'a> {
    pub env_id: &'a str,
    pub app_id: &'a str,
    pub org_id: &'a str,
    pub branch_name: &'a str,
}

impl TemplateParams<'_> {
    fn lookup(&self, name: &str) -> Option<&str> {
        match name {
            "envId" => Some(self.env_id),
            "appId" => Some(self.app_id),
            "orgId" => Some(self.org_id),
            "branchName" => Some(self.branch_name),
            _ => None,
        }
    }
}

/// Render a template against the given params
pub fn render(template: &str, params: &TemplateParams<'_>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];

        let (name, raw, consumed) = if let Some(inner) = after_open.strip_prefix('{') {
            let close = inner
                .find("}}}")
                .ok_or_else(|| Error::Template(format!("unclosed tag in {:?}", template)))?;
            (inner[..close].trim(), true, 1 + close + 3)
        } else {
            let close = after_open
                .find("}}")
                .ok_or_else(|| Error::Template(format!("unclosed tag in {:?}", template)))?;
            let tag = after_open[..close].trim();
            match tag.chars().next() {
                Some('!') => {
                    rest = &after_open[close + 2..];
                    continue;
                }
                Some('#' | '^' | '/' | '>' | '=') => {
                    return Err(Error::Template(format!(
                        "unsupported tag {{{{{}}}}}, only variables can be used",
                        tag
                    )));
                }
                Some('&') => (tag[1..].trim(), true, close + 2),
                _ => (tag, false, close + 2),
            }
        };

        let value = params.lookup(name).unwrap_or_default();
        if raw {
            out.push_str(value);
        } else {
            push_escaped(&mut out, value);
        }

        rest = &after_open[consumed..];
    }

    out.push_str(rest);
    Ok(out)
}

fn push_escaped(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '/' => out.push_str("&#x2F;"),
            '`' => out.push_str("&#x60;"),
            '=' => out.push_str("&#x3D;"),
            _ => out.push(c),
        }
    }
}
