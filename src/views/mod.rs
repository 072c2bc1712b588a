//! Server-rendered HTML pages.
//!
//! Every interpolated value goes through [`escape`].

pub mod dashboard;
pub mod login;
pub mod verify;

const BRAND: &str = "#1a105c";
const BRAND_HOVER: &str = "#2a1f6c";
const TEAL: &str = "#007487";

/// Escape text for HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap a page body in the shared document shell.
pub fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta name="description" content="A secure dashboard showcasing Charlotte Hornets player statistics">
<title>{title}</title>
<style>
body {{ margin: 0; font-family: Inter, system-ui, sans-serif; background: #f3f4f6; color: #111827; }}
.center {{ min-height: 100vh; display: flex; align-items: center; justify-content: center; }}
.card {{ max-width: 28rem; width: 100%; background: #fff; padding: 2rem; border-radius: .5rem; box-shadow: 0 10px 15px rgba(0,0,0,.1); text-align: center; }}
.button {{ display: block; background: {BRAND}; color: #fff; padding: .5rem 1rem; border-radius: .25rem; text-decoration: none; border: 0; }}
.button:hover {{ background: {BRAND_HOVER}; }}
.link {{ color: {TEAL}; font-size: .875rem; }}
.muted {{ color: #4b5563; }}
.error {{ background: #fee2e2; color: #991b1b; padding: .75rem; border-radius: .25rem; margin-bottom: 1rem; }}
nav {{ background: #fff; box-shadow: 0 2px 4px rgba(0,0,0,.1); padding: 0 1rem; height: 4rem; display: flex; align-items: center; justify-content: space-between; }}
main {{ max-width: 80rem; margin: 0 auto; padding: 1.5rem; }}
table {{ width: 100%; border-collapse: collapse; background: #fff; }}
th, td {{ padding: .5rem; border-bottom: 1px solid #e5e7eb; text-align: right; }}
th:first-child, td:first-child {{ text-align: left; }}
.bar {{ height: .75rem; margin: 2px 0; }}
</style>
</head>
<body>
{body}
</body>
</html>"#,
        title = escape(title),
    )
}
