use std::fmt::Write;

use crate::LogRecord;

/// Renders a record through its captured template.
///
/// Supported placeholders: `{time}` (zero-padded fractional seconds since
/// registry construction), `{component}`, `{level}` and `{message}`.
/// `{{` and `}}` escape literal braces. Anything else between braces - and
/// an unterminated `{` - renders literally, so a malformed template
/// degrades visibly instead of dropping output.
pub(crate) fn render(record: &LogRecord) -> String {
    let template = record.template();
    let mut out = String::with_capacity(template.len() + record.message().len());

    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut name = String::new();
                let mut terminated = false;

                for c in chars.by_ref() {
                    if c == '}' {
                        terminated = true;
                        break;
                    }
                    name.push(c);
                }

                if terminated {
                    render_placeholder(&mut out, &name, record);
                } else {
                    // Unterminated placeholder: emit what we consumed.
                    out.push('{');
                    out.push_str(&name);
                }
            }
            c => out.push(c),
        }
    }

    out
}

fn render_placeholder(out: &mut String, name: &str, record: &LogRecord) {
    match name {
        "time" => {
            // Zero-padded so columns line up: "0012.3456".
            write!(out, "{:09.4}", record.elapsed_seconds())
                .expect("writing to a String cannot fail");
        }
        "component" => out.push_str(record.component()),
        "level" => {
            write!(out, "{}", record.severity()).expect("writing to a String cannot fail");
        }
        "message" => out.push_str(record.message()),
        unknown => {
            // Unknown placeholders pass through literally.
            out.push('{');
            out.push_str(unknown);
            out.push('}');
        }
    }
}
