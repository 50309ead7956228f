//! Console argument formatting
//!
//! Printf-style: a leading string argument may carry `%s %d %i %f %j %o %O`
//! placeholders that consume the following arguments. Anything left over is
//! appended, separated by spaces. A lone string is printed verbatim, with no
//! placeholder or `%%` processing.

use serde_json::Value;

/// Format console `args` into a single line of text.
pub fn format_console_args(args: &[Value]) -> String {
    let mut rest = args.iter();
    let mut out = String::new();

    match args.first() {
        Some(Value::String(only)) if args.len() == 1 => return only.clone(),
        Some(Value::String(template)) => {
            rest.next();
            expand_template(template, &mut rest, &mut out);
        }
        Some(_) => {}
        None => return out,
    }

    for value in rest {
        if !out.is_empty() || args.first().is_some_and(Value::is_string) {
            out.push(' ');
        }
        out.push_str(&display(value));
    }
    out
}

fn expand_template<'a>(
    template: &str,
    args: &mut impl Iterator<Item = &'a Value>,
    out: &mut String,
) {
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some(spec @ ('s' | 'd' | 'i' | 'f' | 'j' | 'o' | 'O')) => match args.next() {
                Some(value) => {
                    chars.next();
                    out.push_str(&substitute(spec, value));
                }
                // No argument left: the placeholder stays verbatim.
                None => out.push('%'),
            },
            _ => out.push('%'),
        }
    }
}

fn substitute(spec: char, value: &Value) -> String {
    match spec {
        's' => display(value),
        'd' | 'i' => match value {
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => i.to_string(),
                (None, Some(f)) if spec == 'i' => (f.trunc() as i64).to_string(),
                (None, Some(f)) => f.to_string(),
                _ => n.to_string(),
            },
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map(|f| {
                    if spec == 'i' || f.fract() == 0.0 {
                        (f.trunc() as i64).to_string()
                    } else {
                        f.to_string()
                    }
                })
                .unwrap_or_else(|_| "NaN".to_string()),
            Value::Bool(b) => u8::from(*b).to_string(),
            _ => "NaN".to_string(),
        },
        'f' => match value {
            Value::Number(n) => n.as_f64().map(|f| f.to_string()).unwrap_or_else(|| n.to_string()),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map(|f| f.to_string())
                .unwrap_or_else(|_| "NaN".to_string()),
            _ => "NaN".to_string(),
        },
        _ => value.to_string(),
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
