/// Intrinsic expression embedded in a template value.
///
/// This is the internal form of the orchestrator's reference functions. At
/// synthesis time an expression is just data; `referenced_names` exposes the
/// logical ids it points at so the builder can validate the graph before
/// anything is rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Plain string literal.
    Str(String),
    /// Reference to a parameter or resource logical id.
    Ref(String),
    /// Substitution string, `${Name}` placeholders resolved at instantiation.
    Sub(String),
    /// Concatenation of parts with a separator.
    Join { separator: String, parts: Vec<Expr> },
    /// Base64-encoding of the inner expression.
    Base64(Box<Expr>),
}

impl Expr {
    pub fn str(value: &str) -> Self {
        Expr::Str(value.to_string())
    }

    pub fn reference(target: &str) -> Self {
        Expr::Ref(target.to_string())
    }

    pub fn sub(template: &str) -> Self {
        Expr::Sub(template.to_string())
    }

    pub fn join(separator: &str, parts: Vec<Expr>) -> Self {
        Expr::Join {
            separator: separator.to_string(),
            parts,
        }
    }

    pub fn base64(inner: Expr) -> Self {
        Expr::Base64(Box::new(inner))
    }

    /// Collects every logical id this expression references.
    ///
    /// Pseudo parameters (`AWS::*`) are resolved by the orchestrator, not
    /// declared in the template, so they are skipped.
    pub fn referenced_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names(&self, names: &mut Vec<String>) {
        match self {
            Expr::Str(_) => {}
            Expr::Ref(target) => names.push(target.clone()),
            Expr::Sub(template) => {
                for placeholder in sub_placeholders(template) {
                    if !placeholder.starts_with("AWS::") {
                        names.push(placeholder);
                    }
                }
            }
            Expr::Join { parts, .. } => {
                for part in parts {
                    part.collect_names(names);
                }
            }
            Expr::Base64(inner) => inner.collect_names(names),
        }
    }
}

/// Extracts the `${...}` placeholder names from a substitution template.
/// `${!escaped}` sequences are literals and yield nothing.
fn sub_placeholders(template: &str) -> Vec<String> {
    let mut placeholders = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        rest = &rest[start + 2..];
        let Some(end) = rest.find('}') else {
            break;
        };
        let name = &rest[..end];
        if !name.starts_with('!') {
            placeholders.push(name.to_string());
        }
        rest = &rest[end + 1..];
    }

    placeholders
}
