use std::fmt;

/// A dotted `module.Identifier` name uniquely identifying a declared
/// entity across the whole merged schema graph.
///
/// Primitive keywords (`i32`, `string`, ...) and structural type names
/// (`list<i32>`, `map<string, a.B>`, ...) live in the unscoped space:
/// their `module` is `None`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub module: Option<String>,
    pub name: String,
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(module) = self.module.as_ref() {
            write!(f, "{}.{}", module, self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

impl QualifiedName {
    pub fn scoped(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: Some(module.into()),
            name: name.into(),
        }
    }

    pub fn unscoped(name: impl Into<String>) -> Self {
        Self {
            module: None,
            name: name.into(),
        }
    }

    /// Splits `module.Identifier` at the first dot. A source without a dot
    /// stays unscoped, as does a structural canonical name such as
    /// `map<string, a.B>` (structural names are never module-scoped).
    pub fn parse(source: &str) -> Self {
        match source.split_once('.') {
            Some((module, name))
                if !module.is_empty() && !name.is_empty() && !module.contains('<') =>
            {
                Self::scoped(module, name)
            }
            _ => Self::unscoped(source),
        }
    }

    pub fn is_scoped(&self) -> bool {
        self.module.is_some()
    }
}
