use serde::Deserialize;

/// Deserialized form of a configuration descriptor. Every field is optional;
/// requiredness is decided after overrides are merged. Unknown keys are
/// rejected by the validators, not here: XML namespace attributes reach serde
/// as extra keys and must be ignored.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename = "database", rename_all = "camelCase")]
pub struct RawConfiguration {
    pub jdbc_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default, deserialize_with = "paths_or_default")]
    pub paths: DeclaredPaths,
}

/// Sub-paths as written in the descriptor, relative to the descriptor's directory.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeclaredPaths {
    pub schema: Option<String>,
    pub functions: Option<String>,
    pub triggers: Option<String>,
    pub scripts: Option<String>,
}

// `paths: null` in YAML/JSON means the group is absent.
fn paths_or_default<'de, D>(deserializer: D) -> Result<DeclaredPaths, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<DeclaredPaths>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Text,
    Group(&'static [ElementSchema]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementSchema {
    pub name: &'static str,
    pub kind: ElementKind,
}

impl ElementSchema {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: ElementKind::Text,
        }
    }

    pub const fn group(name: &'static str, children: &'static [ElementSchema]) -> Self {
        Self {
            name,
            kind: ElementKind::Group(children),
        }
    }

    pub fn child(&self, name: &str) -> Option<&'static ElementSchema> {
        match self.kind {
            ElementKind::Group(children) => children.iter().find(|child| child.name == name),
            ElementKind::Text => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, ElementKind::Group(_))
    }
}

/// Element tree a descriptor must conform to. All elements are optional and
/// may appear at most once; no element declares attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorSchema {
    pub root: ElementSchema,
}

const PATH_ELEMENTS: &[ElementSchema] = &[
    ElementSchema::text("schema"),
    ElementSchema::text("functions"),
    ElementSchema::text("triggers"),
    ElementSchema::text("scripts"),
];

const DATABASE_ELEMENTS: &[ElementSchema] = &[
    ElementSchema::text("jdbcUrl"),
    ElementSchema::text("username"),
    ElementSchema::text("password"),
    ElementSchema::group("paths", PATH_ELEMENTS),
];

pub const DATABASE_SCHEMA: DescriptorSchema = DescriptorSchema {
    root: ElementSchema::group("database", DATABASE_ELEMENTS),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_declares_path_group() {
        let paths = DATABASE_SCHEMA.root.child("paths").expect("paths declared");
        assert!(paths.is_group());
        for name in ["schema", "functions", "triggers", "scripts"] {
            let child = paths.child(name).expect("path element declared");
            assert_eq!(child.kind, ElementKind::Text);
        }
        assert!(paths.child("views").is_none());
    }

    #[test]
    fn text_elements_have_no_children() {
        let url = DATABASE_SCHEMA.root.child("jdbcUrl").expect("jdbcUrl declared");
        assert!(!url.is_group());
        assert!(url.child("anything").is_none());
    }
}
