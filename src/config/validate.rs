use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::Value;

use super::schema::{DescriptorSchema, ElementKind, ElementSchema, RawConfiguration};

const XSI_NAMESPACE: &[u8] = b"http://www.w3.org/2001/XMLSchema-instance";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("expected root element <{expected}> but found <{found}>")]
    UnexpectedRoot { expected: &'static str, found: String },

    #[error("element <{name}> is not allowed in <{parent}>")]
    UnknownElement { parent: &'static str, name: String },

    #[error("element <{name}> appears more than once")]
    DuplicateElement { name: &'static str },

    #[error("element <{element}> must contain text only, found <{child}>")]
    UnexpectedChildElement { element: &'static str, child: String },

    #[error("element <{element}> must not contain text")]
    UnexpectedText { element: &'static str },

    #[error("attribute '{attribute}' is not allowed on <{element}>")]
    UnexpectedAttribute { element: String, attribute: String },

    #[error("'{element}' must be {expected}, found {found}")]
    InvalidType {
        element: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{0}")]
    Deserialize(String),
}

/// Checks a descriptor against a schema and deserializes it. Implementations
/// never return a partially populated configuration.
pub trait SchemaValidator: Send + Sync {
    fn validate_and_parse(
        &self,
        text: &str,
        schema: &DescriptorSchema,
    ) -> Result<RawConfiguration, SchemaError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorFormat {
    Xml,
    Yaml,
    Json,
}

impl DescriptorFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => DescriptorFormat::Yaml,
            Some("json") => DescriptorFormat::Json,
            _ => DescriptorFormat::Xml,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DescriptorFormat::Xml => "xml",
            DescriptorFormat::Yaml => "yaml",
            DescriptorFormat::Json => "json",
        }
    }

    pub fn validator(self) -> &'static dyn SchemaValidator {
        match self {
            DescriptorFormat::Xml => &XmlValidator,
            DescriptorFormat::Yaml => &YamlValidator,
            DescriptorFormat::Json => &JsonValidator,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct XmlValidator;

#[derive(Debug, Clone, Copy, Default)]
pub struct YamlValidator;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonValidator;

impl SchemaValidator for XmlValidator {
    fn validate_and_parse(
        &self,
        text: &str,
        schema: &DescriptorSchema,
    ) -> Result<RawConfiguration, SchemaError> {
        validate_xml(text, schema)?;
        quick_xml::de::from_str(text).map_err(|err| SchemaError::Deserialize(err.to_string()))
    }
}

impl SchemaValidator for YamlValidator {
    fn validate_and_parse(
        &self,
        text: &str,
        schema: &DescriptorSchema,
    ) -> Result<RawConfiguration, SchemaError> {
        let value: Value =
            serde_yaml::from_str(text).map_err(|err| SchemaError::Malformed(err.to_string()))?;
        parse_structured(value, schema)
    }
}

impl SchemaValidator for JsonValidator {
    fn validate_and_parse(
        &self,
        text: &str,
        schema: &DescriptorSchema,
    ) -> Result<RawConfiguration, SchemaError> {
        let value: Value =
            serde_json::from_str(text).map_err(|err| SchemaError::Malformed(err.to_string()))?;
        parse_structured(value, schema)
    }
}

struct Frame<'s> {
    element: &'s ElementSchema,
    seen: Vec<&'static str>,
    // Prefixes bound to the schema-instance namespace in this element's scope
    xsi_prefixes: Vec<Vec<u8>>,
}

fn validate_xml(text: &str, schema: &DescriptorSchema) -> Result<(), SchemaError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame<'_>> = Vec::new();
    let mut root_seen = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let frame = open_element(&start, &mut stack, &mut root_seen, schema)?;
                stack.push(frame);
            }
            Ok(Event::Empty(start)) => {
                open_element(&start, &mut stack, &mut root_seen, schema)?;
            }
            Ok(Event::End(_)) => {
                stack.pop();
            }
            Ok(Event::Text(_)) | Ok(Event::CData(_)) => match stack.last() {
                None => {
                    return Err(SchemaError::Malformed(
                        "text outside the root element".to_string(),
                    ));
                }
                Some(frame) if frame.element.is_group() => {
                    return Err(SchemaError::UnexpectedText {
                        element: frame.element.name,
                    });
                }
                Some(_) => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(SchemaError::Malformed(err.to_string())),
        }
    }

    if let Some(frame) = stack.last() {
        return Err(SchemaError::Malformed(format!(
            "unexpected end of document inside <{}>",
            frame.element.name
        )));
    }
    if !root_seen {
        return Err(SchemaError::Malformed(
            "document has no root element".to_string(),
        ));
    }
    Ok(())
}

fn open_element<'s>(
    start: &BytesStart<'_>,
    stack: &mut [Frame<'s>],
    root_seen: &mut bool,
    schema: &'s DescriptorSchema,
) -> Result<Frame<'s>, SchemaError> {
    let xsi_prefixes = instance_prefixes(start, stack.last())?;
    let qname = start.name();
    let name = std::str::from_utf8(qname.as_ref())
        .map_err(|err| SchemaError::Malformed(err.to_string()))?
        .to_string();

    let element: &'s ElementSchema = match stack.last_mut() {
        None => {
            if *root_seen {
                return Err(SchemaError::Malformed(
                    "more than one root element".to_string(),
                ));
            }
            *root_seen = true;
            if name != schema.root.name {
                return Err(SchemaError::UnexpectedRoot {
                    expected: schema.root.name,
                    found: name,
                });
            }
            &schema.root
        }
        Some(parent) => {
            let Some(child) = parent.element.child(&name) else {
                if parent.element.is_group() {
                    return Err(SchemaError::UnknownElement {
                        parent: parent.element.name,
                        name,
                    });
                }
                return Err(SchemaError::UnexpectedChildElement {
                    element: parent.element.name,
                    child: name,
                });
            };
            if parent.seen.contains(&child.name) {
                return Err(SchemaError::DuplicateElement { name: child.name });
            }
            parent.seen.push(child.name);
            child
        }
    };

    for attr in start.attributes() {
        let attr = attr.map_err(|err| SchemaError::Malformed(err.to_string()))?;
        if is_namespace_declaration(attr.key.into_inner()) {
            continue;
        }
        let instance_attr = attr.key.prefix().is_some_and(|prefix| {
            xsi_prefixes
                .iter()
                .any(|p| p.as_slice() == prefix.into_inner())
        });
        if instance_attr {
            continue;
        }
        return Err(SchemaError::UnexpectedAttribute {
            element: name,
            attribute: String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
        });
    }

    Ok(Frame {
        element,
        seen: Vec::new(),
        xsi_prefixes,
    })
}

fn is_namespace_declaration(key: &[u8]) -> bool {
    key == b"xmlns" || key.starts_with(b"xmlns:")
}

/// Prefixes bound to the schema-instance namespace, inherited from the parent
/// and extended by declarations on `start`.
fn instance_prefixes(
    start: &BytesStart<'_>,
    parent: Option<&Frame<'_>>,
) -> Result<Vec<Vec<u8>>, SchemaError> {
    let mut prefixes = parent
        .map(|frame| frame.xsi_prefixes.clone())
        .unwrap_or_default();
    for attr in start.attributes() {
        let attr = attr.map_err(|err| SchemaError::Malformed(err.to_string()))?;
        let Some(prefix) = attr.key.into_inner().strip_prefix(b"xmlns:") else {
            continue;
        };
        let bound = &*attr.value == XSI_NAMESPACE;
        prefixes.retain(|p| p.as_slice() != prefix);
        if bound {
            prefixes.push(prefix.to_vec());
        }
    }
    Ok(prefixes)
}

fn parse_structured(
    value: Value,
    schema: &DescriptorSchema,
) -> Result<RawConfiguration, SchemaError> {
    if !value.is_object() {
        return Err(SchemaError::InvalidType {
            element: schema.root.name,
            expected: "a mapping",
            found: value_type(&value),
        });
    }
    validate_value(&value, &schema.root)?;
    serde_json::from_value(value).map_err(|err| SchemaError::Deserialize(err.to_string()))
}

fn validate_value(value: &Value, element: &ElementSchema) -> Result<(), SchemaError> {
    match (element.kind, value) {
        (_, Value::Null) => Ok(()),
        (ElementKind::Text, Value::String(_)) => Ok(()),
        (ElementKind::Text, other) => Err(SchemaError::InvalidType {
            element: element.name,
            expected: "a string",
            found: value_type(other),
        }),
        (ElementKind::Group(_), Value::Object(map)) => {
            for (key, child_value) in map {
                let child = element
                    .child(key)
                    .ok_or_else(|| SchemaError::UnknownElement {
                        parent: element.name,
                        name: key.clone(),
                    })?;
                validate_value(child_value, child)?;
            }
            Ok(())
        }
        (ElementKind::Group(_), other) => Err(SchemaError::InvalidType {
            element: element.name,
            expected: "a mapping",
            found: value_type(other),
        }),
    }
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
