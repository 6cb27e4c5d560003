use std::fmt;

/// Static description of a Rust type as seen by the schema machinery.
///
/// Descriptors are produced once, at registration time, through [`Reflect`](super::Reflect)
/// and never re-inspected while serving requests.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    Integer,
    Float,
    String,
    Boolean,
    /// Homogeneous ordered container (`Vec<T>`, `VecDeque<T>`)
    Sequence(Box<TypeDescriptor>),
    /// Homogeneous keyed container (`HashMap<K, V>`, `BTreeMap<K, V>`)
    Mapping(Box<TypeDescriptor>, Box<TypeDescriptor>),
    /// Named, fielded value type (see [`Record`](super::Record))
    Record(RecordDescriptor),
    Tuple(Vec<TypeDescriptor>),
    Set(Box<TypeDescriptor>),
    Optional(Box<TypeDescriptor>),
    /// Dynamically typed JSON value; carries no declared type
    Any,
    /// `()`; a function returning it declares no result
    Unit,
}

impl TypeDescriptor {
    pub fn sequence(element: TypeDescriptor) -> Self {
        TypeDescriptor::Sequence(Box::new(element))
    }

    pub fn mapping(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        TypeDescriptor::Mapping(Box::new(key), Box::new(value))
    }

    /// Whether the descriptor names a concrete type at all.
    ///
    /// `Any` and `Unit` are the reflected forms of "no annotation" for
    /// parameters and return values respectively.
    #[must_use]
    pub fn is_declared(&self) -> bool {
        !matches!(self, TypeDescriptor::Any | TypeDescriptor::Unit)
    }

    #[must_use]
    pub fn is_record(&self) -> bool {
        matches!(self, TypeDescriptor::Record(_))
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&RecordDescriptor> {
        match self {
            TypeDescriptor::Record(record) => Some(record),
            _ => None,
        }
    }

}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Integer => write!(f, "integer"),
            TypeDescriptor::Float => write!(f, "float"),
            TypeDescriptor::String => write!(f, "string"),
            TypeDescriptor::Boolean => write!(f, "boolean"),
            TypeDescriptor::Sequence(inner) => write!(f, "sequence[{inner}]"),
            TypeDescriptor::Mapping(key, value) => write!(f, "mapping[{key}, {value}]"),
            TypeDescriptor::Record(record) => write!(f, "record {}", record.name()),
            TypeDescriptor::Tuple(items) => {
                write!(f, "tuple[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            TypeDescriptor::Set(inner) => write!(f, "set[{inner}]"),
            TypeDescriptor::Optional(inner) => write!(f, "optional[{inner}]"),
            TypeDescriptor::Any => write!(f, "any"),
            TypeDescriptor::Unit => write!(f, "unit"),
        }
    }
}

/// Descriptor of a structured record.
///
/// A record is identified by its qualified path (`my_app::geo::Point`), so
/// two structs that share a name in different modules stay distinct. The
/// short name is only used for display and schema titles.
///
/// Fields are produced lazily so that a record may refer to itself
/// (`struct Node { children: Vec<Node> }`) without the descriptor recursing
/// forever.
#[derive(Clone)]
pub struct RecordDescriptor {
    path: &'static str,
    fields: fn() -> Vec<FieldDescriptor>,
}

impl RecordDescriptor {
    /// `path` is the qualified type path; `#[derive(Record)]` passes
    /// `module_path!()` joined with the struct name.
    pub fn new(path: &'static str, fields: fn() -> Vec<FieldDescriptor>) -> Self {
        Self { path, fields }
    }

    /// Last segment of the path.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.path.rsplit("::").next().unwrap_or(self.path)
    }

    #[must_use]
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Definition key derived from the path: `my_app::geo::Point` becomes
    /// `my_app.geo.Point`. Only `[A-Za-z0-9._-]` survive.
    #[must_use]
    pub fn key(&self) -> String {
        self.path
            .replace("::", ".")
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    #[must_use]
    pub fn fields(&self) -> Vec<FieldDescriptor> {
        (self.fields)()
    }
}

impl PartialEq for RecordDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl fmt::Debug for RecordDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordDescriptor")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// One field of a record or of a generated model.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: TypeDescriptor,
    pub required: bool,
}

impl FieldDescriptor {
    /// A field is required unless its type is optional.
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        let required = !matches!(ty, TypeDescriptor::Optional(_));
        Self {
            name: name.into(),
            ty,
            required,
        }
    }

    /// Mark the field as not required (serde `default`).
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_fields() -> Vec<FieldDescriptor> {
        Vec::new()
    }

    #[test]
    fn test_display_nested() {
        let ty = TypeDescriptor::sequence(TypeDescriptor::mapping(
            TypeDescriptor::String,
            TypeDescriptor::Float,
        ));
        assert_eq!(ty.to_string(), "sequence[mapping[string, float]]");
    }

    #[test]
    fn test_records_compare_by_path() {
        let a = RecordDescriptor::new("shapes::Point", no_fields);
        let b = RecordDescriptor::new("shapes::Point", no_fields);
        let geo = RecordDescriptor::new("shapes::geo::Point", no_fields);
        assert_eq!(a, b);
        assert_ne!(a, geo);
        assert_eq!(geo.name(), "Point");
        assert_eq!(geo.key(), "shapes.geo.Point");
        assert_eq!(RecordDescriptor::new("Node", no_fields).name(), "Node");
    }

    #[test]
    fn test_optional_field_not_required() {
        let field = FieldDescriptor::new(
            "nickname",
            TypeDescriptor::Optional(Box::new(TypeDescriptor::String)),
        );
        assert!(!field.required);
        assert!(FieldDescriptor::new("id", TypeDescriptor::Integer).required);
    }
}
