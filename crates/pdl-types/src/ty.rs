//! Core type definitions for the PDL type system

use std::fmt;

/// Primitive types in PDL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// The `string` type
    String,
    /// The `number` type (IEEE 754 double precision, f64)
    Number,
    /// The `boolean` type
    Boolean,
    /// The `null` type
    Null,
}

impl PrimitiveType {
    /// Name used in annotations, diagnostics and JSON-Schema output
    pub fn type_name(&self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Number => "number",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Null => "null",
        }
    }

    /// Look up a primitive by its annotation name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(PrimitiveType::String),
            "number" => Some(PrimitiveType::Number),
            "boolean" => Some(PrimitiveType::Boolean),
            "null" => Some(PrimitiveType::Null),
            _ => None,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Function parameter: name, type and optional flag
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter name (empty for anonymous parameters in type annotations)
    pub name: String,
    /// Parameter type
    pub ty: Type,
    /// Whether the argument may be omitted
    pub optional: bool,
}

impl Param {
    /// Create a required parameter
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
        }
    }

    /// Create an optional parameter
    pub fn optional(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: true,
        }
    }
}

/// Function type: (p1: T1, p2?: T2) -> R
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    /// Ordered parameter list
    pub params: Vec<Param>,
    /// Return type
    pub return_type: Box<Type>,
}

impl FunctionType {
    /// Number of parameters that must be supplied
    pub fn required_params(&self) -> usize {
        self.params.iter().filter(|p| !p.optional).count()
    }
}

/// List type: list[T] with optional length bounds
#[derive(Debug, Clone, PartialEq)]
pub struct ListType {
    /// Element type
    pub element: Box<Type>,
    /// Minimum number of elements
    pub min_length: Option<usize>,
    /// Maximum number of elements
    pub max_length: Option<usize>,
}

/// Record field
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name
    pub name: String,
    /// Field type
    pub ty: Type,
    /// Whether the field may be absent
    pub optional: bool,
}

impl Field {
    /// Create a required field
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
        }
    }

    /// Create an optional field
    pub fn optional(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: true,
        }
    }
}

/// Record type: record[name: T, age?: U, ...]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordType {
    /// Fields in declaration order
    pub fields: Vec<Field>,
    /// Open records admit fields beyond the declared ones
    pub open: bool,
}

impl RecordType {
    /// Find a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Gradual type, optionally tagged with a runtime constraint name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DynamicType {
    /// Name of the constraint checked at runtime (e.g. `email`)
    pub constraint: Option<String>,
}

/// Prompt type: prompt[input, output, model?, temperature?]
#[derive(Debug, Clone, PartialEq)]
pub struct PromptType {
    /// Input type the prompt is rendered from
    pub input: Box<Type>,
    /// Output type the model response decodes to
    pub output: Box<Type>,
    /// Model identifier
    pub model: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f64>,
}

/// The core type representation in PDL
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// Primitive type (string, number, boolean, null)
    Primitive(PrimitiveType),

    /// Function type
    Function(FunctionType),

    /// Union type: T1 | T2 | ... | Tn (built through [`Type::union`])
    Union(Vec<Type>),

    /// Intersection type: T1 & T2 & ... & Tn (built through [`Type::intersection`])
    Intersection(Vec<Type>),

    /// List type
    List(ListType),

    /// Record type
    Record(RecordType),

    /// Gradual escape hatch
    Dynamic(DynamicType),

    /// Top type
    Any,

    /// Bottom type
    Never,

    /// Prompt annotation type
    Prompt(PromptType),
}

impl Type {
    /// The `string` type
    pub fn string() -> Self {
        Type::Primitive(PrimitiveType::String)
    }

    /// The `number` type
    pub fn number() -> Self {
        Type::Primitive(PrimitiveType::Number)
    }

    /// The `boolean` type
    pub fn boolean() -> Self {
        Type::Primitive(PrimitiveType::Boolean)
    }

    /// The `null` type
    pub fn null() -> Self {
        Type::Primitive(PrimitiveType::Null)
    }

    /// The `any` type
    pub fn any() -> Self {
        Type::Any
    }

    /// The `never` type
    pub fn never() -> Self {
        Type::Never
    }

    /// Unconstrained `dynamic`
    pub fn dynamic() -> Self {
        Type::Dynamic(DynamicType::default())
    }

    /// `dynamic[constraint]`
    pub fn dynamic_with(constraint: impl Into<String>) -> Self {
        Type::Dynamic(DynamicType {
            constraint: Some(constraint.into()),
        })
    }

    /// `list[element]` without length bounds
    pub fn list(element: Type) -> Self {
        Type::List(ListType {
            element: Box::new(element),
            min_length: None,
            max_length: None,
        })
    }

    /// `list[element, min, max]`
    pub fn bounded_list(element: Type, min_length: Option<usize>, max_length: Option<usize>) -> Self {
        Type::List(ListType {
            element: Box::new(element),
            min_length,
            max_length,
        })
    }

    /// Function type from parameters and a return type
    pub fn function(params: Vec<Param>, return_type: Type) -> Self {
        Type::Function(FunctionType {
            params,
            return_type: Box::new(return_type),
        })
    }

    /// Closed record
    pub fn record(fields: Vec<Field>) -> Self {
        Type::Record(RecordType { fields, open: false })
    }

    /// Open record
    pub fn open_record(fields: Vec<Field>) -> Self {
        Type::Record(RecordType { fields, open: true })
    }

    /// Prompt type
    pub fn prompt(input: Type, output: Type, model: Option<String>, temperature: Option<f64>) -> Self {
        Type::Prompt(PromptType {
            input: Box::new(input),
            output: Box::new(output),
            model,
            temperature,
        })
    }

    /// Check if this type is `never`
    pub fn is_never(&self) -> bool {
        matches!(self, Type::Never)
    }

    /// Get the record type if this is a record
    pub fn as_record(&self) -> Option<&RecordType> {
        match self {
            Type::Record(r) => Some(r),
            _ => None,
        }
    }
}

impl From<PrimitiveType> for Type {
    fn from(p: PrimitiveType) -> Self {
        Type::Primitive(p)
    }
}

/// Write a member of a union/intersection, parenthesizing looser forms
fn write_member(f: &mut fmt::Formatter<'_>, ty: &Type, in_intersection: bool) -> fmt::Result {
    let needs_parens = match ty {
        Type::Function(_) => true,
        Type::Union(_) => in_intersection,
        _ => false,
    };
    if needs_parens {
        write!(f, "({})", ty)
    } else {
        write!(f, "{}", ty)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(p) => write!(f, "{}", p),
            Type::Function(func) => {
                write!(f, "(")?;
                for (i, param) in func.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    if param.name.is_empty() {
                        write!(f, "{}", param.ty)?;
                    } else {
                        write!(f, "{}", param.name)?;
                        if param.optional {
                            write!(f, "?")?;
                        }
                        write!(f, ": {}", param.ty)?;
                    }
                }
                write!(f, ") -> {}", func.return_type)
            }
            Type::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write_member(f, member, false)?;
                }
                Ok(())
            }
            Type::Intersection(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, " & ")?;
                    }
                    write_member(f, member, true)?;
                }
                Ok(())
            }
            Type::List(list) => {
                write!(f, "list[{}", list.element)?;
                match (list.min_length, list.max_length) {
                    (Some(min), Some(max)) => write!(f, ", {}, {}", min, max)?,
                    (Some(min), None) => write!(f, ", {}", min)?,
                    (None, Some(max)) => write!(f, ", 0, {}", max)?,
                    (None, None) => {}
                }
                write!(f, "]")
            }
            Type::Record(record) => {
                write!(f, "record[")?;
                for (i, field) in record.fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", field.name)?;
                    if field.optional {
                        write!(f, "?")?;
                    }
                    write!(f, ": {}", field.ty)?;
                }
                if record.open {
                    if !record.fields.is_empty() {
                        write!(f, ", ")?;
                    }
                    write!(f, "...")?;
                }
                write!(f, "]")
            }
            Type::Dynamic(dynamic) => match &dynamic.constraint {
                Some(constraint) => write!(f, "dynamic[{}]", constraint),
                None => write!(f, "dynamic"),
            },
            Type::Any => write!(f, "any"),
            Type::Never => write!(f, "never"),
            Type::Prompt(prompt) => {
                write!(f, "prompt[{}, {}", prompt.input, prompt.output)?;
                if let Some(model) = &prompt.model {
                    write!(f, ", \"{}\"", model)?;
                    if let Some(temperature) = prompt.temperature {
                        write!(f, ", {}", temperature)?;
                    }
                }
                write!(f, "]")
            }
        }
    }
}
