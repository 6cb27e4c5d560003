use super::{Reflect, TypeDescriptor};

/// A named parameter and its declared type, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub annotation: Option<TypeDescriptor>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, annotation: Option<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            annotation,
        }
    }

    /// Parameter typed by a Rust type. `serde_json::Value` and `()` reflect
    /// as undeclared.
    pub fn typed<T: Reflect>(name: impl Into<String>) -> Self {
        Self::new(name, declared(T::descriptor()))
    }
}

/// Ordered parameters plus the declared return type of a function.
///
/// `arity` is the number of positional arguments the underlying function
/// takes; it differs from `parameters.len()` only when the caller named the
/// wrong number of parameters, which validation reports.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub parameters: Vec<Parameter>,
    pub returns: Option<TypeDescriptor>,
    pub arity: usize,
}

impl FunctionSignature {
    pub fn new(parameters: Vec<Parameter>, returns: Option<TypeDescriptor>) -> Self {
        let arity = parameters.len();
        Self {
            parameters,
            returns,
            arity,
        }
    }

    #[must_use]
    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }

    /// Builder entry point for hand-described signatures.
    #[must_use]
    pub fn builder() -> SignatureBuilder {
        SignatureBuilder::default()
    }

    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Default)]
pub struct SignatureBuilder {
    parameters: Vec<Parameter>,
}

impl SignatureBuilder {
    #[must_use]
    pub fn param<T: Reflect>(mut self, name: &str) -> Self {
        self.parameters.push(Parameter::typed::<T>(name));
        self
    }

    #[must_use]
    pub fn untyped(mut self, name: &str) -> Self {
        self.parameters.push(Parameter::new(name, None));
        self
    }

    #[must_use]
    pub fn returns<T: Reflect>(self) -> FunctionSignature {
        FunctionSignature::new(self.parameters, declared(T::descriptor()))
    }

    #[must_use]
    pub fn returns_nothing(self) -> FunctionSignature {
        FunctionSignature::new(self.parameters, None)
    }
}

fn declared(ty: TypeDescriptor) -> Option<TypeDescriptor> {
    ty.is_declared().then_some(ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let sig = FunctionSignature::builder()
            .param::<i64>("x")
            .untyped("y")
            .returns::<f64>();
        assert_eq!(sig.arity, 2);
        assert_eq!(
            sig.parameter("x").and_then(|p| p.annotation.clone()),
            Some(TypeDescriptor::Integer)
        );
        assert_eq!(sig.parameter("y").map(|p| p.annotation.is_none()), Some(true));
        assert_eq!(sig.returns, Some(TypeDescriptor::Float));
    }

    #[test]
    fn test_value_parameter_is_undeclared() {
        let p = Parameter::typed::<serde_json::Value>("payload");
        assert!(p.annotation.is_none());
    }
}
