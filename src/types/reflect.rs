use super::{FieldDescriptor, TypeDescriptor};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

/// Types that can describe themselves to the schema machinery.
pub trait Reflect {
    fn descriptor() -> TypeDescriptor;
}

/// The structured-record capability.
///
/// Implemented by `#[derive(Record)]`; records are always eligible as
/// parameter and return types, and a record return type is reused as the
/// endpoint's output model without wrapping.
pub trait Record: Reflect {
    fn fields() -> Vec<FieldDescriptor>;
}

macro_rules! reflect_as {
    ($variant:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl Reflect for $ty {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::$variant
                }
            }
        )+
    };
}

reflect_as!(Integer => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
reflect_as!(Float => f32, f64);
reflect_as!(String => String, char);
reflect_as!(Boolean => bool);
reflect_as!(Any => serde_json::Value);
reflect_as!(Unit => ());

impl<T: Reflect> Reflect for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::sequence(T::descriptor())
    }
}

impl<T: Reflect> Reflect for VecDeque<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::sequence(T::descriptor())
    }
}

impl<K: Reflect, V: Reflect, S> Reflect for HashMap<K, V, S> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::mapping(K::descriptor(), V::descriptor())
    }
}

impl<K: Reflect, V: Reflect> Reflect for BTreeMap<K, V> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::mapping(K::descriptor(), V::descriptor())
    }
}

impl Reflect for serde_json::Map<String, serde_json::Value> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::mapping(TypeDescriptor::String, TypeDescriptor::Any)
    }
}

impl<T: Reflect, S> Reflect for HashSet<T, S> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Set(Box::new(T::descriptor()))
    }
}

impl<T: Reflect> Reflect for BTreeSet<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Set(Box::new(T::descriptor()))
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Optional(Box::new(T::descriptor()))
    }
}

impl<T: Reflect> Reflect for Box<T> {
    fn descriptor() -> TypeDescriptor {
        T::descriptor()
    }
}

macro_rules! reflect_tuple {
    ($($name:ident),+) => {
        impl<$($name: Reflect),+> Reflect for ($($name,)+) {
            fn descriptor() -> TypeDescriptor {
                TypeDescriptor::Tuple(vec![$($name::descriptor()),+])
            }
        }
    };
}

reflect_tuple!(A);
reflect_tuple!(A, B);
reflect_tuple!(A, B, C);
reflect_tuple!(A, B, C, D);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars() {
        assert_eq!(i64::descriptor(), TypeDescriptor::Integer);
        assert_eq!(u8::descriptor(), TypeDescriptor::Integer);
        assert_eq!(f32::descriptor(), TypeDescriptor::Float);
        assert_eq!(String::descriptor(), TypeDescriptor::String);
        assert_eq!(bool::descriptor(), TypeDescriptor::Boolean);
    }

    #[test]
    fn test_containers() {
        assert_eq!(
            <HashMap<String, Vec<f64>>>::descriptor(),
            TypeDescriptor::mapping(
                TypeDescriptor::String,
                TypeDescriptor::sequence(TypeDescriptor::Float)
            )
        );
        assert_eq!(
            <(i64, String)>::descriptor(),
            TypeDescriptor::Tuple(vec![TypeDescriptor::Integer, TypeDescriptor::String])
        );
        assert_eq!(
            <BTreeSet<i32>>::descriptor(),
            TypeDescriptor::Set(Box::new(TypeDescriptor::Integer))
        );
        assert_eq!(<Box<bool>>::descriptor(), TypeDescriptor::Boolean);
    }

    #[test]
    fn test_undeclared_forms() {
        assert!(!serde_json::Value::descriptor().is_declared());
        assert!(!<()>::descriptor().is_declared());
        assert!(<Vec<serde_json::Value>>::descriptor().is_declared());
    }
}
