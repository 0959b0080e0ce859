//! Declaration macros for configuration interfaces and enumerations.

/// Declares a configuration interface.
///
/// Generates a view type holding a [`BoundView`](crate::BoundView), one
/// accessor method per field returning `Result<Type>`, and the
/// [`ConfigInterface`](crate::ConfigInterface) and
/// [`Bindable`](crate::Bindable) implementations. A field's key is its name;
/// `#[key = "..."]` overrides it. Other field attributes, doc comments
/// included, are placed on the field's accessor. A field whose type is itself
/// a configuration interface is bound as a nested view at the composed key.
///
/// # Example
///
/// ```
/// use strata_bind::config_interface;
///
/// config_interface! {
///     /// Database settings.
///     #[derive(Debug, Clone)]
///     pub struct Database {
///         url: String,
///         #[key = "pool-size"]
///         pool_size: Option<u32>,
///     }
/// }
/// ```
#[macro_export]
macro_rules! config_interface {
    (@key $field:ident) => {
        stringify!($field)
    };
    (@key $field:ident [key = $key:literal] $($rest:tt)*) => {
        $key
    };
    (@key $field:ident [$($other:tt)*] $($rest:tt)*) => {
        $crate::config_interface!(@key $field $($rest)*)
    };

    (@accessor [$($kept:tt)*] $field:ident $ty:ty ;) => {
        $($kept)*
        pub fn $field(&self) -> $crate::Result<$ty> {
            self.__view.get::<$ty>(stringify!($field))
        }
    };
    (@accessor [$($kept:tt)*] $field:ident $ty:ty ; [key = $key:literal] $($rest:tt)*) => {
        $crate::config_interface!(@accessor [$($kept)*] $field $ty ; $($rest)*);
    };
    (@accessor [$($kept:tt)*] $field:ident $ty:ty ; [$($attr:tt)*] $($rest:tt)*) => {
        $crate::config_interface!(@accessor [$($kept)* #[$($attr)*]] $field $ty ; $($rest)*);
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$($attr:tt)*])*
                $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            __view: $crate::BoundView,
        }

        #[allow(dead_code)]
        impl $name {
            $(
                $crate::config_interface!(@accessor [] $field $ty ; $([$($attr)*])*);
            )*

            /// Returns the view backing this interface.
            pub fn bound_view(&self) -> &$crate::BoundView {
                &self.__view
            }
        }

        impl $crate::ConfigInterface for $name {
            fn accessors() -> ::std::vec::Vec<$crate::AccessorSpec> {
                ::std::vec![
                    $(
                        $crate::AccessorSpec {
                            name: stringify!($field),
                            key: $crate::config_interface!(@key $field $([$($attr)*])*),
                            validate: <$ty as $crate::Bindable>::validate,
                        },
                    )*
                ]
            }

            fn from_view(view: $crate::BoundView) -> Self {
                Self { __view: view }
            }
        }

        impl $crate::Bindable for $name {
            fn validate(snapshot: &$crate::Snapshot, key: &str) -> $crate::Result<()> {
                $crate::validate_interface::<Self>(snapshot, key)
            }

            fn resolve(provider: &$crate::ConfigurationProvider, key: &str) -> $crate::Result<Self> {
                provider.bind::<Self>(key)
            }
        }
    };
}

/// Declares an enumeration readable from configuration by variant name.
///
/// Variant names match case-sensitively after trimming surrounding
/// whitespace.
///
/// # Example
///
/// ```
/// use strata_bind::{FromConfigValue, config_enum};
///
/// config_enum! {
///     #[derive(Debug, Clone, Copy, PartialEq, Eq)]
///     pub enum Mode {
///         Fast,
///         Safe,
///     }
/// }
///
/// assert_eq!(Mode::from_config_value("Safe"), Ok(Mode::Safe));
/// assert!(Mode::from_config_value("safe").is_err());
/// ```
#[macro_export]
macro_rules! config_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )*
        }

        impl $name {
            /// Names accepted when reading this enumeration.
            pub const VARIANTS: &'static [&'static str] = &[$(stringify!($variant)),*];
        }

        impl $crate::FromConfigValue for $name {
            fn from_config_value(raw: &str) -> ::std::result::Result<Self, ::std::string::String> {
                let raw = raw.trim();
                $(
                    if raw == stringify!($variant) {
                        return ::std::result::Result::Ok($name::$variant);
                    }
                )*
                ::std::result::Result::Err(::std::format!(
                    "expected one of [{}]",
                    Self::VARIANTS.join(", ")
                ))
            }

            fn type_name() -> &'static str {
                stringify!($name)
            }
        }
    };
}
