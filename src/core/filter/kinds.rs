//! Enumerations that filters match by canonical name

/// Declares an enum whose variants are parsed from and printed as their
/// canonical upper-case names
macro_rules! canonical_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Canonical name
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// Case-sensitive lookup by canonical name
            pub fn from_name(value: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.as_str() == value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

canonical_enum!(
    /// Kind of a bean as reported by the container
    BeanKind {
        Managed => "MANAGED",
        Session => "SESSION",
        ProducerMethod => "PRODUCER_METHOD",
        ProducerField => "PRODUCER_FIELD",
        Resource => "RESOURCE",
        Synthetic => "SYNTHETIC",
        Interceptor => "INTERCEPTOR",
        Decorator => "DECORATOR",
        Extension => "EXTENSION",
        BuiltIn => "BUILT_IN",
    }
);

canonical_enum!(
    /// Observer notification mode
    Reception {
        IfExists => "IF_EXISTS",
        Always => "ALWAYS",
    }
);

canonical_enum!(
    /// Transaction phase an observer is bound to
    TransactionPhase {
        InProgress => "IN_PROGRESS",
        BeforeCompletion => "BEFORE_COMPLETION",
        AfterCompletion => "AFTER_COMPLETION",
        AfterFailure => "AFTER_FAILURE",
        AfterSuccess => "AFTER_SUCCESS",
    }
);
