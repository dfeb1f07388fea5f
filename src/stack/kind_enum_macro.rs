/// Defines a closed, string-backed classification enum.
///
/// Each variant maps to one wire name (used for serde and `as_str`) plus any
/// number of accepted aliases for `parse`. Unlike open identifier enums there
/// is no catch-all variant: unknown strings fail to parse and fail to
/// deserialize.
#[macro_export]
macro_rules! define_kind_enum {
    (
        $(#[$enum_meta:meta])*
        $enum_name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $wire_name:literal
                $( | $alias:literal )*
            ),* $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $enum_name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
        }

        impl serde::Serialize for $enum_name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $enum_name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                Self::parse(&s).ok_or_else(|| {
                    <D::Error as serde::de::Error>::custom(format!(
                        "unknown {} '{}'",
                        stringify!($enum_name),
                        s
                    ))
                })
            }
        }

        impl $enum_name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(
                        Self::$variant => $wire_name,
                    )*
                }
            }

            /// Case-insensitive parse accepting the wire name or any alias.
            pub fn parse(name: &str) -> Option<Self> {
                match name.trim().to_lowercase().as_str() {
                    $(
                        $wire_name $(| $alias)* => Some(Self::$variant),
                    )*
                    _ => None,
                }
            }

            pub fn all_variants() -> &'static [Self] {
                &[
                    $(
                        Self::$variant,
                    )*
                ]
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.pad(self.as_str())
            }
        }
    };
}
