use crate::db::DatabaseError;

/// Defines an enum whose variants map to fixed wire strings. The same
/// string is used in SQLite columns, JSON bodies and query parameters,
/// so Serialize/Deserialize go through `as_str`/`FromStr` rather than
/// the derived variant names.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).to_string(),
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = <String as serde::Deserialize>::deserialize(deserializer)?;
                text.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

str_enum!(Role {
    System => "system",
    User => "user",
    Assistant => "assistant",
});

str_enum!(ChatModel {
    DeepseekDistilled => "deepseek-r1-distill-qwen-32b",
    Qwen25Instruct => "qwen2.5-32b-instruct",
    BgeM3 => "bge-m3",
    MwsGptAlpha => "mws-gpt-alpha",
    Llama31 => "llama-3.1-8b-instruct",
    Gemma3 => "gemma-3-27b-it",
    Qwen25Coder => "qwen2.5-coder-7b-instruct",
    Llama33 => "llama-3.3-70b-instruct",
});
