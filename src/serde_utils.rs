use std::path::Path;

use eyre::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// On-disk encodings a configuration file may use.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, derive_more::Display,
)]
pub enum Format {
    #[display(fmt = "yaml")]
    Yaml,
    #[display(fmt = "json")]
    Json,
    #[display(fmt = "toml")]
    Toml,
}

impl Format {
    /// Picks the format from the file extension, YAML when unknown.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }

    pub fn deserialize_str<T>(self, content: &str) -> eyre::Result<T>
    where
        T: DeserializeOwned,
    {
        Ok(match self {
            Self::Yaml => serde_yaml::from_str(content)?,
            Self::Json => serde_json::from_str(content)?,
            Self::Toml => toml::from_str(content)?,
        })
    }

    pub fn serialize_to_string<T>(self, value: &T) -> eyre::Result<String>
    where
        T: Serialize,
    {
        Ok(match self {
            Self::Yaml => serde_yaml::to_string(value)?,
            Self::Json => serde_json::to_string_pretty(value)?,
            Self::Toml => toml::to_string_pretty(value)?,
        })
    }
}

/// Maps keyed by name where a repeated key is an error rather than
/// silently overwriting the earlier entry.
pub mod unique_map {
    use std::collections::BTreeMap;
    use std::fmt;
    use std::marker::PhantomData;

    use serde::de::{MapAccess, Visitor};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, V>(
        deserializer: D,
    ) -> Result<BTreeMap<String, V>, D::Error>
    where
        D: Deserializer<'de>,
        V: Deserialize<'de>,
    {
        struct UniqueVisitor<V>(PhantomData<V>);

        impl<'de, V> Visitor<'de> for UniqueVisitor<V>
        where
            V: Deserialize<'de>,
        {
            type Value = BTreeMap<String, V>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a map with unique keys")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = BTreeMap::new();

                while let Some((key, value)) =
                    access.next_entry::<String, V>()?
                {
                    if map.contains_key(&key) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate entry {key:?}"
                        )));
                    }

                    map.insert(key, value);
                }

                Ok(map)
            }
        }

        deserializer.deserialize_map(UniqueVisitor(PhantomData))
    }
}

pub async fn read_deserialize<T>(path: impl AsRef<Path>) -> eyre::Result<T>
where
    T: DeserializeOwned,
{
    let path = path.as_ref();

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Reading from {}", path.display()))?;

    let value = Format::from_path(path)
        .deserialize_str(&content)
        .with_context(|| format!("Parsing {}", path.display()))?;

    Ok(value)
}

pub async fn write_serialize<T>(
    path: impl AsRef<Path>,
    value: T,
) -> eyre::Result<()>
where
    T: Serialize,
{
    let path = path.as_ref();

    let content = Format::from_path(path)
        .serialize_to_string(&value)
        .with_context(|| format!("Serializing {}", path.display()))?;

    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Writing to {}", path.display()))?;

    Ok(())
}
