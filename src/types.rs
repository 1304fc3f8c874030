use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use shrinkwraprs::Shrinkwrap;

macro_rules! impl_primitive_num {
    (pub struct $outer:ident($tname:ty)) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            Serialize,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Deserialize,
            Shrinkwrap,
        )]
        #[serde(transparent)]
        pub struct $outer(pub $tname);

        impl std::fmt::Display for $outer {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $outer {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }
    };
}

impl_primitive_num!(pub struct ChainId(u64));
impl_primitive_num!(pub struct Gas(u64));
impl_primitive_num!(pub struct GasPrice(u64));
impl_primitive_num!(pub struct AddressIndex(u32));

impl Default for AddressIndex {
    fn default() -> Self {
        Self(0)
    }
}

/// The `network_id` of a profile: a concrete chain or `*` to accept any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkId {
    Any,
    Id(ChainId),
}

impl NetworkId {
    pub const fn id(id: u64) -> Self {
        Self::Id(ChainId(id))
    }

    pub fn chain_id(&self) -> Option<ChainId> {
        match self {
            Self::Any => None,
            Self::Id(id) => Some(*id),
        }
    }

    pub fn matches(&self, chain_id: ChainId) -> bool {
        match self {
            Self::Any => true,
            Self::Id(id) => *id == chain_id,
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "*"),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

impl FromStr for NetworkId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "*" {
            Ok(Self::Any)
        } else {
            s.parse().map(Self::Id)
        }
    }
}

impl Serialize for NetworkId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Any => serializer.serialize_str("*"),
            Self::Id(id) => serializer.serialize_u64(id.0),
        }
    }
}

impl<'de> Deserialize<'de> for NetworkId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(u64),
            Str(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Num(id) => Ok(Self::id(id)),
            Raw::Str(s) => s.parse().map_err(|_| {
                serde::de::Error::custom(format!(
                    "invalid network_id {s:?}, expected an integer or \"*\""
                ))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_id_accepts_wildcard_and_numbers() {
        let ids: Vec<NetworkId> =
            serde_json::from_str(r#"["*", 3, "42"]"#).unwrap();

        assert_eq!(
            ids,
            vec![NetworkId::Any, NetworkId::id(3), NetworkId::id(42)]
        );
    }

    #[test]
    fn network_id_rejects_garbage() {
        let res = serde_json::from_str::<NetworkId>(r#""ropsten""#);

        assert!(res.is_err());
    }

    #[test]
    fn wildcard_matches_everything() {
        assert!(NetworkId::Any.matches(ChainId(1)));
        assert!(NetworkId::id(42).matches(ChainId(42)));
        assert!(!NetworkId::id(42).matches(ChainId(3)));
    }

    #[test]
    fn serializes_back_to_truffle_shape() {
        let s = serde_json::to_string(&[NetworkId::Any, NetworkId::id(1)])
            .unwrap();

        assert_eq!(s, r#"["*",1]"#);
    }
}
