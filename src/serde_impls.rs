use core::fmt;

use serde::de;
use serde::de::SeqAccess;
use serde::de::Visitor;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::CowByteString;
use crate::CowString;

impl Serialize for CowString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CowString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StrVisitor;

        impl Visitor<'_> for StrVisitor {
            type Value = CowString;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<CowString, E> {
                CowString::from_slice(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(StrVisitor)
    }
}

impl Serialize for CowByteString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self.as_slice())
    }
}

impl<'de> Deserialize<'de> for CowByteString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BytesVisitor;

        impl<'de> Visitor<'de> for BytesVisitor {
            type Value = CowByteString;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("bytes or a string")
            }

            fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<CowByteString, E> {
                CowByteString::from_slice(v).map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<CowByteString, E> {
                CowByteString::from_slice(v.as_bytes()).map_err(E::custom)
            }

            // formats without a native bytes type hand over a sequence
            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<CowByteString, A::Error> {
                let mut out = CowByteString::new();
                if let Some(n) = seq.size_hint() {
                    out.reserve(n).map_err(de::Error::custom)?;
                }
                while let Some(b) = seq.next_element::<u8>()? {
                    out.push(b).map_err(de::Error::custom)?;
                }
                Ok(out)
            }
        }

        deserializer.deserialize_bytes(BytesVisitor)
    }
}
