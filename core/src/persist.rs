//! Serde support: a list persists as its length followed by its elements.

use core::fmt;
use core::marker::PhantomData;

use serde::de::{SeqAccess, Visitor};
use serde::ser::{Error as _, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::list::ArrayList;
use crate::tracker::Watch;

/// Upper bound on the capacity reserved from an untrusted length prefix.
const MAX_PREALLOCATE: usize = 4096;

impl<T: Serialize> Serialize for ArrayList<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let expected = self.tracker().current(Watch::Structure);
        let buffer = self.read().map_err(S::Error::custom)?;
        let mut seq = serializer.serialize_seq(Some(buffer.items.len()))?;
        for item in &buffer.items {
            seq.serialize_element(item)?;
        }
        drop(buffer);
        self.tracker()
            .ensure(Watch::Structure, expected)
            .map_err(S::Error::custom)?;
        seq.end()
    }
}

struct ListVisitor<T> {
    marker: PhantomData<fn() -> T>,
}

impl<'de, T> Visitor<'de> for ListVisitor<T>
where
    T: Deserialize<'de>,
{
    type Value = ArrayList<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of list elements")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let capacity = seq.size_hint().unwrap_or(0).min(MAX_PREALLOCATE);
        let mut items = Vec::with_capacity(capacity);
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(ArrayList::from(items))
    }
}

impl<'de, T> Deserialize<'de> for ArrayList<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(ListVisitor {
            marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::Sequence;

    #[test]
    fn test_postcard_round_trip_is_exactly_sized() {
        let list = ArrayList::new();
        for word in ["alpha", "beta", "gamma"] {
            list.push(word.to_string()).unwrap();
        }
        let bytes = postcard::to_allocvec(&list).unwrap();
        // Length prefix first
        assert_eq!(bytes[0], 3);

        let restored: ArrayList<String> = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(restored.to_vec().unwrap(), list.to_vec().unwrap());
        assert_eq!(restored.capacity(), 3);
    }

    #[test]
    fn test_empty_list_restores_unallocated() {
        let list: ArrayList<u32> = ArrayList::with_capacity(32).unwrap();
        let bytes = postcard::to_allocvec(&list).unwrap();
        assert_eq!(bytes, vec![0]);

        let restored: ArrayList<u32> = postcard::from_bytes(&bytes).unwrap();
        assert!(restored.is_empty());
        assert_eq!(restored.capacity(), 0);
    }

    #[test]
    fn test_truncated_input_is_rejected() {
        let list: ArrayList<u32> = (0..10).collect();
        let bytes = postcard::to_allocvec(&list).unwrap();
        let result: Result<ArrayList<u32>, _> = postcard::from_bytes(&bytes[..bytes.len() - 3]);
        assert!(result.is_err());
    }

    #[test]
    fn test_oversized_count_is_rejected() {
        // Claims a huge element count with no elements behind it
        let bytes = [0xff, 0xff, 0xff, 0xff, 0x0f];
        let result: Result<ArrayList<u8>, _> = postcard::from_bytes(&bytes);
        assert!(result.is_err());
    }
}
