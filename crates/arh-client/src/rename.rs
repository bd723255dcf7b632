// ----- standard library imports
// ----- extra library imports
use serde::de::{
    self, DeserializeSeed, Deserializer, EnumAccess, IntoDeserializer, MapAccess, SeqAccess,
    VariantAccess, Visitor,
};
use serde::ser::{
    self, Serialize, SerializeMap, SerializeSeq, SerializeStruct, SerializeStructVariant,
    SerializeTuple, SerializeTupleStruct, SerializeTupleVariant, Serializer,
};
// ----- local imports
use crate::codec::BodyCodec;

// ----- end imports

// Field renaming driven by the model type: only names a struct declares are
// mapped, map keys and enum variant names pass through untouched.
//
// Known gap: `#[serde(flatten)]`, untagged and internally tagged enums buffer
// their input before the struct sees it, so their fields are read as declared.

/// Serializes `value` writing every struct field under its wire name.
pub(crate) struct Outgoing<'a, T: ?Sized> {
    value: &'a T,
    codec: &'a dyn BodyCodec,
}

impl<'a, T: ?Sized> Outgoing<'a, T> {
    pub(crate) fn new(value: &'a T, codec: &'a dyn BodyCodec) -> Self {
        Self { value, codec }
    }
}

impl<T> Serialize for Outgoing<'_, T>
where
    T: Serialize + ?Sized,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(RenameSerializer {
            inner: serializer,
            codec: self.codec,
        })
    }
}

struct RenameSerializer<'a, S> {
    inner: S,
    codec: &'a dyn BodyCodec,
}

/// Sequences, tuples and maps: children are renamed, map keys are not.
struct RenameCompound<'a, C> {
    inner: C,
    codec: &'a dyn BodyCodec,
}

/// Structs are written as maps so that field names need not be `'static`.
struct RenameStruct<'a, M> {
    inner: M,
    codec: &'a dyn BodyCodec,
}

struct RenameStructVariant<'a, S> {
    inner: S,
    variant: &'static str,
    fields: serde_json::Map<String, serde_json::Value>,
    codec: &'a dyn BodyCodec,
}

macro_rules! forward_serialize {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method(self, v: $ty) -> Result<Self::Ok, Self::Error> {
                self.inner.$method(v)
            }
        )*
    };
}

impl<'a, S: Serializer> Serializer for RenameSerializer<'a, S> {
    type Ok = S::Ok;
    type Error = S::Error;
    type SerializeSeq = RenameCompound<'a, S::SerializeSeq>;
    type SerializeTuple = RenameCompound<'a, S::SerializeTuple>;
    type SerializeTupleStruct = RenameCompound<'a, S::SerializeTupleStruct>;
    type SerializeTupleVariant = RenameCompound<'a, S::SerializeTupleVariant>;
    type SerializeMap = RenameCompound<'a, S::SerializeMap>;
    type SerializeStruct = RenameStruct<'a, S::SerializeMap>;
    type SerializeStructVariant = RenameStructVariant<'a, S>;

    forward_serialize!(
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_i128(i128),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_u128(u128),
        serialize_f32(f32),
        serialize_f64(f64),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
    );

    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        self.inner.serialize_none()
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Self::Ok, Self::Error> {
        self.inner.serialize_some(&Outgoing::new(value, self.codec))
    }

    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        self.inner.serialize_unit()
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Self::Ok, Self::Error> {
        self.inner.serialize_unit_struct(name)
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        self.inner
            .serialize_unit_variant(name, variant_index, variant)
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        self.inner
            .serialize_newtype_struct(name, &Outgoing::new(value, self.codec))
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        self.inner.serialize_newtype_variant(
            name,
            variant_index,
            variant,
            &Outgoing::new(value, self.codec),
        )
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Ok(RenameCompound {
            inner: self.inner.serialize_seq(len)?,
            codec: self.codec,
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Ok(RenameCompound {
            inner: self.inner.serialize_tuple(len)?,
            codec: self.codec,
        })
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Ok(RenameCompound {
            inner: self.inner.serialize_tuple_struct(name, len)?,
            codec: self.codec,
        })
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Ok(RenameCompound {
            inner: self
                .inner
                .serialize_tuple_variant(name, variant_index, variant, len)?,
            codec: self.codec,
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Ok(RenameCompound {
            inner: self.inner.serialize_map(len)?,
            codec: self.codec,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Ok(RenameStruct {
            inner: self.inner.serialize_map(Some(len))?,
            codec: self.codec,
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Ok(RenameStructVariant {
            inner: self.inner,
            variant,
            fields: serde_json::Map::new(),
            codec: self.codec,
        })
    }

    fn is_human_readable(&self) -> bool {
        self.inner.is_human_readable()
    }
}

impl<C: SerializeSeq> SerializeSeq for RenameCompound<'_, C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), C::Error> {
        self.inner
            .serialize_element(&Outgoing::new(value, self.codec))
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

impl<C: SerializeTuple> SerializeTuple for RenameCompound<'_, C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), C::Error> {
        self.inner
            .serialize_element(&Outgoing::new(value, self.codec))
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

impl<C: SerializeTupleStruct> SerializeTupleStruct for RenameCompound<'_, C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), C::Error> {
        self.inner.serialize_field(&Outgoing::new(value, self.codec))
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

impl<C: SerializeTupleVariant> SerializeTupleVariant for RenameCompound<'_, C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), C::Error> {
        self.inner.serialize_field(&Outgoing::new(value, self.codec))
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

impl<C: SerializeMap> SerializeMap for RenameCompound<'_, C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), C::Error> {
        self.inner.serialize_key(key)
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), C::Error> {
        self.inner.serialize_value(&Outgoing::new(value, self.codec))
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

impl<M: SerializeMap> SerializeStruct for RenameStruct<'_, M> {
    type Ok = M::Ok;
    type Error = M::Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), M::Error> {
        let name = self.codec.outgoing_name(key);
        self.inner
            .serialize_entry(name.as_ref(), &Outgoing::new(value, self.codec))
    }

    fn end(self) -> Result<M::Ok, M::Error> {
        self.inner.end()
    }
}

impl<S: Serializer> SerializeStructVariant for RenameStructVariant<'_, S> {
    type Ok = S::Ok;
    type Error = S::Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), S::Error> {
        let value = serde_json::to_value(Outgoing::new(value, self.codec))
            .map_err(<S::Error as ser::Error>::custom)?;
        let name = self.codec.outgoing_name(key).into_owned();
        self.fields.insert(name, value);
        Ok(())
    }

    fn end(self) -> Result<S::Ok, S::Error> {
        let mut map = self.inner.serialize_map(Some(1))?;
        map.serialize_entry(self.variant, &self.fields)?;
        map.end()
    }
}

/// Reads through `inner`, matching wire names back to declared struct fields.
pub(crate) struct RenameDeserializer<'a, D> {
    inner: D,
    codec: &'a dyn BodyCodec,
}

impl<'a, D> RenameDeserializer<'a, D> {
    pub(crate) fn new(inner: D, codec: &'a dyn BodyCodec) -> Self {
        Self { inner, codec }
    }
}

struct RenameVisitor<'a, V> {
    inner: V,
    codec: &'a dyn BodyCodec,
    /// declared fields when the visitor reads a struct
    fields: Option<&'static [&'static str]>,
}

struct RenameSeed<'a, S> {
    inner: S,
    codec: &'a dyn BodyCodec,
}

struct RenameSeq<'a, A> {
    inner: A,
    codec: &'a dyn BodyCodec,
}

struct RenameMap<'a, A> {
    inner: A,
    codec: &'a dyn BodyCodec,
    fields: Option<&'static [&'static str]>,
}

struct RenameEnum<'a, A> {
    inner: A,
    codec: &'a dyn BodyCodec,
}

macro_rules! forward_deserialize {
    ($($method:ident),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
                self.inner.$method(RenameVisitor::plain(visitor, self.codec))
            }
        )*
    };
}

impl<'a, 'de, D: Deserializer<'de>> Deserializer<'de> for RenameDeserializer<'a, D> {
    type Error = D::Error;

    forward_deserialize!(
        deserialize_any,
        deserialize_bool,
        deserialize_i8,
        deserialize_i16,
        deserialize_i32,
        deserialize_i64,
        deserialize_i128,
        deserialize_u8,
        deserialize_u16,
        deserialize_u32,
        deserialize_u64,
        deserialize_u128,
        deserialize_f32,
        deserialize_f64,
        deserialize_char,
        deserialize_str,
        deserialize_string,
        deserialize_bytes,
        deserialize_byte_buf,
        deserialize_option,
        deserialize_unit,
        deserialize_seq,
        deserialize_map,
        deserialize_identifier,
        deserialize_ignored_any,
    );

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        self.inner
            .deserialize_unit_struct(name, RenameVisitor::plain(visitor, self.codec))
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        self.inner
            .deserialize_newtype_struct(name, RenameVisitor::plain(visitor, self.codec))
    }

    fn deserialize_tuple<V: Visitor<'de>>(
        self,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        self.inner
            .deserialize_tuple(len, RenameVisitor::plain(visitor, self.codec))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        self.inner
            .deserialize_tuple_struct(name, len, RenameVisitor::plain(visitor, self.codec))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        let visitor = RenameVisitor {
            inner: visitor,
            codec: self.codec,
            fields: Some(fields),
        };
        self.inner.deserialize_struct(name, fields, visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        self.inner
            .deserialize_enum(name, variants, RenameVisitor::plain(visitor, self.codec))
    }

    fn is_human_readable(&self) -> bool {
        self.inner.is_human_readable()
    }
}

impl<'a, V> RenameVisitor<'a, V> {
    fn plain(inner: V, codec: &'a dyn BodyCodec) -> Self {
        Self {
            inner,
            codec,
            fields: None,
        }
    }
}

macro_rules! forward_visit {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method<E: de::Error>(self, v: $ty) -> Result<V::Value, E> {
                self.inner.$method(v)
            }
        )*
    };
}

impl<'de, V: Visitor<'de>> Visitor<'de> for RenameVisitor<'_, V> {
    type Value = V::Value;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.inner.expecting(formatter)
    }

    forward_visit!(
        visit_bool(bool),
        visit_i8(i8),
        visit_i16(i16),
        visit_i32(i32),
        visit_i64(i64),
        visit_i128(i128),
        visit_u8(u8),
        visit_u16(u16),
        visit_u32(u32),
        visit_u64(u64),
        visit_u128(u128),
        visit_f32(f32),
        visit_f64(f64),
        visit_char(char),
        visit_str(&str),
        visit_borrowed_str(&'de str),
        visit_string(String),
        visit_bytes(&[u8]),
        visit_borrowed_bytes(&'de [u8]),
        visit_byte_buf(Vec<u8>),
    );

    fn visit_none<E: de::Error>(self) -> Result<V::Value, E> {
        self.inner.visit_none()
    }

    fn visit_unit<E: de::Error>(self) -> Result<V::Value, E> {
        self.inner.visit_unit()
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<V::Value, D::Error> {
        self.inner
            .visit_some(RenameDeserializer::new(deserializer, self.codec))
    }

    fn visit_newtype_struct<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<V::Value, D::Error> {
        self.inner
            .visit_newtype_struct(RenameDeserializer::new(deserializer, self.codec))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<V::Value, A::Error> {
        self.inner.visit_seq(RenameSeq {
            inner: seq,
            codec: self.codec,
        })
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<V::Value, A::Error> {
        self.inner.visit_map(RenameMap {
            inner: map,
            codec: self.codec,
            fields: self.fields,
        })
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<V::Value, A::Error> {
        self.inner.visit_enum(RenameEnum {
            inner: data,
            codec: self.codec,
        })
    }
}

impl<'de, S: DeserializeSeed<'de>> DeserializeSeed<'de> for RenameSeed<'_, S> {
    type Value = S::Value;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<S::Value, D::Error> {
        self.inner
            .deserialize(RenameDeserializer::new(deserializer, self.codec))
    }
}

impl<'de, A: SeqAccess<'de>> SeqAccess<'de> for RenameSeq<'_, A> {
    type Error = A::Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, A::Error> {
        self.inner.next_element_seed(RenameSeed {
            inner: seed,
            codec: self.codec,
        })
    }

    fn size_hint(&self) -> Option<usize> {
        self.inner.size_hint()
    }
}

impl<'de, A: MapAccess<'de>> MapAccess<'de> for RenameMap<'_, A> {
    type Error = A::Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, A::Error> {
        let Some(fields) = self.fields else {
            return self.inner.next_key_seed(seed);
        };
        let Some(key) = self.inner.next_key::<String>()? else {
            return Ok(None);
        };
        let key = declared_name(self.codec, fields, key);
        let key: de::value::StringDeserializer<A::Error> = key.into_deserializer();
        seed.deserialize(key).map(Some)
    }

    fn next_value_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<T::Value, A::Error> {
        self.inner.next_value_seed(RenameSeed {
            inner: seed,
            codec: self.codec,
        })
    }

    fn size_hint(&self) -> Option<usize> {
        self.inner.size_hint()
    }
}

impl<'de, 'a, A: EnumAccess<'de>> EnumAccess<'de> for RenameEnum<'a, A> {
    type Error = A::Error;
    type Variant = RenameEnum<'a, A::Variant>;

    fn variant_seed<T: DeserializeSeed<'de>>(
        self,
        seed: T,
    ) -> Result<(T::Value, Self::Variant), A::Error> {
        let (value, variant) = self.inner.variant_seed(seed)?;
        let variant = RenameEnum {
            inner: variant,
            codec: self.codec,
        };
        Ok((value, variant))
    }
}

impl<'de, A: VariantAccess<'de>> VariantAccess<'de> for RenameEnum<'_, A> {
    type Error = A::Error;

    fn unit_variant(self) -> Result<(), A::Error> {
        self.inner.unit_variant()
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value, A::Error> {
        self.inner.newtype_variant_seed(RenameSeed {
            inner: seed,
            codec: self.codec,
        })
    }

    fn tuple_variant<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value, A::Error> {
        self.inner
            .tuple_variant(len, RenameVisitor::plain(visitor, self.codec))
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, A::Error> {
        let visitor = RenameVisitor {
            inner: visitor,
            codec: self.codec,
            fields: Some(fields),
        };
        self.inner.struct_variant(fields, visitor)
    }
}

/// The declared field whose wire name is `key`; unknown keys pass through.
fn declared_name(codec: &dyn BodyCodec, fields: &[&'static str], key: String) -> String {
    if fields.iter().any(|field| *field == key) {
        return key;
    }
    match fields
        .iter()
        .find(|field| codec.incoming_name(field) == key.as_str())
    {
        Some(field) => String::from(*field),
        None => key,
    }
}
