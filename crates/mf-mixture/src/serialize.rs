//! Serde encoding of mixtures.
//!
//! `{name?, composition: {species: amount}}` where an amount is a bare float
//! (plain ratio), a unit-suffixed string (`"21%"`, `"400ppm"`) or the balance
//! marker `"*"`. The composition map is kept in document order.

use crate::amount::{AmountSpec, Fraction};
use crate::mixture::Mixture;
use mf_core::parse::FractionUnit;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

impl Serialize for AmountSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AmountSpec::Balance => serializer.serialize_str(crate::BALANCE_INDICATOR),
            AmountSpec::Value(fraction) => match fraction.unit() {
                FractionUnit::Ratio => serializer.serialize_f64(fraction.magnitude()),
                _ => serializer.serialize_str(&fraction.to_string()),
            },
        }
    }
}

impl<'de> Deserialize<'de> for AmountSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AmountVisitor;

        impl Visitor<'_> for AmountVisitor {
            type Value = AmountSpec;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a fraction, a unit-suffixed string or \"*\"")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(AmountSpec::Value(Fraction::from(v)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(AmountSpec::Value(Fraction::from(v as f64)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(AmountSpec::Value(Fraction::from(v as f64)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                AmountSpec::parse(v).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}

struct CompositionSer<'a>(&'a Mixture);

impl Serialize for CompositionSer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (species, amount) in self.0.iter() {
            map.serialize_entry(species, amount)?;
        }
        map.end()
    }
}

impl Serialize for Mixture {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = if self.name().is_some() { 2 } else { 1 };
        let mut state = serializer.serialize_struct("Mixture", fields)?;
        match self.name() {
            Some(name) => state.serialize_field("name", name)?,
            None => state.skip_field("name")?,
        }
        state.serialize_field("composition", &CompositionSer(self))?;
        state.end()
    }
}

fn deserialize_composition<'de, A: MapAccess<'de>>(
    map: &mut A,
) -> Result<Vec<(String, AmountSpec)>, A::Error> {
    struct CompositionVisitor;

    impl<'de> Visitor<'de> for CompositionVisitor {
        type Value = Vec<(String, AmountSpec)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a species -> amount mapping")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((species, amount)) = map.next_entry::<String, AmountSpec>()? {
                pairs.push((species, amount));
            }
            Ok(pairs)
        }
    }

    struct CompositionSeed;

    impl<'de> de::DeserializeSeed<'de> for CompositionSeed {
        type Value = Vec<(String, AmountSpec)>;

        fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_map(CompositionVisitor)
        }
    }

    map.next_value_seed(CompositionSeed)
}

impl<'de> Deserialize<'de> for Mixture {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MixtureVisitor;

        impl<'de> Visitor<'de> for MixtureVisitor {
            type Value = Mixture;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mixture ({name?, composition})")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut name: Option<String> = None;
                let mut composition: Option<Vec<(String, AmountSpec)>> = None;

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "name" => name = map.next_value::<Option<String>>()?,
                        "composition" => composition = Some(deserialize_composition(&mut map)?),
                        other => {
                            return Err(de::Error::unknown_field(
                                other,
                                &["name", "composition"],
                            ));
                        }
                    }
                }

                let composition =
                    composition.ok_or_else(|| de::Error::missing_field("composition"))?;
                Mixture::from_parts(name, composition).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_map(MixtureVisitor)
    }
}
