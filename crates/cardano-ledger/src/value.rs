//! Multi-asset value algebra
//!
//! A [`Value`] maps assets to arbitrary-precision signed amounts. Entries are
//! kept in [`Asset`] order, so iteration and rendering are deterministic.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use forge_core::FormatError;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};

use crate::asset::{Asset, ADA};

/// Separator between entries of a rendered value
pub const VALUE_SEPARATOR: &str = " + ";

/// A bundle of asset amounts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ValueItem>", into = "Vec<ValueItem>")]
pub struct Value(BTreeMap<Asset, BigInt>);

impl Value {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// A value holding only lovelace
    pub fn lovelace(amount: impl Into<BigInt>) -> Self {
        let mut v = Self::new();
        v.add(ADA, amount);
        v
    }

    /// Builder-style [`Value::add`]
    pub fn with(mut self, asset: Asset, amount: impl Into<BigInt>) -> Self {
        self.add(asset, amount);
        self
    }

    /// Increase the amount of `asset`, creating the entry if absent
    pub fn add(&mut self, asset: Asset, amount: impl Into<BigInt>) -> &mut Self {
        *self.0.entry(asset).or_insert_with(BigInt::zero) += amount.into();
        self
    }

    /// Decrease the amount of `asset`. The entry is dropped once it reaches
    /// zero or below; absent assets are left untouched.
    pub fn remove(&mut self, asset: &Asset, amount: impl Into<BigInt>) -> &mut Self {
        if let Some(current) = self.0.get_mut(asset) {
            *current -= amount.into();
            if !current.is_positive() {
                self.0.remove(asset);
            }
        }
        self
    }

    pub fn add_all(&mut self, other: &Value) -> &mut Self {
        for (asset, amount) in other.iter() {
            self.add(asset.clone(), amount.clone());
        }
        self
    }

    pub fn remove_all(&mut self, other: &Value) -> &mut Self {
        for (asset, amount) in other.iter() {
            self.remove(asset, amount.clone());
        }
        self
    }

    /// Drop an entry regardless of its amount
    pub fn remove_asset(&mut self, asset: &Asset) -> &mut Self {
        self.0.remove(asset);
        self
    }

    pub fn contains(&self, asset: &Asset) -> bool {
        self.0.contains_key(asset)
    }

    pub fn get(&self, asset: &Asset) -> Option<&BigInt> {
        self.0.get(asset)
    }

    /// Lovelace held, zero if there is no ADA entry
    pub fn ada(&self) -> BigInt {
        self.get(&ADA).cloned().unwrap_or_default()
    }

    pub fn assets(&self) -> impl Iterator<Item = &Asset> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Asset, &BigInt)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if the only entry is ADA
    pub fn is_ada_only(&self) -> bool {
        self.len() == 1 && self.contains(&ADA)
    }

    /// Copy with all zero-amount entries removed
    pub fn trim(&self) -> Value {
        Self(
            self.0
                .iter()
                .filter(|(_, amount)| !amount.is_zero())
                .map(|(asset, amount)| (asset.clone(), amount.clone()))
                .collect(),
        )
    }

    /// Copy with every amount negated
    pub fn negated(&self) -> Value {
        Self(
            self.0
                .iter()
                .map(|(asset, amount)| (asset.clone(), -amount))
                .collect(),
        )
    }
}

impl FromIterator<(Asset, BigInt)> for Value {
    fn from_iter<I: IntoIterator<Item = (Asset, BigInt)>>(iter: I) -> Self {
        let mut v = Value::new();
        for (asset, amount) in iter {
            v.add(asset, amount);
        }
        v
    }
}

/// Renders `{amount} lovelace`, `{amount} {symbol}` or
/// `{amount} {symbol}.{name}` per entry, joined by ` + `.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (asset, amount)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(VALUE_SEPARATOR)?;
            }
            write!(f, "{} {}", amount, asset)?;
        }
        Ok(())
    }
}

/// Parses the rendered form produced by [`fmt::Display`]
impl FromStr for Value {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut v = Value::new();
        for fund in s.split(VALUE_SEPARATOR) {
            let (asset, amount) = parse_fund(fund)?;
            v.add(asset, amount);
        }
        Ok(v)
    }
}

/// Parse a decimal integer amount, optionally signed
pub fn parse_amount(s: &str) -> Result<BigInt, FormatError> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FormatError::InvalidAmount {
            input: s.to_string(),
        });
    }
    s.parse::<BigInt>().map_err(|_| FormatError::InvalidAmount {
        input: s.to_string(),
    })
}

/// Parse a single `"<amount> <asset>"` entry
pub fn parse_fund(s: &str) -> Result<(Asset, BigInt), FormatError> {
    let fields: Vec<&str> = s.split_whitespace().collect();
    let [amount, asset] = fields.as_slice() else {
        return Err(FormatError::InvalidFund {
            input: s.to_string(),
        });
    };
    Ok((asset.parse()?, parse_amount(amount)?))
}

/// JSON form of a single value entry. The amount is written as a bare JSON
/// number of any size; a quoted decimal string is also accepted on input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueItem {
    pub asset: Asset,
    #[serde(with = "json_amount")]
    pub amount: BigInt,
}

mod json_amount {
    use num_bigint::BigInt;
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::value::RawValue;

    use super::parse_amount;

    pub fn serialize<S: Serializer>(amount: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
        RawValue::from_string(amount.to_string())
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        let text = raw.get();
        let digits = if text.starts_with('"') {
            serde_json::from_str::<String>(text).map_err(D::Error::custom)?
        } else {
            text.to_string()
        };
        parse_amount(&digits).map_err(D::Error::custom)
    }
}

impl From<Value> for Vec<ValueItem> {
    fn from(v: Value) -> Self {
        v.0.into_iter()
            .map(|(asset, amount)| ValueItem { asset, amount })
            .collect()
    }
}

impl From<Vec<ValueItem>> for Value {
    fn from(items: Vec<ValueItem>) -> Self {
        items
            .into_iter()
            .map(|item| (item.asset, item.amount))
            .collect()
    }
}
