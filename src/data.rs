//! Core data structures for keyframe descriptions.
//!
//! Every collection here is an ordered list of pairs. Stage order decides the
//! order of blocks in the generated CSS and, through the canonical JSON form,
//! the animation name itself.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{self, Serialize, SerializeMap, Serializer};
use serde_json::value::RawValue;

use crate::KeyframeError;

/// A single CSS property value.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleValue {
    /// Written verbatim (e.g. `"16px"`, `"red"`)
    Str(String),
    /// Written the way a JavaScript number stringifies, with no unit appended
    Number(f64),
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Str(s) => f.write_str(s),
            StyleValue::Number(n) => f.write_str(&js_number(*n)),
        }
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Str(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Str(value)
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        StyleValue::Number(value)
    }
}

impl From<f32> for StyleValue {
    fn from(value: f32) -> Self {
        StyleValue::Number(value as f64)
    }
}

impl From<i32> for StyleValue {
    fn from(value: i32) -> Self {
        StyleValue::Number(value as f64)
    }
}

impl From<u32> for StyleValue {
    fn from(value: u32) -> Self {
        StyleValue::Number(value as f64)
    }
}

impl From<i64> for StyleValue {
    fn from(value: i64) -> Self {
        StyleValue::Number(value as f64)
    }
}

impl Serialize for StyleValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StyleValue::Str(s) => serializer.serialize_str(s),
            StyleValue::Number(n) if !n.is_finite() => serializer.serialize_unit(),
            StyleValue::Number(n) if is_js_integer(*n) => serializer.serialize_i128(*n as i128),
            // Exponent and small-fraction spellings must match `JSON.stringify`,
            // so the number text is written raw. Only serde_json emits it as a
            // bare number.
            StyleValue::Number(n) => RawValue::from_string(js_number(*n))
                .map_err(<S::Error as ser::Error>::custom)?
                .serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for StyleValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StyleValueVisitor;

        impl<'de> Visitor<'de> for StyleValueVisitor {
            type Value = StyleValue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<StyleValue, E> {
                Ok(StyleValue::Str(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<StyleValue, E> {
                Ok(StyleValue::Str(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<StyleValue, E> {
                Ok(StyleValue::Number(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<StyleValue, E> {
                Ok(StyleValue::Number(v as f64))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<StyleValue, E> {
                Ok(StyleValue::Number(v))
            }
        }

        deserializer.deserialize_any(StyleValueVisitor)
    }
}

/// Integral and small enough that JavaScript prints it without an exponent.
#[inline]
fn is_js_integer(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() < 1e21
}

/// Stringify a number exactly as ECMAScript `Number::toString` does.
///
/// `-0` prints as `0`, exponents appear below `1e-6` and from `1e21` up
/// (`1e-7`, `1e+21`), and non-finite values print `NaN`/`Infinity`.
pub(crate) fn js_number(n: f64) -> String {
    ryu_js::Buffer::new().format(n).to_string()
}

/// Ordered CSS declarations for one keyframe stage.
///
/// Property names are kept exactly as given (`fontSize`, `font-size`,
/// `--custom`); hyphenation is the declaration serializer's concern.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Declarations {
    entries: Vec<(String, StyleValue)>,
}

impl Declarations {
    /// Create an empty declaration list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Declarations::insert`].
    pub fn set(mut self, property: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.insert(property, value);
        self
    }

    /// Set a property.
    ///
    /// An existing property keeps its position and takes the new value.
    pub fn insert(&mut self, property: impl Into<String>, value: impl Into<StyleValue>) {
        let property = property.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == property) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((property, value)),
        }
    }

    /// Get the value of a property.
    pub fn get(&self, property: &str) -> Option<&StyleValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value)
    }

    /// Iterate declarations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<StyleValue>> FromIterator<(K, V)> for Declarations {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut declarations = Declarations::new();
        for (property, value) in iter {
            declarations.insert(property, value);
        }
        declarations
    }
}

impl Serialize for Declarations {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Declarations {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DeclarationsVisitor;

        impl<'de> Visitor<'de> for DeclarationsVisitor {
            type Value = Declarations;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of CSS properties to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Declarations, A::Error> {
                let mut declarations = Declarations::new();
                while let Some((property, value)) = access.next_entry::<String, StyleValue>()? {
                    declarations.insert(property, value);
                }
                Ok(declarations)
            }
        }

        deserializer.deserialize_map(DeclarationsVisitor)
    }
}

/// A point on the animation timeline.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum StageKey {
    /// `from`, equivalent to `0%`
    From,
    /// `to`, equivalent to `100%`
    To,
    /// An `N%` offset, stored as written (e.g. `"12.5%"`)
    Percent(Percentage),
}

/// Validated `N%` stage text. Only obtainable through [`StageKey`] parsing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Percentage(String);

impl Percentage {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl StageKey {
    /// Build a percentage stage from a number.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use css_keyframes::StageKey;
    ///
    /// assert_eq!(StageKey::percent(50.0).unwrap().as_str(), "50%");
    /// assert_eq!(StageKey::percent(12.5).unwrap().as_str(), "12.5%");
    /// assert!(StageKey::percent(-1.0).is_err());
    /// assert!(StageKey::percent(1e-7).is_err());
    /// ```
    pub fn percent(offset: f64) -> Result<Self, KeyframeError> {
        format!("{}%", js_number(offset)).parse()
    }

    /// The stage label as it appears in CSS.
    pub fn as_str(&self) -> &str {
        match self {
            StageKey::From => "from",
            StageKey::To => "to",
            StageKey::Percent(text) => text.as_str(),
        }
    }
}

impl FromStr for StageKey {
    type Err = KeyframeError;

    /// Parse `from`, `to`, or `N%` with `N` an unsigned integer or decimal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "from" => return Ok(StageKey::From),
            "to" => return Ok(StageKey::To),
            _ => {}
        }

        let number = s
            .strip_suffix('%')
            .ok_or_else(|| KeyframeError::InvalidStage(s.to_string()))?;
        let (whole, fraction) = match number.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (number, None),
        };
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

        let valid = match fraction {
            // `5.%` is not a CSS number; `.5%` is
            Some(fraction) => !fraction.is_empty() && all_digits(fraction) && all_digits(whole),
            None => !whole.is_empty() && all_digits(whole),
        };
        if !valid {
            return Err(KeyframeError::InvalidStage(s.to_string()));
        }

        Ok(StageKey::Percent(Percentage(s.to_string())))
    }
}

impl TryFrom<&str> for StageKey {
    type Error = KeyframeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for StageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StageKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// An ordered keyframe description: stage label to declarations.
///
/// ## Example
///
/// ```rust
/// use css_keyframes::{Declarations, Keyframes, StageKey};
///
/// let fade = Keyframes::new()
///     .stage(StageKey::From, Declarations::new().set("opacity", 0))
///     .stage(StageKey::To, Declarations::new().set("opacity", 1));
///
/// assert_eq!(
///     fade.to_canonical_json().unwrap(),
///     r#"{"from":{"opacity":0},"to":{"opacity":1}}"#
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Keyframes {
    stages: Vec<(StageKey, Declarations)>,
}

impl Keyframes {
    /// Create an empty description.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Keyframes::insert`].
    pub fn stage(mut self, key: StageKey, declarations: Declarations) -> Self {
        self.insert(key, declarations);
        self
    }

    /// Set the declarations of a stage.
    ///
    /// An existing stage keeps its position and takes the new declarations.
    pub fn insert(&mut self, key: StageKey, declarations: Declarations) {
        match self.stages.iter_mut().find(|(stage, _)| *stage == key) {
            Some(entry) => entry.1 = declarations,
            None => self.stages.push((key, declarations)),
        }
    }

    /// Get the declarations of a stage.
    pub fn get(&self, key: &StageKey) -> Option<&Declarations> {
        self.stages
            .iter()
            .find(|(stage, _)| stage == key)
            .map(|(_, declarations)| declarations)
    }

    /// Iterate stages in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&StageKey, &Declarations)> {
        self.stages.iter().map(|(stage, declarations)| (stage, declarations))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Compact JSON of the description, keys in insertion order.
    ///
    /// This is the text the animation name is hashed from.
    pub fn to_canonical_json(&self) -> Result<String, KeyframeError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a description from a JSON object, keeping key order.
    pub fn from_json_str(s: &str) -> Result<Self, KeyframeError> {
        Ok(serde_json::from_str(s)?)
    }
}

impl Serialize for Keyframes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.stages.len()))?;
        for (stage, declarations) in &self.stages {
            map.serialize_entry(stage, declarations)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Keyframes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeyframesVisitor;

        impl<'de> Visitor<'de> for KeyframesVisitor {
            type Value = Keyframes;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of keyframe stages to declarations")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Keyframes, A::Error> {
                let mut keyframes = Keyframes::new();
                while let Some(label) = access.next_key::<String>()? {
                    let stage = label
                        .parse::<StageKey>()
                        .map_err(<A::Error as de::Error>::custom)?;
                    let declarations = access.next_value::<Declarations>()?;
                    keyframes.insert(stage, declarations);
                }
                Ok(keyframes)
            }
        }

        deserializer.deserialize_map(KeyframesVisitor)
    }
}

/// The generated `@keyframes` identifier: `_` followed by the hash.
///
/// Only `[a-z0-9_]` characters occur, so the name is usable unquoted as a
/// CSS `animation-name`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct AnimationName(String);

impl AnimationName {
    /// Derive the name for a canonical description string.
    pub(crate) fn from_canonical(canonical: &str) -> Self {
        AnimationName(format!("_{}", crate::hash(canonical)))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnimationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AnimationName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for AnimationName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for AnimationName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<AnimationName> for String {
    fn from(name: AnimationName) -> Self {
        name.0
    }
}
