//! Named keyframe animations loaded from a TOML sheet.
//!
//! ```toml
//! nonce = "r4nd0m"
//!
//! [animations.fade-in.from]
//! opacity = 0
//!
//! [animations.fade-in.to]
//! opacity = 1
//!
//! [animations.pulse."50%"]
//! transform = "scale(1.1)"
//! ```
//!
//! Tables keep their document order, so a sheet produces the same animation
//! names as the equivalent descriptions built in code.

use std::fmt;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};

use crate::{AnimationName, DeclarationSerializer, KeyframeBuilder, KeyframeError, Keyframes, StyleNode};

/// A set of labelled keyframe descriptions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyframeSheet {
    /// Nonce applied to every style node built from this sheet
    pub nonce: Option<String>,
    /// Animations in document order, keyed by their sheet label
    pub animations: Vec<(String, Keyframes)>,
}

/// One built animation of a sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct SheetEntry {
    /// Label from the sheet (e.g. `fade-in`)
    pub label: String,
    /// Generated animation name
    pub name: AnimationName,
    pub node: StyleNode,
}

#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSheet {
    nonce: Option<String>,
    #[serde(default)]
    animations: LabelledKeyframes,
}

#[derive(Default)]
struct LabelledKeyframes(Vec<(String, Keyframes)>);

impl<'de> Deserialize<'de> for LabelledKeyframes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LabelledVisitor;

        impl<'de> Visitor<'de> for LabelledVisitor {
            type Value = LabelledKeyframes;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of named keyframe descriptions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<LabelledKeyframes, A::Error> {
                let mut animations = Vec::new();
                while let Some((label, keyframes)) = access.next_entry::<String, Keyframes>()? {
                    animations.push((label, keyframes));
                }
                Ok(LabelledKeyframes(animations))
            }
        }

        deserializer.deserialize_map(LabelledVisitor)
    }
}

impl KeyframeSheet {
    /// Parse a sheet from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self, KeyframeError> {
        let raw: RawSheet = toml::from_str(s)?;
        tracing::debug!(animations = raw.animations.0.len(), "keyframe sheet parsed");
        Ok(Self {
            nonce: raw.nonce,
            animations: raw.animations.0,
        })
    }

    /// Look up an animation description by label.
    pub fn get(&self, label: &str) -> Option<&Keyframes> {
        self.animations
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, keyframes)| keyframes)
    }

    /// Build every animation with `builder`, in sheet order.
    pub fn build<S: DeclarationSerializer>(
        &self,
        builder: &mut KeyframeBuilder<S>,
    ) -> Result<Vec<SheetEntry>, KeyframeError> {
        self.animations
            .iter()
            .map(|(label, keyframes)| {
                let (name, node) = builder.create(keyframes, self.nonce.as_deref())?;
                Ok(SheetEntry {
                    label: label.clone(),
                    name,
                    node,
                })
            })
            .collect()
    }

    /// Concatenate the rules of built entries into one stylesheet.
    pub fn to_css(entries: &[SheetEntry]) -> String {
        entries.iter().map(|entry| &*entry.node.css).collect()
    }
}
