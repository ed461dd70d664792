use indexmap::IndexMap;
use serde::{de::IgnoredAny, Deserialize, Deserializer};

/// Extra classes supplied by the caller, appended after the base and
/// location classes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExtraClassSpec {
    #[default]
    Absent,
    /// Appended verbatim.
    Str(String),
    /// Each key whose flag is `true` is appended, in insertion order.
    Flags(IndexMap<String, bool>),
    /// A value of any other shape. Contributes nothing.
    Ignored,
}

impl From<&str> for ExtraClassSpec {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for ExtraClassSpec {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<IndexMap<String, bool>> for ExtraClassSpec {
    fn from(value: IndexMap<String, bool>) -> Self {
        Self::Flags(value)
    }
}

impl<K: Into<String>, const N: usize> From<[(K, bool); N]> for ExtraClassSpec {
    fn from(value: [(K, bool); N]) -> Self {
        Self::Flags(value.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<'de> Deserialize<'de> for ExtraClassSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Str(String),
            Flags(IndexMap<String, bool>),
            Other(IgnoredAny),
        }

        Ok(match Option::<Repr>::deserialize(deserializer)? {
            None => Self::Absent,
            Some(Repr::Str(s)) => Self::Str(s),
            Some(Repr::Flags(flags)) => Self::Flags(flags),
            Some(Repr::Other(_)) => Self::Ignored,
        })
    }
}

/// Input of a single composition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposedClassNameRequest {
    pub base_class: String,
    #[serde(default, deserialize_with = "deserialize_location")]
    pub location: Option<String>,
    #[serde(default)]
    pub extra_class: ExtraClassSpec,
}

impl ComposedClassNameRequest {
    pub fn new(base_class: impl Into<String>) -> Self {
        Self {
            base_class: base_class.into(),
            location: None,
            extra_class: ExtraClassSpec::Absent,
        }
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn maybe_location(mut self, location: Option<impl Into<String>>) -> Self {
        self.location = location.map(Into::into);
        self
    }

    pub fn extra(mut self, extra_class: impl Into<ExtraClassSpec>) -> Self {
        self.extra_class = extra_class.into();
        self
    }

    /// Adds one toggled class, switching the extra classes to the flags
    /// shape. A previous string value is dropped.
    pub fn flag(mut self, class: impl Into<String>, enabled: bool) -> Self {
        match &mut self.extra_class {
            ExtraClassSpec::Flags(flags) => {
                flags.insert(class.into(), enabled);
            }
            other => {
                *other = ExtraClassSpec::Flags(IndexMap::from([(class.into(), enabled)]));
            }
        }
        self
    }
}

/// Non-null scalars are stringified the way a template would print them.
fn deserialize_location<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Str(String),
        Int(i64),
        UInt(u64),
        Float(f64),
        Bool(bool),
    }

    let location = Option::<Scalar>::deserialize(deserializer).map_err(|_| {
        serde::de::Error::custom("location must be a string, number, boolean or null")
    })?;

    Ok(location.map(|l| match l {
        Scalar::Str(s) => s,
        Scalar::Int(i) => i.to_string(),
        Scalar::UInt(u) => u.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::Bool(b) => b.to_string(),
    }))
}
