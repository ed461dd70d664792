use thiserror::Error;
use tracing::trace;

use crate::{
    join::{JoinClasses, NormalizedClass},
    modifier_pattern::ModifierPattern,
    request::{ComposedClassNameRequest, ExtraClassSpec},
    Config,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// Computes class attribute values from [`ComposedClassNameRequest`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composer {
    pattern: ModifierPattern,
}

impl Composer {
    pub fn new(pattern: ModifierPattern) -> Self {
        Self { pattern }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.modifier_pattern.clone())
    }

    pub fn pattern(&self) -> &ModifierPattern {
        &self.pattern
    }

    /// The location-suffixed class for `base_class`.
    pub fn modifier_class(&self, base_class: &str, location: &str) -> Result<String, ComposeError> {
        let base_class = check_base_class(base_class)?;
        Ok(self.pattern.apply(base_class, location))
    }

    /// Joins, in this order: the base class, the location-suffixed class
    /// when a location is given, and the extra classes.
    pub fn compose(&self, request: &ComposedClassNameRequest) -> Result<String, ComposeError> {
        let base_class = check_base_class(&request.base_class)?;

        let modifier = request
            .location
            .as_deref()
            .map(|location| self.pattern.apply(base_class, location));

        let mut classes: Vec<NormalizedClass> = vec![base_class.into(), modifier.as_ref().into()];

        match &request.extra_class {
            ExtraClassSpec::Absent => {}
            ExtraClassSpec::Str(extra) => classes.push(extra.into()),
            ExtraClassSpec::Flags(flags) => classes.extend(
                flags
                    .iter()
                    .map(|(class, enabled)| NormalizedClass::from(enabled.then_some(class))),
            ),
            ExtraClassSpec::Ignored => {
                trace!(base_class, "ignoring extra classes of unsupported shape");
            }
        }

        Ok(classes.join_classes())
    }
}

/// The base class without surrounding whitespace, used for both the base
/// and the location-suffixed class.
pub(crate) fn check_base_class(base_class: &str) -> Result<&str, ComposeError> {
    let base_class = base_class.trim();
    if base_class.is_empty() {
        return Err(ComposeError::InvalidArgument("base class must not be empty"));
    }
    Ok(base_class)
}

/// Composes with the default `[base]--[location]` pattern.
pub fn compose(request: &ComposedClassNameRequest) -> Result<String, ComposeError> {
    Composer::default().compose(request)
}
