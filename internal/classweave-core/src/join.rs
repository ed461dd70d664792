/// A class token that may be absent.
///
/// Surrounding whitespace is trimmed and blank tokens count as absent, so
/// joining never produces doubled or trailing spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NormalizedClass<'a>(Option<&'a str>);

impl<'a> NormalizedClass<'a> {
    pub fn as_str(&self) -> Option<&'a str> {
        self.0
    }
}

impl<'a> From<&'a str> for NormalizedClass<'a> {
    fn from(value: &'a str) -> Self {
        let value = value.trim();
        Self((!value.is_empty()).then_some(value))
    }
}

impl<'a> From<Option<&'a str>> for NormalizedClass<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

impl<'a> From<&'a String> for NormalizedClass<'a> {
    fn from(value: &'a String) -> Self {
        value.as_str().into()
    }
}

impl<'a> From<Option<&'a String>> for NormalizedClass<'a> {
    fn from(value: Option<&'a String>) -> Self {
        value.map(String::as_str).into()
    }
}

impl<'a, 'b> From<&'b NormalizedClass<'a>> for NormalizedClass<'a> {
    fn from(value: &'b NormalizedClass<'a>) -> Self {
        *value
    }
}

pub trait JoinClasses {
    /// Joins the present classes with single spaces, in order.
    fn join_classes(self) -> String;
}

impl<'a, I> JoinClasses for I
where
    I: IntoIterator,
    I::Item: Into<NormalizedClass<'a>>,
{
    fn join_classes(self) -> String {
        let mut joined = String::new();
        for class in self
            .into_iter()
            .filter_map(|c| Into::<NormalizedClass<'a>>::into(c).0)
        {
            if !joined.is_empty() {
                joined.push(' ');
            }
            joined.push_str(class);
        }
        joined
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_blank_classes_are_absent() {
        assert_eq!(NormalizedClass::from("   ").as_str(), None);
        assert_eq!(NormalizedClass::from(" one ").as_str(), Some("one"));
        assert_eq!(NormalizedClass::from(None::<&str>).as_str(), None);
    }

    #[test]
    fn test_join_skips_absent() {
        let classes: [NormalizedClass; 4] = [
            "one".into(),
            None::<&str>.into(),
            "".into(),
            Some("two").into(),
        ];
        assert_eq!(classes.join_classes(), "one two");
        assert_eq!(classes[..].iter().join_classes(), "one two");
    }

    #[test]
    fn test_join_keeps_duplicates() {
        assert_eq!(["a", "a", "b"].join_classes(), "a a b");
    }
}
