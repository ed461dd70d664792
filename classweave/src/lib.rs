pub use classweave_core::{
    compose, ComposeError, ComposedClassNameRequest, Composer, Container, ExtraClassSpec,
    HtmlSink, JoinClasses, ModifierPattern, Node, NormalizedClass, PatternError, RenderError,
    RenderSink, TreeSink, TOOLBAR_CLASS,
};
pub use classweave_macros::*;

#[macro_export]
macro_rules! classes {
    () => {
        ::std::string::String::new()
    };
    ($($exp:expr),+ $(,)?) => {
        $crate::JoinClasses::join_classes([$($crate::NormalizedClass::from($exp)),+])
    };
}

#[macro_export]
macro_rules! block {
    ($(#[$attr:meta])* $vis:vis $ident:ident, $base:literal, [$($location:tt),* $(,)?]) => {
        $(#[$attr])*
        $vis mod $ident {
            $crate::block_classes!($base, [$($location),*]);
        }
    };
    ($(#[$attr:meta])* $vis:vis $ident:ident, $base:literal $(,)?) => {
        $(#[$attr])*
        $vis mod $ident {
            $crate::block_classes!($base);
        }
    };
}
