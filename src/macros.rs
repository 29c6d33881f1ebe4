//! Macros to reduce enum boilerplate

/// Generate `Display` and case-insensitive `FromStr` for a fieldless enum.
///
/// # Usage
///
/// ```rust,ignore
/// use crate::error::FolioError;
///
/// enum_display_fromstr!(
///     LoadMode,
///     FolioError::InvalidMode,
///     {
///         Paged => "paged",
///         InfiniteScroll => "infinite_scroll",
///     }
/// );
/// ```
#[macro_export]
macro_rules! enum_display_fromstr {
    (
        $enum_name:ident,
        $error_variant:path,
        { $($variant:ident => $str:expr),+ $(,)? }
    ) => {
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $($enum_name::$variant => write!(f, $str),)+
                }
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = $crate::error::FolioError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok($enum_name::$variant),)+
                    _ => Err($error_variant(s.to_string())),
                }
            }
        }
    };
}
