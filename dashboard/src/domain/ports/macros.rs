//! Helper macro for declaring port error enums with snake-case constructors.
//!
//! Every variant becomes a `thiserror` variant with its own display message,
//! and gains a constructor named after the variant that accepts anything
//! convertible into each field type.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = "Construct the `" $variant "` variant."]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            #[doc = "Construct the `" $variant "` variant."]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( {
                    $(
                        #[doc = concat!("`", stringify!($field), "` detail for this failure.")]
                        $field : $ty
                    ),*
                } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Constructor and display coverage for generated port errors.
    define_port_error! {
        /// Example error used to exercise the macro.
        pub enum ProfileLookupError {
            /// Lookup rejected.
            Rejected { message: String } => "profile lookup rejected: {message}",
            /// Lookup retried too often.
            Throttled { attempts: u32 } => "profile lookup throttled after {attempts} attempts",
            /// No backing store.
            Offline => "profile store offline",
        }
    }

    #[test]
    fn string_fields_accept_borrowed_input() {
        let err = ProfileLookupError::rejected("no such row");
        assert_eq!(err.to_string(), "profile lookup rejected: no such row");
    }

    #[test]
    fn numeric_fields_keep_their_type() {
        let err = ProfileLookupError::throttled(3_u32);
        assert_eq!(err.to_string(), "profile lookup throttled after 3 attempts");
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(ProfileLookupError::offline(), ProfileLookupError::Offline);
    }
}
