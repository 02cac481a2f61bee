//! `define_port_error!`: declares a port error enum plus one snake_case
//! constructor per variant (`Missing` gets `missing()`, `Query { message }`
//! gets `query(message)` accepting anything `Into<String>`).

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
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
                $variant $( { $($field : $ty),* } )?,
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
    //! Regression coverage for this module.
    define_port_error! {
        pub enum SamplePortError {
            Unavailable => "store unavailable",
            Rejected { reason: String } => "rejected: {reason}",
            Throttled { reason: String, retry_after: u64 } =>
                "throttled ({retry_after}s): {reason}",
        }
    }

    #[test]
    fn unit_variants_get_snake_case_constructors() {
        assert_eq!(SamplePortError::unavailable(), SamplePortError::Unavailable);
        assert_eq!(SamplePortError::unavailable().to_string(), "store unavailable");
    }

    #[test]
    fn string_fields_accept_borrowed_input() {
        let err = SamplePortError::rejected("duplicate email");
        assert_eq!(err.to_string(), "rejected: duplicate email");
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let err = SamplePortError::throttled("slow down", 30_u64);
        assert_eq!(err.to_string(), "throttled (30s): slow down");
    }
}
