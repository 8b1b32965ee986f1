//! Helper macro for declaring port error enums.
//!
//! `define_port_error!` derives `thiserror::Error` and emits one snake_case
//! constructor per variant. String-like fields accept anything `Into` the
//! field type, so adapters can write `RepoError::query(err.to_string())` or
//! `RepoError::not_found(id)`.

macro_rules! define_port_error {
    (@ctor $name:ident $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Build [`", stringify!($name), "::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $name:ident $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $name $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $name:ident $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            #[doc = concat!("Build [`", stringify!($name), "::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $name:ident $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $name
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
        #[allow(missing_docs, reason = "variant fields are described by the error message")]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $name $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Constructor coverage for generated port errors.

    define_port_error! {
        pub enum SamplePortError {
            Offline => "store offline",
            Query { message: String } => "query failed: {message}",
            Missing { id: i32 } => "row {id} not found",
            Stale { expected: u32, actual: u32 } => "expected v{expected}, found v{actual}",
        }
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(SamplePortError::offline(), SamplePortError::Offline);
    }

    #[test]
    fn string_fields_accept_str() {
        let err = SamplePortError::query("timeout");
        assert_eq!(err.to_string(), "query failed: timeout");
    }

    #[test]
    fn numeric_fields_keep_their_type() {
        assert_eq!(SamplePortError::missing(7).to_string(), "row 7 not found");
        assert_eq!(
            SamplePortError::stale(2_u32, 3_u32).to_string(),
            "expected v2, found v3"
        );
    }
}
