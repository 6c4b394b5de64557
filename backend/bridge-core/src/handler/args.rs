//! Positional argument decoding for dispatch tables.

use crate::error::dispatch::DispatchError;

use common::ErrorLocation;

use std::panic::Location;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decodes the arguments following the method name into a method's parameter list.
///
/// Implemented for tuples of up to six `DeserializeOwned` types and for [`RestArgs`].
/// Missing trailing arguments decode from `null`, so `Option<T>` parameters are optional.
/// Surplus arguments are rejected.
pub trait FromArgs: Sized {
    fn from_args(args: &[Value]) -> Result<Self, DispatchError>;
}

/// Takes every argument verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestArgs(pub Vec<Value>);

impl RestArgs {
    pub fn into_inner(self) -> Vec<Value> {
        self.0
    }

    /// Splits off the leading argument, if any.
    pub fn split_first(&self) -> Option<(&Value, &[Value])> {
        self.0.split_first()
    }
}

impl FromArgs for RestArgs {
    fn from_args(args: &[Value]) -> Result<Self, DispatchError> {
        Ok(RestArgs(args.to_vec()))
    }
}

impl FromArgs for () {
    fn from_args(args: &[Value]) -> Result<Self, DispatchError> {
        check_arity(args, 0)
    }
}

#[track_caller]
fn check_arity(args: &[Value], arity: usize) -> Result<(), DispatchError> {
    if args.len() > arity {
        return Err(DispatchError::InvalidArguments {
            message: format!("expected at most {arity} argument(s), got {}", args.len()),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    Ok(())
}

#[track_caller]
fn decode<T: DeserializeOwned>(args: &[Value], index: usize) -> Result<T, DispatchError> {
    let value = args.get(index).unwrap_or(&Value::Null);
    T::deserialize(value).map_err(|e| DispatchError::InvalidArguments {
        message: format!("argument {index}: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })
}

macro_rules! impl_from_args_for_tuple {
    ($arity:literal => $($index:tt : $param:ident),+) => {
        impl<$($param),+> FromArgs for ($($param,)+)
        where
            $($param: DeserializeOwned,)+
        {
            fn from_args(args: &[Value]) -> Result<Self, DispatchError> {
                check_arity(args, $arity)?;
                Ok(($(decode::<$param>(args, $index)?,)+))
            }
        }
    };
}

impl_from_args_for_tuple!(1 => 0: A);
impl_from_args_for_tuple!(2 => 0: A, 1: B);
impl_from_args_for_tuple!(3 => 0: A, 1: B, 2: C);
impl_from_args_for_tuple!(4 => 0: A, 1: B, 2: C, 3: D);
impl_from_args_for_tuple!(5 => 0: A, 1: B, 2: C, 3: D, 4: E);
impl_from_args_for_tuple!(6 => 0: A, 1: B, 2: C, 3: D, 4: E, 5: F);
