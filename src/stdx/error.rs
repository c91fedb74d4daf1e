use thiserror::Error;

macro_rules! assumption {
    ($msg:literal $(, $args:expr)* ) => {{
        return Err($crate::stdx::error::Assumption::from(format!($msg $(, $args)*)).into());
    }};
    ($cond:expr, $msg:literal $(, $args:expr)* ) => {{
        if !$cond {
            return Err($crate::stdx::error::Assumption::from(format!("`{}`, {}", stringify!($cond), format!($msg $(, $args)*))).into());
        }
    }};
}

pub(crate) use assumption;

/// Represents an assumption about the tweet site that did not hold.
///
/// If this is returned, either the site changed underneath the library or the
/// library has a bug. Neither is actionable by the library user.
///
/// # Use
///
/// Only used when interpreting what the site hands back (JSON bodies, rendered
/// pages), as opposed to input data passed to the library.
#[derive(Debug, Error)]
#[error("assumption violated: {0}")]
pub struct Assumption(String);

impl From<String> for Assumption {
    #[inline]
    fn from(msg: String) -> Self {
        Self(msg)
    }
}

pub trait Assume<T> {
    type Output;

    fn assumption(self, msg: impl Into<String>) -> Self::Output;
}

impl<T> Assume<T> for Option<T> {
    type Output = Result<T, Assumption>;

    #[inline]
    fn assumption(self, msg: impl Into<String>) -> Self::Output {
        self.ok_or_else(|| Assumption(msg.into()))
    }
}

impl<T, E> Assume<T> for Result<T, E> {
    type Output = Result<T, Assumption>;

    #[inline]
    fn assumption(self, msg: impl Into<String>) -> Self::Output {
        self.map_err(|_err: _| Assumption(msg.into()))
    }
}
