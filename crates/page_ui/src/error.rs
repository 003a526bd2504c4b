use client_core::DispatchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("page has no `{0}` anchor")]
    MissingAnchor(&'static str),
    #[error("element `{0}` is not rendered")]
    MissingElement(&'static str),
    #[error("`{element}` has no option `{value}`")]
    UnknownOption {
        element: &'static str,
        value: String,
    },
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
