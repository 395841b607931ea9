use crate::soap::SoapFault;
use thiserror::Error;

/// Errors raised while executing a SOAP call or reading its response.
///
/// All of these are local, synchronous failures and are never retried by
/// this crate; retry policy belongs to the caller. Transport failures are
/// carried through unchanged from the delegate.
#[derive(Error, Debug)]
pub enum SoapError {
    /// Error from the transport delegate, propagated as-is
    #[error("transport error: {0}")]
    Transport(anyhow::Error),

    /// The response text is not well-formed XML (an empty string included)
    #[error("XML parse error: {0}")]
    XmlParse(#[from] xmltree::ParseError),

    #[error("failed to serialize SOAP envelope: {0}")]
    XmlWrite(#[from] xmltree::Error),

    /// The response envelope has no Body element
    #[error("Missing SOAP Body in response")]
    MissingBody,

    /// The Body has no `<method>Response` element
    #[error("Missing {0}Response element in SOAP Body")]
    MissingResponse(String),

    /// The server answered with a SOAP Fault instead of a response
    #[error(transparent)]
    Fault(#[from] SoapFault),

    /// A read expected a different `xsi:type` tag; the cursor did not move
    #[error("response argument {index} has type '{actual}', expected '{expected}'")]
    TypeMismatch {
        index: usize,
        expected: &'static str,
        actual: String,
    },

    /// The argument text could not be decoded; the cursor did not move
    #[error("invalid {expected} value {text:?} for response argument {index}")]
    Decode {
        index: usize,
        expected: &'static str,
        text: String,
    },

    /// A read was attempted past the last response argument
    #[error("no more arguments to read (all {len} consumed)")]
    NoMoreArgs { len: usize },

    /// A read was attempted before the call was executed
    #[error("the call has not been executed yet")]
    NotExecuted,
}
