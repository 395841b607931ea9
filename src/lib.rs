//! Typed SOAP 1.1 method calls over a pluggable HTTP transport.
//!
//! The caller builds a [`SoapMethodCall`], writes typed parameters in
//! order, executes it once through a [`SoapTransport`] delegate, then reads
//! the typed return values back in the same order:
//!
//! ```ignore
//! use xtksoap::{HttpSoapTransport, SoapMethodCall};
//!
//! let mut call = SoapMethodCall::new("xtk:session", "GetOption", Some(session), Some(security));
//! call.write_string("name", "XtkDatabaseId");
//! call.execute(url, &HttpSoapTransport::new()).await?;
//! let value = call.get_next_string()?;
//! ```

pub mod errors;
pub mod method_call;
pub mod soap;
pub mod transport;

pub use crate::errors::SoapError;
pub use crate::method_call::SoapMethodCall;
pub use crate::soap::{SoapFault, SoapValue, XsdType};
pub use crate::transport::{HttpRequest, HttpSoapTransport, SoapTransport};
