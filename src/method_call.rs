//! Typed SOAP method calls.
//!
//! A [`SoapMethodCall`] owns one request: the caller writes typed
//! parameters in order, executes the call once through an injected
//! transport, then reads the typed return values back in order.

use crate::errors::SoapError;
use crate::soap::values::{self, SoapValue, XsdType};
use crate::soap::{
    SESSION_TOKEN_PREFIX, SoapParam, SoapResponseReader, build_soap_request, parse_soap_response,
};
use crate::transport::{HttpRequest, SoapTransport};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;
use xmltree::Element;

/// One SOAP method call: build → execute → read.
///
/// Parameters are positional on both sides: they are marshaled in the order
/// the `write_*` methods are called, and the response values are consumed
/// in document order by the `get_next_*` methods. A call is single-use and
/// not meant to be shared across concurrent executions.
pub struct SoapMethodCall {
    urn: String,
    method_name: String,
    session_token: String,
    security_token: String,
    params: Vec<SoapParam>,
    reader: Option<SoapResponseReader>,
}

impl SoapMethodCall {
    /// Creates a call for `urn#method_name` with optional auth tokens.
    ///
    /// The session token is also marshaled as the first `sessiontoken`
    /// string parameter of the method element, which the protocol expects.
    pub fn new(
        urn: &str,
        method_name: &str,
        session_token: Option<&str>,
        security_token: Option<&str>,
    ) -> Self {
        let session_token = session_token.unwrap_or("").to_string();
        let params = vec![SoapParam::text(
            "sessiontoken",
            XsdType::String,
            session_token.clone(),
        )];
        Self {
            urn: urn.to_string(),
            method_name: method_name.to_string(),
            session_token,
            security_token: security_token.unwrap_or("").to_string(),
            params,
            reader: None,
        }
    }

    /// Creates a detached element, for callers building Element-typed
    /// payloads programmatically.
    pub fn create_element(&self, tag_name: &str) -> Element {
        Element::new(tag_name)
    }

    fn push_text(&mut self, name: &str, xsd_type: XsdType, encoded: String) {
        self.params.push(SoapParam::text(name, xsd_type, encoded));
    }

    pub fn write_boolean(&mut self, name: &str, value: impl Into<SoapValue>) {
        self.push_text(name, XsdType::Boolean, values::encode_boolean(&value.into()));
    }

    pub fn write_byte(&mut self, name: &str, value: impl Into<SoapValue>) {
        self.push_text(name, XsdType::Byte, values::encode_byte(&value.into()));
    }

    pub fn write_short(&mut self, name: &str, value: impl Into<SoapValue>) {
        self.push_text(name, XsdType::Short, values::encode_short(&value.into()));
    }

    /// "Long" parameters are 32-bit on the wire: rounded, never clamped,
    /// tagged `xsd:int`.
    pub fn write_long(&mut self, name: &str, value: impl Into<SoapValue>) {
        self.push_text(name, XsdType::Int, values::encode_int(&value.into()));
    }

    pub fn write_float(&mut self, name: &str, value: impl Into<SoapValue>) {
        self.push_text(name, XsdType::Float, values::encode_float(&value.into()));
    }

    pub fn write_double(&mut self, name: &str, value: impl Into<SoapValue>) {
        self.push_text(name, XsdType::Double, values::encode_float(&value.into()));
    }

    pub fn write_string(&mut self, name: &str, value: impl Into<SoapValue>) {
        self.push_text(name, XsdType::String, values::encode_string(&value.into()));
    }

    pub fn write_timestamp(&mut self, name: &str, value: impl Into<SoapValue>) {
        self.push_text(
            name,
            XsdType::DateTime,
            values::encode_timestamp(&value.into()),
        );
    }

    /// The time-of-day component is truncated to UTC midnight.
    pub fn write_date(&mut self, name: &str, value: impl Into<SoapValue>) {
        self.push_text(name, XsdType::Date, values::encode_date(&value.into()));
    }

    /// `None` marshals as a typed element with no child content.
    pub fn write_element(&mut self, name: &str, element: Option<Element>) {
        self.params
            .push(SoapParam::node(name, XsdType::Element, element));
    }

    pub fn write_document(&mut self, name: &str, document: Option<Element>) {
        self.params
            .push(SoapParam::node(name, XsdType::Document, document));
    }

    /// Builds the outbound HTTP request description for this call.
    pub fn build_http_request(&self, url: &str) -> Result<HttpRequest, SoapError> {
        let body = build_soap_request(
            &self.urn,
            &self.method_name,
            &self.session_token,
            &self.security_token,
            &self.params,
        )?;

        let mut headers = HashMap::new();
        headers.insert("Content-type".to_string(), "application/soap+xml".to_string());
        headers.insert(
            "SoapAction".to_string(),
            format!("{}#{}", self.urn, self.method_name),
        );
        headers.insert("X-Security-Token".to_string(), self.security_token.clone());
        headers.insert(
            "Cookie".to_string(),
            format!("{}{}", SESSION_TOKEN_PREFIX, self.session_token),
        );

        Ok(HttpRequest {
            url: url.to_string(),
            method: "POST".to_string(),
            headers,
            body,
        })
    }

    /// Executes the call: serializes the envelope, sends it through the
    /// transport, classifies the reply and primes the response cursor.
    ///
    /// Fails with a transport, parse, structural or [`SoapFault`] error;
    /// on success the `get_next_*` methods become available.
    ///
    /// [`SoapFault`]: crate::soap::SoapFault
    pub async fn execute(
        &mut self,
        url: &str,
        transport: &dyn SoapTransport,
    ) -> Result<(), SoapError> {
        let request = self.build_http_request(url)?;
        debug!(method = %self.method_name, urn = %self.urn, url, "executing SOAP call");

        let response_text = transport
            .send(&request)
            .await
            .map_err(SoapError::Transport)?;

        let args = parse_soap_response(&response_text, &self.method_name)?;
        debug!(method = %self.method_name, args = args.len(), "SOAP call succeeded");
        self.reader = Some(SoapResponseReader::new(args));
        Ok(())
    }

    fn reader_mut(&mut self) -> Result<&mut SoapResponseReader, SoapError> {
        self.reader.as_mut().ok_or(SoapError::NotExecuted)
    }

    /// True once every response argument has been consumed (or before any
    /// response is available). Does not consume anything.
    pub fn check_no_more_args(&self) -> bool {
        self.reader
            .as_ref()
            .map(SoapResponseReader::check_no_more_args)
            .unwrap_or(true)
    }

    pub fn get_next_boolean(&mut self) -> Result<bool, SoapError> {
        self.reader_mut()?.next_boolean()
    }

    pub fn get_next_byte(&mut self) -> Result<i8, SoapError> {
        self.reader_mut()?.next_byte()
    }

    pub fn get_next_short(&mut self) -> Result<i16, SoapError> {
        self.reader_mut()?.next_short()
    }

    pub fn get_next_long(&mut self) -> Result<i32, SoapError> {
        self.reader_mut()?.next_long()
    }

    pub fn get_next_float(&mut self) -> Result<f32, SoapError> {
        self.reader_mut()?.next_float()
    }

    pub fn get_next_double(&mut self) -> Result<f64, SoapError> {
        self.reader_mut()?.next_double()
    }

    pub fn get_next_string(&mut self) -> Result<String, SoapError> {
        self.reader_mut()?.next_string()
    }

    pub fn get_next_date_time(&mut self) -> Result<DateTime<Utc>, SoapError> {
        self.reader_mut()?.next_date_time()
    }

    pub fn get_next_date(&mut self) -> Result<DateTime<Utc>, SoapError> {
        self.reader_mut()?.next_date()
    }

    pub fn get_next_element(&mut self) -> Result<Option<Element>, SoapError> {
        self.reader_mut()?.next_element()
    }

    pub fn get_next_document(&mut self) -> Result<Option<Element>, SoapError> {
        self.reader_mut()?.next_document()
    }
}
