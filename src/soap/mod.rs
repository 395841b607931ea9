//! # Module SOAP - marshaling typé
//!
//! Ce module implémente le cœur SOAP du crate : encodage typé des
//! paramètres de requête, construction d'enveloppes, parsing des réponses
//! et lecture séquentielle des valeurs de retour.
//!
//! ## Fonctionnalités
//!
//! - ✅ Règles de coercion valeur ↔ texte par type XSD
//! - ✅ Construction d'enveloppes de requête (header d'authentification,
//!   méthode namespacée, paramètres ordonnés)
//! - ✅ Parsing d'enveloppes de réponse (Body, Fault, élément réponse)
//! - ✅ Curseur typé sur les paramètres de réponse
//! - ✅ Gestion des SOAP Faults
//!
//! ## Architecture
//!
//! - [`SoapValue`] / [`XsdType`] : valeurs d'entrée et table des types
//! - [`build_soap_request`] : enveloppe de requête sérialisée
//! - [`parse_soap_response`] : classification Fault / réponse
//! - [`SoapResponseReader`] : curseur de lecture ordonné
//! - [`SoapFault`] : erreur SOAP structurée

mod builder;
mod fault;
mod parser;
mod reader;
pub mod values;

pub use builder::{
    NS_NS, ParamContent, SESSION_TOKEN_PREFIX, SOAP_ENCODING_NS, SOAP_ENV_NS, SoapParam, XSD_NS,
    XSI_NS, build_soap_request,
};
pub use fault::SoapFault;
pub use parser::parse_soap_response;
pub use reader::SoapResponseReader;
pub use values::{SoapValue, XsdType};
