//! Parsing des réponses SOAP

use super::fault::SoapFault;
use crate::errors::SoapError;
use xmltree::{Element, XMLNode};

/// Cherche le premier élément enfant dont le nom local se termine par
/// `suffix` (les noms sont dépouillés de leur préfixe au parsing).
fn find_child_with_suffix<'a>(parent: &'a Element, suffix: &str) -> Option<&'a Element> {
    parent.children.iter().find_map(|node| match node {
        XMLNode::Element(elem) if elem.name.ends_with(suffix) => Some(elem),
        _ => None,
    })
}

/// Parse une réponse SOAP et renvoie les paramètres de réponse ordonnés.
///
/// 1. Le texte doit être du XML bien formé (chaîne vide comprise : erreur).
/// 2. L'enveloppe doit contenir un Body.
/// 3. Un `Fault` dans le Body rejette le call avec un [`SoapFault`].
/// 4. Sinon le Body doit contenir `<methodName>Response` ; les éléments
///    frères parasites sont ignorés.
/// 5. Les enfants de l'élément réponse, dans l'ordre du document, forment
///    les paramètres de réponse.
pub fn parse_soap_response(xml: &str, method_name: &str) -> Result<Vec<Element>, SoapError> {
    let root = Element::parse(xml.as_bytes())?;

    let body = find_child_with_suffix(&root, "Body").ok_or(SoapError::MissingBody)?;

    if let Some(fault) = find_child_with_suffix(body, "Fault") {
        return Err(SoapError::Fault(SoapFault::from_element(fault)));
    }

    let response_name = format!("{}Response", method_name);
    let response = body
        .children
        .iter()
        .find_map(|node| match node {
            XMLNode::Element(elem) if elem.name == response_name => Some(elem),
            _ => None,
        })
        .ok_or_else(|| SoapError::MissingResponse(method_name.to_string()))?;

    Ok(response
        .children
        .iter()
        .filter_map(|node| match node {
            XMLNode::Element(elem) => Some(elem.clone()),
            _ => None,
        })
        .collect())
}
