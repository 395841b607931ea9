//! SOAP Faults

use thiserror::Error;
use xmltree::Element;

/// Erreur SOAP (Fault), extraite du corps d'une réponse.
///
/// Mutuellement exclusif avec une réponse normale : si le corps contient un
/// `SOAP-ENV:Fault`, l'exécution du call est rejetée avec cette valeur.
#[derive(Debug, Clone, Error)]
#[error("SOAP fault {fault_code}: {fault_string}")]
pub struct SoapFault {
    /// Code d'erreur (ex: "-53", "SOAP-ENV:Client")
    pub fault_code: String,

    /// Description de l'erreur
    pub fault_string: String,

    /// Détails optionnels
    pub detail: String,
}

impl SoapFault {
    pub fn new(fault_code: String, fault_string: String, detail: String) -> Self {
        Self {
            fault_code,
            fault_string,
            detail,
        }
    }

    /// Extrait un fault d'un élément `Fault` du corps SOAP.
    pub fn from_element(fault: &Element) -> Self {
        Self {
            fault_code: child_text(fault, "faultcode"),
            fault_string: child_text(fault, "faultstring"),
            detail: child_text(fault, "detail"),
        }
    }
}

fn child_text(parent: &Element, name: &str) -> String {
    parent
        .get_child(name)
        .and_then(|e| e.get_text())
        .map(|t| t.trim().to_string())
        .unwrap_or_default()
}
