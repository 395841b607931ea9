//! Lecture séquentielle des paramètres de réponse

use super::values::{self, XsdType};
use crate::errors::SoapError;
use chrono::{DateTime, Utc};
use xmltree::{Element, XMLNode};

/// Curseur ordonné sur les paramètres d'une réponse SOAP.
///
/// Chaque lecture typée vérifie le tag `xsi:type` du paramètre courant,
/// décode sa valeur puis avance d'une position. Une lecture qui échoue
/// (tag inattendu, texte indécodable, curseur épuisé) n'avance jamais le
/// curseur. Le nom des éléments est ignoré : seule la position compte.
#[derive(Debug)]
pub struct SoapResponseReader {
    params: Vec<Element>,
    pos: usize,
}

/// Tag de type d'un paramètre. Suivant la version de la bibliothèque XML,
/// la clé d'attribut conserve ou non son préfixe.
fn type_attribute(elem: &Element) -> &str {
    elem.attributes
        .get("type")
        .or_else(|| elem.attributes.get("xsi:type"))
        .map(|s| s.as_str())
        .unwrap_or("")
}

fn element_text(elem: &Element) -> String {
    elem.get_text().map(|t| t.into_owned()).unwrap_or_default()
}

fn first_child_element(elem: &Element) -> Option<Element> {
    elem.children.iter().find_map(|node| match node {
        XMLNode::Element(child) => Some(child.clone()),
        _ => None,
    })
}

impl SoapResponseReader {
    pub fn new(params: Vec<Element>) -> Self {
        Self { params, pos: 0 }
    }

    /// Vrai si tous les paramètres ont été consommés. Ne consomme rien.
    pub fn check_no_more_args(&self) -> bool {
        self.pos >= self.params.len()
    }

    /// Paramètre courant, après vérification des bornes et du tag de type.
    fn expect_current(&self, expected: XsdType) -> Result<&Element, SoapError> {
        let param = self.params.get(self.pos).ok_or(SoapError::NoMoreArgs {
            len: self.params.len(),
        })?;
        let actual = type_attribute(param);
        if actual != expected.read_tag() {
            return Err(SoapError::TypeMismatch {
                index: self.pos,
                expected: expected.read_tag(),
                actual: actual.to_string(),
            });
        }
        Ok(param)
    }

    fn decode_error(&self, expected: XsdType, text: String) -> SoapError {
        SoapError::Decode {
            index: self.pos,
            expected: expected.read_tag(),
            text,
        }
    }

    pub fn next_boolean(&mut self) -> Result<bool, SoapError> {
        let text = element_text(self.expect_current(XsdType::Boolean)?);
        self.pos += 1;
        Ok(values::decode_boolean(&text))
    }

    pub fn next_byte(&mut self) -> Result<i8, SoapError> {
        let text = element_text(self.expect_current(XsdType::Byte)?);
        let value = values::decode_byte(&text)
            .ok_or_else(|| self.decode_error(XsdType::Byte, text))?;
        self.pos += 1;
        Ok(value)
    }

    pub fn next_short(&mut self) -> Result<i16, SoapError> {
        let text = element_text(self.expect_current(XsdType::Short)?);
        let value = values::decode_short(&text)
            .ok_or_else(|| self.decode_error(XsdType::Short, text))?;
        self.pos += 1;
        Ok(value)
    }

    pub fn next_long(&mut self) -> Result<i32, SoapError> {
        let text = element_text(self.expect_current(XsdType::Int)?);
        let value = values::decode_int(&text)
            .ok_or_else(|| self.decode_error(XsdType::Int, text))?;
        self.pos += 1;
        Ok(value)
    }

    pub fn next_float(&mut self) -> Result<f32, SoapError> {
        let text = element_text(self.expect_current(XsdType::Float)?);
        let value = values::decode_float(&text)
            .ok_or_else(|| self.decode_error(XsdType::Float, text))?;
        self.pos += 1;
        Ok(value)
    }

    pub fn next_double(&mut self) -> Result<f64, SoapError> {
        let text = element_text(self.expect_current(XsdType::Double)?);
        let value = values::decode_double(&text)
            .ok_or_else(|| self.decode_error(XsdType::Double, text))?;
        self.pos += 1;
        Ok(value)
    }

    pub fn next_string(&mut self) -> Result<String, SoapError> {
        let text = element_text(self.expect_current(XsdType::String)?);
        self.pos += 1;
        Ok(text)
    }

    pub fn next_date_time(&mut self) -> Result<DateTime<Utc>, SoapError> {
        let text = element_text(self.expect_current(XsdType::DateTime)?);
        let value = values::decode_instant(&text)
            .ok_or_else(|| self.decode_error(XsdType::DateTime, text))?;
        self.pos += 1;
        Ok(value)
    }

    /// L'instant renvoyé est tronqué à la date côté serveur ; l'appelant
    /// sait qu'il ne porte pas d'heure significative.
    pub fn next_date(&mut self) -> Result<DateTime<Utc>, SoapError> {
        let text = element_text(self.expect_current(XsdType::Date)?);
        let value = values::decode_instant(&text)
            .ok_or_else(|| self.decode_error(XsdType::Date, text))?;
        self.pos += 1;
        Ok(value)
    }

    /// `None` si le paramètre ne contient aucun élément enfant.
    pub fn next_element(&mut self) -> Result<Option<Element>, SoapError> {
        let child = first_child_element(self.expect_current(XsdType::Element)?);
        self.pos += 1;
        Ok(child)
    }

    pub fn next_document(&mut self) -> Result<Option<Element>, SoapError> {
        let child = first_child_element(self.expect_current(XsdType::Document)?);
        self.pos += 1;
        Ok(child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(xsi_type: &str, text: &str) -> Element {
        let mut elem = Element::new("p");
        elem.attributes
            .insert("type".to_string(), xsi_type.to_string());
        if !text.is_empty() {
            elem.children.push(XMLNode::Text(text.to_string()));
        }
        elem
    }

    #[test]
    fn test_read_scalars_in_order() {
        let mut reader = SoapResponseReader::new(vec![
            param("xsd:string", "Hello"),
            param("xsd:boolean", "true"),
            param("xsd:byte", "7"),
            param("xsd:short", "700"),
            param("xsd:int", "200000"),
            param("xsd:float", "3.14"),
            param("xsd:double", "6.28"),
            param("xsd:dateTime", "2020-12-31T12:34:56.789Z"),
            param("xsd:date", "2020-12-31T00:00:00.000Z"),
        ]);

        assert_eq!(reader.next_string().unwrap(), "Hello");
        assert!(reader.next_boolean().unwrap());
        assert_eq!(reader.next_byte().unwrap(), 7);
        assert_eq!(reader.next_short().unwrap(), 700);
        assert_eq!(reader.next_long().unwrap(), 200000);
        assert_eq!(reader.next_float().unwrap(), 3.14);
        assert_eq!(reader.next_double().unwrap(), 6.28);
        assert_eq!(
            values::format_instant(reader.next_date_time().unwrap()),
            "2020-12-31T12:34:56.789Z"
        );
        assert!(!reader.check_no_more_args());
        assert_eq!(
            values::format_instant(reader.next_date().unwrap()),
            "2020-12-31T00:00:00.000Z"
        );
        assert!(reader.check_no_more_args());
    }

    #[test]
    fn test_type_mismatch_does_not_advance() {
        let mut reader = SoapResponseReader::new(vec![param("xsd:string", "Hello")]);

        match reader.next_byte() {
            Err(SoapError::TypeMismatch {
                index,
                expected,
                actual,
            }) => {
                assert_eq!(index, 0);
                assert_eq!(expected, "xsd:byte");
                assert_eq!(actual, "xsd:string");
            }
            other => panic!("expected a type mismatch, got {:?}", other),
        }

        // Le curseur n'a pas bougé : une autre lecture peut réussir
        assert!(!reader.check_no_more_args());
        assert_eq!(reader.next_string().unwrap(), "Hello");
        assert!(reader.check_no_more_args());
    }

    #[test]
    fn test_read_past_end() {
        let mut reader = SoapResponseReader::new(vec![]);
        assert!(reader.check_no_more_args());
        assert!(matches!(
            reader.next_string(),
            Err(SoapError::NoMoreArgs { .. })
        ));
        assert!(matches!(
            reader.next_boolean(),
            Err(SoapError::NoMoreArgs { .. })
        ));
        assert!(matches!(
            reader.next_element(),
            Err(SoapError::NoMoreArgs { .. })
        ));
        assert!(matches!(
            reader.next_document(),
            Err(SoapError::NoMoreArgs { .. })
        ));
    }

    #[test]
    fn test_decode_failure_does_not_advance() {
        let mut reader = SoapResponseReader::new(vec![param("xsd:byte", "not a number")]);
        assert!(matches!(reader.next_byte(), Err(SoapError::Decode { .. })));
        assert!(!reader.check_no_more_args());
    }

    #[test]
    fn test_read_element() {
        let mut p = param("ns:Element", "");
        let mut root = Element::new("root");
        root.attributes
            .insert("att".to_string(), "Hello".to_string());
        p.children.push(XMLNode::Element(root));

        let mut reader = SoapResponseReader::new(vec![p, param("ns:Document", "")]);
        let elem = reader.next_element().unwrap().unwrap();
        assert_eq!(elem.name, "root");
        assert_eq!(elem.attributes.get("att").map(String::as_str), Some("Hello"));

        // Paramètre document sans enfant : None
        assert!(reader.next_document().unwrap().is_none());
        assert!(reader.check_no_more_args());
    }

    #[test]
    fn test_datetime_tag_asymmetry() {
        // Les réponses portent "xsd:dateTime" ; "xsd:datetime" est refusé
        let mut reader = SoapResponseReader::new(vec![param("xsd:datetime", "2020-12-31T12:34:56.789Z")]);
        assert!(matches!(
            reader.next_date_time(),
            Err(SoapError::TypeMismatch { .. })
        ));
    }
}
