//! Construction de requêtes SOAP

use super::values::XsdType;
use xmltree::{Element, XMLNode};

/// Namespaces fixes de l'enveloppe (non configurables).
pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const SOAP_ENCODING_NS: &str = "http://schemas.xmlsoap.org/soap/encoding/";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema";
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const NS_NS: &str = "http://xml.apache.org/xml-soap";

/// Préfixe du jeton de session dans l'en-tête `Cookie`.
pub const SESSION_TOKEN_PREFIX: &str = "__sessiontoken=";

/// Contenu d'un paramètre de requête : texte encodé ou fragment XML importé.
#[derive(Debug, Clone)]
pub enum ParamContent {
    Text(String),
    /// `None` produit un élément typé sans enfant
    Node(Option<Element>),
}

/// Paramètre de requête (nom, type XSD, contenu encodé). Immuable une fois
/// ajouté à la liste du call.
#[derive(Debug, Clone)]
pub struct SoapParam {
    pub name: String,
    pub xsd_type: XsdType,
    pub content: ParamContent,
}

impl SoapParam {
    pub fn text(name: &str, xsd_type: XsdType, encoded: String) -> Self {
        Self {
            name: name.to_string(),
            xsd_type,
            content: ParamContent::Text(encoded),
        }
    }

    pub fn node(name: &str, xsd_type: XsdType, node: Option<Element>) -> Self {
        Self {
            name: name.to_string(),
            xsd_type,
            content: ParamContent::Node(node),
        }
    }
}

fn text_element(name: &str, text: &str) -> Element {
    let mut elem = Element::new(name);
    if !text.is_empty() {
        elem.children.push(XMLNode::Text(text.to_string()));
    }
    elem
}

fn param_element(param: &SoapParam) -> Element {
    let mut elem = Element::new(&param.name);
    elem.attributes.insert(
        "xsi:type".to_string(),
        param.xsd_type.write_tag().to_string(),
    );
    match &param.content {
        ParamContent::Text(text) => {
            if !text.is_empty() {
                elem.children.push(XMLNode::Text(text.clone()));
            }
        }
        ParamContent::Node(Some(child)) => {
            elem.children.push(XMLNode::Element(child.clone()));
        }
        ParamContent::Node(None) => {}
    }
    elem
}

/// Construit l'enveloppe SOAP d'une requête.
///
/// # Arguments
///
/// * `urn` - namespace de la méthode (ex: "xtk:session")
/// * `method_name` - nom de la méthode (ex: "Logon")
/// * `session_token` - jeton de session (chaîne vide si absent)
/// * `security_token` - jeton de sécurité (chaîne vide si absent)
/// * `params` - paramètres typés, dans l'ordre d'ajout
///
/// # Returns
///
/// XML SOAP formaté en String
pub fn build_soap_request(
    urn: &str,
    method_name: &str,
    session_token: &str,
    security_token: &str,
    params: &[SoapParam],
) -> Result<String, xmltree::Error> {
    // Header : cookie de session et jeton de sécurité
    let mut header = Element::new("SOAP-ENV:Header");
    header.children.push(XMLNode::Element(text_element(
        "Cookie",
        &format!("{}{}", SESSION_TOKEN_PREFIX, session_token),
    )));
    header.children.push(XMLNode::Element(text_element(
        "X-Security-Token",
        security_token,
    )));

    // Méthode : un seul élément, namespacé sur l'urn du call
    let mut method = Element::new(&format!("m:{}", method_name));
    method
        .attributes
        .insert("xmlns:m".to_string(), format!("urn:{}", urn));
    method.attributes.insert(
        "SOAP-ENV:encodingStyle".to_string(),
        SOAP_ENCODING_NS.to_string(),
    );
    for param in params {
        method.children.push(XMLNode::Element(param_element(param)));
    }

    let mut body = Element::new("SOAP-ENV:Body");
    body.children.push(XMLNode::Element(method));

    let mut envelope = Element::new("SOAP-ENV:Envelope");
    envelope
        .attributes
        .insert("xmlns:xsd".to_string(), XSD_NS.to_string());
    envelope
        .attributes
        .insert("xmlns:xsi".to_string(), XSI_NS.to_string());
    envelope
        .attributes
        .insert("xmlns:SOAP-ENV".to_string(), SOAP_ENV_NS.to_string());
    envelope
        .attributes
        .insert("xmlns:ns".to_string(), NS_NS.to_string());
    envelope.children.push(XMLNode::Element(header));
    envelope.children.push(XMLNode::Element(body));

    let mut buf = Vec::new();
    let config = xmltree::EmitterConfig::new()
        .write_document_declaration(true)
        .perform_indent(true)
        .indent_string("  ");
    envelope.write_with_config(&mut buf, config)?;

    Ok(String::from_utf8(buf).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soap::values::{SoapValue, encode_boolean, encode_string};

    #[test]
    fn test_build_request_envelope() {
        let params = vec![SoapParam::text(
            "sessiontoken",
            XsdType::String,
            "$session$".to_string(),
        )];
        let xml = build_soap_request("xtk:session", "Empty", "$session$", "$security$", &params)
            .unwrap();

        assert!(xml.contains("<SOAP-ENV:Envelope"));
        assert!(xml.contains(r#"xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/""#));
        assert!(xml.contains(r#"xmlns:xsd="http://www.w3.org/2001/XMLSchema""#));
        assert!(xml.contains(r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#));
        assert!(xml.contains(r#"xmlns:ns="http://xml.apache.org/xml-soap""#));
        assert!(xml.contains("<Cookie>__sessiontoken=$session$</Cookie>"));
        assert!(xml.contains("<X-Security-Token>$security$</X-Security-Token>"));
        assert!(xml.contains(r#"xmlns:m="urn:xtk:session""#));
        assert!(xml.contains(
            r#"SOAP-ENV:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/""#
        ));
        assert!(xml.contains(r#"<sessiontoken xsi:type="xsd:string">$session$</sessiontoken>"#));
    }

    #[test]
    fn test_build_request_empty_tokens() {
        let params = vec![SoapParam::text(
            "sessiontoken",
            XsdType::String,
            String::new(),
        )];
        let xml = build_soap_request("xtk:session", "Empty", "", "", &params).unwrap();

        assert!(xml.contains("__sessiontoken="));
        // Élément X-Security-Token présent même sans jeton
        assert!(xml.contains("<X-Security-Token"));
    }

    #[test]
    fn test_build_request_ordered_params() {
        let params = vec![
            SoapParam::text("p0", XsdType::Boolean, encode_boolean(&SoapValue::Null)),
            SoapParam::text(
                "p1",
                XsdType::String,
                encode_string(&SoapValue::Text("Hello".to_string())),
            ),
        ];
        let xml = build_soap_request("xtk:session", "Boolean", "s", "t", &params).unwrap();

        assert!(xml.contains(r#"<p0 xsi:type="xsd:boolean">false</p0>"#));
        assert!(xml.contains(r#"<p1 xsi:type="xsd:string">Hello</p1>"#));
        // L'ordre d'ajout est préservé
        let p0 = xml.find("<p0").unwrap();
        let p1 = xml.find("<p1").unwrap();
        assert!(p0 < p1);
    }

    #[test]
    fn test_build_request_element_param() {
        let mut root = Element::new("root");
        root.attributes
            .insert("att".to_string(), "Hello".to_string());
        root.children.push(XMLNode::Element(Element::new("child")));

        let params = vec![SoapParam::node("p", XsdType::Element, Some(root))];
        let xml = build_soap_request("xtk:session", "Element", "s", "t", &params).unwrap();

        assert!(xml.contains(r#"<p xsi:type="ns:Element">"#));
        assert!(xml.contains(r#"<root att="Hello">"#));
        assert!(xml.contains("<child"));
    }

    #[test]
    fn test_build_request_null_element_param() {
        let params = vec![
            SoapParam::node("p", XsdType::Element, None),
            SoapParam::node("q", XsdType::Document, None),
        ];
        let xml = build_soap_request("xtk:session", "Element", "s", "t", &params).unwrap();

        // Élément typé sans contenu
        assert!(xml.contains(r#"<p xsi:type="ns:Element" />"#));
        assert!(xml.contains(r#"<q xsi:type="ns:Document" />"#));
    }
}
