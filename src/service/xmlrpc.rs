//! XML-RPC wire format: method-call encoding and response decoding.

use super::Reply;
use crate::error::{ServiceError, ServiceFault};
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::BTreeMap;
use std::fmt::Write;

/// An XML-RPC value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Boolean(bool),
    Int(i64),
    Double(f64),
    String(String),
    DateTime(String),
    Base64(String),
    Array(Vec<Value>),
    Struct(BTreeMap<String, Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Booleans, plus the integers 0 and 1 some servers send as flags.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            Value::Int(0) => Some(false),
            Value::Int(1) => Some(true),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Boolean(_) => "boolean",
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::DateTime(_) => "dateTime",
            Value::Base64(_) => "base64",
            Value::Array(_) => "array",
            Value::Struct(_) => "struct",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Option<&str>> for Value {
    fn from(s: Option<&str>) -> Self {
        s.map(Value::from).unwrap_or(Value::Nil)
    }
}

/// Encode a `<methodCall>` document.
pub fn encode_call(method: &str, params: &[Value]) -> String {
    let mut xml = String::from(r#"<?xml version="1.0"?>"#);
    xml.push_str("<methodCall><methodName>");
    xml.push_str(&escape(method));
    xml.push_str("</methodName><params>");
    for param in params {
        xml.push_str("<param>");
        write_value(&mut xml, param);
        xml.push_str("</param>");
    }
    xml.push_str("</params></methodCall>");
    xml
}

fn write_value(xml: &mut String, value: &Value) {
    xml.push_str("<value>");
    match value {
        Value::Nil => xml.push_str("<nil/>"),
        Value::Boolean(b) => {
            let _ = write!(xml, "<boolean>{}</boolean>", if *b { 1 } else { 0 });
        }
        Value::Int(i) => {
            let _ = write!(xml, "<int>{}</int>", i);
        }
        Value::Double(d) => {
            let _ = write!(xml, "<double>{}</double>", d);
        }
        Value::String(s) => {
            let _ = write!(xml, "<string>{}</string>", escape(s.as_str()));
        }
        Value::DateTime(s) => {
            let _ = write!(xml, "<dateTime.iso8601>{}</dateTime.iso8601>", escape(s.as_str()));
        }
        Value::Base64(s) => {
            let _ = write!(xml, "<base64>{}</base64>", escape(s.as_str()));
        }
        Value::Array(items) => {
            xml.push_str("<array><data>");
            for item in items {
                write_value(xml, item);
            }
            xml.push_str("</data></array>");
        }
        Value::Struct(members) => {
            xml.push_str("<struct>");
            for (name, member) in members {
                let _ = write!(xml, "<member><name>{}</name>", escape(name.as_str()));
                write_value(xml, member);
                xml.push_str("</member>");
            }
            xml.push_str("</struct>");
        }
    }
    xml.push_str("</value>");
}

/// Minimal element tree built from the event stream.
#[derive(Debug, Default)]
struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn named(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    fn require(&self, name: &str) -> Result<&Element, ServiceError> {
        self.child(name).ok_or_else(|| {
            ServiceError::Decode(format!("<{}> is missing <{}>", self.name, name))
        })
    }
}

fn decode_err(e: impl std::fmt::Display) -> ServiceError {
    ServiceError::Decode(e.to_string())
}

fn parse_document(xml: &str) -> Result<Element, ServiceError> {
    let mut reader = Reader::from_str(xml);
    let mut stack = vec![Element::named(String::new())];

    loop {
        match reader.read_event().map_err(decode_err)? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                stack.push(Element::named(name));
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Element::named(name));
                }
            }
            Event::End(_) => {
                let done = stack
                    .pop()
                    .ok_or_else(|| decode_err("unbalanced closing tag"))?;
                let parent = stack
                    .last_mut()
                    .ok_or_else(|| decode_err("unbalanced closing tag"))?;
                parent.children.push(done);
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(decode_err)?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            Event::CData(c) => {
                let raw = c.into_inner();
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&raw));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.len() != 1 {
        return Err(decode_err("document ended inside an element"));
    }
    stack
        .pop()
        .and_then(|root| root.children.into_iter().next())
        .ok_or_else(|| decode_err("empty document"))
}

fn parse_value(el: &Element) -> Result<Value, ServiceError> {
    let Some(typed) = el.children.first() else {
        // Untyped <value> content is a string.
        return Ok(Value::String(el.text.clone()));
    };
    let trimmed = typed.text.trim();
    match typed.name.as_str() {
        "string" => Ok(Value::String(typed.text.clone())),
        "int" | "i4" | "i8" => trimmed
            .parse()
            .map(Value::Int)
            .map_err(|_| decode_err(format!("invalid integer {:?}", trimmed))),
        "boolean" => match trimmed {
            "1" | "true" => Ok(Value::Boolean(true)),
            "0" | "false" => Ok(Value::Boolean(false)),
            other => Err(decode_err(format!("invalid boolean {:?}", other))),
        },
        "double" => trimmed
            .parse()
            .map(Value::Double)
            .map_err(|_| decode_err(format!("invalid double {:?}", trimmed))),
        "nil" => Ok(Value::Nil),
        "dateTime.iso8601" => Ok(Value::DateTime(trimmed.to_string())),
        "base64" => Ok(Value::Base64(trimmed.to_string())),
        "array" => typed
            .require("data")?
            .children
            .iter()
            .filter(|c| c.name == "value")
            .map(parse_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        "struct" => {
            let mut members = BTreeMap::new();
            for member in typed.children.iter().filter(|c| c.name == "member") {
                let name = member.require("name")?.text.clone();
                let value = parse_value(member.require("value")?)?;
                members.insert(name, value);
            }
            Ok(Value::Struct(members))
        }
        other => Err(decode_err(format!("unsupported value type <{}>", other))),
    }
}

/// Decode a `<methodResponse>` document. `<fault>` responses become
/// [`ServiceError::Fault`]; a response without parameters decodes to `Nil`.
pub fn decode_response(xml: &str) -> Result<Value, ServiceError> {
    let doc = parse_document(xml)?;
    if doc.name != "methodResponse" {
        return Err(decode_err(format!(
            "expected <methodResponse>, got <{}>",
            doc.name
        )));
    }

    if let Some(fault) = doc.child("fault") {
        let detail = parse_value(fault.require("value")?)?;
        let (code, message) = match &detail {
            Value::Struct(members) => (
                match members.get("faultCode") {
                    Some(Value::Int(code)) => *code,
                    _ => 0,
                },
                members
                    .get("faultString")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            ),
            other => (0, format!("{:?}", other)),
        };
        return Err(ServiceError::Fault { code, message });
    }

    let Some(param) = doc.child("params").and_then(|p| p.child("param")) else {
        return Ok(Value::Nil);
    };
    parse_value(param.require("value")?)
}

/// Split a `(flag, payload...)` reply into success payload or failure code.
pub fn tagged(value: Value) -> Result<Reply<Vec<Value>>, ServiceError> {
    let items = match value {
        Value::Array(items) => items,
        flag @ Value::Boolean(_) => vec![flag],
        other => {
            return Err(decode_err(format!(
                "expected a tagged array, got {}",
                other.kind()
            )))
        }
    };

    let mut items = items.into_iter();
    let flag = items
        .next()
        .as_ref()
        .and_then(Value::as_bool)
        .ok_or_else(|| decode_err("reply does not start with a success flag"))?;
    let rest: Vec<Value> = items.collect();

    if flag {
        return Ok(Reply::Success(rest));
    }
    let fault = match rest.first() {
        Some(Value::String(code)) => ServiceFault::from_code(code),
        Some(other) => ServiceFault::Other(format!("{:?}", other)),
        None => ServiceFault::Unspecified,
    };
    Ok(Reply::Failure(fault))
}
