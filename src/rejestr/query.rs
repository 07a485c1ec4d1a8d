//! Tool arguments to remote query
//!
//! Validates the argument object against a tool's `ToolSpec` and fills in
//! its path and query templates.

use serde_json::Value;
use url::{Position, Url};

use super::catalog::{Arg, HttpMethod, Segment, ToolKind};
use crate::error::{Error, Result};

/// A fully substituted request against the rejestr.io API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteQuery {
    method: HttpMethod,
    segments: Vec<String>,
    query: Vec<(String, String)>,
}

impl RemoteQuery {
    /// Build the query for `kind` from a JSON argument object.
    ///
    /// `null` counts as an empty object. Fails with `Error::Validation`
    /// when a required argument is missing, empty or of the wrong type.
    pub fn build(kind: ToolKind, args: &Value) -> Result<Self> {
        let spec = kind.spec();
        let args = ToolArgs::new(args)?;

        let mut values = Vec::with_capacity(spec.required.len());
        for arg in spec.required {
            values.push((*arg, args.require(*arg)?));
        }
        // URL path normalization would drop these segments entirely
        for (arg, value) in &values {
            let in_path = spec.path.contains(&Segment::Arg(*arg));
            if in_path && (value == "." || value == "..") {
                return Err(Error::Validation(format!(
                    "argument '{}' must not be '{}'",
                    arg.key(),
                    value
                )));
            }
        }

        let lookup = |arg: Arg| -> String {
            values
                .iter()
                .find(|(a, _)| *a == arg)
                .map(|(_, v)| v.clone())
                .unwrap_or_default()
        };
        let render = |segment: &Segment| -> String {
            match segment {
                Segment::Lit(text) => (*text).to_string(),
                Segment::Arg(arg) => lookup(*arg),
            }
        };

        Ok(RemoteQuery {
            method: spec.method,
            segments: spec.path.iter().map(&render).collect(),
            query: spec
                .query
                .iter()
                .map(|(key, segment)| ((*key).to_string(), render(segment)))
                .collect(),
        })
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Decoded path segments
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Decoded query-string pairs
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Resolve against the API base URL, percent-encoding every value
    pub fn url(&self, base: &Url) -> Result<Url> {
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| Error::Config(format!("Base URL cannot carry a path: {}", base)))?;
            path.pop_if_empty().extend(&self.segments);
        }
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }

    /// Encoded path and query relative to the API root, e.g. `/org/nip/5252408074`
    pub fn path_and_query(&self) -> String {
        Url::parse("http://localhost/")
            .ok()
            .and_then(|root| self.url(&root).ok())
            .map(|url| url[Position::BeforePath..].to_string())
            .unwrap_or_default()
    }
}

impl std::fmt::Display for RemoteQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path_and_query())
    }
}

/// Borrowed view over a tool's argument object
struct ToolArgs<'a> {
    map: Option<&'a serde_json::Map<String, Value>>,
}

impl<'a> ToolArgs<'a> {
    fn new(args: &'a Value) -> Result<Self> {
        match args {
            Value::Null => Ok(ToolArgs { map: None }),
            Value::Object(map) => Ok(ToolArgs { map: Some(map) }),
            other => Err(Error::Validation(format!(
                "tool arguments must be a JSON object, got {}",
                json_type(other)
            ))),
        }
    }

    fn raw(&self, arg: Arg) -> Option<&'a Value> {
        let map = self.map?;
        std::iter::once(arg.key())
            .chain(arg.aliases().iter().copied())
            .filter_map(|key| map.get(key))
            .find(|value| !value.is_null())
    }

    fn require(&self, arg: Arg) -> Result<String> {
        let key = arg.key();
        let value = match self.raw(arg) {
            None => {
                return Err(Error::Validation(format!(
                    "missing required argument '{}'",
                    key
                )))
            }
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) if n.is_u64() || n.is_i64() => n.to_string(),
            Some(other) => {
                return Err(Error::Validation(format!(
                    "argument '{}' must be a string, got {}",
                    key,
                    json_type(other)
                )))
            }
        };

        if value.is_empty() {
            return Err(Error::Validation(format!(
                "argument '{}' must not be empty",
                key
            )));
        }

        if let Some(allowed) = arg.allowed_values() {
            if !allowed.contains(&value.as_str()) {
                return Err(Error::Validation(format!(
                    "argument '{}' must be one of: {} (got '{}')",
                    key,
                    allowed.join(", "),
                    value
                )));
            }
        }

        Ok(value)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(kind: ToolKind, args: Value) -> String {
        RemoteQuery::build(kind, &args).unwrap().path_and_query()
    }

    #[test]
    fn test_nip_path() {
        assert_eq!(
            path(ToolKind::CompanyByNip, json!({"nip": "5252408074"})),
            "/org/nip/5252408074"
        );
    }

    #[test]
    fn test_financial_statement_path() {
        assert_eq!(
            path(
                ToolKind::FinancialStatementJson,
                json!({"krs": "0000012345", "doc_id": "789"})
            ),
            "/org/0000012345/krs-dokumenty/789?format=json"
        );
    }

    #[test]
    fn test_token_amount_needs_nothing() {
        assert_eq!(path(ToolKind::TokenAmount, Value::Null), "/konto/stan");
        assert_eq!(path(ToolKind::TokenAmount, json!({})), "/konto/stan");
    }

    #[test]
    fn test_every_path_shape() {
        assert_eq!(path(ToolKind::CompanyByKrs, json!({"krs": "12345"})), "/org/12345");
        assert_eq!(
            path(ToolKind::KrsDocumentation, json!({"krs": "1", "chapter": "akcje"})),
            "/org/1/krs-rozdzialy/akcje"
        );
        assert_eq!(path(ToolKind::PersonData, json!({"person_id": "77"})), "/osoby/77");
        assert_eq!(path(ToolKind::Beneficiary, json!({"krs": "1"})), "/org/1/crbr");
        assert_eq!(
            path(ToolKind::ConnectionsByKrs, json!({"krs": "1"})),
            "/org/1/krs-powiazania"
        );
        assert_eq!(
            path(ToolKind::ConnectionsByPerson, json!({"person_id": "77"})),
            "/osoby/77/krs-powiazania"
        );
        assert_eq!(
            path(ToolKind::FinancialDocuments, json!({"krs": "1"})),
            "/org/1/krs-dokumenty"
        );
    }

    #[test]
    fn test_name_is_encoded() {
        let query = RemoteQuery::build(
            ToolKind::CompanyByName,
            &json!({"name": "Żabka & Co/Polska"}),
        )
        .unwrap();
        assert_eq!(query.segments(), ["org"]);
        assert_eq!(
            query.query_pairs(),
            [("nazwa".to_string(), "Żabka & Co/Polska".to_string())]
        );
        assert_eq!(
            query.path_and_query(),
            "/org?nazwa=%C5%BBabka+%26+Co%2FPolska"
        );
    }

    #[test]
    fn test_slash_cannot_escape_segment() {
        assert_eq!(
            path(ToolKind::CompanyByKrs, json!({"krs": "../konto/stan"})),
            "/org/..%2Fkonto%2Fstan"
        );

        let dot_segments = [
            (ToolKind::CompanyByKrs, json!({"krs": ".."})),
            (ToolKind::ConnectionsByPerson, json!({"person_id": "."})),
            (ToolKind::PersonData, json!({"id": " .. "})),
            (
                ToolKind::FinancialStatementJson,
                json!({"krs": "0000012345", "doc_id": ".."}),
            ),
        ];
        for (kind, args) in dot_segments {
            let err = RemoteQuery::build(kind, &args).unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{} {}", kind, args);
        }

        // Only path segments are affected; a query value may be a dot
        assert_eq!(
            path(ToolKind::CompanyByName, json!({"name": ".."})),
            "/org?nazwa=.."
        );
        assert_eq!(
            path(ToolKind::CompanyByKrs, json!({"krs": "..."})),
            "/org/..."
        );
    }

    #[test]
    fn test_numbers_and_trimming() {
        assert_eq!(path(ToolKind::CompanyByKrs, json!({"krs": 12345})), "/org/12345");
        assert_eq!(
            path(ToolKind::CompanyByNip, json!({"nip": "  5252408074\n"})),
            "/org/nip/5252408074"
        );
    }

    #[test]
    fn test_person_id_alias() {
        assert_eq!(path(ToolKind::PersonData, json!({"id": "42"})), "/osoby/42");
        assert_eq!(
            path(ToolKind::PersonData, json!({"id": "42", "person_id": "7"})),
            "/osoby/7"
        );
    }

    #[test]
    fn test_missing_and_empty_arguments() {
        let cases = [
            (ToolKind::CompanyByName, json!({})),
            (ToolKind::CompanyByName, json!({"name": "   "})),
            (ToolKind::CompanyByNip, json!({"nip": ""})),
            (ToolKind::CompanyByNip, json!({"nip": null})),
            (ToolKind::CompanyByKrs, Value::Null),
            (ToolKind::PersonData, json!({"person_id": ""})),
            (ToolKind::FinancialStatementJson, json!({"krs": "1"})),
        ];
        for (kind, args) in cases {
            let err = RemoteQuery::build(kind, &args).unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{} {}", kind, args);
        }
    }

    #[test]
    fn test_wrong_types() {
        assert!(matches!(
            RemoteQuery::build(ToolKind::CompanyByKrs, &json!({"krs": true})),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            RemoteQuery::build(ToolKind::CompanyByKrs, &json!({"krs": 1.5})),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            RemoteQuery::build(ToolKind::CompanyByKrs, &json!(["12345"])),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_unknown_chapter() {
        let err = RemoteQuery::build(
            ToolKind::KrsDocumentation,
            &json!({"krs": "1", "chapter": "finanse"}),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation(ref msg) if msg.contains("przeksztalcenia")));
    }

    #[test]
    fn test_url_against_base() {
        let base = Url::parse("https://rejestr.io/api/v2").unwrap();
        let query = RemoteQuery::build(ToolKind::CompanyByNip, &json!({"nip": "5252408074"})).unwrap();
        assert_eq!(
            query.url(&base).unwrap().as_str(),
            "https://rejestr.io/api/v2/org/nip/5252408074"
        );

        let base = Url::parse("http://127.0.0.1:8080/api/v2/").unwrap();
        assert_eq!(
            query.url(&base).unwrap().as_str(),
            "http://127.0.0.1:8080/api/v2/org/nip/5252408074"
        );
    }
}
