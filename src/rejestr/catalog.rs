//! Tool catalog
//!
//! Every tool is a row in a static table: a path template, an optional
//! query template, the arguments it needs and the HTTP method. Adding a
//! tool means adding a `ToolKind` variant and its `ToolSpec`.

use serde_json::{json, Map, Value};

/// KRS register chapters accepted by `get_company_krs_documentation`
pub const KRS_CHAPTERS: [&str; 6] = [
    "ogolny",
    "oddzialy",
    "akcje",
    "wzmianki",
    "zobowiazania",
    "przeksztalcenia",
];

/// A named tool argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arg {
    Name,
    Nip,
    Krs,
    Chapter,
    PersonId,
    DocId,
}

impl Arg {
    /// Key under which the argument is passed
    pub fn key(self) -> &'static str {
        match self {
            Arg::Name => "name",
            Arg::Nip => "nip",
            Arg::Krs => "krs",
            Arg::Chapter => "chapter",
            Arg::PersonId => "person_id",
            Arg::DocId => "doc_id",
        }
    }

    /// Alternative keys accepted for the same argument
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Arg::PersonId => &["id"],
            _ => &[],
        }
    }

    /// Closed set of accepted values, if any
    pub fn allowed_values(self) -> Option<&'static [&'static str]> {
        match self {
            Arg::Chapter => Some(&KRS_CHAPTERS),
            _ => None,
        }
    }

    fn description(self) -> &'static str {
        match self {
            Arg::Name => "Company name or a fragment of it, e.g. \"Orlen\". Case-insensitive.",
            Arg::Nip => "10-digit NIP without separators, e.g. \"5252408074\" (not \"525-240-80-74\").",
            Arg::Krs => "KRS number, with or without leading zeros: \"0000012345\" or \"12345\".",
            Arg::Chapter => {
                "KRS chapter: ogolny (general data, purpose, representation), oddzialy (branches), \
                 akcje (shares), wzmianki (annotations such as bankruptcy or liquidation), \
                 zobowiazania (liabilities and encumbrances), przeksztalcenia (transformations)."
            }
            Arg::PersonId => {
                "rejestr.io person identifier, taken from company data, connections or the beneficiary list."
            }
            Arg::DocId => {
                "Document identifier from get_financial_documents. Only documents with czy_ma_json = true."
            }
        }
    }

    fn schema(self) -> Value {
        let mut schema = json!({
            "type": "string",
            "description": self.description(),
        });
        if let Some(values) = self.allowed_values() {
            schema["enum"] = json!(values);
        }
        schema
    }
}

/// One piece of a path or query template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Fixed text
    Lit(&'static str),
    /// Substituted argument value
    Arg(Arg),
}

/// HTTP method used for the outbound call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

/// Static description of a tool
#[derive(Debug)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub path: &'static [Segment],
    pub query: &'static [(&'static str, Segment)],
    pub required: &'static [Arg],
    pub method: HttpMethod,
}

/// The registered rejestr.io tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    CompanyByName,
    CompanyByNip,
    CompanyByKrs,
    KrsDocumentation,
    PersonData,
    Beneficiary,
    ConnectionsByKrs,
    ConnectionsByPerson,
    FinancialDocuments,
    FinancialStatementJson,
    TokenAmount,
}

static COMPANY_BY_NAME: ToolSpec = ToolSpec {
    name: "get_company_info_using_name",
    description: "Search companies in rejestr.io by name. Partial, case-insensitive match; \
        results are paginated (10 per page) and ranked by text relevance weighted by share capital. \
        The response has liczba_wszystkich_wynikow (total matches) and wyniki (list with id, nazwy, \
        numery, stan, adres, krs_wpisy, krs_powiazania_liczby). Use get_company_info_using_krs or \
        get_company_info_using_nip with a number from the results for full company data.",
    path: &[Segment::Lit("org")],
    query: &[("nazwa", Segment::Arg(Arg::Name))],
    required: &[Arg::Name],
    method: HttpMethod::Get,
};

static COMPANY_BY_NIP: ToolSpec = ToolSpec {
    name: "get_company_info_using_nip",
    description: "Get company data by NIP (Polish tax identification number): name, legal form, \
        status, KRS/REGON/NIP numbers, addresses, capital and registration dates.",
    path: &[Segment::Lit("org"), Segment::Lit("nip"), Segment::Arg(Arg::Nip)],
    query: &[],
    required: &[Arg::Nip],
    method: HttpMethod::Get,
};

static COMPANY_BY_KRS: ToolSpec = ToolSpec {
    name: "get_company_info_using_krs",
    description: "Get company data by KRS (National Court Register) number: name, legal form, \
        status, registration numbers, addresses, share capital, management and representation, \
        registration and modification dates.",
    path: &[Segment::Lit("org"), Segment::Arg(Arg::Krs)],
    query: &[],
    required: &[Arg::Krs],
    method: HttpMethod::Get,
};

static KRS_DOCUMENTATION: ToolSpec = ToolSpec {
    name: "get_company_krs_documentation",
    description: "Get one chapter of a company's KRS register entry. Make sure the chapter is one \
        of: ogolny, oddzialy, akcje, wzmianki, zobowiazania, przeksztalcenia.",
    path: &[
        Segment::Lit("org"),
        Segment::Arg(Arg::Krs),
        Segment::Lit("krs-rozdzialy"),
        Segment::Arg(Arg::Chapter),
    ],
    query: &[],
    required: &[Arg::Krs, Arg::Chapter],
    method: HttpMethod::Get,
};

static PERSON_DATA: ToolSpec = ToolSpec {
    name: "get_person_data",
    description: "Get data about a person (board member, proxy, shareholder, beneficiary): name, \
        roles in companies and related connections. The person id comes from company data, \
        connection lists or get_beneficiary.",
    path: &[Segment::Lit("osoby"), Segment::Arg(Arg::PersonId)],
    query: &[],
    required: &[Arg::PersonId],
    method: HttpMethod::Get,
};

static BENEFICIARY: ToolSpec = ToolSpec {
    name: "get_beneficiary",
    description: "List the real beneficiaries of a company from CRBR (Central Register of Real \
        Beneficiaries). This is CRBR data, not KRS: it shows ultimate owners, which may differ from \
        the formal representatives. Not every company has a CRBR entry.",
    path: &[Segment::Lit("org"), Segment::Arg(Arg::Krs), Segment::Lit("crbr")],
    query: &[],
    required: &[Arg::Krs],
    method: HttpMethod::Get,
};

static CONNECTIONS_BY_KRS: ToolSpec = ToolSpec {
    name: "get_connections_by_krs",
    description: "List KRS connections of a company with other companies and people: ownership, \
        management, representation, with roles and dates.",
    path: &[
        Segment::Lit("org"),
        Segment::Arg(Arg::Krs),
        Segment::Lit("krs-powiazania"),
    ],
    query: &[],
    required: &[Arg::Krs],
    method: HttpMethod::Get,
};

static CONNECTIONS_BY_PERSON: ToolSpec = ToolSpec {
    name: "get_connections_by_person",
    description: "List every company a person is connected with in KRS (owner, board member, \
        proxy, shareholder), with roles and appointment dates.",
    path: &[
        Segment::Lit("osoby"),
        Segment::Arg(Arg::PersonId),
        Segment::Lit("krs-powiazania"),
    ],
    query: &[],
    required: &[Arg::PersonId],
    method: HttpMethod::Get,
};

static FINANCIAL_DOCUMENTS: ToolSpec = ToolSpec {
    name: "get_financial_documents",
    description: "List financial documents a company filed in KRS (annual statements, audit \
        reports) with id, type, period, filing date and czy_ma_json. Only metadata: use \
        get_financial_statement_in_json for the content of documents with czy_ma_json = true.",
    path: &[
        Segment::Lit("org"),
        Segment::Arg(Arg::Krs),
        Segment::Lit("krs-dokumenty"),
    ],
    query: &[],
    required: &[Arg::Krs],
    method: HttpMethod::Get,
};

static FINANCIAL_STATEMENT_JSON: ToolSpec = ToolSpec {
    name: "get_financial_statement_in_json",
    description: "Download a full financial statement as structured JSON (balance sheet, profit \
        and loss, cash flow, notes). COSTS 0.50 PLN PER CALL: check the balance with \
        get_token_amount, pick a document with czy_ma_json = true from get_financial_documents, \
        tell the user about the cost and get confirmation before calling.",
    path: &[
        Segment::Lit("org"),
        Segment::Arg(Arg::Krs),
        Segment::Lit("krs-dokumenty"),
        Segment::Arg(Arg::DocId),
    ],
    query: &[("format", Segment::Lit("json"))],
    required: &[Arg::Krs, Arg::DocId],
    method: HttpMethod::Get,
};

static TOKEN_AMOUNT: ToolSpec = ToolSpec {
    name: "get_token_amount",
    description: "Get the current rejestr.io account balance in PLN. Paid operations such as \
        get_financial_statement_in_json draw from it.",
    path: &[Segment::Lit("konto"), Segment::Lit("stan")],
    query: &[],
    required: &[],
    method: HttpMethod::Get,
};

impl ToolKind {
    /// Every tool, in catalog order
    pub const ALL: [ToolKind; 11] = [
        ToolKind::CompanyByName,
        ToolKind::CompanyByNip,
        ToolKind::CompanyByKrs,
        ToolKind::KrsDocumentation,
        ToolKind::PersonData,
        ToolKind::Beneficiary,
        ToolKind::ConnectionsByKrs,
        ToolKind::ConnectionsByPerson,
        ToolKind::FinancialDocuments,
        ToolKind::FinancialStatementJson,
        ToolKind::TokenAmount,
    ];

    pub fn spec(self) -> &'static ToolSpec {
        match self {
            ToolKind::CompanyByName => &COMPANY_BY_NAME,
            ToolKind::CompanyByNip => &COMPANY_BY_NIP,
            ToolKind::CompanyByKrs => &COMPANY_BY_KRS,
            ToolKind::KrsDocumentation => &KRS_DOCUMENTATION,
            ToolKind::PersonData => &PERSON_DATA,
            ToolKind::Beneficiary => &BENEFICIARY,
            ToolKind::ConnectionsByKrs => &CONNECTIONS_BY_KRS,
            ToolKind::ConnectionsByPerson => &CONNECTIONS_BY_PERSON,
            ToolKind::FinancialDocuments => &FINANCIAL_DOCUMENTS,
            ToolKind::FinancialStatementJson => &FINANCIAL_STATEMENT_JSON,
            ToolKind::TokenAmount => &TOKEN_AMOUNT,
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Look a tool up by its protocol name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// JSON Schema for the tool's arguments
    pub fn input_schema(self) -> Value {
        let spec = self.spec();
        let properties: Map<String, Value> = spec
            .required
            .iter()
            .map(|arg| (arg.key().to_string(), arg.schema()))
            .collect();
        let required: Vec<&str> = spec.required.iter().map(|arg| arg.key()).collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
