use serde::{Deserialize, Serialize};

// ============ Remote Lead Service Models ============

/// A lead record ("Metropole") as returned by the remote lead service.
///
/// The record is externally owned; the dashboard only ever holds an
/// in-memory copy of the last fetch. Field names follow the remote wire
/// format (camelCase), and `field01`..`field20` are overloaded per
/// product/form variant; `field03` is always the pipeline status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    /// Unique identifier assigned by the remote service.
    pub id: i64,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone (free-form, may contain formatting).
    #[serde(default)]
    pub cell_phone: Option<String>,
    /// Product the lead belongs to.
    #[serde(default)]
    pub product: Option<String>,
    /// Primary interest declared by the lead.
    #[serde(default, rename = "interessePrincipal")]
    pub main_interest: Option<String>,
    #[serde(default)]
    pub field01: Option<String>,
    #[serde(default)]
    pub field02: Option<String>,
    /// Pipeline status slot. Empty or absent means NOVO.
    #[serde(default)]
    pub field03: Option<String>,
    #[serde(default)]
    pub field04: Option<String>,
    #[serde(default)]
    pub field05: Option<String>,
    #[serde(default)]
    pub field06: Option<String>,
    #[serde(default)]
    pub field07: Option<String>,
    #[serde(default)]
    pub field08: Option<String>,
    #[serde(default)]
    pub field09: Option<String>,
    #[serde(default)]
    pub field10: Option<String>,
    #[serde(default)]
    pub field11: Option<String>,
    #[serde(default)]
    pub field12: Option<String>,
    #[serde(default)]
    pub field13: Option<String>,
    #[serde(default)]
    pub field14: Option<String>,
    #[serde(default)]
    pub field15: Option<String>,
    #[serde(default)]
    pub field16: Option<String>,
    #[serde(default)]
    pub field17: Option<String>,
    #[serde(default)]
    pub field18: Option<String>,
    #[serde(default)]
    pub field19: Option<String>,
    #[serde(default)]
    pub field20: Option<String>,
    /// Creation timestamp (ISO-8601 string, parsed lazily).
    #[serde(default)]
    pub created_at: String,
    /// Last-update timestamp (ISO-8601 string, parsed lazily).
    #[serde(default)]
    pub updated_at: String,
    /// Owning tenant reference.
    #[serde(default, rename = "tenantId")]
    pub tenant: Option<TenantRef>,
}

impl Lead {
    /// Resolves the pipeline status slot.
    ///
    /// Empty or absent `field03` is NOVO everywhere the status is
    /// displayed or counted. Unrecognized text resolves to `None` so it
    /// never lands in a status bucket.
    pub fn pipeline_status(&self) -> Option<LeadStatus> {
        match self.field03.as_deref() {
            None => Some(LeadStatus::Novo),
            Some(s) if s.is_empty() => Some(LeadStatus::Novo),
            Some(s) => LeadStatus::parse(s),
        }
    }

    /// Status for display, falling back to NOVO for unknown values.
    pub fn display_status(&self) -> LeadStatus {
        self.pipeline_status().unwrap_or(LeadStatus::Novo)
    }
}

/// Nested tenant reference shape used by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantRef {
    pub id: i64,
}

/// Pipeline lifecycle stages recognized by the remote service.
///
/// These are both the display values and the only valid inputs for the
/// status-update operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadStatus {
    #[serde(rename = "NOVO")]
    Novo,
    #[serde(rename = "CONTATO_FEITO")]
    ContatoFeito,
    #[serde(rename = "QUALIFICADO")]
    Qualificado,
    #[serde(rename = "NÃO_QUALIFICADO")]
    NaoQualificado,
    #[serde(rename = "QUALIFICADO_OP")]
    QualificadoOp,
    #[serde(rename = "PROPOSTA")]
    Proposta,
    #[serde(rename = "FECHADO")]
    Fechado,
}

impl LeadStatus {
    /// All recognized stages, in pipeline order.
    pub const ALL: [LeadStatus; 7] = [
        LeadStatus::Novo,
        LeadStatus::ContatoFeito,
        LeadStatus::Qualificado,
        LeadStatus::NaoQualificado,
        LeadStatus::QualificadoOp,
        LeadStatus::Proposta,
        LeadStatus::Fechado,
    ];

    /// The wire value stored in `field03`.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Novo => "NOVO",
            LeadStatus::ContatoFeito => "CONTATO_FEITO",
            LeadStatus::Qualificado => "QUALIFICADO",
            LeadStatus::NaoQualificado => "NÃO_QUALIFICADO",
            LeadStatus::QualificadoOp => "QUALIFICADO_OP",
            LeadStatus::Proposta => "PROPOSTA",
            LeadStatus::Fechado => "FECHADO",
        }
    }

    /// Human label shown on the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            LeadStatus::Novo => "Novo",
            LeadStatus::ContatoFeito => "Contato Feito",
            LeadStatus::Qualificado => "Qualificado",
            LeadStatus::NaoQualificado => "Não Qualificado",
            LeadStatus::QualificadoOp => "Qualificado OP",
            LeadStatus::Proposta => "Proposta",
            LeadStatus::Fechado => "Fechado",
        }
    }

    /// Exact-match parse of a wire value.
    pub fn parse(value: &str) -> Option<LeadStatus> {
        LeadStatus::ALL.iter().copied().find(|s| s.as_str() == value)
    }
}

// ============ Product Registry Models ============

/// A selectable product configuration entry, persisted client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub active: bool,
}

/// Partial update for a registry entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub active: Option<bool>,
}

// ============ Create Lead Wire Payload ============

/// Full form payload posted to the remote create-lead endpoint.
///
/// Every slot is sent, empty string included, matching what the remote
/// schema expects; the tenant id is wrapped in its nested reference
/// shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLeadRecord {
    pub name: String,
    pub email: String,
    pub cell_phone: String,
    pub product: String,
    #[serde(rename = "interessePrincipal")]
    pub main_interest: String,
    pub field01: String,
    pub field02: String,
    pub field03: String,
    pub field04: String,
    pub field05: String,
    pub field06: String,
    pub field07: String,
    pub field08: String,
    pub field09: String,
    pub tenant_id: TenantRef,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead_with_status(field03: Option<&str>) -> Lead {
        let mut lead: Lead = serde_json::from_value(serde_json::json!({ "id": 1 })).unwrap();
        lead.field03 = field03.map(str::to_string);
        lead
    }

    #[test]
    fn empty_or_absent_status_resolves_to_novo() {
        assert_eq!(
            lead_with_status(None).pipeline_status(),
            Some(LeadStatus::Novo)
        );
        assert_eq!(
            lead_with_status(Some("")).pipeline_status(),
            Some(LeadStatus::Novo)
        );
    }

    #[test]
    fn unknown_status_is_displayed_as_novo_but_not_counted() {
        let lead = lead_with_status(Some("EM_ANALISE"));
        assert_eq!(lead.pipeline_status(), None);
        assert_eq!(lead.display_status(), LeadStatus::Novo);
    }

    #[test]
    fn status_parse_round_trips_all_wire_values() {
        for status in LeadStatus::ALL {
            assert_eq!(LeadStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(LeadStatus::parse("novo"), None);
        assert_eq!(LeadStatus::parse("NAO_QUALIFICADO"), None);
    }

    #[test]
    fn lead_deserializes_from_remote_wire_format() {
        let lead: Lead = serde_json::from_value(serde_json::json!({
            "id": 42,
            "name": "Maria Souza",
            "email": "maria@example.com",
            "cellPhone": "(11) 98765-4321",
            "interessePrincipal": "morar",
            "field03": "QUALIFICADO",
            "createdAt": "2025-03-01T12:00:00Z",
            "updatedAt": "2025-03-02T08:30:00Z",
            "tenantId": { "id": 7 }
        }))
        .unwrap();

        assert_eq!(lead.id, 42);
        assert_eq!(lead.cell_phone.as_deref(), Some("(11) 98765-4321"));
        assert_eq!(lead.main_interest.as_deref(), Some("morar"));
        assert_eq!(lead.pipeline_status(), Some(LeadStatus::Qualificado));
        assert_eq!(lead.tenant, Some(TenantRef { id: 7 }));
    }

    #[test]
    fn new_lead_record_serializes_nested_tenant_reference() {
        let record = NewLeadRecord {
            name: "João".to_string(),
            email: "joao@example.com".to_string(),
            cell_phone: "11999998888".to_string(),
            product: "shalomconsorcios".to_string(),
            main_interest: "investir".to_string(),
            field01: String::new(),
            field02: String::new(),
            field03: String::new(),
            field04: String::new(),
            field05: String::new(),
            field06: String::new(),
            field07: String::new(),
            field08: String::new(),
            field09: String::new(),
            tenant_id: TenantRef { id: 7 },
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["tenantId"]["id"], 7);
        assert_eq!(value["cellPhone"], "11999998888");
        assert_eq!(value["interessePrincipal"], "investir");
    }
}
