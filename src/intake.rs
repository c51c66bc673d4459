//! Lead intake form state: two mutually exclusive layouts over one
//! submission path.
//!
//! The remote schema stores quiz/premium answers in overloaded
//! `field0N` slots; some premium slots carry the literal question text
//! rather than an answer. That convention belongs to the wire format
//! only. In here each layout is an explicit tagged variant, converted
//! to the flat record by a single mapping at submission time.

use crate::models::{NewLeadRecord, TenantRef};
use serde::{Deserialize, Serialize};

/// Prompt text the premium layout stores verbatim in `field04`.
pub const PROMPT_INTENT: &str = "Você pretende:";
/// Prompt text the premium layout stores verbatim in `field05`.
pub const PROMPT_DOWN_PAYMENT: &str = "Já possui o valor de entrada ou pretende financiar?";
/// Prompt text the premium layout stores verbatim in `field06`.
pub const PROMPT_SEARCH_TIME: &str = "Está buscando imóvel há quanto tempo?";

/// Which of the two form layouts is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    Premium,
    Quiz,
}

/// Variant-specific answers, tagged by layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "formType", rename_all = "lowercase")]
pub enum IntakeVariant {
    /// "Premium (Lançamento)" layout.
    #[serde(rename_all = "camelCase")]
    Premium {
        /// morar / investir.
        #[serde(default = "default_main_interest")]
        main_interest: String,
        /// Answer to the down-payment/financing question.
        #[serde(default)]
        financing: String,
        /// Answer to "how long have you been searching".
        #[serde(default)]
        search_time: String,
    },
    /// Quiz layout.
    #[serde(rename_all = "camelCase")]
    Quiz {
        /// Considered living/investing near the region?
        #[serde(default)]
        considered_region: String,
        /// Aware of the price gap?
        #[serde(default)]
        price_awareness: String,
        /// Would use FGTS or financing?
        #[serde(default)]
        financing: String,
        /// Willing to talk to a consultant?
        #[serde(default)]
        consultant: String,
        /// Looking to live or to invest?
        #[serde(default)]
        purpose: String,
    },
}

fn default_main_interest() -> String {
    "morar".to_string()
}

impl IntakeVariant {
    /// Declared defaults of the premium layout.
    pub fn premium_defaults() -> Self {
        IntakeVariant::Premium {
            main_interest: default_main_interest(),
            financing: String::new(),
            search_time: String::new(),
        }
    }

    /// Declared defaults of the quiz layout.
    pub fn quiz_defaults() -> Self {
        IntakeVariant::Quiz {
            considered_region: String::new(),
            price_awareness: String::new(),
            financing: String::new(),
            consultant: String::new(),
            purpose: String::new(),
        }
    }

    pub fn kind(&self) -> FormKind {
        match self {
            IntakeVariant::Premium { .. } => FormKind::Premium,
            IntakeVariant::Quiz { .. } => FormKind::Quiz,
        }
    }
}

/// Full intake form state: shared contact fields plus the active
/// layout's answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub cell_phone: String,
    #[serde(default)]
    pub product: String,
    #[serde(flatten)]
    pub variant: IntakeVariant,
}

impl FormState {
    /// Blank form in the premium layout (the initial state).
    pub fn new() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            cell_phone: String::new(),
            product: String::new(),
            variant: IntakeVariant::premium_defaults(),
        }
    }

    pub fn kind(&self) -> FormKind {
        self.variant.kind()
    }

    /// Switches to the other layout.
    ///
    /// Variant-specific answers reset to that layout's declared
    /// defaults; name, email, phone and product are left untouched.
    pub fn switch_to(&mut self, kind: FormKind) {
        self.variant = match kind {
            FormKind::Premium => IntakeVariant::premium_defaults(),
            FormKind::Quiz => IntakeVariant::quiz_defaults(),
        };
    }

    /// Validates required fields for the active layout.
    ///
    /// Name, phone and product are always required; email only in the
    /// premium layout. Returns the wire names of the missing fields.
    pub fn validate(&self) -> Result<(), Vec<&'static str>> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.kind() == FormKind::Premium && self.email.trim().is_empty() {
            missing.push("email");
        }
        if self.cell_phone.trim().is_empty() {
            missing.push("cellPhone");
        }
        if self.product.trim().is_empty() {
            missing.push("product");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(missing)
        }
    }

    /// Maps the form onto the flat remote record.
    ///
    /// This is the single place the overloaded `field0N` meanings are
    /// spelled out, per layout.
    pub fn to_wire(&self, tenant_id: i64) -> NewLeadRecord {
        let mut record = NewLeadRecord {
            name: self.name.clone(),
            email: self.email.clone(),
            cell_phone: self.cell_phone.clone(),
            product: self.product.clone(),
            main_interest: String::new(),
            field01: String::new(),
            field02: String::new(),
            field03: String::new(),
            field04: String::new(),
            field05: String::new(),
            field06: String::new(),
            field07: String::new(),
            field08: String::new(),
            field09: String::new(),
            tenant_id: TenantRef { id: tenant_id },
        };

        match &self.variant {
            IntakeVariant::Premium {
                main_interest,
                financing,
                search_time,
            } => {
                record.main_interest = main_interest.clone();
                record.field01 = financing.clone();
                record.field02 = search_time.clone();
                record.field04 = PROMPT_INTENT.to_string();
                record.field05 = PROMPT_DOWN_PAYMENT.to_string();
                record.field06 = PROMPT_SEARCH_TIME.to_string();
                record.field07 = main_interest.clone();
            }
            IntakeVariant::Quiz {
                considered_region,
                price_awareness,
                financing,
                consultant,
                purpose,
            } => {
                record.field01 = considered_region.clone();
                record.field02 = price_awareness.clone();
                record.field04 = financing.clone();
                record.field05 = consultant.clone();
                record.field06 = purpose.clone();
            }
        }

        record
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}
