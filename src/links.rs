//! Outbound deep links for contacting a lead.
//!
//! These never touch application state; the dashboard hands them to an
//! external handler (messaging app, mail client) and forgets them.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

// URL-component escaping set: everything but alphanumerics and the
// unreserved marks.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const MAIL_SUBJECT: &str = "Shalom Imobiliária - Seu interesse";

/// Strips everything but ASCII digits from a phone number.
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn encode(component: &str) -> String {
    utf8_percent_encode(component, COMPONENT).to_string()
}

/// WhatsApp link with a prefilled greeting for the lead.
pub fn whatsapp_link(phone: &str, name: &str) -> String {
    let message = format!(
        "Olá {}, estamos entrando em contato sobre seu interesse em nossos produtos.",
        name
    );
    format!(
        "https://wa.me/{}?text={}",
        normalize_phone(phone),
        encode(&message)
    )
}

/// Mail-compose link with a templated subject and body.
pub fn mailto_link(email: &str, name: &str) -> String {
    let body = format!(
        "Olá {},\n\nEntramos em contato sobre seu interesse em nossos consórcios e imóveis.\n\nAtenciosamente,\nEquipe Shalom Imobiliária",
        name
    );
    format!(
        "mailto:{}?subject={}&body={}",
        email,
        encode(MAIL_SUBJECT),
        encode(&body)
    )
}
